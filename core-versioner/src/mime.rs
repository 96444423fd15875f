//! Content sniffing and version tagging helpers

use sha2::{Digest, Sha256};

/// Best-effort MIME detection from file content.
///
/// Checks a handful of magic numbers, treats clean UTF-8 as `text/plain`,
/// and falls back to `application/octet-stream`.
pub(crate) fn sniff_mime(bytes: &[u8]) -> &'static str {
    if bytes.starts_with(b"%PDF-") {
        return "application/pdf";
    }
    if bytes.starts_with(&[0x1f, 0x8b]) {
        return "application/gzip";
    }
    if bytes.starts_with(b"PK\x03\x04") {
        return "application/zip";
    }
    if bytes.starts_with(&[0x89, b'P', b'N', b'G']) {
        return "image/png";
    }
    if bytes.starts_with(&[0xff, 0xd8, 0xff]) {
        return "image/jpeg";
    }
    if looks_like_text(bytes) {
        return "text/plain";
    }
    "application/octet-stream"
}

fn looks_like_text(bytes: &[u8]) -> bool {
    if bytes.is_empty() {
        return false;
    }
    match std::str::from_utf8(bytes) {
        Ok(text) => !text
            .chars()
            .any(|c| c.is_control() && !matches!(c, '\n' | '\r' | '\t')),
        Err(_) => false,
    }
}

/// Opaque correlation tag for a (namespace, discriminator) pair.
///
/// Stored as the `id` property on every uploaded version. Not a security
/// boundary; it only needs to be stable and collision-resistant.
pub(crate) fn version_tag(ns: &str, discriminator: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(ns.as_bytes());
    hasher.update(discriminator.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sniffs_text() {
        assert_eq!(sniff_mime(b"2017-01-01"), "text/plain");
        assert_eq!(sniff_mime(b"line one\nline two\n"), "text/plain");
    }

    #[test]
    fn test_sniffs_magic_numbers() {
        assert_eq!(sniff_mime(b"%PDF-1.4 ..."), "application/pdf");
        assert_eq!(sniff_mime(&[0x1f, 0x8b, 0x08, 0x00]), "application/gzip");
        assert_eq!(sniff_mime(b"PK\x03\x04rest"), "application/zip");
    }

    #[test]
    fn test_falls_back_to_octet_stream() {
        assert_eq!(sniff_mime(&[0x00, 0x01, 0x02]), "application/octet-stream");
        assert_eq!(sniff_mime(b""), "application/octet-stream");
    }

    #[test]
    fn test_version_tag_is_stable() {
        let first = version_tag("postgresBackups", "2017-01-01");
        let second = version_tag("postgresBackups", "2017-01-01");

        assert_eq!(first, second);
        assert_eq!(first.len(), 64);
        assert_ne!(first, version_tag("postgresBackups", "2017-01-02"));
        assert_ne!(first, version_tag("otherNs", "2017-01-01"));
    }
}
