//! # Drive Versioner
//!
//! Idempotent, namespace-scoped versioning of local files against a
//! hierarchical remote store.
//!
//! ## Layout
//!
//! Each namespace maps to one directory under a configured root. Inside it
//! lives a single container object with the fixed name
//! [`VERSIONED_FILENAME`]; every uploaded version becomes a revision of
//! that container, pinned with the store's keep-forever flag. Directories
//! and containers are created lazily on the first `version` call that
//! needs them and never deleted here.
//!
//! ## Deduplication
//!
//! The store offers no query facility within a revision history, so the
//! uploaded filename is the dedup key: a `version` call whose file basename
//! already appears as a revision's `original_filename` is a logged no-op.
//! The discriminator (and its derived `id` tag) is stored as object
//! properties on every write but is deliberately not what the check keys
//! off; the two can disagree if callers rename files between runs.
//!
//! ## Known race
//!
//! The directory and container lookups are check-then-act against a store
//! without an atomic create-if-absent: two concurrent `version` calls for
//! a brand-new namespace can both create a directory. That state surfaces
//! later as [`VersionerError::DuplicateDirectory`] and needs manual remote
//! cleanup; no client-side locking is attempted since it cannot reach
//! across processes.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bridge_traits::error::StoreError;
use bridge_traits::output::{ConsoleOutput, OutputSink};
use bridge_traits::store::{DriveStore, ObjectMetadata, RemoteObject, Revision, MIME_FOLDER};
use bytes::Bytes;
use tracing::{debug, instrument};

use crate::cache::VersionCache;
use crate::error::{Result, VersionerError};
use crate::messages;
use crate::mime::{sniff_mime, version_tag};

/// Fixed name of the per-namespace container object
pub const VERSIONED_FILENAME: &str = "versioned";

/// Output tier: nothing is written
pub const VERBOSITY_SILENT: u8 = 1;
/// Output tier: state transitions are written (default)
pub const VERBOSITY_NOTICE: u8 = 2;
/// Output tier: state transitions plus redacted request payloads
pub const VERBOSITY_ALL: u8 = 3;

/// Which operation a context-tagged output line belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Version,
    Revisions,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Version => write!(f, "VERSION"),
            Mode::Revisions => write!(f, "REVISIONS"),
        }
    }
}

/// Per-call operation context tagging every output line.
///
/// Threaded as a value through the helpers so concurrent callers of a
/// shared `Versioner` cannot smear each other's tags.
#[derive(Debug, Clone)]
struct OpContext {
    mode: Mode,
    ns: String,
    discriminator: String,
}

impl OpContext {
    fn version(ns: &str, discriminator: &str) -> Self {
        Self {
            mode: Mode::Version,
            ns: ns.to_string(),
            discriminator: discriminator.to_string(),
        }
    }

    fn revisions(ns: &str) -> Self {
        Self {
            mode: Mode::Revisions,
            ns: ns.to_string(),
            discriminator: String::new(),
        }
    }
}

/// Seam for orchestrators that only need `version`
#[async_trait]
pub trait Versioning: Send + Sync {
    /// Upload `file_path` as a new version within `ns`, tagged with
    /// `discriminator`. Returns the container object.
    async fn version(
        &self,
        file_path: &Path,
        ns: &str,
        discriminator: &str,
    ) -> Result<RemoteObject>;
}

/// Idempotent file versioner against a hierarchical remote store.
pub struct Versioner {
    store: Arc<dyn DriveStore>,
    /// Id of the root directory namespaces live under
    root_id: String,
    output: Arc<dyn OutputSink>,
    verbosity: u8,
    cache: Mutex<VersionCache>,
}

impl Versioner {
    /// Create a versioner rooted at `root_id`, writing to stdout at the
    /// notice tier.
    pub fn new(store: Arc<dyn DriveStore>, root_id: impl Into<String>) -> Self {
        Self {
            store,
            root_id: root_id.into(),
            output: Arc::new(ConsoleOutput),
            verbosity: VERBOSITY_NOTICE,
            cache: Mutex::new(VersionCache::default()),
        }
    }

    /// Replace the output sink (tests use a buffered one).
    pub fn with_output(mut self, output: Arc<dyn OutputSink>) -> Self {
        self.output = output;
        self
    }

    /// Set the output tier, clamped to the valid range.
    pub fn with_verbosity(mut self, verbosity: u8) -> Self {
        self.verbosity = verbosity.clamp(VERBOSITY_SILENT, VERBOSITY_ALL);
        self
    }

    /// Drop every cached lookup, forcing fresh queries on the next call.
    pub fn clear_cache(&self) {
        self.lock_cache().clear();
    }

    /// Upload a file as a new version within a namespace.
    ///
    /// Ensures the namespace directory and the versioned container exist,
    /// then either skips (a revision with this file's basename already
    /// exists) or uploads the content as a new revision carrying the
    /// discriminator properties.
    #[instrument(skip(self), fields(ns = %ns, discriminator = %discriminator))]
    pub async fn version(
        &self,
        file_path: &Path,
        ns: &str,
        discriminator: &str,
    ) -> Result<RemoteObject> {
        let ctx = OpContext::version(ns, discriminator);

        let content = match tokio::fs::read(file_path).await {
            Ok(bytes) => Bytes::from(bytes),
            Err(source) => {
                self.emit(&ctx, VERBOSITY_NOTICE, messages::VERSIONABLE_FILE_NOT_READABLE);
                return Err(VersionerError::FileNotReadable {
                    path: file_path.to_path_buf(),
                    source,
                });
            }
        };

        let directory = match self.query_directory(&ctx).await? {
            Some(directory) => {
                self.emit(&ctx, VERBOSITY_NOTICE, messages::DEBUG_NS_DIR_FOUND);
                directory
            }
            None => {
                let directory = self.create_directory(&ctx).await?;
                self.emit(&ctx, VERBOSITY_NOTICE, messages::DEBUG_NS_DIR_CREATED);
                directory
            }
        };

        match self.query_versioned(&ctx, &directory).await? {
            Some(versioned) => {
                self.emit(&ctx, VERBOSITY_NOTICE, messages::DEBUG_VERSIONED_FILE_FOUND);

                let filename = Self::basename(file_path);
                let revisions = self.query_revision_list(&ctx, &versioned).await?;
                let already_versioned = revisions
                    .iter()
                    .any(|revision| revision.original_filename.as_deref() == Some(filename.as_str()));
                if already_versioned {
                    self.emit(&ctx, VERBOSITY_NOTICE, messages::DEBUG_VERSION_ALREADY_EXISTS);
                    return Ok(versioned);
                }

                let updated = self.create_update(&ctx, &versioned, file_path, content).await?;
                self.emit(&ctx, VERBOSITY_NOTICE, messages::DEBUG_NEW_VERSION_CREATED);
                Ok(updated)
            }
            None => {
                let created = self
                    .create_versioned(&ctx, &directory, file_path, content)
                    .await?;
                self.emit(&ctx, VERBOSITY_NOTICE, messages::DEBUG_VERSIONED_FILE_CREATED);
                Ok(created)
            }
        }
    }

    /// List the revisions of a namespace's versioned container.
    ///
    /// Both the namespace directory and the container must already exist;
    /// either missing fails with [`VersionerError::CannotList`].
    #[instrument(skip(self), fields(ns = %ns))]
    pub async fn list(&self, ns: &str) -> Result<Vec<Revision>> {
        let ctx = OpContext::revisions(ns);

        if let Some(cached) = self.lock_cache().list(ns) {
            self.emit_cache_hit(&ctx, &format!("list-{}", ns));
            return Ok(cached);
        }

        let Some(directory) = self.query_directory(&ctx).await? else {
            self.emit(&ctx, VERBOSITY_NOTICE, messages::DRIVE_CANNOT_LIST_VERSIONED_FILE);
            return Err(VersionerError::CannotList { ns: ns.to_string() });
        };
        self.emit(&ctx, VERBOSITY_NOTICE, messages::DEBUG_NS_DIR_FOUND);

        let Some(versioned) = self.query_versioned(&ctx, &directory).await? else {
            self.emit(&ctx, VERBOSITY_NOTICE, messages::DRIVE_CANNOT_LIST_VERSIONED_FILE);
            return Err(VersionerError::CannotList { ns: ns.to_string() });
        };
        self.emit(&ctx, VERBOSITY_NOTICE, messages::DEBUG_VERSIONED_FILE_FOUND);
        self.emit(
            &ctx,
            VERBOSITY_NOTICE,
            &format!("{}{}", messages::DEBUG_LISTING_VERSIONS, versioned.id),
        );

        let revisions = self.query_revision_list(&ctx, &versioned).await?;
        self.lock_cache().put_list(ns, revisions.clone());
        Ok(revisions)
    }

    /// Re-assert the keep-forever flag on every revision of a namespace.
    ///
    /// The store does not reliably honor the flag requested at upload time,
    /// so this patches each revision with a payload carrying only the flag.
    /// A missing namespace or container surfaces as the `CannotList` error
    /// from [`Versioner::list`]; an existing container with an empty
    /// history is a no-op. Not transactional: a mid-loop failure leaves
    /// earlier revisions updated, and re-invoking is safe because each
    /// patch is idempotent.
    #[instrument(skip(self), fields(ns = %ns))]
    pub async fn update_all_revisions(&self, ns: &str) -> Result<()> {
        let ctx = OpContext::revisions(ns);

        let revisions = self.list(ns).await?;
        if revisions.is_empty() {
            debug!("No revisions to update");
            return Ok(());
        }

        // list() just resolved and cached the container
        let versioned = self
            .lock_cache()
            .versioned(ns)
            .ok_or_else(|| VersionerError::CannotList { ns: ns.to_string() })?;

        for revision in &revisions {
            self.emit(
                &ctx,
                VERBOSITY_NOTICE,
                &format!("{}{}", messages::DEBUG_UPDATING_REVISION, revision.id),
            );
            self.store
                .update_revision(&versioned.id, &revision.id, true)
                .await
                .map_err(|e| self.classify(&ctx, e))?;
        }

        Ok(())
    }

    async fn query_directory(&self, ctx: &OpContext) -> Result<Option<RemoteObject>> {
        if let Some(hit) = self.lock_cache().directory(&ctx.ns) {
            self.emit_cache_hit(ctx, &format!("directory-{}", ctx.ns));
            return Ok(Some(hit));
        }

        let found = self
            .store
            .query(&self.root_id, &ctx.ns, Some(MIME_FOLDER.to_string()))
            .await
            .map_err(|e| self.classify(ctx, e))?;

        if found.len() > 1 {
            self.emit(ctx, VERBOSITY_NOTICE, messages::DUPLICATE_NAMESPACE_DIRECTORY);
            return Err(VersionerError::DuplicateDirectory { ns: ctx.ns.clone() });
        }

        let first = found.into_iter().next();
        if let Some(directory) = &first {
            self.lock_cache().put_directory(&ctx.ns, directory.clone());
        }
        Ok(first)
    }

    async fn query_versioned(
        &self,
        ctx: &OpContext,
        directory: &RemoteObject,
    ) -> Result<Option<RemoteObject>> {
        if let Some(hit) = self.lock_cache().versioned(&ctx.ns) {
            self.emit_cache_hit(ctx, &format!("versioned-{}", ctx.ns));
            return Ok(Some(hit));
        }

        let found = self
            .store
            .query(&directory.id, VERSIONED_FILENAME, None)
            .await
            .map_err(|e| self.classify(ctx, e))?;

        if found.len() > 1 {
            self.emit(ctx, VERBOSITY_NOTICE, messages::DUPLICATE_VERSIONED_FILE);
            return Err(VersionerError::DuplicateVersioned { ns: ctx.ns.clone() });
        }

        let first = found.into_iter().next();
        if let Some(versioned) = &first {
            self.lock_cache().put_versioned(&ctx.ns, versioned.clone());
        }
        Ok(first)
    }

    async fn query_revision_list(
        &self,
        ctx: &OpContext,
        versioned: &RemoteObject,
    ) -> Result<Vec<Revision>> {
        if let Some(hit) = self.lock_cache().revisions(&ctx.ns) {
            self.emit_cache_hit(ctx, &format!("revisions-{}", ctx.ns));
            return Ok(hit);
        }

        let revisions = self
            .store
            .list_revisions(&versioned.id)
            .await
            .map_err(|e| self.classify(ctx, e))?;

        self.lock_cache().put_revisions(&ctx.ns, revisions.clone());
        Ok(revisions)
    }

    async fn create_directory(&self, ctx: &OpContext) -> Result<RemoteObject> {
        let metadata = ObjectMetadata::folder(&ctx.ns, &self.root_id);
        self.emit_metadata(ctx, "CreateDirectory body fields", &metadata, 0);

        match self.store.create(metadata, None).await {
            Ok(created) => Ok(created),
            Err(error) => {
                self.emit(ctx, VERBOSITY_NOTICE, messages::DRIVE_CANNOT_CREATE_DIR);
                if let StoreError::Api { status: 404, .. } = &error {
                    self.emit(
                        ctx,
                        VERBOSITY_NOTICE,
                        &format!("{}{}", messages::DRIVE_ROOT_NOT_FOUND, self.root_id),
                    );
                    return Err(VersionerError::RootNotFound {
                        root_id: self.root_id.clone(),
                        status: 404,
                    });
                }
                Err(self.classify(ctx, error))
            }
        }
    }

    async fn create_versioned(
        &self,
        ctx: &OpContext,
        directory: &RemoteObject,
        file_path: &Path,
        content: Bytes,
    ) -> Result<RemoteObject> {
        let metadata = self.version_metadata(ctx, file_path, &content, vec![directory.id.clone()]);
        self.emit_metadata(ctx, "CreateVersioned body fields", &metadata, content.len());

        match self.store.create(metadata, Some(content)).await {
            Ok(created) => Ok(created),
            Err(error) => {
                let classified = self.classify(ctx, error);
                if matches!(classified, VersionerError::Store(_)) {
                    self.emit(ctx, VERBOSITY_NOTICE, messages::DRIVE_CANNOT_CREATE_VERSIONED_FILE);
                }
                Err(classified)
            }
        }
    }

    async fn create_update(
        &self,
        ctx: &OpContext,
        versioned: &RemoteObject,
        file_path: &Path,
        content: Bytes,
    ) -> Result<RemoteObject> {
        let metadata = self.version_metadata(ctx, file_path, &content, vec![]);
        self.emit_metadata(ctx, "CreateNewVersion body fields", &metadata, content.len());

        match self.store.update(&versioned.id, metadata, Some(content)).await {
            Ok(updated) => Ok(updated),
            Err(error) => {
                let classified = self.classify(ctx, error);
                if matches!(classified, VersionerError::Store(_)) {
                    self.emit(ctx, VERBOSITY_NOTICE, messages::DRIVE_CANNOT_UPDATE_VERSIONED_FILE);
                }
                Err(classified)
            }
        }
    }

    /// Metadata every uploaded version carries.
    fn version_metadata(
        &self,
        ctx: &OpContext,
        file_path: &Path,
        content: &[u8],
        parents: Vec<String>,
    ) -> ObjectMetadata {
        let mut properties = HashMap::new();
        properties.insert("discriminator".to_string(), ctx.discriminator.clone());
        properties.insert("id".to_string(), version_tag(&ctx.ns, &ctx.discriminator));

        ObjectMetadata {
            name: Some(VERSIONED_FILENAME.to_string()),
            mime_type: Some(sniff_mime(content).to_string()),
            original_filename: Some(Self::basename(file_path)),
            parents,
            properties,
            keep_revision_forever: true,
        }
    }

    /// Map a store failure onto the typed taxonomy.
    ///
    /// Structured reasons with a known mapping become their dedicated
    /// variants; an unrecognised reason keeps its full diagnostic in
    /// `UnknownRemote`. Unstructured failures pass through unchanged.
    fn classify(&self, ctx: &OpContext, error: StoreError) -> VersionerError {
        match error {
            StoreError::Api {
                reason: Some(reason),
                status,
                message,
            } => match reason.as_str() {
                "insufficientFilePermissions" => {
                    self.emit(ctx, VERBOSITY_NOTICE, messages::AUTHORISATION_FAIL);
                    VersionerError::Authorization { status, message }
                }
                "parentNotAFolder" => {
                    self.emit(ctx, VERBOSITY_NOTICE, messages::PARENT_NOT_A_FOLDER);
                    VersionerError::ParentNotFolder { status, message }
                }
                "fieldNotWritable" => {
                    self.emit(ctx, VERBOSITY_NOTICE, messages::FIELD_NOT_WRITABLE);
                    VersionerError::FieldNotWritable { status, message }
                }
                _ => {
                    tracing::error!(
                        reason = %reason,
                        status = status,
                        message = %message,
                        "Unrecognised remote error reason"
                    );
                    self.emit(ctx, VERBOSITY_NOTICE, messages::UNKNOWN_REMOTE_ERROR);
                    VersionerError::UnknownRemote {
                        reason,
                        status,
                        message,
                    }
                }
            },
            other => other.into(),
        }
    }

    fn emit(&self, ctx: &OpContext, tier: u8, message: &str) {
        if self.verbosity >= tier {
            self.output.writeln(&format!(
                " | {} : {} : {} | {}",
                ctx.mode, ctx.ns, ctx.discriminator, message
            ));
        }
    }

    fn emit_cache_hit(&self, ctx: &OpContext, key: &str) {
        self.emit(
            ctx,
            VERBOSITY_NOTICE,
            &format!("{}{}", messages::DEBUG_CACHE_HIT, key),
        );
    }

    /// Tier-3 dump of an outgoing payload, raw content redacted.
    fn emit_metadata(
        &self,
        ctx: &OpContext,
        prefix: &str,
        metadata: &ObjectMetadata,
        content_len: usize,
    ) {
        if self.verbosity < VERBOSITY_ALL {
            return;
        }
        let data = if content_len > 0 { "--REDACTED--" } else { "" };
        let dump = serde_json::json!({
            "name": metadata.name,
            "mimeType": metadata.mime_type,
            "originalFilename": metadata.original_filename,
            "parents": metadata.parents,
            "properties": metadata.properties,
            "keepRevisionForever": metadata.keep_revision_forever,
            "data": data,
        });
        self.emit(ctx, VERBOSITY_ALL, &format!("{}: {}", prefix, dump));
    }

    fn lock_cache(&self) -> std::sync::MutexGuard<'_, VersionCache> {
        self.cache.lock().expect("version cache lock poisoned")
    }

    fn basename(path: &Path) -> String {
        path.file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

#[async_trait]
impl Versioning for Versioner {
    async fn version(
        &self,
        file_path: &Path,
        ns: &str,
        discriminator: &str,
    ) -> Result<RemoteObject> {
        Versioner::version(self, file_path, ns, discriminator).await
    }
}
