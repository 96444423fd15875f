//! # Bucket To Drive Backup
//!
//! Orchestrates a "select → filter → back up → delete" migration over a
//! bucket's contents.
//!
//! ## Workflow
//!
//! 1. List every object in the bucket
//! 2. Apply the caller's select filter: these objects are "of interest"
//!    and will be deleted from the bucket at the end of the run
//! 3. Apply the caller's backup filter to the selected set: only these are
//!    uploaded to the versioner (e.g. a sampled subset kept long-term)
//! 4. Log both counts, then stop if this is a dry run
//! 5. Download each backupable object to the scratch directory, derive its
//!    discriminator from the filename, and hand it to the versioner
//! 6. Only after every upload was attempted, delete the *selected* set
//!
//! An object can be selected for deletion without being backed up; the two
//! filters diverge deliberately. Any failure aborts the remaining loop and
//! propagates; there is no rollback of uploads or deletions already done.

use std::path::PathBuf;
use std::sync::{Arc, OnceLock};

use bridge_traits::bucket::{BucketObject, BucketStore};
use bridge_traits::output::{ConsoleOutput, OutputSink};
use core_versioner::versioner::Versioning;
use regex::Regex;
use tracing::{debug, info, instrument};

use crate::error::{BackupError, Result};

/// Default pattern extracting a trailing `_<discriminator>.<ext>` segment
/// from a filename, discriminator in the first capture group.
pub const DEFAULT_DISCRIMINATOR_REGEX: &str = r"^(?:[^_])*_([^.]+)\..+$";

/// Pattern for the standardised `[dir/]stem_discriminator.ext` layout.
const FILEPATH_PARSE_REGEX: &str = r"^(.*/)?(?:(.+)_)([^.]+)(\..*$|$)";

pub const MESSAGE_DEBUG_DRIVE_BACKING_UP: &str = "Backing up this many files to Drive. ";
pub const MESSAGE_DEBUG_BUCKET_DELETING: &str = "Deleting this many files from the bucket. ";

/// Filter over bucket objects, injected by the caller.
pub type ObjectFilter = Box<dyn Fn(Vec<BucketObject>) -> Vec<BucketObject> + Send + Sync>;

/// Configuration for a backup run.
#[derive(Debug, Clone)]
pub struct BackupConfig {
    /// Versioning namespace every backed-up object lands in (required)
    pub ns: String,
    /// List and count, but perform no network side effects beyond listing
    pub dry_run: bool,
    /// Scratch directory downloads are staged in
    pub tmp_dir: PathBuf,
    /// Pattern whose first capture group extracts the discriminator from a
    /// filename
    pub discriminator_regex: String,
}

impl BackupConfig {
    pub fn new(ns: impl Into<String>) -> Self {
        Self {
            ns: ns.into(),
            dry_run: false,
            tmp_dir: std::env::temp_dir(),
            discriminator_regex: DEFAULT_DISCRIMINATOR_REGEX.to_string(),
        }
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn with_tmp_dir(mut self, tmp_dir: impl Into<PathBuf>) -> Self {
        self.tmp_dir = tmp_dir.into();
        self
    }

    pub fn with_discriminator_regex(mut self, pattern: impl Into<String>) -> Self {
        self.discriminator_regex = pattern.into();
        self
    }
}

/// Migrates files from a bucket into the Drive versioner, then deletes the
/// selected originals from the bucket.
pub struct BucketToDriveBackup {
    bucket: Arc<dyn BucketStore>,
    versioner: Arc<dyn Versioning>,
    config: BackupConfig,
    discriminator_regex: Regex,
    select_filter: Option<ObjectFilter>,
    backup_filter: Option<ObjectFilter>,
    output: Arc<dyn OutputSink>,
}

impl BucketToDriveBackup {
    /// Validate the configuration and build the orchestrator.
    ///
    /// Fails with [`BackupError::MissingNamespace`] on an empty namespace
    /// and [`BackupError::RegexInvalid`] when the discriminator pattern
    /// does not compile.
    pub fn new(
        bucket: Arc<dyn BucketStore>,
        versioner: Arc<dyn Versioning>,
        config: BackupConfig,
    ) -> Result<Self> {
        if config.ns.is_empty() {
            return Err(BackupError::MissingNamespace);
        }

        let discriminator_regex =
            Regex::new(&config.discriminator_regex).map_err(|source| BackupError::RegexInvalid {
                regex: config.discriminator_regex.clone(),
                source,
            })?;

        Ok(Self {
            bucket,
            versioner,
            config,
            discriminator_regex,
            select_filter: None,
            backup_filter: None,
            output: Arc::new(ConsoleOutput),
        })
    }

    /// Inject the filter deciding which bucket objects are of interest.
    /// Everything it returns is deleted from the bucket at the end of a
    /// non-dry run.
    pub fn with_select_filter(
        mut self,
        filter: impl Fn(Vec<BucketObject>) -> Vec<BucketObject> + Send + Sync + 'static,
    ) -> Self {
        self.select_filter = Some(Box::new(filter));
        self
    }

    /// Inject the filter narrowing the selected objects to those actually
    /// uploaded to the versioner.
    pub fn with_backup_filter(
        mut self,
        filter: impl Fn(Vec<BucketObject>) -> Vec<BucketObject> + Send + Sync + 'static,
    ) -> Self {
        self.backup_filter = Some(Box::new(filter));
        self
    }

    /// Replace the output sink (tests use a buffered one).
    pub fn with_output(mut self, output: Arc<dyn OutputSink>) -> Self {
        self.output = output;
        self
    }

    /// Execute one migration run.
    #[instrument(skip(self), fields(ns = %self.config.ns, dry_run = self.config.dry_run))]
    pub async fn run(&self) -> Result<()> {
        let select_filter = self
            .select_filter
            .as_ref()
            .ok_or(BackupError::FilterNotSet { which: "select" })?;
        let backup_filter = self
            .backup_filter
            .as_ref()
            .ok_or(BackupError::FilterNotSet { which: "backup" })?;

        let all_objects = self.bucket.list_objects().await?;
        let selected = select_filter(all_objects);
        let backupable = backup_filter(selected.clone());

        self.output.writeln(&format!(
            "{}{}",
            MESSAGE_DEBUG_DRIVE_BACKING_UP,
            backupable.len()
        ));
        self.output.writeln(&format!(
            "{}{}",
            MESSAGE_DEBUG_BUCKET_DELETING,
            selected.len()
        ));

        if self.config.dry_run {
            info!("Dry run; skipping backup and deletion");
            return Ok(());
        }

        self.do_backup(&backupable).await?;
        // Deletion stays last so nothing disappears from the bucket before
        // every intended upload was attempted.
        self.do_delete(&selected).await?;

        Ok(())
    }

    async fn do_backup(&self, objects: &[BucketObject]) -> Result<()> {
        for object in objects {
            let local_path = self.config.tmp_dir.join(object.basename());
            debug!(object = %object.name, local = %local_path.display(), "Staging object");
            self.bucket.download_to(&object.name, &local_path).await?;

            let discriminator = self.extract_discriminator(object.basename())?;
            self.versioner
                .version(&local_path, &self.config.ns, &discriminator)
                .await?;
        }
        Ok(())
    }

    async fn do_delete(&self, objects: &[BucketObject]) -> Result<()> {
        for object in objects {
            debug!(object = %object.name, "Deleting bucket object");
            self.bucket.delete(&object.name).await?;
        }
        Ok(())
    }

    fn extract_discriminator(&self, filename: &str) -> Result<String> {
        self.discriminator_regex
            .captures(filename)
            .and_then(|captures| captures.get(1))
            .map(|group| group.as_str().to_string())
            .ok_or_else(|| BackupError::DiscriminatorRegex {
                filename: filename.to_string(),
                regex: self.config.discriminator_regex.clone(),
            })
    }
}

/// Pieces of a standardised `[dir/]stem_discriminator.ext` filepath.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilepathParts {
    /// Leading directory component, trailing `/` included
    pub directory: Option<String>,
    /// Filename up to the final underscore
    pub stem: String,
    /// Segment between the final underscore and the first dot
    pub discriminator: String,
    /// Extension, leading `.` included; empty when there is none
    pub extension: String,
}

fn filepath_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(FILEPATH_PARSE_REGEX).expect("filepath pattern is valid"))
}

/// Parse a filepath following the standardised naming layout.
///
/// Returns `None` for paths without a `stem_discriminator` segment.
pub fn parse_filepath(path: &str) -> Option<FilepathParts> {
    let captures = filepath_pattern().captures(path)?;

    Some(FilepathParts {
        directory: captures.get(1).map(|group| group.as_str().to_string()),
        stem: captures.get(2)?.as_str().to_string(),
        discriminator: captures.get(3)?.as_str().to_string(),
        extension: captures
            .get(4)
            .map(|group| group.as_str().to_string())
            .unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bridge_traits::error::Result as StoreResult;
    use bridge_traits::output::BufferedOutput;
    use bridge_traits::store::RemoteObject;
    use core_versioner::error::{Result as VersionerResult, VersionerError};
    use mockall::{mock, Sequence};
    use std::collections::HashMap;
    use std::path::Path;

    mock! {
        Bucket {}

        #[async_trait]
        impl BucketStore for Bucket {
            async fn list_objects(&self) -> StoreResult<Vec<BucketObject>>;
            async fn download_to(&self, object_name: &str, destination: &Path) -> StoreResult<()>;
            async fn delete(&self, object_name: &str) -> StoreResult<()>;
        }
    }

    mock! {
        Versioner {}

        #[async_trait]
        impl Versioning for Versioner {
            async fn version(
                &self,
                file_path: &Path,
                ns: &str,
                discriminator: &str,
            ) -> VersionerResult<RemoteObject>;
        }
    }

    const NS: &str = "bucketBackups";

    fn object(name: &str) -> BucketObject {
        BucketObject {
            name: name.to_string(),
            size: Some(10),
            content_type: Some("text/plain".to_string()),
            updated_at: None,
        }
    }

    fn container() -> RemoteObject {
        RemoteObject {
            id: "file1".to_string(),
            name: "versioned".to_string(),
            mime_type: Some("text/plain".to_string()),
            parents: vec![],
            properties: HashMap::new(),
            original_filename: None,
            trashed: false,
        }
    }

    fn subject(
        bucket: MockBucket,
        versioner: MockVersioner,
        config: BackupConfig,
        output: Arc<BufferedOutput>,
    ) -> BucketToDriveBackup {
        BucketToDriveBackup::new(Arc::new(bucket), Arc::new(versioner), config)
            .unwrap()
            .with_output(output)
    }

    #[test]
    fn test_construction_requires_namespace() {
        let error = BucketToDriveBackup::new(
            Arc::new(MockBucket::new()),
            Arc::new(MockVersioner::new()),
            BackupConfig::new(""),
        )
        .err()
        .unwrap();

        assert!(matches!(error, BackupError::MissingNamespace));
    }

    #[test]
    fn test_construction_rejects_invalid_regex() {
        let error = BucketToDriveBackup::new(
            Arc::new(MockBucket::new()),
            Arc::new(MockVersioner::new()),
            BackupConfig::new(NS).with_discriminator_regex("("),
        )
        .err()
        .unwrap();

        assert!(matches!(error, BackupError::RegexInvalid { .. }));
    }

    #[tokio::test]
    async fn test_run_fails_without_filters() {
        let mut bucket = MockBucket::new();
        bucket.expect_list_objects().never();

        let backup = subject(
            bucket,
            MockVersioner::new(),
            BackupConfig::new(NS),
            Arc::new(BufferedOutput::new()),
        );

        let error = backup.run().await.unwrap_err();

        assert!(matches!(
            error,
            BackupError::FilterNotSet { which: "select" }
        ));
    }

    #[tokio::test]
    async fn test_mixed_filters_version_subset_delete_selection() {
        let tmp = tempfile::tempdir().unwrap();
        let tmp_dir = tmp.path().to_path_buf();

        let names = [
            "versionableFile_2017-01-01.txt",
            "versionableFile_2017-01-02.txt",
            "versionableFile_2017-01-03.txt",
            "versionableFile_2017-01-04.txt",
            "versionableFile_2017-01-05.txt",
            "versionableFile_2017-01-06.txt",
        ];

        let mut bucket = MockBucket::new();
        let mut seq = Sequence::new();

        bucket
            .expect_list_objects()
            .times(1)
            .in_sequence(&mut seq)
            .returning(move || Ok(names.iter().map(|name| object(name)).collect()));
        bucket
            .expect_download_to()
            .times(4)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(()));
        // All six selected objects go, and only after every download
        bucket
            .expect_delete()
            .withf(|name| name.starts_with("versionableFile_2017-01-0"))
            .times(6)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));

        let expected_tmp = tmp_dir.clone();
        let mut versioner = MockVersioner::new();
        versioner
            .expect_version()
            .withf(move |path, ns, discriminator| {
                ns == NS
                    && path.parent() == Some(expected_tmp.as_path())
                    && discriminator.starts_with("2017-01-0")
            })
            .times(4)
            .returning(|_, _, _| Ok(container()));

        let output = Arc::new(BufferedOutput::new());
        let backup = subject(
            bucket,
            versioner,
            BackupConfig::new(NS).with_tmp_dir(tmp_dir),
            output.clone(),
        )
        .with_select_filter(|objects| objects)
        .with_backup_filter(|objects| {
            let last = objects.len() - 1;
            objects
                .into_iter()
                .enumerate()
                .filter(|(index, object)| {
                    // odd final digit, always keeping the newest
                    *index == last
                        || object
                            .name
                            .trim_end_matches(".txt")
                            .chars()
                            .last()
                            .map(|c| c.to_digit(10).unwrap_or(0) % 2 == 1)
                            .unwrap_or(false)
                })
                .map(|(_, object)| object)
                .collect()
        });

        backup.run().await.unwrap();

        assert!(output.contains(&format!("{}4", MESSAGE_DEBUG_DRIVE_BACKING_UP)));
        assert!(output.contains(&format!("{}6", MESSAGE_DEBUG_BUCKET_DELETING)));
    }

    #[tokio::test]
    async fn test_dry_run_lists_and_counts_only() {
        let mut bucket = MockBucket::new();
        bucket
            .expect_list_objects()
            .times(1)
            .returning(|| Ok(vec![object("versionableFile_2017-01-01.txt")]));
        bucket.expect_download_to().never();
        bucket.expect_delete().never();

        let mut versioner = MockVersioner::new();
        versioner.expect_version().never();

        let output = Arc::new(BufferedOutput::new());
        let backup = subject(
            bucket,
            versioner,
            BackupConfig::new(NS).with_dry_run(true),
            output.clone(),
        )
        .with_select_filter(|objects| objects)
        .with_backup_filter(|objects| objects);

        backup.run().await.unwrap();

        assert!(output.contains(&format!("{}1", MESSAGE_DEBUG_DRIVE_BACKING_UP)));
        assert!(output.contains(&format!("{}1", MESSAGE_DEBUG_BUCKET_DELETING)));
    }

    #[tokio::test]
    async fn test_select_filter_limits_deletion_scope() {
        let tmp = tempfile::tempdir().unwrap();

        let mut bucket = MockBucket::new();
        bucket.expect_list_objects().times(1).returning(|| {
            Ok(vec![
                object("versionableFile_2017-01-01.txt"),
                object("versionableFileWRONG-2017-01-02.txt"),
                object("nested/versionableFile_2017-01-03.txt"),
                object("versionableFile_2017-01-04.txt"),
            ])
        });
        bucket
            .expect_download_to()
            .times(2)
            .returning(|_, _| Ok(()));
        bucket
            .expect_delete()
            .withf(|name| {
                name == "versionableFile_2017-01-01.txt" || name == "versionableFile_2017-01-04.txt"
            })
            .times(2)
            .returning(|_| Ok(()));

        let mut versioner = MockVersioner::new();
        versioner
            .expect_version()
            .times(2)
            .returning(|_, _, _| Ok(container()));

        let output = Arc::new(BufferedOutput::new());
        let backup = subject(
            bucket,
            versioner,
            BackupConfig::new(NS).with_tmp_dir(tmp.path()),
            output.clone(),
        )
        .with_select_filter(|objects| {
            objects
                .into_iter()
                .filter(|object| object.name.starts_with("versionableFile_"))
                .collect()
        })
        .with_backup_filter(|objects| objects);

        backup.run().await.unwrap();

        assert!(output.contains(&format!("{}2", MESSAGE_DEBUG_DRIVE_BACKING_UP)));
        assert!(output.contains(&format!("{}2", MESSAGE_DEBUG_BUCKET_DELETING)));
    }

    #[tokio::test]
    async fn test_unmatched_discriminator_fails_naming_filename() {
        let tmp = tempfile::tempdir().unwrap();

        let mut bucket = MockBucket::new();
        bucket
            .expect_list_objects()
            .times(1)
            .returning(|| Ok(vec![object("versionableFile.txt")]));
        bucket
            .expect_download_to()
            .times(1)
            .returning(|_, _| Ok(()));
        bucket.expect_delete().never();

        let mut versioner = MockVersioner::new();
        versioner.expect_version().never();

        let backup = subject(
            bucket,
            versioner,
            BackupConfig::new(NS).with_tmp_dir(tmp.path()),
            Arc::new(BufferedOutput::new()),
        )
        .with_select_filter(|objects| objects)
        .with_backup_filter(|objects| objects);

        let error = backup.run().await.unwrap_err();

        match error {
            BackupError::DiscriminatorRegex { filename, regex } => {
                assert_eq!(filename, "versionableFile.txt");
                assert_eq!(regex, DEFAULT_DISCRIMINATOR_REGEX);
            }
            other => panic!("expected DiscriminatorRegex, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_backup_failure_aborts_before_any_deletion() {
        let tmp = tempfile::tempdir().unwrap();

        let mut bucket = MockBucket::new();
        bucket.expect_list_objects().times(1).returning(|| {
            Ok(vec![
                object("versionableFile_2017-01-01.txt"),
                object("versionableFile_2017-01-02.txt"),
            ])
        });
        bucket
            .expect_download_to()
            .times(1)
            .returning(|_, _| Ok(()));
        bucket.expect_delete().never();

        let mut versioner = MockVersioner::new();
        versioner.expect_version().times(1).returning(|_, _, _| {
            Err(VersionerError::DuplicateDirectory {
                ns: NS.to_string(),
            })
        });

        let backup = subject(
            bucket,
            versioner,
            BackupConfig::new(NS).with_tmp_dir(tmp.path()),
            Arc::new(BufferedOutput::new()),
        )
        .with_select_filter(|objects| objects)
        .with_backup_filter(|objects| objects);

        let error = backup.run().await.unwrap_err();

        assert!(matches!(
            error,
            BackupError::Versioner(VersionerError::DuplicateDirectory { .. })
        ));
    }

    #[test]
    fn test_parse_filepath_with_directory() {
        let parts = parse_filepath("backups/dbdump_2017-01-01.sql.gz").unwrap();

        assert_eq!(parts.directory.as_deref(), Some("backups/"));
        assert_eq!(parts.stem, "dbdump");
        assert_eq!(parts.discriminator, "2017-01-01");
        assert_eq!(parts.extension, ".sql.gz");
    }

    #[test]
    fn test_parse_filepath_flat() {
        let parts = parse_filepath("versionableFile_2017-01-01.txt").unwrap();

        assert_eq!(parts.directory, None);
        assert_eq!(parts.stem, "versionableFile");
        assert_eq!(parts.discriminator, "2017-01-01");
        assert_eq!(parts.extension, ".txt");
    }

    #[test]
    fn test_parse_filepath_without_underscore() {
        assert!(parse_filepath("nounderscore.txt").is_none());
    }

    #[test]
    fn test_default_discriminator_regex_extracts_date() {
        let backup = BucketToDriveBackup::new(
            Arc::new(MockBucket::new()),
            Arc::new(MockVersioner::new()),
            BackupConfig::new(NS),
        )
        .unwrap();

        assert_eq!(
            backup
                .extract_discriminator("versionableFile_2017-01-01.txt")
                .unwrap(),
            "2017-01-01"
        );
    }
}
