//! Operator-facing message fragments
//!
//! Every versioner state transition narrates itself with one of these
//! constants so operators can correlate the output tail with a raised error.
//! Tests assert on them; treat the wording as part of the contract.

pub const AUTHORISATION_FAIL: &str =
    "Authorisation incorrect. See docs for directions on setting up the client. ";
pub const DRIVE_CANNOT_CREATE_DIR: &str = "Unable to create namespace directory. ";
pub const DRIVE_CANNOT_CREATE_VERSIONED_FILE: &str = "Unable to create versioned file. ";
pub const DRIVE_CANNOT_UPDATE_VERSIONED_FILE: &str = "Unable to update versioned file. ";
pub const DRIVE_ROOT_NOT_FOUND: &str =
    "Unable to locate the root directory. This is required for use. \
     Use the Drive web interface to find the ID of a writable directory. ";
pub const PARENT_NOT_A_FOLDER: &str =
    "The parent of the namespace directory is not a folder. Check the configured root ID. ";
pub const FIELD_NOT_WRITABLE: &str = "A metadata field was rejected as not writable. ";
pub const VERSIONABLE_FILE_NOT_READABLE: &str = "The file to version is not readable. ";
pub const DUPLICATE_NAMESPACE_DIRECTORY: &str =
    "Found multiple directories for the namespace. This is bad. ";
pub const DUPLICATE_VERSIONED_FILE: &str =
    "Found multiple files for the versioned file. This is bad. ";
pub const DRIVE_CANNOT_LIST_VERSIONED_FILE: &str =
    "The versions cannot be listed. This may be due to a missing versioned file, \
     namespace directory or incorrect root. ";
pub const UNKNOWN_REMOTE_ERROR: &str =
    "The remote store returned an unrecognised error reason. ";

pub const DEBUG_NS_DIR_CREATED: &str = "Namespace directory has been created. ";
pub const DEBUG_NS_DIR_FOUND: &str = "Namespace directory already existent. ";
pub const DEBUG_VERSIONED_FILE_CREATED: &str = "The versioned file has been created. ";
pub const DEBUG_VERSIONED_FILE_FOUND: &str = "The versioned file already existent. ";
pub const DEBUG_VERSION_ALREADY_EXISTS: &str =
    "The version of that file has already been saved. ";
pub const DEBUG_UPDATING_REVISION: &str = "Updating specific revision. ";
pub const DEBUG_LISTING_VERSIONS: &str = "Querying version list for file. ";
pub const DEBUG_NEW_VERSION_CREATED: &str =
    "New version of the versioned file has been created. ";
pub const DEBUG_CACHE_HIT: &str = "Cache hit. ";
