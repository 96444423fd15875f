//! Workspace facade crate.
//!
//! Host projects can depend on `gdv-workspace` alone and reach every member
//! crate: the versioning core, the bucket migration tool, the API
//! connectors, and the desktop wiring, without listing each one.
//!
//! ```ignore
//! use gdv_workspace::{desktop::ReqwestHttpClient, drive::DriveConnector};
//! use gdv_workspace::versioner::Versioner;
//! use std::sync::Arc;
//!
//! let http = Arc::new(ReqwestHttpClient::new());
//! let store = Arc::new(DriveConnector::new(http, access_token));
//! let versioner = Versioner::new(store, drive_root_id);
//! ```

pub use bridge_desktop as desktop;
pub use bridge_traits as traits;
pub use core_backup as backup;
pub use core_runtime as runtime;
pub use core_versioner as versioner;
pub use provider_cloud_storage as cloud_storage;
pub use provider_google_drive as drive;
