pub mod credentials;
pub mod report;

pub use credentials::{CredentialBundle, PlatformCredentialSet};
pub use report::{PlatformPostId, SyncFailureKind, SyncOutcome, SyncReport, SyncResult};
