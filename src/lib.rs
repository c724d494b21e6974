pub mod error;
pub mod header;
pub mod record;
pub mod stars;
pub mod snapshots;
pub mod convert;
pub mod launcher;
pub mod render;

pub use error::FormatError;
pub use header::{Header, HEADER_SIZE};
pub use record::{StarRecord, RECORD_SIZE};
pub use stars::Stars;
pub use snapshots::{ErrorPolicy, SnapshotSet};
pub use launcher::{Model, RunConfig, RunStatus};
