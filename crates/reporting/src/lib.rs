//! Aggregation of raw backend accounts into the admin reports.
//!
//! The crate is pure: it takes the account list returned by the backend and
//! produces role partitions, summary counts, filtered views and exportable
//! reports. Fetching the accounts is the caller's job.
//!
//! ```rust
//! use api_types::account::AccountRecord;
//! use reporting::Snapshot;
//!
//! let records = vec![AccountRecord {
//!     role: Some("user".to_string()),
//!     full_name: Some("Ann".to_string()),
//!     ..Default::default()
//! }];
//! let snapshot = Snapshot::build(&records, chrono_tz::UTC);
//! assert_eq!(snapshot.stats.total_users, 1);
//! assert_eq!(snapshot.users[0].city, "N/A");
//! ```

pub use error::ExportError;
pub use export::{ExportFormat, Report, ReportKind, export_stamp};
pub use filter::filter;
pub use record::{ACTIVE_STATUS, NormalizedRecord, PLACEHOLDER, format_joined};
pub use snapshot::{Snapshot, SummaryStats};

mod error;
mod export;
mod filter;
mod record;
mod snapshot;
