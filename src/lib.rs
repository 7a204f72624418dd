// Ledger Datasource - Core Library
// Query engine over an in-memory ledger, plus the HTTP surface for dashboards

pub mod ledger;
pub mod source;
pub mod index;   // Account Index Builder
pub mod series;  // Time-Series Aggregator
pub mod protocol;

#[cfg(feature = "server")]
pub mod api;
#[cfg(feature = "server")]
pub mod config;

// Re-export commonly used types
pub use ledger::{Ledger, LedgerError, Posting, Transaction, ACCOUNT_SEPARATOR};
pub use source::read_with_includes;
pub use index::{build_index, AccountIndex};
pub use series::{aggregate, fold_transaction, in_open_range, query, DataPoint, TimeSeries};
pub use protocol::{QueryRange, QueryRequest, QueryTarget, TagKey, TAG_KEYS};

#[cfg(feature = "server")]
pub use api::{router, AppState};
#[cfg(feature = "server")]
pub use config::Config;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
