// Check engine: thresholds, filters, result tree and output

pub mod filter;
pub mod overall;
pub mod perfdata;
pub mod result;
pub mod threshold;

// Re-export commonly used items
pub use filter::{FilterOptions, IncludeExclude, MatchError};
pub use overall::Overall;
pub use perfdata::{PerfValue, Perfdata};
pub use result::{ResultNode, Status};
pub use threshold::{Threshold, ThresholdError, Thresholds};
