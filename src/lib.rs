pub mod aggregator;
pub mod cleaner;
pub mod error;
pub mod estimator;
pub mod output;
pub mod types;
pub mod util;
