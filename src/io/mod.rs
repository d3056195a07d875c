/// CSV export of assessment results.
pub mod export;
