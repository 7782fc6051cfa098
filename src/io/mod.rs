/// CSV export of year records.
pub mod export;
