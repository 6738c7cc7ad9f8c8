/// CSV export of result tables.
pub mod export;
/// CSV import of profile series.
pub mod profiles;
