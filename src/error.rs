/// Errors surfaced at the edges of the crate: ingestion, snapshots, and
/// user-supplied windows. The band and coordinate math itself never fails.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid analysis window: start {start} must be before end {end}")]
    InvalidWindow {
        start: chrono::NaiveDate,
        end: chrono::NaiveDate,
    },

    #[error("analysis window must start after genesis (2009-01-03), got {start}")]
    BeforeGenesis { start: chrono::NaiveDate },

    #[error("invalid date '{value}': expected YYYY-MM-DD")]
    InvalidDate { value: String },

    #[error("invalid period '{value}': expected e.g. 1y, 5y, 10y or all")]
    InvalidPeriod { value: String },

    #[error("price series is not strictly ascending at row {row}: {date} follows {previous}")]
    UnsortedSeries {
        row: usize,
        previous: chrono::NaiveDate,
        date: chrono::NaiveDate,
    },

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("snapshot error: {0}")]
    Snapshot(#[from] bincode::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
