use crate::error;

/// Fixed origin epoch of the power-law model: the Bitcoin genesis block day.
pub const GENESIS: chrono::NaiveDate = match chrono::NaiveDate::from_ymd_opt(2009, 1, 3) {
    Some(date) => date,
    None => panic!("genesis date is a valid calendar day"),
};

/// Format used for calendar days everywhere in the crate.
pub const DAY_FORMAT: &str = "%Y-%m-%d";

/// Configures a custom Rayon thread pool with specified size.
///
/// Used by the batch front end when `--threads` is given, so band generation
/// for several windows can be kept off the global pool.
///
/// # Arguments
/// * `num_threads` - Desired number of threads for the pool.
///
/// # Returns
/// * `Result<ThreadPool>` - Created thread pool or an error if creation fails.
pub fn configure_thread_pool(num_threads: usize) -> anyhow::Result<rayon::ThreadPool> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to build thread pool: {}", e))
}

/// Parses a calendar day in the format `%Y-%m-%d`.
///
/// Surrounding quotes and whitespace are tolerated, since exported price
/// files frequently quote their date column.
///
/// # Arguments
///
/// * `date_str` - A string slice such as `"2025-07-08"`.
///
/// # Returns
///
/// * `error::Result<NaiveDate>` - The parsed day, or `Error::InvalidDate`.
///
/// # Examples
///
/// ```
/// let day = btc_powerlaw::utils::parse_day("2025-07-08").unwrap();
/// assert_eq!(btc_powerlaw::utils::format_day(day), "2025-07-08");
/// ```
pub fn parse_day(date_str: &str) -> error::Result<chrono::NaiveDate> {
    let trimmed = date_str.trim().trim_matches('"');
    chrono::NaiveDate::parse_from_str(trimmed, DAY_FORMAT).map_err(|_| error::Error::InvalidDate {
        value: date_str.to_string(),
    })
}

/// Formats a calendar day as `YYYY-MM-DD`.
pub fn format_day(day: chrono::NaiveDate) -> String {
    day.format(DAY_FORMAT).to_string()
}

/// Signed number of whole days from `from` to `to`.
pub fn days_between(from: chrono::NaiveDate, to: chrono::NaiveDate) -> i64 {
    (to - from).num_days()
}

/// Signed day count from the genesis day to `day`; genesis itself is day 0.
pub fn days_since_genesis(day: chrono::NaiveDate) -> i64 {
    days_between(GENESIS, day)
}

/// Shifts `day` by a signed number of days, saturating at chrono's range.
pub fn add_days(day: chrono::NaiveDate, days: i64) -> chrono::NaiveDate {
    let shifted = if days >= 0 {
        day.checked_add_days(chrono::Days::new(days as u64))
    } else {
        day.checked_sub_days(chrono::Days::new(days.unsigned_abs()))
    };
    shifted.unwrap_or(if days >= 0 { chrono::NaiveDate::MAX } else { chrono::NaiveDate::MIN })
}

/// Milliseconds since the Unix epoch of `day` at 00:00:00 UTC.
///
/// This is the X coordinate of a day on a linear time axis.
pub fn epoch_millis(day: chrono::NaiveDate) -> i64 {
    day.and_time(chrono::NaiveTime::MIN).and_utc().timestamp_millis()
}

/// Inverse of [`epoch_millis`], truncating to the containing UTC day.
pub fn day_from_epoch_millis(millis: i64) -> Option<chrono::NaiveDate> {
    chrono::DateTime::from_timestamp_millis(millis).map(|dt| dt.date_naive())
}
