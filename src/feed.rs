use crate::error;
use crate::index;
use crate::utils;

/// Represents a single row of an input price file.
///
/// Exports use either lower-case or capitalised headers; an empty price cell
/// means no trade was recorded that day.
#[derive(Debug, serde::Deserialize)]
struct CsvRecord {
    #[serde(alias = "Date", alias = "DATE")]
    date: String,
    #[serde(alias = "Price", alias = "PRICE", alias = "close", alias = "Close")]
    price: Option<f64>,
}

/// Reads a `date,price` CSV into an ascending daily series.
///
/// Dates must be strictly increasing; gaps are allowed here and repaired by
/// [`fill_gaps`].
///
/// # Arguments
/// * `reader` - Any CSV source with a header row.
///
/// # Returns
/// * `error::Result<Vec<DailyPriceDatum>>` - Parsed observations.
///
/// # Errors
/// * `Error::Csv` if a row cannot be deserialized.
/// * `Error::InvalidDate` for malformed dates.
/// * `Error::UnsortedSeries` for out-of-order or duplicate days.
pub fn read_prices<R: std::io::Read>(reader: R) -> error::Result<Vec<index::DailyPriceDatum>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut series: Vec<index::DailyPriceDatum> = Vec::new();
    for (row, result) in reader.deserialize::<CsvRecord>().enumerate() {
        let record = result?;
        let date = utils::parse_day(&record.date)?;
        if let Some(previous) = series.last() {
            if date <= previous.date {
                return Err(error::Error::UnsortedSeries {
                    row: row + 1,
                    previous: previous.date,
                    date,
                });
            }
        }
        series.push(index::DailyPriceDatum::new(date, record.price.unwrap_or(0.0).max(0.0)));
    }
    Ok(series)
}

/// Reads a price CSV from disk. See [`read_prices`].
pub fn read_price_csv<P: AsRef<std::path::Path>>(path: P) -> error::Result<Vec<index::DailyPriceDatum>> {
    let file = std::fs::File::open(path)?;
    read_prices(std::io::BufReader::new(file))
}

/// Forward-fills missing calendar days with the last known price so the
/// series holds exactly one point per day.
///
/// Each repaired gap is logged; the result is what the band generator
/// expects as raw input.
pub fn fill_gaps(series: &[index::DailyPriceDatum]) -> Vec<index::DailyPriceDatum> {
    let Some(first) = series.first() else {
        return Vec::new();
    };
    let mut filled = Vec::with_capacity(series.len());
    filled.push(*first);

    for datum in &series[1..] {
        let Some(last) = filled.last().copied() else {
            break;
        };
        let gap = utils::days_between(last.date, datum.date);
        if gap > 1 {
            tracing::warn!(
                "missing data between {} and {}, forward-filling {} day(s)",
                utils::format_day(last.date),
                utils::format_day(datum.date),
                gap - 1
            );
            for offset in 1..gap {
                filled.push(index::DailyPriceDatum::new(utils::add_days(last.date, offset), last.price));
            }
        }
        filled.push(*datum);
    }
    filled
}

/// Reads and gap-fills a price series from either a CSV file or a `.bin`
/// snapshot previously written by [`save_snapshot`].
pub fn load_series<P: AsRef<std::path::Path>>(path: P) -> error::Result<Vec<index::DailyPriceDatum>> {
    let path = path.as_ref();
    let is_snapshot = path.extension().is_some_and(|ext| ext == "bin");
    let raw = if is_snapshot {
        load_snapshot(path)?
    } else {
        read_price_csv(path)?
    };
    let filled = fill_gaps(&raw);
    tracing::info!(
        rows = raw.len(),
        days = filled.len(),
        "loaded price series from {}",
        path.display()
    );
    Ok(filled)
}

/// Serializes a series with `bincode` for fast reloads.
pub fn save_snapshot<P: AsRef<std::path::Path>>(series: &[index::DailyPriceDatum], path: P) -> error::Result<()> {
    let data = bincode::serialize(series)?;
    std::fs::write(path, data)?;
    Ok(())
}

/// Loads a `bincode` snapshot through a read-only memory map.
pub fn load_snapshot<P: AsRef<std::path::Path>>(path: P) -> error::Result<Vec<index::DailyPriceDatum>> {
    let file = std::fs::File::open(path)?;
    // SAFETY: the map is read-only and dropped before this function returns;
    // snapshots are written whole by `save_snapshot` and not modified in place.
    let mmap = unsafe { memmap2::Mmap::map(&file)? };
    let series = bincode::deserialize(&mmap)?;
    Ok(series)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(s: &str) -> chrono::NaiveDate {
        utils::parse_day(s).unwrap()
    }

    #[test]
    fn reads_rows_and_blank_prices() {
        let csv = "date,price\n2020-01-01,7200.5\n\"2020-01-02\",\n2020-01-03, 7300\n";
        let series = read_prices(csv.as_bytes()).unwrap();
        assert_eq!(series.len(), 3);
        assert_eq!(series[1], index::DailyPriceDatum::new(day("2020-01-02"), 0.0));
        assert_eq!(series[2].price, 7300.0);
    }

    #[test]
    fn accepts_capitalised_headers() {
        let csv = "Date,Close\n2020-01-01,1\n";
        let series = read_prices(csv.as_bytes()).unwrap();
        assert_eq!(series[0].price, 1.0);
    }

    #[test]
    fn rejects_unsorted_and_duplicate_days() {
        let csv = "date,price\n2020-01-02,1\n2020-01-01,2\n";
        assert!(matches!(
            read_prices(csv.as_bytes()),
            Err(error::Error::UnsortedSeries { row: 2, .. })
        ));
        let csv = "date,price\n2020-01-02,1\n2020-01-02,2\n";
        assert!(read_prices(csv.as_bytes()).is_err());
    }

    #[test]
    fn rejects_bad_dates() {
        let csv = "date,price\n01/02/2020,1\n";
        assert!(matches!(read_prices(csv.as_bytes()), Err(error::Error::InvalidDate { .. })));
    }

    #[test]
    fn forward_fills_missing_days() {
        let series = vec![
            index::DailyPriceDatum::new(day("2020-01-01"), 1.0),
            index::DailyPriceDatum::new(day("2020-01-04"), 4.0),
            index::DailyPriceDatum::new(day("2020-01-05"), 5.0),
        ];
        let filled = fill_gaps(&series);
        let prices: Vec<f64> = filled.iter().map(|d| d.price).collect();
        assert_eq!(prices, vec![1.0, 1.0, 1.0, 4.0, 5.0]);
        for pair in filled.windows(2) {
            assert_eq!(utils::days_between(pair[0].date, pair[1].date), 1);
        }
        assert!(fill_gaps(&[]).is_empty());
    }
}
