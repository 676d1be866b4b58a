use crate::utils;

/// A single raw observation: one calendar day and its price.
///
/// A price of `0.0` is the "no data" sentinel.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DailyPriceDatum {
    pub date: chrono::NaiveDate,
    pub price: f64,
}

impl DailyPriceDatum {
    pub fn new(date: chrono::NaiveDate, price: f64) -> Self {
        DailyPriceDatum { date, price }
    }
}

/// Day-offset index over a gap-free, ascending raw series.
///
/// Lookups are O(1): the position of a day is its offset from the first
/// observation. If the series breaks the one-point-per-day contract the
/// offset probe misses and a binary search by date is used instead.
#[derive(Debug, Clone, Copy)]
pub struct PriceIndex<'a> {
    series: &'a [DailyPriceDatum],
}

impl<'a> PriceIndex<'a> {
    pub fn new(series: &'a [DailyPriceDatum]) -> Self {
        PriceIndex { series }
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    pub fn first_date(&self) -> Option<chrono::NaiveDate> {
        self.series.first().map(|d| d.date)
    }

    pub fn last_date(&self) -> Option<chrono::NaiveDate> {
        self.series.last().map(|d| d.date)
    }

    /// Observation recorded for exactly `date`, if any.
    pub fn get(&self, date: chrono::NaiveDate) -> Option<&'a DailyPriceDatum> {
        let first = self.first_date()?;
        let offset = utils::days_between(first, date);
        if offset < 0 {
            return None;
        }
        if let Some(datum) = self.series.get(offset as usize) {
            if datum.date == date {
                return Some(datum);
            }
        }
        self.series
            .binary_search_by_key(&date, |d| d.date)
            .ok()
            .map(|i| &self.series[i])
    }

    /// Price for `date`, or the `0.0` placeholder when nothing was observed.
    pub fn price_or_placeholder(&self, date: chrono::NaiveDate) -> f64 {
        self.get(date).map_or(0.0, |d| d.price)
    }
}
