use crate::index;
use crate::model;
use crate::sampling;
use crate::utils;
use crate::window;

/// The six series produced for a chart: the observed price, the power-law
/// center, and the four sigma envelopes around it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BandKind {
    PosTwoSigma,
    PosOneSigma,
    Price,
    PowerLaw,
    NegOneSigma,
    NegTwoSigma,
}

impl BandKind {
    /// Canonical order, top band first.
    pub const ALL: [BandKind; 6] = [
        BandKind::PosTwoSigma,
        BandKind::PosOneSigma,
        BandKind::Price,
        BandKind::PowerLaw,
        BandKind::NegOneSigma,
        BandKind::NegTwoSigma,
    ];

    fn slot(self) -> usize {
        match self {
            BandKind::PosTwoSigma => 0,
            BandKind::PosOneSigma => 1,
            BandKind::Price => 2,
            BandKind::PowerLaw => 3,
            BandKind::NegOneSigma => 4,
            BandKind::NegTwoSigma => 5,
        }
    }

    /// Stable identifier used in exported files.
    pub fn id(self) -> &'static str {
        match self {
            BandKind::PosTwoSigma => "posTwoSigma",
            BandKind::PosOneSigma => "posOneSigma",
            BandKind::Price => "price",
            BandKind::PowerLaw => "powerLaw",
            BandKind::NegOneSigma => "negOneSigma",
            BandKind::NegTwoSigma => "negTwoSigma",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            BandKind::PosTwoSigma => "+2σ",
            BandKind::PosOneSigma => "+σ",
            BandKind::Price => "Actual Price",
            BandKind::PowerLaw => "Power Law",
            BandKind::NegOneSigma => "-1σ",
            BandKind::NegTwoSigma => "-2σ",
        }
    }

    /// Multiple of the residual deviation this band sits at. The price and
    /// center series sit at 0.
    pub fn sigma_multiple(self) -> f64 {
        match self {
            BandKind::PosTwoSigma => 2.0,
            BandKind::PosOneSigma => 1.0,
            BandKind::Price | BandKind::PowerLaw => 0.0,
            BandKind::NegOneSigma => -1.0,
            BandKind::NegTwoSigma => -2.0,
        }
    }
}

/// Current price reported by the live feed, stamped with the caller's
/// notion of "today".
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LivePrice {
    pub date: chrono::NaiveDate,
    pub price: f64,
}

/// Inputs of one band generation pass.
#[derive(Debug, Clone, Copy)]
pub struct BandRequest {
    pub window: window::AnalysisWindow,
    pub live: Option<LivePrice>,
    pub mode: sampling::SamplingMode,
    /// Sampling budget; typical values are 500 to 900.
    pub max_points: usize,
}

impl BandRequest {
    pub fn new(window: window::AnalysisWindow, mode: sampling::SamplingMode, max_points: usize) -> Self {
        BandRequest {
            window,
            live: None,
            mode,
            max_points,
        }
    }

    pub fn with_live_price(mut self, live: LivePrice) -> Self {
        self.live = Some(live);
        self
    }
}

/// Index-aligned output of [`generate_price_bands`].
///
/// Every series has the same length and the same date at each position. The
/// price series uses `0.0` where no observation exists.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceBandSeries {
    series: [Vec<index::DailyPriceDatum>; 6],
}

impl PriceBandSeries {
    pub fn get(&self, kind: BandKind) -> &[index::DailyPriceDatum] {
        &self.series[kind.slot()]
    }

    /// Series in canonical [`BandKind::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = (BandKind, &[index::DailyPriceDatum])> {
        BandKind::ALL.into_iter().map(move |kind| (kind, self.get(kind)))
    }

    /// Number of sampled dates.
    pub fn len(&self) -> usize {
        self.get(BandKind::Price).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn dates(&self) -> impl Iterator<Item = chrono::NaiveDate> + '_ {
        self.get(BandKind::Price).iter().map(|d| d.date)
    }

    fn point(model: &model::PowerLawModel, kind: BandKind, date: chrono::NaiveDate, price: f64) -> index::DailyPriceDatum {
        let value = match kind {
            BandKind::Price => price,
            _ => model.band_price(kind, model.days_since_genesis(date) as f64),
        };
        index::DailyPriceDatum::new(date, value)
    }

    fn push_sample(&mut self, model: &model::PowerLawModel, date: chrono::NaiveDate, price: f64) {
        for kind in BandKind::ALL {
            let point = Self::point(model, kind, date, price);
            self.series[kind.slot()].push(point);
        }
    }

    /// Makes `live` the price at its date, inserting an aligned sample into
    /// every series when the date was not sampled.
    fn apply_live_price(&mut self, model: &model::PowerLawModel, live: LivePrice) {
        let position = self.series[BandKind::Price.slot()].binary_search_by_key(&live.date, |d| d.date);
        match position {
            Ok(i) => self.series[BandKind::Price.slot()][i].price = live.price,
            Err(i) => {
                for kind in BandKind::ALL {
                    let point = Self::point(model, kind, live.date, live.price);
                    self.series[kind.slot()].insert(i, point);
                }
            }
        }
    }
}

/// Generates the six aligned price band series for a window.
///
/// Steps:
/// 1. Picks `min(max_points, days from genesis to end)` sample offsets,
///    paced linearly or power-scaled.
/// 2. Rounds each offset to a calendar day, dropping repeats and stopping
///    past the window end.
/// 3. Before each regular sample, inserts the first or last raw observation
///    if it falls strictly inside the gap since the previous sample.
/// 4. Looks up the observed price of each sampled day (placeholder `0.0`
///    when absent) and evaluates the model bands at it.
/// 5. Patches or inserts the live price when its date lies in the window.
///
/// Cost is bounded by the sampling budget, not by the length of `raw`.
/// An empty `raw` series yields empty bands.
///
/// # Arguments
/// * `model` - Power-law constants.
/// * `request` - Window, sampling mode and budget, optional live price.
/// * `raw` - Ascending, gap-free daily observations.
///
/// # Returns
/// * `PriceBandSeries` - Six equal-length, date-aligned series.
pub fn generate_price_bands(
    model: &model::PowerLawModel,
    request: &BandRequest,
    raw: &[index::DailyPriceDatum],
) -> PriceBandSeries {
    let mut bands = PriceBandSeries::default();
    let prices = index::PriceIndex::new(raw);
    let (Some(first_raw), Some(last_raw)) = (prices.first_date(), prices.last_date()) else {
        tracing::debug!("no raw prices, returning empty bands");
        return bands;
    };

    let start = request.window.start();
    let end = request.window.end();
    let num_points = sampling::point_budget(request.max_points, model.days_since_genesis(end));
    let offsets = sampling::sample_offsets(num_points, request.window.days(), request.mode);

    let mut boundaries = vec![first_raw];
    if last_raw != first_raw {
        boundaries.push(last_raw);
    }

    let mut previous: Option<chrono::NaiveDate> = None;
    for offset in offsets {
        let current = utils::add_days(start, offset.round() as i64);
        if previous == Some(current) {
            continue;
        }

        if let Some(prev) = previous {
            for &boundary in &boundaries {
                if boundary > prev && boundary < current && boundary <= end {
                    bands.push_sample(model, boundary, prices.price_or_placeholder(boundary));
                }
            }
        }
        previous = Some(current);

        if current > end {
            break;
        }
        bands.push_sample(model, current, prices.price_or_placeholder(current));
    }

    if let Some(live) = request.live {
        if live.price > 0.0 && request.window.contains(live.date) {
            bands.apply_live_price(model, live);
        }
    }

    tracing::debug!(
        mode = ?request.mode,
        budget = num_points,
        samples = bands.len(),
        "generated price bands for {}..{}",
        utils::format_day(start),
        utils::format_day(end)
    );
    bands
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(s: &str) -> chrono::NaiveDate {
        utils::parse_day(s).unwrap()
    }

    fn flat_series(start: &str, days: i64, price: f64) -> Vec<index::DailyPriceDatum> {
        let start = day(start);
        (0..days)
            .map(|i| index::DailyPriceDatum::new(utils::add_days(start, i), price))
            .collect()
    }

    fn request(start: &str, end: &str, mode: sampling::SamplingMode, max_points: usize) -> BandRequest {
        let window = window::AnalysisWindow::new(day(start), day(end)).unwrap();
        BandRequest::new(window, mode, max_points)
    }

    #[test]
    fn band_kind_ids_and_labels() {
        assert_eq!(BandKind::PowerLaw.id(), "powerLaw");
        assert_eq!(BandKind::PosOneSigma.label(), "+σ");
        assert_eq!(BandKind::ALL.len(), 6);
    }

    #[test]
    fn price_series_uses_placeholders_outside_raw_data() {
        let raw = flat_series("2020-01-05", 3, 7.0);
        let bands = generate_price_bands(
            &model::PowerLawModel::default(),
            &request("2020-01-01", "2020-01-10", sampling::SamplingMode::Linear, 10),
            &raw,
        );
        let prices: Vec<f64> = bands.get(BandKind::Price).iter().map(|d| d.price).collect();
        assert_eq!(prices, vec![0.0, 0.0, 0.0, 0.0, 7.0, 7.0, 7.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn inserts_raw_boundaries_skipped_by_sparse_sampling() {
        let raw = flat_series("2020-01-04", 4, 3.0);
        // Three samples over ten days land on the 1st, the 6th and the 11th.
        let bands = generate_price_bands(
            &model::PowerLawModel::default(),
            &request("2020-01-01", "2020-01-11", sampling::SamplingMode::Linear, 3),
            &raw,
        );
        let dates: Vec<_> = bands.dates().collect();
        assert_eq!(
            dates,
            vec![day("2020-01-01"), day("2020-01-04"), day("2020-01-06"), day("2020-01-07"), day("2020-01-11")]
        );
        let prices: Vec<f64> = bands.get(BandKind::Price).iter().map(|d| d.price).collect();
        assert_eq!(prices, vec![0.0, 3.0, 3.0, 3.0, 0.0]);
    }

    #[test]
    fn live_price_patches_existing_sample() {
        let raw = flat_series("2020-01-01", 10, 100.0);
        let live = LivePrice { date: day("2020-01-10"), price: 50_000.0 };
        let bands = generate_price_bands(
            &model::PowerLawModel::default(),
            &request("2020-01-01", "2020-01-10", sampling::SamplingMode::Linear, 10).with_live_price(live),
            &raw,
        );
        assert_eq!(bands.len(), 10);
        assert_eq!(bands.get(BandKind::Price)[9].price, 50_000.0);
    }

    #[test]
    fn live_price_outside_window_is_ignored() {
        let raw = flat_series("2020-01-01", 10, 100.0);
        let live = LivePrice { date: day("2021-01-01"), price: 50_000.0 };
        let bands = generate_price_bands(
            &model::PowerLawModel::default(),
            &request("2020-01-01", "2020-01-10", sampling::SamplingMode::Linear, 10).with_live_price(live),
            &raw,
        );
        assert!(bands.get(BandKind::Price).iter().all(|d| d.price == 100.0));
    }

    #[test]
    fn empty_raw_series_gives_empty_bands() {
        let bands = generate_price_bands(
            &model::PowerLawModel::default(),
            &request("2020-01-01", "2020-01-10", sampling::SamplingMode::Linear, 10),
            &[],
        );
        assert!(bands.is_empty());
        assert!(bands.iter().all(|(_, series)| series.is_empty()));
    }
}
