use crate::error;
use crate::utils;

/// Fraction by which one wheel step widens or narrows the window.
pub const ZOOM_STEP: f64 = 0.15;

/// Pinch gestures are damped to half their raw distance ratio.
pub const PINCH_DAMPING: f64 = 0.5;

/// Drag selections shorter than this are treated as clicks.
pub const MIN_SELECTION_DAYS: i64 = 30;

/// Start of the "all history" preset: the first day with a traded price.
pub const ALL_HISTORY_START: chrono::NaiveDate = match chrono::NaiveDate::from_ymd_opt(2010, 7, 18) {
    Some(date) => date,
    None => panic!("all-history start is a valid calendar day"),
};

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// The visible and analysed date span, `start < end`.
///
/// Independent of how much raw price data is available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
pub struct AnalysisWindow {
    start: chrono::NaiveDate,
    end: chrono::NaiveDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomDirection {
    In,
    Out,
}

impl AnalysisWindow {
    pub fn new(start: chrono::NaiveDate, end: chrono::NaiveDate) -> error::Result<Self> {
        if start >= end {
            return Err(error::Error::InvalidWindow { start, end });
        }
        Ok(AnalysisWindow { start, end })
    }

    /// Like [`AnalysisWindow::new`], but also rejects windows starting on or
    /// before genesis, where log-axis X coordinates turn non-positive.
    pub fn after_genesis(start: chrono::NaiveDate, end: chrono::NaiveDate) -> error::Result<Self> {
        if start <= utils::GENESIS {
            return Err(error::Error::BeforeGenesis { start });
        }
        Self::new(start, end)
    }

    /// Parses both edges from `YYYY-MM-DD` strings.
    pub fn parse(start: &str, end: &str) -> error::Result<Self> {
        Self::new(utils::parse_day(start)?, utils::parse_day(end)?)
    }

    pub fn start(&self) -> chrono::NaiveDate {
        self.start
    }

    pub fn end(&self) -> chrono::NaiveDate {
        self.end
    }

    /// Calendar days from start to end; always at least 1.
    pub fn days(&self) -> i64 {
        utils::days_between(self.start, self.end)
    }

    /// Whether `day` lies in `[start, end]`.
    pub fn contains(&self, day: chrono::NaiveDate) -> bool {
        day >= self.start && day <= self.end
    }

    fn start_millis(&self) -> f64 {
        utils::epoch_millis(self.start) as f64
    }

    fn range_millis(&self) -> f64 {
        self.days() as f64 * MILLIS_PER_DAY
    }

    pub fn midpoint(&self) -> chrono::NaiveDate {
        utils::add_days(self.start, self.days() / 2)
    }

    /// Builds a window from millisecond edges, truncating each to its day.
    /// Rejects windows that start on or before genesis or collapse to a day.
    fn from_millis(start: f64, end: f64) -> Option<Self> {
        let start = utils::day_from_epoch_millis(start.floor() as i64)?;
        let end = utils::day_from_epoch_millis(end.floor() as i64)?;
        if start <= utils::GENESIS {
            return None;
        }
        AnalysisWindow::new(start, end).ok()
    }

    /// Rescales the window by `factor` about its midpoint.
    fn rescale(&self, factor: f64) -> (f64, f64) {
        let range = self.range_millis();
        let mid = self.start_millis() + range / 2.0;
        let new_range = range * factor;
        (mid - new_range / 2.0, mid + new_range / 2.0)
    }

    /// One wheel step: `Out` widens the range by 15 %, `In` narrows it by 15 %.
    pub fn zoom(&self, direction: ZoomDirection) -> Option<Self> {
        let factor = match direction {
            ZoomDirection::Out => 1.0 + ZOOM_STEP,
            ZoomDirection::In => 1.0 - ZOOM_STEP,
        };
        let (start, end) = self.rescale(factor);
        Self::from_millis(start, end)
    }

    /// Shifts both edges by whole calendar months (negative pans back).
    pub fn pan(&self, months: i32) -> Option<Self> {
        let shift = |day: chrono::NaiveDate| {
            let step = chrono::Months::new(months.unsigned_abs());
            if months >= 0 { day.checked_add_months(step) } else { day.checked_sub_months(step) }
        };
        let start = shift(self.start)?;
        let end = shift(self.end)?;
        if start <= utils::GENESIS {
            return None;
        }
        AnalysisWindow::new(start, end).ok()
    }

    /// Two-finger gesture: damped zoom by the change in finger distance, then a
    /// pan by `pan_fraction` of the new range (positive moves later in time).
    pub fn pinch(&self, distance_ratio: f64, pan_fraction: f64) -> Option<Self> {
        if !distance_ratio.is_finite() || distance_ratio <= 0.0 || !pan_fraction.is_finite() {
            return None;
        }
        let damped = 1.0 + (distance_ratio - 1.0) * PINCH_DAMPING;
        if damped <= 0.0 {
            return None;
        }
        let (start, end) = self.rescale(1.0 / damped);
        let shift = (end - start) * pan_fraction;
        Self::from_millis(start + shift, end + shift)
    }

    /// Window spanned by a drag between two days, in either order. Selections
    /// of 30 days or less are ignored.
    pub fn select(a: chrono::NaiveDate, b: chrono::NaiveDate) -> Option<Self> {
        let (start, end) = if a < b { (a, b) } else { (b, a) };
        if utils::days_between(start, end) <= MIN_SELECTION_DAYS || start <= utils::GENESIS {
            return None;
        }
        AnalysisWindow::new(start, end).ok()
    }
}

/// Preset lookback periods ending at a given day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Period {
    Years(u32),
    All,
}

impl Period {
    /// Accepts `1y`, `5y`, `10y` ... and `all`.
    pub fn parse(value: &str) -> error::Result<Self> {
        let lowered = value.trim().to_lowercase();
        if lowered == "all" {
            return Ok(Period::All);
        }
        lowered
            .strip_suffix('y')
            .and_then(|n| n.parse::<u32>().ok())
            .filter(|n| *n > 0)
            .map(Period::Years)
            .ok_or_else(|| error::Error::InvalidPeriod { value: value.to_string() })
    }

    /// Short name, also used for exported file names.
    pub fn name(&self) -> String {
        match self {
            Period::Years(n) => format!("{}y", n),
            Period::All => "all".to_string(),
        }
    }

    /// Window of this period ending at `end`. Lookbacks reaching past the
    /// first traded price are clamped to [`ALL_HISTORY_START`].
    pub fn window_for(&self, end: chrono::NaiveDate) -> error::Result<AnalysisWindow> {
        let start = match self {
            Period::Years(n) => end
                .checked_sub_months(chrono::Months::new(n.saturating_mul(12)))
                .map_or(ALL_HISTORY_START, |start| start.max(ALL_HISTORY_START)),
            Period::All => ALL_HISTORY_START,
        };
        AnalysisWindow::after_genesis(start, end)
    }
}
