use crate::utils;

/// Closed-form power-law price model fitted offline by log-log regression of
/// price against days since genesis.
///
/// The constants are configuration, not state: every evaluation receives the
/// model explicitly and nothing is memoized between calls.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PowerLawModel {
    /// `a` in `price = a * days^b`. Must be positive.
    pub intercept: f64,
    /// `b` in `price = a * days^b`.
    pub slope: f64,
    /// Standard deviation of the log residuals. Must be positive.
    pub std_residuals: f64,
    /// Day index 0 of the model.
    pub genesis: chrono::NaiveDate,
}

impl Default for PowerLawModel {
    fn default() -> Self {
        PowerLawModel {
            intercept: 2.777e-17,
            slope: 5.71,
            std_residuals: 0.7305045048910941,
            genesis: utils::GENESIS,
        }
    }
}

impl PowerLawModel {
    /// Replaces the fitted constants, keeping the genesis day.
    pub fn with_constants(intercept: f64, slope: f64, std_residuals: f64) -> Self {
        PowerLawModel {
            intercept,
            slope,
            std_residuals,
            ..Default::default()
        }
    }

    /// Whole days from the model's genesis to `day`.
    pub fn days_since_genesis(&self, day: chrono::NaiveDate) -> i64 {
        utils::days_between(self.genesis, day)
    }

    /// Center of the model, `a * days^b`. Non-positive day counts evaluate to 0.
    pub fn power_law_price(&self, days: f64) -> f64 {
        if days <= 0.0 {
            return 0.0;
        }
        self.intercept * days.powf(self.slope)
    }

    /// Natural log of the trend line, `b * ln(days) + ln(a)`.
    pub fn log_trend(&self, days: f64) -> f64 {
        self.slope * days.ln() + self.intercept.ln()
    }

    /// Price `k` standard deviations away from the trend, in log space.
    pub fn sigma_price(&self, days: f64, k: f64) -> f64 {
        if days <= 0.0 {
            return 0.0;
        }
        (self.log_trend(days) + k * self.std_residuals).exp()
    }

    /// Evaluates `kind` at `days` since genesis. `BandKind::Price` has no
    /// model value and yields 0.
    pub fn band_price(&self, kind: crate::bands::BandKind, days: f64) -> f64 {
        use crate::bands::BandKind;
        match kind {
            BandKind::Price => 0.0,
            BandKind::PowerLaw => self.power_law_price(days),
            band => self.sigma_price(days, band.sigma_multiple()),
        }
    }
}
