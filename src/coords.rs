use crate::bands;
use crate::model;
use crate::sampling;
use crate::ticks;
use crate::utils;
use crate::window;

/// Lowest Y bound allowed on a logarithmic price axis.
pub const MIN_LOG_PRICE: f64 = 0.01;

/// Axis modes and band visibility chosen by the user.
///
/// Serialisable so callers can keep it in whatever preference store they use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChartSettings {
    pub use_x_log: bool,
    pub use_y_log: bool,
    pub show_power_law_plot: bool,
    pub show_outer_band: bool,
    pub show_inner_band: bool,
    pub show_price_plot: bool,
    pub show_halving_epochs: bool,
}

impl Default for ChartSettings {
    fn default() -> Self {
        ChartSettings {
            use_x_log: false,
            use_y_log: false,
            show_power_law_plot: false,
            show_outer_band: false,
            show_inner_band: false,
            show_price_plot: true,
            show_halving_epochs: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Setting {
    XLog,
    YLog,
    PowerLawPlot,
    OuterBand,
    InnerBand,
    PricePlot,
    HalvingEpochs,
}

impl ChartSettings {
    /// Flips one setting. Hiding the power-law plot hides both bands too.
    pub fn toggle(mut self, setting: Setting) -> Self {
        match setting {
            Setting::XLog => self.use_x_log = !self.use_x_log,
            Setting::YLog => self.use_y_log = !self.use_y_log,
            Setting::PowerLawPlot => {
                self.show_power_law_plot = !self.show_power_law_plot;
                if !self.show_power_law_plot {
                    self.show_inner_band = false;
                    self.show_outer_band = false;
                }
            }
            Setting::OuterBand => self.show_outer_band = !self.show_outer_band,
            Setting::InnerBand => self.show_inner_band = !self.show_inner_band,
            Setting::PricePlot => self.show_price_plot = !self.show_price_plot,
            Setting::HalvingEpochs => self.show_halving_epochs = !self.show_halving_epochs,
        }
        self
    }

    pub fn is_enabled(&self, kind: bands::BandKind) -> bool {
        match kind {
            bands::BandKind::Price => self.show_price_plot,
            bands::BandKind::PowerLaw => self.show_power_law_plot,
            bands::BandKind::PosOneSigma | bands::BandKind::NegOneSigma => self.show_inner_band,
            bands::BandKind::PosTwoSigma | bands::BandKind::NegTwoSigma => self.show_outer_band,
        }
    }

    /// Sample pacing matching the X axis.
    pub fn sampling_mode(&self) -> sampling::SamplingMode {
        sampling::SamplingMode::for_axis(self.use_x_log)
    }
}

/// A point in plot space. `y` is `None` where there is no positive price.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct PlotPoint {
    pub x: f64,
    pub y: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct PlotSeries {
    pub kind: bands::BandKind,
    pub points: Vec<PlotPoint>,
}

/// Axis extents. `max_y == None` leaves the upper Y bound to the renderer.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct AxisBounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: Option<f64>,
}

/// Everything a renderer needs for one pass.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct PlotData {
    pub series: Vec<PlotSeries>,
    pub bounds: AxisBounds,
    pub x_ticks: Vec<f64>,
    /// Empty for a linear Y axis, where the renderer picks its own ticks.
    pub y_ticks: Vec<f64>,
    pub epochs: Vec<ticks::EpochRange>,
}

/// X coordinate of `date`: days since genesis on a log axis, epoch
/// milliseconds on a linear one.
pub fn x_coordinate(model: &model::PowerLawModel, window: &window::AnalysisWindow, date: chrono::NaiveDate, log_x: bool) -> f64 {
    if log_x {
        let start_offset = model.days_since_genesis(window.start());
        (start_offset + utils::days_between(window.start(), date)) as f64
    } else {
        utils::epoch_millis(date) as f64
    }
}

/// Y coordinate of a price; non-positive prices have none so log renderers
/// can skip them.
pub fn y_coordinate(price: f64) -> Option<f64> {
    if price > 0.0 { Some(price) } else { None }
}

/// Converts generated bands into plot space for the enabled series and
/// derives axis bounds, ticks and halving ranges.
///
/// On a log Y axis points without a Y value are dropped altogether.
pub fn plot_data(
    model: &model::PowerLawModel,
    bands: &bands::PriceBandSeries,
    window: &window::AnalysisWindow,
    settings: &ChartSettings,
) -> PlotData {
    let log_x = settings.use_x_log;
    let mut highest = 0f64;
    let mut lowest: Option<f64> = None;

    let series: Vec<PlotSeries> = bands
        .iter()
        .filter(|(kind, _)| settings.is_enabled(*kind))
        .map(|(kind, data)| {
            let points = data
                .iter()
                .inspect(|d| {
                    highest = highest.max(d.price);
                    if d.price > 0.0 {
                        lowest = Some(lowest.map_or(d.price, |l| l.min(d.price)));
                    }
                })
                .map(|d| PlotPoint {
                    x: x_coordinate(model, window, d.date, log_x),
                    y: y_coordinate(d.price),
                })
                .filter(|p| !settings.use_y_log || p.y.is_some())
                .collect();
            PlotSeries { kind, points }
        })
        .collect();

    let min_x = x_coordinate(model, window, window.start(), log_x);
    let max_x = x_coordinate(model, window, window.end(), log_x);
    let bounds = if settings.use_y_log {
        let min_y = lowest.map_or(MIN_LOG_PRICE, |l| l.max(MIN_LOG_PRICE));
        AxisBounds {
            min_x,
            max_x,
            min_y,
            max_y: Some(highest.max(min_y)),
        }
    } else {
        AxisBounds {
            min_x,
            max_x,
            min_y: 0.0,
            max_y: None,
        }
    };

    let y_ticks = match bounds.max_y {
        Some(max_y) => ticks::log_y_ticks(bounds.min_y, max_y),
        None => Vec::new(),
    };
    let epochs = if settings.show_halving_epochs {
        ticks::epoch_ranges(min_x, max_x, |d| x_coordinate(model, window, d, log_x))
    } else {
        Vec::new()
    };

    PlotData {
        series,
        bounds,
        x_ticks: ticks::x_ticks(min_x, max_x, log_x),
        y_ticks,
        epochs,
    }
}
