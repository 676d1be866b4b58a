use crate::bands;
use crate::coords;
use crate::export;
use crate::index;
use crate::model;
use crate::window;

use anyhow::Context;
use rayon::prelude::*;

/// A named window to render, e.g. a `5y` preset or a custom range.
#[derive(Debug, Clone)]
pub struct WindowJob {
    pub name: String,
    pub window: window::AnalysisWindow,
}

/// Settings shared by every job of a batch.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    pub model: model::PowerLawModel,
    pub settings: coords::ChartSettings,
    pub max_points: usize,
    pub live: Option<bands::LivePrice>,
    pub output_dir: std::path::PathBuf,
}

/// Result of one rendered window.
#[derive(Debug, Clone)]
pub struct WindowSummary {
    pub name: String,
    pub samples: usize,
    pub rows: usize,
    pub path: std::path::PathBuf,
    /// `<name>_axes.csv`: ticks, plus halving epochs when enabled.
    pub axes_path: std::path::PathBuf,
    pub plot: coords::PlotData,
}

/// Generates bands, maps them to plot space and writes `<name>.csv` and
/// `<name>_axes.csv` for a single window.
pub fn process_window(
    job: &WindowJob,
    raw: &[index::DailyPriceDatum],
    config: &BatchConfig,
) -> anyhow::Result<WindowSummary> {
    let mut request = bands::BandRequest::new(job.window, config.settings.sampling_mode(), config.max_points);
    if let Some(live) = config.live {
        request = request.with_live_price(live);
    }
    let price_bands = bands::generate_price_bands(&config.model, &request, raw);
    let plot = coords::plot_data(&config.model, &price_bands, &job.window, &config.settings);

    let path = config.output_dir.join(format!("{}.csv", job.name));
    let rows = export::write_plot_csv(&plot, &path)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    let axes_path = config.output_dir.join(format!("{}_axes.csv", job.name));
    export::write_axes_csv(&plot, &axes_path)
        .with_context(|| format!("Failed to write {}", axes_path.display()))?;

    Ok(WindowSummary {
        name: job.name.clone(),
        samples: price_bands.len(),
        rows,
        path,
        axes_path,
        plot,
    })
}

/// Renders all windows in parallel on the current Rayon pool, tracking
/// progress with an `indicatif` bar. Summaries keep the order of `jobs`.
///
/// # Arguments
/// * `jobs` - Windows to render.
/// * `raw` - Gap-filled daily price series shared by every job.
/// * `config` - Model, chart settings, sampling budget and output directory.
///
/// # Returns
/// * `anyhow::Result<Vec<WindowSummary>>` - One summary per job, or the first error.
pub fn process_windows(
    jobs: &[WindowJob],
    raw: &[index::DailyPriceDatum],
    config: &BatchConfig,
) -> anyhow::Result<Vec<WindowSummary>> {
    let pb = indicatif::ProgressBar::new(jobs.len() as u64);
    pb.set_style(
        indicatif::ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .context("Invalid progress bar template")?
            .progress_chars("#>-"),
    );

    let summaries = jobs
        .par_iter()
        .map(|job| {
            let summary = process_window(job, raw, config);
            pb.set_message(job.name.clone());
            pb.inc(1);
            summary
        })
        .collect::<anyhow::Result<Vec<_>>>();

    pb.finish_with_message("done");
    summaries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils;

    #[test]
    fn renders_each_window_to_its_own_file() {
        let dir = tempfile::tempdir().unwrap();
        let start = utils::parse_day("2020-01-01").unwrap();
        let raw: Vec<_> = (0..400)
            .map(|i| index::DailyPriceDatum::new(utils::add_days(start, i), 8000.0 + i as f64))
            .collect();
        let jobs = vec![
            WindowJob {
                name: "q1".to_string(),
                window: window::AnalysisWindow::parse("2020-01-01", "2020-03-31").unwrap(),
            },
            WindowJob {
                name: "year".to_string(),
                window: window::AnalysisWindow::parse("2020-01-01", "2021-01-01").unwrap(),
            },
        ];
        let config = BatchConfig {
            model: model::PowerLawModel::default(),
            settings: coords::ChartSettings::default(),
            max_points: 100,
            live: None,
            output_dir: dir.path().to_path_buf(),
        };

        let summaries = process_windows(&jobs, &raw, &config).unwrap();
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].name, "q1");
        assert_eq!(summaries[0].samples, 91);
        assert!(summaries[1].samples <= 100);
        for summary in &summaries {
            assert!(summary.path.exists());
            assert!(summary.axes_path.exists());
            assert_eq!(summary.rows, summary.samples);
        }
    }
}
