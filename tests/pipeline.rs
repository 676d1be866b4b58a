use std::io::Write;

use btc_powerlaw::bands::{BandKind, BandRequest, generate_price_bands};
use btc_powerlaw::coords::{self, ChartSettings};
use btc_powerlaw::model::PowerLawModel;
use btc_powerlaw::window::{AnalysisWindow, Period, ZoomDirection};
use btc_powerlaw::{export, feed, progress, utils};

fn write_csv(dir: &std::path::Path, name: &str, body: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(body.as_bytes()).unwrap();
    path
}

#[test]
fn csv_with_gaps_is_filled_and_snapshotted() {
    let dir = tempfile::tempdir().unwrap();
    let csv = write_csv(
        dir.path(),
        "prices.csv",
        "date,price\n2020-01-01,7000\n2020-01-02,7100\n2020-01-05,7400\n2020-01-06,7500\n",
    );

    let series = feed::load_series(&csv).unwrap();
    assert_eq!(series.len(), 6);
    assert_eq!(series[2].date, utils::parse_day("2020-01-03").unwrap());
    assert_eq!(series[2].price, 7100.0);
    assert_eq!(series[3].price, 7100.0);

    let snapshot = dir.path().join("prices.bin");
    feed::save_snapshot(&series, &snapshot).unwrap();
    assert_eq!(feed::load_series(&snapshot).unwrap(), series);
}

#[test]
fn unsorted_csv_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let csv = write_csv(dir.path(), "bad.csv", "date,price\n2020-01-02,1\n2020-01-01,1\n");
    let err = feed::load_series(&csv).unwrap_err();
    assert!(matches!(err, btc_powerlaw::Error::UnsortedSeries { .. }));
}

#[test]
fn gap_filled_feed_has_no_placeholders_inside_its_range() {
    let dir = tempfile::tempdir().unwrap();
    let csv = write_csv(
        dir.path(),
        "prices.csv",
        "date,price\n2020-01-01,10\n2020-01-04,13\n2020-01-10,19\n",
    );
    let series = feed::load_series(&csv).unwrap();
    let window = AnalysisWindow::parse("2020-01-01", "2020-01-10").unwrap();
    let request = BandRequest::new(window, ChartSettings::default().sampling_mode(), 10);
    let bands = generate_price_bands(&PowerLawModel::default(), &request, &series);
    assert_eq!(bands.len(), 10);
    assert!(bands.get(BandKind::Price).iter().all(|d| d.price > 0.0));
}

#[test]
fn batch_export_writes_plot_rows() {
    let dir = tempfile::tempdir().unwrap();
    let start = utils::parse_day("2021-01-01").unwrap();
    let series: Vec<_> = (0..800)
        .map(|i| btc_powerlaw::index::DailyPriceDatum::new(utils::add_days(start, i), 30_000.0 + i as f64))
        .collect();
    let end = utils::parse_day("2023-01-01").unwrap();
    let jobs = vec![progress::WindowJob {
        name: Period::Years(1).name(),
        window: Period::Years(1).window_for(end).unwrap(),
    }];
    let config = progress::BatchConfig {
        model: PowerLawModel::default(),
        settings: ChartSettings {
            use_x_log: true,
            use_y_log: true,
            show_power_law_plot: true,
            show_inner_band: true,
            ..Default::default()
        },
        max_points: 200,
        live: None,
        output_dir: dir.path().to_path_buf(),
    };

    let summaries = progress::process_windows(&jobs, &series, &config).unwrap();
    let summary = &summaries[0];
    assert!(summary.path.ends_with("1y.csv"));
    // price, powerLaw and both inner bands
    assert_eq!(summary.plot.series.len(), 4);
    assert_eq!(summary.rows, summary.samples * 4);

    let mut reader = csv::Reader::from_path(&summary.path).unwrap();
    let headers: Vec<String> = reader.headers().unwrap().iter().map(str::to_string).collect();
    assert_eq!(headers, vec!["band", "x", "y"]);
    let first = reader.records().next().unwrap().unwrap();
    assert_eq!(&first[0], "posOneSigma");
    let x: f64 = first[1].parse().unwrap();
    assert!(x > utils::days_since_genesis(utils::parse_day("2022-01-01").unwrap()) as f64 - 1.0);
}

#[test]
fn zoomed_window_feeds_the_adapter() {
    let model = PowerLawModel::default();
    let start = utils::parse_day("2016-01-01").unwrap();
    let series: Vec<_> = (0..2500)
        .map(|i| btc_powerlaw::index::DailyPriceDatum::new(utils::add_days(start, i), 400.0 + i as f64 * 10.0))
        .collect();
    let window = AnalysisWindow::parse("2017-01-01", "2021-01-01")
        .unwrap()
        .zoom(ZoomDirection::In)
        .unwrap();
    let settings = ChartSettings { use_y_log: true, ..Default::default() };
    let bands = generate_price_bands(
        &model,
        &BandRequest::new(window, settings.sampling_mode(), 500),
        &series,
    );
    let plot = coords::plot_data(&model, &bands, &window, &settings);

    assert_eq!(plot.bounds.min_x, utils::epoch_millis(window.start()) as f64);
    assert_eq!(plot.bounds.max_x, utils::epoch_millis(window.end()) as f64);
    let lowest = plot.series[0].points.iter().filter_map(|p| p.y).fold(f64::MAX, f64::min);
    assert_eq!(plot.bounds.min_y, lowest);
    assert_eq!(plot.y_ticks.first(), Some(&lowest));

    let mut out = Vec::new();
    let rows = export::write_plot(&plot, &mut out).unwrap();
    assert_eq!(rows, plot.series[0].points.len());
}

#[test]
fn halving_epochs_reach_the_axes_file_only_when_enabled() {
    let start = utils::parse_day("2019-01-01").unwrap();
    let series: Vec<_> = (0..800)
        .map(|i| btc_powerlaw::index::DailyPriceDatum::new(utils::add_days(start, i), 4_000.0 + i as f64))
        .collect();
    let jobs = vec![progress::WindowJob {
        name: "halving".to_string(),
        window: AnalysisWindow::parse("2019-06-01", "2021-01-01").unwrap(),
    }];

    let epoch_rows = |show_halving_epochs: bool| {
        let dir = tempfile::tempdir().unwrap();
        let config = progress::BatchConfig {
            model: PowerLawModel::default(),
            settings: ChartSettings { show_halving_epochs, ..Default::default() },
            max_points: 100,
            live: None,
            output_dir: dir.path().to_path_buf(),
        };
        let summaries = progress::process_windows(&jobs, &series, &config).unwrap();
        assert!(summaries[0].axes_path.ends_with("halving_axes.csv"));
        let mut reader = csv::Reader::from_path(&summaries[0].axes_path).unwrap();
        reader
            .records()
            .map(|r| r.unwrap())
            .filter(|r| &r[0] == "epoch")
            .map(|r| r[1].to_string())
            .collect::<Vec<_>>()
    };

    assert!(epoch_rows(false).is_empty());
    // The 2020-05-11 halving splits the window between epochs 2 and 3.
    assert_eq!(epoch_rows(true), vec!["2", "3"]);
}
