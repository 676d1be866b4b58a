mod cli;

use anyhow::Context;
use btc_powerlaw::{bands, coords, export, feed, model, progress, utils, window};
use tracing_subscriber::EnvFilter;

/// Main entry point of the application.
///
/// This function orchestrates the entire workflow:
/// 1. Parses command-line arguments.
/// 2. Loads and gap-fills the daily price series, optionally saving a snapshot.
/// 3. Resolves the analysis windows and chart settings.
/// 4. Generates price bands for every window in parallel and exports them.
/// 5. Optionally prints the first points of each exported series.
///
/// # Returns
///
/// * `anyhow::Result<()>` - Success or an error if any step fails.
fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("btc_powerlaw=info")),
        )
        .with_target(true)
        .init();

    let total_start = std::time::Instant::now();
    let args = cli::Args::parse();
    println!("Start band generation...");

    if !args.input.is_file() {
        return Err(anyhow::anyhow!("Input file does not exist: {}", args.input.display()));
    }
    std::fs::create_dir_all(&args.output)
        .with_context(|| format!("Failed to create output directory {}", args.output.display()))?;

    let series = feed::load_series(&args.input)
        .with_context(|| format!("Failed to load prices from {}", args.input.display()))?;
    if series.is_empty() {
        println!("⚠️ Warning: no price rows in {}, bands will be empty", args.input.display());
    }
    if let Some(path) = &args.snapshot {
        feed::save_snapshot(&series, path)
            .with_context(|| format!("Failed to save snapshot {}", path.display()))?;
        println!("💾 Snapshot saved to {}", path.display());
    }

    let today = match &args.today {
        Some(day) => utils::parse_day(day)?,
        None => chrono::Local::now().date_naive(),
    };
    let jobs = resolve_jobs(&args, today)?;
    let config = progress::BatchConfig {
        model: resolve_model(&args),
        settings: resolve_settings(&args),
        max_points: args.max_points,
        live: args.latest_price.map(|price| bands::LivePrice { date: today, price }),
        output_dir: args.output.clone(),
    };

    let effective_threads = match args.threads {
        Some(n) => {
            let max_threads = num_cpus::get();
            if n > max_threads {
                println!("⚠️ Warning: Limiting thread count to {} (max available)", max_threads);
                max_threads
            } else { n }
        }
        None => rayon::current_num_threads(),
    };
    println!("🚀 Using {} thread(s) for {} window(s)", effective_threads, jobs.len());

    let summaries = if args.threads.is_some() {
        let local_pool = utils::configure_thread_pool(effective_threads)?;
        local_pool.install(|| progress::process_windows(&jobs, &series, &config))?
    } else {
        progress::process_windows(&jobs, &series, &config)?
    };

    for summary in &summaries {
        println!(
            "📈 {}: {} samples, {} rows -> {} (axes: {})",
            summary.name,
            summary.samples,
            summary.rows,
            summary.path.display(),
            summary.axes_path.display()
        );
        if args.check {
            export::print_preview(&summary.plot, 5);
        }
    }

    println!(
        "✅ Export completed in {:?} seconds",
        total_start.elapsed().as_secs_f64()
    );
    Ok(())
}

/// Builds the windows to render: an explicit `--start/--end` range, or one
/// window per `--period` preset (default `all`) ending on `--end` or today.
fn resolve_jobs(args: &cli::Args, today: chrono::NaiveDate) -> anyhow::Result<Vec<progress::WindowJob>> {
    let end = match &args.end {
        Some(day) => utils::parse_day(day)?,
        None => today,
    };

    if let Some(start) = &args.start {
        let window = window::AnalysisWindow::after_genesis(utils::parse_day(start)?, end)?;
        let name = format!("{}_{}", utils::format_day(window.start()), utils::format_day(window.end()));
        return Ok(vec![progress::WindowJob { name, window }]);
    }

    let periods = if args.periods.is_empty() { vec!["all".to_string()] } else { args.periods.clone() };
    periods
        .iter()
        .map(|value| {
            let period = window::Period::parse(value)?;
            let window = period.window_for(end)?;
            Ok(progress::WindowJob { name: period.name(), window })
        })
        .collect()
}

fn resolve_model(args: &cli::Args) -> model::PowerLawModel {
    let defaults = model::PowerLawModel::default();
    model::PowerLawModel::with_constants(
        args.intercept.unwrap_or(defaults.intercept),
        args.slope.unwrap_or(defaults.slope),
        args.std_residuals.unwrap_or(defaults.std_residuals),
    )
}

/// Chart settings from flags. Without `--bands` only the price is exported.
fn resolve_settings(args: &cli::Args) -> coords::ChartSettings {
    let mut settings = coords::ChartSettings {
        use_x_log: args.x_log,
        use_y_log: args.y_log,
        show_halving_epochs: args.halvings,
        ..Default::default()
    };
    if !args.bands.is_empty() {
        settings.show_price_plot = args.bands.iter().any(|b| b == "price");
        settings.show_power_law_plot = args.bands.iter().any(|b| b == "powerlaw");
        settings.show_inner_band = args.bands.iter().any(|b| b == "inner");
        settings.show_outer_band = args.bands.iter().any(|b| b == "outer");
    }
    settings
}
