/// Structure representing command-line arguments.
#[derive(Debug)]
pub struct Args {
    pub input: std::path::PathBuf,
    pub output: std::path::PathBuf,
    pub start: Option<String>,
    pub end: Option<String>,
    pub periods: Vec<String>,
    pub x_log: bool,
    pub y_log: bool,
    pub bands: Vec<String>,
    pub halvings: bool,
    pub max_points: usize,
    pub latest_price: Option<f64>,
    pub today: Option<String>,
    pub intercept: Option<f64>,
    pub slope: Option<f64>,
    pub std_residuals: Option<f64>,
    pub threads: Option<usize>,
    pub snapshot: Option<std::path::PathBuf>,
    pub check: bool,
}

/// Command-line arguments parser using Clap.
///
/// Supports the price input, output directory, the analysis windows to
/// render, axis modes, visible bands, and overrides for the model constants.
impl Args {
    /// Parses command-line arguments using `clap`.
    ///
    /// # Returns
    /// * `Args` - Struct containing parsed arguments.
    ///
    /// # Errors
    /// * Exits with a usage message if required arguments are missing or invalid.
    pub fn parse() -> Self {
        Self::parse_from(std::env::args_os())
    }

    /// Same as [`Args::parse`] over an explicit argument list.
    pub fn parse_from<I, T>(itr: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let matches = command().get_matches_from(itr);

        Args {
            input: matches.get_one::<std::path::PathBuf>("input").cloned().unwrap_or_default(),
            output: matches.get_one::<std::path::PathBuf>("output").cloned().unwrap_or_default(),
            start: matches.get_one::<String>("start").cloned(),
            end: matches.get_one::<String>("end").cloned(),
            periods: matches
                .get_many::<String>("period")
                .map(|values| values.cloned().collect())
                .unwrap_or_default(),
            x_log: matches.get_flag("x-log"),
            y_log: matches.get_flag("y-log"),
            bands: matches
                .get_many::<String>("bands")
                .map(|values| values.cloned().collect())
                .unwrap_or_default(),
            halvings: matches.get_flag("halvings"),
            max_points: matches.get_one::<usize>("max-points").copied().unwrap_or(DEFAULT_MAX_POINTS),
            latest_price: matches.get_one::<f64>("latest-price").copied(),
            today: matches.get_one::<String>("today").cloned(),
            intercept: matches.get_one::<f64>("intercept").copied(),
            slope: matches.get_one::<f64>("slope").copied(),
            std_residuals: matches.get_one::<f64>("std-residuals").copied(),
            threads: matches.get_one::<usize>("threads").cloned(),
            snapshot: matches.get_one::<std::path::PathBuf>("snapshot").cloned(),
            check: matches.get_flag("check"),
        }
    }
}

/// Sampling budget used when `--max-points` is not given.
pub const DEFAULT_MAX_POINTS: usize = 800;

fn command() -> clap::Command {
    clap::Command::new("btc-powerlaw")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Sample Bitcoin price history against power-law bands and export plot-ready series")
        .arg(
            clap::Arg::new("input")
                .short('i')
                .long("input")
                .help("Daily price CSV (date,price) or a .bin snapshot")
                .required(true)
                .num_args(1)
                .value_parser(clap::value_parser!(std::path::PathBuf)),
        )
        .arg(
            clap::Arg::new("output")
            .short('o')
            .long("output")
            .help("Directory for the exported CSV files")
            .required(true)
            .num_args(1)
            .value_parser(clap::value_parser!(std::path::PathBuf)),
        )
        .arg(
            clap::Arg::new("start")
            .long("start")
            .help("Analysis window start (YYYY-MM-DD)")
            .num_args(1)
            .requires("end")
            .conflicts_with("period"),
        )
        .arg(
            clap::Arg::new("end")
            .long("end")
            .help("Analysis window end (YYYY-MM-DD); with --period, the day the presets end on")
            .num_args(1),
        )
        .arg(
            clap::Arg::new("period")
            .short('p')
            .long("period")
            .help("Preset windows ending today, comma separated. Examples: 1y, 5y, 10y, all")
            .value_delimiter(',')
            .num_args(1..),
        )
        .arg(
            clap::Arg::new("x-log")
            .long("x-log")
            .help("Logarithmic time axis (days since genesis, power-scaled sampling)")
            .action(clap::ArgAction::SetTrue),
        )
        .arg(
            clap::Arg::new("y-log")
            .long("y-log")
            .help("Logarithmic price axis")
            .action(clap::ArgAction::SetTrue),
        )
        .arg(
            clap::Arg::new("bands")
            .short('b')
            .long("bands")
            .help("Series to export. Available: price, powerlaw, inner, outer")
            .value_delimiter(',')
            .value_parser(["price", "powerlaw", "inner", "outer"])
            .num_args(1..),
        )
        .arg(
            clap::Arg::new("halvings")
            .long("halvings")
            .help("Include halving epoch ranges in the axes file and the preview")
            .action(clap::ArgAction::SetTrue),
        )
        .arg(
            clap::Arg::new("max-points")
            .short('m')
            .long("max-points")
            .help("Sampling budget per window (default: 800)")
            .num_args(1)
            .value_parser(clap::builder::ValueParser::new(parse_usize_positive)),
        )
        .arg(
            clap::Arg::new("latest-price")
            .long("latest-price")
            .help("Live price to show as today's point")
            .num_args(1)
            .value_parser(clap::builder::ValueParser::new(parse_f64_positive)),
        )
        .arg(
            clap::Arg::new("today")
            .long("today")
            .help("Date of the live price (default: local date)")
            .num_args(1)
            .requires("latest-price"),
        )
        .arg(
            clap::Arg::new("intercept")
            .long("intercept")
            .help("Power-law intercept a in a * days^b")
            .num_args(1)
            .value_parser(clap::builder::ValueParser::new(parse_f64_positive)),
        )
        .arg(
            clap::Arg::new("slope")
            .long("slope")
            .help("Power-law slope b in a * days^b")
            .num_args(1)
            .allow_negative_numbers(true)
            .value_parser(clap::value_parser!(f64)),
        )
        .arg(
            clap::Arg::new("std-residuals")
            .long("std-residuals")
            .help("Standard deviation of the log residuals")
            .num_args(1)
            .value_parser(clap::builder::ValueParser::new(parse_f64_positive)),
        )
        .arg(
            clap::Arg::new("threads")
            .short('t')
            .long("threads")
            .help("Number of threads to use (default: all available)")
            .num_args(1)
            .value_parser(clap::builder::ValueParser::new(parse_usize_positive)),
        )
        .arg(
            clap::Arg::new("snapshot")
            .short('s')
            .long("snapshot")
            .help("Save the gap-filled series as a binary snapshot for faster reloads")
            .num_args(1)
            .value_parser(clap::value_parser!(std::path::PathBuf)),
        )
        .arg(
            clap::Arg::new("check")
            .short('c')
            .long("check")
            .help("After export, print the first 5 points of each series")
            .required(false)
            .action(clap::ArgAction::SetTrue),
        )
}

/// Validates that the value is a positive integer.
///
/// # Arguments
/// * `s` - String representation of the number.
///
/// # Returns
/// * `Result<usize>` - Validated number.
fn parse_usize_positive(s: &str) -> Result<usize, String> {
    match s.parse::<usize>() {
        Ok(0) => Err("Must be a positive integer".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(format!("Not a valid number: {}", e)),
    }
}

/// Validates that the value is a finite, strictly positive number.
fn parse_f64_positive(s: &str) -> Result<f64, String> {
    match s.parse::<f64>() {
        Ok(v) if v.is_finite() && v > 0.0 => Ok(v),
        Ok(_) => Err("Must be a positive number".to_string()),
        Err(e) => Err(format!("Not a valid number: {}", e)),
    }
}
