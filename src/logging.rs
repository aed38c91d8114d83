use env_logger::Env;

/// Initialise the logger.
///
/// `RUST_LOG` is honoured when neither flag is given; otherwise `--verbose`
/// forces debug output and `--quiet` silences everything.
pub fn init_logger(verbose: bool, quiet: bool) {
    let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or("warn"));
    if quiet {
        builder.filter_level(log::LevelFilter::Off);
    } else if verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.format_timestamp(None).format_target(false).init();

    log::debug!("Logger initialized (verbose={verbose}, quiet={quiet})");
}
