use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Installs the global subscriber. Diagnostics go to stderr so stdout stays
/// parseable for `--json` and `--format dot`.
///
/// `-v` selects debug, `-vv` trace, `--quiet` errors only. Otherwise
/// `RUST_LOG` is honored, falling back to info.
pub fn init_logging(verbose: u8, quiet: bool, no_color: bool) {
    let filter = if verbose == 0 && !quiet {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("monograph=info"))
    } else {
        EnvFilter::new(format!("monograph={}", level_for(verbose, quiet)))
    };

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(!no_color)
        .without_time()
        .compact();

    // A second init (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}

pub fn level_for(verbose: u8, quiet: bool) -> &'static str {
    match (verbose, quiet) {
        (0, true) => "error",
        (0, false) => "info",
        (1, _) => "debug",
        _ => "trace",
    }
}
