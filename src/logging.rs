use tracing::level_filters::LevelFilter;

/// Installs the diagnostics subscriber, writing to stderr.
///
/// `verbosity` counts `-v` flags: warnings only by default, up to trace at 3.
pub fn init(verbosity: u8) {
    let level = match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
