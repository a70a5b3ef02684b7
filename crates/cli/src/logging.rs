use tracing_subscriber::{fmt, layer::SubscriberExt as _, util::SubscriberInitExt as _, EnvFilter};

/// Initialize tracing with the specified verbosity level and output format.
///
/// Only records from the store and the CLI crates are shown. Logs go to stderr so
/// that command results on stdout stay machine-readable.
///
/// # Arguments
/// * `json` - If true, output logs in JSON format; otherwise, use human-readable format.
/// * `verbose` - Verbosity level: 0 for INFO, 1 for DEBUG, 2+ for TRACE.
pub fn init_tracing(json: bool, verbose: u8) {
    let filter = EnvFilter::new(filter_directives(verbose));

    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry
            .with(
                fmt::layer()
                    .json()
                    .flatten_event(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
    else {
        registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn filter_directives(verbose: u8) -> String {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    format!("showroom_store={},showroom_cli={}", level, level)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_directives() {
        assert_eq!(filter_directives(0), "showroom_store=info,showroom_cli=info");
        assert_eq!(filter_directives(1), "showroom_store=debug,showroom_cli=debug");
        assert_eq!(filter_directives(5), "showroom_store=trace,showroom_cli=trace");
    }
}
