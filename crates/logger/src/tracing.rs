use tracing::level_filters::LevelFilter;
use tracing_error::ErrorLayer;
use tracing_subscriber::filter;
use tracing_subscriber::fmt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::Layer;
use tracing_subscriber::{self, layer::SubscriberExt};

fn env_filter() -> filter::EnvFilter {
    filter::EnvFilter::builder()
        .with_regex(true)
        .try_from_env()
        .unwrap_or_else(|_| {
            filter::EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .parse_lossy("")
        })
}

/// Install the global subscriber. Filtering follows `RUST_LOG`, without it
/// only info and up is shown.
///
/// ## Useful filters
/// - every register access of one driver:
///   `RUST_LOG=sensors::tsl2561=trace,info`
/// - settings changes and power transitions of all drivers:
///   `RUST_LOG=sensors=debug,info`
///
/// For the full syntax see:
/// https://docs.rs/tracing-subscriber/latest/tracing_subscriber/filter/struct.EnvFilter.html
///
/// # Note
/// When started by systemd the logs go to the journal, the file and line of
/// each event end up in the CODE_FILE and CODE_LINE fields. To read them:
/// `journalctl -fu sensor-reader --output-fields=CODE_FILE,CODE_LINE,MESSAGE -o cat`
pub fn setup() {
    let fmt = fmt::layer()
        .pretty()
        .with_writer(std::io::stderr) // stdout carries the measurements
        .with_file(true)
        .with_line_number(true)
        .with_target(false)
        .with_ansi(true);

    let registry =
        tracing_subscriber::Registry::default().with(ErrorLayer::default());

    if libsystemd::logging::connected_to_journal() {
        match tracing_journald::layer() {
            Ok(journal) => {
                registry.with(journal.with_filter(env_filter())).init();
                tracing::info!("Started logging & tracing to journald");
            }
            Err(err) => {
                registry.with(fmt.with_filter(env_filter())).init();
                tracing::error!(
                    "Could not log to journald directly. Logging to stderr \
                    as fallback. Error connecting to journald:: {err}"
                );
            }
        };
    } else {
        registry.with(fmt.with_filter(env_filter())).init();
        tracing::info!("Started logging & tracing to stderr");
    }
}

/// Route driver logs to the test harness, can be called from every test.
/// Set `RUST_LOG` to see them.
pub fn setup_for_tests() {
    use std::sync::Once;

    static INIT: Once = Once::new();

    INIT.call_once(|| {
        color_eyre::install().unwrap();

        let test_subscriber = fmt::layer()
            .with_test_writer()
            .with_file(true)
            .with_line_number(true)
            .with_target(false)
            .with_ansi(true)
            .pretty()
            .with_filter(filter::EnvFilter::from_default_env());
        tracing_subscriber::registry()
            .with(test_subscriber)
            .with(ErrorLayer::default())
            .init();
    })
}
