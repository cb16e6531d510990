use std::sync::Arc;

use time::format_description::OwnedFormatItem;
use time::{format_description, UtcOffset};
use tracing_subscriber::filter::dynamic_filter_fn;
use tracing_subscriber::fmt::time::OffsetTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

const FULL_TIMESTAMP: &str = "[day].[month].[year] [hour]:[minute]:[second]";
const SHORT_TIMESTAMP: &str = "[hour]:[minute]:[second]";

#[allow(clippy::unwrap_used)]
fn timer(offset: UtcOffset, pattern: &str) -> OffsetTime<OwnedFormatItem> {
    // Patterns are constants
    OffsetTime::new(offset, format_description::parse_owned::<1>(pattern).unwrap())
}

/// Logs go to stderr so command output on stdout stays machine-readable.
/// Attended sessions get a compact, coloured format; everything else gets
/// full timestamps and targets.
pub fn init_logging() {
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "passgate=info")
    }

    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    let env_filter = Arc::new(EnvFilter::from_default_env());
    let attended = console::user_attended_stderr();

    let layer = if attended {
        tracing_subscriber::fmt::layer()
            .compact()
            .with_writer(std::io::stderr)
            .with_ansi(true)
            .with_target(false)
            .with_timer(timer(offset, SHORT_TIMESTAMP))
            .with_filter(dynamic_filter_fn(move |m, c| {
                env_filter.enabled(m, c.clone())
            }))
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(false)
            .with_timer(timer(offset, FULL_TIMESTAMP))
            .with_filter(dynamic_filter_fn(move |m, c| {
                env_filter.enabled(m, c.clone())
            }))
            .boxed()
    };

    tracing_subscriber::registry().with(layer).init();
}
