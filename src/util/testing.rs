//! Logging setup shared by the integration tests

use std::sync::Once;
use tracing::{debug, info};
use tracing_subscriber::{
    filter::filter_fn,
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

static TEST_SETUP: Once = Once::new();

/// Targets whose events are dropped even at `trace`.
const NOISY_TARGETS: [&str; 2] = ["config::", "toml::"];

/// True if events from `target` are dropped by the test subscriber.
pub fn is_noisy(target: &str) -> bool {
    NOISY_TARGETS.iter().any(|prefix| target.starts_with(prefix))
}

/// Install a stderr subscriber once per test binary. `RUST_LOG` wins; default is `debug`.
pub fn init_test_setup() {
    TEST_SETUP.call_once(|| {
        setup_test_logging();
        info!("test logging ready");
    });
}

fn setup_test_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

    let subscriber = tracing_subscriber::registry().with(
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_thread_names(false)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(filter_fn(|metadata| !is_noisy(metadata.target())))
            .with_filter(env_filter),
    );

    if tracing::dispatcher::has_been_set() {
        debug!("tracing subscriber already set");
    } else if let Err(e) = subscriber.try_init() {
        eprintln!("Error: Failed to set up logging: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_crate_target_when_filtering_then_is_kept() {
        assert!(!is_noisy("maturity_sunburst::domain::builder"));
        assert!(!is_noisy("builder_test"));
    }

    #[test]
    fn given_config_crate_target_when_filtering_then_is_dropped() {
        assert!(is_noisy("config::builder"));
        assert!(is_noisy("toml::de"));
    }

    #[test]
    fn given_repeated_calls_when_init_test_setup_then_installs_once() {
        init_test_setup();
        init_test_setup();
        assert!(tracing::dispatcher::has_been_set());
    }
}
