use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global `tracing` subscriber
///
/// `filter` uses the `EnvFilter` directive syntax. `RUST_LOG` takes precedence when set.
pub fn init(filter: &str) -> Result<(), tracing_subscriber::util::TryInitError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .try_init()
}

#[cfg(test)]
mod tests {
    use super::*;
    use speculoos::prelude::*;

    #[test]
    fn test_init_once() {
        // No other test installs a global subscriber
        assert_that!(init("debug")).is_ok();
        tracing::debug!("subscriber installed");
        assert_that!(init("info")).is_err();
    }
}
