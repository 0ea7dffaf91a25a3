//! Tracing subscriber setup shared by both binaries

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LogArgs;

/// Install the global subscriber. `RUST_LOG` takes precedence over `--log-level`.
pub fn init_tracing(args: &LogArgs) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| args.level.clone().into());

    if args.json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}
