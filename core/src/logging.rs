//! Tracing subscriber setup.
//!
//! Call [`init`] once at startup; later calls are ignored.

use std::sync::Once;

use tracing_subscriber::{util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    /// Human-readable output at debug level.
    Development,
    /// JSON output at info level.
    Production,
    /// No output; leaves a bare registry installed.
    Test,
}

static INIT_ONCE: Once = Once::new();

fn filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

pub fn init(profile: Profile) {
    INIT_ONCE.call_once(|| {
        // `try_init` so an embedding application's own subscriber wins.
        let _ = match profile {
            Profile::Development => tracing_subscriber::fmt()
                .with_env_filter(filter("asistencia_core=debug,mock_server=debug"))
                .finish()
                .try_init(),
            Profile::Production => tracing_subscriber::fmt()
                .json()
                .with_env_filter(filter("asistencia_core=info,mock_server=info"))
                .finish()
                .try_init(),
            Profile::Test => tracing_subscriber::registry().try_init(),
        };
    });
}
