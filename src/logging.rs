//! Logging setup for the `icns2png` binary.
//!
//! The library only emits `tracing` events; installing a subscriber is left
//! to the application. Output goes to stderr so stdout stays reserved for
//! the icon listing.
//!
//! `RUST_LOG` takes precedence over the verbosity flag when set.

use std::io;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};

/// Filter directive used when `RUST_LOG` is absent.
pub fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Install the global subscriber.
///
/// # Errors
///
/// Fails if a global subscriber is already installed.
pub fn init_logging(verbosity: u8) -> Result<(), TryInitError> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stderr)
        .with_target(verbosity > 1);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .try_init()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_levels() {
        assert_eq!(default_directive(0), "warn");
        assert_eq!(default_directive(1), "info");
        assert_eq!(default_directive(2), "debug");
        assert_eq!(default_directive(7), "trace");
    }

    #[test]
    fn test_second_init_fails() {
        // Whichever call loses the race for the global slot reports an error.
        let first = init_logging(0);
        let second = init_logging(0);
        assert!(first.is_err() || second.is_err());
    }
}
