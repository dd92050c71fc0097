//! Subscriber installation for the `versus` binaries

use std::sync::Once;
use tracing_subscriber::EnvFilter;

/// Crates whose events the default filters admit
const TARGETS: [&str; 4] = ["versus", "versus_core", "versus_store", "versus_engine"];

/// Logging profile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    /// Human-readable lines with artifact and SQL detail (`debug`)
    Development,
    /// One JSON object per boundary event (`info`)
    Production,
}

impl Profile {
    fn level(self) -> &'static str {
        match self {
            Profile::Development => "debug",
            Profile::Production => "info",
        }
    }

    /// Filter directives of this profile, e.g. `versus_engine=info`
    pub fn directives(self) -> String {
        TARGETS
            .iter()
            .map(|target| format!("{}={}", target, self.level()))
            .collect::<Vec<_>>()
            .join(",")
    }
}

static INIT_ONCE: Once = Once::new();

/// Install the global subscriber, writing to stderr
///
/// Later calls are no-ops. `RUST_LOG` replaces the profile's directives.
/// Tests use `init_test_capture()` instead.
pub fn init(profile: Profile) {
    INIT_ONCE.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(profile.directives()));
        let builder = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr);
        match profile {
            Profile::Development => builder.init(),
            Profile::Production => builder.json().init(),
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directives_cover_every_crate() {
        assert_eq!(
            Profile::Production.directives(),
            "versus=info,versus_core=info,versus_store=info,versus_engine=info"
        );
        assert!(Profile::Development
            .directives()
            .split(',')
            .all(|d| d.ends_with("=debug")));
    }
}
