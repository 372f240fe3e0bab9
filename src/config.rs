/// Runtime configuration parsed from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Redraw the board before every prompt.
    pub show_board: bool,
    /// Tracing filter used when `RUST_LOG` is not set.
    pub log_filter: String,
}

impl AppConfig {
    /// Load configuration from environment variables with defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = AppConfig::default();
        AppConfig {
            show_board: lookup("CHECKERS_SHOW_BOARD")
                .and_then(|v| parse_flag(&v))
                .unwrap_or(defaults.show_board),
            log_filter: lookup("CHECKERS_LOG").unwrap_or(defaults.log_filter),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            show_board: true,
            log_filter: "rust_checkers=warn".to_string(),
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
