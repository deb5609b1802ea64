//! Game configuration and remote leaderboard credentials.

use crate::error::RemoteUnavailable;

/// Card faces used when no symbols are given (8 pairs)
pub const DEFAULT_SYMBOLS: [&str; 8] = ["🍎", "🍌", "🍇", "🍊", "🍓", "🥝", "🍑", "🍒"];

/// Values shipped in the example credentials file
pub const PLACEHOLDER_URL: &str = "YOUR_SUPABASE_URL";
pub const PLACEHOLDER_ANON_KEY: &str = "YOUR_SUPABASE_ANON_KEY";

/// Delays for the timed transitions (milliseconds)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Timings {
    /// Both cards stay visible before the pair is judged
    pub reveal_ms: f64,
    /// A mismatched pair stays visible before flipping back
    pub mismatch_hide_ms: f64,
    /// Pause between the last match and the win
    pub win_delay_ms: f64,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            reveal_ms: 1000.0,
            mismatch_hide_ms: 1000.0,
            win_delay_ms: 500.0,
        }
    }
}

/// Game configuration
#[derive(Debug, Clone)]
pub struct GameConfig {
    /// One entry per pair
    pub symbols: Vec<String>,
    pub timings: Timings,
    /// Entries shown on the leaderboard
    pub leaderboard_size: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            symbols: DEFAULT_SYMBOLS.iter().map(|s| s.to_string()).collect(),
            timings: Timings::default(),
            leaderboard_size: crate::leaderboard::LEADERBOARD_SIZE,
        }
    }
}

/// Validated remote endpoint and public key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteCredentials {
    /// Endpoint without a trailing slash
    pub url: String,
    pub anon_key: String,
}

/// Raw remote credentials as found in the environment
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemoteConfig {
    pub url: Option<String>,
    pub anon_key: Option<String>,
}

impl RemoteConfig {
    pub fn new(url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            anon_key: Some(anon_key.into()),
        }
    }

    /// Check the credentials; an error means the remote store is never used
    pub fn credentials(&self) -> Result<RemoteCredentials, RemoteUnavailable> {
        let url = non_blank(self.url.as_deref()).ok_or(RemoteUnavailable::MissingCredentials)?;
        let anon_key =
            non_blank(self.anon_key.as_deref()).ok_or(RemoteUnavailable::MissingCredentials)?;

        if url == PLACEHOLDER_URL || anon_key == PLACEHOLDER_ANON_KEY {
            return Err(RemoteUnavailable::PlaceholderCredentials);
        }
        if !(url.starts_with("https://") || url.starts_with("http://")) {
            return Err(RemoteUnavailable::InvalidEndpoint(url.to_string()));
        }

        Ok(RemoteCredentials {
            url: url.trim_end_matches('/').to_string(),
            anon_key: anon_key.to_string(),
        })
    }

    /// Read `window.SUPABASE_URL` / `window.SUPABASE_ANON_KEY` (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let Some(window) = web_sys::window() else {
            return Self::default();
        };
        let read = |name: &str| {
            js_sys::Reflect::get(&window, &wasm_bindgen::JsValue::from_str(name))
                .ok()
                .and_then(|v| v.as_string())
        };
        Self {
            url: read("SUPABASE_URL"),
            anon_key: read("SUPABASE_ANON_KEY"),
        }
    }

    /// Read `SUPABASE_URL` / `SUPABASE_ANON_KEY` from the environment
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self {
            url: std::env::var("SUPABASE_URL").ok(),
            anon_key: std::env::var("SUPABASE_ANON_KEY").ok(),
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_has_eight_pairs() {
        let config = GameConfig::default();
        assert_eq!(config.symbols.len(), 8);
        assert_eq!(config.leaderboard_size, 10);
        assert_eq!(config.timings.reveal_ms, 1000.0);
        assert_eq!(config.timings.win_delay_ms, 500.0);
    }

    #[test]
    fn test_missing_credentials() {
        let config = RemoteConfig::default();
        assert_eq!(
            config.credentials(),
            Err(RemoteUnavailable::MissingCredentials)
        );

        let config = RemoteConfig {
            url: Some("https://x.supabase.co".into()),
            anon_key: Some("   ".into()),
        };
        assert_eq!(
            config.credentials(),
            Err(RemoteUnavailable::MissingCredentials)
        );
    }

    #[test]
    fn test_placeholder_credentials_rejected() {
        let config = RemoteConfig::new(PLACEHOLDER_URL, PLACEHOLDER_ANON_KEY);
        assert_eq!(
            config.credentials(),
            Err(RemoteUnavailable::PlaceholderCredentials)
        );

        let config = RemoteConfig::new("https://x.supabase.co", PLACEHOLDER_ANON_KEY);
        assert_eq!(
            config.credentials(),
            Err(RemoteUnavailable::PlaceholderCredentials)
        );
    }

    #[test]
    fn test_endpoint_must_be_http() {
        let config = RemoteConfig::new("x.supabase.co", "key");
        assert!(matches!(
            config.credentials(),
            Err(RemoteUnavailable::InvalidEndpoint(_))
        ));
    }

    #[test]
    fn test_valid_credentials_trim_trailing_slash() {
        let config = RemoteConfig::new("https://x.supabase.co/", "anon");
        let creds = config.credentials().unwrap();
        assert_eq!(creds.url, "https://x.supabase.co");
        assert_eq!(creds.anon_key, "anon");
    }
}
