//! Hosted leaderboard table.
//!
//! The table is reached through its REST interface: `GET` with server-side
//! ordering and a row limit, `POST` returning the inserted row.

use async_trait::async_trait;

use crate::config::{RemoteConfig, RemoteCredentials};
use crate::error::{RemoteError, RemoteUnavailable};
use crate::leaderboard::{NewScore, ScoreRecord};

/// Remote table name
pub const TABLE: &str = "leaderboard";

/// Most rows the remote query returns
pub const REMOTE_LIMIT: usize = 10;

/// A hosted leaderboard table
#[async_trait(?Send)]
pub trait RemoteTable {
    /// Best `limit` rows, ordered by the server
    async fn select_top(&self, limit: usize) -> Result<Vec<ScoreRecord>, RemoteError>;

    /// Append one row, returning it as stored
    async fn insert_row(&self, score: &NewScore) -> Result<ScoreRecord, RemoteError>;
}

/// `{url}/rest/v1/leaderboard?select=*&order=score.asc,time_taken.asc&limit=N`
pub fn select_top_url(credentials: &RemoteCredentials, limit: usize) -> String {
    format!(
        "{}/rest/v1/{}?select=*&order=score.asc,time_taken.asc&limit={}",
        credentials.url,
        TABLE,
        limit.min(REMOTE_LIMIT)
    )
}

/// `{url}/rest/v1/leaderboard`
pub fn insert_url(credentials: &RemoteCredentials) -> String {
    format!("{}/rest/v1/{}", credentials.url, TABLE)
}

/// Decode a query response body
pub fn decode_rows(body: &str) -> Result<Vec<ScoreRecord>, RemoteError> {
    serde_json::from_str(body).map_err(|e| RemoteError::Decode(e.to_string()))
}

/// Decode an insert response body (an array holding the new row)
pub fn decode_inserted(body: &str) -> Result<ScoreRecord, RemoteError> {
    decode_rows(body)?
        .into_iter()
        .next()
        .ok_or(RemoteError::EmptyInsert)
}

/// Open the remote table if the credentials and platform allow it
pub fn connect(config: &RemoteConfig) -> Result<Box<dyn RemoteTable>, RemoteUnavailable> {
    let credentials = config.credentials()?;
    open(credentials)
}

#[cfg(target_arch = "wasm32")]
fn open(credentials: RemoteCredentials) -> Result<Box<dyn RemoteTable>, RemoteUnavailable> {
    Ok(Box::new(fetch::FetchTable::new(credentials)))
}

#[cfg(not(target_arch = "wasm32"))]
fn open(_credentials: RemoteCredentials) -> Result<Box<dyn RemoteTable>, RemoteUnavailable> {
    Err(RemoteUnavailable::UnsupportedPlatform)
}

/// Browser `fetch` transport (WASM only)
#[cfg(target_arch = "wasm32")]
pub mod fetch {
    use async_trait::async_trait;
    use wasm_bindgen::{JsCast, JsValue};
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{Request, RequestInit, RequestMode, Response};

    use super::{RemoteTable, decode_inserted, decode_rows, insert_url, select_top_url};
    use crate::config::RemoteCredentials;
    use crate::error::RemoteError;
    use crate::leaderboard::{NewScore, ScoreRecord};

    fn js_error(value: JsValue) -> RemoteError {
        RemoteError::Network(format!("{:?}", value))
    }

    pub struct FetchTable {
        credentials: RemoteCredentials,
    }

    impl FetchTable {
        pub fn new(credentials: RemoteCredentials) -> Self {
            Self { credentials }
        }

        async fn send(
            &self,
            method: &str,
            url: &str,
            body: Option<String>,
        ) -> Result<String, RemoteError> {
            let opts = RequestInit::new();
            opts.set_method(method);
            opts.set_mode(RequestMode::Cors);
            if let Some(body) = body {
                opts.set_body(&JsValue::from_str(&body));
            }

            let request = Request::new_with_str_and_init(url, &opts).map_err(js_error)?;
            let headers = request.headers();
            let key = &self.credentials.anon_key;
            headers.set("apikey", key).map_err(js_error)?;
            headers
                .set("Authorization", &format!("Bearer {}", key))
                .map_err(js_error)?;
            headers
                .set("Content-Type", "application/json")
                .map_err(js_error)?;
            headers
                .set("Prefer", "return=representation")
                .map_err(js_error)?;

            let window =
                web_sys::window().ok_or_else(|| RemoteError::Network("no window".to_string()))?;
            let response: Response = JsFuture::from(window.fetch_with_request(&request))
                .await
                .map_err(js_error)?
                .dyn_into()
                .map_err(js_error)?;

            let text = JsFuture::from(response.text().map_err(js_error)?)
                .await
                .map_err(js_error)?
                .as_string()
                .unwrap_or_default();

            if !response.ok() {
                return Err(RemoteError::Status {
                    status: response.status(),
                    message: text,
                });
            }
            Ok(text)
        }
    }

    #[async_trait(?Send)]
    impl RemoteTable for FetchTable {
        async fn select_top(&self, limit: usize) -> Result<Vec<ScoreRecord>, RemoteError> {
            let url = select_top_url(&self.credentials, limit);
            let body = self.send("GET", &url, None).await?;
            decode_rows(&body)
        }

        async fn insert_row(&self, score: &NewScore) -> Result<ScoreRecord, RemoteError> {
            let payload = serde_json::to_string(&[score])
                .map_err(|e| RemoteError::Decode(e.to_string()))?;
            let body = self
                .send("POST", &insert_url(&self.credentials), Some(payload))
                .await?;
            decode_inserted(&body)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credentials() -> RemoteCredentials {
        RemoteCredentials {
            url: "https://demo.supabase.co".to_string(),
            anon_key: "anon".to_string(),
        }
    }

    #[test]
    fn test_select_url_orders_and_limits() {
        assert_eq!(
            select_top_url(&credentials(), 10),
            "https://demo.supabase.co/rest/v1/leaderboard?select=*&order=score.asc,time_taken.asc&limit=10"
        );
        // Never asks for more than the remote cap
        assert!(select_top_url(&credentials(), 500).ends_with("limit=10"));
    }

    #[test]
    fn test_insert_url() {
        assert_eq!(
            insert_url(&credentials()),
            "https://demo.supabase.co/rest/v1/leaderboard"
        );
    }

    #[test]
    fn test_decode_inserted_row() {
        let body = r#"[{"id":3,"player_name":"park","score":11,"time_taken":38,
            "created_at":"2024-05-01T00:00:00+00:00"}]"#;
        let record = decode_inserted(body).unwrap();
        assert_eq!(record.player_name, "park");
        assert_eq!(record.attempts, 11);

        assert!(matches!(decode_inserted("[]"), Err(RemoteError::EmptyInsert)));
        assert!(matches!(decode_rows("oops"), Err(RemoteError::Decode(_))));
    }

    #[test]
    fn test_new_score_payload_uses_column_names() {
        let payload = serde_json::to_string(&[NewScore {
            player_name: "park".to_string(),
            attempts: 11,
            time_taken: 38,
        }])
        .unwrap();
        assert_eq!(
            payload,
            r#"[{"player_name":"park","score":11,"attempts":11,"time_taken":38}]"#
        );
    }

    #[test]
    fn test_connect_without_credentials() {
        assert_eq!(
            connect(&RemoteConfig::default()).err(),
            Some(RemoteUnavailable::MissingCredentials)
        );
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_connect_natively_is_unsupported() {
        let config = RemoteConfig::new("https://demo.supabase.co", "anon");
        assert_eq!(
            connect(&config).err(),
            Some(RemoteUnavailable::UnsupportedPlatform)
        );
    }
}
