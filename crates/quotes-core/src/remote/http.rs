//! HTTP feed adapter.
//!
//! The feed is a JSON array of posts (`{ "id", "userId", "title" }`, the
//! JSONPlaceholder shape). Each post becomes one quote: the title is the
//! text and the posting user becomes author and category.

use std::time::Duration;

use chrono::{SecondsFormat, Utc};
use serde_json::Value;

use super::{FetchError, FetchResult, RemoteSource};
use crate::models::{QuoteId, RawQuote, Source};
use crate::util::{compact_text, is_web_endpoint, non_blank};

#[derive(Clone)]
pub struct HttpRemoteSource {
    endpoint: String,
    client: reqwest::Client,
}

impl HttpRemoteSource {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> FetchResult<Self> {
        let endpoint = normalize_endpoint(endpoint.into())?;
        Ok(Self {
            endpoint,
            client: reqwest::Client::builder().timeout(timeout).build()?,
        })
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl RemoteSource for HttpRemoteSource {
    async fn fetch(&self) -> FetchResult<Vec<RawQuote>> {
        let response = self
            .client
            .get(&self.endpoint)
            .header(reqwest::header::ACCEPT, "application/json")
            .header(reqwest::header::CACHE_CONTROL, "no-store")
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Status {
                status,
                body: compact_text(&body),
            });
        }

        let body = response.text().await?;
        let payload = serde_json::from_str::<Value>(&body)
            .map_err(|error| FetchError::InvalidPayload(format!("response is not JSON: {error}")))?;
        let Value::Array(posts) = payload else {
            return Err(FetchError::InvalidPayload(
                "expected a JSON array of posts".to_string(),
            ));
        };

        Ok(posts_to_raw_quotes(&posts))
    }

    fn describe(&self) -> String {
        self.endpoint.clone()
    }
}

/// Translate feed posts into raw server quotes.
///
/// Posts without an id carry no identity and are skipped. A missing or zero
/// `userId` files the quote under `Server`. All records share one `updatedAt`
/// stamp, the translation time.
#[must_use]
pub fn posts_to_raw_quotes(posts: &[Value]) -> Vec<RawQuote> {
    let fetched_at = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);

    posts
        .iter()
        .filter_map(|post| {
            let remote_id = post.get("id").and_then(scalar_label)?;
            let user = post.get("userId").and_then(scalar_label);
            let text = post
                .get("title")
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|title| !title.is_empty())
                .map_or_else(|| format!("Post #{remote_id}"), str::to_string);

            Some(RawQuote {
                id: Some(QuoteId::remote(&remote_id).to_string()),
                text: Some(text),
                author: Some(format!("User {}", user.as_deref().unwrap_or("Server"))),
                category: Some(
                    user.as_deref()
                        .filter(|user| *user != "0")
                        .map_or_else(|| "Server".to_string(), |user| format!("User {user}")),
                ),
                updated_at: Some(fetched_at.clone()),
                source: Some(Source::Server.as_str().to_string()),
            })
        })
        .collect()
}

fn scalar_label(value: &Value) -> Option<String> {
    match value {
        Value::Number(number) => Some(number.to_string()),
        Value::String(text) => non_blank(Some(text.clone())),
        _ => None,
    }
}

fn normalize_endpoint(raw: String) -> FetchResult<String> {
    let endpoint = non_blank(Some(raw)).ok_or_else(|| {
        FetchError::InvalidConfiguration("endpoint must not be empty".to_string())
    })?;
    if is_web_endpoint(&endpoint) {
        Ok(endpoint)
    } else {
        Err(FetchError::InvalidConfiguration(
            "endpoint must include http:// or https://".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    use super::*;

    async fn spawn_one_shot_server(status_line: &str, body: &str) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind test server");
        let address = listener.local_addr().expect("local address");
        let body = body.to_string();
        let response = format!(
            "HTTP/1.1 {status_line}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
            body.len(),
            body
        );

        tokio::spawn(async move {
            if let Ok((mut socket, _)) = listener.accept().await {
                let mut request_buffer = [0_u8; 1024];
                let _ = socket.read(&mut request_buffer).await;
                let _ = socket.write_all(response.as_bytes()).await;
            }
        });

        format!("http://{address}/posts?_limit=10")
    }

    fn source(url: &str) -> HttpRemoteSource {
        HttpRemoteSource::new(url, Duration::from_secs(5)).expect("valid endpoint")
    }

    #[test]
    fn new_rejects_invalid_endpoints() {
        assert!(HttpRemoteSource::new("  ", Duration::from_secs(1)).is_err());
        assert!(HttpRemoteSource::new("example.com/posts", Duration::from_secs(1)).is_err());
    }

    #[test]
    fn posts_map_to_server_quotes() {
        let raws = posts_to_raw_quotes(&[
            json!({ "id": 1, "userId": 3, "title": "  sunt aut facere  " }),
            json!({ "id": 2, "title": "" }),
            json!({ "title": "no id" }),
        ]);

        assert_eq!(raws.len(), 2);
        assert_eq!(raws[0].id.as_deref(), Some("srv-1"));
        assert_eq!(raws[0].text.as_deref(), Some("sunt aut facere"));
        assert_eq!(raws[0].author.as_deref(), Some("User 3"));
        assert_eq!(raws[0].category.as_deref(), Some("User 3"));
        assert_eq!(raws[0].source.as_deref(), Some("server"));

        assert_eq!(raws[1].text.as_deref(), Some("Post #2"));
        assert_eq!(raws[1].author.as_deref(), Some("User Server"));
        assert_eq!(raws[1].category.as_deref(), Some("Server"));
    }

    #[test]
    fn user_zero_posts_land_in_server_category() {
        let raws = posts_to_raw_quotes(&[json!({ "id": 7, "userId": 0, "title": "anonymous" })]);

        assert_eq!(raws[0].author.as_deref(), Some("User 0"));
        assert_eq!(raws[0].category.as_deref(), Some("Server"));
    }

    #[tokio::test]
    async fn fetch_parses_post_array() {
        let url = spawn_one_shot_server(
            "200 OK",
            r#"[{"userId":1,"id":1,"title":"first"},{"userId":2,"id":2,"title":"second"}]"#,
        )
        .await;

        let raws = source(&url).fetch().await.expect("fetch should succeed");
        assert_eq!(raws.len(), 2);
        assert_eq!(raws[1].id.as_deref(), Some("srv-2"));
    }

    #[tokio::test]
    async fn fetch_rejects_non_list_payload() {
        let url = spawn_one_shot_server("200 OK", r#"{"id":1,"title":"lonely"}"#).await;

        let error = source(&url).fetch().await.expect_err("object is not a batch");
        assert!(matches!(error, FetchError::InvalidPayload(_)));
    }

    #[tokio::test]
    async fn fetch_surfaces_http_failure() {
        let url = spawn_one_shot_server("500 Internal Server Error", r#"{"error":"boom"}"#).await;

        let error = source(&url).fetch().await.expect_err("fetch should fail");
        assert!(error.to_string().contains("HTTP 500"));
    }
}
