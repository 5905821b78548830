use crate::error::{Result, ScanError};
use crate::model::UserId;
use reqwest::Client;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use serde::Deserialize;
use std::future::Future;
use std::time::{Duration, Instant};
use tracing::debug;
use url::Url;

pub const DEFAULT_API_BASE: &str = "https://api.github.com";

/// GitHub caps `per_page` at 100
const MAX_PER_PAGE: usize = 100;

/// One page of "who follows `user`".
///
/// Implementations return the followers in API order. The crawler treats
/// every `Err` the same way, so implementations are free to be as specific
/// as they like about what went wrong.
pub trait FollowerSource: Send + Sync {
    /// `per_page` is a hint: the crawler never reads past that many entries,
    /// so a source may return more or fewer.
    fn fetch_followers(
        &self,
        user: &UserId,
        per_page: usize,
    ) -> impl Future<Output = Result<Vec<UserId>>> + Send;
}

impl<T: FollowerSource> FollowerSource for &T {
    fn fetch_followers(
        &self,
        user: &UserId,
        per_page: usize,
    ) -> impl Future<Output = Result<Vec<UserId>>> + Send {
        (**self).fetch_followers(user, per_page)
    }
}

impl<T: FollowerSource> FollowerSource for std::sync::Arc<T> {
    fn fetch_followers(
        &self,
        user: &UserId,
        per_page: usize,
    ) -> impl Future<Output = Result<Vec<UserId>>> + Send {
        (**self).fetch_followers(user, per_page)
    }
}

#[derive(Debug, Deserialize)]
struct FollowerRecord {
    login: String,
}

/// `GET /users/{user}/followers`, first page only
#[derive(Clone)]
pub struct GithubFollowers {
    client: Client,
    api_base: Url,
    token: String,
}

impl GithubFollowers {
    pub fn new(token: impl Into<String>) -> Result<Self> {
        Self::with_api_base(token, DEFAULT_API_BASE, 10)
    }

    pub fn with_api_base(token: impl Into<String>, api_base: &str, timeout_secs: u64) -> Result<Self> {
        let api_base = Url::parse(api_base)
            .map_err(|e| ScanError::Other(format!("Invalid API base {}: {}", api_base, e)))?;
        if api_base.cannot_be_a_base() {
            return Err(ScanError::Other(format!("API base {} cannot be a base URL", api_base)));
        }

        // A zero timeout fails every request before it is sent
        let timeout_secs = timeout_secs.max(1);
        let client = Client::builder()
            .user_agent(concat!("follownet/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs((timeout_secs / 2).max(1)))
            .pool_max_idle_per_host(16)
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Duration::from_secs(60))
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;

        Ok(Self {
            client,
            api_base,
            token: token.into(),
        })
    }

    pub fn followers_url(&self, user: &UserId, per_page: usize) -> Result<Url> {
        if user.as_str().trim().is_empty() {
            return Err(ScanError::InvalidUser("empty username".to_string()));
        }

        let mut url = self.api_base.clone();
        url.path_segments_mut()
            .map_err(|_| ScanError::Other(format!("API base {} cannot be a base URL", self.api_base)))?
            .pop_if_empty()
            .extend(["users", user.as_str(), "followers"]);
        url.query_pairs_mut()
            .append_pair("per_page", &per_page.clamp(1, MAX_PER_PAGE).to_string());
        Ok(url)
    }
}

impl FollowerSource for GithubFollowers {
    async fn fetch_followers(&self, user: &UserId, per_page: usize) -> Result<Vec<UserId>> {
        let url = self.followers_url(user, per_page)?;
        debug!("Fetching {}", url);

        let mut request = self
            .client
            .get(url)
            .header(ACCEPT, "application/vnd.github+json");
        if !self.token.is_empty() {
            request = request.header(AUTHORIZATION, format!("token {}", self.token));
        }

        let start = Instant::now();
        let response = request.send().await?;
        let status = response.status();
        debug!("{} answered {} in {:?}", user, status, start.elapsed());

        if status != reqwest::StatusCode::OK {
            return Err(ScanError::Status {
                user: user.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let records: Vec<FollowerRecord> = serde_json::from_str(&body)
            .map_err(|e| ScanError::ParseError(format!("followers of {}: {}", user, e)))?;

        Ok(records.into_iter().map(|r| UserId::from(r.login)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{header, method, path, query_param},
    };

    #[test]
    fn test_followers_url() {
        let source = GithubFollowers::new("").unwrap();
        let url = source.followers_url(&UserId::from("octocat"), 5).unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.github.com/users/octocat/followers?per_page=5"
        );
    }

    #[test]
    fn test_followers_url_keeps_enterprise_prefix() {
        let source =
            GithubFollowers::with_api_base("", "https://ghe.example.com/api/v3", 10).unwrap();
        let url = source.followers_url(&UserId::from("octocat"), 500).unwrap();
        assert_eq!(
            url.as_str(),
            "https://ghe.example.com/api/v3/users/octocat/followers?per_page=100"
        );
    }

    #[test]
    fn test_followers_url_rejects_empty_user() {
        let source = GithubFollowers::new("").unwrap();
        let result = source.followers_url(&UserId::from("  "), 5);
        assert!(matches!(result, Err(ScanError::InvalidUser(_))));
    }

    #[tokio::test]
    async fn test_fetch_sends_token_and_extracts_logins() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/users/alice/followers"))
            .and(query_param("per_page", "2"))
            .and(header("authorization", "token s3cret"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"[{"login":"bob","id":2,"type":"User"},{"login":"carol","id":3}]"#,
            ))
            .expect(1)
            .mount(&mock_server)
            .await;

        let source = GithubFollowers::with_api_base("s3cret", &mock_server.uri(), 5).unwrap();
        let followers = source
            .fetch_followers(&UserId::from("alice"), 2)
            .await
            .unwrap();

        assert_eq!(followers, vec![UserId::from("bob"), UserId::from("carol")]);
    }

    #[tokio::test]
    async fn test_zero_timeout_still_fetches() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/users/alice/followers"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"[{"login":"bob"}]"#))
            .expect(1)
            .mount(&mock_server)
            .await;

        let source = GithubFollowers::with_api_base("", &mock_server.uri(), 0).unwrap();
        let followers = source
            .fetch_followers(&UserId::from("alice"), 5)
            .await
            .unwrap();

        assert_eq!(followers, vec![UserId::from("bob")]);
    }

    #[tokio::test]
    async fn test_fetch_non_success_status_is_an_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/users/ghost/followers"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let source = GithubFollowers::with_api_base("", &mock_server.uri(), 5).unwrap();
        let result = source.fetch_followers(&UserId::from("ghost"), 5).await;

        assert!(matches!(
            result,
            Err(ScanError::Status { status: 404, .. })
        ));
    }

    #[tokio::test]
    async fn test_fetch_malformed_body_is_parse_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/users/alice/followers"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"message":"nope"}"#))
            .mount(&mock_server)
            .await;

        let source = GithubFollowers::with_api_base("", &mock_server.uri(), 5).unwrap();
        let result = source.fetch_followers(&UserId::from("alice"), 5).await;

        assert!(matches!(result, Err(ScanError::ParseError(_))));
    }
}
