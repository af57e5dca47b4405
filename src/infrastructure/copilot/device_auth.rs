//! OAuth 디바이스 인증 클라이언트.
//! 디바이스 코드를 발급받아 사용자에게 보여주고, 액세스 토큰이 나올 때까지 폴링한다.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info};

use super::token_store::TokenStore;
use super::{CLIENT_ID, Credential, Sleeper, TokioSleeper, with_editor_headers};
use crate::domain::error::ReviewError;
use crate::infrastructure::config::Config;

const DEVICE_GRANT_TYPE: &str = "urn:ietf:params:oauth:grant-type:device_code";
const MIN_POLL_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Deserialize)]
pub struct DeviceCodeResponse {
    pub device_code: String,
    pub user_code: String,
    pub verification_uri: String,
    #[serde(default)]
    pub expires_in: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct AccessTokenResponse {
    access_token: Option<String>,
    error: Option<String>,
}

pub struct DeviceAuthClient {
    client: Client,
    login_base: String,
    poll_interval: Duration,
    max_poll: Option<Duration>,
    sleeper: Arc<dyn Sleeper>,
}

impl DeviceAuthClient {
    pub fn new(client: Client, login_base: impl Into<String>) -> Self {
        Self {
            client,
            login_base: login_base.into(),
            poll_interval: Duration::from_secs(5),
            max_poll: None,
            sleeper: Arc::new(TokioSleeper),
        }
    }

    pub fn from_config(client: Client, config: &Config) -> Self {
        Self::new(client, config.login_base())
            .with_poll_interval(Duration::from_secs(config.poll_interval_secs()))
            .with_max_poll(config.max_poll_secs().map(Duration::from_secs))
    }

    /// 최소 1초. 0이면 대기 없이 엔드포인트를 두드리고 최대 시간도 늘지 않는다.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval.max(MIN_POLL_INTERVAL);
        self
    }

    /// `None`이면 토큰이 나올 때까지 무제한 폴링한다.
    pub fn with_max_poll(mut self, max_poll: Option<Duration>) -> Self {
        self.max_poll = max_poll;
        self
    }

    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    /// 디바이스 인증 전체 흐름을 수행하고 결과 자격 증명을 풀에 저장한다.
    pub async fn authorize(&self, store: &TokenStore) -> Result<Credential> {
        let device = self.request_device_code().await?;
        present_device_code(&device);

        let credential = self.poll_access_token(&device).await?;
        let pool_size = store
            .store(&credential)
            .context("failed to persist copilot credential")?;
        info!(pool_size, path = %store.path().display(), "stored copilot credential");
        eprintln!("Authentication success!");

        Ok(credential)
    }

    async fn request_device_code(&self) -> Result<DeviceCodeResponse> {
        let url = format!("{}/login/device/code", self.login_base);
        let response = with_editor_headers(self.client.post(&url))
            .json(&json!({ "client_id": CLIENT_ID, "scope": "read:user" }))
            .send()
            .await
            .context("copilot: failed to request device code")?;

        let status = response.status();
        let body = response
            .text()
            .await
            .context("copilot: failed to read device code response")?;
        if !status.is_success() {
            bail!("copilot: device code request failed ({status}): {body}");
        }

        serde_json::from_str(&body).context("copilot: invalid device code JSON")
    }

    async fn poll_access_token(&self, device: &DeviceCodeResponse) -> Result<Credential> {
        let url = format!("{}/login/oauth/access_token", self.login_base);
        let payload = json!({
            "client_id": CLIENT_ID,
            "device_code": device.device_code,
            "grant_type": DEVICE_GRANT_TYPE,
        });
        let mut waited = Duration::ZERO;

        loop {
            if let Some(max) = self.max_poll
                && waited >= max
            {
                return Err(ReviewError::AuthorizationTimedOut(max.as_secs()).into());
            }

            self.sleeper.sleep(self.poll_interval).await;
            waited += self.poll_interval;

            let response: AccessTokenResponse = with_editor_headers(self.client.post(&url))
                .json(&payload)
                .send()
                .await
                .context("copilot: failed to poll access token")?
                .json()
                .await
                .context("copilot: invalid access token JSON")?;

            if let Some(token) = response.access_token.filter(|t| !t.trim().is_empty()) {
                return Ok(Credential::new(token.trim()));
            }

            debug!(
                error = response.error.as_deref().unwrap_or("none"),
                waited_secs = waited.as_secs(),
                "authorization pending"
            );
        }
    }
}

fn present_device_code(device: &DeviceCodeResponse) {
    eprintln!();
    eprintln!("GitHub Copilot authorization required.");
    eprintln!(
        "Please visit {} and enter code {} to authenticate.",
        device.verification_uri, device.user_code
    );
    if let Some(expires_in) = device.expires_in {
        eprintln!("The code expires in {expires_in} seconds. Waiting for authorization...");
    } else {
        eprintln!("Waiting for authorization...");
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::infrastructure::copilot::EDITOR_VERSION;

    /// 실제로 기다리지 않고 요청된 대기 시간만 기록한다.
    #[derive(Default)]
    pub(crate) struct RecordingSleeper {
        pub calls: Mutex<Vec<Duration>>,
    }

    #[async_trait]
    impl Sleeper for RecordingSleeper {
        async fn sleep(&self, duration: Duration) {
            self.calls.lock().unwrap().push(duration);
        }
    }

    pub(crate) async fn mount_device_code(server: &MockServer) {
        Mock::given(method("POST"))
            .and(path("/login/device/code"))
            .and(header("editor-version", EDITOR_VERSION))
            .and(body_partial_json(
                serde_json::json!({ "client_id": CLIENT_ID, "scope": "read:user" }),
            ))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "device_code": "dev-123",
                "user_code": "ABCD-EFGH",
                "verification_uri": "https://github.com/login/device",
                "expires_in": 900,
                "interval": 5
            })))
            .mount(server)
            .await;
    }

    /// 처음 `pending_polls`번은 pending, 이후 `token`을 돌려주는 토큰 엔드포인트.
    pub(crate) async fn mount_access_token(server: &MockServer, pending_polls: usize, token: &str) {
        let polls = AtomicUsize::new(0);
        let token = token.to_string();
        Mock::given(method("POST"))
            .and(path("/login/oauth/access_token"))
            .and(body_partial_json(serde_json::json!({
                "device_code": "dev-123",
                "grant_type": DEVICE_GRANT_TYPE
            })))
            .respond_with(move |_req: &wiremock::Request| {
                if polls.fetch_add(1, Ordering::SeqCst) < pending_polls {
                    ResponseTemplate::new(200)
                        .set_body_json(serde_json::json!({ "error": "authorization_pending" }))
                } else {
                    ResponseTemplate::new(200).set_body_json(serde_json::json!({
                        "access_token": token,
                        "token_type": "bearer",
                        "scope": "read:user"
                    }))
                }
            })
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn polls_until_token_and_persists_it() {
        let server = MockServer::start().await;
        mount_device_code(&server).await;
        mount_access_token(&server, 2, "gho_device").await;

        let dir = tempfile::tempdir().expect("tempdir");
        let store = TokenStore::new(dir.path().join(".copilot_token"));
        let sleeper = Arc::new(RecordingSleeper::default());
        let client = DeviceAuthClient::new(Client::new(), server.uri()).with_sleeper(sleeper.clone());

        let credential = client.authorize(&store).await.expect("authorize");

        assert_eq!(credential.as_str(), "gho_device");
        assert_eq!(
            *sleeper.calls.lock().unwrap(),
            vec![Duration::from_secs(5); 3]
        );
        assert_eq!(
            std::fs::read_to_string(store.path()).unwrap(),
            "gho_device\n"
        );
    }

    #[tokio::test]
    async fn max_poll_duration_stops_the_loop() {
        let server = MockServer::start().await;
        mount_device_code(&server).await;
        mount_access_token(&server, usize::MAX, "never").await;

        let dir = tempfile::tempdir().expect("tempdir");
        let store = TokenStore::new(dir.path().join(".copilot_token"));
        let sleeper = Arc::new(RecordingSleeper::default());
        let client = DeviceAuthClient::new(Client::new(), server.uri())
            .with_poll_interval(Duration::from_secs(5))
            .with_max_poll(Some(Duration::from_secs(10)))
            .with_sleeper(sleeper.clone());

        let err = client.authorize(&store).await.unwrap_err();

        assert!(matches!(
            err.downcast_ref::<ReviewError>(),
            Some(ReviewError::AuthorizationTimedOut(10))
        ));
        assert_eq!(sleeper.calls.lock().unwrap().len(), 2);
        assert!(!store.path().exists());
    }

    #[tokio::test]
    async fn zero_poll_interval_still_waits_and_times_out() {
        let server = MockServer::start().await;
        mount_device_code(&server).await;
        mount_access_token(&server, usize::MAX, "never").await;

        let dir = tempfile::tempdir().expect("tempdir");
        let store = TokenStore::new(dir.path().join(".copilot_token"));
        let sleeper = Arc::new(RecordingSleeper::default());
        let client = DeviceAuthClient::new(Client::new(), server.uri())
            .with_poll_interval(Duration::ZERO)
            .with_max_poll(Some(Duration::from_secs(3)))
            .with_sleeper(sleeper.clone());

        let err = client.authorize(&store).await.unwrap_err();

        assert!(matches!(
            err.downcast_ref::<ReviewError>(),
            Some(ReviewError::AuthorizationTimedOut(3))
        ));
        assert_eq!(
            *sleeper.calls.lock().unwrap(),
            vec![Duration::from_secs(1); 3]
        );
    }

    #[tokio::test]
    async fn malformed_poll_response_is_fatal() {
        let server = MockServer::start().await;
        mount_device_code(&server).await;
        Mock::given(method("POST"))
            .and(path("/login/oauth/access_token"))
            .respond_with(ResponseTemplate::new(502).set_body_string("<html>bad gateway</html>"))
            .expect(1)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().expect("tempdir");
        let store = TokenStore::new(dir.path().join(".copilot_token"));
        let sleeper = Arc::new(RecordingSleeper::default());
        let client = DeviceAuthClient::new(Client::new(), server.uri()).with_sleeper(sleeper.clone());

        let err = client.authorize(&store).await.unwrap_err();

        assert!(format!("{err:#}").contains("invalid access token JSON"));
        assert_eq!(sleeper.calls.lock().unwrap().len(), 1);
        assert!(!store.path().exists());
    }

    #[tokio::test]
    async fn unreachable_poll_endpoint_is_fatal() {
        let device = DeviceCodeResponse {
            device_code: "dev-123".to_string(),
            user_code: "ABCD-EFGH".to_string(),
            verification_uri: "https://github.com/login/device".to_string(),
            expires_in: None,
        };
        let sleeper = Arc::new(RecordingSleeper::default());
        let client = DeviceAuthClient::new(Client::new(), "http://127.0.0.1:1")
            .with_sleeper(sleeper.clone());

        let err = client.poll_access_token(&device).await.unwrap_err();

        assert!(format!("{err:#}").contains("failed to poll access token"));
        assert_eq!(sleeper.calls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn device_code_failure_is_fatal() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/login/device/code"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().expect("tempdir");
        let store = TokenStore::new(dir.path().join(".copilot_token"));
        let client = DeviceAuthClient::new(Client::new(), server.uri())
            .with_sleeper(Arc::new(RecordingSleeper::default()));

        let err = client.authorize(&store).await.unwrap_err();
        assert!(format!("{err:#}").contains("device code request failed"));
    }
}
