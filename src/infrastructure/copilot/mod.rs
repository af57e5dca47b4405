//! GitHub Copilot 연동 모듈.
//! 디바이스 인증 → 자격 증명 풀 → 세션 토큰 → 스트리밍 채팅 순으로 구성된다.

pub mod chat;
pub mod credentials;
pub mod device_auth;
pub mod session;
pub mod stream;
pub mod token_store;

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};

pub const CLIENT_ID: &str = "Iv1.b507a08c87ecfe98";
pub const EDITOR_VERSION: &str = "Neovim/0.6.1";
pub const EDITOR_PLUGIN_VERSION: &str = "copilot.vim/1.16.0";
pub const USER_AGENT: &str = "GithubCopilot/1.155.0";
pub const CHAT_EDITOR_VERSION: &str = "vscode/1.80.1";

/// 디바이스 인증으로 얻은 장기 자격 증명.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

/// 채팅 호출마다 새로 발급받는 단기 토큰. 저장하지 않는다.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken(***)")
    }
}

/// 폴링 대기 추상화(테스트에서 시간 흐름을 대체).
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Copilot 호출용 HTTP 클라이언트. 스트리밍 응답이 길 수 있어 타임아웃을 두지 않는다.
pub fn build_http_client() -> Client {
    // TLS 설정 실패 등 예외 상황에서는 기본 클라이언트로 폴백한다.
    Client::builder()
        .user_agent(USER_AGENT)
        .build()
        .unwrap_or_else(|_| Client::new())
}

/// 에디터 식별 헤더(디바이스 인증/세션 토큰 요청 공통).
pub(crate) fn with_editor_headers(request: RequestBuilder) -> RequestBuilder {
    request
        .header("accept", "application/json")
        .header("editor-version", EDITOR_VERSION)
        .header("editor-plugin-version", EDITOR_PLUGIN_VERSION)
        .header("user-agent", USER_AGENT)
}
