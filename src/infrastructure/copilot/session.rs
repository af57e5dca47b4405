//! 자격 증명 → 단기 세션 토큰 교환.

use anyhow::{Context, Result};
use reqwest::Client;
use serde_json::Value;
use tracing::warn;

use super::{Credential, SessionToken, with_editor_headers};

pub struct SessionTokenExchanger {
    client: Client,
    api_base: String,
}

impl SessionTokenExchanger {
    pub fn new(client: Client, api_base: impl Into<String>) -> Self {
        Self {
            client,
            api_base: api_base.into(),
        }
    }

    /// 응답에 `token`이 없으면 빈 토큰을 돌려준다(채팅 호출 쪽에서 인증 오류가 난다).
    pub async fn exchange(&self, credential: &Credential) -> Result<SessionToken> {
        let url = format!("{}/copilot_internal/v2/token", self.api_base);
        let response = with_editor_headers(self.client.get(&url))
            .header("authorization", format!("token {}", credential.as_str()))
            .send()
            .await
            .context("copilot: failed to request session token")?;

        let status = response.status();
        let body: Value = response
            .json()
            .await
            .context("copilot: invalid session token JSON")?;

        let token = body
            .get("token")
            .and_then(Value::as_str)
            .unwrap_or_default();
        if token.is_empty() {
            warn!(%status, "copilot: session token response has no token field");
        }

        Ok(SessionToken::new(token))
    }
}
