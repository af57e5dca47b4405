//! Copilot 스트리밍 채팅 클라이언트.

use std::io;

use anyhow::Result;
use futures::StreamExt;
use reqwest::Client;
use serde::Serialize;
use tokio_util::io::StreamReader;
use tracing::{debug, warn};

use super::credentials::CredentialPool;
use super::device_auth::DeviceAuthClient;
use super::session::SessionTokenExchanger;
use super::stream::decode_reader;
use super::token_store::TokenStore;
use super::{CHAT_EDITOR_VERSION, SessionToken, build_http_client};
use crate::domain::error::ReviewError;
use crate::domain::review::{ChatMessage, Conversation};
use crate::infrastructure::config::Config;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    intent: bool,
    model: &'a str,
    temperature: f32,
    top_p: f32,
    n: u32,
    stream: bool,
    messages: &'a [ChatMessage],
}

pub struct StreamingChatClient {
    client: Client,
    chat_base: String,
    model: String,
    credentials: CredentialPool,
    exchanger: SessionTokenExchanger,
}

impl StreamingChatClient {
    pub fn new(
        client: Client,
        chat_base: impl Into<String>,
        model: impl Into<String>,
        credentials: CredentialPool,
        exchanger: SessionTokenExchanger,
    ) -> Self {
        Self {
            client,
            chat_base: chat_base.into(),
            model: model.into(),
            credentials,
            exchanger,
        }
    }

    /// 설정값으로 자격 증명 풀/디바이스 인증/세션 교환기를 함께 구성한다.
    pub fn from_config(config: &Config) -> Self {
        let client = build_http_client();
        let credentials = CredentialPool::new(
            TokenStore::new(config.token_path()),
            DeviceAuthClient::from_config(client.clone(), config),
        );
        let exchanger = SessionTokenExchanger::new(client.clone(), config.api_base());
        Self::new(
            client,
            config.chat_base(),
            config.model(),
            credentials,
            exchanger,
        )
    }

    /// 호출마다 다음 자격 증명으로 새 세션 토큰을 받아 요청한다.
    /// 응답 텍스트는 assistant 메시지로 대화에 추가된다.
    pub async fn send(&self, conversation: &mut Conversation) -> Result<String> {
        let credential = self.credentials.acquire().await?;
        let session = self.exchanger.exchange(&credential).await?;

        let text = self.complete(&session, conversation.messages()).await;
        conversation.push_assistant(text.clone());
        Ok(text)
    }

    async fn complete(&self, session: &SessionToken, messages: &[ChatMessage]) -> String {
        let response = match self.post_chat(session, messages).await {
            Ok(response) => response,
            Err(err) => {
                warn!(error = %err, "copilot: chat request failed; using empty completion");
                return String::new();
            }
        };

        let status = response.status();
        let body = StreamReader::new(
            response
                .bytes_stream()
                .map(|chunk| chunk.map_err(io::Error::other)),
        );
        let decoded = decode_reader(body).await;

        let text = decoded.text;
        if text.is_empty() {
            warn!(
                %status,
                body = %decoded.raw,
                "copilot: chat completion produced no content"
            );
        } else {
            debug!(%status, chars = text.len(), "copilot: chat completion decoded");
        }
        text
    }

    async fn post_chat(
        &self,
        session: &SessionToken,
        messages: &[ChatMessage],
    ) -> Result<reqwest::Response, ReviewError> {
        let url = format!("{}/chat/completions", self.chat_base);
        let payload = ChatRequest {
            intent: false,
            model: &self.model,
            temperature: 0.0,
            top_p: 1.0,
            n: 1,
            stream: true,
            messages,
        };

        self.client
            .post(&url)
            .bearer_auth(session.as_str())
            .header("Editor-Version", CHAT_EDITOR_VERSION)
            .json(&payload)
            .send()
            .await
            .map_err(|err| ReviewError::Transport(err.to_string()))
    }
}
