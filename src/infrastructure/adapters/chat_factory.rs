//! 채팅 클라이언트 포트 구현 어댑터.

use anyhow::Result;
use async_trait::async_trait;

use crate::application::ports::{ChatClient, ChatClientFactory};
use crate::domain::review::Conversation;
use crate::infrastructure::config::Config;
use crate::infrastructure::copilot::chat::StreamingChatClient;

/// Copilot 스트리밍 클라이언트 팩토리 어댑터.
pub struct CopilotChatFactory;

impl ChatClientFactory for CopilotChatFactory {
    fn build(&self, config: &Config) -> Result<Box<dyn ChatClient>> {
        Ok(Box::new(CopilotChatAdapter {
            inner: StreamingChatClient::from_config(config),
        }))
    }
}

/// 인프라 클라이언트를 애플리케이션 포트로 감싸는 래퍼.
/// 자격 증명 순환 커서가 실행 내내 유지되도록 하나의 인스턴스를 재사용한다.
struct CopilotChatAdapter {
    inner: StreamingChatClient,
}

#[async_trait]
impl ChatClient for CopilotChatAdapter {
    async fn send(&self, conversation: &mut Conversation) -> Result<String> {
        self.inner.send(conversation).await
    }
}
