//! 리뷰 도메인 엔티티/값 객체.

use serde::Serialize;

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub url: String,
    pub output_path: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

/// 채팅 호출 단위의 메시지 목록.
/// 호출 전 user 메시지 하나, 호출 후 assistant 메시지 하나가 추가된다.
#[derive(Debug, Clone, Default)]
pub struct Conversation {
    messages: Vec<ChatMessage>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    /// user 메시지 하나로 시작하는 대화.
    pub fn with_user(content: impl Into<String>) -> Self {
        let mut conversation = Self::new();
        conversation.push_user(content);
        conversation
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        self.messages.push(ChatMessage {
            role: Role::User,
            content: content.into(),
        });
    }

    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.messages.push(ChatMessage {
            role: Role::Assistant,
            content: content.into(),
        });
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }
}

/// 실행당 한 번 조회되는 PR 정보. 조회 실패 항목은 빈 문자열이다.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PullRequestContext {
    pub title: String,
    pub body: String,
    pub diff: String,
}

/// 리뷰 단계 구분.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewStage {
    /// 초점 문구 없는 일반 리뷰
    General,
    /// 설정된 초점 문구 목록의 n번째
    Focus(usize),
    /// 앞선 결과를 모두 포함하는 최종 종합
    Synthesis,
}

impl ReviewStage {
    pub fn label(self) -> String {
        match self {
            Self::General => "general".to_string(),
            Self::Focus(idx) => format!("focus #{}", idx + 1),
            Self::Synthesis => "synthesis".to_string(),
        }
    }
}
