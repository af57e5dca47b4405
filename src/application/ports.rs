//! 애플리케이션 계층이 의존하는 포트(추상 인터페이스) 모음.

use std::path::PathBuf;

use anyhow::Result;
use async_trait::async_trait;

use crate::domain::error::ReviewError;
use crate::domain::review::Conversation;
use crate::domain::target::PullRequestTarget;
use crate::infrastructure::config::Config;

/// 설정 로딩/점검을 담당하는 저장소 포트.
pub trait ConfigRepository: Send + Sync {
    fn load(&self) -> Result<Config>;
    fn inspect_pretty_json(&self) -> Result<String>;
}

/// URL 입력값을 도메인 대상 식별자로 변환하는 포트.
pub trait TargetResolver: Send + Sync {
    fn parse(&self, input: &str) -> Result<PullRequestTarget, ReviewError>;
}

/// PR 제목/본문/diff 조회 포트(gh CLI 등).
#[async_trait]
pub trait PullRequestSource: Send + Sync {
    async fn fetch_title(&self) -> Result<String, ReviewError>;
    async fn fetch_body(&self) -> Result<String, ReviewError>;
    async fn fetch_diff(&self) -> Result<String, ReviewError>;
}

/// 대상 PR에 맞는 조회기를 생성하는 팩토리 포트.
pub trait PullRequestSourceFactory: Send + Sync {
    fn build(&self, target: &PullRequestTarget, config: &Config) -> Box<dyn PullRequestSource>;
}

/// 채팅 완성 호출 포트.
#[async_trait]
pub trait ChatClient: Send + Sync {
    /// 대화 전체를 보내고 응답 텍스트를 반환한다.
    /// 응답은 assistant 메시지로 `conversation`에 추가된다.
    /// 전송 실패는 빈 문자열로 반환되며, 인증 단계 오류만 `Err`가 된다.
    async fn send(&self, conversation: &mut Conversation) -> Result<String>;
}

/// 설정에 맞는 채팅 클라이언트를 생성하는 팩토리 포트.
pub trait ChatClientFactory: Send + Sync {
    fn build(&self, config: &Config) -> Result<Box<dyn ChatClient>>;
}

/// 디바이스 인증 결과.
#[derive(Debug, Clone)]
pub struct AuthOutcome {
    pub token_path: PathBuf,
    pub pool_size: usize,
}

/// Copilot 디바이스 인증 포트.
#[async_trait]
pub trait CopilotAuthenticator: Send + Sync {
    async fn authorize(&self, config: &Config) -> Result<AuthOutcome>;
}

/// 최종 리뷰 결과 저장 포트.
#[async_trait]
pub trait OutputWriter: Send + Sync {
    async fn write(&self, path: &str, content: &str) -> Result<()>;
}

/// 콘솔/로그 출력 추상화 포트.
pub trait Reporter: Send + Sync {
    fn section(&self, name: &str);
    fn kv(&self, key: &str, value: &str);
    fn status(&self, scope: &str, message: &str);
    fn raw(&self, line: &str);
}
