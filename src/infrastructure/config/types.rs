//! 설정 스키마와 병합/해석 규칙.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::domain::policy::{DEFAULT_TEST_MARKERS, PromptSet};

pub const DEFAULT_LOGIN_BASE: &str = "https://github.com";
pub const DEFAULT_API_BASE: &str = "https://api.github.com";
pub const DEFAULT_CHAT_BASE: &str = "https://api.githubcopilot.com";
pub const DEFAULT_MODEL: &str = "gpt-4-0613";
pub const DEFAULT_TOKEN_PATH: &str = ".copilot_token";
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 5;
pub const DEFAULT_GH_COMMAND: &str = "gh";

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    /// Copilot 엔드포인트/모델
    #[serde(default)]
    pub copilot: CopilotConfig,
    /// 디바이스 인증과 자격 증명 파일
    #[serde(default)]
    pub auth: AuthConfig,
    /// 리뷰 프롬프트/diff 필터
    #[serde(default)]
    pub review: ReviewConfig,
    /// gh CLI 실행 설정
    #[serde(default)]
    pub gh: GhConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct CopilotConfig {
    /// 디바이스 코드/액세스 토큰 발급 호스트
    pub login_base: Option<String>,
    /// 세션 토큰 발급 API 베이스
    pub api_base: Option<String>,
    /// 채팅 완성 API 베이스
    pub chat_base: Option<String>,
    pub model: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct AuthConfig {
    /// 자격 증명 파일 경로(한 줄에 하나)
    pub token_path: Option<String>,
    /// 액세스 토큰 폴링 간격(초)
    pub poll_interval_secs: Option<u64>,
    /// 폴링 최대 시간(초). 미지정이면 무제한
    pub max_poll_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct ReviewConfig {
    /// 모든 프롬프트 앞에 붙는 공통 지시문
    pub instruction: Option<String>,
    /// 초점 리뷰 문구 목록(단계 수를 결정)
    pub focus_prompts: Option<Vec<String>>,
    /// 종합 단계 문구
    pub synthesis_prompt: Option<String>,
    /// diff 헤더에 포함되면 해당 파일 섹션을 제외하는 문자열
    pub test_markers: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct GhConfig {
    pub command: Option<String>,
}

impl Config {
    pub fn login_base(&self) -> String {
        base_or(&self.copilot.login_base, DEFAULT_LOGIN_BASE)
    }

    pub fn api_base(&self) -> String {
        base_or(&self.copilot.api_base, DEFAULT_API_BASE)
    }

    pub fn chat_base(&self) -> String {
        base_or(&self.copilot.chat_base, DEFAULT_CHAT_BASE)
    }

    pub fn model(&self) -> String {
        self.copilot
            .model
            .clone()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string())
    }

    pub fn token_path(&self) -> PathBuf {
        PathBuf::from(
            self.auth
                .token_path
                .as_deref()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(DEFAULT_TOKEN_PATH),
        )
    }

    /// 0은 무시하고 기본 간격을 쓴다.
    pub fn poll_interval_secs(&self) -> u64 {
        self.auth
            .poll_interval_secs
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_POLL_INTERVAL_SECS)
    }

    pub fn max_poll_secs(&self) -> Option<u64> {
        self.auth.max_poll_secs
    }

    pub fn gh_command(&self) -> String {
        self.gh
            .command
            .clone()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_GH_COMMAND.to_string())
    }

    pub fn test_markers(&self) -> Vec<String> {
        self.review
            .test_markers
            .clone()
            .unwrap_or_else(|| DEFAULT_TEST_MARKERS.iter().map(|s| s.to_string()).collect())
    }

    /// 기본 프롬프트 문구에 설정값을 덮어쓴 결과.
    pub fn prompt_set(&self) -> PromptSet {
        let mut prompts = PromptSet::default();
        if let Some(instruction) = &self.review.instruction {
            prompts.instruction = instruction.clone();
        }
        if let Some(focus) = &self.review.focus_prompts {
            prompts.focus_prompts = focus.clone();
        }
        if let Some(synthesis) = &self.review.synthesis_prompt {
            prompts.synthesis_prompt = synthesis.clone();
        }
        prompts
    }

    /// 후순위(나중 파일) 값으로 덮어쓰는 병합 규칙.
    pub(crate) fn merge_from(&mut self, other: Config) {
        self.copilot.merge_from(other.copilot);
        self.auth.merge_from(other.auth);
        self.review.merge_from(other.review);
        if other.gh.command.is_some() {
            self.gh.command = other.gh.command;
        }
    }
}

impl CopilotConfig {
    fn merge_from(&mut self, other: CopilotConfig) {
        if other.login_base.is_some() {
            self.login_base = other.login_base;
        }
        if other.api_base.is_some() {
            self.api_base = other.api_base;
        }
        if other.chat_base.is_some() {
            self.chat_base = other.chat_base;
        }
        if other.model.is_some() {
            self.model = other.model;
        }
    }
}

impl AuthConfig {
    fn merge_from(&mut self, other: AuthConfig) {
        if other.token_path.is_some() {
            self.token_path = other.token_path;
        }
        if other.poll_interval_secs.is_some() {
            self.poll_interval_secs = other.poll_interval_secs;
        }
        if other.max_poll_secs.is_some() {
            self.max_poll_secs = other.max_poll_secs;
        }
    }
}

impl ReviewConfig {
    fn merge_from(&mut self, other: ReviewConfig) {
        if other.instruction.is_some() {
            self.instruction = other.instruction;
        }
        if other.focus_prompts.is_some() {
            self.focus_prompts = other.focus_prompts;
        }
        if other.synthesis_prompt.is_some() {
            self.synthesis_prompt = other.synthesis_prompt;
        }
        if other.test_markers.is_some() {
            self.test_markers = other.test_markers;
        }
    }
}

fn base_or(value: &Option<String>, default: &str) -> String {
    value
        .as_deref()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or(default)
        .trim_end_matches('/')
        .to_string()
}
