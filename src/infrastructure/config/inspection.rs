//! 적용 설정 진단(inspection) 뷰 모델.

use serde::Serialize;

use super::loader::LoadedConfig;
use super::types::Config;
use super::utils::command_exists;
use crate::infrastructure::copilot::token_store::TokenStore;

#[derive(Debug, Clone, Serialize)]
pub struct ConfigInspection {
    pub searched_paths: Vec<String>,
    pub loaded_paths: Vec<String>,
    pub config: Config,
    pub effective: EffectiveSettings,
    pub credentials: CredentialInspection,
    pub gh: GhInspection,
}

#[derive(Debug, Clone, Serialize)]
pub struct EffectiveSettings {
    pub login_base: String,
    pub api_base: String,
    pub chat_base: String,
    pub model: String,
    pub poll_interval_secs: u64,
    pub max_poll_secs: Option<u64>,
    pub review_stages: usize,
    pub test_markers: Vec<String>,
}

/// 자격 증명 값 자체는 노출하지 않는다.
#[derive(Debug, Clone, Serialize)]
pub struct CredentialInspection {
    pub token_path: String,
    pub pool_size: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct GhInspection {
    pub command: String,
    pub command_available: bool,
}

impl ConfigInspection {
    pub(crate) fn from_loaded(loaded: LoadedConfig) -> Self {
        let config = loaded.config;
        let token_path = config.token_path();
        let gh_command = config.gh_command();

        Self {
            searched_paths: loaded
                .searched_paths
                .iter()
                .map(|p| p.display().to_string())
                .collect(),
            loaded_paths: loaded
                .loaded_paths
                .iter()
                .map(|p| p.display().to_string())
                .collect(),
            effective: EffectiveSettings {
                login_base: config.login_base(),
                api_base: config.api_base(),
                chat_base: config.chat_base(),
                model: config.model(),
                poll_interval_secs: config.poll_interval_secs(),
                max_poll_secs: config.max_poll_secs(),
                review_stages: config.prompt_set().stages().len(),
                test_markers: config.test_markers(),
            },
            credentials: CredentialInspection {
                token_path: token_path.display().to_string(),
                pool_size: TokenStore::new(token_path).pool_size(),
            },
            gh: GhInspection {
                command_available: command_exists(&gh_command),
                command: gh_command,
            },
            config,
        }
    }
}
