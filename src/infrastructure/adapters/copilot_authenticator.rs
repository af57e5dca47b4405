//! Copilot 디바이스 인증 포트 구현 어댑터.

use anyhow::Result;
use async_trait::async_trait;

use crate::application::ports::{AuthOutcome, CopilotAuthenticator};
use crate::infrastructure::config::Config;
use crate::infrastructure::copilot::build_http_client;
use crate::infrastructure::copilot::credentials::CredentialPool;
use crate::infrastructure::copilot::device_auth::DeviceAuthClient;
use crate::infrastructure::copilot::token_store::TokenStore;

/// 디바이스 인증으로 자격 증명 풀에 하나를 추가한다.
pub struct CopilotAuthenticatorAdapter;

#[async_trait]
impl CopilotAuthenticator for CopilotAuthenticatorAdapter {
    async fn authorize(&self, config: &Config) -> Result<AuthOutcome> {
        let pool = CredentialPool::new(
            TokenStore::new(config.token_path()),
            DeviceAuthClient::from_config(build_http_client(), config),
        );
        let pool_size = pool.enroll().await?;

        Ok(AuthOutcome {
            token_path: pool.store().path().to_path_buf(),
            pool_size,
        })
    }
}
