//! 자격 증명 풀 + 최초 사용 시 디바이스 인증.

use anyhow::{Context, Result};
use tracing::info;

use super::Credential;
use super::device_auth::DeviceAuthClient;
use super::token_store::TokenStore;
use crate::domain::error::ReviewError;

pub struct CredentialPool {
    store: TokenStore,
    authorizer: DeviceAuthClient,
}

impl CredentialPool {
    pub fn new(store: TokenStore, authorizer: DeviceAuthClient) -> Self {
        Self { store, authorizer }
    }

    pub fn store(&self) -> &TokenStore {
        &self.store
    }

    /// 다음 자격 증명을 꺼낸다.
    /// 풀이 비어 있으면 디바이스 인증을 끝까지 수행한 뒤 한 번만 다시 읽는다.
    pub async fn acquire(&self) -> Result<Credential> {
        match self.store.next_credential() {
            Ok(credential) => Ok(credential),
            Err(ReviewError::NotAuthenticated(path)) => {
                info!(%path, "no copilot credential; starting device authorization");
                self.authorizer.authorize(&self.store).await?;
                self.store
                    .next_credential()
                    .context("credential missing after device authorization")
            }
            Err(err) => Err(err.into()),
        }
    }

    /// 풀 상태와 무관하게 디바이스 인증을 수행해 새 자격 증명을 추가한다.
    pub async fn enroll(&self) -> Result<usize> {
        self.authorizer.authorize(&self.store).await?;
        Ok(self.store.pool_size())
    }
}
