//! Copilot 디바이스 인증 유스케이스.

use anyhow::Result;

use crate::application::ports::{ConfigRepository, CopilotAuthenticator, Reporter};

/// 디바이스 인증을 수행해 자격 증명 풀에 하나를 추가한다.
pub struct AuthCopilotUseCase<'a> {
    pub config_repo: &'a dyn ConfigRepository,
    pub authenticator: &'a dyn CopilotAuthenticator,
    pub reporter: &'a dyn Reporter,
}

impl<'a> AuthCopilotUseCase<'a> {
    pub async fn execute(&self) -> Result<()> {
        let config = self.config_repo.load()?;

        self.reporter.section("Copilot Device Authorization");
        let outcome = self.authenticator.authorize(&config).await?;

        self.reporter.status("Auth", "authentication success");
        self.reporter
            .kv("Token File", &outcome.token_path.display().to_string());
        self.reporter
            .kv("Pool Size", &outcome.pool_size.to_string());
        Ok(())
    }
}
