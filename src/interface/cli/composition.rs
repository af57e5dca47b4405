//! 애플리케이션 조립(composition root) 모듈.

use crate::application::usecases::auth_copilot::AuthCopilotUseCase;
use crate::application::usecases::inspect_config::InspectConfigUseCase;
use crate::application::usecases::review_pr::ReviewPrUseCase;
use crate::infrastructure::adapters::{
    ConsoleReporter, CopilotAuthenticatorAdapter, CopilotChatFactory, FileOutputWriter,
    GhSourceFactory, JsonConfigRepository, UrlTargetResolver,
};

/// 실행 시점 의존성을 한 곳에서 조립하는 컨테이너.
pub struct AppComposition {
    config_repo: JsonConfigRepository,
    target_resolver: UrlTargetResolver,
    source_factory: GhSourceFactory,
    chat_factory: CopilotChatFactory,
    authenticator: CopilotAuthenticatorAdapter,
    output_writer: FileOutputWriter,
    reporter: ConsoleReporter,
}

impl Default for AppComposition {
    fn default() -> Self {
        Self {
            config_repo: JsonConfigRepository,
            target_resolver: UrlTargetResolver,
            source_factory: GhSourceFactory,
            chat_factory: CopilotChatFactory,
            authenticator: CopilotAuthenticatorAdapter,
            output_writer: FileOutputWriter,
            reporter: ConsoleReporter::new(),
        }
    }
}

impl AppComposition {
    /// Copilot 디바이스 인증 유스케이스를 생성한다.
    pub fn auth_copilot_usecase(&self) -> AuthCopilotUseCase<'_> {
        AuthCopilotUseCase {
            config_repo: &self.config_repo,
            authenticator: &self.authenticator,
            reporter: &self.reporter,
        }
    }

    /// 설정 점검 유스케이스를 생성한다.
    pub fn inspect_config_usecase(&self) -> InspectConfigUseCase<'_> {
        InspectConfigUseCase {
            config_repo: &self.config_repo,
        }
    }

    /// 리뷰 실행 유스케이스를 생성한다.
    pub fn review_usecase(&self) -> ReviewPrUseCase<'_> {
        ReviewPrUseCase {
            config_repo: &self.config_repo,
            target_resolver: &self.target_resolver,
            source_factory: &self.source_factory,
            chat_factory: &self.chat_factory,
            output_writer: &self.output_writer,
            reporter: &self.reporter,
        }
    }
}
