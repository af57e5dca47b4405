//! 애플리케이션 포트를 실제 인프라 구현체로 연결하는 어댑터 계층.

mod chat_factory;
mod config_repository;
mod copilot_authenticator;
mod output_writer;
mod reporter;
mod source_factory;
mod target_resolver;

pub use chat_factory::CopilotChatFactory;
pub use config_repository::JsonConfigRepository;
pub use copilot_authenticator::CopilotAuthenticatorAdapter;
pub use output_writer::FileOutputWriter;
pub use reporter::ConsoleReporter;
pub use source_factory::GhSourceFactory;
pub use target_resolver::UrlTargetResolver;
