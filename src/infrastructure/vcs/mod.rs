//! 소스 컨트롤 CLI 연동 계층.

pub mod gh_cli;

pub use gh_cli::GhCliSource;
