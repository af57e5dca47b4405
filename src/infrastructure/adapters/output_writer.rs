//! 결과 파일 저장 포트 구현 어댑터.

use anyhow::{Context, Result};
use async_trait::async_trait;

use crate::application::ports::OutputWriter;

/// 결과를 UTF-8 파일로 덮어쓴다.
pub struct FileOutputWriter;

#[async_trait]
impl OutputWriter for FileOutputWriter {
    async fn write(&self, path: &str, content: &str) -> Result<()> {
        tokio::fs::write(path, content)
            .await
            .with_context(|| format!("failed to write {path}"))
    }
}
