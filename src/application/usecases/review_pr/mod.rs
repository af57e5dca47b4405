//! PR 리뷰 실행의 전체 오케스트레이션 유스케이스.

mod context;
mod publish;
mod stages;

use anyhow::Result;

use crate::application::ports::{
    ChatClientFactory, ConfigRepository, OutputWriter, PullRequestSourceFactory, Reporter,
    TargetResolver,
};
use crate::domain::review::RunOptions;

use context::load_execution_context;
use publish::publish_result;
use stages::run_review_stages;

/// URL 입력부터 PR 조회, 단계별 채팅 호출, 결과 저장까지 전체 흐름을 조율한다.
pub struct ReviewPrUseCase<'a> {
    pub config_repo: &'a dyn ConfigRepository,
    pub target_resolver: &'a dyn TargetResolver,
    pub source_factory: &'a dyn PullRequestSourceFactory,
    pub chat_factory: &'a dyn ChatClientFactory,
    pub output_writer: &'a dyn OutputWriter,
    pub reporter: &'a dyn Reporter,
}

impl<'a> ReviewPrUseCase<'a> {
    /// 리뷰 본 실행 진입점.
    /// 모든 단계를 순차 실행하고 마지막(종합) 결과만 출력 파일에 기록한다.
    pub async fn execute(&self, options: RunOptions) -> Result<String> {
        self.reporter.section("Session");
        self.reporter.kv("Target", &options.url);
        self.reporter.kv("Output", &options.output_path);

        let ctx = load_execution_context(self, &options).await?;
        let outcome = run_review_stages(self, &ctx).await?;
        if outcome.empty_stages > 0 {
            self.reporter.status(
                "Review",
                &format!("{} stage(s) produced no content", outcome.empty_stages),
            );
        }
        publish_result(self, &options, &outcome.synthesis).await?;

        Ok(outcome.synthesis)
    }
}
