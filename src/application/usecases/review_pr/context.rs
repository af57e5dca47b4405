//! 리뷰 실행 컨텍스트(설정/대상/PR 정보) 준비 단계.

use anyhow::{Context, Result};
use tracing::warn;

use crate::application::ports::PullRequestSource;
use crate::application::usecases::review_pr::ReviewPrUseCase;
use crate::domain::diff::{count_sections, filter_test_sections};
use crate::domain::error::ReviewError;
use crate::domain::review::{PullRequestContext, RunOptions};
use crate::infrastructure::config::Config;

/// 리뷰 유스케이스 전 구간에서 공유되는 실행 상태.
pub(super) struct ExecutionContext {
    pub config: Config,
    pub pull_request: PullRequestContext,
}

/// 설정 로딩, 대상 파싱, PR 정보 조회 및 diff 필터링까지 선행한다.
pub(super) async fn load_execution_context(
    use_case: &ReviewPrUseCase<'_>,
    options: &RunOptions,
) -> Result<ExecutionContext> {
    // URL 오류는 네트워크/프로세스 호출 이전에 드러나야 한다.
    let target = use_case
        .target_resolver
        .parse(&options.url)
        .context("failed to parse pull request URL")?;

    use_case.reporter.section("Load Config");
    let config = use_case
        .config_repo
        .load()
        .context("failed to load copilot-review config")?;

    use_case.reporter.section("Fetch Pull Request");
    use_case.reporter.kv("Host", &target.host);
    use_case.reporter.kv("Repo", &target.repo);
    use_case.reporter.kv("Number", &target.number);

    let source = use_case.source_factory.build(&target, &config);
    let pull_request = fetch_pull_request(use_case, source.as_ref(), &config).await;

    Ok(ExecutionContext {
        config,
        pull_request,
    })
}

async fn fetch_pull_request(
    use_case: &ReviewPrUseCase<'_>,
    source: &dyn PullRequestSource,
    config: &Config,
) -> PullRequestContext {
    let title = or_empty(use_case, "title", source.fetch_title().await);
    let body = or_empty(use_case, "body", source.fetch_body().await);
    let raw_diff = or_empty(use_case, "diff", source.fetch_diff().await);

    let markers = config.test_markers();
    let diff = filter_test_sections(&raw_diff, &markers);
    use_case.reporter.kv(
        "Diff",
        &format!(
            "{} of {} file sections kept",
            count_sections(&diff),
            count_sections(&raw_diff)
        ),
    );

    PullRequestContext { title, body, diff }
}

/// 조회 실패는 빈 문자열로 대체하고 실행은 계속한다.
fn or_empty(
    use_case: &ReviewPrUseCase<'_>,
    field: &str,
    fetched: Result<String, ReviewError>,
) -> String {
    match fetched {
        Ok(text) => text,
        Err(err) => {
            warn!(field, error = %err, "pull request fetch failed; continuing with empty text");
            use_case
                .reporter
                .status("PR", &format!("failed to fetch {field}: {err}"));
            String::new()
        }
    }
}
