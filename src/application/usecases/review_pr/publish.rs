//! 최종 종합 결과 저장 단계.

use anyhow::{Context, Result};

use crate::application::usecases::review_pr::ReviewPrUseCase;
use crate::domain::review::RunOptions;

/// 종합 결과를 출력 파일에 그대로 기록(덮어쓰기)하고 콘솔에도 보여준다.
pub(super) async fn publish_result(
    use_case: &ReviewPrUseCase<'_>,
    options: &RunOptions,
    synthesis: &str,
) -> Result<()> {
    use_case.reporter.section("Final Result");
    use_case.reporter.raw(synthesis);

    use_case
        .output_writer
        .write(&options.output_path, synthesis)
        .await
        .with_context(|| format!("failed to write review to {}", options.output_path))?;

    use_case.reporter.section("Done");
    use_case
        .reporter
        .status("Output", &format!("written to {}", options.output_path));
    Ok(())
}
