//! 단계별 채팅 호출(일반/초점/종합) 실행.

use std::time::Instant;

use anyhow::{Context, Result};

use crate::application::ports::ChatClient;
use crate::application::usecases::review_pr::{ReviewPrUseCase, context::ExecutionContext};
use crate::domain::review::{Conversation, ReviewStage};

/// 단계 실행 결과 묶음.
pub(super) struct StageOutcome {
    pub synthesis: String,
    pub empty_stages: usize,
}

/// 모든 단계를 순차 실행한다. 종합 단계는 앞선 결과 전체에 의존한다.
pub(super) async fn run_review_stages(
    use_case: &ReviewPrUseCase<'_>,
    ctx: &ExecutionContext,
) -> Result<StageOutcome> {
    let chat = use_case
        .chat_factory
        .build(&ctx.config)
        .context("failed to build chat client")?;

    let prompts = ctx.config.prompt_set();
    let stages = prompts.stages();

    use_case.reporter.section("Review Stages");
    use_case.reporter.kv("Stages", &stages.len().to_string());

    let mut intermediate = Vec::new();
    let mut synthesis = String::new();
    let mut empty_stages = 0;

    for stage in stages {
        let prompt = prompts.build(stage, &ctx.pull_request, &intermediate);
        let text = run_stage(use_case, chat.as_ref(), stage, prompt).await?;
        if text.is_empty() {
            empty_stages += 1;
        }

        match stage {
            ReviewStage::Synthesis => synthesis = text,
            _ => intermediate.push(text),
        }
    }

    Ok(StageOutcome {
        synthesis,
        empty_stages,
    })
}

async fn run_stage(
    use_case: &ReviewPrUseCase<'_>,
    chat: &dyn ChatClient,
    stage: ReviewStage,
    prompt: String,
) -> Result<String> {
    let label = stage.label();
    use_case.reporter.status(&label, "running");
    let started = Instant::now();

    // 단계마다 새 대화를 사용한다.
    let mut conversation = Conversation::with_user(prompt);
    let text = chat
        .send(&mut conversation)
        .await
        .with_context(|| format!("{label} stage failed"))?;

    let sec = started.elapsed().as_secs_f32();
    if text.is_empty() {
        use_case
            .reporter
            .status(&label, &format!("empty response ({sec:.1}s)"));
    } else {
        use_case
            .reporter
            .status(&label, &format!("done, {} chars ({sec:.1}s)", text.len()));
    }
    Ok(text)
}
