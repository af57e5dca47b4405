//! 리뷰 프롬프트 구성 정책.

use crate::domain::review::{PullRequestContext, ReviewStage};

pub const DEFAULT_INSTRUCTION: &str = "Your task is to review the following Git pull request (PR) and provide suggestions for improvement including code examples in form of comparisons. \
Focus on new PR code (lines starting with '+'). \
Keep in mind that PR description may be partial, simplistic, non-informative or out of date. Hence, compare them to the PR diff code, and use them only as a reference.\n";

pub const DEFAULT_FOCUS_PROMPTS: [&str; 3] = [
    "Pay more attention to logic error, naming, initialization/destruction, logic simplification, syntax modernization, readability, consistency, error handling and code duplication",
    "Find code smell, feature envy and violation of best practice or design principles",
    "Provide improvement suggestion on software design, refactoring, performance and security",
];

pub const DEFAULT_SYNTHESIS_PROMPT: &str = "ChatGPT, could you please review the code based on the suggestions provided and offer a corrected version of the code? Focus on suggestions rather than correct code.";

pub const DEFAULT_TEST_MARKERS: [&str; 2] = ["test/", "tests/"];

/// 프롬프트 문구 묶음(설정으로 덮어쓸 수 있음).
#[derive(Debug, Clone)]
pub struct PromptSet {
    pub instruction: String,
    pub focus_prompts: Vec<String>,
    pub synthesis_prompt: String,
}

impl Default for PromptSet {
    fn default() -> Self {
        Self {
            instruction: DEFAULT_INSTRUCTION.to_string(),
            focus_prompts: DEFAULT_FOCUS_PROMPTS.iter().map(|s| s.to_string()).collect(),
            synthesis_prompt: DEFAULT_SYNTHESIS_PROMPT.to_string(),
        }
    }
}

impl PromptSet {
    /// 실행 순서대로의 단계 목록. 일반 리뷰 → 초점 리뷰들 → 종합.
    pub fn stages(&self) -> Vec<ReviewStage> {
        let mut stages = vec![ReviewStage::General];
        stages.extend((0..self.focus_prompts.len()).map(ReviewStage::Focus));
        stages.push(ReviewStage::Synthesis);
        stages
    }

    /// 단계별 프롬프트를 생성한다.
    /// 종합 단계는 `prior_results`(앞선 단계 결과)를 본문 앞에 포함한다.
    pub fn build(
        &self,
        stage: ReviewStage,
        context: &PullRequestContext,
        prior_results: &[String],
    ) -> String {
        let mut out = String::new();
        out.push_str(&self.instruction);

        match stage {
            ReviewStage::General => {}
            ReviewStage::Focus(idx) => {
                if let Some(focus) = self.focus_prompts.get(idx) {
                    out.push_str(focus);
                }
            }
            ReviewStage::Synthesis => {
                out.push_str(&self.synthesis_prompt);
                out.push('\n');
                // 결과 사이에 구분자를 넣지 않는다.
                out.push_str(&prior_results.concat());
            }
        }

        out.push_str(&render_context(context));
        out
    }
}

fn render_context(context: &PullRequestContext) -> String {
    format!(
        "\n\nTitle:\n{}\n\nBody:\n{}\n\nDiff:\n{}",
        context.title, context.body, context.diff
    )
}
