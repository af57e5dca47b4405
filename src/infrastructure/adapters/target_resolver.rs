//! 대상 URL 파싱 포트 구현 어댑터.

use crate::application::ports::TargetResolver;
use crate::domain::error::ReviewError;
use crate::domain::target::PullRequestTarget;

/// URL 문자열을 도메인 타깃으로 변환하는 어댑터.
pub struct UrlTargetResolver;

impl TargetResolver for UrlTargetResolver {
    fn parse(&self, input: &str) -> Result<PullRequestTarget, ReviewError> {
        PullRequestTarget::parse(input)
    }
}
