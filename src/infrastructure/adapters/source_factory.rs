//! PR 조회 포트 팩토리 어댑터.

use crate::application::ports::{PullRequestSource, PullRequestSourceFactory};
use crate::domain::target::PullRequestTarget;
use crate::infrastructure::config::Config;
use crate::infrastructure::vcs::GhCliSource;

/// 설정된 gh 명령으로 조회기를 만든다.
pub struct GhSourceFactory;

impl PullRequestSourceFactory for GhSourceFactory {
    fn build(&self, target: &PullRequestTarget, config: &Config) -> Box<dyn PullRequestSource> {
        Box::new(GhCliSource::new(config.gh_command(), target))
    }
}
