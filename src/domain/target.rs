//! 입력 URL을 리뷰 대상 PR로 해석하는 모듈.

use url::Url;

use crate::domain::error::ReviewError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestTarget {
    pub host: String,
    /// `owner/repo`
    pub repo: String,
    pub number: String,
    pub url: String,
}

impl PullRequestTarget {
    /// `https://<host>/<owner>/<repo>/pull/<id>[/...]` 형태만 허용한다.
    pub fn parse(input: &str) -> Result<Self, ReviewError> {
        let invalid = || ReviewError::InvalidUrlFormat(input.to_string());

        let url = Url::parse(input).map_err(|_| invalid())?;
        let host = url.host_str().ok_or_else(invalid)?.to_string();

        let segments: Vec<&str> = url
            .path_segments()
            .map(|s| s.filter(|p| !p.is_empty()).collect())
            .unwrap_or_default();

        // /owner/repo/pull/<id>
        if segments.len() < 4 || segments[2] != "pull" {
            return Err(invalid());
        }

        Ok(Self {
            host,
            repo: format!("{}/{}", segments[0], segments[1]),
            number: segments[3].to_string(),
            url: input.to_string(),
        })
    }

    /// `gh --repo` 인자로 쓰는 `<host>/<owner>/<repo>` 표기.
    pub fn qualified_repo(&self) -> String {
        format!("{}/{}", self.host, self.repo)
    }
}
