//! 리뷰 실행 중 발생하는 오류 분류.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReviewError {
    /// `{owner}/{repo}/pull/{id}` 형태가 아닌 PR URL
    #[error("invalid pull request URL format: {0}")]
    InvalidUrlFormat(String),

    /// 자격 증명 파일이 없거나 비어 있음
    #[error("not authenticated: no credential found in {0}")]
    NotAuthenticated(String),

    /// 자격 증명 파일 입출력 실패
    #[error("credential store error at {path}: {source}")]
    CredentialStore {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// 디바이스 인증 폴링이 설정된 최대 시간을 넘김
    #[error("device authorization timed out after {0} seconds")]
    AuthorizationTimedOut(u64),

    /// HTTP 요청 자체의 실패(연결 거부 등)
    #[error("transport error: {0}")]
    Transport(String),

    /// 외부 명령(gh 등)의 비정상 종료
    #[error("command `{command}` failed ({status}): {stderr}")]
    ExternalCommand {
        command: String,
        status: String,
        stderr: String,
    },

    /// 스트림 이벤트 라인의 JSON 파싱 실패
    #[error("malformed stream chunk: {0}")]
    MalformedStreamChunk(String),
}
