//! 스트리밍 채팅 응답(`data: {...}` 줄) 디코더.

use std::pin::pin;

use futures::StreamExt;
use serde_json::Value;
use tokio::io::AsyncRead;
use tokio_util::codec::{FramedRead, LinesCodec};
use tracing::{debug, warn};

use crate::domain::error::ReviewError;

const EVENT_PREFIX: &str = "data: ";

/// 이벤트 한 줄을 해석한다.
///
/// - 이벤트가 아닌 줄(`data: {`로 시작하지 않음): `Ok(None)`
/// - `choices[0].delta`가 없는 이벤트: `Ok(None)`
/// - delta 내용이 있으면 그 조각, 비어 있으면 줄바꿈 하나
/// - JSON 파싱 실패: `MalformedStreamChunk`
pub fn decode_event_line(line: &str) -> Result<Option<String>, ReviewError> {
    let Some(payload) = line.strip_prefix(EVENT_PREFIX) else {
        return Ok(None);
    };
    if !payload.starts_with('{') {
        return Ok(None);
    }

    let json: Value = serde_json::from_str(payload)
        .map_err(|err| ReviewError::MalformedStreamChunk(err.to_string()))?;

    let Some(delta) = json.pointer("/choices/0/delta").filter(|d| d.is_object()) else {
        return Ok(None);
    };

    match delta.get("content").and_then(Value::as_str) {
        Some(content) if !content.is_empty() => Ok(Some(content.to_string())),
        _ => Ok(Some("\n".to_string())),
    }
}

/// 디코딩된 이벤트 줄을 받아 텍스트를 누적한다.
#[derive(Debug, Default)]
pub struct StreamDecoder {
    text: String,
    raw: String,
    skipped: usize,
}

/// 스트림 해석 결과. `raw`는 진단 출력용 원문이다.
#[derive(Debug, Default)]
pub struct DecodedStream {
    pub text: String,
    pub raw: String,
}

impl StreamDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_line(&mut self, line: &str) {
        self.raw.push_str(line);
        self.raw.push('\n');

        match decode_event_line(line) {
            Ok(Some(fragment)) => self.text.push_str(&fragment),
            Ok(None) => {}
            // 깨진 조각은 건너뛰고 나머지 스트림은 계속 해석한다.
            Err(ReviewError::MalformedStreamChunk(reason)) => {
                self.skipped += 1;
                debug!(%reason, "skipping malformed stream chunk");
            }
            Err(err) => debug!(error = %err, "unexpected stream decode error"),
        }
    }

    pub fn finish(self) -> DecodedStream {
        if self.skipped > 0 {
            debug!(skipped = self.skipped, "skipped malformed stream chunks");
        }
        DecodedStream {
            text: self.text,
            raw: self.raw,
        }
    }
}

/// 응답 본문을 줄 단위(`\n`, `\r\n`)로 읽어 해석한다.
/// 읽기 오류가 나면 그때까지 누적된 결과를 돌려준다.
pub async fn decode_reader<R: AsyncRead>(reader: R) -> DecodedStream {
    let mut lines = pin!(FramedRead::new(reader, LinesCodec::new()));
    let mut decoder = StreamDecoder::new();

    while let Some(line) = lines.next().await {
        match line {
            Ok(line) => decoder.push_line(&line),
            Err(err) => {
                warn!(error = %err, "copilot: chat stream interrupted");
                break;
            }
        }
    }

    decoder.finish()
}
