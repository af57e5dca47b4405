//! unified diff에서 테스트 디렉터리 파일 섹션을 걸러낸다.

const SECTION_HEADER: &str = "diff --git ";

/// 헤더 줄에 `markers` 중 하나라도 포함된 파일 섹션을 통째로 제거한다.
/// 첫 헤더 이전의 텍스트와 나머지 섹션의 순서는 유지된다.
pub fn filter_test_sections(diff: &str, markers: &[String]) -> String {
    if markers.is_empty() {
        return diff.to_string();
    }

    let mut kept: Vec<&str> = Vec::new();
    let mut skipping = false;

    for line in diff.lines() {
        if line.starts_with(SECTION_HEADER) {
            skipping = markers.iter().any(|m| !m.is_empty() && line.contains(m.as_str()));
        }
        if !skipping {
            kept.push(line);
        }
    }

    let mut out = kept.join("\n");
    if diff.ends_with('\n') && !out.is_empty() {
        out.push('\n');
    }
    out
}

/// diff에 포함된 파일 섹션 수.
pub fn count_sections(diff: &str) -> usize {
    diff.lines().filter(|l| l.starts_with(SECTION_HEADER)).count()
}
