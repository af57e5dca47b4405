//! 설정 모듈 공용 유틸리티.

use std::env;
use std::path::Path;

/// 로컬 명령이 실행 가능한지 탐지한다.
pub fn command_exists(command: &str) -> bool {
    let command = command.trim();
    if command.is_empty() {
        return false;
    }

    // 경로가 주어지면 파일 존재만 검사한다.
    let command_path = Path::new(command);
    if command_path.components().count() > 1 {
        return command_path.is_file();
    }

    let Some(path_var) = env::var_os("PATH") else {
        return false;
    };

    env::split_paths(&path_var).any(|dir| {
        candidate_names(command)
            .iter()
            .any(|name| dir.join(name).is_file())
    })
}

#[cfg(windows)]
fn candidate_names(command: &str) -> Vec<String> {
    // Windows는 확장자를 생략할 수 있으므로 PATHEXT를 고려한다.
    let mut names = vec![command.to_string()];
    if Path::new(command).extension().is_none() {
        let pathext = env::var("PATHEXT").unwrap_or_else(|_| ".EXE;.CMD;.BAT;.COM".into());
        names.extend(
            pathext
                .split(';')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|ext| format!("{command}{ext}")),
        );
    }
    names
}

#[cfg(not(windows))]
fn candidate_names(command: &str) -> Vec<String> {
    vec![command.to_string()]
}
