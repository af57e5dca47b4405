//! 콘솔 리포터 포트 구현 어댑터.

use std::io::{self, IsTerminal};

use crate::application::ports::Reporter;

/// 콘솔 전용 리포터 어댑터.
pub struct ConsoleReporter {
    colored: bool,
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsoleReporter {
    /// stdout이 TTY일 때만 상태 색상을 사용한다.
    pub fn new() -> Self {
        Self {
            colored: io::stdout().is_terminal(),
        }
    }
}

impl Reporter for ConsoleReporter {
    fn section(&self, name: &str) {
        println!();
        println!("==================== {} ====================", name);
    }

    fn kv(&self, key: &str, value: &str) {
        println!("{:<12}: {}", key, value);
    }

    fn status(&self, scope: &str, message: &str) {
        if self.colored {
            println!("[{:<12}] {}", scope, colorize_status(message));
        } else {
            println!("[{:<12}] {}", scope, message);
        }
    }

    fn raw(&self, line: &str) {
        println!("{}", line);
    }
}

fn colorize_status(message: &str) -> String {
    if message.starts_with("running") {
        format!("\x1b[33m{message}\x1b[0m")
    } else if message.starts_with("done") || message.starts_with("written") {
        format!("\x1b[32m{message}\x1b[0m")
    } else if message.starts_with("empty") || message.starts_with("failed") {
        format!("\x1b[31m{message}\x1b[0m")
    } else {
        message.to_string()
    }
}
