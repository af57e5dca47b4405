//! 자격 증명 풀 파일 저장소.
//! 한 줄에 하나씩 저장하며, 읽을 때마다 다음 줄로 순환한다.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use tracing::debug;

use super::Credential;
use crate::domain::error::ReviewError;

pub struct TokenStore {
    path: PathBuf,
    cursor: AtomicUsize,
}

impl TokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cursor: AtomicUsize::new(0),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `pool[i mod len]`을 반환하고 커서를 1 증가시킨다.
    /// 파일이 없거나 비어 있으면 `NotAuthenticated`.
    pub fn next_credential(&self) -> Result<Credential, ReviewError> {
        let pool = self.read_pool()?;
        if pool.is_empty() {
            return Err(self.not_authenticated());
        }

        let index = self.cursor.fetch_add(1, Ordering::SeqCst) % pool.len();
        debug!(index, pool_size = pool.len(), "selected credential");
        Ok(pool[index].clone())
    }

    /// 자격 증명을 풀에 추가한다. 이미 있으면 그대로 두고, 풀 크기를 반환한다.
    pub fn store(&self, credential: &Credential) -> Result<usize, ReviewError> {
        let mut pool = match self.read_pool() {
            Ok(pool) => pool,
            Err(ReviewError::NotAuthenticated(_)) => Vec::new(),
            Err(err) => return Err(err),
        };

        if pool.contains(credential) {
            return Ok(pool.len());
        }
        pool.push(credential.clone());

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }

        let mut rendered = pool
            .iter()
            .map(Credential::as_str)
            .collect::<Vec<_>>()
            .join("\n");
        rendered.push('\n');
        fs::write(&self.path, rendered).map_err(|e| self.io_error(e))?;

        Ok(pool.len())
    }

    /// 진단용 풀 크기. 읽기 실패는 0으로 본다.
    pub fn pool_size(&self) -> usize {
        self.read_pool().map(|pool| pool.len()).unwrap_or(0)
    }

    fn read_pool(&self) -> Result<Vec<Credential>, ReviewError> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => Ok(raw
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(Credential::new)
                .collect()),
            Err(err) if err.kind() == ErrorKind::NotFound => Err(self.not_authenticated()),
            Err(err) => Err(self.io_error(err)),
        }
    }

    fn not_authenticated(&self) -> ReviewError {
        ReviewError::NotAuthenticated(self.path.display().to_string())
    }

    fn io_error(&self, source: std::io::Error) -> ReviewError {
        ReviewError::CredentialStore {
            path: self.path.display().to_string(),
            source,
        }
    }
}
