use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use thiserror::Error;

/// Process-level result taxonomy reported as the exit code.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum ResultCode {
    Ok = 0,
    Failed = 1,
    InternalError = 2,
}

impl From<ResultCode> for ExitCode {
    fn from(code: ResultCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Failures that end a run. User losses are not errors and never show up here.
#[derive(Debug, Error)]
pub enum WormError {
    #[error("the window is too small: we need at least {min_cols}x{min_rows}")]
    TooSmall { min_cols: u16, min_rows: u16 },

    #[error("out of memory")]
    NoMemory,

    #[error("cannot read level file {}: {source}", path.display())]
    LevelFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("terminal I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error("invalid settings: {0}")]
    Settings(String),

    #[error("internal error: {0}")]
    InternalError(String),
}

impl WormError {
    /// Maps the error onto the process result taxonomy.
    #[must_use]
    pub fn result_code(&self) -> ResultCode {
        match self {
            Self::InternalError(_) => ResultCode::InternalError,
            _ => ResultCode::Failed,
        }
    }
}
