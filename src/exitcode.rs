//! Process exit codes

/// Exit codes with a fixed meaning for callers and scripts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ErrorCode {
    /// Successful termination
    Ok = 0,
    /// `--workdir` exists but is not a directory
    NotDirectoryRootPath = 1,
    /// `--workdir` contains nothing to deploy
    EmptyRootPath = 2,
    /// `--workdir` does not exist
    NotFoundRootPath = 3,
    /// Platform refused the account
    AccountDisabled = 4,
}

impl ErrorCode {
    pub fn code(self) -> i32 {
        self as i32
    }
}

/// Any other reported error
pub const FAILURE: i32 = 1;
