// uiconf-core/src/error.rs
use serde::{Deserialize, Serialize};

/// Numeric error codes shared by every widget operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(i32)]
pub enum ErrorCode {
    NoAccess = 0,
    FileExists = 1,
    FileNotFound = 2,
    DirectoryExists = 3,
    DirectoryNotFound = 4,
    WrongFileExtension = 5,
    MaxFileSizeExceeded = 6,
    InvalidSymbols = 7,
    Unspecified = 32767,
}

impl ErrorCode {
    pub fn code(self) -> i32 {
        self as i32
    }

    pub fn from_code(code: i32) -> Self {
        match code {
            0 => Self::NoAccess,
            1 => Self::FileExists,
            2 => Self::FileNotFound,
            3 => Self::DirectoryExists,
            4 => Self::DirectoryNotFound,
            5 => Self::WrongFileExtension,
            6 => Self::MaxFileSizeExceeded,
            7 => Self::InvalidSymbols,
            _ => Self::Unspecified,
        }
    }

    /// Default message used when an operation fails without its own text
    pub fn default_text(self) -> &'static str {
        match self {
            Self::NoAccess => "Access denied. The operation cannot be completed.",
            Self::FileExists => "The file already exists.",
            Self::FileNotFound => "File not found.",
            Self::DirectoryExists => "The folder already exists.",
            Self::DirectoryNotFound => "Directory not found.",
            Self::WrongFileExtension => "File extension is not allowed.",
            Self::MaxFileSizeExceeded => "File size exceeds the maximum allowed size.",
            Self::InvalidSymbols => "The name contains invalid characters.",
            Self::Unspecified => "An unspecified error occurred.",
        }
    }
}

/// Failure of an asynchronous widget operation
///
/// Delivered either through a widget's error event or as the `Err` of the
/// method's pending result; both carry the same code and text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{text} (code {})", .code.code())]
pub struct OperationError {
    pub code: ErrorCode,
    pub text: String,
}

impl OperationError {
    pub fn new(code: ErrorCode, text: impl Into<String>) -> Self {
        Self {
            code,
            text: text.into(),
        }
    }

    pub fn from_code(code: ErrorCode) -> Self {
        Self::new(code, code.default_text())
    }

    pub fn no_access(action: &str) -> Self {
        Self::new(
            ErrorCode::NoAccess,
            format!("The '{}' operation is not permitted.", action),
        )
    }
}
