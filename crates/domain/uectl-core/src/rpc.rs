use std::fmt;

use crate::exit_codes::EXIT_FAILURE;

/// Exception codes carried by a failed remote call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExceptionCode {
    None = 0,
    Security = -1,
    BadParcelable = -2,
    IllegalArgument = -3,
    NullPointer = -4,
    IllegalState = -5,
    NetworkMainThread = -6,
    UnsupportedOperation = -7,
    ServiceSpecific = -8,
    TransactionFailed = -129,
}

impl ExceptionCode {
    pub fn from_code(code: i32) -> Option<Self> {
        Some(match code {
            0 => Self::None,
            -1 => Self::Security,
            -2 => Self::BadParcelable,
            -3 => Self::IllegalArgument,
            -4 => Self::NullPointer,
            -5 => Self::IllegalState,
            -6 => Self::NetworkMainThread,
            -7 => Self::UnsupportedOperation,
            -8 => Self::ServiceSpecific,
            -129 => Self::TransactionFailed,
            _ => return None,
        })
    }

    pub fn code(self) -> i32 {
        self as i32
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "EX_NONE",
            Self::Security => "EX_SECURITY",
            Self::BadParcelable => "EX_BAD_PARCELABLE",
            Self::IllegalArgument => "EX_ILLEGAL_ARGUMENT",
            Self::NullPointer => "EX_NULL_POINTER",
            Self::IllegalState => "EX_ILLEGAL_STATE",
            Self::NetworkMainThread => "EX_NETWORK_MAIN_THREAD",
            Self::UnsupportedOperation => "EX_UNSUPPORTED_OPERATION",
            Self::ServiceSpecific => "EX_SERVICE_SPECIFIC",
            Self::TransactionFailed => "EX_TRANSACTION_FAILED",
        }
    }
}

/// Failure status of a remote call.
///
/// A successful call is represented as `Ok(..)`; this type only ever
/// describes a failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RpcStatus {
    exception: i32,
    message: String,
}

impl RpcStatus {
    pub fn new(exception: i32, message: impl Into<String>) -> Self {
        Self {
            exception,
            message: message.into(),
        }
    }

    pub fn from_exception(exception: ExceptionCode, message: impl Into<String>) -> Self {
        Self::new(exception.code(), message)
    }

    pub fn transaction_failed(message: impl Into<String>) -> Self {
        Self::from_exception(ExceptionCode::TransactionFailed, message)
    }

    /// Turns a raw `(exception, message)` pair into a call result.
    pub fn check(exception: i32, message: impl Into<String>) -> Result<(), Self> {
        if exception == ExceptionCode::None.code() {
            Ok(())
        } else {
            Err(Self::new(exception, message))
        }
    }

    pub fn exception_code(&self) -> i32 {
        self.exception
    }

    pub fn kind(&self) -> Option<ExceptionCode> {
        ExceptionCode::from_code(self.exception)
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Exit code for a process that ends because of this failure.
    ///
    /// The exception code is propagated as is; a failure that carries no
    /// exception code still exits non-zero.
    pub fn exit_code(&self) -> i32 {
        if self.exception == ExceptionCode::None.code() {
            EXIT_FAILURE
        } else {
            self.exception
        }
    }
}

impl fmt::Display for RpcStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind() {
            Some(kind) => write!(
                f,
                "Status({}, {}): '{}'",
                self.exception,
                kind.as_str(),
                self.message
            ),
            None => write!(f, "Status({}): '{}'", self.exception, self.message),
        }
    }
}

impl std::error::Error for RpcStatus {}
