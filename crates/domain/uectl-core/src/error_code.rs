use std::fmt;

/// Terminal result reported by `on_payload_application_complete`.
///
/// Only [`ErrorCode::SUCCESS`] counts as success; every other value is a
/// failure, including codes this client has no name for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ErrorCode(pub i32);

impl ErrorCode {
    pub const SUCCESS: ErrorCode = ErrorCode(0);
    pub const ERROR: ErrorCode = ErrorCode(1);
    pub const DOWNLOAD_TRANSFER_ERROR: ErrorCode = ErrorCode(9);
    pub const PAYLOAD_HASH_MISMATCH_ERROR: ErrorCode = ErrorCode(10);
    pub const PAYLOAD_SIZE_MISMATCH_ERROR: ErrorCode = ErrorCode(11);
    pub const DOWNLOAD_PAYLOAD_VERIFICATION_ERROR: ErrorCode = ErrorCode(12);
    pub const NEW_ROOTFS_VERIFICATION_ERROR: ErrorCode = ErrorCode(15);
    pub const DOWNLOAD_STATE_INITIALIZATION_ERROR: ErrorCode = ErrorCode(20);
    pub const DOWNLOAD_MANIFEST_PARSE_ERROR: ErrorCode = ErrorCode(23);
    pub const DOWNLOAD_OPERATION_EXECUTION_ERROR: ErrorCode = ErrorCode(28);
    pub const FILESYSTEM_VERIFIER_ERROR: ErrorCode = ErrorCode(47);
    pub const USER_CANCELED: ErrorCode = ErrorCode(48);

    pub fn is_success(self) -> bool {
        self == Self::SUCCESS
    }

    pub fn name(self) -> Option<&'static str> {
        Some(match self {
            Self::SUCCESS => "kSuccess",
            Self::ERROR => "kError",
            Self::DOWNLOAD_TRANSFER_ERROR => "kDownloadTransferError",
            Self::PAYLOAD_HASH_MISMATCH_ERROR => "kPayloadHashMismatchError",
            Self::PAYLOAD_SIZE_MISMATCH_ERROR => "kPayloadSizeMismatchError",
            Self::DOWNLOAD_PAYLOAD_VERIFICATION_ERROR => "kDownloadPayloadVerificationError",
            Self::NEW_ROOTFS_VERIFICATION_ERROR => "kNewRootfsVerificationError",
            Self::DOWNLOAD_STATE_INITIALIZATION_ERROR => "kDownloadStateInitializationError",
            Self::DOWNLOAD_MANIFEST_PARSE_ERROR => "kDownloadManifestParseError",
            Self::DOWNLOAD_OPERATION_EXECUTION_ERROR => "kDownloadOperationExecutionError",
            Self::FILESYSTEM_VERIFIER_ERROR => "kFilesystemVerifierError",
            Self::USER_CANCELED => "kUserCanceled",
            _ => return None,
        })
    }
}

impl From<i32> for ErrorCode {
    fn from(code: i32) -> Self {
        Self(code)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{} ({})", name, self.0),
            None => write!(f, "{}", self.0),
        }
    }
}
