use std::fmt;

/// States reported by the update engine through `on_status_update`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum UpdateStatus {
    Idle = 0,
    CheckingForUpdate = 1,
    UpdateAvailable = 2,
    Downloading = 3,
    Verifying = 4,
    Finalizing = 5,
    UpdatedNeedReboot = 6,
    ReportingErrorEvent = 7,
    AttemptingRollback = 8,
    Disabled = 9,
}

impl UpdateStatus {
    pub fn from_code(code: i32) -> Option<Self> {
        Some(match code {
            0 => Self::Idle,
            1 => Self::CheckingForUpdate,
            2 => Self::UpdateAvailable,
            3 => Self::Downloading,
            4 => Self::Verifying,
            5 => Self::Finalizing,
            6 => Self::UpdatedNeedReboot,
            7 => Self::ReportingErrorEvent,
            8 => Self::AttemptingRollback,
            9 => Self::Disabled,
            _ => return None,
        })
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "UPDATE_STATUS_IDLE",
            Self::CheckingForUpdate => "UPDATE_STATUS_CHECKING_FOR_UPDATE",
            Self::UpdateAvailable => "UPDATE_STATUS_UPDATE_AVAILABLE",
            Self::Downloading => "UPDATE_STATUS_DOWNLOADING",
            Self::Verifying => "UPDATE_STATUS_VERIFYING",
            Self::Finalizing => "UPDATE_STATUS_FINALIZING",
            Self::UpdatedNeedReboot => "UPDATE_STATUS_UPDATED_NEED_REBOOT",
            Self::ReportingErrorEvent => "UPDATE_STATUS_REPORTING_ERROR_EVENT",
            Self::AttemptingRollback => "UPDATE_STATUS_ATTEMPTING_ROLLBACK",
            Self::Disabled => "UPDATE_STATUS_DISABLED",
        }
    }
}

impl fmt::Display for UpdateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Renders a raw status code, falling back to the number for unknown codes.
pub fn status_code_to_string(code: i32) -> String {
    match UpdateStatus::from_code(code) {
        Some(status) => status.as_str().to_string(),
        None => code.to_string(),
    }
}
