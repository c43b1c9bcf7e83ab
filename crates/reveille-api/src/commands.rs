//! Console commands and responses for the reveilled service

use reveille_util::AlarmId;
use serde::{Deserialize, Serialize};

use crate::{Alarm, AlarmDraft, SoundInfo, SoundRef, API_VERSION};

fn current_api_version() -> u32 {
    API_VERSION
}

/// Request wrapper with metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Request {
    /// Request ID for correlation
    pub request_id: u64,
    /// API version; clients may omit it
    #[serde(default = "current_api_version")]
    pub api_version: u32,
    /// The command
    pub command: Command,
}

impl Request {
    pub fn new(request_id: u64, command: Command) -> Self {
        Self {
            request_id,
            api_version: API_VERSION,
            command,
        }
    }
}

/// Response wrapper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
    /// Corresponding request ID
    pub request_id: u64,
    pub api_version: u32,
    pub result: ResponseResult,
}

impl Response {
    pub fn success(request_id: u64, payload: ResponsePayload) -> Self {
        Self {
            request_id,
            api_version: API_VERSION,
            result: ResponseResult::Ok(payload),
        }
    }

    pub fn error(request_id: u64, error: ErrorInfo) -> Self {
        Self {
            request_id,
            api_version: API_VERSION,
            result: ResponseResult::Err(error),
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self.result, ResponseResult::Ok(_))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseResult {
    Ok(ResponsePayload),
    Err(ErrorInfo),
}

/// Error information
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    pub code: ErrorCode,
    pub message: String,
}

impl ErrorInfo {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// Error codes for the console protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    InvalidRequest,
    AlarmNotFound,
    ValidationFailed,
    ExportFailed,
    InternalError,
}

/// All commands a client can send
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    /// List every alarm in stored order
    ListAlarms,

    GetAlarm { id: AlarmId },

    CreateAlarm { draft: AlarmDraft },

    /// Replace the editable fields of an existing alarm
    UpdateAlarm { id: AlarmId, draft: AlarmDraft },

    DeleteAlarm { id: AlarmId },

    /// Flip `enabled`
    ToggleAlarm { id: AlarmId },

    /// Stop a ringing alarm: clears the snooze anchor, keeps it enabled
    DismissAlarm { id: AlarmId },

    ListSounds,

    /// Play a catalog id or custom sound once, without any alarm
    PreviewSound { sound: String },

    /// Write the alarm list to the export directory
    Export,

    GetHealth,

    /// Ping for keepalive
    Ping,

    /// Stop the service
    Shutdown,
}

/// Response payloads
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResponsePayload {
    Alarms { alarms: Vec<Alarm> },
    Alarm { alarm: Alarm },
    AlarmDeleted { id: AlarmId },
    Sounds { sounds: Vec<SoundInfo> },
    PreviewQueued { sound: SoundRef },
    Exported { path: String },
    Health(HealthStatus),
    Pong,
    ShuttingDown,
}

/// Health status
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub live: bool,
    pub store_ok: bool,
    pub bridge_ok: bool,
    pub alarm_count: usize,
}
