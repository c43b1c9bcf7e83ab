//! Audit event types

use chrono::{DateTime, Local};
use reveille_api::FireKind;
use reveille_util::AlarmId;
use serde::{Deserialize, Serialize};

/// Types of audit events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AuditEventType {
    ServiceStarted { alarm_count: usize },

    ServiceStopped,

    AlarmCreated { alarm_id: AlarmId, time: String },

    AlarmUpdated { alarm_id: AlarmId, time: String },

    AlarmDeleted { alarm_id: AlarmId },

    AlarmToggled { alarm_id: AlarmId, enabled: bool },

    AlarmFired {
        alarm_id: AlarmId,
        kind: FireKind,
        snooze_count: u32,
    },

    AlarmDismissed { alarm_id: AlarmId },

    AlarmsExported { path: String, count: usize },
}

/// Full audit event with metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEvent {
    /// Assigned by the store
    pub id: i64,

    pub timestamp: DateTime<Local>,

    pub event: AuditEventType,
}

impl AuditEvent {
    pub fn new(event: AuditEventType) -> Self {
        Self {
            id: 0,
            timestamp: reveille_util::now(),
            event,
        }
    }
}
