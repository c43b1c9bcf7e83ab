//! Console command handling

use chrono::{DateTime, Local};
use reveille_api::{
    Command, ErrorCode, ErrorInfo, EventPayload, HealthStatus, Response, ResponsePayload,
};
use reveille_core::{AlarmEngine, CoreEvent};
use reveille_util::ReveilleError;
use std::path::Path;
use tracing::{debug, info, warn};

/// Result of one command
pub struct Handled {
    pub response: Response,
    pub events: Vec<CoreEvent>,
    pub shutdown: bool,
}

impl Handled {
    fn reply(response: Response) -> Self {
        Self {
            response,
            events: Vec::new(),
            shutdown: false,
        }
    }

    fn with_events(response: Response, events: Vec<CoreEvent>) -> Self {
        Self {
            response,
            events,
            shutdown: false,
        }
    }
}

/// Host-side facts the handler needs but the engine does not own
pub struct HandlerContext<'a> {
    pub export_dir: &'a Path,
    pub bridge_ok: bool,
}

pub fn handle_command(
    engine: &mut AlarmEngine,
    ctx: &HandlerContext<'_>,
    request_id: u64,
    command: Command,
    now: DateTime<Local>,
) -> Handled {
    debug!(request_id, command = ?command, "Handling command");

    match command {
        Command::ListAlarms => Handled::reply(Response::success(
            request_id,
            ResponsePayload::Alarms {
                alarms: engine.alarms().to_vec(),
            },
        )),

        Command::GetAlarm { id } => match engine.get(&id) {
            Ok(alarm) => Handled::reply(Response::success(
                request_id,
                ResponsePayload::Alarm {
                    alarm: alarm.clone(),
                },
            )),
            Err(e) => Handled::reply(error_response(request_id, e)),
        },

        Command::CreateAlarm { draft } => match engine.create(&draft, now) {
            Ok((alarm, events)) => Handled::with_events(
                Response::success(request_id, ResponsePayload::Alarm { alarm }),
                events,
            ),
            Err(e) => Handled::reply(error_response(request_id, e)),
        },

        Command::UpdateAlarm { id, draft } => match engine.update(&id, &draft, now) {
            Ok((alarm, events)) => Handled::with_events(
                Response::success(request_id, ResponsePayload::Alarm { alarm }),
                events,
            ),
            Err(e) => Handled::reply(error_response(request_id, e)),
        },

        Command::DeleteAlarm { id } => match engine.delete(&id) {
            Ok(events) => Handled::with_events(
                Response::success(request_id, ResponsePayload::AlarmDeleted { id }),
                events,
            ),
            Err(e) => Handled::reply(error_response(request_id, e)),
        },

        Command::ToggleAlarm { id } => match engine.toggle(&id, now) {
            Ok((alarm, events)) => Handled::with_events(
                Response::success(request_id, ResponsePayload::Alarm { alarm }),
                events,
            ),
            Err(e) => Handled::reply(error_response(request_id, e)),
        },

        Command::DismissAlarm { id } => match engine.dismiss(&id) {
            Ok((alarm, events)) => Handled::with_events(
                Response::success(request_id, ResponsePayload::Alarm { alarm }),
                events,
            ),
            Err(e) => Handled::reply(error_response(request_id, e)),
        },

        Command::ListSounds => Handled::reply(Response::success(
            request_id,
            ResponsePayload::Sounds {
                sounds: engine.sounds(),
            },
        )),

        Command::PreviewSound { sound } => match engine.preview(&sound) {
            Ok((sound, events)) => Handled::with_events(
                Response::success(request_id, ResponsePayload::PreviewQueued { sound }),
                events,
            ),
            Err(e) => Handled::reply(error_response(request_id, e)),
        },

        Command::Export => {
            let written = engine.export(now).and_then(|doc| {
                doc.write_to(ctx.export_dir)
                    .map_err(|e| ReveilleError::export(e.to_string()))
            });
            match written {
                Ok(path) => {
                    info!(path = %path.display(), "Alarms exported");
                    engine.note_export(&path);
                    Handled::reply(Response::success(
                        request_id,
                        ResponsePayload::Exported {
                            path: path.display().to_string(),
                        },
                    ))
                }
                Err(e) => Handled::reply(error_response(request_id, e)),
            }
        }

        Command::GetHealth => Handled::reply(Response::success(
            request_id,
            ResponsePayload::Health(HealthStatus {
                live: true,
                store_ok: engine.store_healthy(),
                bridge_ok: ctx.bridge_ok,
                alarm_count: engine.alarm_count(),
            }),
        )),

        Command::Ping => Handled::reply(Response::success(request_id, ResponsePayload::Pong)),

        Command::Shutdown => {
            info!("Shutdown requested by client");
            Handled {
                response: Response::success(request_id, ResponsePayload::ShuttingDown),
                events: Vec::new(),
                shutdown: true,
            }
        }
    }
}

fn error_response(request_id: u64, err: ReveilleError) -> Response {
    let code = match &err {
        ReveilleError::AlarmNotFound(_) => ErrorCode::AlarmNotFound,
        ReveilleError::ValidationError(_) => ErrorCode::ValidationFailed,
        ReveilleError::ExportError(_) => ErrorCode::ExportFailed,
        _ => ErrorCode::InternalError,
    };
    if code == ErrorCode::InternalError {
        warn!(request_id, error = %err, "Command failed");
    }
    Response::error(request_id, ErrorInfo::new(code, err.to_string()))
}

/// Client-facing form of an engine event
pub fn event_payload(event: &CoreEvent) -> EventPayload {
    match event {
        CoreEvent::AlarmFired {
            alarm_id,
            kind,
            label,
            time,
            sound,
            snooze_count,
            haptic,
        } => EventPayload::AlarmFired {
            alarm_id: alarm_id.clone(),
            kind: *kind,
            label: label.clone(),
            time: *time,
            sound: sound.clone(),
            snooze_count: *snooze_count,
            haptic: *haptic,
        },
        CoreEvent::WakeRequested(request) => EventPayload::WakeScheduled {
            alarm_id: request.alarm_id.clone(),
            fire_at: request.fire_at,
        },
        CoreEvent::WakeCancelled { alarm_id } => EventPayload::WakeCancelled {
            alarm_id: alarm_id.clone(),
        },
        CoreEvent::AlarmsChanged { count } => EventPayload::AlarmsChanged { count: *count },
        CoreEvent::PreviewRequested { sound } => EventPayload::SoundPreviewed {
            sound: sound.clone(),
        },
    }
}
