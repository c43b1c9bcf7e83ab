//! Alarm engine

use chrono::{DateTime, Local};
use reveille_api::{Alarm, AlarmDraft, DraftError, FireKind, SoundInfo, SoundRef};
use reveille_config::AlertsConfig;
use reveille_host_api::WakeRequest;
use reveille_store::{AuditEvent, AuditEventType, Store};
use reveille_util::{AlarmId, ReveilleError};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::{
    AlarmBook, CoreEvent, ExportDocument, FireDecision, dismiss, next_occurrence, record_fire,
    should_fire, sound_infos,
};

/// The alarm engine: owns the alarm list and turns user edits and clock
/// ticks into [`CoreEvent`]s
pub struct AlarmEngine {
    book: AlarmBook,
    store: Arc<dyn Store>,
    alerts: AlertsConfig,
}

impl AlarmEngine {
    /// Create an engine over the list persisted in `store`
    pub fn new(store: Arc<dyn Store>, alerts: AlertsConfig) -> Self {
        let book = AlarmBook::load(store.clone());

        info!(
            alarm_count = book.len(),
            haptic = ?alerts.haptic,
            native_wakes = alerts.schedule_native_wakes,
            "Alarm engine initialized"
        );

        Self { book, store, alerts }
    }

    pub fn alarms(&self) -> &[Alarm] {
        self.book.alarms()
    }

    pub fn get(&self, id: &AlarmId) -> reveille_util::Result<&Alarm> {
        self.book
            .get(id)
            .ok_or_else(|| ReveilleError::AlarmNotFound(id.clone()))
    }

    pub fn alarm_count(&self) -> usize {
        self.book.len()
    }

    pub fn sounds(&self) -> Vec<SoundInfo> {
        sound_infos()
    }

    /// Queue a sample of `token` (a catalog id or custom sound). Snooze
    /// state is untouched.
    pub fn preview(&self, token: &str) -> reveille_util::Result<(SoundRef, Vec<CoreEvent>)> {
        let token = token.trim();
        if token.is_empty() {
            return Err(ReveilleError::validation(DraftError::EmptySound.to_string()));
        }
        let sound = SoundRef::from_token(token);
        debug!(sound = %sound.as_token(), "Sound preview requested");
        let events = vec![CoreEvent::PreviewRequested {
            sound: sound.clone(),
        }];
        Ok((sound, events))
    }

    pub fn store_healthy(&self) -> bool {
        self.store.is_healthy()
    }

    /// Validate a draft and add it as a new alarm
    pub fn create(
        &mut self,
        draft: &AlarmDraft,
        now: DateTime<Local>,
    ) -> reveille_util::Result<(Alarm, Vec<CoreEvent>)> {
        let settings = draft
            .validate()
            .map_err(|e| ReveilleError::validation(e.to_string()))?;
        let alarm = Alarm::new(AlarmId::generate(), settings);

        let count = self.book.mutate(|alarms| {
            alarms.push(alarm.clone());
            alarms.len()
        });

        info!(alarm_id = %alarm.id, time = %alarm.time, "Alarm created");
        self.audit(AuditEventType::AlarmCreated {
            alarm_id: alarm.id.clone(),
            time: alarm.time.to_string(),
        });

        let mut events = self.wake_events(&alarm, now);
        events.push(CoreEvent::AlarmsChanged { count });
        Ok((alarm, events))
    }

    /// Replace an alarm's editable fields. The snooze anchor and count are
    /// kept.
    pub fn update(
        &mut self,
        id: &AlarmId,
        draft: &AlarmDraft,
        now: DateTime<Local>,
    ) -> reveille_util::Result<(Alarm, Vec<CoreEvent>)> {
        self.get(id)?;
        let settings = draft
            .validate()
            .map_err(|e| ReveilleError::validation(e.to_string()))?;

        let (alarm, count) = self.book.mutate(|alarms| {
            let alarm = alarms.iter_mut().find(|a| &a.id == id).map(|a| {
                a.apply(settings);
                a.clone()
            });
            (alarm, alarms.len())
        });
        let alarm = alarm.ok_or_else(|| ReveilleError::AlarmNotFound(id.clone()))?;

        info!(alarm_id = %id, time = %alarm.time, enabled = alarm.enabled, "Alarm updated");
        self.audit(AuditEventType::AlarmUpdated {
            alarm_id: id.clone(),
            time: alarm.time.to_string(),
        });

        let mut events = self.wake_events(&alarm, now);
        events.push(CoreEvent::AlarmsChanged { count });
        Ok((alarm, events))
    }

    /// Remove an alarm and cancel its host wake
    pub fn delete(&mut self, id: &AlarmId) -> reveille_util::Result<Vec<CoreEvent>> {
        self.get(id)?;

        let count = self.book.mutate(|alarms| {
            alarms.retain(|a| &a.id != id);
            alarms.len()
        });

        info!(alarm_id = %id, "Alarm deleted");
        self.audit(AuditEventType::AlarmDeleted {
            alarm_id: id.clone(),
        });

        Ok(vec![
            CoreEvent::WakeCancelled {
                alarm_id: id.clone(),
            },
            CoreEvent::AlarmsChanged { count },
        ])
    }

    /// Flip `enabled`. Enabling schedules a wake, disabling cancels it.
    pub fn toggle(
        &mut self,
        id: &AlarmId,
        now: DateTime<Local>,
    ) -> reveille_util::Result<(Alarm, Vec<CoreEvent>)> {
        let (alarm, count) = self.edit(id, |a| a.enabled = !a.enabled)?;

        info!(alarm_id = %id, enabled = alarm.enabled, "Alarm toggled");
        self.audit(AuditEventType::AlarmToggled {
            alarm_id: id.clone(),
            enabled: alarm.enabled,
        });

        let mut events = self.wake_events(&alarm, now);
        events.push(CoreEvent::AlarmsChanged { count });
        Ok((alarm, events))
    }

    /// Stop a ringing alarm: clear the snooze anchor and count, keep it
    /// enabled
    pub fn dismiss(&mut self, id: &AlarmId) -> reveille_util::Result<(Alarm, Vec<CoreEvent>)> {
        let (alarm, count) = self.edit(id, dismiss)?;

        info!(alarm_id = %id, "Alarm dismissed");
        self.audit(AuditEventType::AlarmDismissed {
            alarm_id: id.clone(),
        });

        Ok((alarm, vec![CoreEvent::AlarmsChanged { count }]))
    }

    /// Evaluate every alarm against `now`, in list order.
    ///
    /// Each due alarm yields an [`CoreEvent::AlarmFired`] and has its snooze
    /// state advanced; the list is persisted once if anything fired.
    pub fn tick(&mut self, now: DateTime<Local>) -> Vec<CoreEvent> {
        let due: Vec<(usize, FireKind)> = self
            .book
            .alarms()
            .iter()
            .enumerate()
            .filter_map(|(index, alarm)| should_fire(alarm, now).kind().map(|kind| (index, kind)))
            .collect();

        if due.is_empty() {
            return Vec::new();
        }

        let fired: Vec<(Alarm, FireKind)> = self.book.mutate(|alarms| {
            due.iter()
                .map(|&(index, kind)| {
                    let alarm = &mut alarms[index];
                    record_fire(alarm, now);
                    (alarm.clone(), kind)
                })
                .collect()
        });

        let mut events = Vec::with_capacity(fired.len() * 2);
        for (alarm, kind) in fired {
            let snooze_count = alarm.snooze_count.unwrap_or(0);

            info!(
                alarm_id = %alarm.id,
                kind = ?kind,
                time = %alarm.time,
                snooze_count,
                "Alarm fired"
            );
            self.audit(AuditEventType::AlarmFired {
                alarm_id: alarm.id.clone(),
                kind,
                snooze_count,
            });

            events.push(CoreEvent::AlarmFired {
                alarm_id: alarm.id.clone(),
                kind,
                label: alarm.label.clone(),
                time: alarm.time,
                sound: alarm.sound.clone(),
                snooze_count,
                haptic: self.alerts.haptic,
            });

            // Keep a host wake armed for the next ring
            if kind == FireKind::First {
                events.extend(self.wake_events(&alarm, now));
            }
        }

        events
    }

    /// Wake requests for every enabled alarm (used at start-up)
    pub fn rearm_all(&self, now: DateTime<Local>) -> Vec<CoreEvent> {
        if !self.alerts.schedule_native_wakes {
            debug!("Native wakes disabled, nothing to re-arm");
            return Vec::new();
        }

        self.book
            .alarms()
            .iter()
            .filter(|a| a.enabled)
            .map(|a| CoreEvent::WakeRequested(wake_request(a, now)))
            .collect()
    }

    /// Render the full list as an export document dated `now`
    pub fn export(&self, now: DateTime<Local>) -> reveille_util::Result<ExportDocument> {
        ExportDocument::render(self.book.alarms(), now.date_naive())
            .map_err(|e| ReveilleError::export(e.to_string()))
    }

    /// Record a completed export in the audit log
    pub fn note_export(&self, path: &std::path::Path) {
        self.audit(AuditEventType::AlarmsExported {
            path: path.display().to_string(),
            count: self.book.len(),
        });
    }

    fn edit(
        &mut self,
        id: &AlarmId,
        f: impl FnOnce(&mut Alarm),
    ) -> reveille_util::Result<(Alarm, usize)> {
        self.get(id)?;
        let (alarm, count) = self.book.mutate(|alarms| {
            let alarm = alarms.iter_mut().find(|a| &a.id == id).map(|a| {
                f(a);
                a.clone()
            });
            (alarm, alarms.len())
        });
        let alarm = alarm.ok_or_else(|| ReveilleError::AlarmNotFound(id.clone()))?;
        Ok((alarm, count))
    }

    fn wake_events(&self, alarm: &Alarm, now: DateTime<Local>) -> Vec<CoreEvent> {
        if !alarm.enabled {
            return vec![CoreEvent::WakeCancelled {
                alarm_id: alarm.id.clone(),
            }];
        }
        if !self.alerts.schedule_native_wakes {
            return Vec::new();
        }
        vec![CoreEvent::WakeRequested(wake_request(alarm, now))]
    }

    fn audit(&self, event: AuditEventType) {
        if let Err(e) = self.store.append_audit(AuditEvent::new(event)) {
            warn!(error = %e, "Failed to append audit event");
        }
    }
}

fn wake_request(alarm: &Alarm, now: DateTime<Local>) -> WakeRequest {
    WakeRequest {
        alarm_id: alarm.id.clone(),
        time: alarm.time,
        label: alarm.label.clone(),
        fire_at: next_occurrence(alarm.time, now),
    }
}
