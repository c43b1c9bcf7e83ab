//! Mock notification bridge for testing

use async_trait::async_trait;
use reveille_util::AlarmId;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::{
    BridgeCapabilities, BridgeError, BridgeResult, FireRequest, NotificationBridge, PlayableSound,
    WakeRequest,
};

/// One recorded bridge call
#[derive(Debug, Clone, PartialEq)]
pub enum BridgeCall {
    ScheduleWake(WakeRequest),
    CancelWake(AlarmId),
    PreviewSound(PlayableSound),
    Fire(FireRequest),
}

/// Recording bridge for unit/integration testing
pub struct MockBridge {
    capabilities: BridgeCapabilities,
    calls: Arc<Mutex<Vec<BridgeCall>>>,
    wakes: Arc<Mutex<HashMap<AlarmId, WakeRequest>>>,

    /// Configure fire to fail
    pub fail_fire: Arc<Mutex<bool>>,

    /// Configure schedule_wake to fail
    pub fail_schedule: Arc<Mutex<bool>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockBridge {
    pub fn new() -> Self {
        Self {
            capabilities: BridgeCapabilities::full(),
            calls: Arc::new(Mutex::new(Vec::new())),
            wakes: Arc::new(Mutex::new(HashMap::new())),
            fail_fire: Arc::new(Mutex::new(false)),
            fail_schedule: Arc::new(Mutex::new(false)),
        }
    }

    pub fn with_capabilities(mut self, caps: BridgeCapabilities) -> Self {
        self.capabilities = caps;
        self
    }

    /// Every call so far, in order
    pub fn calls(&self) -> Vec<BridgeCall> {
        lock(&self.calls).clone()
    }

    pub fn fires(&self) -> Vec<FireRequest> {
        lock(&self.calls)
            .iter()
            .filter_map(|c| match c {
                BridgeCall::Fire(request) => Some(request.clone()),
                _ => None,
            })
            .collect()
    }

    /// Number of cancel_wake calls naming this alarm
    pub fn cancel_count(&self, alarm_id: &AlarmId) -> usize {
        lock(&self.calls)
            .iter()
            .filter(|c| matches!(c, BridgeCall::CancelWake(id) if id == alarm_id))
            .count()
    }

    /// Wakes currently pending on the simulated host
    pub fn pending_wake(&self, alarm_id: &AlarmId) -> Option<WakeRequest> {
        lock(&self.wakes).get(alarm_id).cloned()
    }

    pub fn pending_wake_count(&self) -> usize {
        lock(&self.wakes).len()
    }

    pub fn previews(&self) -> Vec<PlayableSound> {
        lock(&self.calls)
            .iter()
            .filter_map(|c| match c {
                BridgeCall::PreviewSound(sound) => Some(sound.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn clear_calls(&self) {
        lock(&self.calls).clear();
    }

    fn record(&self, call: BridgeCall) {
        lock(&self.calls).push(call);
    }
}

impl Default for MockBridge {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NotificationBridge for MockBridge {
    fn capabilities(&self) -> &BridgeCapabilities {
        &self.capabilities
    }

    async fn schedule_wake(&self, request: WakeRequest) -> BridgeResult<()> {
        self.record(BridgeCall::ScheduleWake(request.clone()));

        if *lock(&self.fail_schedule) {
            return Err(BridgeError::CommandFailed("Mock schedule failure".into()));
        }

        lock(&self.wakes).insert(request.alarm_id.clone(), request);
        Ok(())
    }

    async fn cancel_wake(&self, alarm_id: AlarmId) -> BridgeResult<()> {
        self.record(BridgeCall::CancelWake(alarm_id.clone()));
        lock(&self.wakes).remove(&alarm_id);
        Ok(())
    }

    async fn fire(&self, request: FireRequest) -> BridgeResult<()> {
        self.record(BridgeCall::Fire(request));

        if *lock(&self.fail_fire) {
            return Err(BridgeError::CommandFailed("Mock fire failure".into()));
        }
        Ok(())
    }

    async fn preview_sound(&self, sound: PlayableSound) -> BridgeResult<()> {
        self.record(BridgeCall::PreviewSound(sound));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{PlayableSound, ToneSpec, Voice, Waveform};
    use chrono::{Local, TimeZone};
    use reveille_api::{CatalogSound, HapticLevel};
    use reveille_util::WallClock;
    use std::time::Duration;

    fn wake(id: &str, hour: u8) -> WakeRequest {
        WakeRequest {
            alarm_id: AlarmId::new(id),
            time: WallClock::new(hour, 0).unwrap(),
            label: None,
            fire_at: Local.with_ymd_and_hms(2024, 1, 16, u32::from(hour), 0, 0).unwrap(),
        }
    }

    #[tokio::test]
    async fn rescheduling_replaces_wake() {
        let bridge = MockBridge::new();
        bridge.schedule_wake(wake("a1", 6)).await.unwrap();
        bridge.schedule_wake(wake("a1", 7)).await.unwrap();

        assert_eq!(bridge.pending_wake_count(), 1);
        let pending = bridge.pending_wake(&AlarmId::new("a1")).unwrap();
        assert_eq!(pending.time.to_string(), "07:00");
    }

    #[tokio::test]
    async fn cancel_unknown_or_twice_is_noop() {
        let bridge = MockBridge::new();
        let id = AlarmId::new("ghost");

        assert!(bridge.cancel_wake(id.clone()).await.is_ok());
        assert!(bridge.cancel_wake(id.clone()).await.is_ok());

        assert_eq!(bridge.pending_wake_count(), 0);
        assert_eq!(bridge.cancel_count(&id), 2);
    }

    #[tokio::test]
    async fn fire_failure_is_recorded() {
        let bridge = MockBridge::new();
        *bridge.fail_fire.lock().unwrap() = true;

        let request = FireRequest {
            alarm_id: AlarmId::new("a1"),
            label: None,
            time: WallClock::new(7, 0).unwrap(),
            sound: PlayableSound::Tone {
                sound: CatalogSound::Classic,
                spec: ToneSpec {
                    waveform: Waveform::Sine,
                    voice: Voice::Steady(800.0),
                    notes: 1,
                    spacing: Duration::ZERO,
                    note_length: Duration::from_secs(2),
                    gain: 0.3,
                },
            },
            haptic: HapticLevel::Medium,
            banner_duration: Duration::from_secs(10),
        };

        assert!(bridge.fire(request).await.is_err());
        assert_eq!(bridge.fires().len(), 1);
    }
}
