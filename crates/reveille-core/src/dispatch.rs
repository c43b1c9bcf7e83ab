//! Realizing engine events on a notification bridge

use reveille_host_api::{FireRequest, NotificationBridge};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::{CoreEvent, resolve};

/// Hands [`CoreEvent`]s to a bridge. Bridge failures are logged and go no
/// further; there are no retries.
#[derive(Clone)]
pub struct Dispatcher {
    bridge: Arc<dyn NotificationBridge>,
    banner_duration: Duration,
}

impl Dispatcher {
    pub fn new(bridge: Arc<dyn NotificationBridge>, banner_duration: Duration) -> Self {
        Self {
            bridge,
            banner_duration,
        }
    }

    /// Whether this event needs the bridge at all
    pub fn wants(event: &CoreEvent) -> bool {
        !matches!(event, CoreEvent::AlarmsChanged { .. })
    }

    pub async fn realize(&self, event: CoreEvent) {
        match event {
            CoreEvent::AlarmFired {
                alarm_id,
                label,
                time,
                sound,
                haptic,
                ..
            } => {
                let request = FireRequest {
                    alarm_id: alarm_id.clone(),
                    label,
                    time,
                    sound: resolve(&sound),
                    haptic,
                    banner_duration: self.banner_duration,
                };
                if let Err(e) = self.bridge.fire(request).await {
                    warn!(alarm_id = %alarm_id, error = %e, "Bridge failed to fire alarm");
                }
            }
            CoreEvent::WakeRequested(request) => {
                let alarm_id = request.alarm_id.clone();
                if let Err(e) = self.bridge.schedule_wake(request).await {
                    warn!(alarm_id = %alarm_id, error = %e, "Bridge failed to schedule wake");
                }
            }
            CoreEvent::WakeCancelled { alarm_id } => {
                if let Err(e) = self.bridge.cancel_wake(alarm_id.clone()).await {
                    warn!(alarm_id = %alarm_id, error = %e, "Bridge failed to cancel wake");
                }
            }
            CoreEvent::PreviewRequested { sound } => {
                if let Err(e) = self.bridge.preview_sound(resolve(&sound)).await {
                    warn!(sound = %sound.as_token(), error = %e, "Bridge failed to preview sound");
                }
            }
            CoreEvent::AlarmsChanged { count } => {
                debug!(count, "Alarm list changed, nothing to realize");
            }
        }
    }
}

/// Feeds a single bridge worker, so bridge calls run one at a time in the
/// order the engine produced them. A cancel can never overtake the
/// schedule it undoes.
#[derive(Clone)]
pub struct DispatchQueue {
    tx: mpsc::UnboundedSender<CoreEvent>,
}

impl DispatchQueue {
    /// Start the worker on the current runtime. It exits once every queue
    /// handle is dropped and the backlog is drained.
    pub fn spawn(dispatcher: Dispatcher) -> (Self, JoinHandle<()>) {
        let (tx, mut rx) = mpsc::unbounded_channel::<CoreEvent>();
        let worker = tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                dispatcher.realize(event).await;
            }
            debug!("Bridge worker drained");
        });
        (Self { tx }, worker)
    }

    /// Enqueue without waiting on the bridge
    pub fn push(&self, event: CoreEvent) {
        if !Dispatcher::wants(&event) {
            return;
        }
        if let Err(e) = self.tx.send(event) {
            warn!(event = ?e.0, "Bridge worker gone, event dropped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{Local, TimeZone};
    use reveille_api::{CatalogSound, FireKind, HapticLevel, SoundRef};
    use reveille_host_api::{
        BridgeCall, BridgeCapabilities, BridgeResult, MockBridge, PlayableSound, WakeRequest,
    };
    use reveille_util::{AlarmId, WallClock};

    fn dispatcher() -> (Dispatcher, Arc<MockBridge>) {
        let bridge = Arc::new(MockBridge::new());
        (
            Dispatcher::new(bridge.clone(), Duration::from_secs(10)),
            bridge,
        )
    }

    fn fired(sound: SoundRef) -> CoreEvent {
        CoreEvent::AlarmFired {
            alarm_id: AlarmId::new("a1"),
            kind: FireKind::First,
            label: None,
            time: WallClock::new(7, 0).unwrap(),
            sound,
            snooze_count: 1,
            haptic: HapticLevel::Light,
        }
    }

    #[tokio::test]
    async fn fire_resolves_sound() {
        let (dispatcher, bridge) = dispatcher();
        dispatcher
            .realize(fired(SoundRef::Catalog(CatalogSound::Chimes)))
            .await;

        let fires = bridge.fires();
        assert_eq!(fires.len(), 1);
        assert!(matches!(
            fires[0].sound,
            PlayableSound::Tone {
                sound: CatalogSound::Chimes,
                ..
            }
        ));
        assert_eq!(fires[0].haptic, HapticLevel::Light);
        assert_eq!(fires[0].banner_duration, Duration::from_secs(10));
    }

    #[tokio::test]
    async fn custom_sound_passes_through() {
        let (dispatcher, bridge) = dispatcher();
        dispatcher
            .realize(fired(SoundRef::Custom("/tmp/rooster.ogg".into())))
            .await;
        assert!(bridge.fires()[0].sound.is_custom());
    }

    #[tokio::test]
    async fn bridge_failure_is_swallowed() {
        let (dispatcher, bridge) = dispatcher();
        *bridge.fail_fire.lock().unwrap() = true;
        *bridge.fail_schedule.lock().unwrap() = true;

        dispatcher.realize(fired(SoundRef::default())).await;
        dispatcher
            .realize(CoreEvent::WakeRequested(WakeRequest {
                alarm_id: AlarmId::new("a1"),
                time: WallClock::new(7, 0).unwrap(),
                label: None,
                fire_at: Local.with_ymd_and_hms(2024, 1, 16, 7, 0, 0).unwrap(),
            }))
            .await;

        assert_eq!(bridge.calls().len(), 2);
        assert_eq!(bridge.pending_wake_count(), 0);
    }

    #[tokio::test]
    async fn list_changes_skip_the_bridge() {
        let (dispatcher, bridge) = dispatcher();
        let event = CoreEvent::AlarmsChanged { count: 3 };
        assert!(!Dispatcher::wants(&event));
        dispatcher.realize(event).await;
        assert!(bridge.calls().is_empty());

        dispatcher
            .realize(CoreEvent::WakeCancelled {
                alarm_id: AlarmId::new("a1"),
            })
            .await;
        assert_eq!(bridge.calls(), vec![BridgeCall::CancelWake(AlarmId::new("a1"))]);
    }

    #[tokio::test]
    async fn preview_plays_sound_only() {
        let (dispatcher, bridge) = dispatcher();
        dispatcher
            .realize(CoreEvent::PreviewRequested {
                sound: SoundRef::Catalog(CatalogSound::Urgent),
            })
            .await;

        assert!(bridge.fires().is_empty());
        let previews = bridge.previews();
        assert_eq!(previews.len(), 1);
        assert!(matches!(
            previews[0],
            PlayableSound::Tone {
                sound: CatalogSound::Urgent,
                ..
            }
        ));
    }

    /// Takes a while to schedule, like a helper process would
    struct SlowBridge(Arc<MockBridge>);

    #[async_trait]
    impl NotificationBridge for SlowBridge {
        fn capabilities(&self) -> &BridgeCapabilities {
            self.0.capabilities()
        }

        async fn schedule_wake(&self, request: WakeRequest) -> BridgeResult<()> {
            tokio::time::sleep(Duration::from_millis(50)).await;
            self.0.schedule_wake(request).await
        }

        async fn cancel_wake(&self, alarm_id: AlarmId) -> BridgeResult<()> {
            self.0.cancel_wake(alarm_id).await
        }

        async fn fire(&self, request: FireRequest) -> BridgeResult<()> {
            self.0.fire(request).await
        }

        async fn preview_sound(&self, sound: PlayableSound) -> BridgeResult<()> {
            self.0.preview_sound(sound).await
        }
    }

    #[tokio::test]
    async fn queue_keeps_cancel_behind_slow_schedule() {
        let mock = Arc::new(MockBridge::new());
        let dispatcher = Dispatcher::new(
            Arc::new(SlowBridge(mock.clone())),
            Duration::from_secs(10),
        );
        let (queue, worker) = DispatchQueue::spawn(dispatcher);
        let id = AlarmId::new("a1");

        queue.push(CoreEvent::WakeRequested(WakeRequest {
            alarm_id: id.clone(),
            time: WallClock::new(7, 0).unwrap(),
            label: None,
            fire_at: Local.with_ymd_and_hms(2024, 1, 16, 7, 0, 0).unwrap(),
        }));
        queue.push(CoreEvent::AlarmsChanged { count: 0 });
        queue.push(CoreEvent::WakeCancelled {
            alarm_id: id.clone(),
        });
        drop(queue);
        worker.await.unwrap();

        assert!(mock.pending_wake(&id).is_none());
        let calls = mock.calls();
        assert_eq!(calls.len(), 2);
        assert!(matches!(calls[0], BridgeCall::ScheduleWake(_)));
        assert_eq!(calls[1], BridgeCall::CancelWake(id));
    }
}
