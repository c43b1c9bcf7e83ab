//! The persisted alarm list

use reveille_api::Alarm;
use reveille_store::{ALARMS_KEY, Store, StoreResult};
use reveille_util::AlarmId;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Owns the in-memory alarm list and mirrors it into the store's `alarms`
/// slot after every mutation
pub struct AlarmBook {
    alarms: Vec<Alarm>,
    store: Arc<dyn Store>,
}

impl AlarmBook {
    /// Load the list. A missing, unreadable or malformed slot yields an
    /// empty list.
    pub fn load(store: Arc<dyn Store>) -> Self {
        let alarms = match store.read_slot(ALARMS_KEY) {
            Ok(Some(json)) => match serde_json::from_str::<Vec<Alarm>>(&json) {
                Ok(alarms) => alarms,
                Err(e) => {
                    warn!(error = %e, "Stored alarm list is malformed, starting empty");
                    Vec::new()
                }
            },
            Ok(None) => {
                debug!("No stored alarm list");
                Vec::new()
            }
            Err(e) => {
                warn!(error = %e, "Failed to read stored alarm list, starting empty");
                Vec::new()
            }
        };

        info!(count = alarms.len(), "Alarm list loaded");
        Self { alarms, store }
    }

    pub fn alarms(&self) -> &[Alarm] {
        &self.alarms
    }

    pub fn get(&self, id: &AlarmId) -> Option<&Alarm> {
        self.alarms.iter().find(|a| &a.id == id)
    }

    pub fn len(&self) -> usize {
        self.alarms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alarms.is_empty()
    }

    /// Apply `f` to the list, then persist the whole list. A failed write is
    /// logged; the in-memory change stands.
    pub fn mutate<R>(&mut self, f: impl FnOnce(&mut Vec<Alarm>) -> R) -> R {
        let result = f(&mut self.alarms);
        if let Err(e) = self.persist() {
            warn!(error = %e, "Failed to persist alarm list");
        }
        result
    }

    fn persist(&self) -> StoreResult<()> {
        let json = serde_json::to_string(&self.alarms)?;
        self.store.write_slot(ALARMS_KEY, &json)
    }
}
