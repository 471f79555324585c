//! Abonnements aux changements d'état du moniteur

use crate::models::NetworkEvent;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

/// Raison de la disparition d'une alerte active
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearReason {
    /// Acquittement explicite par l'utilisateur
    Dismissed,
    /// Rétractation automatique après le délai d'affichage
    Expired,
}

/// Transition d'état publiée aux abonnés
#[derive(Debug, Clone, PartialEq)]
pub enum StateChange {
    EventAppended(NetworkEvent),
    RunningChanged(bool),
    AlertRaised(NetworkEvent),
    AlertCleared { id: Uuid, reason: ClearReason },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Callback = Arc<dyn Fn(&StateChange) + Send + Sync>;

#[derive(Default)]
pub struct ObserverRegistry {
    next_id: AtomicU64,
    callbacks: Mutex<Vec<(SubscriptionId, Callback)>>,
}

impl ObserverRegistry {
    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&StateChange) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.lock().push((id, Arc::new(callback)));
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut callbacks = self.lock();
        let before = callbacks.len();
        callbacks.retain(|(existing, _)| *existing != id);
        callbacks.len() != before
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Appelle chaque abonné hors du verrou, un abonné peut donc se désabonner
    pub fn notify(&self, change: &StateChange) {
        let snapshot: Vec<Callback> = self.lock().iter().map(|(_, cb)| cb.clone()).collect();
        for callback in snapshot {
            callback(change);
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<(SubscriptionId, Callback)>> {
        // Un abonné qui panique ne doit pas bloquer les suivants
        self.callbacks.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subscribe_and_unsubscribe() {
        let registry = ObserverRegistry::default();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let sink = seen.clone();
        let id = registry.subscribe(move |change| sink.lock().unwrap().push(change.clone()));

        registry.notify(&StateChange::RunningChanged(false));
        assert!(registry.unsubscribe(id));
        assert!(!registry.unsubscribe(id));
        registry.notify(&StateChange::RunningChanged(true));

        assert_eq!(*seen.lock().unwrap(), vec![StateChange::RunningChanged(false)]);
        assert!(registry.is_empty());
    }
}
