//! Tampon circulaire des événements récents (le plus récent en tête)

use crate::models::NetworkEvent;
use std::collections::VecDeque;
use uuid::Uuid;

/// Capacité par défaut du tampon
pub const DEFAULT_CAPACITY: usize = 100;

#[derive(Debug, Clone)]
pub struct EventBuffer {
    events: VecDeque<NetworkEvent>,
    capacity: usize,
}

impl Default for EventBuffer {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl EventBuffer {
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            events: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Insère en tête et renvoie l'événement évincé en queue, s'il y en a un
    pub fn push(&mut self, event: NetworkEvent) -> Option<NetworkEvent> {
        self.events.push_front(event);
        if self.events.len() > self.capacity {
            self.events.pop_back()
        } else {
            None
        }
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn latest(&self) -> Option<&NetworkEvent> {
        self.events.front()
    }

    pub fn get(&self, id: Uuid) -> Option<&NetworkEvent> {
        self.events.iter().find(|event| event.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &NetworkEvent> {
        self.events.iter()
    }

    pub fn critical_count(&self) -> usize {
        self.events.iter().filter(|event| event.is_critical()).count()
    }

    pub fn to_vec(&self) -> Vec<NetworkEvent> {
        self.events.iter().cloned().collect()
    }
}
