//! Répartiteur d'alertes critiques
//!
//! La dernière alerte critique l'emporte toujours. Sa rétractation
//! automatique ne s'applique que si l'emplacement contient encore le même
//! événement: une minuterie périmée ne peut pas effacer une alerte plus récente.

use super::{ClearReason, StateChange, TrafficMonitor};
use crate::models::NetworkEvent;
use log::{debug, info, warn};
use uuid::Uuid;

impl TrafficMonitor {
    /// Publie une alerte pour un événement critique
    pub async fn raise(&self, event: NetworkEvent) {
        if !event.is_critical() {
            warn!("Alerte ignorée pour un événement non critique ({})", event.severity);
            return;
        }

        {
            let mut state = self.state.write().await;
            state.active_alert = Some(event.clone());
        }

        info!(
            "Intrusion détectée: {} depuis {} ({})",
            event.payload, event.source_address, event.protocol
        );
        self.observers.notify(&StateChange::AlertRaised(event.clone()));

        if let Err(e) = self.notifier.notify(&event) {
            debug!("Notification sonore indisponible: {}", e);
        }

        self.schedule_retraction(event.id);
    }

    /// Acquittement utilisateur: efface l'alerte sans condition
    pub async fn clear_alert(&self) {
        let cleared = {
            let mut state = self.state.write().await;
            state.active_alert.take()
        };

        if let Some(event) = cleared {
            debug!("Alerte {} acquittée", event.id);
            self.observers.notify(&StateChange::AlertCleared {
                id: event.id,
                reason: ClearReason::Dismissed,
            });
        }
    }

    fn schedule_retraction(&self, id: Uuid) {
        let monitor = self.clone();
        let delay = self.settings.alert_dismiss;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            monitor.retract(id).await;
        });
    }

    /// Efface l'alerte seulement si elle désigne toujours `id`
    pub(crate) async fn retract(&self, id: Uuid) -> bool {
        let cleared = {
            let mut state = self.state.write().await;
            match &state.active_alert {
                Some(current) if current.id == id => {
                    state.active_alert = None;
                    true
                }
                _ => false,
            }
        };

        if cleared {
            debug!("Alerte {} expirée", id);
            self.observers.notify(&StateChange::AlertCleared {
                id,
                reason: ClearReason::Expired,
            });
        }
        cleared
    }
}
