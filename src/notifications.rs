//! Module de gestion des notifications sonores
//!
//! Une alerte critique déclenche un signal sonore. L'envoi est « tire et
//! oublie »: un échec est journalisé puis ignoré, il ne modifie jamais l'état.

use crate::models::NetworkEvent;
use log::debug;
use std::io::Write;

/// Collaborateur chargé d'émettre une notification audible
pub trait AlertNotifier: Send + Sync {
    fn notify(&self, event: &NetworkEvent) -> anyhow::Result<()>;
}

/// Émet le caractère BEL sur la sortie d'erreur du terminal
pub struct TerminalBell;

impl AlertNotifier for TerminalBell {
    fn notify(&self, event: &NetworkEvent) -> anyhow::Result<()> {
        let mut stderr = std::io::stderr().lock();
        stderr.write_all(b"\x07")?;
        stderr.flush()?;
        debug!("Signal sonore émis pour l'événement {}", event.id);
        Ok(())
    }
}

/// Notificateur muet (sons désactivés)
pub struct SilentNotifier;

impl AlertNotifier for SilentNotifier {
    fn notify(&self, _event: &NetworkEvent) -> anyhow::Result<()> {
        Ok(())
    }
}

/// Choisit le notificateur selon la configuration
pub fn from_config(audible_alerts: bool) -> Box<dyn AlertNotifier> {
    if audible_alerts {
        Box::new(TerminalBell)
    } else {
        Box::new(SilentNotifier)
    }
}
