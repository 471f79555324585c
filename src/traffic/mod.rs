//! Module de surveillance du trafic
//!
//! Le [`TrafficMonitor`] possède l'état de la session: le tampon des
//! événements récents, l'indicateur de génération active et l'alerte
//! critique en cours. Une minuterie périodique alimente le tampon tant que
//! le moniteur est actif.
//!
//! Chaque démarrage ouvre une nouvelle « époque ». Un cycle de génération
//! encore en vol lors d'un arrêt n'est pas annulé, mais son résultat est
//! écarté car son époque n'est plus la courante.

mod alerts;
mod buffer;
mod observers;

pub use buffer::{EventBuffer, DEFAULT_CAPACITY};
pub use observers::{ClearReason, ObserverRegistry, StateChange, SubscriptionId};

use crate::config::Config;
use crate::models::{NetworkEvent, TrafficStats};
use crate::notifications::AlertNotifier;
use crate::synthesizer::{devices, EventSource};
use log::{debug, error, info};
use serde::Serialize;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use uuid::Uuid;

/// Paramètres temporels et de capacité du moniteur
#[derive(Debug, Clone, Copy)]
pub struct MonitorSettings {
    pub tick_interval: Duration,
    pub alert_dismiss: Duration,
    pub capacity: usize,
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_millis(2000),
            alert_dismiss: Duration::from_millis(6000),
            capacity: DEFAULT_CAPACITY,
        }
    }
}

impl From<&Config> for MonitorSettings {
    fn from(config: &Config) -> Self {
        Self {
            tick_interval: Duration::from_millis(config.tick_interval_ms.max(1)),
            alert_dismiss: Duration::from_millis(config.alert_dismiss_ms),
            capacity: config.buffer_capacity,
        }
    }
}

/// État mutable de la session
#[derive(Debug)]
pub(crate) struct TrafficState {
    pub(crate) buffer: EventBuffer,
    pub(crate) running: bool,
    pub(crate) active_alert: Option<NetworkEvent>,
    pub(crate) epoch: u64,
}

/// Copie en lecture seule de l'état, pour la couche de présentation
#[derive(Debug, Clone, Serialize)]
pub struct TrafficSnapshot {
    pub events: Vec<NetworkEvent>,
    pub running: bool,
    pub active_alert: Option<NetworkEvent>,
}

/// Propriétaire unique de l'état de la session.
///
/// Les clones partagent le même état.
#[derive(Clone)]
pub struct TrafficMonitor {
    pub(crate) settings: MonitorSettings,
    pub(crate) state: Arc<RwLock<TrafficState>>,
    pub(crate) source: Arc<dyn EventSource>,
    pub(crate) notifier: Arc<dyn AlertNotifier>,
    pub(crate) observers: Arc<ObserverRegistry>,
    ticker: Arc<Mutex<Option<JoinHandle<()>>>>,
    ingest_lock: Arc<tokio::sync::Mutex<()>>,
}

impl TrafficMonitor {
    /// Crée le moniteur: tampon vide, état actif, minuterie non armée
    pub fn new(
        settings: MonitorSettings,
        source: Arc<dyn EventSource>,
        notifier: Arc<dyn AlertNotifier>,
    ) -> Self {
        Self {
            settings,
            state: Arc::new(RwLock::new(TrafficState {
                buffer: EventBuffer::with_capacity(settings.capacity),
                running: true,
                active_alert: None,
                epoch: 0,
            })),
            source,
            notifier,
            observers: Arc::new(ObserverRegistry::default()),
            ticker: Arc::new(Mutex::new(None)),
            ingest_lock: Arc::new(tokio::sync::Mutex::new(())),
        }
    }

    pub fn settings(&self) -> MonitorSettings {
        self.settings
    }

    /// Arme la minuterie si le moniteur est actif. Doit être appelé depuis
    /// un runtime Tokio.
    pub async fn launch(&self) {
        let (running, epoch) = {
            let state = self.state.read().await;
            (state.running, state.epoch)
        };
        if running && !self.is_armed() {
            self.arm_ticker(epoch);
            info!(
                "Surveillance du trafic lancée (intervalle: {:?}, capacité: {})",
                self.settings.tick_interval, self.settings.capacity
            );
        }
    }

    /// Arrête la génération et détache tous les abonnés
    pub async fn shutdown(&self) {
        self.stop().await;
        self.disarm_ticker();
        self.observers.clear();
        info!("Surveillance du trafic terminée");
    }

    /// STOPPED -> RUNNING. Sans effet si déjà actif.
    pub async fn start(&self) {
        let (changed, epoch) = {
            let mut state = self.state.write().await;
            if state.running && self.is_armed() {
                return;
            }
            let changed = !state.running;
            if changed {
                state.running = true;
                state.epoch += 1;
            }
            (changed, state.epoch)
        };

        self.arm_ticker(epoch);

        if changed {
            info!("Génération de trafic reprise");
            self.observers.notify(&StateChange::RunningChanged(true));
        }
    }

    /// RUNNING -> STOPPED. Aucun cycle ne démarre après le retour de l'appel.
    pub async fn stop(&self) {
        {
            let mut state = self.state.write().await;
            if !state.running {
                return;
            }
            state.running = false;
            state.epoch += 1;
        }

        self.disarm_ticker();
        info!("Génération de trafic en pause");
        self.observers.notify(&StateChange::RunningChanged(false));
    }

    pub async fn set_running(&self, running: bool) {
        if running {
            self.start().await;
        } else {
            self.stop().await;
        }
    }

    /// Ajoute un événement au tampon et déclenche l'alerte s'il est critique
    pub async fn ingest(&self, event: NetworkEvent) {
        let _guard = self.ingest_lock.lock().await;
        self.append(event, None).await;
    }

    /// Un cycle de la minuterie: génération puis ajout
    async fn run_tick(&self, epoch: u64) {
        let _guard = self.ingest_lock.lock().await;
        if !self.is_current(epoch).await {
            return;
        }

        let event = self.source.next_event().await;
        if !self.append(event, Some(epoch)).await {
            debug!("Résultat de génération écarté: moniteur arrêté pendant le cycle");
        }
    }

    async fn append(&self, event: NetworkEvent, epoch: Option<u64>) -> bool {
        {
            let mut state = self.state.write().await;
            if let Some(epoch) = epoch {
                if !state.running || state.epoch != epoch {
                    return false;
                }
            }
            if let Some(evicted) = state.buffer.push(event.clone()) {
                debug!("Événement {} évincé du tampon", evicted.id);
            }
        }

        self.observers.notify(&StateChange::EventAppended(event.clone()));

        if event.is_critical() {
            self.raise(event).await;
        }
        true
    }

    async fn is_current(&self, epoch: u64) -> bool {
        let state = self.state.read().await;
        state.running && state.epoch == epoch
    }

    fn arm_ticker(&self, epoch: u64) {
        let mut slot = self.ticker.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(previous) = slot.take() {
            previous.abort();
        }

        let monitor = self.clone();
        let period = self.settings.tick_interval;
        *slot = Some(tokio::spawn(async move {
            let mut interval = time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                interval.tick().await;

                // Chaque cycle tourne dans sa propre tâche: un échec n'arrête pas la minuterie
                let tick_monitor = monitor.clone();
                let tick = tokio::spawn(async move { tick_monitor.run_tick(epoch).await });
                if let Err(e) = tick.await {
                    if e.is_panic() {
                        error!("Échec d'un cycle de génération, reprise au prochain intervalle");
                    }
                }
            }
        }));
    }

    fn disarm_ticker(&self) {
        let mut slot = self.ticker.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(handle) = slot.take() {
            handle.abort();
        }
    }

    fn is_armed(&self) -> bool {
        let slot = self.ticker.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        slot.as_ref().map(|handle| !handle.is_finished()).unwrap_or(false)
    }

    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&StateChange) + Send + Sync + 'static,
    {
        self.observers.subscribe(callback)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    pub async fn is_running(&self) -> bool {
        self.state.read().await.running
    }

    /// Événements du plus récent au plus ancien
    pub async fn logs(&self) -> Vec<NetworkEvent> {
        self.state.read().await.buffer.to_vec()
    }

    pub async fn len(&self) -> usize {
        self.state.read().await.buffer.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.state.read().await.buffer.is_empty()
    }

    pub async fn find(&self, id: Uuid) -> Option<NetworkEvent> {
        self.state.read().await.buffer.get(id).cloned()
    }

    pub async fn active_alert(&self) -> Option<NetworkEvent> {
        self.state.read().await.active_alert.clone()
    }

    pub async fn snapshot(&self) -> TrafficSnapshot {
        let state = self.state.read().await;
        TrafficSnapshot {
            events: state.buffer.to_vec(),
            running: state.running,
            active_alert: state.active_alert.clone(),
        }
    }

    /// Compteurs du tableau de bord
    pub async fn stats(&self) -> TrafficStats {
        let state = self.state.read().await;
        let buffered = state.buffer.len();
        TrafficStats {
            buffered_events: buffered,
            critical_events: state.buffer.critical_count(),
            // Débit fictif affiché par la console
            traffic_kbps: (buffered as f64 * 2.1 * 10.0).round() / 10.0,
            connected_devices: devices().len(),
        }
    }
}
