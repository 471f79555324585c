use crate::log_mode::LogMode;
use crate::models::{AnalysisReport, NetworkEvent, ThreatLevel};
use crate::traffic::{ClearReason, StateChange};
use chrono::{DateTime, Local};
use log::{debug, error, info, warn};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use uuid::Uuid;

/// Journal des événements de la session (fichier ou systemd-journal)
pub struct Logger {
    log_file: Mutex<Option<File>>,
    log_path: String,
    log_mode: LogMode,
}

impl Logger {
    pub fn new(log_path: String) -> Self {
        Self::new_with_mode(log_path, LogMode::File)
    }

    pub fn new_with_mode(log_path: String, log_mode: LogMode) -> Self {
        let file = if log_mode.writes_file() {
            Self::open(&log_path)
        } else {
            // En mode systemd-journal, pas besoin de fichier
            None
        };

        Self {
            log_file: Mutex::new(file),
            log_path,
            log_mode,
        }
    }

    fn open(log_path: &str) -> Option<File> {
        // Créer le répertoire si nécessaire
        if let Some(parent) = Path::new(log_path).parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                error!("Erreur lors de la création du répertoire de logs: {}", e);
            }
        }

        match OpenOptions::new().create(true).append(true).open(log_path) {
            Ok(file) => Some(file),
            Err(e) => {
                error!("Erreur lors de l'ouverture du fichier de log {}: {}", log_path, e);
                None
            }
        }
    }

    /// Point d'entrée utilisé comme abonné du moniteur
    pub fn handle_change(&self, change: &StateChange) {
        match change {
            StateChange::EventAppended(event) => self.log_event(event),
            StateChange::AlertRaised(event) => self.log_alert(event),
            StateChange::AlertCleared { id, reason } => self.log_alert_cleared(*id, *reason),
            StateChange::RunningChanged(running) => self.log_running(*running),
        }
    }

    pub fn log_event(&self, event: &NetworkEvent) {
        let log_entry = format!(
            "[{}] [{}] {} -> {} | Protocol: {} | Device: {} | Payload: {} | SHA-256: {}",
            Self::format_time(event.created_at.into()),
            event.severity,
            event.source_address,
            event.destination_address,
            event.protocol,
            event.device_class.as_str(),
            event.payload,
            event.integrity_digest
        );

        match self.log_mode {
            LogMode::File => self.write_to_log(&log_entry),
            LogMode::SystemdJournal => debug!("{}", log_entry),
        }
    }

    pub fn log_alert(&self, event: &NetworkEvent) {
        let log_entry = format!(
            "[{}] [ALERT] Intrusion détectée depuis {} ({}) | Payload: {}",
            Self::now(),
            event.source_address,
            event.protocol,
            event.payload
        );

        match self.log_mode {
            LogMode::File => self.write_to_log(&log_entry),
            LogMode::SystemdJournal => warn!("{}", log_entry),
        }
    }

    pub fn log_alert_cleared(&self, id: Uuid, reason: ClearReason) {
        let reason = match reason {
            ClearReason::Dismissed => "acquittée",
            ClearReason::Expired => "expirée",
        };
        let log_entry = format!("[{}] [ALERT] Alerte {} {}", Self::now(), id, reason);

        match self.log_mode {
            LogMode::File => self.write_to_log(&log_entry),
            LogMode::SystemdJournal => info!("{}", log_entry),
        }
    }

    pub fn log_running(&self, running: bool) {
        let status = if running { "reprise" } else { "en pause" };
        let log_entry = format!("[{}] [MONITOR] Génération de trafic {}", Self::now(), status);

        match self.log_mode {
            LogMode::File => self.write_to_log(&log_entry),
            LogMode::SystemdJournal => info!("{}", log_entry),
        }
    }

    pub fn log_report(&self, report: &AnalysisReport) {
        let level = match report.threat_level {
            ThreatLevel::High => "HIGH",
            ThreatLevel::Moderate => "MODERATE",
            ThreatLevel::Unknown => "UNKNOWN",
        };
        let log_entry = format!(
            "[{}] [REPORT] Niveau de menace: {} | {}",
            Self::format_time(report.timestamp.into()),
            level,
            report.summary
        );

        match self.log_mode {
            LogMode::File => self.write_to_log(&log_entry),
            LogMode::SystemdJournal => match report.threat_level {
                ThreatLevel::Unknown => error!("{}", log_entry),
                ThreatLevel::High => warn!("{}", log_entry),
                ThreatLevel::Moderate => info!("{}", log_entry),
            },
        }
    }

    fn now() -> String {
        Self::format_time(Local::now())
    }

    fn format_time(timestamp: DateTime<Local>) -> String {
        timestamp.format("%Y-%m-%d %H:%M:%S%.3f").to_string()
    }

    fn write_to_log(&self, message: &str) {
        let mut log_file_guard = match self.log_file.lock() {
            Ok(guard) => guard,
            Err(e) => {
                error!("Erreur lors de l'acquisition du verrou pour le fichier de log: {}", e);
                return;
            }
        };

        if let Some(file) = log_file_guard.as_mut() {
            if let Err(e) = writeln!(file, "{}", message) {
                error!("Erreur lors de l'écriture dans le fichier de log: {}", e);

                // Essayer de réouvrir le fichier
                *log_file_guard = Self::open(&self.log_path);
            }
        }
    }
}
