//! Bibliothèque homeguard: console de détection d'intrusion simulée
//!
//! Cette bibliothèque fabrique du trafic IoT synthétique, le conserve dans un
//! flux borné, publie les alertes critiques et soumet des lots d'événements à
//! un moteur d'analyse IA pour produire un rapport de sécurité.
//!
//! Aucune capture réseau ni cryptographie réelle: l'empreinte SHA-256 sert
//! à l'affichage anti-falsification, l'obfuscation est cosmétique.

// Modules principaux
pub mod models;   // Structures de données et modèles
pub mod config;   // Configuration du système
pub mod logger;   // Journalisation des événements
pub mod log_mode; // Modes de journalisation

// Cœur de la simulation
pub mod security;      // Empreinte, obfuscation et masquage
pub mod synthesizer;   // Génération d'événements synthétiques
pub mod traffic;       // Tampon, minuterie et alertes
pub mod notifications; // Signal sonore des alertes

// Collaborateurs externes et surfaces d'accès
pub mod report; // Analyse forensique par IA
pub mod api;    // API HTTP de consultation de l'état
pub mod cli;    // Interface en ligne de commande

// Re-export des structures principales pour faciliter l'utilisation
pub use config::Config;
pub use log_mode::LogMode;
pub use models::{AnalysisReport, NetworkEvent, Severity, ThreatLevel};
pub use report::ForensicAnalyst;
pub use synthesizer::{EventSource, LogSynthesizer};
pub use traffic::{MonitorSettings, StateChange, TrafficMonitor};
