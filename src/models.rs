use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Niveau de gravité d'un événement réseau
///
/// Seuls `Low` et `Critical` sont produits par le générateur actuel,
/// `Medium` et `High` restent disponibles pour les consommateurs.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "LOW",
            Severity::Medium => "MEDIUM",
            Severity::High => "HIGH",
            Severity::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Protocole de transport simulé
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum Protocol {
    Tcp,
    Udp,
    Http,
    Mqtt,
    Coap,
}

impl Protocol {
    pub const ALL: [Protocol; 5] = [
        Protocol::Tcp,
        Protocol::Udp,
        Protocol::Http,
        Protocol::Mqtt,
        Protocol::Coap,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Protocol::Tcp => "TCP",
            Protocol::Udp => "UDP",
            Protocol::Http => "HTTP",
            Protocol::Mqtt => "MQTT",
            Protocol::Coap => "COAP",
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Type d'appareil connecté
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum DeviceClass {
    Camera,
    Thermostat,
    Lock,
    Light,
    Speaker,
}

impl DeviceClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceClass::Camera => "CAMERA",
            DeviceClass::Thermostat => "THERMOSTAT",
            DeviceClass::Lock => "LOCK",
            DeviceClass::Light => "LIGHT",
            DeviceClass::Speaker => "SPEAKER",
        }
    }
}

/// État d'un appareil du réseau domestique
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum DeviceStatus {
    Online,
    Offline,
    Compromised,
}

/// Appareil de référence (données statiques)
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Device {
    pub id: &'static str,
    pub name: &'static str,
    pub ip: &'static str,
    pub status: DeviceStatus,
    pub class: DeviceClass,
    pub last_seen: &'static str,
}

/// Un enregistrement de trafic réseau synthétique.
///
/// Immuable une fois créé: `integrity_digest` est toujours l'empreinte
/// de `payload` au moment de la génération.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NetworkEvent {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub source_address: String,
    pub destination_address: String,
    pub protocol: Protocol,
    pub payload: String,
    pub obfuscated_payload: String,
    pub integrity_digest: String,
    pub severity: Severity,
    pub device_class: DeviceClass,
}

impl NetworkEvent {
    pub fn is_critical(&self) -> bool {
        self.severity == Severity::Critical
    }

    /// Horodatage ISO-8601 à la milliseconde
    pub fn timestamp(&self) -> String {
        self.created_at.to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

/// Niveau de menace déduit d'un rapport d'analyse
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum ThreatLevel {
    High,
    Moderate,
    Unknown,
}

/// Rapport de sécurité produit par le moteur d'analyse
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub timestamp: DateTime<Utc>,
    pub threat_level: ThreatLevel,
    pub summary: String,
    pub recommendations: Vec<String>,
    pub raw_analysis: String,
}

/// Compteurs du tableau de bord, calculés à partir du tampon courant
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TrafficStats {
    pub buffered_events: usize,
    pub critical_events: usize,
    pub traffic_kbps: f64,
    pub connected_devices: usize,
}
