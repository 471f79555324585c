//! Générateur de trafic réseau synthétique
//!
//! Chaque appel produit un [`NetworkEvent`] bénin ou malveillant (environ
//! 10% d'attaques), accompagné de son empreinte et de sa forme obfusquée.

use crate::models::{Device, DeviceClass, DeviceStatus, NetworkEvent, Protocol, Severity};
use crate::security::{digest, obfuscate};
use async_trait::async_trait;
use chrono::Utc;
use rand::seq::IndexedRandom;
use rand::Rng;
use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

/// Probabilité par défaut qu'un événement soit une attaque
pub const ATTACK_PROBABILITY: f64 = 0.1;

/// Libellé fixe de la passerelle de destination
pub const GATEWAY_LABEL: &str = "192.168.1.1 (Gateway)";

pub static DEVICES: [Device; 5] = [
    Device {
        id: "dev_01",
        name: "Front Door Camera",
        ip: "192.168.1.101",
        status: DeviceStatus::Online,
        class: DeviceClass::Camera,
        last_seen: "Now",
    },
    Device {
        id: "dev_02",
        name: "Living Room Thermostat",
        ip: "192.168.1.102",
        status: DeviceStatus::Online,
        class: DeviceClass::Thermostat,
        last_seen: "Now",
    },
    Device {
        id: "dev_03",
        name: "Smart Lock Main",
        ip: "192.168.1.103",
        status: DeviceStatus::Online,
        class: DeviceClass::Lock,
        last_seen: "Now",
    },
    Device {
        id: "dev_04",
        name: "Kitchen Lights",
        ip: "192.168.1.104",
        status: DeviceStatus::Online,
        class: DeviceClass::Light,
        last_seen: "Now",
    },
    Device {
        id: "dev_05",
        name: "Smart Speaker",
        ip: "192.168.1.105",
        status: DeviceStatus::Offline,
        class: DeviceClass::Speaker,
        last_seen: "5m ago",
    },
];

const BENIGN_PAYLOADS: [&str; 7] = [
    "temp=22.5C",
    "status=locked",
    "brightness=80%",
    "stream_packet_seq=1234",
    "ping",
    "ack",
    "heartbeat",
];

const MALICIOUS_PAYLOADS: [&str; 6] = [
    "admin:admin",
    "DROP TABLE users;",
    "/etc/passwd",
    "overflow_buffer_A*9999",
    "exec('/bin/sh')",
    "download_malware.sh",
];

pub fn devices() -> &'static [Device] {
    &DEVICES
}

/// Source d'événements consommée par la boucle de surveillance
#[async_trait]
pub trait EventSource: Send + Sync {
    async fn next_event(&self) -> NetworkEvent;
}

/// Générateur d'événements aléatoires
pub struct LogSynthesizer {
    attack_probability: f64,
    sequence: AtomicU64,
}

impl Default for LogSynthesizer {
    fn default() -> Self {
        Self::new()
    }
}

impl LogSynthesizer {
    pub fn new() -> Self {
        Self::with_attack_probability(ATTACK_PROBABILITY)
    }

    pub fn with_attack_probability(probability: f64) -> Self {
        Self {
            attack_probability: probability.clamp(0.0, 1.0),
            sequence: AtomicU64::new(0),
        }
    }

    /// Produit un événement complet
    pub async fn synthesize(&self) -> NetworkEvent {
        let mut rng = rand::rng();
        self.synthesize_with(&mut rng)
    }

    pub fn synthesize_with<R: Rng + ?Sized>(&self, rng: &mut R) -> NetworkEvent {
        // Le tirage tombe dans les 10% supérieurs de l'intervalle => attaque
        let is_attack = rng.random::<f64>() >= 1.0 - self.attack_probability;

        // Tableaux constants non vides: le choix ne peut pas échouer
        let device = DEVICES.choose(rng).unwrap_or(&DEVICES[0]);
        let template = if is_attack {
            MALICIOUS_PAYLOADS.choose(rng).copied().unwrap_or(MALICIOUS_PAYLOADS[0])
        } else {
            BENIGN_PAYLOADS.choose(rng).copied().unwrap_or(BENIGN_PAYLOADS[0])
        };

        let created_at = Utc::now();
        let seq = self.sequence.fetch_add(1, Ordering::Relaxed);
        let payload = format!("{} [ts:{}-{}]", template, created_at.timestamp_millis(), seq);

        let source_address = if is_attack {
            format!("192.168.1.{}", rng.random_range(50..250))
        } else {
            device.ip.to_string()
        };

        let protocol = *Protocol::ALL.choose(rng).unwrap_or(&Protocol::Tcp);

        NetworkEvent {
            id: Uuid::new_v4(),
            created_at,
            source_address,
            destination_address: GATEWAY_LABEL.to_string(),
            protocol,
            integrity_digest: digest(&payload),
            obfuscated_payload: obfuscate(&payload),
            payload,
            severity: if is_attack { Severity::Critical } else { Severity::Low },
            device_class: device.class,
        }
    }

    /// Génère un lot d'événements, par exemple pour l'analyse forensique
    pub async fn batch(&self, size: usize) -> Vec<NetworkEvent> {
        let mut events = Vec::with_capacity(size);
        for _ in 0..size {
            events.push(self.synthesize().await);
        }
        events
    }
}

#[async_trait]
impl EventSource for LogSynthesizer {
    async fn next_event(&self) -> NetworkEvent {
        self.synthesize().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::security::{deobfuscate, verify_integrity};
    use std::collections::HashSet;

    #[tokio::test]
    async fn test_event_is_fully_populated() {
        let synth = LogSynthesizer::new();
        let event = synth.synthesize().await;

        assert!(verify_integrity(&event));
        assert_eq!(deobfuscate(&event.obfuscated_payload), event.payload);
        assert_eq!(event.destination_address, GATEWAY_LABEL);
        assert!(event.payload.contains(" [ts:"));
        assert!(event.severity == Severity::Low || event.severity == Severity::Critical);
    }

    #[test]
    fn test_attack_events_use_spoofed_source() {
        let synth = LogSynthesizer::with_attack_probability(1.0);
        let mut rng = rand::rng();

        for _ in 0..200 {
            let event = synth.synthesize_with(&mut rng);
            assert_eq!(event.severity, Severity::Critical);
            assert!(MALICIOUS_PAYLOADS.iter().any(|p| event.payload.starts_with(p)));

            let last_octet: u16 = event
                .source_address
                .strip_prefix("192.168.1.")
                .and_then(|octet| octet.parse().ok())
                .expect("adresse 192.168.1.x attendue");
            assert!((50..250).contains(&last_octet));
        }
    }

    #[test]
    fn test_benign_events_use_device_address() {
        let synth = LogSynthesizer::with_attack_probability(0.0);
        let mut rng = rand::rng();

        for _ in 0..200 {
            let event = synth.synthesize_with(&mut rng);
            assert_eq!(event.severity, Severity::Low);
            assert!(BENIGN_PAYLOADS.iter().any(|p| event.payload.starts_with(p)));

            let device = DEVICES
                .iter()
                .find(|d| d.ip == event.source_address)
                .expect("adresse d'un appareil connu");
            assert_eq!(device.class, event.device_class);
        }
    }

    #[test]
    fn test_payloads_are_unique() {
        let synth = LogSynthesizer::new();
        let mut rng = rand::rng();
        let payloads: HashSet<String> = (0..1000)
            .map(|_| synth.synthesize_with(&mut rng).payload)
            .collect();
        assert_eq!(payloads.len(), 1000);
    }

    #[test]
    fn test_critical_rate_converges_to_ten_percent() {
        let synth = LogSynthesizer::new();
        let mut rng = rand::rng();
        let samples = 10_000;
        let critical = (0..samples)
            .filter(|_| synth.synthesize_with(&mut rng).is_critical())
            .count();

        let ratio = critical as f64 / samples as f64;
        assert!((0.08..=0.12).contains(&ratio), "ratio observé: {}", ratio);
    }

    #[tokio::test]
    async fn test_batch_size() {
        let synth = LogSynthesizer::new();
        assert_eq!(synth.batch(15).await.len(), 15);
    }
}
