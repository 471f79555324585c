use crate::log_mode::LogMode;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "/etc/homeguard/config.json";

/// Variable d'environnement permettant de surcharger le chemin de configuration
pub const CONFIG_ENV: &str = "HOMEGUARD_CONFIG";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Version actuelle du logiciel
    pub version: String,

    /// Intervalle (ms) entre deux événements générés
    pub tick_interval_ms: u64,

    /// Délai (ms) avant la rétractation automatique d'une alerte
    pub alert_dismiss_ms: u64,

    /// Nombre maximal d'événements conservés dans le flux
    pub buffer_capacity: usize,

    /// Probabilité qu'un événement généré soit une attaque
    pub attack_probability: f64,

    /// Taille du lot envoyé au moteur d'analyse
    pub report_batch_size: usize,

    /// Chemin vers le fichier de log
    pub log_file: String,

    /// Niveau de log
    pub log_level: String,

    /// Mode de journalisation (fichier ou systemd-journal)
    pub log_mode: LogMode,

    /// Adresse d'écoute de l'API HTTP
    pub api_bind: String,

    /// Modèle utilisé pour l'analyse forensique
    pub gemini_model: String,

    /// Nom de la variable d'environnement contenant la clé d'API
    pub api_key_env: String,

    /// Délai maximal (s) d'une requête au moteur d'analyse
    pub request_timeout_secs: u64,

    /// Signal sonore lors d'une alerte critique
    pub audible_alerts: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            version: env!("CARGO_PKG_VERSION").to_string(),
            tick_interval_ms: 2000,
            alert_dismiss_ms: 6000,
            buffer_capacity: 100,
            attack_probability: 0.1,
            report_batch_size: 15,
            log_file: "/var/log/homeguard/homeguard.log".to_string(),
            log_level: "info".to_string(),
            log_mode: LogMode::File,
            api_bind: "127.0.0.1:8080".to_string(),
            gemini_model: "gemini-2.5-flash".to_string(),
            api_key_env: "API_KEY".to_string(),
            request_timeout_secs: 30,
            audible_alerts: true,
        }
    }
}

impl Config {
    /// Chemin effectif: variable d'environnement ou emplacement système
    pub fn default_path() -> PathBuf {
        std::env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILE))
    }

    /// Charge la configuration depuis l'emplacement par défaut
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(&Self::default_path())
    }

    /// Charge la configuration; un fichier absent donne les valeurs par défaut
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("lecture de la configuration {}", path.display()))?;
        let config: Config = serde_json::from_str(&content)
            .with_context(|| format!("configuration invalide: {}", path.display()))?;

        Ok(config)
    }

    /// Sauvegarde la configuration dans le fichier
    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("création du répertoire {}", parent.display()))?;
            }
        }

        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).with_context(|| format!("écriture de {}", path.display()))?;

        Ok(())
    }

    /// Clé d'API du moteur d'analyse, si présente et non vide
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
    }
}
