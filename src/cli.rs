use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Console de détection d'intrusion simulée pour un réseau domestique
#[derive(Debug, Parser)]
#[command(name = "homeguard", version, about)]
pub struct Cli {
    /// Fichier de configuration (par défaut: $HOMEGUARD_CONFIG ou /etc/homeguard/config.json)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Démarre la surveillance et l'API HTTP jusqu'à Ctrl-C
    Start {
        /// Adresse d'écoute de l'API (remplace la configuration)
        #[arg(short, long)]
        bind: Option<String>,

        /// Démarre avec la génération de trafic en pause
        #[arg(long)]
        paused: bool,
    },
    /// Affiche le flux d'événements en direct dans le terminal
    Watch {
        /// Nombre d'événements à afficher avant de quitter
        #[arg(short = 'n', long)]
        count: Option<usize>,

        /// Masque les charges utiles
        #[arg(long)]
        masked: bool,
    },
    /// Génère un rapport forensique sur un lot d'événements simulés
    Report {
        /// Taille du lot (remplace la configuration)
        #[arg(short, long)]
        batch: Option<usize>,
    },
    /// Liste les appareils connus
    Devices,
}
