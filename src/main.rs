use anyhow::Context;
use clap::Parser;
use homeguard::api::{self, ApiState};
use homeguard::cli::{Cli, Command};
use homeguard::config::Config;
use homeguard::logger::Logger;
use homeguard::log_mode::LogMode;
use homeguard::models::NetworkEvent;
use homeguard::notifications;
use homeguard::report::{self, ForensicAnalyst, GeminiClient};
use homeguard::security::mask;
use homeguard::synthesizer::{devices, LogSynthesizer};
use homeguard::traffic::{MonitorSettings, StateChange, TrafficMonitor};
use log::{info, warn};
use std::sync::Arc;
use tokio::sync::mpsc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Charger la configuration pour déterminer le mode de log
    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    init_logging(&config);

    match cli.command {
        Command::Start { bind, paused } => run_console(&config, bind, paused).await,
        Command::Watch { count, masked } => watch(&config, count, masked).await,
        Command::Report { batch } => generate_report(&config, batch).await,
        Command::Devices => {
            for device in devices() {
                println!(
                    "{:<7} {:<24} {:<15} {:<11} {:?} ({})",
                    device.id,
                    device.name,
                    device.ip,
                    device.class.as_str(),
                    device.status,
                    device.last_seen
                );
            }
            Ok(())
        }
    }
}

fn init_logging(config: &Config) {
    match config.log_mode {
        LogMode::File => {
            env_logger::init_from_env(env_logger::Env::default().default_filter_or(&config.log_level));
        }
        LogMode::SystemdJournal => {
            #[cfg(feature = "systemd")]
            {
                use systemd_journal_logger::JournalLog;

                let log_level = match config.log_level.to_lowercase().as_str() {
                    "trace" => log::LevelFilter::Trace,
                    "debug" => log::LevelFilter::Debug,
                    "warn" => log::LevelFilter::Warn,
                    "error" => log::LevelFilter::Error,
                    _ => log::LevelFilter::Info,
                };

                match JournalLog::new() {
                    Ok(logger) => {
                        if let Err(e) = logger
                            .with_syslog_identifier("homeguard".to_string())
                            .install()
                        {
                            eprintln!("Erreur lors de l'installation du logger systemd: {}", e);
                            env_logger::init_from_env(
                                env_logger::Env::default().default_filter_or(&config.log_level),
                            );
                        } else {
                            log::set_max_level(log_level);
                            info!("Logger systemd initialisé avec niveau: {}", config.log_level);
                        }
                    }
                    Err(e) => {
                        eprintln!("Erreur lors de l'initialisation du logger systemd: {}", e);
                        env_logger::init_from_env(
                            env_logger::Env::default().default_filter_or(&config.log_level),
                        );
                    }
                }
            }

            // Fallback si la feature systemd n'est pas activée
            #[cfg(not(feature = "systemd"))]
            {
                eprintln!("AVERTISSEMENT: Le mode SystemdJournal n'est pas disponible (feature 'systemd' non activée). Utilisation du logger standard à la place.");
                env_logger::init_from_env(env_logger::Env::default().default_filter_or(&config.log_level));
            }
        }
    }
}

fn build_monitor(config: &Config, synthesizer: Arc<LogSynthesizer>) -> TrafficMonitor {
    TrafficMonitor::new(
        MonitorSettings::from(config),
        synthesizer,
        Arc::from(notifications::from_config(config.audible_alerts)),
    )
}

fn build_analyst(config: &Config) -> ForensicAnalyst {
    let client = GeminiClient::from_config(config);
    if config.api_key().is_none() {
        warn!(
            "Variable {} absente: les rapports forensiques seront indisponibles",
            config.api_key_env
        );
    }
    ForensicAnalyst::new(Arc::new(client))
}

/// Surveillance continue avec l'API HTTP
async fn run_console(config: &Config, bind: Option<String>, paused: bool) -> anyhow::Result<()> {
    let synthesizer = Arc::new(LogSynthesizer::with_attack_probability(config.attack_probability));
    let monitor = build_monitor(config, synthesizer.clone());
    let logger = Arc::new(Logger::new_with_mode(config.log_file.clone(), config.log_mode));

    let journal = logger.clone();
    monitor.subscribe(move |change| journal.handle_change(change));

    if paused {
        monitor.stop().await;
    }
    monitor.launch().await;

    let state = ApiState {
        monitor: monitor.clone(),
        analyst: build_analyst(config),
        synthesizer,
        batch_size: config.report_batch_size,
        logger: Some(logger),
    };

    let bind = bind.unwrap_or_else(|| config.api_bind.clone());
    let listener = tokio::net::TcpListener::bind(&bind)
        .await
        .with_context(|| format!("impossible d'écouter sur {}", bind))?;
    info!("API disponible sur http://{}/api/v1", bind);

    axum::serve(listener, api::create_router(state))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await
        .context("arrêt inattendu du serveur HTTP")?;

    monitor.shutdown().await;
    Ok(())
}

/// Flux en direct dans le terminal
async fn watch(config: &Config, count: Option<usize>, masked: bool) -> anyhow::Result<()> {
    let synthesizer = Arc::new(LogSynthesizer::with_attack_probability(config.attack_probability));
    let monitor = build_monitor(config, synthesizer);

    let (tx, mut rx) = mpsc::unbounded_channel::<StateChange>();
    monitor.subscribe(move |change| {
        let _ = tx.send(change.clone());
    });
    monitor.launch().await;

    let mut shown = 0usize;
    loop {
        tokio::select! {
            change = rx.recv() => match change {
                Some(StateChange::EventAppended(event)) => {
                    println!("{}", feed_line(&event, masked));
                    shown += 1;
                    if count.is_some_and(|limit| shown >= limit) {
                        break;
                    }
                }
                Some(StateChange::AlertRaised(event)) => {
                    println!(
                        "!!! INTRUSION DETECTED !!! SRC: {} {} Payload: {}",
                        event.source_address, event.protocol, event.payload
                    );
                }
                Some(_) => {}
                None => break,
            },
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    monitor.shutdown().await;
    Ok(())
}

fn feed_line(event: &NetworkEvent, masked: bool) -> String {
    let payload = if masked { mask(&event.payload) } else { event.payload.clone() };
    format!(
        "{} [{:<8}] {:<15} -> {} {:<4} {}",
        event.created_at.format("%H:%M:%S"),
        event.severity,
        event.source_address,
        event.destination_address,
        event.protocol,
        payload
    )
}

/// Rapport forensique ponctuel
async fn generate_report(config: &Config, batch: Option<usize>) -> anyhow::Result<()> {
    let synthesizer = LogSynthesizer::with_attack_probability(config.attack_probability);
    let events = synthesizer
        .batch(batch.unwrap_or(config.report_batch_size))
        .await;

    println!("Source Dataset ({} entries)", events.len());
    println!("{}", report::format_batch(&events));
    println!();

    let analysis = build_analyst(config).analyze(&events).await;
    println!("THREAT LEVEL: {:?}", analysis.threat_level);
    println!("{}", analysis.summary);
    for recommendation in &analysis.recommendations {
        println!("- {}", recommendation);
    }
    println!();
    println!("{}", analysis.raw_analysis);

    Ok(())
}
