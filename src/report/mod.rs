//! Module d'analyse forensique
//!
//! Un lot d'événements est sérialisé ligne par ligne puis soumis à un
//! fournisseur de génération de texte. Toute erreur du fournisseur est
//! convertie en rapport de repli: l'analyse ne renvoie jamais d'erreur.

mod gemini;

pub use gemini::GeminiClient;

use crate::models::{AnalysisReport, NetworkEvent, ThreatLevel};
use async_trait::async_trait;
use chrono::Utc;
use log::{error, info};
use std::sync::Arc;

/// Taille de lot de référence
pub const DEFAULT_BATCH_SIZE: usize = 15;

pub const EMPTY_ANALYSIS: &str = "No analysis could be generated.";
pub const SUCCESS_SUMMARY: &str = "Analysis Complete. See detailed report.";
pub const FAILURE_SUMMARY: &str = "Error connecting to AI Analysis Engine.";
pub const FAILURE_RECOMMENDATIONS: [&str; 2] = ["Check network connection", "Verify API Key"];

/// Fournisseur externe de génération de texte
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> anyhow::Result<String>;
}

/// Une ligne par événement, dans l'ordre attendu par l'analyste
pub fn format_log_line(event: &NetworkEvent) -> String {
    format!(
        "[{}] SRC:{} DEST:{} PROTO:{} SEVERITY:{} PAYLOAD:{}",
        event.timestamp(),
        event.source_address,
        event.destination_address,
        event.protocol,
        event.severity,
        event.payload
    )
}

pub fn format_batch(events: &[NetworkEvent]) -> String {
    events
        .iter()
        .map(format_log_line)
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn build_prompt(events: &[NetworkEvent]) -> String {
    format!(
        "Act as a Cyber Security Forensic Analyst.\n\
         Analyze the following IoT network traffic logs from a Smart Home system.\n\
         \n\
         Identify:\n\
         1. Potential intrusions or anomalies (Look for SQL injection, buffer overflows, unauthorized access attempts).\n\
         2. The severity of the threats.\n\
         3. Specific recommendations for mitigation.\n\
         \n\
         Format the output as a clean Markdown report with sections: 'Executive Summary', 'Threat Analysis', and 'Mitigation Steps'.\n\
         \n\
         Logs to analyze:\n{}\n",
        format_batch(events)
    )
}

/// HIGH dès que le texte mentionne « critical », quelle que soit la casse
pub fn threat_level_from_text(text: &str) -> ThreatLevel {
    if text.to_lowercase().contains("critical") {
        ThreatLevel::High
    } else {
        ThreatLevel::Moderate
    }
}

/// Rapport de repli en cas d'échec du fournisseur
pub fn fallback_report(error: &anyhow::Error) -> AnalysisReport {
    AnalysisReport {
        timestamp: Utc::now(),
        threat_level: ThreatLevel::Unknown,
        summary: FAILURE_SUMMARY.to_string(),
        recommendations: FAILURE_RECOMMENDATIONS.iter().map(|r| r.to_string()).collect(),
        raw_analysis: format!("Failed to generate report: {}", error),
    }
}

/// Analyste forensique: frontière avec le fournisseur externe
#[derive(Clone)]
pub struct ForensicAnalyst {
    generator: Arc<dyn TextGenerator>,
}

impl ForensicAnalyst {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    pub async fn analyze(&self, events: &[NetworkEvent]) -> AnalysisReport {
        let prompt = build_prompt(events);

        match self.generator.generate(&prompt).await {
            Ok(text) => {
                let text = if text.trim().is_empty() {
                    EMPTY_ANALYSIS.to_string()
                } else {
                    text
                };
                let report = AnalysisReport {
                    timestamp: Utc::now(),
                    threat_level: threat_level_from_text(&text),
                    summary: SUCCESS_SUMMARY.to_string(),
                    recommendations: Vec::new(),
                    raw_analysis: text,
                };
                info!(
                    "Rapport forensique généré sur {} événements ({:?})",
                    events.len(),
                    report.threat_level
                );
                report
            }
            Err(e) => {
                error!("Erreur d'analyse IA: {:#}", e);
                fallback_report(&e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedText(&'static str);

    #[async_trait]
    impl TextGenerator for FixedText {
        async fn generate(&self, _prompt: &str) -> anyhow::Result<String> {
            Ok(self.0.to_string())
        }
    }

    #[test]
    fn test_threat_level_from_text() {
        assert_eq!(threat_level_from_text("A CRITICAL issue"), ThreatLevel::High);
        assert_eq!(threat_level_from_text("Critically exposed"), ThreatLevel::High);
        assert_eq!(threat_level_from_text("all quiet"), ThreatLevel::Moderate);
    }

    #[tokio::test]
    async fn test_empty_analysis_is_replaced() {
        let analyst = ForensicAnalyst::new(Arc::new(FixedText("  ")));
        let report = analyst.analyze(&[]).await;

        assert_eq!(report.raw_analysis, EMPTY_ANALYSIS);
        assert_eq!(report.threat_level, ThreatLevel::Moderate);
        assert_eq!(report.summary, SUCCESS_SUMMARY);
        assert!(report.recommendations.is_empty());
    }

    #[tokio::test]
    async fn test_critical_mention_raises_threat_level() {
        let analyst = ForensicAnalyst::new(Arc::new(FixedText(
            "## Executive Summary\nOne critical intrusion attempt.",
        )));
        let report = analyst.analyze(&[]).await;
        assert_eq!(report.threat_level, ThreatLevel::High);
    }
}
