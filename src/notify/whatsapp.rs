use anyhow::{Context, Result};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};

use crate::complaint::{Complaint, ComplaintEvent};
use crate::config::WhatsAppConfig;

const DIVIDER: &str = "━━━━━━━━━━━━━━━━━━";

/// Sends reporter notifications through a Fonnte-compatible WhatsApp gateway.
pub struct WhatsAppNotifier {
    client: Client,
    base_url: String,
    country_code: String,
    token: Option<String>,
}

#[derive(Deserialize)]
struct GatewayResponse {
    #[serde(default)]
    status: bool,
    #[serde(default)]
    reason: Option<String>,
}

impl WhatsAppNotifier {
    pub fn new(config: &WhatsAppConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to build WhatsApp HTTP client")?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            country_code: config.country_code.clone(),
            token: config.token.clone(),
        })
    }

    pub async fn run(self, mut rx: broadcast::Receiver<ComplaintEvent>) -> Result<()> {
        if self.token.is_none() {
            warn!("WHATSAPP_TOKEN not set, reporter notifications will be skipped");
        }
        info!("WhatsApp notifier started");

        loop {
            match rx.recv().await {
                Ok(event) => self.handle(&event).await,
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    warn!("Notifier lagged, skipped {} events", n);
                }
                Err(broadcast::error::RecvError::Closed) => {
                    info!("Event channel closed, notifier stopping");
                    break;
                }
            }
        }

        Ok(())
    }

    async fn handle(&self, event: &ComplaintEvent) {
        let complaint = event.complaint();
        let Some(phone) = complaint.phone.as_deref() else {
            debug!("Complaint {} has no phone number, not notifying", complaint.id);
            return;
        };

        let message = match event {
            ComplaintEvent::Created { complaint } => received_message(complaint),
            ComplaintEvent::StatusUpdated { complaint } => status_message(complaint),
        };

        if let Err(e) = self.send(phone, &message).await {
            error!("Failed to notify reporter of {}: {:#}", complaint.id, e);
        }
    }

    async fn send(&self, phone: &str, message: &str) -> Result<()> {
        let Some(token) = &self.token else {
            debug!("WhatsApp token not configured, message not sent");
            return Ok(());
        };

        let target = normalize_phone(phone, &self.country_code);
        let response = self
            .client
            .post(&self.base_url)
            .header("Authorization", token)
            .form(&[
                ("target", target.as_str()),
                ("message", message),
                ("countryCode", self.country_code.as_str()),
            ])
            .send()
            .await
            .context("WhatsApp gateway request failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("WhatsApp gateway returned {}: {}", status, body);
        }

        let result: GatewayResponse = response
            .json()
            .await
            .context("Failed to parse WhatsApp gateway response")?;
        if !result.status {
            anyhow::bail!(
                "WhatsApp gateway rejected message: {}",
                result.reason.unwrap_or_default()
            );
        }

        info!("WhatsApp sent to {}", target);
        Ok(())
    }
}

/// Local numbers (`08..`) become `628..`; anything not already carrying the
/// country code gets it prefixed.
pub fn normalize_phone(phone: &str, country_code: &str) -> String {
    let phone = phone.trim();
    if let Some(rest) = phone.strip_prefix('0') {
        format!("{}{}", country_code, rest)
    } else if phone.starts_with(country_code) {
        phone.to_string()
    } else {
        format!("{}{}", country_code, phone)
    }
}

pub fn received_message(c: &Complaint) -> String {
    format!(
        "*TANGGAP MEDAN*\n{DIVIDER}\nPengaduan Anda telah kami terima!\n\n\
         ID Laporan: {}\nKategori: {}\nLokasi: {}\nPrioritas: {}\nSentimen: {}\n\n\
         Status pengaduan Anda akan kami update melalui WhatsApp ini.\n\n\
         Terima kasih telah menggunakan layanan Tanggap Medan.\n{DIVIDER}",
        c.id, c.category, c.location, c.priority, c.sentiment,
    )
}

pub fn status_message(c: &Complaint) -> String {
    let notes = c
        .admin_notes
        .as_deref()
        .map(|n| format!("Catatan Admin: {}\n\n", n))
        .unwrap_or_default();

    format!(
        "*TANGGAP MEDAN - UPDATE STATUS*\n{DIVIDER}\nID Laporan: {}\n\n\
         Status Baru: {}\n\n{}Terima kasih atas kesabaran Anda.\n{DIVIDER}",
        c.id,
        c.status.notice(),
        notes,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::classify;
    use crate::complaint::{NewComplaint, Status};
    use chrono::Utc;

    fn complaint() -> Complaint {
        let text = "banjir setinggi lutut di jalan";
        Complaint::new(
            "TG-2025-0042".to_string(),
            NewComplaint {
                name: "Andi".to_string(),
                phone: Some("081234567890".to_string()),
                email: None,
                category: "Drainase".to_string(),
                location: "Medan Baru".to_string(),
                description: text.to_string(),
            },
            classify(text),
            Utc::now(),
        )
    }

    #[test]
    fn phone_numbers_get_country_code() {
        assert_eq!(normalize_phone("081234567890", "62"), "6281234567890");
        assert_eq!(normalize_phone(" 6281234567890 ", "62"), "6281234567890");
        assert_eq!(normalize_phone("81234567890", "62"), "6281234567890");
    }

    #[test]
    fn received_message_lists_classification() {
        let msg = received_message(&complaint());
        assert!(msg.contains("ID Laporan: TG-2025-0042"));
        assert!(msg.contains("Prioritas: Tinggi"));
        assert!(msg.contains("Sentimen: Tidak Diketahui"));
    }

    #[test]
    fn status_message_includes_notes_only_when_present() {
        let mut c = complaint();
        c.update_status(Status::InProgress, None, Utc::now());
        let msg = status_message(&c);
        assert!(msg.contains("Status Baru: Sedang Diproses"));
        assert!(!msg.contains("Catatan Admin"));

        c.update_status(Status::Resolved, Some("saluran sudah dibersihkan".to_string()), Utc::now());
        let msg = status_message(&c);
        assert!(msg.contains("Status Baru: Telah Selesai"));
        assert!(msg.contains("Catatan Admin: saluran sudah dibersihkan"));
    }

    #[tokio::test]
    async fn send_without_token_is_a_no_op() {
        let notifier = WhatsAppNotifier::new(&WhatsAppConfig {
            base_url: "http://127.0.0.1:1/send".to_string(),
            country_code: "62".to_string(),
            timeout_secs: 1,
            token: None,
        })
        .unwrap();
        notifier.send("0811", "halo").await.unwrap();
    }
}
