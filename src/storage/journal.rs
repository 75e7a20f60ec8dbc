use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tracing::{info, warn};

use crate::complaint::ComplaintEvent;

const JOURNAL_FILE: &str = "complaints.jsonl";

/// Append-only JSONL log of complaint events.
pub struct Journal {
    path: PathBuf,
}

impl Journal {
    pub async fn open(data_dir: &Path) -> Result<Self> {
        tokio::fs::create_dir_all(data_dir)
            .await
            .context("Failed to create data directory")?;

        let journal = Self {
            path: data_dir.join(JOURNAL_FILE),
        };
        journal.repair_torn_tail().await?;
        Ok(journal)
    }

    /// Drops a trailing partial line left by an interrupted append so the
    /// next event starts on its own line. That write was never acknowledged.
    async fn repair_torn_tail(&self) -> Result<()> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(e).context("Failed to read journal"),
        };

        if matches!(bytes.last(), None | Some(b'\n')) {
            return Ok(());
        }

        let keep = bytes
            .iter()
            .rposition(|b| *b == b'\n')
            .map(|pos| pos + 1)
            .unwrap_or(0);
        warn!(
            "Journal {} ends with a partial line, truncating {} bytes",
            self.path.display(),
            bytes.len() - keep
        );

        let file = tokio::fs::OpenOptions::new()
            .write(true)
            .open(&self.path)
            .await
            .context("Failed to open journal for repair")?;
        file.set_len(keep as u64)
            .await
            .context("Failed to truncate journal")?;
        file.sync_all().await.context("Failed to sync journal")?;

        Ok(())
    }

    /// Reads every event back in write order. Lines that do not parse are
    /// skipped.
    pub async fn replay(&self) -> Result<Vec<ComplaintEvent>> {
        let text = match tokio::fs::read_to_string(&self.path).await {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e).context("Failed to read journal"),
        };

        let mut events = Vec::new();
        for (lineno, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<ComplaintEvent>(line) {
                Ok(event) => events.push(event),
                Err(e) => warn!("Skipping journal line {}: {}", lineno + 1, e),
            }
        }

        info!("Replayed {} events from {}", events.len(), self.path.display());
        Ok(events)
    }

    pub async fn append(&self, event: &ComplaintEvent) -> Result<()> {
        let json = serde_json::to_string(event).context("Failed to serialize event")?;
        let line = format!("{}\n", json);

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .context("Failed to open journal")?;

        file.write_all(line.as_bytes())
            .await
            .context("Failed to write to journal")?;
        file.flush().await.context("Failed to flush journal")?;

        Ok(())
    }
}
