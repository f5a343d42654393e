//! Watchtower audit subscriber
//!
//! Appends one CSV row per transition to an audit file. The issue columns
//! come from the notification itself. A record's transitions arrive in
//! sequence order, so remembering the highest sequence written per event id
//! is enough to skip a redelivered copy.

use async_trait::async_trait;
use ripple_ledger::{RippleLedger, RippleNotification, WATCHTOWER_HEADER};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::error::BusError;
use crate::subscriber::NotificationSubscriber;

pub struct WatchtowerSubscriber {
    ledger: Arc<RippleLedger>,
    path: PathBuf,
    /// Highest sequence written, per event id
    written: Mutex<HashMap<String, u64>>,
}

impl WatchtowerSubscriber {
    pub fn new(ledger: Arc<RippleLedger>, path: impl AsRef<Path>) -> Self {
        Self {
            ledger,
            path: path.as_ref().to_path_buf(),
            written: Mutex::new(HashMap::new()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn header_line() -> Result<String, BusError> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    writer.write_record(WATCHTOWER_HEADER)?;
    let bytes = writer
        .into_inner()
        .map_err(|e| BusError::Io(e.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[async_trait]
impl NotificationSubscriber for WatchtowerSubscriber {
    fn name(&self) -> &str {
        "watchtower"
    }

    async fn handle(&self, notification: &RippleNotification) -> Result<(), BusError> {
        let event_id = notification.event_id();
        let sequence = notification.sequence();

        // Held across the append so rows never interleave
        let mut written = self.written.lock().await;
        if written.get(event_id).is_some_and(|last| sequence <= *last) {
            tracing::debug!(event_id, sequence, "Watchtower row already written");
            return Ok(());
        }

        let row = self.ledger.transition_row(notification)?;
        let mut content = String::new();
        let is_new = match tokio::fs::metadata(&self.path).await {
            Ok(meta) => meta.len() == 0,
            Err(_) => true,
        };
        if is_new {
            content.push_str(&header_line()?);
        }
        content.push_str(&row.to_csv_line()?);
        content.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(content.as_bytes()).await?;
        file.flush().await?;

        tracing::info!(
            kind = notification.kind(),
            event_id,
            sequence,
            severity = row.severity,
            "Watchtower row appended"
        );
        written.insert(event_id.to_string(), sequence);
        Ok(())
    }
}
