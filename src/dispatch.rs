use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::commands;
use crate::error::Result;
use crate::platform::{ChatTransport, Update, UpdateKind};
use crate::state::ChatStateStore;

/// What happened to one batch
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DispatchReport {
    pub departures: usize,
    pub commands: usize,
    pub skipped: usize,
    pub failed_sends: usize,
}

/// Routes each update of a batch to its handler.
pub struct Dispatcher {
    transport: Arc<dyn ChatTransport>,
    store: ChatStateStore,
}

pub fn departure_announcement(name: &str) -> String {
    format!("{} has left from chat", name)
}

impl Dispatcher {
    pub fn new(transport: Arc<dyn ChatTransport>, store: ChatStateStore) -> Self {
        Self { transport, store }
    }

    /// Handle a batch in arrival order. Only storage failures are returned;
    /// failed sends are logged and counted.
    pub async fn dispatch(&self, batch: &[Update]) -> Result<DispatchReport> {
        let mut report = DispatchReport::default();

        for update in batch {
            match &update.kind {
                UpdateKind::Departure { chat_id, name } => {
                    info!("{} left chat {}", name, chat_id);
                    self.store.record_departure(*chat_id, name).await?;
                    self.send(*chat_id, &departure_announcement(name), &mut report)
                        .await;
                    report.departures += 1;
                }
                UpdateKind::Text { chat_id, text } if text.starts_with('/') => {
                    debug!("Command in chat {}: {}", chat_id, text);
                    let reply = commands::process(text, *chat_id, &self.store).await?;
                    self.send(*chat_id, &reply, &mut report).await;
                    report.commands += 1;
                }
                UpdateKind::Edited { chat_id } => {
                    debug!("Ignoring edited message {} in chat {}", update.id, chat_id);
                    report.skipped += 1;
                }
                UpdateKind::Text { .. } | UpdateKind::Unrecognized => {
                    report.skipped += 1;
                }
            }
        }

        Ok(report)
    }

    async fn send(&self, chat_id: i64, text: &str, report: &mut DispatchReport) {
        if let Err(e) = self.transport.send_text(chat_id, text).await {
            warn!("Failed to send message to chat {}: {}", chat_id, e);
            report.failed_sends += 1;
        }
    }
}
