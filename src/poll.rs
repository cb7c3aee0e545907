use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};

use crate::cursor::Cursor;
use crate::dispatch::Dispatcher;
use crate::error::Result;
use crate::platform::ChatTransport;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollState {
    /// Blocked in a long-poll fetch
    Polling,
    /// Waiting before the next fetch
    Idle,
}

/// fetch -> dispatch -> advance cursor -> sleep, forever.
pub struct PollLoop {
    transport: Arc<dyn ChatTransport>,
    dispatcher: Dispatcher,
    cursor: Cursor,
    idle_interval: Duration,
    state: PollState,
}

impl PollLoop {
    pub fn new(
        transport: Arc<dyn ChatTransport>,
        dispatcher: Dispatcher,
        idle_interval: Duration,
    ) -> Self {
        Self {
            transport,
            dispatcher,
            cursor: Cursor::new(),
            idle_interval,
            state: PollState::Polling,
        }
    }

    #[cfg(test)]
    pub fn state(&self) -> PollState {
        self.state
    }

    #[cfg(test)]
    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Perform exactly one transition and return the new state.
    pub async fn step(&mut self) -> Result<PollState> {
        self.state = match self.state {
            PollState::Polling => {
                let batch = self.transport.fetch_updates(self.cursor.offset()).await?;
                if !batch.is_empty() {
                    let report = self.dispatcher.dispatch(&batch).await?;
                    debug!(
                        "Handled {} update(s): {} departure(s), {} command(s), {} skipped, {} failed send(s)",
                        batch.len(),
                        report.departures,
                        report.commands,
                        report.skipped,
                        report.failed_sends
                    );
                }
                self.cursor.advance(&batch);
                PollState::Idle
            }
            PollState::Idle => {
                tokio::time::sleep(self.idle_interval).await;
                PollState::Polling
            }
        };
        Ok(self.state)
    }

    /// Run until a fetch or storage failure.
    pub async fn run(&mut self) -> Result<()> {
        info!("Polling for updates...");
        loop {
            self.step().await?;
        }
    }
}
