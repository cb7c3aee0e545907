//! Scripted in-process transport for tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use super::{ChatTransport, Update};
use crate::error::{BotError, Result};

#[derive(Default)]
pub struct FakeTransport {
    batches: Mutex<VecDeque<Result<Vec<Update>>>>,
    offsets: Mutex<Vec<Option<i64>>>,
    sent: Mutex<Vec<(i64, String)>>,
    fail_sends: bool,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every send fails with a transport error
    pub fn failing_sends() -> Self {
        Self {
            fail_sends: true,
            ..Self::default()
        }
    }

    pub fn push_batch(&self, batch: Vec<Update>) {
        self.batches.lock().unwrap().push_back(Ok(batch));
    }

    pub fn push_error(&self, message: &str) {
        self.batches
            .lock()
            .unwrap()
            .push_back(Err(BotError::Transport(message.to_string())));
    }

    /// Offsets passed to each fetch, in call order
    pub fn offsets(&self) -> Vec<Option<i64>> {
        self.offsets.lock().unwrap().clone()
    }

    pub fn sent(&self) -> Vec<(i64, String)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatTransport for FakeTransport {
    async fn fetch_updates(&self, offset: Option<i64>) -> Result<Vec<Update>> {
        self.offsets.lock().unwrap().push(offset);
        // An exhausted script behaves like a long poll that timed out
        self.batches
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn send_text(&self, chat_id: i64, text: &str) -> Result<()> {
        self.sent.lock().unwrap().push((chat_id, text.to_string()));
        if self.fail_sends {
            return Err(BotError::Transport("send refused".to_string()));
        }
        Ok(())
    }
}
