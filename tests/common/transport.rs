//! Recording mock of the messaging transport

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard};

use linkvault::telegram::{CopyOptions, LinkButton, Transport, TransportError};

/// One outbound call, successful or not
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sent {
    Message {
        user_id: i64,
        text: String,
        button: Option<LinkButton>,
    },
    Copy {
        from_chat: i64,
        message_id: i32,
        to_user: i64,
        options: CopyOptions,
    },
}

impl Sent {
    pub fn user_id(&self) -> i64 {
        match self {
            Sent::Message { user_id, .. } => *user_id,
            Sent::Copy { to_user, .. } => *to_user,
        }
    }
}

/// Records every call; failures scripted per user are returned in order, then calls succeed
#[derive(Default)]
pub struct RecordingTransport {
    calls: Mutex<Vec<Sent>>,
    failures: Mutex<HashMap<i64, VecDeque<TransportError>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues `error` for the next call addressed to `user_id`
    pub fn fail_next(&self, user_id: i64, error: TransportError) {
        lock(&self.failures).entry(user_id).or_default().push_back(error);
    }

    pub fn calls(&self) -> Vec<Sent> {
        lock(&self.calls).clone()
    }

    pub fn calls_to(&self, user_id: i64) -> Vec<Sent> {
        self.calls().into_iter().filter(|c| c.user_id() == user_id).collect()
    }

    /// Texts of the messages sent to `user_id`
    pub fn texts_to(&self, user_id: i64) -> Vec<String> {
        self.calls_to(user_id)
            .into_iter()
            .filter_map(|c| match c {
                Sent::Message { text, .. } => Some(text),
                Sent::Copy { .. } => None,
            })
            .collect()
    }

    /// Button of the last message sent to `user_id`
    pub fn last_button_to(&self, user_id: i64) -> Option<LinkButton> {
        self.calls_to(user_id).into_iter().rev().find_map(|c| match c {
            Sent::Message { button, .. } => button,
            Sent::Copy { .. } => None,
        })
    }

    pub fn copied_ids_to(&self, user_id: i64) -> Vec<i32> {
        self.calls_to(user_id)
            .into_iter()
            .filter_map(|c| match c {
                Sent::Copy { message_id, .. } => Some(message_id),
                Sent::Message { .. } => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        lock(&self.calls).clear();
    }

    fn record(&self, call: Sent) -> Result<(), TransportError> {
        let user_id = call.user_id();
        lock(&self.calls).push(call);
        match lock(&self.failures).get_mut(&user_id).and_then(VecDeque::pop_front) {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn send_message(&self, user_id: i64, text: &str, button: Option<LinkButton>) -> Result<(), TransportError> {
        self.record(Sent::Message {
            user_id,
            text: text.to_string(),
            button,
        })
    }

    async fn copy_message(
        &self,
        from_chat: i64,
        message_id: i32,
        to_user: i64,
        options: CopyOptions,
    ) -> Result<(), TransportError> {
        self.record(Sent::Copy {
            from_chat,
            message_id,
            to_user,
            options,
        })
    }
}
