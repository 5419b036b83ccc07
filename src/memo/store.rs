//! Message store for quick memos
//!
//! A single store behind a storage trait: the host environment supplies
//! persistence (here a JSON file; originally a browser key-value store)
//! and rendering. Messages are addressed by index, like the list they
//! are shown in.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Errors from memo storage and editing
#[derive(Debug, Error)]
pub enum MemoError {
    #[error("No message at index {0}")]
    IndexOutOfRange(usize),

    #[error("Malformed memo file: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// One stored memo message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    pub fn new(text: impl Into<String>) -> Self {
        Message {
            text: text.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Persistence seam: load/save the whole message list as one blob
pub trait MemoStorage {
    fn load(&self) -> Result<Vec<Message>, MemoError>;
    fn save(&self, messages: &[Message]) -> Result<(), MemoError>;
}

/// JSON-file-backed storage
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFileStorage { path: path.into() }
    }
}

impl MemoStorage for JsonFileStorage {
    fn load(&self) -> Result<Vec<Message>, MemoError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let content = std::fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&content)?)
    }

    fn save(&self, messages: &[Message]) -> Result<(), MemoError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let content = serde_json::to_string_pretty(messages)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }
}

/// In-memory message list with CRUD operations
#[derive(Debug, Default)]
pub struct MessageStore {
    messages: Vec<Message>,
}

impl MessageStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load_from(storage: &dyn MemoStorage) -> Result<Self, MemoError> {
        Ok(MessageStore {
            messages: storage.load()?,
        })
    }

    pub fn save_to(&self, storage: &dyn MemoStorage) -> Result<(), MemoError> {
        storage.save(&self.messages)
    }

    /// Append a message, returning its index.
    pub fn add(&mut self, text: impl Into<String>) -> usize {
        self.messages.push(Message::new(text));
        self.messages.len() - 1
    }

    /// Replace the text of an existing message; the timestamp is kept.
    pub fn edit(&mut self, index: usize, text: impl Into<String>) -> Result<(), MemoError> {
        let message = self
            .messages
            .get_mut(index)
            .ok_or(MemoError::IndexOutOfRange(index))?;
        message.text = text.into();
        Ok(())
    }

    /// Remove and return a message.
    pub fn delete(&mut self, index: usize) -> Result<Message, MemoError> {
        if index >= self.messages.len() {
            return Err(MemoError::IndexOutOfRange(index));
        }
        Ok(self.messages.remove(index))
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn get(&self, index: usize) -> Option<&Message> {
        self.messages.get(index)
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
