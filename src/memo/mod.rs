//! Memo module - message store with a pluggable persistence seam

pub mod store;

pub use store::{JsonFileStorage, MemoError, MemoStorage, Message, MessageStore};
