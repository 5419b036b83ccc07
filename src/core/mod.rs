//! Core module - the CSV masking pipeline

pub mod classify;
pub mod config;
pub mod mask;
pub mod normalize;
pub mod table;
pub mod unmask;

pub use classify::{classify, Classification};
pub use config::Config;
pub use mask::{mask, MaskPair, MaskingSession};
pub use normalize::{normalize, StudentRecord};
pub use table::Table;
pub use unmask::{unmask_table, unmask_text};
