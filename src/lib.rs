//! SCT: Student Comment Toolkit
//!
//! Masks student names in CSV feedback data with pseudonymous tokens
//! before the data is sent to an LLM, and restores the real names
//! afterwards.

pub mod ai;
pub mod cli;
pub mod core;
pub mod memo;
