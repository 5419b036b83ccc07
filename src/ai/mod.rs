//! AI completion layer
//!
//! Prompt templating plus the provider clients that turn one student's
//! masked data into a generated comment. The core masking pipeline never
//! calls into this module; only the CLI does.

pub mod prompt;
pub mod provider;

pub use prompt::{mock_response, render_template, PromptConfig, StudentData};
pub use provider::{AiError, CompletionClient, Provider};
