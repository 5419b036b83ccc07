//! CLI command implementations

pub mod utils;

pub mod completions;
pub mod generate;
pub mod inspect;
pub mod mask;
pub mod memo;
pub mod unmask;
