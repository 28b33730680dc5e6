// crates/prompter/src/lib.rs

//! The `prompter` command: parses the command line, resolves configuration,
//! collects content and delivers the generated prompt.

pub mod app;
pub mod cli;
pub mod context;
pub mod generator;
pub mod interactive;
pub mod request;

pub use app::{run, AppIo};
pub use generator::PromptGenerator;
pub use request::PromptRequest;
