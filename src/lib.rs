#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::must_use_candidate
)]

pub mod chat;
pub mod completion;
pub mod config;
pub mod error;
pub mod executor;
pub mod registry;
pub mod schema;
pub mod ui;

pub use chat::ChatSession;
pub use completion::CompletionClient;
pub use config::Config;
pub use error::ChatError;
