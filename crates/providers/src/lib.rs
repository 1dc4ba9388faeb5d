//! Model client implementations for thinkact.
//!
//! All clients implement the `thinkact_core::ModelClient` trait.
//! [`build_from_config`] selects and configures one from `AppConfig`.

pub mod builder;
pub mod openai_compat;

pub use builder::build_from_config;
pub use openai_compat::OpenAiCompatClient;
