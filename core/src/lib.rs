// Core Gemini API functionality shared by the Clara service and chat client

// Export client module - API client for Gemini
pub mod client;
pub use client::*;

// Export types module - Request/response data structures
pub mod types;
pub use types::*;

// Export config module - Gemini client configuration
pub mod config;
pub use config::*;

// Export errors module - Shared error types
pub mod errors;
pub use errors::*;

// Export answer module - The structured answer exchanged over HTTP
pub mod answer;
pub use answer::{parse_answer, Answer};

// Export prompt module - Prompt template sent to the model
pub mod prompt;
pub use prompt::build_prompt;
