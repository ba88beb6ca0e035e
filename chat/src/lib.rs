//! Chat client for Clara: session state machine, pure rendering and the
//! HTTP client that talks to the Query Service.

pub mod api_client;
pub mod app;
pub mod output;
pub mod render;
pub mod session;

pub use api_client::{ClaraClient, ClientError, DEFAULT_ENDPOINT};
pub use render::{render, render_answer, Block, Display};
pub use session::{ChatMessage, ChatSession, Key, Phase, Role};
