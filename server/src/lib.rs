//! Clara Query Service: a single `/consulta` route that asks Gemini for a
//! structured answer, plus the startup helpers around it.

pub mod config;
pub mod coordinator;
pub mod errors;
pub mod http_server;
pub mod port;

#[cfg(test)]
mod test_support;

pub use config::{ConfigLayer, ServiceConfig};
pub use errors::{ConfigError, ServerError};
pub use http_server::{build_router, run_server, serve, AppState};
