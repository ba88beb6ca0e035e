use clara_core::Answer;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, instrument};

pub const DEFAULT_ENDPOINT: &str = "http://localhost:3000/consulta";

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Request to Clara failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("HTTP error: {0}")]
    Status(StatusCode),
}

#[derive(Serialize)]
struct QuestionBody<'a> {
    #[serde(rename = "perguntaUsuario")]
    pergunta_usuario: &'a str,
}

/// HTTP client for the `/consulta` endpoint
#[derive(Debug, Clone)]
pub struct ClaraClient {
    http: Client,
    endpoint: String,
}

impl ClaraClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Sends one question and decodes the answer. Any non-2xx status is an error.
    #[instrument(skip(self))]
    pub async fn ask(&self, question: &str) -> Result<Answer, ClientError> {
        let response = self
            .http
            .post(&self.endpoint)
            .json(&QuestionBody {
                pergunta_usuario: question,
            })
            .send()
            .await?;

        let status = response.status();
        debug!(%status, "Response received from Clara");
        if !status.is_success() {
            return Err(ClientError::Status(status));
        }

        Ok(response.json::<Answer>().await?)
    }
}
