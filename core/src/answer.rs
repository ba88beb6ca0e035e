//! The structured answer Clara returns for every question.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::{GeminiError, GeminiResult};

/// Answer produced by the model: title, summary and recommendation.
///
/// Every field is optional; absent fields are left out of the JSON.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub titulo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resumo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recomendacao: Option<String>,
}

impl Answer {
    pub fn new(
        titulo: impl Into<String>,
        resumo: impl Into<String>,
        recomendacao: impl Into<String>,
    ) -> Self {
        Self {
            titulo: Some(titulo.into()),
            resumo: Some(resumo.into()),
            recomendacao: Some(recomendacao.into()),
        }
    }

    /// Fallback sent by the service whenever the provider call or parsing fails.
    pub fn internal_error() -> Self {
        Self::new(
            "Erro Interno",
            "Desculpe, ocorreu um erro inesperado ao tentar processar sua pergunta.",
            "Por favor, tente novamente mais tarde.",
        )
    }

    /// Shown by the chat client when the request to the service fails.
    pub fn client_error() -> Self {
        Self::new(
            "Erro",
            "Desculpe, ocorreu um erro ao processar sua pergunta. Tente novamente.",
            "Verifique sua conexão e tente novamente.",
        )
    }

    pub fn is_empty(&self) -> bool {
        self.titulo.is_none() && self.resumo.is_none() && self.recomendacao.is_none()
    }
}

/// Parses the model's text output into an [`Answer`].
///
/// The text must hold a single JSON object, optionally wrapped in a markdown
/// code fence. Unknown keys are dropped; non-string values are rejected.
pub fn parse_answer(text: &str) -> GeminiResult<Answer> {
    let value: Value = serde_json::from_str(strip_code_fence(text))?;
    if !value.is_object() {
        return Err(GeminiError::ParsingError(format!(
            "Expected a JSON object from the model, got {}",
            json_kind(&value)
        )));
    }
    Ok(serde_json::from_value(value)?)
}

fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string ("json") up to the first newline.
    let body = rest.split_once('\n').map_or("", |(_, body)| body);
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
