use clara_core::{build_prompt, parse_answer, Answer, GeminiResult, TextGenerator};
use tracing::{debug, info};

/// Answers a single question: builds the prompt, awaits one provider call and
/// parses the returned text. No retries; every call is independent.
pub async fn process_question(generator: &dyn TextGenerator, question: &str) -> GeminiResult<Answer> {
    let prompt = build_prompt(question);
    debug!(prompt_len = prompt.len(), "Constructed prompt");

    info!("Sending prompt to Gemini...");
    let response_text = generator.generate_text(&prompt).await?;
    info!(response_len = response_text.len(), "JSON response received from Gemini");

    parse_answer(&response_text)
}
