/// Builds the prompt for a user question.
///
/// Fixes the "Clara" persona and demands a JSON object with exactly the keys
/// `titulo`, `resumo` and `recomendacao`. The question is interpolated as-is.
pub fn build_prompt(question: &str) -> String {
    format!(
        "Você é uma assistente chamada Clara. Sua tarefa é responder à pergunta do usuário.\n\
         Sua resposta DEVE ser um objeto JSON válido contendo três chaves: \"titulo\", \"resumo\" e \"recomendacao\".\n\
         Não inclua nenhum texto ou formatação fora do objeto JSON.\n\
         \n\
         Pergunta do usuário: \"{question}\"\n"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_is_deterministic() {
        assert_eq!(build_prompt("Qual a capital?"), build_prompt("Qual a capital?"));
    }

    #[test]
    fn test_prompt_contents() {
        let prompt = build_prompt("Como faço \"café\"?");
        assert!(prompt.starts_with("Você é uma assistente chamada Clara."));
        for key in ["\"titulo\"", "\"resumo\"", "\"recomendacao\""] {
            assert!(prompt.contains(key), "missing {key}");
        }
        assert!(prompt.contains("Pergunta do usuário: \"Como faço \"café\"?\""));
    }
}
