//! Prompt templates for curriculum questions

use crate::preprocessing::Locale;
use crate::providers::vector_store::VectorSearchResult;

/// Prompt builder for RAG queries
pub struct PromptBuilder;

impl PromptBuilder {
    /// Join retrieved chunk texts, most similar first
    pub fn build_context(results: &[VectorSearchResult]) -> String {
        results
            .iter()
            .map(|r| r.chunk.content.as_str())
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Fixed reply when the context cannot support an answer
    pub fn insufficient_information(locale: Locale) -> &'static str {
        match locale {
            Locale::Portuguese => "Não encontrei informações suficientes no contexto.",
            Locale::English => "I could not find enough information in the context.",
        }
    }

    /// Build the grounded prompt, including the workload-sum instructions
    pub fn build_rag_prompt(locale: Locale, question: &str, context: &str) -> String {
        let fallback = Self::insufficient_information(locale);
        match locale {
            Locale::Portuguese => format!(
                r#"Você é **Ada**, assistente virtual do curso de **Tecnologia em Sistemas para Internet da UFSM**.
Responda apenas com base no contexto fornecido.
Se não houver informação suficiente, diga:
"{fallback}"

**IMPORTANTE sobre cálculos de carga horária:**
- Se a pergunta for sobre carga horária TOTAL do curso, você DEVE somar:
  * Carga horária do currículo fixo (conteúdos)
  * Carga horária mínima de DCG (Disciplinas Complementares de Graduação)
  * Carga horária mínima de ACG (Atividades Complementares de Graduação)
  * Carga horária mínima de ACEx (Atividades Complementares de Extensão)
- Mostre o cálculo detalhado da soma
- Sempre verifique se há informações de resumo de carga horária no contexto

Contexto:
{context}

Pergunta: {question}"#,
                fallback = fallback,
                context = context,
                question = question
            ),
            Locale::English => format!(
                r#"You are **Ada**, the virtual assistant of the **Internet Systems Technology program at UFSM**.
Answer only from the context provided.
If there is not enough information, say:
"{fallback}"

**IMPORTANT about course load calculations:**
- If the question is about the TOTAL course load, you MUST add up:
  * Course load of the fixed curriculum (contents)
  * Minimum course load of DCG (Complementary Graduation Disciplines)
  * Minimum course load of ACG (Complementary Graduation Activities)
  * Minimum course load of ACEx (Complementary Extension Activities)
- Show the detailed calculation of the sum
- Always check whether the context contains a course load summary

Context:
{context}

Question: {question}"#,
                fallback = fallback,
                context = context,
                question = question
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Chunk, Document};
    use crate::preprocessing::Tags;

    fn result(doc: &Document, content: &str, similarity: f32) -> VectorSearchResult {
        VectorSearchResult {
            chunk: Chunk::new(doc, content.to_string(), 0, &Tags::new()),
            similarity,
        }
    }

    #[test]
    fn test_context_joins_with_blank_line() {
        let doc = Document::new("a.pdf".to_string(), "h".to_string(), 1);
        let results = vec![result(&doc, "primeiro", 0.9), result(&doc, "segundo", 0.8)];
        assert_eq!(PromptBuilder::build_context(&results), "primeiro\n\nsegundo");
        assert_eq!(PromptBuilder::build_context(&[]), "");
    }

    #[test]
    fn test_prompt_contains_context_and_question() {
        let prompt = PromptBuilder::build_rag_prompt(
            Locale::Portuguese,
            "Qual a carga horária total?",
            "Cálculo: 2400 + 60 + 0 + 0 = 2460 horas",
        );
        assert!(prompt.contains("Contexto:\nCálculo: 2400 + 60 + 0 + 0 = 2460 horas"));
        assert!(prompt.ends_with("Pergunta: Qual a carga horária total?"));
        assert!(prompt.contains("Não encontrei informações suficientes no contexto."));
        assert!(prompt.contains("ACEx"));
    }

    #[test]
    fn test_english_prompt() {
        let prompt = PromptBuilder::build_rag_prompt(Locale::English, "Total load?", "ctx");
        assert!(prompt.contains("I could not find enough information in the context."));
        assert!(prompt.ends_with("Question: Total load?"));
    }
}
