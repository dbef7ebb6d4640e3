//! Request types

use serde::{Deserialize, Serialize};

/// Body of `POST /ask`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskRequest {
    /// The student's question
    pub prompt: String,
}

impl AskRequest {
    /// Question with surrounding whitespace removed
    pub fn question(&self) -> &str {
        self.prompt.trim()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_prompt() {
        let req: AskRequest =
            serde_json::from_str(r#"{"prompt": "  Qual a carga horária total?  "}"#).unwrap();
        assert_eq!(req.question(), "Qual a carga horária total?");
    }
}
