//! AI-assisted code conversion between supported languages.

use std::sync::Arc;
use std::sync::OnceLock;

use codebin_core::error::{CodebinError, Result};
use codebin_core::generative::GenerativeBackend;
use codebin_core::language::Language;
use futures::future::join_all;
use regex::Regex;
use strum::IntoEnumIterator;

fn code_fence_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"```[A-Za-z]*\n?").expect("code fence regex"))
}

/// Removes surrounding Markdown code fences from a model reply.
///
/// Models often wrap the converted code in ```` ```lang ```` fences
/// even when asked not to; the fences are format noise, never code.
fn strip_code_fence(text: &str) -> String {
    code_fence_regex().replace_all(text, "").trim().to_string()
}

/// Use case for translating a buffer into other languages via the
/// generative backend.
///
/// Prompt construction lives here; the backend stays a dumb pipe.
pub struct ConverterService {
    backend: Arc<dyn GenerativeBackend>,
}

impl ConverterService {
    pub fn new(backend: Arc<dyn GenerativeBackend>) -> Self {
        Self { backend }
    }

    /// Converts `code` from one language to another.
    ///
    /// # Returns
    ///
    /// - `Ok(String)`: the converted code, fences stripped
    /// - `Err(Validation)`: source equals target, or either side is
    ///   markup rather than a programming language
    pub async fn convert(&self, code: &str, from: Language, to: Language) -> Result<String> {
        if !from.is_convertible() || !to.is_convertible() {
            return Err(CodebinError::validation(format!(
                "{} cannot be converted",
                if from.is_convertible() { to } else { from }
            )));
        }
        if from == to {
            return Err(CodebinError::validation(
                "source and target language are the same",
            ));
        }

        let prompt = format!(
            "Convert this {} code to {}. Return only the converted code:\n\n{}",
            from.display_name(),
            to.display_name(),
            code
        );

        let reply = self.backend.generate(&prompt).await?;
        Ok(strip_code_fence(&reply))
    }

    /// Converts `code` into every other convertible language
    /// concurrently, collecting a per-target outcome.
    ///
    /// One failed target does not abort the rest.
    pub async fn convert_all(
        &self,
        code: &str,
        from: Language,
    ) -> Vec<(Language, Result<String>)> {
        let targets: Vec<Language> = Language::iter()
            .filter(|l| l.is_convertible() && *l != from)
            .collect();

        let conversions = targets.iter().map(|to| self.convert(code, from, *to));
        let results = join_all(conversions).await;

        targets.into_iter().zip(results).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::ScriptedGenerativeBackend;

    #[test]
    fn test_strip_code_fence() {
        assert_eq!(
            strip_code_fence("```python\nprint(1)\n```"),
            "print(1)"
        );
        assert_eq!(strip_code_fence("```\nint x;\n```"), "int x;");
        assert_eq!(strip_code_fence("plain text"), "plain text");
    }

    #[tokio::test]
    async fn test_convert_builds_expected_prompt() {
        let backend = Arc::new(ScriptedGenerativeBackend::new(|_| {
            Ok("```java\nclass A {}\n```".to_string())
        }));
        let service = ConverterService::new(backend.clone());

        let converted = service
            .convert("print(1)", Language::Python, Language::Java)
            .await
            .unwrap();
        assert_eq!(converted, "class A {}");

        let prompts = backend.prompts();
        assert_eq!(
            prompts[0],
            "Convert this Python code to Java. Return only the converted code:\n\nprint(1)"
        );
    }

    #[tokio::test]
    async fn test_same_language_is_rejected() {
        let backend = Arc::new(ScriptedGenerativeBackend::new(|_| Ok(String::new())));
        let service = ConverterService::new(backend);

        let err = service
            .convert("print(1)", Language::Python, Language::Python)
            .await
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[tokio::test]
    async fn test_markup_is_not_convertible() {
        let backend = Arc::new(ScriptedGenerativeBackend::new(|_| Ok(String::new())));
        let service = ConverterService::new(backend.clone());

        let err = service
            .convert("<p>hi</p>", Language::Html, Language::Python)
            .await
            .unwrap_err();
        assert!(err.is_validation());
        // Rejected locally, no model call.
        assert!(backend.prompts().is_empty());
    }

    #[tokio::test]
    async fn test_convert_all_covers_every_other_language() {
        let backend = Arc::new(ScriptedGenerativeBackend::new(|_| Ok("done".to_string())));
        let service = ConverterService::new(backend);

        let outcomes = service.convert_all("print(1)", Language::Python).await;
        let mut targets: Vec<Language> = outcomes.iter().map(|(l, _)| *l).collect();
        targets.sort_by_key(|l| l.extension());

        assert_eq!(
            targets,
            vec![Language::C, Language::Cpp, Language::Java, Language::JavaScript]
        );
        assert!(outcomes.iter().all(|(_, r)| r.is_ok()));
    }

    #[tokio::test]
    async fn test_convert_all_keeps_per_target_failures() {
        let backend = Arc::new(ScriptedGenerativeBackend::new(|prompt| {
            if prompt.contains("to Java.") {
                Err(CodebinError::server(429, "quota exceeded"))
            } else {
                Ok("done".to_string())
            }
        }));
        let service = ConverterService::new(backend);

        let outcomes = service.convert_all("print(1)", Language::Python).await;
        for (target, result) in outcomes {
            if target == Language::Java {
                assert!(result.is_err());
            } else {
                assert_eq!(result.unwrap(), "done");
            }
        }
    }
}
