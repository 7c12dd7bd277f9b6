//! Fragment-and-variable prompt builder.
//!
//! Prompts are assembled from plain-text fragments appended in order and
//! joined with a blank line. `{{key}}` placeholders are substituted once at
//! [`build()`](PromptBuilder::build) time, after all fragments are joined.
//!
//! Substitution is single-pass: a value that itself contains `{{...}}` is
//! inserted verbatim and never re-expanded. A placeholder with no registered
//! value is an error, so half-filled text never reaches the LLM.

use std::collections::HashMap;

use crate::error::AppError;

const SEPARATOR: &str = "\n\n";

/// Fluent builder that assembles a prompt from text fragments.
///
/// ```rust
/// use prospect_pilot::prompt::PromptBuilder;
///
/// let text = PromptBuilder::new()
///     .append("Campaign: {{name}}")
///     .var("name", "Spring Push")
///     .build()
///     .unwrap();
/// assert_eq!(text, "Campaign: Spring Push");
/// ```
#[derive(Debug, Default)]
pub struct PromptBuilder {
    parts: Vec<String>,
    vars: HashMap<String, String>,
}

impl PromptBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a text fragment. Surrounding whitespace is trimmed and empty
    /// fragments are skipped.
    pub fn append(mut self, text: impl Into<String>) -> Self {
        let s = text.into();
        let trimmed = s.trim();
        if !trimmed.is_empty() {
            self.parts.push(trimmed.to_string());
        }
        self
    }

    /// Register `{{key}}` → `value` substitution pairs applied at build time.
    pub fn with_vars<'a, I>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        for (k, v) in vars {
            self.vars.insert(k.to_string(), v.to_string());
        }
        self
    }

    /// Register a single variable.
    pub fn var(mut self, key: &str, value: impl Into<String>) -> Self {
        self.vars.insert(key.to_string(), value.into());
        self
    }

    /// Join all fragments and substitute variables.
    pub fn build(self) -> Result<String, AppError> {
        let joined = self.parts.join(SEPARATOR);
        let mut out = String::with_capacity(joined.len());
        let mut rest = joined.as_str();

        while let Some(start) = rest.find("{{") {
            out.push_str(&rest[..start]);
            let after = &rest[start + 2..];
            let end = after.find("}}").ok_or_else(|| {
                AppError::InvalidParameters("unterminated '{{' in prompt template".into())
            })?;
            let key = after[..end].trim();
            let value = self.vars.get(key).ok_or_else(|| {
                AppError::InvalidParameters(format!("no value for prompt variable '{key}'"))
            })?;
            out.push_str(value);
            rest = &after[end + 2..];
        }
        out.push_str(rest);
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fragments_join_with_blank_line() {
        let result = PromptBuilder::new().append("  first ").append("").append("second").build().unwrap();
        assert_eq!(result, "first\n\nsecond");
    }

    #[test]
    fn substitutes_variables() {
        let result = PromptBuilder::new()
            .append("Items: {{items}} / {{ count }}")
            .with_vars([("items", "a\nb"), ("count", "2")])
            .build()
            .unwrap();
        assert_eq!(result, "Items: a\nb / 2");
    }

    #[test]
    fn values_are_not_re_expanded() {
        let result = PromptBuilder::new()
            .append("{{a}} | {{b}}")
            .var("a", "{{b}}")
            .var("b", "B")
            .build()
            .unwrap();
        assert_eq!(result, "{{b}} | B");
    }

    #[test]
    fn unknown_variable_is_error() {
        let err = PromptBuilder::new().append("Hi {{who}}").build().unwrap_err();
        assert!(err.to_string().contains("who"));
    }

    #[test]
    fn unterminated_placeholder_is_error() {
        assert!(PromptBuilder::new().append("Hi {{who").build().is_err());
    }
}
