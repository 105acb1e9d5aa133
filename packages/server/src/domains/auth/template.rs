//! OTP email template.
//!
//! Plain `{{key}}` placeholders substituted with HTML-escaped values. Any
//! placeholder left after substitution is a rendering error.

use thiserror::Error;

const BUILTIN_TEMPLATE: &str = include_str!("../../../templates/otp_email.html");

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("failed to read template {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("unresolved placeholder `{0}`")]
    Unresolved(String),
}

#[derive(Debug, Clone)]
pub struct OtpEmailTemplate {
    source: String,
}

impl OtpEmailTemplate {
    pub fn builtin() -> Self {
        Self::from_source(BUILTIN_TEMPLATE)
    }

    pub fn from_source(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }

    pub async fn load(path: &str) -> Result<Self, TemplateError> {
        let source = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| TemplateError::Read {
                path: path.to_string(),
                source,
            })?;
        Ok(Self::from_source(source))
    }

    pub fn render(&self, values: &[(&str, &str)]) -> Result<String, TemplateError> {
        let mut body = self.source.clone();
        for (key, value) in values {
            let placeholder = format!("{{{{{}}}}}", key);
            body = body.replace(&placeholder, &escape_html(value));
        }

        if let Some(start) = body.find("{{") {
            let rest = &body[start + 2..];
            let name = rest.split("}}").next().unwrap_or(rest).trim();
            return Err(TemplateError::Unresolved(name.to_string()));
        }

        Ok(body)
    }
}

fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_template_renders() {
        let html = OtpEmailTemplate::builtin()
            .render(&[
                ("otp", "482913"),
                ("name", "a@x.com"),
                ("platformName", "Chatdesk"),
                ("expiresInMinutes", "5"),
            ])
            .unwrap();

        assert!(html.contains("482913"));
        assert!(html.contains("Hi a@x.com"));
        assert!(html.contains("expires in 5 minutes"));
        assert!(!html.contains("{{"));
    }

    #[test]
    fn test_values_are_escaped() {
        let html = OtpEmailTemplate::from_source("<p>{{name}}</p>")
            .render(&[("name", "<b>&</b>")])
            .unwrap();
        assert_eq!(html, "<p>&lt;b&gt;&amp;&lt;/b&gt;</p>");
    }

    #[test]
    fn test_missing_value_is_an_error() {
        let result = OtpEmailTemplate::from_source("code: {{otp}} for {{ unknown }}")
            .render(&[("otp", "123456")]);

        match result {
            Err(TemplateError::Unresolved(name)) => assert_eq!(name, "unknown"),
            other => panic!("expected unresolved placeholder, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let result = OtpEmailTemplate::load("/nonexistent/otp_email.html").await;
        assert!(matches!(result, Err(TemplateError::Read { .. })));
    }
}
