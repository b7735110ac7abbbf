//! Template engine for server-rendered pages using Jinja2 syntax.
//!
//! Templates are compiled into the binary and registered once in a
//! process-wide environment. Names ending in `.html` are auto-escaped.

use minijinja::{Environment, Value};
use serde::Serialize;
use std::sync::OnceLock;
use thiserror::Error;

/// Global template environment
static TEMPLATE_ENV: OnceLock<Environment<'static>> = OnceLock::new();

/// Embedded templates as (name, source)
const TEMPLATES: &[(&str, &str)] = &[(
    "dashboard/index.html",
    include_str!("../../templates/dashboard/index.html"),
)];

/// Errors that can occur during template operations
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Template '{0}' not found")]
    NotFound(String),

    #[error("Failed to render template: {0}")]
    RenderError(String),

    #[error("Failed to serialize template data: {0}")]
    Serialize(#[from] serde_json::Error),
}

fn init_environment() -> Environment<'static> {
    let mut env = Environment::new();

    for (name, source) in TEMPLATES {
        if let Err(e) = env.add_template(name, source) {
            tracing::warn!("Failed to load template {}: {}", name, e);
        } else {
            tracing::debug!("Loaded template: {}", name);
        }
    }

    env
}

fn get_environment() -> &'static Environment<'static> {
    TEMPLATE_ENV.get_or_init(init_environment)
}

/// Render a registered template with the given context.
pub fn render_template(template_name: &str, ctx: Value) -> Result<String, TemplateError> {
    let template = get_environment()
        .get_template(template_name)
        .map_err(|_| TemplateError::NotFound(template_name.to_string()))?;

    template
        .render(ctx)
        .map_err(|e| TemplateError::RenderError(e.to_string()))
}

/// Serialize a value as JSON that is safe to inline inside a `<script>` block.
pub fn script_json<T: Serialize>(value: &T) -> Result<String, TemplateError> {
    let json = serde_json::to_string(value)?;
    Ok(json
        .replace('<', "\\u003c")
        .replace('>', "\\u003e")
        .replace('&', "\\u0026"))
}

/// Escape text for inclusion in HTML snippets built outside templates (map popups).
pub fn escape_html(input: &str) -> String {
    minijinja::HtmlEscape(input).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_template() {
        let result = render_template("nonexistent.html", Value::UNDEFINED);
        assert!(matches!(result, Err(TemplateError::NotFound(_))));
    }

    #[test]
    fn test_script_json_escapes_closing_tags() {
        let json = script_json(&vec!["</script><b>"]).unwrap();
        assert!(!json.contains('<'));
        assert!(!json.contains('>'));
        let back: Vec<String> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, vec!["</script><b>".to_string()]);
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html("Cagar <Alam> & \"Co\""),
            "Cagar &lt;Alam&gt; &amp; &quot;Co&quot;"
        );
        assert_eq!(escape_html("Pak O'Neil"), "Pak O&#x27;Neil");
    }
}
