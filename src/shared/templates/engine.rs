//! Template engine for outgoing messages using Jinja2 syntax.
//!
//! Templates are compiled into the binary and registered once under
//! `<name>_<locale>.jinja`, so rendering never touches the filesystem.

use minijinja::{Environment, Value};
use std::collections::HashMap;
use std::sync::OnceLock;
use thiserror::Error;

use crate::shared::i18n::Locale;

/// Global template environment
static TEMPLATE_ENV: OnceLock<Environment<'static>> = OnceLock::new();

const TEMPLATES: &[(&str, &str)] = &[
    (
        "emails/customer_link_en.jinja",
        include_str!("../../../templates/emails/customer_link_en.jinja"),
    ),
    (
        "emails/customer_link_de.jinja",
        include_str!("../../../templates/emails/customer_link_de.jinja"),
    ),
];

/// Errors that can occur during template operations
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Template '{0}' not found")]
    NotFound(String),

    #[error("Failed to render template: {0}")]
    RenderError(String),
}

fn init_environment() -> Environment<'static> {
    let mut env = Environment::new();

    for &(name, source) in TEMPLATES {
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

/// Render the localized variant of a template.
///
/// `name` is the path without locale suffix, e.g. `emails/customer_link`.
pub fn render_localized(
    name: &str,
    locale: Locale,
    ctx: &HashMap<&str, Value>,
) -> Result<String, TemplateError> {
    let template_name = format!("{}_{}.jinja", name, locale.code());
    let template = get_environment()
        .get_template(&template_name)
        .map_err(|_| TemplateError::NotFound(template_name.clone()))?;

    let render_ctx = Value::from_iter(ctx.iter().map(|(k, v)| (*k, v.clone())));

    template
        .render(render_ctx)
        .map_err(|e| TemplateError::RenderError(e.to_string()))
}

/// List all available templates
#[cfg(test)]
pub fn list_templates() -> Vec<String> {
    get_environment()
        .templates()
        .map(|(name, _)| name.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context(count: usize) -> HashMap<&'static str, Value> {
        let mut ctx = HashMap::new();
        ctx.insert("customer_name", Value::from("Acme Corp"));
        ctx.insert("report_title", Value::from("Annual Safety Inspection Report"));
        ctx.insert("location_name", Value::from("Vienna Central"));
        ctx.insert("suggestion_count", Value::from(count));
        ctx.insert("link_url", Value::from("http://localhost/customer-report/1?token=abc"));
        ctx.insert("expires_at", Value::from("2026-11-01"));
        ctx.insert("sender_name", Value::from("Demo User"));
        ctx
    }

    #[test]
    fn test_all_templates_registered() {
        let templates = list_templates();
        assert!(templates.contains(&"emails/customer_link_en.jinja".to_string()));
        assert!(templates.contains(&"emails/customer_link_de.jinja".to_string()));
    }

    #[test]
    fn test_render_english_plural() {
        let body = render_localized("emails/customer_link", Locale::En, &context(3)).unwrap();
        assert!(body.contains("Dear Acme Corp"));
        assert!(body.contains("3 recommendations"));
        assert!(body.contains("token=abc"));
    }

    #[test]
    fn test_render_german_singular() {
        let body = render_localized("emails/customer_link", Locale::De, &context(1)).unwrap();
        assert!(body.contains("1 Empfehlung."));
        assert!(body.contains("Vienna Central"));
    }

    #[test]
    fn test_missing_template() {
        let result = render_localized("emails/unknown", Locale::En, &HashMap::new());
        assert!(matches!(result, Err(TemplateError::NotFound(_))));
    }
}
