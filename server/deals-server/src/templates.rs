//! Handlebars template engine for the page handlers.
//!
//! Templates are embedded at compile time and registered once at
//! startup, so the binary needs no template directory on disk. Every
//! rendered response carries the producing template's name in the
//! `x-template` header.

use axum::http::{HeaderName, HeaderValue};
use axum::response::{Html, IntoResponse, Response};
use handlebars::Handlebars;
use serde::Serialize;
use std::sync::Arc;

use crate::error::ApiError;

pub const HOME: &str = "deals/home.html";
pub const TASK_ADDED: &str = "deals/added.html";
pub const TASK_LIST: &str = "deals/task_list.html";
pub const TASK_DETAIL: &str = "deals/task_detail.html";

/// Response header naming the template that produced the page.
pub const TEMPLATE_HEADER: &str = "x-template";

#[derive(Clone)]
pub struct TemplateEngine {
    registry: Arc<Handlebars<'static>>,
}

impl TemplateEngine {
    pub fn new() -> Result<Self, ApiError> {
        let mut registry = Handlebars::new();

        let sources: &[(&str, &str)] = &[
            (HOME, include_str!("../templates/deals/home.html")),
            (TASK_ADDED, include_str!("../templates/deals/added.html")),
            (TASK_LIST, include_str!("../templates/deals/task_list.html")),
            (
                TASK_DETAIL,
                include_str!("../templates/deals/task_detail.html"),
            ),
        ];

        for (name, source) in sources {
            registry
                .register_template_string(name, source)
                .map_err(|e| ApiError::template(format!("Failed to register {name}: {e}")))?;
        }

        Ok(Self {
            registry: Arc::new(registry),
        })
    }

    /// Render a registered template into an HTML response.
    pub fn render<T: Serialize>(&self, template: &str, context: &T) -> Result<Response, ApiError> {
        let body = self
            .registry
            .render(template, context)
            .map_err(|e| ApiError::template(format!("Failed to render {template}: {e}")))?;

        let mut response = Html(body).into_response();
        let value = HeaderValue::from_str(template)
            .map_err(|e| ApiError::internal(format!("Invalid template name {template}: {e}")))?;
        response
            .headers_mut()
            .insert(HeaderName::from_static(TEMPLATE_HEADER), value);

        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms;

    #[test]
    fn all_page_templates_register() {
        TemplateEngine::new().unwrap();
    }

    #[test]
    fn render_sets_template_header_and_content_type() {
        let engine = TemplateEngine::new().unwrap();
        let context = serde_json::json!({ "form": forms::task_form() });

        let response = engine.render(HOME, &context).unwrap();
        assert_eq!(
            response
                .headers()
                .get(TEMPLATE_HEADER)
                .and_then(|v| v.to_str().ok()),
            Some(HOME)
        );
        assert!(response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .starts_with("text/html"));
    }

    #[test]
    fn unknown_template_is_a_template_error() {
        let engine = TemplateEngine::new().unwrap();
        let err = engine
            .render("deals/missing.html", &serde_json::json!({}))
            .unwrap_err();
        assert_eq!(err.error_type(), "template_error");
    }
}
