use handlebars::Handlebars;
use serde_json::json;
use thiserror::Error;

use crate::i18n::Locale;
use crate::render::ReportDocument;

const PRINT_TEMPLATE_NAME: &str = "print";
const PRINT_TEMPLATE: &str = include_str!("print.hbs");

/// Errors raised while producing the printable report.
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("template registration error: {0}")]
    Template(String),
    #[error("template render error: {0}")]
    Render(String),
}

/// Handlebars renderer for the paginated print layout.
pub struct PrintRenderer {
    handlebars: Handlebars<'static>,
}

impl PrintRenderer {
    /// Renderer using the built-in print layout.
    pub fn new() -> Result<Self, TemplateError> {
        Self::with_template(PRINT_TEMPLATE)
    }

    /// Renderer using a caller-supplied layout that receives the same context.
    pub fn with_template(template: &str) -> Result<Self, TemplateError> {
        let mut handlebars = Handlebars::new();
        handlebars
            .register_template_string(PRINT_TEMPLATE_NAME, template)
            .map_err(|err| TemplateError::Template(err.to_string()))?;
        Ok(Self { handlebars })
    }

    pub fn render(&self, report: &ReportDocument) -> Result<String, TemplateError> {
        let lang = match report.locale {
            Locale::Hi => "hi",
            Locale::En | Locale::Bilingual => "en",
        };
        let ctx = json!({ "lang": lang, "report": report });
        self.handlebars
            .render(PRINT_TEMPLATE_NAME, &ctx)
            .map_err(|err| TemplateError::Render(err.to_string()))
    }
}

/// Renders the report as standalone printable HTML.
pub fn render_print_html(report: &ReportDocument) -> Result<String, TemplateError> {
    PrintRenderer::new()?.render(report)
}
