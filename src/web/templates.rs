//! HTML template rendering

use axum::response::Html;
use minijinja::{context, Environment, ErrorKind, Value};
use rust_embed::RustEmbed;

use crate::error::Result;
use crate::web::context::RequestContext;

#[derive(RustEmbed)]
#[folder = "templates/"]
struct TemplateFiles;

/// Template environment loading pages embedded in the binary
pub struct Templates {
    env: Environment<'static>,
}

impl Templates {
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.set_loader(load_template);
        env.add_filter("strftime", strftime);
        Self { env }
    }

    /// Render a page with the logged in user and pending flash messages
    pub fn render(&self, name: &str, ctx: &RequestContext, extra: Value) -> Result<Html<String>> {
        let template = self.env.get_template(name)?;
        let messages = ctx.take_flashes();

        let rendered = template.render(context! {
            user => ctx.user(),
            messages => messages,
            ..extra
        })?;

        Ok(Html(rendered))
    }
}

impl Default for Templates {
    fn default() -> Self {
        Self::new()
    }
}

fn load_template(name: &str) -> std::result::Result<Option<String>, minijinja::Error> {
    let Some(file) = TemplateFiles::get(name) else {
        return Ok(None);
    };

    String::from_utf8(file.data.into_owned())
        .map(Some)
        .map_err(|e| {
            minijinja::Error::new(ErrorKind::InvalidOperation, "template is not valid UTF-8")
                .with_source(e)
        })
}

/// Format a serialized timestamp, e.g. `{{ post.created|strftime("%Y-%m-%d") }}`
fn strftime(value: String, format: String) -> std::result::Result<String, minijinja::Error> {
    let timestamp: chrono::NaiveDateTime = value.parse().map_err(|e| {
        minijinja::Error::new(
            ErrorKind::InvalidOperation,
            format!("cannot parse timestamp {:?}", value),
        )
        .with_source(e)
    })?;

    Ok(timestamp.format(&format).to_string())
}
