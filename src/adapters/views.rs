use crate::domain::model::Bar;
use crate::domain::ports::ViewRenderer;
use crate::utils::error::{BarError, Result};
use serde_json::Value;

pub const INDEX_VIEW: &str = "index";
pub const BARS_VIEW: &str = "bars";
pub const BAR_DETAIL_VIEW: &str = "bar-detail";

/// Built-in renderer for the index, list and detail pages.
#[derive(Debug, Clone)]
pub struct HtmlRenderer {
    site_title: String,
}

impl HtmlRenderer {
    pub fn new(site_title: impl Into<String>) -> Self {
        Self {
            site_title: site_title.into(),
        }
    }

    fn layout(&self, title: &str, body: &str) -> String {
        format!(
            "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{} | {}</title>\n</head>\n<body>\n<header><a href=\"/bar/all\">{}</a></header>\n<main>\n{}</main>\n</body>\n</html>\n",
            escape(title),
            escape(&self.site_title),
            escape(&self.site_title),
            body
        )
    }

    fn index(&self) -> String {
        let body = "<h1>Welcome</h1>\n<p><a href=\"/bar/all\">Browse all bars</a></p>\n";
        self.layout("Home", body)
    }

    fn bars(&self, context: &Value) -> Result<String> {
        let title = context
            .get("title")
            .and_then(Value::as_str)
            .unwrap_or("Bars");
        let bars: Vec<Bar> = serde_json::from_value(
            context.get("bars").cloned().unwrap_or(Value::Array(Vec::new())),
        )?;

        let mut body = format!("<h1>{}</h1>\n", escape(title));
        if bars.is_empty() {
            body.push_str("<p>No bars found.</p>\n");
        } else {
            body.push_str("<ul class=\"bars\">\n");
            for bar in &bars {
                body.push_str(&format!(
                    "<li><a href=\"/bar/detail/{}\">{}</a> <span>{}</span> <a href=\"/bar/all/{}\">{}</a></li>\n",
                    bar.id,
                    escape(&bar.fields.name),
                    escape(&bar.fields.address),
                    escape(&bar.fields.neighbourhood),
                    escape(&bar.fields.neighbourhood),
                ));
            }
            body.push_str("</ul>\n");
        }

        Ok(self.layout(title, &body))
    }

    fn bar_detail(&self, context: &Value) -> Result<String> {
        let bar: Bar = serde_json::from_value(
            context
                .get("bar")
                .cloned()
                .ok_or_else(|| render_error("bar-detail view needs a `bar` in its context"))?,
        )?;
        let fields = &bar.fields;

        let mut body = format!("<h1>{}</h1>\n<dl>\n", escape(&fields.name));
        for (label, value) in [
            ("Address", fields.address.clone()),
            ("Postal code", fields.postal_code.to_string()),
            ("Neighbourhood", fields.neighbourhood.clone()),
            ("Location", fields.location.clone()),
            ("Types", fields.place_types.join(", ")),
            ("Rating", fields.rating.to_string()),
            ("Smoking", fields.smoking_type.clone()),
            ("Status", fields.status.clone()),
        ] {
            body.push_str(&format!("<dt>{}</dt><dd>{}</dd>\n", label, escape(&value)));
        }
        body.push_str("</dl>\n");

        if !fields.opening_hours.is_empty() {
            body.push_str("<h2>Opening hours</h2>\n<ul>\n");
            for (day, hours) in &fields.opening_hours {
                let hours = match hours {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                body.push_str(&format!("<li>{}: {}</li>\n", escape(day), escape(&hours)));
            }
            body.push_str("</ul>\n");
        }

        for photo in &fields.thumb_photos {
            body.push_str(&format!(
                "<img src=\"{}\" alt=\"{}\">\n",
                escape(photo),
                escape(&fields.name)
            ));
        }

        Ok(self.layout(&fields.name, &body))
    }
}

impl Default for HtmlRenderer {
    fn default() -> Self {
        Self::new("Bar Registry")
    }
}

impl ViewRenderer for HtmlRenderer {
    fn render(&self, view: &str, context: &Value) -> Result<String> {
        match view {
            INDEX_VIEW => Ok(self.index()),
            BARS_VIEW => self.bars(context),
            BAR_DETAIL_VIEW => self.bar_detail(context),
            other => Err(render_error(format!("unknown view '{}'", other))),
        }
    }
}

fn render_error(message: impl Into<String>) -> BarError {
    BarError::Render {
        message: message.into(),
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}
