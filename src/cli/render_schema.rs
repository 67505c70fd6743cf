// src/cli/render_schema.rs
use std::fs;
use std::path::Path;

use super::CliError;
use crate::forms::{render_form, FormSession, RenderOptions, RenderedField, Schema, WidgetKind};

const PREVIEW_ENTITY: &str = "preview";

pub fn run(path: &Path, debug: bool) -> Result<(), CliError> {
    let text = fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let json: serde_json::Value = serde_json::from_str(&text)?;
    let schema = Schema::from_json(&json)?;

    println!("Schema: {}\n", path.display());
    for line in describe_schema(&schema, debug) {
        println!("{}", line);
    }
    Ok(())
}

/// One line per rendered field, children indented under their section.
pub fn describe_schema(schema: &Schema, debug: bool) -> Vec<String> {
    let mut session = FormSession::new();
    let options = RenderOptions {
        debug,
        ..Default::default()
    };
    let form = render_form(schema, PREVIEW_ENTITY, &mut session, &options);
    let mut lines = Vec::new();
    for field in &form.fields {
        describe_field(field, 0, &mut lines);
    }
    lines
}

fn describe_field(field: &RenderedField, depth: usize, lines: &mut Vec<String>) {
    let mut line = format!(
        "{}{:<24} {:<11} key={}",
        "  ".repeat(depth),
        field.label,
        format!("{:?}", field.kind),
        field.key.as_deref().unwrap_or("-")
    );
    if field.kind != WidgetKind::Nested {
        line.push_str(&format!(" value={:?}", field.value.to_string()));
    }
    if !field.options.is_empty() {
        let options: Vec<String> = field.options.iter().map(|o| o.to_string()).collect();
        line.push_str(&format!(" options=[{}]", options.join(", ")));
    }
    if field.disabled {
        line.push_str(" (disabled)");
    }
    if let Some(help) = &field.help {
        line.push_str(&format!(" help={:?}", help));
    }
    lines.push(line);
    for child in &field.children {
        describe_field(child, depth + 1, lines);
    }
}
