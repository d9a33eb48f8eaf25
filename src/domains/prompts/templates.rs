//! Template rendering.
//!
//! Substitutes variables into a template body in one of the two supported
//! [`TemplateFormat`]s:
//!
//! - **mustache**: `{{name}}`, `{{{name}}}`, `{{&name}}`, sections
//!   `{{#name}}...{{/name}}`, inverted sections `{{^name}}...{{/name}}` and
//!   comments `{{! ...}}`. Missing variables render as empty text. Values are
//!   never HTML-escaped.
//! - **f-string**: `{name}` placeholders with `{{` and `}}` as literal braces.
//!   Every placeholder must have a value.

use std::collections::HashMap;

use super::error::PromptError;
use super::model::TemplateFormat;

/// Render a template body with the given variables.
pub fn render(
    template: &str,
    format: TemplateFormat,
    variables: &HashMap<String, String>,
) -> Result<String, PromptError> {
    match format {
        TemplateFormat::Mustache => render_mustache(template, variables),
        TemplateFormat::FString => render_fstring(template, variables),
    }
}

fn render_mustache(
    template: &str,
    variables: &HashMap<String, String>,
) -> Result<String, PromptError> {
    let mut result = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        result.push_str(&rest[..start]);
        let tail = &rest[start..];

        if let Some(inner) = tail.strip_prefix("{{{") {
            let end = inner
                .find("}}}")
                .ok_or_else(|| PromptError::invalid_input("unclosed '{{{' tag in template"))?;
            push_value(&mut result, variables, inner[..end].trim());
            rest = &inner[end + 3..];
            continue;
        }

        let inner = &tail[2..];
        let end = inner
            .find("}}")
            .ok_or_else(|| PromptError::invalid_input("unclosed '{{' tag in template"))?;
        let tag = inner[..end].trim();
        rest = &inner[end + 2..];

        if tag.starts_with('!') {
            continue;
        }

        if let Some(name) = tag.strip_prefix('#').or_else(|| tag.strip_prefix('^')) {
            let name = name.trim();
            let (body, remainder) = split_section(rest, name)?;
            let is_set = variables.get(name).is_some_and(|v| !v.is_empty());
            if is_set == tag.starts_with('#') {
                result.push_str(&render_mustache(body, variables)?);
            }
            rest = remainder;
            continue;
        }

        if tag.starts_with('/') {
            return Err(PromptError::invalid_input(format!(
                "unexpected closing tag '{{{{{}}}}}' in template",
                tag
            )));
        }

        push_value(&mut result, variables, tag.trim_start_matches('&').trim());
    }

    result.push_str(rest);
    Ok(result)
}

fn push_value(result: &mut String, variables: &HashMap<String, String>, name: &str) {
    if let Some(value) = variables.get(name) {
        result.push_str(value);
    }
}

/// Split `source` at the `{{/name}}` closing the section opened just before
/// it, honoring nested sections of the same name.
fn split_section<'a>(source: &'a str, name: &str) -> Result<(&'a str, &'a str), PromptError> {
    let mut depth = 0usize;
    let mut cursor = 0;

    while let Some(offset) = source[cursor..].find("{{") {
        let open = cursor + offset;
        let close = source[open + 2..]
            .find("}}")
            .map(|e| open + 2 + e)
            .ok_or_else(|| PromptError::invalid_input("unclosed '{{' tag in template"))?;
        let tag = source[open + 2..close].trim();

        if let Some(opened) = tag.strip_prefix('#').or_else(|| tag.strip_prefix('^')) {
            if opened.trim() == name {
                depth += 1;
            }
        } else if let Some(closed) = tag.strip_prefix('/') {
            if closed.trim() == name {
                if depth == 0 {
                    return Ok((&source[..open], &source[close + 2..]));
                }
                depth -= 1;
            }
        }

        cursor = close + 2;
    }

    Err(PromptError::invalid_input(format!(
        "section '{}' is never closed",
        name
    )))
}

fn render_fstring(
    template: &str,
    variables: &HashMap<String, String>,
) -> Result<String, PromptError> {
    let mut result = String::with_capacity(template.len());
    let mut chars = template.char_indices().peekable();

    while let Some((index, c)) = chars.next() {
        match c {
            '{' if chars.peek().is_some_and(|&(_, next)| next == '{') => {
                chars.next();
                result.push('{');
            }
            '{' => {
                let start = index + 1;
                let end = template[start..]
                    .find('}')
                    .map(|e| start + e)
                    .ok_or_else(|| PromptError::invalid_input("unclosed '{' in template"))?;
                let name = template[start..end].trim();
                if name.is_empty() || name.contains('{') {
                    return Err(PromptError::invalid_input(format!(
                        "invalid placeholder '{{{}}}' in template",
                        &template[start..end]
                    )));
                }
                let value = variables.get(name).ok_or_else(|| {
                    PromptError::invalid_input(format!("missing value for variable '{}'", name))
                })?;
                result.push_str(value);

                while chars.peek().is_some_and(|&(i, _)| i <= end) {
                    chars.next();
                }
            }
            '}' if chars.peek().is_some_and(|&(_, next)| next == '}') => {
                chars.next();
                result.push('}');
            }
            '}' => {
                return Err(PromptError::invalid_input(
                    "single '}' encountered in template",
                ));
            }
            _ => result.push(c),
        }
    }

    Ok(result)
}
