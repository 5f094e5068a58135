//! URL template rendering with `{name}` placeholders.
//!
//! Every placeholder is checked against the context before anything is
//! substituted, so a typo in a source definition surfaces as one error that
//! names all unresolved placeholders instead of a half-rendered URL.

use crate::error::TemplateError;
use std::collections::BTreeMap;

/// Values available to a template (version, listing_url, capture groups, ...).
pub type Context = BTreeMap<String, String>;

enum Piece<'a> {
    Literal(&'a str),
    Placeholder(&'a str),
}

fn parse(template: &str) -> Result<Vec<Piece<'_>>, TemplateError> {
    let malformed = |reason: &str| TemplateError::Malformed {
        template: template.to_string(),
        reason: reason.to_string(),
    };

    let mut pieces = Vec::new();
    let mut rest = template;
    while !rest.is_empty() {
        let Some(pos) = rest.find(['{', '}']) else {
            pieces.push(Piece::Literal(rest));
            break;
        };
        if pos > 0 {
            pieces.push(Piece::Literal(&rest[..pos]));
        }
        let tail = &rest[pos..];
        if tail.starts_with("{{") {
            pieces.push(Piece::Literal("{"));
            rest = &tail[2..];
        } else if tail.starts_with("}}") {
            pieces.push(Piece::Literal("}"));
            rest = &tail[2..];
        } else if tail.starts_with('}') {
            return Err(malformed("single '}' encountered"));
        } else {
            let end = tail[1..]
                .find(['{', '}'])
                .filter(|&i| tail.as_bytes()[i + 1] == b'}')
                .ok_or_else(|| malformed("unclosed '{'"))?;
            let name = &tail[1..=end];
            if name.is_empty() {
                return Err(malformed("empty placeholder '{}'"));
            }
            pieces.push(Piece::Placeholder(name));
            rest = &tail[end + 2..];
        }
    }
    Ok(pieces)
}

/// Placeholder names referenced by `template`, in order of appearance.
pub fn placeholders(template: &str) -> Result<Vec<&str>, TemplateError> {
    Ok(parse(template)?
        .into_iter()
        .filter_map(|p| match p {
            Piece::Placeholder(name) => Some(name),
            Piece::Literal(_) => None,
        })
        .collect())
}

/// Renders `template` against `context`.
///
/// Fails with [`TemplateError::MissingPlaceholders`] if any placeholder has no
/// context entry; nothing is ever defaulted.
pub fn render(template: &str, context: &Context) -> Result<String, TemplateError> {
    let pieces = parse(template)?;

    let mut missing: Vec<String> = Vec::new();
    for piece in &pieces {
        if let Piece::Placeholder(name) = piece {
            if !context.contains_key(*name) && !missing.iter().any(|m| m == name) {
                missing.push(name.to_string());
            }
        }
    }
    if !missing.is_empty() {
        return Err(TemplateError::MissingPlaceholders {
            template: template.to_string(),
            missing,
            available: context.keys().cloned().collect(),
        });
    }

    let mut out = String::with_capacity(template.len());
    for piece in pieces {
        match piece {
            Piece::Literal(s) => out.push_str(s),
            Piece::Placeholder(name) => out.push_str(&context[name]),
        }
    }
    Ok(out)
}
