//! Template source parser

use cadence_core::error::TemplateError;
use tracing::debug;

use super::ast::{Filter, Node};

/// Maximum template length in characters
pub const MAX_TEMPLATE_LEN: usize = 256;

const SECTION_OPEN: &str = "{{?";
const OPEN: &str = "{{";
const CLOSE: &str = "}}";
const PAD_NUMBER: &str = "pad-number";

/// Parse template source into its top-level nodes
pub fn parse_template(source: &str) -> Result<Vec<Node>, TemplateError> {
    let length = source.chars().count();
    if length > MAX_TEMPLATE_LEN {
        return Err(TemplateError::TooLong {
            length,
            max: MAX_TEMPLATE_LEN,
        });
    }

    // Open sections with the offset of their `{{?`; the root sits at the bottom
    let mut stack: Vec<(usize, Vec<Node>)> = vec![(0, Vec::new())];
    let mut literal = String::new();
    let mut pos = 0;

    while let Some(ch) = source[pos..].chars().next() {
        let rest = &source[pos..];

        if rest.starts_with("{{{") {
            // Only the last two braces of a run open a placeholder
            literal.push('{');
            pos += 1;
        } else if rest.starts_with(SECTION_OPEN) {
            flush_literal(&mut literal, &mut stack);
            stack.push((pos, Vec::new()));
            pos += SECTION_OPEN.len();
        } else if rest.starts_with(OPEN) {
            flush_literal(&mut literal, &mut stack);
            let body_start = pos + OPEN.len();
            let body_end = source[body_start..]
                .find(CLOSE)
                .map(|i| body_start + i)
                .filter(|&end| !source[body_start..end].contains(OPEN))
                .ok_or_else(|| TemplateError::UnclosedPlaceholder {
                    template: source.to_string(),
                    offset: pos,
                })?;

            let node = parse_placeholder(source, pos, &source[body_start..body_end])?;
            push_node(&mut stack, node);
            pos = body_end + CLOSE.len();
        } else if rest.starts_with(CLOSE) {
            flush_literal(&mut literal, &mut stack);
            if stack.len() == 1 {
                return Err(TemplateError::UnmatchedClose {
                    template: source.to_string(),
                    offset: pos,
                });
            }
            if let Some((_, body)) = stack.pop() {
                push_node(&mut stack, Node::Optional(body));
            }
            pos += CLOSE.len();
        } else {
            literal.push(ch);
            pos += ch.len_utf8();
        }
    }
    flush_literal(&mut literal, &mut stack);

    if stack.len() > 1 {
        let offset = stack.last().map(|(offset, _)| *offset).unwrap_or_default();
        return Err(TemplateError::UnclosedSection {
            template: source.to_string(),
            offset,
        });
    }

    let nodes = stack.pop().map(|(_, nodes)| nodes).unwrap_or_default();
    debug!(template = source, nodes = nodes.len(), "parsed template");
    Ok(nodes)
}

fn push_node(stack: &mut [(usize, Vec<Node>)], node: Node) {
    if let Some((_, nodes)) = stack.last_mut() {
        nodes.push(node);
    }
}

fn flush_literal(literal: &mut String, stack: &mut [(usize, Vec<Node>)]) {
    if !literal.is_empty() {
        push_node(stack, Node::Literal(std::mem::take(literal)));
    }
}

/// Parse `NAME` or `NAME|filter|filter` between the braces
fn parse_placeholder(source: &str, offset: usize, body: &str) -> Result<Node, TemplateError> {
    let mut pieces = body.split('|');
    let name = pieces.next().unwrap_or_default().trim();

    if name.is_empty() {
        return Err(TemplateError::EmptyPlaceholder {
            template: source.to_string(),
            offset,
        });
    }
    if !is_identifier(name) {
        return Err(TemplateError::InvalidVariable {
            template: source.to_string(),
            name: name.to_string(),
        });
    }

    let filters = pieces
        .map(|raw| {
            parse_filter(raw).ok_or_else(|| TemplateError::InvalidFilter {
                template: source.to_string(),
                filter: raw.trim().to_string(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Node::Variable {
        name: name.to_string(),
        filters,
    })
}

/// `pad-number <width>` with `1 <= width <= MAX_TEMPLATE_LEN`
fn parse_filter(raw: &str) -> Option<Filter> {
    let mut words = raw.split_whitespace();
    if words.next()? != PAD_NUMBER {
        return None;
    }
    let width = words.next()?;
    if words.next().is_some() || !width.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let width: usize = width.parse().ok()?;
    (1..=MAX_TEMPLATE_LEN)
        .contains(&width)
        .then_some(Filter::PadNumber(width))
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
