//! Compiled templates: printing and parsing

use std::collections::BTreeMap;

use cadence_core::error::TemplateError;
use tracing::{debug, instrument};

use super::ast::Node;
use super::parser::parse_template;

/// Progress through an input string while matching a template.
///
/// States are cheap to clone; each branch of the parser works on its own
/// copy so a failed branch leaves the caller's state untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseState<'i> {
    input: &'i str,
    pos: usize,
    values: BTreeMap<String, String>,
}

impl<'i> ParseState<'i> {
    /// Start matching at the beginning of `input`
    pub fn new(input: &'i str) -> Self {
        Self {
            input,
            pos: 0,
            values: BTreeMap::new(),
        }
    }

    /// Input not yet consumed
    pub fn remaining(&self) -> &'i str {
        &self.input[self.pos..]
    }

    /// Byte offset into the input
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Whether all input has been consumed
    pub fn is_complete(&self) -> bool {
        self.pos == self.input.len()
    }

    /// Value recorded for a variable
    pub fn value(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// All recorded values
    pub fn values(&self) -> &BTreeMap<String, String> {
        &self.values
    }

    /// Consume the state, keeping the recorded values
    pub fn into_values(self) -> BTreeMap<String, String> {
        self.values
    }

    /// Consume the next `len` bytes as the value of `name`.
    ///
    /// Returns `None` if fewer bytes remain or `len` splits a character.
    pub fn take(mut self, name: &str, len: usize) -> Option<Self> {
        let value = self.remaining().get(..len)?.to_string();
        self.pos += len;
        self.values.insert(name.to_string(), value);
        Some(self)
    }

    /// Consume `text` if the remaining input starts with it
    pub fn skip_literal(mut self, text: &str) -> Option<Self> {
        if !self.remaining().starts_with(text) {
            return None;
        }
        self.pos += text.len();
        Some(self)
    }
}

/// A parsed tag format, ready to print and parse tags
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    source: String,
    nodes: Vec<Node>,
}

impl Template {
    /// Compile template source
    #[instrument(level = "debug")]
    pub fn compile(source: &str) -> Result<Self, TemplateError> {
        let nodes = parse_template(source)?;
        Ok(Self {
            source: source.to_string(),
            nodes,
        })
    }

    /// Source the template was compiled from
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Top-level nodes
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Distinct variable names in order of first appearance
    pub fn variables(&self) -> Vec<&str> {
        let mut all = Vec::new();
        for node in &self.nodes {
            node.collect_variables(&mut all);
        }

        let mut names: Vec<&str> = Vec::new();
        for name in all {
            if !names.contains(&name) {
                names.push(name);
            }
        }
        names
    }

    /// Render the template, looking variable values up by name.
    ///
    /// An optional section is left out, literals included, when every
    /// variable inside it (nested sections too) looks up as `"0"`.
    pub fn print<F>(&self, lookup: F) -> Result<String, TemplateError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut output = String::new();
        print_nodes(&self.nodes, &lookup, &mut output)?;
        Ok(output)
    }

    /// Match `input` against the template.
    ///
    /// Literals must match exactly. Variables are recognised by `matcher`,
    /// which receives the current state and the variable name and returns
    /// the advanced state (usually via [`ParseState::take`]) or `None`.
    /// An optional section whose body matches is kept; if any part of the
    /// body fails, the section counts as absent and matching resumes from
    /// the state saved before it. The whole input must be consumed.
    /// Returns the recorded values.
    pub fn parse<'i, F>(&self, input: &'i str, matcher: F) -> Option<BTreeMap<String, String>>
    where
        F: Fn(&ParseState<'i>, &str) -> Option<ParseState<'i>>,
    {
        let result = match_nodes(&self.nodes, ParseState::new(input), &matcher)
            .filter(ParseState::is_complete);
        debug!(
            template = %self.source,
            input,
            matched = result.is_some(),
            "parsed against template"
        );
        result.map(ParseState::into_values)
    }
}

fn print_nodes<F>(nodes: &[Node], lookup: &F, output: &mut String) -> Result<(), TemplateError>
where
    F: Fn(&str) -> Option<String>,
{
    for node in nodes {
        match node {
            Node::Literal(text) => output.push_str(text),
            Node::Variable { name, filters } => {
                let value = lookup_value(lookup, name)?;
                let value = filters
                    .iter()
                    .fold(value, |value, filter| filter.apply(&value));
                output.push_str(&value);
            }
            Node::Optional(body) => {
                let mut names = Vec::new();
                for child in body {
                    child.collect_variables(&mut names);
                }

                let mut all_zero = true;
                for name in names {
                    all_zero &= lookup_value(lookup, name)? == "0";
                }
                if !all_zero {
                    print_nodes(body, lookup, output)?;
                }
            }
        }
    }
    Ok(())
}

fn lookup_value<F>(lookup: &F, name: &str) -> Result<String, TemplateError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name).ok_or_else(|| TemplateError::UnboundVariable(name.to_string()))
}

/// Match `nodes` in order from `state`.
///
/// Each node is visited once: a section is decided from its own body, so
/// matching time is linear in the template length.
fn match_nodes<'i, F>(nodes: &[Node], mut state: ParseState<'i>, matcher: &F) -> Option<ParseState<'i>>
where
    F: Fn(&ParseState<'i>, &str) -> Option<ParseState<'i>>,
{
    for node in nodes {
        state = match node {
            Node::Literal(text) => state.skip_literal(text)?,
            Node::Variable { name, .. } => matcher(&state, name)?,
            Node::Optional(body) => match match_nodes(body, state.clone(), matcher) {
                Some(present) => present,
                None => state,
            },
        };
    }
    Some(state)
}
