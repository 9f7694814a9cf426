//! Template syntax tree

/// Transformation applied to a variable's value when printing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    /// Left-pad with zeros to at least the given width
    PadNumber(usize),
}

impl Filter {
    /// Apply the filter to a value
    pub fn apply(&self, value: &str) -> String {
        match self {
            Filter::PadNumber(width) => format!("{:0>width$}", value, width = *width),
        }
    }
}

/// Template node
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Text matched and printed verbatim
    Literal(String),
    /// Named placeholder
    Variable { name: String, filters: Vec<Filter> },
    /// Section printed only when one of its variables is non-zero
    Optional(Vec<Node>),
}

impl Node {
    /// Visit variable names in this node and its children, in order
    pub(crate) fn collect_variables<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Node::Literal(_) => {}
            Node::Variable { name, .. } => out.push(name),
            Node::Optional(body) => {
                for node in body {
                    node.collect_variables(out);
                }
            }
        }
    }
}
