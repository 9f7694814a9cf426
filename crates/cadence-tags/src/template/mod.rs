//! Tag format template engine
//!
//! Syntax:
//! - `{{NAME}}` inserts a variable
//! - `{{NAME|pad-number 3}}` inserts a variable left-padded with zeros
//! - `{{?...}}` is an optional section, omitted when every variable inside
//!   it is `0`; sections may nest
//!
//! Everything else is literal text.

mod ast;
mod cache;
mod compiled;
mod parser;

pub use ast::{Filter, Node};
pub use cache::{TemplateCache, CACHE_CAPACITY};
pub use compiled::{ParseState, Template};
pub use parser::{parse_template, MAX_TEMPLATE_LEN};
