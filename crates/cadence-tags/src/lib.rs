//! Cadence Tags - Tag format templates and tag resolution
//!
//! Tag formats are small templates such as `{{PACKAGE_NAME}}-v{{MAJOR}}.{{MINOR}}`
//! that print a version into a tag name and parse a tag name back into a
//! version.

mod resolver;
pub mod template;
mod types;

pub use resolver::{check_tag_format, parse_tag, print_tag, TagContext};
pub use template::{ParseState, Template, TemplateCache};
pub use types::{latest_version, TagInfo};
