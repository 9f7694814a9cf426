//! Terminal output: status lines, report sections and value styling

use std::fmt::Display;

use console::style;

/// Print a success message
pub fn success(message: &str) {
    println!("{} {}", style("✓").green().bold(), message);
}

/// Print an error message to stderr
pub fn error(message: &str) {
    eprintln!("{} {}", style("✗").red().bold(), message);
}

/// Print a warning message to stderr
pub fn warning(message: &str) {
    eprintln!("{} {}", style("!").yellow().bold(), message);
}

/// Print an info message
pub fn info(message: &str) {
    println!("{} {}", style("→").blue(), message);
}

/// Bold heading line
pub fn header(text: &str) -> String {
    style(text).bold().to_string()
}

/// A styled version number
pub fn version(value: impl Display) -> String {
    style(value).green().bold().to_string()
}

/// A styled tag name
pub fn tag(value: impl Display) -> String {
    style(value).yellow().to_string()
}

/// A styled package name
pub fn package(value: impl Display) -> String {
    style(value).cyan().to_string()
}

/// A styled file path
pub fn path(value: impl Display) -> String {
    style(value).cyan().to_string()
}

/// A titled block of `key: value` lines with keys aligned
#[derive(Debug, Default)]
pub struct Section {
    title: String,
    rows: Vec<(String, String)>,
}

impl Section {
    /// Start a section
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            rows: Vec::new(),
        }
    }

    /// Add a row
    pub fn row(mut self, key: impl Into<String>, value: impl Display) -> Self {
        self.rows.push((key.into(), value.to_string()));
        self
    }

    /// Add a row when `value` is present
    pub fn row_opt(self, key: impl Into<String>, value: Option<impl Display>) -> Self {
        match value {
            Some(value) => self.row(key, value),
            None => self,
        }
    }

    /// Render the heading, a blank line and the rows
    pub fn render(&self) -> String {
        let width = self.rows.iter().map(|(k, _)| k.len() + 1).max().unwrap_or(0);
        let mut out = format!("{}\n\n", header(&self.title));
        for (key, value) in &self.rows {
            let label = format!("{}:", key);
            out.push_str(&format!("  {} {}\n", style(format!("{:<width$}", label)).dim(), value));
        }
        out
    }

    /// Print the rendered section
    pub fn print(&self) {
        print!("{}", self.render());
    }
}
