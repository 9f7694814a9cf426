//! Tag printing and parsing for a package

use std::sync::Arc;

use cadence_core::config::{VersionSchema, PACKAGE_NAME_VARIABLE};
use cadence_core::error::ConfigError;
use cadence_strategies::VersionNumber;
use tracing::{debug, instrument};

use crate::template::{ParseState, Template, TemplateCache};

/// Package details needed to print or parse its tags
#[derive(Debug, Clone, Copy)]
pub struct TagContext<'a> {
    /// Package the tag belongs to
    pub package_name: &'a str,
    /// Most recent existing tag of the package, if any
    pub old_tag_name: Option<&'a str>,
    /// Version schema of the package
    pub schema: &'a VersionSchema,
    /// Custom tag format; `None` uses `<package>@<version>`
    pub tag_format: Option<&'a str>,
}

impl<'a> TagContext<'a> {
    /// Context with the default tag format and no prior tag
    pub fn new(package_name: &'a str, schema: &'a VersionSchema) -> Self {
        Self {
            package_name,
            old_tag_name: None,
            schema,
            tag_format: None,
        }
    }

    /// Set the previous tag
    pub fn with_old_tag(mut self, old_tag_name: Option<&'a str>) -> Self {
        self.old_tag_name = old_tag_name;
        self
    }

    /// Set a custom tag format
    pub fn with_tag_format(mut self, tag_format: Option<&'a str>) -> Self {
        self.tag_format = tag_format;
        self
    }

    fn qualified_prefix(&self) -> String {
        format!("{}@", self.package_name)
    }
}

/// Render the tag for `version`.
///
/// A custom format binds each schema part name and `PACKAGE_NAME`; any
/// other variable is a configuration error. Without one the tag is
/// `<package>@<version>`, dropping the prefix when the previous tag was
/// unqualified and keeping a `v` in front of the version when the previous
/// tag had one.
#[instrument(skip(cache), fields(package = ctx.package_name, version = %version))]
pub fn print_tag(
    version: &VersionNumber,
    ctx: &TagContext<'_>,
    cache: &TemplateCache,
) -> Result<String, ConfigError> {
    let tag = match ctx.tag_format {
        Some(format) => {
            let template = check_tag_format(format, ctx.schema, cache)?;
            template.print(|name| {
                if name == PACKAGE_NAME_VARIABLE {
                    Some(ctx.package_name.to_string())
                } else {
                    version.part(ctx.schema, name).map(|n| n.to_string())
                }
            })?
        }
        None => {
            let prefix = match ctx.old_tag_name {
                Some(old) if !old.contains('@') => String::new(),
                _ => ctx.qualified_prefix(),
            };
            let v = if old_tag_has_v(ctx.old_tag_name) { "v" } else { "" };
            format!("{}{}{}", prefix, v, version)
        }
    };

    debug!(tag = %tag, "printed tag");
    Ok(tag)
}

/// Parse a tag name back into a version.
///
/// With a custom format, schema parts missing from the tag are zero.
/// Without one the tag must carry the `<package>@` prefix unless
/// `allow_bare` is set. Tags that do not match yield `Ok(None)`.
#[instrument(skip(cache), fields(package = ctx.package_name))]
pub fn parse_tag(
    tag: &str,
    ctx: &TagContext<'_>,
    allow_bare: bool,
    cache: &TemplateCache,
) -> Result<Option<VersionNumber>, ConfigError> {
    let Some(format) = ctx.tag_format else {
        let version = match tag.strip_prefix(&ctx.qualified_prefix()) {
            Some(rest) => VersionNumber::parse(rest),
            None if allow_bare => VersionNumber::parse(tag),
            None => None,
        };
        return Ok(version);
    };

    let template = check_tag_format(format, ctx.schema, cache)?;
    let package_name = ctx.package_name;
    let Some(values) = template.parse(tag, |state, name| {
        if name == PACKAGE_NAME_VARIABLE {
            if !state.remaining().starts_with(package_name) {
                return None;
            }
            return state.clone().take(name, package_name.len());
        }
        match_number(state, name)
    }) else {
        debug!(tag, "tag does not match format");
        return Ok(None);
    };

    let mut numerical = vec![0; ctx.schema.len()];
    for (name, value) in &values {
        if let Some(index) = ctx.schema.index_of(name) {
            match value.parse::<u64>() {
                Ok(n) => numerical[index] = n,
                Err(_) => return Ok(None),
            }
        }
    }

    Ok(Some(VersionNumber::new(numerical)))
}

/// Compile a custom tag format and check every variable is either a
/// schema part or `PACKAGE_NAME`
pub fn check_tag_format(
    format: &str,
    schema: &VersionSchema,
    cache: &TemplateCache,
) -> Result<Arc<Template>, ConfigError> {
    let template = cache.get_or_compile(format)?;

    if let Some(unknown) = template
        .variables()
        .into_iter()
        .find(|name| *name != PACKAGE_NAME_VARIABLE && !schema.contains(name))
    {
        return Err(ConfigError::UnknownTagVariable {
            format: format.to_string(),
            variable: unknown.to_string(),
        });
    }

    Ok(template)
}

/// One or more ASCII digits
fn match_number<'i>(state: &ParseState<'i>, name: &str) -> Option<ParseState<'i>> {
    let len = state
        .remaining()
        .bytes()
        .take_while(u8::is_ascii_digit)
        .count();
    if len == 0 {
        return None;
    }
    state.clone().take(name, len)
}

/// Whether the version in the previous tag starts with `v`.
///
/// The version starts after the last `@`, or at the start of an
/// unqualified tag.
fn old_tag_has_v(old_tag_name: Option<&str>) -> bool {
    let Some(old) = old_tag_name else {
        return false;
    };
    let start = old.rfind('@').map(|i| i + 1).unwrap_or(0);
    old[start..].starts_with('v')
}

#[cfg(test)]
mod tests {
    use super::*;
    use cadence_core::error::TemplateError;

    fn v(s: &str) -> VersionNumber {
        VersionNumber::parse(s).unwrap()
    }

    #[test]
    fn test_print_default_format() {
        let cache = TemplateCache::new();
        let schema = VersionSchema::default();
        let ctx = TagContext::new("pkg", &schema);

        assert_eq!(print_tag(&v("1.2.3"), &ctx, &cache).unwrap(), "pkg@1.2.3");
    }

    #[test]
    fn test_print_default_follows_old_tag() {
        let cache = TemplateCache::new();
        let schema = VersionSchema::default();
        let version = v("1.3.0");

        let print = |old: &str| {
            let ctx = TagContext::new("pkg", &schema).with_old_tag(Some(old));
            print_tag(&version, &ctx, &cache).unwrap()
        };

        assert_eq!(print("pkg@1.2.0"), "pkg@1.3.0");
        assert_eq!(print("pkg@v1.2.0"), "pkg@v1.3.0");
        assert_eq!(print("1.2.0"), "1.3.0");
        assert_eq!(print("v1.2.0"), "v1.3.0");
        assert_eq!(print("@scope/pkg@v1.2.0"), "pkg@v1.3.0");
    }

    #[test]
    fn test_print_custom_format() {
        let cache = TemplateCache::new();
        let schema = VersionSchema::default();
        let ctx = TagContext::new("web", &schema)
            .with_tag_format(Some("{{PACKAGE_NAME}}/v{{MAJOR}}.{{MINOR}}{{?.{{PATCH}}}}"));

        assert_eq!(print_tag(&v("2.1.0"), &ctx, &cache).unwrap(), "web/v2.1");
        assert_eq!(print_tag(&v("2.1.4"), &ctx, &cache).unwrap(), "web/v2.1.4");
    }

    #[test]
    fn test_print_custom_format_unknown_variable() {
        let cache = TemplateCache::new();
        let schema = VersionSchema::default();
        let ctx = TagContext::new("web", &schema).with_tag_format(Some("{{MAJOR}}.{{BUILD}}"));

        match print_tag(&v("2.1.0"), &ctx, &cache) {
            Err(ConfigError::UnknownTagVariable { variable, .. }) => assert_eq!(variable, "BUILD"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_print_custom_format_malformed() {
        let cache = TemplateCache::new();
        let schema = VersionSchema::default();
        let ctx = TagContext::new("web", &schema).with_tag_format(Some("{{MAJOR"));

        assert!(matches!(
            print_tag(&v("2.1.0"), &ctx, &cache),
            Err(ConfigError::InvalidTagFormat(TemplateError::UnclosedPlaceholder { .. }))
        ));
    }

    #[test]
    fn test_parse_default_format() {
        let cache = TemplateCache::new();
        let schema = VersionSchema::default();
        let ctx = TagContext::new("pkg", &schema);

        assert_eq!(parse_tag("pkg@1.2.3", &ctx, false, &cache).unwrap(), Some(v("1.2.3")));
        assert_eq!(parse_tag("pkg@v1.2.3", &ctx, false, &cache).unwrap(), Some(v("1.2.3")));
        assert_eq!(parse_tag("1.2.3", &ctx, false, &cache).unwrap(), None);
        assert_eq!(parse_tag("other@1.2.3", &ctx, false, &cache).unwrap(), None);
        assert_eq!(parse_tag("pkg@latest", &ctx, false, &cache).unwrap(), None);
    }

    #[test]
    fn test_parse_default_format_bare() {
        let cache = TemplateCache::new();
        let schema = VersionSchema::default();
        let ctx = TagContext::new("pkg", &schema);

        assert_eq!(parse_tag("v1.2.3", &ctx, true, &cache).unwrap(), Some(v("1.2.3")));
        assert_eq!(parse_tag("pkg@1.2.3", &ctx, true, &cache).unwrap(), Some(v("1.2.3")));
        assert_eq!(parse_tag("other@1.2.3", &ctx, true, &cache).unwrap(), None);
    }

    #[test]
    fn test_parse_custom_format_defaults_missing_parts() {
        let cache = TemplateCache::new();
        let schema = VersionSchema::default();
        let ctx = TagContext::new("web", &schema)
            .with_tag_format(Some("{{PACKAGE_NAME}}/v{{MAJOR}}.{{MINOR}}{{?.{{PATCH}}}}"));

        let parsed = parse_tag("web/v2.1", &ctx, false, &cache).unwrap().unwrap();
        assert_eq!(parsed.numerical, vec![2, 1, 0]);

        let parsed = parse_tag("web/v2.1.7", &ctx, false, &cache).unwrap().unwrap();
        assert_eq!(parsed.numerical, vec![2, 1, 7]);

        assert_eq!(parse_tag("api/v2.1.7", &ctx, false, &cache).unwrap(), None);
        assert_eq!(parse_tag("web/v2", &ctx, false, &cache).unwrap(), None);
    }

    #[test]
    fn test_parse_custom_format_without_all_parts() {
        let cache = TemplateCache::new();
        let schema = VersionSchema::default();
        let ctx = TagContext::new("tool", &schema).with_tag_format(Some("release-{{MAJOR}}"));

        let parsed = parse_tag("release-7", &ctx, false, &cache).unwrap().unwrap();
        assert_eq!(parsed.numerical, vec![7, 0, 0]);
    }

    #[test]
    fn test_custom_format_round_trip_with_padding() {
        let cache = TemplateCache::new();
        let schema = VersionSchema::new(["YEAR", "MONTH", "RELEASE"]);
        let ctx = TagContext::new("app", &schema)
            .with_tag_format(Some("{{YEAR}}.{{MONTH|pad-number 2}}.{{RELEASE}}"));

        let version = VersionNumber::new(vec![2024, 3, 1]);
        let tag = print_tag(&version, &ctx, &cache).unwrap();
        assert_eq!(tag, "2024.03.1");
        assert_eq!(parse_tag(&tag, &ctx, false, &cache).unwrap(), Some(version));
    }

    #[test]
    fn test_parse_custom_format_overflow_is_no_match() {
        let cache = TemplateCache::new();
        let schema = VersionSchema::default();
        let ctx = TagContext::new("pkg", &schema).with_tag_format(Some("v{{MAJOR}}"));

        assert_eq!(
            parse_tag("v99999999999999999999999", &ctx, false, &cache).unwrap(),
            None
        );
    }
}
