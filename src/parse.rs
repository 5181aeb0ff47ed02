//! Parse Module
//!
//! Splits a single-file component into its blocks and hands the script block
//! to oxc. Template and style blocks are never analyzed, only carried through.

use lazy_static::lazy_static;
use oxc_allocator::Allocator;
use oxc_ast::ast::Program;
use oxc_parser::Parser;
use oxc_span::SourceType;
use regex::Regex;
use std::collections::HashMap;
use std::ops::Range;

use crate::diagnostics::MigrateError;

lazy_static! {
    /// Script block regex
    static ref SCRIPT_REGEX: Regex = Regex::new(r"(?is)<script\b([^>]*)>([\s\S]*?)</script>").unwrap();

    /// Attribute regex for parsing block attributes
    static ref ATTR_REGEX: Regex = Regex::new(r#"(?i)([a-z0-9-]+)(?:=(?:"([^"]*)"|'([^']*)'|([^>\s]+)))?"#).unwrap();

    static ref STYLE_REGEX: Regex = Regex::new(r"(?is)<style\b[^>]*>[\s\S]*?</style>").unwrap();
    static ref TEMPLATE_OPEN_RE: Regex = Regex::new(r"(?i)<template\b").unwrap();
    static ref TEMPLATE_CLOSE_RE: Regex = Regex::new(r"(?i)</template\s*>").unwrap();
}

// ═══════════════════════════════════════════════════════════════════════════════
// SFC BLOCKS
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScriptBlock {
    pub content: String,
    pub attributes: HashMap<String, String>,
}

impl ScriptBlock {
    pub fn is_typescript(&self) -> bool {
        matches!(
            self.attributes.get("lang").map(|s| s.as_str()),
            Some("ts") | Some("tsx")
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SfcBlocks {
    pub script: Option<ScriptBlock>,
    /// Outermost `<template>...</template>`, byte-for-byte.
    pub template: Option<String>,
    pub styles: Vec<String>,
}

/// A source is treated as a single-file component when it opens with a tag.
pub fn is_sfc(source: &str) -> bool {
    source.trim_start().starts_with('<')
}

fn parse_attributes(attr_string: &str) -> HashMap<String, String> {
    let mut attributes = HashMap::new();
    for attr_caps in ATTR_REGEX.captures_iter(attr_string) {
        if let Some(name) = attr_caps.get(1) {
            let value = attr_caps
                .get(2)
                .or_else(|| attr_caps.get(3))
                .or_else(|| attr_caps.get(4))
                .map(|m| m.as_str().to_string())
                .unwrap_or_else(|| "true".to_string());
            attributes.insert(name.as_str().to_lowercase(), value);
        }
    }
    attributes
}

fn inside_any(ranges: &[Range<usize>], pos: usize) -> bool {
    ranges.iter().any(|r| r.contains(&pos))
}

/// Split an SFC into script, template and style blocks.
pub fn split_sfc(source: &str) -> SfcBlocks {
    let mut opaque: Vec<Range<usize>> = Vec::new();
    let mut script = None;

    for caps in SCRIPT_REGEX.captures_iter(source) {
        if let Some(whole) = caps.get(0) {
            opaque.push(whole.range());
        }
        if script.is_none() {
            let attr_string = caps.get(1).map(|m| m.as_str()).unwrap_or("");
            let content = caps.get(2).map(|m| m.as_str()).unwrap_or("");
            script = Some(ScriptBlock {
                content: content.to_string(),
                attributes: parse_attributes(attr_string),
            });
        }
    }

    let mut styles = Vec::new();
    for m in STYLE_REGEX.find_iter(source) {
        if inside_any(&opaque, m.start()) {
            continue;
        }
        opaque.push(m.range());
        styles.push(m.as_str().to_string());
    }

    let open = TEMPLATE_OPEN_RE
        .find_iter(source)
        .find(|m| !inside_any(&opaque, m.start()));
    let close = TEMPLATE_CLOSE_RE
        .find_iter(source)
        .filter(|m| !inside_any(&opaque, m.start()))
        .last();
    let template = match (open, close) {
        (Some(o), Some(c)) if c.end() > o.start() => Some(source[o.start()..c.end()].to_string()),
        _ => None,
    };

    SfcBlocks {
        script,
        template,
        styles,
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// SCRIPT PARSING
// ═══════════════════════════════════════════════════════════════════════════════

pub fn script_source_type(typescript: bool) -> SourceType {
    SourceType::default()
        .with_module(true)
        .with_jsx(true)
        .with_typescript(typescript)
}

/// Parse a component script. Any parser error aborts the migration.
pub fn parse_program<'a>(
    allocator: &'a Allocator,
    source: &'a str,
    typescript: bool,
) -> Result<Program<'a>, MigrateError> {
    let ret = Parser::new(allocator, source, script_source_type(typescript)).parse();
    if ret.panicked || !ret.errors.is_empty() {
        let mut errors: Vec<String> = ret.errors.iter().map(|e| e.to_string()).collect();
        if errors.is_empty() {
            errors.push("parser aborted".to_string());
        }
        return Err(MigrateError::Parse { errors });
    }
    Ok(ret.program)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SFC: &str = r#"<template>
  <div>
    <template v-if="ok"><span>{{ count }}</span></template>
  </div>
</template>

<script lang="ts">
export default { data() { return { count: 0 } } }
</script>

<style scoped>
.a { color: red; }
</style>
"#;

    #[test]
    fn test_split_sfc_blocks() {
        let blocks = split_sfc(SFC);
        let script = blocks.script.unwrap();
        assert!(script.content.contains("export default"));
        assert!(script.is_typescript());

        let template = blocks.template.unwrap();
        assert!(template.starts_with("<template>"));
        assert!(template.ends_with("</template>"));
        assert!(template.contains(r#"<template v-if="ok">"#));
        assert_eq!(blocks.styles.len(), 1);
        assert!(blocks.styles[0].starts_with("<style scoped>"));
    }

    #[test]
    fn test_template_tag_in_script_is_ignored() {
        let src = "<script>\nconst t = '<template></template>';\nexport default {}\n</script>";
        let blocks = split_sfc(src);
        assert!(blocks.template.is_none());
        assert!(blocks.script.is_some());
    }

    #[test]
    fn test_is_sfc() {
        assert!(is_sfc("\n  <template></template>"));
        assert!(!is_sfc("export default {}"));
    }

    #[test]
    fn test_parse_failure_is_error() {
        let allocator = Allocator::default();
        let result = parse_program(&allocator, "export default { data() { return ", false);
        assert!(matches!(result, Err(MigrateError::Parse { .. })));
    }

    #[test]
    fn test_parse_ok() {
        let allocator = Allocator::default();
        let program = parse_program(&allocator, "export default { name: 'a' }", false).unwrap();
        assert_eq!(program.body.len(), 1);
    }
}
