//! Codegen module
//!
//! Assembles transform sections into the final text, either as an exported
//! composable function or as a `<script setup>` single-file component.

use crate::options::{MigrateOptions, OutputMode};
use crate::parse::SfcBlocks;
use crate::transform::{SectionKind, TransformOutput};

// ═══════════════════════════════════════════════════════════════════════════════
// NAMING
// ═══════════════════════════════════════════════════════════════════════════════

pub const DEFAULT_COMPOSABLE_NAME: &str = "useComponent";

fn upper_case_first_char(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `form-item` -> `useFormItem`
pub fn composable_name(options: &MigrateOptions, component_name: Option<&str>) -> String {
    if let Some(name) = options.composable_name.as_deref() {
        return name.to_string();
    }
    let pascal: String = component_name
        .unwrap_or("")
        .split(|c: char| !c.is_ascii_alphanumeric() && c != '$')
        .filter(|part| !part.is_empty())
        .map(upper_case_first_char)
        .collect();
    match pascal.chars().next() {
        Some(first) if !first.is_ascii_digit() => format!("use{}", pascal),
        _ => DEFAULT_COMPOSABLE_NAME.to_string(),
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// ASSEMBLY
// ═══════════════════════════════════════════════════════════════════════════════

fn render_dependencies(output: &TransformOutput) -> String {
    output
        .section(SectionKind::Dependencies)
        .map(|s| s.render())
        .unwrap_or_default()
}

/// Sections 2-10, blank-line separated, empty sections skipped.
fn render_body(output: &TransformOutput) -> String {
    output
        .sections
        .iter()
        .filter(|s| s.kind != SectionKind::Dependencies && !s.is_empty())
        .map(|s| s.render())
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn join_blocks(blocks: &[String]) -> String {
    blocks
        .iter()
        .filter(|b| !b.is_empty())
        .cloned()
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn generate_composable(output: &TransformOutput, name: &str) -> String {
    let mut function = format!("export function {}() {{\n", name);
    let body = render_body(output);
    if !body.is_empty() {
        function.push_str(&body);
        function.push_str("\n\n");
    }
    if output.exposed.is_empty() {
        function.push_str("return {};\n}");
    } else {
        function.push_str(&format!("return {{ {} }};\n}}", output.exposed.join(", ")));
    }

    let mut code = join_blocks(&[render_dependencies(output), function]);
    code.push('\n');
    code
}

pub fn generate_script_setup(output: &TransformOutput, sfc: Option<&SfcBlocks>) -> String {
    let script_body = join_blocks(&[render_dependencies(output), render_body(output)]);
    let mut blocks = vec![format!("<script setup lang=\"ts\">\n{}\n</script>", script_body)];
    if let Some(sfc) = sfc {
        if let Some(template) = &sfc.template {
            blocks.push(template.clone());
        }
        blocks.extend(sfc.styles.iter().cloned());
    }
    let mut code = join_blocks(&blocks);
    code.push('\n');
    code
}

pub fn generate(
    output: &TransformOutput,
    options: &MigrateOptions,
    component_name: Option<&str>,
    sfc: Option<&SfcBlocks>,
) -> String {
    match options.output_mode {
        OutputMode::Composable => {
            let name = composable_name(options, component_name);
            tracing::debug!(name = %name, "emitting composable");
            generate_composable(output, &name)
        }
        OutputMode::ScriptSetup => generate_script_setup(output, sfc),
    }
}
