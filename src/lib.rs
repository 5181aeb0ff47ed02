//! # Options-to-Composition Migration Ground Truth
//!
//! ## Pipeline Invariants
//!
//! 1. **Single Unit**: one call migrates one component definition. Nothing is
//!    shared between calls; batches are the caller's concern.
//!
//! 2. **Parse Or Abort**: a parser error is the only failure. Every later stage
//!    degrades to best-effort output plus diagnostics.
//!
//! 3. **Fixed Section Order**: output sections always appear as
//!    dependencies, composed behaviors, inputs, state, ambient reads,
//!    derived values, methods, watchers, ambient provides, lifecycle.
//!
//! 4. **Registration Before Use**: a `this.name` access resolves only against
//!    names registered by earlier passes, in the priority
//!    state/computed > input > ambient read > method.
//!    - `this.count` -> `count.value` (state, computed, ambient read)
//!    - `this.row` -> `props.row` (input)
//!    - `this.save` -> `save` (method)
//!    - anything else stays as written behind an advisory comment
//!
//! 5. **Verbatim Carry**: imports, module-level statements, the template and
//!    style blocks are copied byte-for-byte.

#[cfg(feature = "napi")]
use napi_derive::napi;
use oxc_allocator::Allocator;
use serde::{Deserialize, Serialize};

mod codegen;
mod collector;
mod diagnostics;
mod options;
mod parse;
mod registry;
mod resolver;
mod transform;

#[cfg(test)]
mod migration_tests;

pub use codegen::{composable_name, DEFAULT_COMPOSABLE_NAME};
pub use collector::{collect, Classification, ClassifiedMember, Role};
pub use diagnostics::*;
pub use options::{MigrateOptions, OutputMode};
pub use parse::{is_sfc, parse_program, split_sfc, ScriptBlock, SfcBlocks};
pub use registry::{Registry, Resolution};
pub use resolver::{AMBIENT_USE_ADVISORY, UNRESOLVED_ADVISORY};
pub use transform::{transform, Section, SectionKind, TransformOutput, AMBIENT_ADVISORY, PASS_ORDER};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MigrationOutput {
    pub code: String,
    /// Verbatim `<template>` block of the input, when it had one.
    pub template: Option<String>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Migrate either a bare component script or a full `.vue` file.
pub fn migrate_component(source: &str, options: &MigrateOptions) -> Result<MigrationOutput, MigrateError> {
    if !is_sfc(source) {
        return migrate_script(source, options);
    }
    let blocks = split_sfc(source);
    let (script, lang_ts) = match &blocks.script {
        Some(script) => (script.content.as_str(), script.is_typescript()),
        None => ("", false),
    };
    let typescript = options.typescript.unwrap_or(lang_ts);
    let mut output = run(script, typescript, options, Some(&blocks))?;
    output.template = blocks.template.clone();
    Ok(output)
}

/// Migrate the content of a component `<script>` block.
pub fn migrate_script(script: &str, options: &MigrateOptions) -> Result<MigrationOutput, MigrateError> {
    run(script, options.typescript.unwrap_or(false), options, None)
}

fn run(
    script: &str,
    typescript: bool,
    options: &MigrateOptions,
    sfc: Option<&SfcBlocks>,
) -> Result<MigrationOutput, MigrateError> {
    let allocator = Allocator::default();
    let program = parse_program(&allocator, script, typescript)?;
    let classification = collect(&program, script);
    let output = transform(&classification, options);
    let code = codegen::generate(&output, options, classification.component_name.as_deref(), sfc);

    tracing::info!(
        mode = ?options.output_mode,
        diagnostics = output.diagnostics.len(),
        "migrated component"
    );

    Ok(MigrationOutput {
        code,
        template: None,
        diagnostics: output.diagnostics,
    })
}

#[cfg(feature = "napi")]
#[napi]
pub fn migrate_component_native(source: String, options_json: Option<String>) -> napi::Result<String> {
    let options = MigrateOptions::from_json(options_json.as_deref().unwrap_or(""))
        .map_err(|e| napi::Error::from_reason(MigrateError::from(e).to_string()))?;
    let output = migrate_component(&source, &options).map_err(|e| napi::Error::from_reason(e.to_string()))?;
    serde_json::to_string(&output)
        .map_err(|e| napi::Error::from_reason(format!("Invalid MigrationOutput: {}", e)))
}
