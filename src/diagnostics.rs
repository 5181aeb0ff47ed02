use serde::{Deserialize, Serialize};
use thiserror::Error;

// ═══════════════════════════════════════════════════════════════════════════════
// DIAGNOSTIC CODES
// ═══════════════════════════════════════════════════════════════════════════════

pub const DIAG_NO_COMPONENT: &str = "M2C001";
pub const DIAG_UNSUPPORTED_STATE: &str = "M2C002";
pub const DIAG_UNSUPPORTED_COMPUTED: &str = "M2C003";
pub const DIAG_UNSUPPORTED_MEMBER: &str = "M2C004";
pub const DIAG_UNSUPPORTED_COMPOSED: &str = "M2C005";
pub const DIAG_UNHANDLED_PROVIDE: &str = "M2C006";
pub const DIAG_UNRESOLVED_REFERENCE: &str = "M2C007";
pub const DIAG_UNKNOWN_OPTION: &str = "M2C008";
pub const DIAG_COMPOSED_PLACEHOLDER: &str = "M2C009";
pub const DIAG_HOIST_DEFINE_PROPS: &str = "M2C010";

fn get_hint(code: &str) -> &'static str {
    match code {
        DIAG_NO_COMPONENT => "Expected `export default { ... }` or `export default defineComponent({ ... })`.",
        DIAG_UNSUPPORTED_STATE => "Only `key: value` pairs of a returned object literal become refs.",
        DIAG_UNSUPPORTED_COMPUTED => "Getter/setter computed pairs must be rewritten as `computed({ get, set })` by hand.",
        DIAG_UNSUPPORTED_MEMBER => "The entry shape is not recognized and was left out of the output.",
        DIAG_UNSUPPORTED_COMPOSED => "Only identifier mixin references can be turned into composable calls.",
        DIAG_UNHANDLED_PROVIDE => "Only static keys whose value names a state or prop field are provided.",
        DIAG_UNRESOLVED_REFERENCE => "The access was kept as-is and marked for manual migration.",
        DIAG_UNKNOWN_OPTION => "The option has no composition equivalent and was dropped.",
        DIAG_COMPOSED_PLACEHOLDER => "Fill in the destructured members exposed by the composable.",
        DIAG_HOIST_DEFINE_PROPS => "`defineProps` only works in `<script setup>`; move it to the host component.",
        _ => "",
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// DIAGNOSTICS CHANNEL
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SourceLocation {
    pub line: u32,
    pub column: u32,
}

impl SourceLocation {
    /// 1-based line/column of a byte offset into `source`.
    pub fn from_offset(source: &str, offset: u32) -> Self {
        let offset = (offset as usize).min(source.len());
        let before = &source[..offset];
        let line = before.matches('\n').count() as u32 + 1;
        let line_start = before.rfind('\n').map_or(0, |i| i + 1);
        let column = before[line_start..].chars().count() as u32 + 1;
        SourceLocation { line, column }
    }
}

/// Structured report for an entry that was omitted or only partially migrated.
/// Diagnostics never change the emitted text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    pub code: String,
    pub severity: Severity,
    pub message: String,
    pub hint: String,
    pub location: SourceLocation,
}

impl Diagnostic {
    pub fn new(code: &str, severity: Severity, message: String, location: SourceLocation) -> Self {
        Diagnostic {
            code: code.to_string(),
            severity,
            message,
            hint: get_hint(code).to_string(),
            location,
        }
    }

    pub fn warning(code: &str, message: String, location: SourceLocation) -> Self {
        Self::new(code, Severity::Warning, message, location)
    }

    pub fn info(code: &str, message: String, location: SourceLocation) -> Self {
        Self::new(code, Severity::Info, message, location)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// ERRORS
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Error)]
pub enum MigrateError {
    /// The script could not be parsed; the migration never starts.
    #[error("failed to parse component script: {}", .errors.join("; "))]
    Parse { errors: Vec<String> },

    #[error("invalid migrate options: {0}")]
    Options(#[from] serde_json::Error),
}
