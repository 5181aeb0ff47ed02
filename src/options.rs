use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum OutputMode {
    /// `export function useX() { ...; return { ... } }`
    #[default]
    Composable,
    /// `<script setup lang="ts">` paired with the original template.
    ScriptSetup,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct MigrateOptions {
    pub output_mode: OutputMode,
    /// Name of the exported composable. Derived from the component `name` when absent.
    pub composable_name: Option<String>,
    /// Module the synthesized reactivity imports come from.
    pub runtime_module: String,
    /// Parse the script as TypeScript. `None` follows the SFC `lang` attribute.
    pub typescript: Option<bool>,
    pub annotate_params: bool,
    pub placeholder_type: String,
}

impl Default for MigrateOptions {
    fn default() -> Self {
        MigrateOptions {
            output_mode: OutputMode::Composable,
            composable_name: None,
            runtime_module: "vue".to_string(),
            typescript: None,
            annotate_params: true,
            placeholder_type: "any".to_string(),
        }
    }
}

impl MigrateOptions {
    pub fn script_setup() -> Self {
        MigrateOptions {
            output_mode: OutputMode::ScriptSetup,
            ..Default::default()
        }
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        if json.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_str(json)
    }
}
