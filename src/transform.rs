//! Transformer
//!
//! Ten ordered passes over a [`Classification`]. Each pass emits one
//! [`Section`] of the output and registers the names it binds; a pass only
//! sees names registered by the passes before it.

use serde::Serialize;
use std::collections::BTreeSet;

use oxc_ast::ast::*;
use oxc_span::GetSpan;

use crate::collector::{
    lifecycle_target, property_key_name, strip_parens, Classification, ClassifiedMember,
    FunctionLike, MemberNode,
};
use crate::diagnostics::{
    Diagnostic, SourceLocation, DIAG_COMPOSED_PLACEHOLDER, DIAG_HOIST_DEFINE_PROPS,
    DIAG_UNHANDLED_PROVIDE, DIAG_UNRESOLVED_REFERENCE, DIAG_UNSUPPORTED_MEMBER,
};
use crate::options::{MigrateOptions, OutputMode};
use crate::registry::{Registry, Resolution};
use crate::resolver::{ReferenceResolver, ResolveOutcome, UNRESOLVED_ADVISORY};

/// Written above every `inject` binding.
pub const AMBIENT_ADVISORY: &str =
    "/* [migrate] `.value` on this binding may be unnecessary if the provided value is not a ref */";

// ═══════════════════════════════════════════════════════════════════════════════
// SECTIONS
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SectionKind {
    Dependencies,
    ComposedBehaviors,
    Inputs,
    State,
    AmbientReads,
    DerivedValues,
    Methods,
    Watchers,
    AmbientProvides,
    Lifecycle,
}

pub const PASS_ORDER: [SectionKind; 10] = [
    SectionKind::Dependencies,
    SectionKind::ComposedBehaviors,
    SectionKind::Inputs,
    SectionKind::State,
    SectionKind::AmbientReads,
    SectionKind::DerivedValues,
    SectionKind::Methods,
    SectionKind::Watchers,
    SectionKind::AmbientProvides,
    SectionKind::Lifecycle,
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    pub kind: SectionKind,
    /// One emitted statement per entry, possibly spanning several lines.
    pub items: Vec<String>,
}

impl Section {
    fn new(kind: SectionKind) -> Self {
        Section {
            kind,
            items: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn render(&self) -> String {
        self.items.join("\n")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformOutput {
    /// All ten sections, always in [`PASS_ORDER`].
    pub sections: Vec<Section>,
    /// Runtime primitives the passes used, synthesized into the import block.
    pub primitives: BTreeSet<&'static str>,
    /// State, computed, ambient-read and method names, in emission order.
    pub exposed: Vec<String>,
    pub diagnostics: Vec<Diagnostic>,
}

impl TransformOutput {
    pub fn section(&self, kind: SectionKind) -> Option<&Section> {
        self.sections.iter().find(|s| s.kind == kind)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// TRANSFORMER
// ═══════════════════════════════════════════════════════════════════════════════

pub fn transform(classification: &Classification<'_>, options: &MigrateOptions) -> TransformOutput {
    Transformer::new(classification, options).run()
}

pub struct Transformer<'c, 'a> {
    classification: &'c Classification<'a>,
    options: &'c MigrateOptions,
    registry: Registry,
    primitives: BTreeSet<&'static str>,
    exposed: Vec<String>,
    diagnostics: Vec<Diagnostic>,
}

impl<'c, 'a> Transformer<'c, 'a> {
    pub fn new(classification: &'c Classification<'a>, options: &'c MigrateOptions) -> Self {
        Transformer {
            classification,
            options,
            registry: Registry::new(),
            primitives: BTreeSet::new(),
            exposed: Vec::new(),
            diagnostics: classification.diagnostics.clone(),
        }
    }

    pub fn run(mut self) -> TransformOutput {
        // Passes 2-10 run first so the dependency pass knows every primitive used.
        let mut body = vec![
            self.pass_composed(),
            self.pass_inputs(),
            self.pass_state(),
            self.pass_ambient_reads(),
            self.pass_derived_values(),
            self.pass_methods(),
            self.pass_watchers(),
            self.pass_ambient_provides(),
            self.pass_lifecycle(),
        ];
        let mut sections = vec![self.pass_dependencies()];
        sections.append(&mut body);

        for section in &sections {
            tracing::debug!(section = ?section.kind, items = section.items.len(), "pass complete");
        }

        TransformOutput {
            sections,
            primitives: self.primitives,
            exposed: self.exposed,
            diagnostics: self.diagnostics,
        }
    }

    // ─── helpers ────────────────────────────────────────────────────────────────

    fn text(&self, span: oxc_span::Span) -> &'a str {
        self.classification.text(span)
    }

    fn location(&self, offset: u32) -> SourceLocation {
        SourceLocation::from_offset(self.classification.source, offset)
    }

    fn warn(&mut self, code: &str, message: String, offset: u32) {
        tracing::warn!(code, "{}", message);
        let location = self.location(offset);
        self.diagnostics.push(Diagnostic::warning(code, message, location));
    }

    fn resolver(&self) -> ReferenceResolver<'_> {
        let placeholder = if self.options.annotate_params {
            Some(self.options.placeholder_type.as_str())
        } else {
            None
        };
        ReferenceResolver::new(&self.registry, self.classification.source, placeholder)
    }

    fn absorb(&mut self, outcome: ResolveOutcome) {
        if outcome.next_tick {
            self.primitives.insert("nextTick");
        }
        for unresolved in outcome.unresolved {
            let location = self.location(unresolved.offset);
            self.diagnostics.push(Diagnostic::warning(
                DIAG_UNRESOLVED_REFERENCE,
                format!("`{}` could not be resolved", unresolved.text),
                location,
            ));
        }
    }

    fn resolve_expression(&mut self, expr: &Expression<'_>) -> String {
        let mut resolver = self.resolver();
        let text = resolver.expression(expr);
        let outcome = resolver.finish();
        self.absorb(outcome);
        text
    }

    /// Resolved `(params, body)` of a function-valued member.
    fn resolve_function(&mut self, func: FunctionLike<'_>) -> (String, String) {
        let mut resolver = self.resolver();
        let params = resolver.params(func.params());
        let body = match func.body() {
            Some(body) => resolver.function_body(body),
            None => "{}".to_string(),
        };
        let outcome = resolver.finish();
        self.absorb(outcome);
        (params, body)
    }

    /// `[async ](params) => body`
    fn arrow(&mut self, func: FunctionLike<'_>) -> String {
        let (params, body) = self.resolve_function(func);
        let prefix = if func.is_async() { "async " } else { "" };
        format!("{}{} => {}", prefix, params, body)
    }

    fn function_value(member: &ClassifiedMember<'a>) -> Option<FunctionLike<'a>> {
        member
            .property()
            .and_then(|prop| FunctionLike::from_expression(&prop.value))
    }

    // ─── pass 1 ─────────────────────────────────────────────────────────────────

    fn pass_dependencies(&mut self) -> Section {
        let mut section = Section::new(SectionKind::Dependencies);
        if !self.primitives.is_empty() {
            let names: Vec<&str> = self.primitives.iter().copied().collect();
            section.items.push(format!(
                "import {{ {} }} from '{}';",
                names.join(", "),
                self.options.runtime_module
            ));
        }
        let classification = self.classification;
        for import in &classification.imports {
            section.items.push(self.text(import.span()).to_string());
        }
        for span in &classification.module_items {
            section.items.push(self.text(*span).to_string());
        }
        section
    }

    // ─── pass 2 ─────────────────────────────────────────────────────────────────

    fn pass_composed(&mut self) -> Section {
        let mut section = Section::new(SectionKind::ComposedBehaviors);
        let classification = self.classification;
        for member in &classification.composed {
            section.items.push(format!(
                "const {{ /* [migrate] list the members {} provides */ }} = {}();",
                member.name, member.name
            ));
            let location = self.location(member.span().start);
            self.diagnostics.push(Diagnostic::info(
                DIAG_COMPOSED_PLACEHOLDER,
                format!("destructure the members used from `{}()`", member.name),
                location,
            ));
        }
        section
    }

    // ─── pass 3 ─────────────────────────────────────────────────────────────────

    fn pass_inputs(&mut self) -> Section {
        let mut section = Section::new(SectionKind::Inputs);
        let classification = self.classification;
        if classification.inputs.is_empty() {
            return section;
        }

        let array_form = matches!(classification.inputs[0].node, MemberNode::Expression(_));
        let entries: Vec<&str> = classification
            .inputs
            .iter()
            .map(|member| self.text(member.span()))
            .collect();
        let declaration = if array_form {
            format!("const props = defineProps([{}]);", entries.join(", "))
        } else {
            let body: String = entries.iter().map(|e| format!("  {},\n", e)).collect();
            format!("const props = defineProps({{\n{}}});", body)
        };
        section.items.push(declaration);

        for member in &classification.inputs {
            self.registry.add_input(&member.name);
        }

        if self.options.output_mode == OutputMode::Composable {
            let location = self.location(classification.inputs[0].span().start);
            self.diagnostics.push(Diagnostic::info(
                DIAG_HOIST_DEFINE_PROPS,
                "`defineProps` was emitted inside the composable".to_string(),
                location,
            ));
        }
        section
    }

    // ─── pass 4 ─────────────────────────────────────────────────────────────────

    fn pass_state(&mut self) -> Section {
        let mut section = Section::new(SectionKind::State);
        let classification = self.classification;
        for member in &classification.state {
            let prop = match member.property() {
                Some(prop) => prop,
                None => continue,
            };
            let init = self.resolve_expression(&prop.value);
            section
                .items
                .push(format!("const {} = ref({});", member.name, init));
            self.primitives.insert("ref");
            // Initializers run eagerly: later fields may read earlier ones.
            self.registry.add_state(&member.name);
            self.exposed.push(member.name.clone());
        }
        section
    }

    // ─── pass 5 ─────────────────────────────────────────────────────────────────

    fn pass_ambient_reads(&mut self) -> Section {
        let mut section = Section::new(SectionKind::AmbientReads);
        let classification = self.classification;
        for member in &classification.ambient_reads {
            let source = match &member.ambient {
                Some(source) => source,
                None => continue,
            };
            let mut args = vec![source.key.clone()];
            if let Some(default) = source.default {
                args.push(self.resolve_expression(default));
                if FunctionLike::from_expression(default).is_some() {
                    args.push("true".to_string());
                }
            }
            section.items.push(format!(
                "{}\nconst {} = inject({});",
                AMBIENT_ADVISORY,
                member.name,
                args.join(", ")
            ));
            self.primitives.insert("inject");
            self.registry.add_ambient_read(&member.name);
            self.exposed.push(member.name.clone());
        }
        section
    }

    // ─── pass 6 ─────────────────────────────────────────────────────────────────

    fn pass_derived_values(&mut self) -> Section {
        let mut section = Section::new(SectionKind::DerivedValues);
        let classification = self.classification;
        // Getters are evaluated lazily, so every derived value is visible to all of them.
        for member in &classification.computed {
            self.registry.add_computed(&member.name);
        }
        for member in &classification.computed {
            let func = match Self::function_value(member) {
                Some(func) => func,
                None => continue,
            };
            let (_, body) = self.resolve_function(func);
            section
                .items
                .push(format!("const {} = computed(() => {});", member.name, body));
            self.primitives.insert("computed");
            self.exposed.push(member.name.clone());
        }
        section
    }

    // ─── pass 7 ─────────────────────────────────────────────────────────────────

    fn pass_methods(&mut self) -> Section {
        let mut section = Section::new(SectionKind::Methods);
        let classification = self.classification;
        // Function declarations hoist, so methods may call each other in any order.
        for member in &classification.methods {
            self.registry.add_method(&member.name);
        }
        for member in &classification.methods {
            let func = match Self::function_value(member) {
                Some(func) => func,
                None => continue,
            };
            let declaration = match func {
                FunctionLike::Function(_) => {
                    let (params, body) = self.resolve_function(func);
                    let async_prefix = if func.is_async() { "async " } else { "" };
                    let star = if func.is_generator() { "*" } else { "" };
                    format!("{}function{} {}{} {}", async_prefix, star, member.name, params, body)
                }
                FunctionLike::Arrow(_) => format!("const {} = {};", member.name, self.arrow(func)),
            };
            section.items.push(declaration);
            self.exposed.push(member.name.clone());
        }
        section
    }

    // ─── pass 8 ─────────────────────────────────────────────────────────────────

    fn pass_watchers(&mut self) -> Section {
        let mut section = Section::new(SectionKind::Watchers);
        let classification = self.classification;
        for member in &classification.watchers {
            let prop = match member.property() {
                Some(prop) => prop,
                None => continue,
            };
            let handler = match self.watch_handler(&prop.value) {
                Some(handler) => handler,
                None => {
                    self.warn(
                        DIAG_UNSUPPORTED_MEMBER,
                        format!("watcher `{}` has an unsupported handler", member.name),
                        prop.span.start,
                    );
                    continue;
                }
            };
            let watched = self.watch_source(&member.name, prop.span.start);
            let call = match handler.1 {
                Some(options) => format!("watch({}, {}, {});", watched, handler.0, options),
                None => format!("watch({}, {});", watched, handler.0),
            };
            section.items.push(call);
            self.primitives.insert("watch");
        }
        section
    }

    /// Observed-expression getter for a watch key such as `row` or `'item.name'`.
    fn watch_source(&mut self, key: &str, offset: u32) -> String {
        let (head, rest) = match key.find('.') {
            Some(dot) => (&key[..dot], &key[dot..]),
            None => (key, ""),
        };
        match self.registry.resolve(head) {
            Some(Resolution::Input) => format!("() => props.{}{}", head, rest),
            Some(Resolution::Reactive) | Some(Resolution::AmbientRead) => {
                self.primitives.insert("unref");
                format!("() => unref({}){}", head, rest)
            }
            _ => {
                let location = self.location(offset);
                self.diagnostics.push(Diagnostic::warning(
                    DIAG_UNRESOLVED_REFERENCE,
                    format!("watched name `{}` could not be resolved", key),
                    location,
                ));
                format!("() => {} this.{}", UNRESOLVED_ADVISORY, key)
            }
        }
    }

    /// Handler text plus the trailing options object, if any.
    fn watch_handler(&mut self, value: &'a Expression<'a>) -> Option<(String, Option<String>)> {
        if let Some(func) = FunctionLike::from_expression(value) {
            return Some((self.arrow(func), None));
        }
        match strip_parens(value) {
            Expression::StringLiteral(name) => self.named_method(name.value.as_str()).map(|h| (h, None)),
            Expression::ObjectExpression(obj) => {
                let mut handler = None;
                let mut options = Vec::new();
                for kind in obj.properties.iter() {
                    let prop = match kind {
                        ObjectPropertyKind::ObjectProperty(prop) => prop,
                        ObjectPropertyKind::SpreadProperty(_) => continue,
                    };
                    match property_key_name(&prop.key).as_deref() {
                        Some("handler") => {
                            handler = match FunctionLike::from_expression(&prop.value) {
                                Some(func) => Some(self.arrow(func)),
                                None => match strip_parens(&prop.value) {
                                    Expression::StringLiteral(name) => self.named_method(name.value.as_str()),
                                    _ => None,
                                },
                            };
                        }
                        Some(_) if is_literal(&prop.value) => {
                            options.push(self.text(prop.span).to_string());
                        }
                        _ => {
                            self.warn(
                                DIAG_UNSUPPORTED_MEMBER,
                                "only literal watcher options are passed through".to_string(),
                                prop.span.start,
                            );
                        }
                    }
                }
                let options = if options.is_empty() {
                    None
                } else {
                    Some(format!("{{ {} }}", options.join(", ")))
                };
                handler.map(|h| (h, options))
            }
            _ => None,
        }
    }

    fn named_method(&self, name: &str) -> Option<String> {
        if self.registry.is_method(name) {
            Some(name.to_string())
        } else {
            None
        }
    }

    // ─── pass 9 ─────────────────────────────────────────────────────────────────

    fn pass_ambient_provides(&mut self) -> Section {
        let mut section = Section::new(SectionKind::AmbientProvides);
        let classification = self.classification;
        for member in &classification.ambient_provides {
            let prop = match member.property() {
                Some(prop) => prop,
                None => continue,
            };
            if prop.computed {
                self.warn(
                    DIAG_UNHANDLED_PROVIDE,
                    format!("provide key `{}` is dynamic", member.name),
                    prop.span.start,
                );
                continue;
            }
            let key = match &prop.key {
                PropertyKey::StringLiteral(s) => self.text(s.span).to_string(),
                PropertyKey::StaticIdentifier(id) => format!("'{}'", id.name),
                other => self.text(other.span()).to_string(),
            };
            let value = provided_name(&prop.value).and_then(|name| {
                if self.registry.is_state(name) || self.registry.is_computed(name) {
                    Some(name.to_string())
                } else if self.registry.is_input(name) {
                    Some(format!("props.{}", name))
                } else {
                    None
                }
            });
            match value {
                Some(value) => {
                    section.items.push(format!("provide({}, {});", key, value));
                    self.primitives.insert("provide");
                }
                None => self.warn(
                    DIAG_UNHANDLED_PROVIDE,
                    format!("provide `{}` does not name a state field or prop", member.name),
                    prop.span.start,
                ),
            }
        }
        section
    }

    // ─── pass 10 ────────────────────────────────────────────────────────────────

    fn pass_lifecycle(&mut self) -> Section {
        let mut section = Section::new(SectionKind::Lifecycle);
        let classification = self.classification;
        // beforeCreate/created run inline ahead of every registered hook.
        let (inline, registered): (Vec<&ClassifiedMember<'a>>, Vec<&ClassifiedMember<'a>>) = classification
            .lifecycle
            .iter()
            .partition(|member| lifecycle_target(&member.name) == Some(None));

        for member in inline.into_iter().chain(registered) {
            let func = match Self::function_value(member) {
                Some(func) => func,
                None => continue,
            };
            let arrow = self.arrow(func);
            match lifecycle_target(&member.name).flatten() {
                Some(target) => {
                    section.items.push(format!("{}({});", target, arrow));
                    self.primitives.insert(target);
                }
                None => section.items.push(format!("({})();", arrow)),
            }
        }
        section
    }
}

fn is_literal(expr: &Expression<'_>) -> bool {
    matches!(
        strip_parens(expr),
        Expression::BooleanLiteral(_)
            | Expression::NumericLiteral(_)
            | Expression::StringLiteral(_)
            | Expression::NullLiteral(_)
    )
}

/// `this.name` or a bare `name`: the only provide values that are bound.
fn provided_name<'b>(expr: &'b Expression<'_>) -> Option<&'b str> {
    match strip_parens(expr) {
        Expression::StaticMemberExpression(member)
            if matches!(member.object, Expression::ThisExpression(_)) =>
        {
            Some(member.property.name.as_str())
        }
        Expression::Identifier(id) => Some(id.name.as_str()),
        _ => None,
    }
}
