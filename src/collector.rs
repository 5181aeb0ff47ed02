//! Collector
//!
//! Walks the top-level members of one options-style component definition and
//! sorts them into role buckets. The Collector never fails: shapes it does not
//! recognize are left out of every bucket and reported as diagnostics.

use lazy_static::lazy_static;
use oxc_ast::ast::*;
use oxc_span::{GetSpan, Span};
use regex::Regex;
use serde::Serialize;

use crate::diagnostics::{
    Diagnostic, SourceLocation, DIAG_NO_COMPONENT, DIAG_UNKNOWN_OPTION, DIAG_UNSUPPORTED_COMPOSED,
    DIAG_UNSUPPORTED_COMPUTED, DIAG_UNSUPPORTED_MEMBER, DIAG_UNSUPPORTED_STATE,
};

/// Lifecycle option names and the registration call each maps to.
/// `None` marks hooks that run before the instance exists; they are inlined.
pub const LIFECYCLE_HOOKS: &[(&str, Option<&str>)] = &[
    ("beforeCreate", None),
    ("created", None),
    ("beforeMount", Some("onBeforeMount")),
    ("mounted", Some("onMounted")),
    ("beforeUpdate", Some("onBeforeUpdate")),
    ("updated", Some("onUpdated")),
    ("beforeDestroy", Some("onBeforeUnmount")),
    ("destroyed", Some("onUnmounted")),
    ("beforeUnmount", Some("onBeforeUnmount")),
    ("unmounted", Some("onUnmounted")),
    ("activated", Some("onActivated")),
    ("deactivated", Some("onDeactivated")),
    ("errorCaptured", Some("onErrorCaptured")),
];

pub fn lifecycle_target(hook: &str) -> Option<Option<&'static str>> {
    LIFECYCLE_HOOKS
        .iter()
        .find(|(name, _)| *name == hook)
        .map(|(_, target)| *target)
}

// ═══════════════════════════════════════════════════════════════════════════════
// CLASSIFIED MEMBERS
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Role {
    State,
    Input,
    Computed,
    AmbientRead,
    AmbientProvide,
    Method,
    Watcher,
    Lifecycle,
    ComposedBehavior,
    ImportDependency,
}

/// The syntax node a member was classified from.
#[derive(Debug, Clone, Copy)]
pub enum MemberNode<'a> {
    Property(&'a ObjectProperty<'a>),
    Expression(&'a Expression<'a>),
    Statement(&'a Statement<'a>),
}

impl<'a> MemberNode<'a> {
    pub fn span(&self) -> Span {
        match self {
            MemberNode::Property(prop) => prop.span,
            MemberNode::Expression(expr) => expr.span(),
            MemberNode::Statement(stmt) => stmt.span(),
        }
    }
}

/// Normalized `inject` entry: every accepted shape ends up as key + optional default.
#[derive(Debug, Clone)]
pub struct AmbientSource<'a> {
    /// Key expression as source text, e.g. `'formTable'` or `THEME_KEY`.
    pub key: String,
    pub default: Option<&'a Expression<'a>>,
}

#[derive(Debug, Clone)]
pub struct ClassifiedMember<'a> {
    pub name: String,
    pub role: Role,
    pub node: MemberNode<'a>,
    pub ambient: Option<AmbientSource<'a>>,
}

impl<'a> ClassifiedMember<'a> {
    fn new(name: String, role: Role, node: MemberNode<'a>) -> Self {
        ClassifiedMember {
            name,
            role,
            node,
            ambient: None,
        }
    }

    pub fn span(&self) -> Span {
        self.node.span()
    }

    pub fn property(&self) -> Option<&'a ObjectProperty<'a>> {
        match self.node {
            MemberNode::Property(prop) => Some(prop),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Classification<'a> {
    pub source: &'a str,
    pub component_found: bool,
    pub component_name: Option<String>,
    pub imports: Vec<ClassifiedMember<'a>>,
    /// Top-level statements that are neither imports nor the component itself.
    pub module_items: Vec<Span>,
    pub state: Vec<ClassifiedMember<'a>>,
    pub inputs: Vec<ClassifiedMember<'a>>,
    pub computed: Vec<ClassifiedMember<'a>>,
    pub ambient_reads: Vec<ClassifiedMember<'a>>,
    pub ambient_provides: Vec<ClassifiedMember<'a>>,
    pub methods: Vec<ClassifiedMember<'a>>,
    pub watchers: Vec<ClassifiedMember<'a>>,
    pub lifecycle: Vec<ClassifiedMember<'a>>,
    pub composed: Vec<ClassifiedMember<'a>>,
    pub diagnostics: Vec<Diagnostic>,
}

impl<'a> Classification<'a> {
    fn empty(source: &'a str) -> Self {
        Classification {
            source,
            component_found: false,
            component_name: None,
            imports: Vec::new(),
            module_items: Vec::new(),
            state: Vec::new(),
            inputs: Vec::new(),
            computed: Vec::new(),
            ambient_reads: Vec::new(),
            ambient_provides: Vec::new(),
            methods: Vec::new(),
            watchers: Vec::new(),
            lifecycle: Vec::new(),
            composed: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    pub fn text(&self, span: Span) -> &'a str {
        &self.source[span.start as usize..span.end as usize]
    }
}

/// Object-literal overwrite semantics: a repeated name keeps its first
/// position but takes the last definition.
fn upsert<'a>(bucket: &mut Vec<ClassifiedMember<'a>>, member: ClassifiedMember<'a>) {
    if let Some(existing) = bucket.iter_mut().find(|m| m.name == member.name) {
        *existing = member;
    } else {
        bucket.push(member);
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// AST HELPERS
// ═══════════════════════════════════════════════════════════════════════════════

pub fn property_key_name(key: &PropertyKey) -> Option<String> {
    match key {
        PropertyKey::StaticIdentifier(id) => Some(id.name.to_string()),
        PropertyKey::StringLiteral(s) => Some(s.value.to_string()),
        _ => None,
    }
}

lazy_static! {
    static ref IDENTIFIER_REGEX: Regex = Regex::new(r"^[\p{L}_$][\p{L}\p{N}_$]*$").unwrap();
}

/// Words that cannot name a `const` or `function` binding in module code.
const RESERVED_WORDS: &[&str] = &[
    "arguments", "await", "break", "case", "catch", "class", "const", "continue", "debugger",
    "default", "delete", "do", "else", "enum", "eval", "export", "extends", "false", "finally",
    "for", "function", "if", "implements", "import", "in", "instanceof", "interface", "let",
    "new", "null", "package", "private", "protected", "public", "return", "static", "super",
    "switch", "this", "throw", "true", "try", "typeof", "var", "void", "while", "with", "yield",
];

/// `count` yes; `my-key`, `2fa`, `delete` no.
pub fn is_binding_name(name: &str) -> bool {
    IDENTIFIER_REGEX.is_match(name) && !RESERVED_WORDS.contains(&name)
}

pub fn strip_parens<'a, 'b>(mut expr: &'b Expression<'a>) -> &'b Expression<'a> {
    while let Expression::ParenthesizedExpression(paren) = expr {
        expr = &paren.expression;
    }
    expr
}

/// Function-valued member: method shorthand, `function` expression or arrow.
#[derive(Debug, Clone, Copy)]
pub enum FunctionLike<'a> {
    Function(&'a Function<'a>),
    Arrow(&'a ArrowFunctionExpression<'a>),
}

impl<'a> FunctionLike<'a> {
    pub fn from_expression(expr: &'a Expression<'a>) -> Option<Self> {
        match strip_parens(expr) {
            Expression::FunctionExpression(func) => Some(FunctionLike::Function(func)),
            Expression::ArrowFunctionExpression(arrow) => Some(FunctionLike::Arrow(arrow)),
            _ => None,
        }
    }

    pub fn is_async(&self) -> bool {
        match *self {
            FunctionLike::Function(func) => func.r#async,
            FunctionLike::Arrow(arrow) => arrow.r#async,
        }
    }

    pub fn is_generator(&self) -> bool {
        match *self {
            FunctionLike::Function(func) => func.generator,
            FunctionLike::Arrow(_) => false,
        }
    }

    pub fn params(&self) -> &'a FormalParameters<'a> {
        match *self {
            FunctionLike::Function(func) => &func.params,
            FunctionLike::Arrow(arrow) => &arrow.params,
        }
    }

    pub fn body(&self) -> Option<&'a FunctionBody<'a>> {
        match *self {
            FunctionLike::Function(func) => func.body.as_deref(),
            FunctionLike::Arrow(arrow) => Some(&arrow.body),
        }
    }

    /// `x => x + 1` rather than `x => { ... }`
    pub fn is_expression_body(&self) -> bool {
        matches!(*self, FunctionLike::Arrow(arrow) if arrow.expression)
    }

    /// The object literal a `data()`/`provide()` style function returns, if any.
    pub fn returned_object(&self) -> Option<&'a ObjectExpression<'a>> {
        let body = self.body()?;
        if self.is_expression_body() {
            if let Some(Statement::ExpressionStatement(stmt)) = body.statements.first() {
                if let Expression::ObjectExpression(obj) = strip_parens(&stmt.expression) {
                    return Some(obj);
                }
            }
            return None;
        }
        body.statements.iter().find_map(|stmt| match stmt {
            Statement::ReturnStatement(ret) => match ret.argument.as_ref().map(strip_parens) {
                Some(Expression::ObjectExpression(obj)) => Some(&**obj),
                _ => None,
            },
            _ => None,
        })
    }
}

fn find_component_object<'a>(
    program: &'a Program<'a>,
) -> Option<(&'a ObjectExpression<'a>, Option<Span>)> {
    for stmt in program.body.iter() {
        if let Statement::ExportDefaultDeclaration(decl) = stmt {
            return match &decl.declaration {
                ExportDefaultDeclarationKind::ObjectExpression(obj) => Some((&**obj, None)),
                // defineComponent({ ... }) / Vue.extend({ ... })
                ExportDefaultDeclarationKind::CallExpression(call) => {
                    match call.arguments.first() {
                        Some(Argument::ObjectExpression(obj)) => Some((&**obj, None)),
                        _ => None,
                    }
                }
                // const Comp = { ... }; export default Comp
                ExportDefaultDeclarationKind::Identifier(id) => {
                    find_named_object(program, id.name.as_str())
                }
                _ => None,
            };
        }
    }
    None
}

fn find_named_object<'a>(
    program: &'a Program<'a>,
    name: &str,
) -> Option<(&'a ObjectExpression<'a>, Option<Span>)> {
    for stmt in program.body.iter() {
        if let Statement::VariableDeclaration(var_decl) = stmt {
            for decl in &var_decl.declarations {
                if let BindingPattern::BindingIdentifier(id) = &decl.id {
                    if id.name.as_str() == name {
                        if let Some(Expression::ObjectExpression(obj)) =
                            decl.init.as_ref().map(strip_parens)
                        {
                            return Some((&**obj, Some(var_decl.span)));
                        }
                    }
                }
            }
        }
    }
    None
}

// ═══════════════════════════════════════════════════════════════════════════════
// COLLECTOR
// ═══════════════════════════════════════════════════════════════════════════════

pub fn collect<'a>(program: &'a Program<'a>, source: &'a str) -> Classification<'a> {
    let mut collector = Collector {
        out: Classification::empty(source),
    };
    collector.collect_program(program);
    tracing::debug!(
        state = collector.out.state.len(),
        inputs = collector.out.inputs.len(),
        computed = collector.out.computed.len(),
        methods = collector.out.methods.len(),
        watchers = collector.out.watchers.len(),
        "collected component members"
    );
    collector.out
}

struct Collector<'a> {
    out: Classification<'a>,
}

impl<'a> Collector<'a> {
    fn report(&mut self, code: &str, message: String, span: Span) {
        tracing::warn!(code, "{}", message);
        let location = SourceLocation::from_offset(self.out.source, span.start);
        self.out
            .diagnostics
            .push(Diagnostic::warning(code, message, location));
    }

    fn collect_program(&mut self, program: &'a Program<'a>) {
        let component = find_component_object(program);
        let consumed = component.and_then(|(_, span)| span);

        for stmt in program.body.iter() {
            match stmt {
                Statement::ImportDeclaration(import) => {
                    self.out.imports.push(ClassifiedMember::new(
                        import.source.value.to_string(),
                        Role::ImportDependency,
                        MemberNode::Statement(stmt),
                    ));
                }
                Statement::ExportDefaultDeclaration(_) => {}
                _ => {
                    if Some(stmt.span()) != consumed {
                        self.out.module_items.push(stmt.span());
                    }
                }
            }
        }

        match component {
            Some((obj, _)) => {
                self.out.component_found = true;
                self.collect_options(obj);
            }
            None => {
                let location = SourceLocation::from_offset(self.out.source, 0);
                self.out.diagnostics.push(Diagnostic::warning(
                    DIAG_NO_COMPONENT,
                    "no component definition object found".to_string(),
                    location,
                ));
            }
        }
    }

    fn collect_options(&mut self, obj: &'a ObjectExpression<'a>) {
        for kind in obj.properties.iter() {
            let prop = match kind {
                ObjectPropertyKind::ObjectProperty(prop) => &**prop,
                ObjectPropertyKind::SpreadProperty(spread) => {
                    self.report(
                        DIAG_UNSUPPORTED_MEMBER,
                        "spread in component options is not migrated".to_string(),
                        spread.span,
                    );
                    continue;
                }
            };
            let key = match property_key_name(&prop.key) {
                Some(key) => key,
                None => continue,
            };

            match key.as_str() {
                "name" => {
                    if let Expression::StringLiteral(s) = &prop.value {
                        self.out.component_name = Some(s.value.to_string());
                    }
                }
                "data" => self.collect_state(prop),
                "props" => self.collect_inputs(&prop.value),
                "computed" => self.collect_computed(&prop.value),
                "inject" => self.collect_ambient_reads(&prop.value),
                "provide" => self.collect_ambient_provides(&prop.value),
                "methods" => self.collect_methods(&prop.value),
                "watch" => self.collect_watchers(&prop.value),
                "mixins" => self.collect_composed(&prop.value),
                "extends" => self.collect_composed_reference(&prop.value),
                hook if lifecycle_target(hook).is_some() => {
                    if FunctionLike::from_expression(&prop.value).is_some() {
                        upsert(
                            &mut self.out.lifecycle,
                            ClassifiedMember::new(key.clone(), Role::Lifecycle, MemberNode::Property(prop)),
                        );
                    } else {
                        self.report(
                            DIAG_UNSUPPORTED_MEMBER,
                            format!("lifecycle hook `{}` is not a function", key),
                            prop.span,
                        );
                    }
                }
                other => {
                    let location = SourceLocation::from_offset(self.out.source, prop.span.start);
                    self.out.diagnostics.push(Diagnostic::info(
                        DIAG_UNKNOWN_OPTION,
                        format!("option `{}` was dropped", other),
                        location,
                    ));
                }
            }
        }
    }

    fn collect_state(&mut self, prop: &'a ObjectProperty<'a>) {
        let returned = FunctionLike::from_expression(&prop.value).and_then(|f| f.returned_object());
        let obj = match returned {
            Some(obj) => obj,
            None => {
                self.report(
                    DIAG_UNSUPPORTED_STATE,
                    "`data` does not return an object literal".to_string(),
                    prop.span,
                );
                return;
            }
        };
        for kind in obj.properties.iter() {
            match kind {
                ObjectPropertyKind::ObjectProperty(field)
                    if field.kind == PropertyKind::Init && !field.method && !field.computed =>
                {
                    match property_key_name(&field.key) {
                        Some(name) if is_binding_name(&name) => upsert(
                            &mut self.out.state,
                            ClassifiedMember::new(name, Role::State, MemberNode::Property(&**field)),
                        ),
                        Some(name) => self.report(
                            DIAG_UNSUPPORTED_STATE,
                            format!("state key `{}` is not a valid binding name", name),
                            field.span,
                        ),
                        None => {
                            self.report(DIAG_UNSUPPORTED_STATE, "unsupported state key".to_string(), field.span)
                        }
                    }
                }
                other => {
                    self.report(
                        DIAG_UNSUPPORTED_STATE,
                        "only `key: value` state fields are migrated".to_string(),
                        other.span(),
                    );
                }
            }
        }
    }

    fn collect_inputs(&mut self, value: &'a Expression<'a>) {
        match strip_parens(value) {
            Expression::ObjectExpression(obj) => {
                for kind in obj.properties.iter() {
                    match kind {
                        ObjectPropertyKind::ObjectProperty(prop) if !prop.computed => {
                            if let Some(name) = property_key_name(&prop.key) {
                                upsert(
                                    &mut self.out.inputs,
                                    ClassifiedMember::new(name, Role::Input, MemberNode::Property(&**prop)),
                                );
                            }
                        }
                        other => self.report(
                            DIAG_UNSUPPORTED_MEMBER,
                            "unsupported prop declaration".to_string(),
                            other.span(),
                        ),
                    }
                }
            }
            Expression::ArrayExpression(arr) => {
                for elem in arr.elements.iter() {
                    match elem.as_expression() {
                        Some(expr @ Expression::StringLiteral(s)) => upsert(
                            &mut self.out.inputs,
                            ClassifiedMember::new(s.value.to_string(), Role::Input, MemberNode::Expression(expr)),
                        ),
                        _ => self.report(
                            DIAG_UNSUPPORTED_MEMBER,
                            "prop array entries must be string literals".to_string(),
                            elem.span(),
                        ),
                    }
                }
            }
            other => self.report(
                DIAG_UNSUPPORTED_MEMBER,
                "`props` must be an object or array literal".to_string(),
                other.span(),
            ),
        }
    }

    fn collect_computed(&mut self, value: &'a Expression<'a>) {
        let obj = match strip_parens(value) {
            Expression::ObjectExpression(obj) => obj,
            other => {
                self.report(
                    DIAG_UNSUPPORTED_COMPUTED,
                    "`computed` must be an object literal".to_string(),
                    other.span(),
                );
                return;
            }
        };
        for kind in obj.properties.iter() {
            let prop = match kind {
                ObjectPropertyKind::ObjectProperty(prop) => &**prop,
                ObjectPropertyKind::SpreadProperty(spread) => {
                    self.report(
                        DIAG_UNSUPPORTED_COMPUTED,
                        "spread computed helpers are not migrated".to_string(),
                        spread.span,
                    );
                    continue;
                }
            };
            let name = property_key_name(&prop.key);
            let accepted = prop.kind == PropertyKind::Init
                && !prop.computed
                && FunctionLike::from_expression(&prop.value).is_some();
            match name {
                Some(name) if !is_binding_name(&name) => self.report(
                    DIAG_UNSUPPORTED_COMPUTED,
                    format!("computed key `{}` is not a valid binding name", name),
                    prop.span,
                ),
                Some(name) if accepted => upsert(
                    &mut self.out.computed,
                    ClassifiedMember::new(name, Role::Computed, MemberNode::Property(prop)),
                ),
                Some(name) => self.report(
                    DIAG_UNSUPPORTED_COMPUTED,
                    format!("computed `{}` is a getter/setter pair or not a function", name),
                    prop.span,
                ),
                None => self.report(
                    DIAG_UNSUPPORTED_COMPUTED,
                    "computed with dynamic key".to_string(),
                    prop.span,
                ),
            }
        }
    }

    fn collect_methods(&mut self, value: &'a Expression<'a>) {
        let obj = match strip_parens(value) {
            Expression::ObjectExpression(obj) => obj,
            other => {
                self.report(
                    DIAG_UNSUPPORTED_MEMBER,
                    "`methods` must be an object literal".to_string(),
                    other.span(),
                );
                return;
            }
        };
        for kind in obj.properties.iter() {
            match kind {
                ObjectPropertyKind::ObjectProperty(prop)
                    if prop.kind == PropertyKind::Init
                        && !prop.computed
                        && FunctionLike::from_expression(&prop.value).is_some() =>
                {
                    match property_key_name(&prop.key) {
                        Some(name) if is_binding_name(&name) => upsert(
                            &mut self.out.methods,
                            ClassifiedMember::new(name, Role::Method, MemberNode::Property(&**prop)),
                        ),
                        Some(name) => self.report(
                            DIAG_UNSUPPORTED_MEMBER,
                            format!("method key `{}` is not a valid binding name", name),
                            prop.span,
                        ),
                        None => self.report(
                            DIAG_UNSUPPORTED_MEMBER,
                            "method with dynamic key".to_string(),
                            prop.span,
                        ),
                    }
                }
                other => self.report(
                    DIAG_UNSUPPORTED_MEMBER,
                    "unsupported method shape".to_string(),
                    other.span(),
                ),
            }
        }
    }

    fn collect_ambient_reads(&mut self, value: &'a Expression<'a>) {
        match strip_parens(value) {
            Expression::ArrayExpression(arr) => {
                for elem in arr.elements.iter() {
                    match elem.as_expression() {
                        Some(expr @ Expression::StringLiteral(s)) if is_binding_name(s.value.as_str()) => {
                            let mut member = ClassifiedMember::new(
                                s.value.to_string(),
                                Role::AmbientRead,
                                MemberNode::Expression(expr),
                            );
                            member.ambient = Some(AmbientSource {
                                key: self.out.text(s.span).to_string(),
                                default: None,
                            });
                            upsert(&mut self.out.ambient_reads, member);
                        }
                        _ => self.report(
                            DIAG_UNSUPPORTED_MEMBER,
                            "inject array entries must be string literals naming a valid binding".to_string(),
                            elem.span(),
                        ),
                    }
                }
            }
            Expression::ObjectExpression(obj) => {
                for kind in obj.properties.iter() {
                    let prop = match kind {
                        ObjectPropertyKind::ObjectProperty(prop) if !prop.computed => &**prop,
                        other => {
                            self.report(
                                DIAG_UNSUPPORTED_MEMBER,
                                "unsupported inject entry".to_string(),
                                other.span(),
                            );
                            continue;
                        }
                    };
                    let name = match property_key_name(&prop.key) {
                        Some(name) if is_binding_name(&name) => name,
                        _ => {
                            self.report(
                                DIAG_UNSUPPORTED_MEMBER,
                                "inject key is not a valid binding name".to_string(),
                                prop.span,
                            );
                            continue;
                        }
                    };
                    match self.ambient_source(&name, &prop.value) {
                        Some(source) => {
                            let mut member =
                                ClassifiedMember::new(name, Role::AmbientRead, MemberNode::Property(prop));
                            member.ambient = Some(source);
                            upsert(&mut self.out.ambient_reads, member);
                        }
                        None => self.report(
                            DIAG_UNSUPPORTED_MEMBER,
                            format!("inject `{}` has an unsupported shape", name),
                            prop.span,
                        ),
                    }
                }
            }
            other => self.report(
                DIAG_UNSUPPORTED_MEMBER,
                "`inject` must be an object or array literal".to_string(),
                other.span(),
            ),
        }
    }

    /// `name: 'key'`, `name: KEY`, or `name: { from?: ..., default?: ... }`
    fn ambient_source(&self, name: &str, value: &'a Expression<'a>) -> Option<AmbientSource<'a>> {
        match strip_parens(value) {
            expr @ (Expression::StringLiteral(_) | Expression::Identifier(_)) => Some(AmbientSource {
                key: self.out.text(expr.span()).to_string(),
                default: None,
            }),
            Expression::ObjectExpression(obj) => {
                let mut source = AmbientSource {
                    key: format!("'{}'", name),
                    default: None,
                };
                for kind in obj.properties.iter() {
                    if let ObjectPropertyKind::ObjectProperty(sub) = kind {
                        match property_key_name(&sub.key).as_deref() {
                            Some("from") => source.key = self.out.text(sub.value.span()).to_string(),
                            Some("default") => source.default = Some(&sub.value),
                            _ => {}
                        }
                    }
                }
                Some(source)
            }
            _ => None,
        }
    }

    fn collect_ambient_provides(&mut self, value: &'a Expression<'a>) {
        let obj = match strip_parens(value) {
            Expression::ObjectExpression(obj) => Some(&**obj),
            _ => FunctionLike::from_expression(value).and_then(|f| f.returned_object()),
        };
        let obj = match obj {
            Some(obj) => obj,
            None => {
                self.report(
                    DIAG_UNSUPPORTED_MEMBER,
                    "`provide` must be an object literal or return one".to_string(),
                    value.span(),
                );
                return;
            }
        };
        for kind in obj.properties.iter() {
            match kind {
                ObjectPropertyKind::ObjectProperty(prop) => {
                    let name = property_key_name(&prop.key)
                        .unwrap_or_else(|| self.out.text(prop.key.span()).to_string());
                    upsert(
                        &mut self.out.ambient_provides,
                        ClassifiedMember::new(name, Role::AmbientProvide, MemberNode::Property(&**prop)),
                    );
                }
                ObjectPropertyKind::SpreadProperty(spread) => self.report(
                    DIAG_UNSUPPORTED_MEMBER,
                    "spread in `provide` is not migrated".to_string(),
                    spread.span,
                ),
            }
        }
    }

    fn collect_watchers(&mut self, value: &'a Expression<'a>) {
        let obj = match strip_parens(value) {
            Expression::ObjectExpression(obj) => obj,
            other => {
                self.report(
                    DIAG_UNSUPPORTED_MEMBER,
                    "`watch` must be an object literal".to_string(),
                    other.span(),
                );
                return;
            }
        };
        for kind in obj.properties.iter() {
            match kind {
                ObjectPropertyKind::ObjectProperty(prop) if !prop.computed => {
                    if let Some(name) = property_key_name(&prop.key) {
                        upsert(
                            &mut self.out.watchers,
                            ClassifiedMember::new(name, Role::Watcher, MemberNode::Property(&**prop)),
                        );
                    }
                }
                other => self.report(
                    DIAG_UNSUPPORTED_MEMBER,
                    "unsupported watcher entry".to_string(),
                    other.span(),
                ),
            }
        }
    }

    fn collect_composed(&mut self, value: &'a Expression<'a>) {
        match strip_parens(value) {
            Expression::ArrayExpression(arr) => {
                for elem in arr.elements.iter() {
                    match elem.as_expression() {
                        Some(expr) => self.collect_composed_reference(expr),
                        None => self.report(
                            DIAG_UNSUPPORTED_COMPOSED,
                            "unsupported mixin entry".to_string(),
                            elem.span(),
                        ),
                    }
                }
            }
            other => self.report(
                DIAG_UNSUPPORTED_COMPOSED,
                "`mixins` must be an array literal".to_string(),
                other.span(),
            ),
        }
    }

    fn collect_composed_reference(&mut self, expr: &'a Expression<'a>) {
        match expr {
            Expression::Identifier(id) => upsert(
                &mut self.out.composed,
                ClassifiedMember::new(id.name.to_string(), Role::ComposedBehavior, MemberNode::Expression(expr)),
            ),
            other => self.report(
                DIAG_UNSUPPORTED_COMPOSED,
                "only identifier mixins are migrated".to_string(),
                other.span(),
            ),
        }
    }
}
