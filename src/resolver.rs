//! Reference Resolver
//!
//! Rewrites `this.name` accesses inside one function body into explicit
//! bindings, using the names registered by earlier transform passes. Like the
//! renamer it never mutates the tree: it records `(start, end, text)`
//! replacements and splices them into the original source slice.

use oxc_ast::ast::*;
use oxc_ast_visit::{walk, Visit};
use oxc_span::{GetSpan, Span};
use oxc_syntax::scope::ScopeFlags;

use crate::registry::{Registry, Resolution};

/// Marker placed in front of every self-reference the resolver could not map.
pub const UNRESOLVED_ADVISORY: &str = "/* [migrate] unresolved `this` reference: migrate manually */";

/// Trailing marker on every rewritten `inject` read.
pub const AMBIENT_USE_ADVISORY: &str = "/* [migrate] injected: check `.value` */";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedReference {
    pub offset: u32,
    pub text: String,
}

/// Side effects of resolving one or more bodies.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolveOutcome {
    pub next_tick: bool,
    pub unresolved: Vec<UnresolvedReference>,
}

pub struct ReferenceResolver<'r> {
    registry: &'r Registry,
    source: &'r str,
    /// Type written on unannotated parameters; `None` disables the shim.
    placeholder: Option<&'r str>,
    replacements: Vec<(u32, u32, String)>,
    /// Depth of enclosing `function`/class bodies that rebind `this`.
    rebinding_depth: usize,
    outcome: ResolveOutcome,
}

impl<'r> ReferenceResolver<'r> {
    pub fn new(registry: &'r Registry, source: &'r str, placeholder: Option<&'r str>) -> Self {
        ReferenceResolver {
            registry,
            source,
            placeholder,
            replacements: Vec::new(),
            rebinding_depth: 0,
            outcome: ResolveOutcome::default(),
        }
    }

    pub fn expression(&mut self, expr: &Expression<'_>) -> String {
        self.visit_expression(expr);
        self.splice(expr.span())
    }

    /// Body text including its braces; for `x => expr` arrows, just the expression.
    pub fn function_body(&mut self, body: &FunctionBody<'_>) -> String {
        self.visit_function_body(body);
        self.splice(body.span)
    }

    /// Parameter list text, always parenthesized.
    pub fn params(&mut self, params: &FormalParameters<'_>) -> String {
        self.visit_formal_parameters(params);
        let text = self.splice(params.span);
        if text.starts_with('(') {
            text
        } else {
            format!("({})", text)
        }
    }

    pub fn finish(self) -> ResolveOutcome {
        self.outcome
    }

    fn text(&self, span: Span) -> &'r str {
        &self.source[span.start as usize..span.end as usize]
    }

    fn splice(&mut self, span: Span) -> String {
        let mut replacements = std::mem::take(&mut self.replacements);
        // Insertions sort ahead of replacements that start at the same offset.
        replacements.sort_by_key(|(start, end, _)| (*start, *end));

        let mut out = String::new();
        let mut cursor = span.start as usize;
        for (start, end, text) in replacements {
            let (start, end) = (start as usize, end as usize);
            if start < cursor || end > span.end as usize {
                continue;
            }
            out.push_str(&self.source[cursor..start]);
            out.push_str(&text);
            cursor = end;
        }
        out.push_str(&self.source[cursor..span.end as usize]);
        out
    }

    fn mark_unresolved(&mut self, span: Span) {
        let text = self.text(span).to_string();
        tracing::warn!(offset = span.start, reference = %text, "unresolved self-reference");
        self.replacements
            .push((span.start, span.start, format!("{} ", UNRESOLVED_ADVISORY)));
        self.outcome.unresolved.push(UnresolvedReference {
            offset: span.start,
            text,
        });
    }

    fn rewrite_member(&mut self, span: Span, name: &str) {
        let replacement = match name {
            "$set" => "Reflect.set".to_string(),
            "$delete" => "Reflect.deleteProperty".to_string(),
            "$nextTick" => {
                self.outcome.next_tick = true;
                "nextTick".to_string()
            }
            _ => match self.registry.resolve(name) {
                Some(Resolution::Reactive) => format!("{}.value", name),
                Some(Resolution::AmbientRead) => format!("{}.value {}", name, AMBIENT_USE_ADVISORY),
                Some(Resolution::Input) => format!("props.{}", name),
                Some(Resolution::Method) => name.to_string(),
                None => {
                    self.mark_unresolved(span);
                    return;
                }
            },
        };
        tracing::trace!(from = %self.text(span), to = %replacement, "rewrote self-reference");
        self.replacements.push((span.start, span.end, replacement));
    }

    fn annotate_param(&mut self, span: Span, rest: bool) {
        let placeholder = match self.placeholder {
            Some(placeholder) => placeholder,
            None => return,
        };
        let text = self.text(span);
        let (annotated, default_at) = scan_param(text);
        if annotated {
            return;
        }
        let annotation = if rest {
            format!(": {}[]", placeholder)
        } else {
            format!(": {}", placeholder)
        };
        let insert_at = match default_at {
            Some(eq) => span.start + text[..eq].trim_end().len() as u32,
            None => span.end,
        };
        self.replacements.push((insert_at, insert_at, annotation));
    }
}

/// Scans one parameter's source at bracket depth zero.
/// Returns whether it already carries a `:`/`?` annotation and the byte
/// offset of its default-value `=`, if any.
fn scan_param(text: &str) -> (bool, Option<usize>) {
    let mut depth = 0i32;
    let mut quote: Option<char> = None;
    let mut prev = '\0';
    for (i, c) in text.char_indices() {
        if let Some(q) = quote {
            if c == q && prev != '\\' {
                quote = None;
            }
            prev = c;
            continue;
        }
        match c {
            '\'' | '"' | '`' => quote = Some(c),
            '(' | '[' | '{' | '<' => depth += 1,
            ')' | ']' | '}' | '>' => depth -= 1,
            ':' | '?' if depth == 0 => return (true, None),
            '=' if depth == 0 => return (false, Some(i)),
            _ => {}
        }
        prev = c;
    }
    (false, None)
}

impl<'a, 'r> Visit<'a> for ReferenceResolver<'r> {
    fn visit_static_member_expression(&mut self, expr: &StaticMemberExpression<'a>) {
        if self.rebinding_depth == 0 {
            if let Expression::ThisExpression(_) = &expr.object {
                self.rewrite_member(expr.span, expr.property.name.as_str());
                return;
            }
        }
        walk::walk_static_member_expression(self, expr);
    }

    fn visit_computed_member_expression(&mut self, expr: &ComputedMemberExpression<'a>) {
        if self.rebinding_depth == 0 {
            if let Expression::ThisExpression(_) = &expr.object {
                // this[key]: dynamic, keep the access and resolve inside the key
                self.mark_unresolved(expr.span);
                self.visit_expression(&expr.expression);
                return;
            }
        }
        walk::walk_computed_member_expression(self, expr);
    }

    fn visit_this_expression(&mut self, expr: &ThisExpression) {
        if self.rebinding_depth == 0 {
            self.mark_unresolved(expr.span);
        }
    }

    fn visit_function(&mut self, func: &Function<'a>, flags: ScopeFlags) {
        self.rebinding_depth += 1;
        walk::walk_function(self, func, flags);
        self.rebinding_depth -= 1;
    }

    fn visit_class(&mut self, class: &Class<'a>) {
        self.rebinding_depth += 1;
        walk::walk_class(self, class);
        self.rebinding_depth -= 1;
    }

    fn visit_formal_parameters(&mut self, params: &FormalParameters<'a>) {
        // A parenthesized list spans its parens; a bare arrow param spans only itself.
        let bare = params.items.len() == 1
            && params.rest.is_none()
            && (params.span == params.items[0].span || !self.text(params.span).starts_with('('));
        if bare {
            // `v => ...`
            let param = &params.items[0];
            if let Some(placeholder) = self.placeholder {
                let wrapped = format!("({}: {})", self.text(param.span), placeholder);
                self.replacements.push((param.span.start, param.span.end, wrapped));
            }
            return;
        }
        for param in params.items.iter() {
            self.annotate_param(param.span, false);
        }
        if let Some(rest) = &params.rest {
            self.annotate_param(rest.span, true);
        }
        walk::walk_formal_parameters(self, params);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse_program;
    use oxc_allocator::Allocator;

    fn registry() -> Registry {
        let mut reg = Registry::new();
        reg.add_state("count");
        reg.add_computed("total");
        reg.add_input("row");
        reg.add_ambient_read("formTable");
        reg.add_method("save");
        reg
    }

    /// Resolves the params and body of the first function declaration in `src`.
    fn resolve(src: &str, placeholder: Option<&str>) -> (String, String, ResolveOutcome) {
        let allocator = Allocator::default();
        let program = parse_program(&allocator, src, true).unwrap();
        let func = match &program.body[0] {
            Statement::FunctionDeclaration(func) => func,
            _ => panic!("expected a function declaration"),
        };
        let reg = registry();
        let mut resolver = ReferenceResolver::new(&reg, src, placeholder);
        let params = resolver.params(&func.params);
        let body = resolver.function_body(func.body.as_ref().unwrap());
        (params, body, resolver.finish())
    }

    #[test]
    fn test_rewrites_by_role() {
        let (_, body, outcome) = resolve(
            "function f() { this.count += 1; this.save(this.row.id, this.total); return this.formTable }",
            None,
        );
        assert_eq!(
            body,
            format!(
                "{{ count.value += 1; save(props.row.id, total.value); return formTable.value {} }}",
                AMBIENT_USE_ADVISORY
            )
        );
        assert!(outcome.unresolved.is_empty());
        assert!(!outcome.next_tick);
    }

    #[test]
    fn test_instance_helpers() {
        let (_, body, outcome) = resolve(
            "function f() { this.$set(this.row, 'a', 1); this.$nextTick(() => {}) }",
            None,
        );
        assert_eq!(body, "{ Reflect.set(props.row, 'a', 1); nextTick(() => {}) }");
        assert!(outcome.next_tick);
    }

    #[test]
    fn test_unresolved_gets_one_advisory() {
        let (_, body, outcome) = resolve("function f() { this.$emit('change', this.count) }", None);
        assert_eq!(body.matches(UNRESOLVED_ADVISORY).count(), 1);
        assert!(body.contains(&format!("{} this.$emit('change', count.value)", UNRESOLVED_ADVISORY)));
        assert_eq!(outcome.unresolved.len(), 1);
        assert_eq!(outcome.unresolved[0].text, "this.$emit");
    }

    #[test]
    fn test_bare_and_computed_this() {
        let (_, body, outcome) = resolve("function f() { const self = this; return this[this.row] }", None);
        assert_eq!(outcome.unresolved.len(), 2);
        assert!(body.contains("[props.row]"));
    }

    #[test]
    fn test_nested_function_keeps_its_own_this() {
        let (_, body, outcome) = resolve(
            "function f() { list.forEach(function (x) { this.count = x }); list.map(x => this.count) }",
            None,
        );
        assert!(body.contains("{ this.count = x }"));
        assert!(body.contains("x => count.value"));
        assert!(outcome.unresolved.is_empty());
    }

    #[test]
    fn test_param_annotation() {
        let (params, body, _) = resolve(
            "function f(a, b = 1, c: string, { e }, d?, ...rest) { [1].map(v => v); g((x, y) => x) }",
            Some("any"),
        );
        assert_eq!(params, "(a: any, b: any = 1, c: string, { e }: any, d?, ...rest: any[])");
        assert!(body.contains("(v: any) => v"));
        assert!(body.contains("(x: any, y: any) => x"));
    }

    #[test]
    fn test_bare_arrow_param_inside_call() {
        let (_, body, _) = resolve(
            "function f(list) { return list.map(v => v + 1).filter( w => w) }",
            Some("any"),
        );
        assert_eq!(body, "{ return list.map((v: any) => v + 1).filter( (w: any) => w) }");
    }

    #[test]
    fn test_ambient_read_use_is_marked() {
        let (_, body, outcome) = resolve("function f() { this.formTable.reset(this.count) }", None);
        assert_eq!(body.matches(AMBIENT_USE_ADVISORY).count(), 1);
        assert!(body.contains(&format!("formTable.value {}.reset(count.value)", AMBIENT_USE_ADVISORY)));
        assert!(outcome.unresolved.is_empty());
    }

    #[test]
    fn test_scan_param() {
        assert_eq!(scan_param("a"), (false, None));
        assert_eq!(scan_param("a = { b: 1 }"), (false, Some(2)));
        assert_eq!(scan_param("{ a: b }"), (false, None));
        assert_eq!(scan_param("a: Map<string, number>"), (true, None));
        assert_eq!(scan_param("s = ':'"), (false, Some(2)));
    }
}
