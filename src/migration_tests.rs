//! End-to-end migration tests
//!
//! Drive `migrate_component` from source text to output text and check the
//! properties every migration must keep:
//! - sections in fixed pass order
//! - byte-identical output for identical input
//! - exactly one advisory per unresolved reference
//! - output that still parses

#[cfg(test)]
mod tests {
    use crate::{
        migrate_component, migrate_script, parse_program, MigrateError, MigrateOptions, OutputMode,
        DIAG_HOIST_DEFINE_PROPS, DIAG_UNRESOLVED_REFERENCE, DIAG_UNSUPPORTED_COMPOSED,
        DIAG_UNSUPPORTED_COMPUTED, DIAG_UNSUPPORTED_MEMBER, DIAG_UNSUPPORTED_STATE, AMBIENT_USE_ADVISORY,
        UNRESOLVED_ADVISORY,
    };
    use oxc_allocator::Allocator;
    use pretty_assertions::assert_eq;
    use tracing_test::traced_test;

    fn migrate(src: &str) -> crate::MigrationOutput {
        migrate_component(src, &MigrateOptions::default()).unwrap()
    }

    fn assert_parses(code: &str) {
        let allocator = Allocator::default();
        if let Err(err) = parse_program(&allocator, code, true) {
            panic!("output does not parse: {}\n{}", err, code);
        }
    }

    fn advisories(code: &str) -> usize {
        code.matches(UNRESOLVED_ADVISORY).count()
    }

    // ═══════════════════════════════════════════════════════════════════════════════
    // Minimal round-trip
    // ═══════════════════════════════════════════════════════════════════════════════

    #[test]
    fn test_minimal_counter() {
        let out = migrate(
            r#"export default {
  data() { return { count: 0 } },
  methods: { inc() { this.count += 1 } },
}"#,
        );
        assert_eq!(
            out.code,
            "import { ref } from 'vue';\n\nexport function useComponent() {\nconst count = ref(0);\n\nfunction inc() { count.value += 1 }\n\nreturn { count, inc };\n}\n"
        );
        assert_eq!(advisories(&out.code), 0);
        assert!(out.diagnostics.is_empty());
        assert_parses(&out.code);
    }

    // ═══════════════════════════════════════════════════════════════════════════════
    // Pass order and determinism
    // ═══════════════════════════════════════════════════════════════════════════════

    const FULL: &str = r#"import helper from './helper';

export default {
  name: 'order-probe',
  mounted() { this.save() },
  provide() { return { shared: this.count } },
  watch: { count(v) { this.save(v) } },
  methods: { save(v) { helper(v, this.total) } },
  computed: { total() { return this.count + this.step } },
  inject: ['theme'],
  data() { return { count: 0 } },
  props: { step: Number },
  mixins: [tracking],
};
"#;

    #[test]
    fn test_sections_follow_pass_order() {
        let out = migrate(FULL);
        let markers = [
            "import { computed, inject, onMounted, provide, ref, unref, watch } from 'vue';",
            "import helper from './helper';",
            "export function useOrderProbe() {",
            "} = tracking();",
            "const props = defineProps({",
            "const count = ref(0);",
            "const theme = inject('theme');",
            "const total = computed(",
            "function save(v: any)",
            "watch(() => unref(count),",
            "provide('shared', count);",
            "onMounted(() => { save() });",
            "return { count, theme, total, save };",
        ];
        let mut last = 0;
        for marker in markers {
            let at = out
                .code
                .find(marker)
                .unwrap_or_else(|| panic!("missing `{}` in\n{}", marker, out.code));
            assert!(at >= last, "`{}` is out of order in\n{}", marker, out.code);
            last = at;
        }
        assert!(out.code.contains("return count.value + props.step"));
        assert!(out.code.contains("helper(v, total.value)"));
        assert_eq!(advisories(&out.code), 0);
        assert_parses(&out.code);
    }

    #[test]
    fn test_identical_input_gives_identical_output() {
        let first = migrate(FULL);
        let second = migrate(FULL);
        assert_eq!(first, second);
    }

    // ═══════════════════════════════════════════════════════════════════════════════
    // Escape hatches
    // ═══════════════════════════════════════════════════════════════════════════════

    #[test]
    fn test_unresolved_reference_gets_exactly_one_advisory() {
        let out = migrate("export default { methods: { close() { this.$emit('close') } } }");
        assert_eq!(advisories(&out.code), 1);
        assert!(out
            .code
            .contains(&format!("{} this.$emit('close')", UNRESOLVED_ADVISORY)));
        let unresolved: Vec<_> = out
            .diagnostics
            .iter()
            .filter(|d| d.code == DIAG_UNRESOLVED_REFERENCE)
            .collect();
        assert_eq!(unresolved.len(), 1);
        assert_eq!(unresolved[0].location.line, 1);
        assert_parses(&out.code);
    }

    #[test]
    #[traced_test]
    fn test_unresolved_reference_is_logged() {
        migrate("export default { methods: { go() { return this.$router } } }");
        assert!(logs_contain("unresolved self-reference"));
    }

    #[test]
    fn test_getter_setter_computed_is_omitted() {
        let out = migrate(
            r#"export default {
  computed: { full: { get() { return 1 }, set(v) {} } },
  methods: { read() { return this.full } },
}"#,
        );
        assert!(!out.code.contains("computed("));
        assert!(!out.code.contains("const full"));
        // never registered, so the method access stays unresolved
        assert_eq!(advisories(&out.code), 1);
        assert!(out.diagnostics.iter().any(|d| d.code == DIAG_UNSUPPORTED_COMPUTED));
    }

    #[test]
    fn test_composed_behaviors() {
        let out = migrate("export default { mixins: [mix, { created() {} }, factory()] }");
        assert_eq!(out.code.matches("= mix();").count(), 1);
        assert_eq!(out.code.matches("();").count(), 1);
        let omitted = out
            .diagnostics
            .iter()
            .filter(|d| d.code == DIAG_UNSUPPORTED_COMPOSED)
            .count();
        assert_eq!(omitted, 2);
        assert_parses(&out.code);
    }

    #[test]
    fn test_bare_arrow_callback_still_parses() {
        let out = migrate(
            "export default { methods: { f(list) { return list.map(x => x + 1).filter(y => y) } } }",
        );
        assert!(out
            .code
            .contains("function f(list: any) { return list.map((x: any) => x + 1).filter((y: any) => y) }"));
        assert_parses(&out.code);
    }

    #[test]
    fn test_non_identifier_keys_are_omitted() {
        let out = migrate(
            r#"export default {
  data() { return { 'my-key': 1, 'ok': 2, class: 3 } },
  computed: { 'has-err'() { return 1 } },
  methods: { delete() {}, 'x-y'() {}, save() {} },
}"#,
        );
        assert!(out.code.contains("const ok = ref(2);"));
        assert!(out.code.contains("function save()"));
        assert!(!out.code.contains("my-key"));
        assert!(!out.code.contains("has-err"));
        assert!(!out.code.contains("function delete"));
        assert!(!out.code.contains("const class"));
        let count = |code: &str| out.diagnostics.iter().filter(|d| d.code == code).count();
        assert_eq!(count(DIAG_UNSUPPORTED_STATE), 2);
        assert_eq!(count(DIAG_UNSUPPORTED_COMPUTED), 1);
        assert_eq!(count(DIAG_UNSUPPORTED_MEMBER), 2);
        assert_parses(&out.code);
    }

    #[test]
    fn test_injected_reads_are_marked_at_each_use() {
        let out = migrate(
            "export default { inject: ['theme'], methods: { a() { return this.theme }, b() { return this.theme.dark } } }",
        );
        assert_eq!(out.code.matches(AMBIENT_USE_ADVISORY).count(), 2);
        assert_parses(&out.code);
    }

    // ═══════════════════════════════════════════════════════════════════════════════
    // Watchers
    // ═══════════════════════════════════════════════════════════════════════════════

    #[test]
    fn test_watch_on_input_reads_props() {
        let out = migrate("export default { props: ['row'], watch: { row() {} } }");
        assert!(out.code.contains("watch(() => props.row, () => {});"));
        assert!(out.code.starts_with("import { watch } from 'vue';"));
        assert!(!out.code.contains("unref"));
    }

    #[test]
    fn test_watch_on_state_dereferences() {
        let out = migrate("export default { data() { return { row: 1 } }, watch: { row() {} } }");
        assert!(out.code.contains("watch(() => unref(row), () => {});"));
        assert!(out.code.starts_with("import { ref, unref, watch } from 'vue';"));
    }

    // ═══════════════════════════════════════════════════════════════════════════════
    // Modes and SFC input
    // ═══════════════════════════════════════════════════════════════════════════════

    const SFC: &str = r#"<template>
  <div @click="inc">{{ count }}</div>
</template>

<script>
export default {
  props: ['step'],
  data() { return { count: 0 } },
  methods: { inc() { this.count += this.step } },
}
</script>

<style scoped>
div { cursor: pointer; }
</style>
"#;

    #[test]
    fn test_script_setup_mode() {
        let out = migrate_component(SFC, &MigrateOptions::script_setup()).unwrap();
        assert_eq!(
            out.code,
            r#"<script setup lang="ts">
import { ref } from 'vue';

const props = defineProps(['step']);

const count = ref(0);

function inc() { count.value += props.step }
</script>

<template>
  <div @click="inc">{{ count }}</div>
</template>

<style scoped>
div { cursor: pointer; }
</style>
"#
        );
        assert!(out.template.as_deref().unwrap_or("").contains("{{ count }}"));
        assert!(!out.diagnostics.iter().any(|d| d.code == DIAG_HOIST_DEFINE_PROPS));
    }

    #[test]
    fn test_composable_mode_from_sfc() {
        let out = migrate(SFC);
        assert!(out.code.starts_with("import { ref } from 'vue';"));
        assert!(out.code.contains("export function useComponent() {"));
        assert!(!out.code.contains("<template>"));
        assert!(out.template.is_some());
        assert!(out.diagnostics.iter().any(|d| d.code == DIAG_HOIST_DEFINE_PROPS));
        assert_parses(&out.code);
    }

    #[test]
    fn test_options_shape_output() {
        let options = MigrateOptions {
            output_mode: OutputMode::Composable,
            composable_name: Some("useCounter".to_string()),
            runtime_module: "@vue/composition-api".to_string(),
            annotate_params: false,
            ..Default::default()
        };
        let out = migrate_script(
            "export default { data: () => ({ n: 0 }), methods: { add(k) { this.n += k } } }",
            &options,
        )
        .unwrap();
        assert!(out.code.starts_with("import { ref } from '@vue/composition-api';"));
        assert!(out.code.contains("export function useCounter() {"));
        assert!(out.code.contains("function add(k) { n.value += k }"));
    }

    #[test]
    fn test_parse_failure_aborts() {
        let result = migrate_component("export default { data( { }", &MigrateOptions::default());
        assert!(matches!(result, Err(MigrateError::Parse { .. })));
    }

    // ═══════════════════════════════════════════════════════════════════════════════
    // Realistic component
    // ═══════════════════════════════════════════════════════════════════════════════

    #[test]
    fn test_form_item_component() {
        let src = r#"import validate from "../../table-item/validate-rules";
import vexutils from '@/utils/vexutils';

export default {
  mixins: [validate],
  components: {},
  data() {
    return { rowData: {} };
  },
  inject: {
    formTable: {
      type: Object,
      default: () => ({})
    }
  },
  props: {
    userInfo: { type: Object, default: () => ({}) },
    defaultValue: { type: Object, default: () => { return {}; } },
    item: { type: Object },
    row: { type: Object },
  },
  beforeCreate() {
    // this.formFieldListCopy = [];
  },
  mounted() {
    this.$nextTick(() => {
      this.defaultInit();
    });
  },
  computed: {
    hasErr() {
      let key = `__${this.item.val_key}-errorMsg__`;
      return this.item?.[key];
    }
  },
  methods: {
    handleSysParams(str) {
      let p = {
        form: { ...this.defaultValue },
        sys: this?.userInfo?.map?.sysParams || {},
      };
      return vexutils.handleSysParams(str, p);
    },
    defaultInit() {
      const { name, default_val } = this.item;
      let targetStr = this.handleSysParams(this.defaultValue[name] || default_val);
      this.$set(this.row, name, targetStr);
      this.$emit('init', this.formTable);
    },
  },
};
"#;
        let out = migrate(src);
        assert_parses(&out.code);
        assert!(out
            .code
            .starts_with("import { computed, inject, nextTick, onMounted, ref } from 'vue';"));
        assert!(out.code.contains("} = validate();"));
        assert!(out.code.contains("const formTable = inject('formTable', () => ({}), true);"));
        assert!(out.code.contains("return props.item?.[key];"));
        assert!(out.code.contains("sys: props.userInfo?.map?.sysParams || {},"));
        assert!(out.code.contains("Reflect.set(props.row, name, targetStr);"));
        assert!(out
            .code
            .contains(&format!("this.$emit('init', formTable.value {});", AMBIENT_USE_ADVISORY)));
        assert!(out.code.contains("nextTick(() => {"));
        assert!(out.code.contains("defaultInit();"));
        assert_eq!(advisories(&out.code), 1);
    }
}
