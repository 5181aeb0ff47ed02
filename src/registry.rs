use std::collections::HashSet;

// ═══════════════════════════════════════════════════════════════════════════════
// CLASSIFICATION REGISTRY
// ═══════════════════════════════════════════════════════════════════════════════

/// What a `this.name` access turns into, in resolution precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// State field or computed value: `name.value`
    Reactive,
    /// `props.name`
    Input,
    /// Injected value: `name.value`
    AmbientRead,
    /// Plain callable binding: `name`
    Method,
}

/// Names registered by the transform passes so far.
///
/// Append-only for the lifetime of one transform. A pass only sees what earlier
/// passes registered.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    state: HashSet<String>,
    computed: HashSet<String>,
    inputs: HashSet<String>,
    ambient_reads: HashSet<String>,
    methods: HashSet<String>,
}

impl Registry {
    pub fn new() -> Self {
        Registry::default()
    }

    pub fn add_state(&mut self, name: &str) {
        self.state.insert(name.to_string());
    }

    pub fn add_computed(&mut self, name: &str) {
        self.computed.insert(name.to_string());
    }

    pub fn add_input(&mut self, name: &str) {
        self.inputs.insert(name.to_string());
    }

    pub fn add_ambient_read(&mut self, name: &str) {
        self.ambient_reads.insert(name.to_string());
    }

    pub fn add_method(&mut self, name: &str) {
        self.methods.insert(name.to_string());
    }

    /// Classification priority: state/computed > input > ambient read > method
    pub fn resolve(&self, name: &str) -> Option<Resolution> {
        if self.state.contains(name) || self.computed.contains(name) {
            Some(Resolution::Reactive)
        } else if self.inputs.contains(name) {
            Some(Resolution::Input)
        } else if self.ambient_reads.contains(name) {
            Some(Resolution::AmbientRead)
        } else if self.methods.contains(name) {
            Some(Resolution::Method)
        } else {
            None
        }
    }

    pub fn is_state(&self, name: &str) -> bool {
        self.state.contains(name)
    }

    pub fn is_computed(&self, name: &str) -> bool {
        self.computed.contains(name)
    }

    pub fn is_input(&self, name: &str) -> bool {
        self.inputs.contains(name)
    }

    pub fn is_method(&self, name: &str) -> bool {
        self.methods.contains(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precedence() {
        let mut reg = Registry::new();
        reg.add_method("value");
        assert_eq!(reg.resolve("value"), Some(Resolution::Method));
        reg.add_ambient_read("value");
        assert_eq!(reg.resolve("value"), Some(Resolution::AmbientRead));
        reg.add_input("value");
        assert_eq!(reg.resolve("value"), Some(Resolution::Input));
        reg.add_computed("value");
        assert_eq!(reg.resolve("value"), Some(Resolution::Reactive));
    }

    #[test]
    fn test_unknown_is_unresolved() {
        let mut reg = Registry::new();
        reg.add_state("count");
        assert_eq!(reg.resolve("count"), Some(Resolution::Reactive));
        assert_eq!(reg.resolve("total"), None);
        assert!(reg.is_state("count"));
        assert!(!reg.is_computed("count"));
    }
}
