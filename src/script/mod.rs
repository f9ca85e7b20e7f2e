//! Generic script function registry.
//!
//! The engine's scripting surface is modelled as named modules holding
//! functions of a fixed signature `(argument list) -> (return list)` over a
//! small dynamic value type. The binding mechanism (Lua, a test harness)
//! sits on top and never sees the plugin's internals.

pub(crate) mod bindings;
#[cfg(feature = "lua")]
pub mod lua;

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

/// A value crossing the scripting boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum ScriptValue {
    Nil,
    Boolean(bool),
    Number(f64),
    Text(String),
}

impl ScriptValue {
    /// The contained text, or `None` for every other variant. Numbers are
    /// deliberately not coerced to text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ScriptValue::Text(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            ScriptValue::Number(value) => Some(*value),
            _ => None,
        }
    }
}

/// A registered script function. Handlers validate their own arguments and
/// report failure in-band; they never raise.
pub type ScriptFn = Arc<dyn Fn(&[ScriptValue]) -> Vec<ScriptValue> + Send + Sync>;

#[derive(Default)]
struct ScriptModule {
    functions: BTreeMap<String, ScriptFn>,
    numbers: BTreeMap<String, f64>,
}

/// Lookup failed during a script call.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ScriptError {
    #[error("unknown script module: {0}")]
    UnknownModule(String),
    #[error("unknown function {module}.{name}")]
    UnknownFunction { module: String, name: String },
}

/// Named modules of script-callable functions and numeric constants.
///
/// Shared between the plugin (which registers into it at setup) and the
/// scripting frontend (which calls through it every time a script invokes
/// an exported function).
#[derive(Default)]
pub struct ScriptRegistry {
    modules: Mutex<BTreeMap<String, ScriptModule>>,
}

impl ScriptRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `module.name`. Re-registration replaces the previous
    /// handler in place.
    pub fn add_module_function<F>(&self, module: &str, name: &str, handler: F)
    where
        F: Fn(&[ScriptValue]) -> Vec<ScriptValue> + Send + Sync + 'static,
    {
        let mut modules = self.modules.lock().unwrap();
        modules
            .entry(module.to_owned())
            .or_default()
            .functions
            .insert(name.to_owned(), Arc::new(handler));
    }

    /// Publishes a numeric constant under `module.name`.
    pub fn set_module_number(&self, module: &str, name: &str, value: f64) {
        let mut modules = self.modules.lock().unwrap();
        modules
            .entry(module.to_owned())
            .or_default()
            .numbers
            .insert(name.to_owned(), value);
    }

    /// Invokes `module.name` with positional arguments.
    pub fn call(
        &self,
        module: &str,
        name: &str,
        args: &[ScriptValue],
    ) -> Result<Vec<ScriptValue>, ScriptError> {
        // Clone the handler out so the registry is unlocked while it runs;
        // handlers may call back into the registry.
        let handler = {
            let modules = self.modules.lock().unwrap();
            let entry = modules
                .get(module)
                .ok_or_else(|| ScriptError::UnknownModule(module.to_owned()))?;
            Arc::clone(entry.functions.get(name).ok_or_else(|| {
                ScriptError::UnknownFunction {
                    module: module.to_owned(),
                    name: name.to_owned(),
                }
            })?)
        };
        Ok(handler(args))
    }

    /// Reads a numeric constant back.
    pub fn module_number(&self, module: &str, name: &str) -> Option<f64> {
        let modules = self.modules.lock().unwrap();
        modules.get(module)?.numbers.get(name).copied()
    }

    /// Names of the functions exported by a module, for frontends that
    /// materialise the module in their own environment.
    pub fn function_names(&self, module: &str) -> Vec<String> {
        let modules = self.modules.lock().unwrap();
        modules
            .get(module)
            .map(|entry| entry.functions.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Numeric constants exported by a module.
    pub fn module_numbers(&self, module: &str) -> Vec<(String, f64)> {
        let modules = self.modules.lock().unwrap();
        modules
            .get(module)
            .map(|entry| {
                entry
                    .numbers
                    .iter()
                    .map(|(name, value)| (name.clone(), *value))
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn call_routes_to_the_registered_handler() {
        let registry = ScriptRegistry::new();
        registry.add_module_function("Mod", "double", |args| {
            let value = args.first().and_then(ScriptValue::as_number).unwrap_or(0.0);
            vec![ScriptValue::Number(value * 2.0)]
        });

        let returns = registry
            .call("Mod", "double", &[ScriptValue::Number(21.0)])
            .unwrap();
        assert_eq!(returns, vec![ScriptValue::Number(42.0)]);
    }

    #[test]
    fn unknown_lookups_are_reported() {
        let registry = ScriptRegistry::new();
        registry.set_module_number("Mod", "VERSION", 1.0);

        assert_eq!(
            registry.call("Nope", "f", &[]),
            Err(ScriptError::UnknownModule("Nope".to_owned()))
        );
        assert_eq!(
            registry.call("Mod", "f", &[]),
            Err(ScriptError::UnknownFunction {
                module: "Mod".to_owned(),
                name: "f".to_owned(),
            })
        );
    }

    #[test]
    fn constants_are_readable() {
        let registry = ScriptRegistry::new();
        registry.set_module_number("Mod", "VERSION", 1.0);
        assert_eq!(registry.module_number("Mod", "VERSION"), Some(1.0));
        assert_eq!(registry.module_number("Mod", "OTHER"), None);
    }

    #[test]
    fn handlers_may_reenter_the_registry() {
        let registry = Arc::new(ScriptRegistry::new());
        registry.add_module_function("Mod", "inner", |_| vec![ScriptValue::Number(7.0)]);

        let inner_registry = Arc::clone(&registry);
        registry.add_module_function("Mod", "outer", move |args| {
            inner_registry.call("Mod", "inner", args).unwrap()
        });

        let returns = registry.call("Mod", "outer", &[]).unwrap();
        assert_eq!(returns, vec![ScriptValue::Number(7.0)]);
    }

    #[test]
    fn registration_overwrites_in_place() {
        let registry = ScriptRegistry::new();
        registry.add_module_function("Mod", "f", |_| vec![ScriptValue::Number(1.0)]);
        registry.add_module_function("Mod", "f", |_| vec![ScriptValue::Number(2.0)]);

        let returns = registry.call("Mod", "f", &[]).unwrap();
        assert_eq!(returns, vec![ScriptValue::Number(2.0)]);
        assert_eq!(registry.function_names("Mod"), vec!["f".to_owned()]);
    }
}
