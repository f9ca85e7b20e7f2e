//! Lua frontend for the script registry.
//!
//! Publishes a registered module as a global Lua table so game scripts can
//! call `RichPresence.set_state(...)` directly. Conversion is strict: Lua
//! numbers are not coerced to text and unsupported types map to `Nil`,
//! which fails the bindings' own validation.

use std::sync::Arc;

use mlua::{Lua, MultiValue, Value, Variadic};

use crate::script::{ScriptRegistry, ScriptValue};

/// Installs `module` from the registry as a Lua global table with one entry
/// per exported function plus the module's numeric constants.
pub fn install_module(
    lua: &Lua,
    scripts: Arc<ScriptRegistry>,
    module: &str,
) -> mlua::Result<()> {
    let table = lua.create_table()?;

    for name in scripts.function_names(module) {
        let scripts = Arc::clone(&scripts);
        let module_name = module.to_owned();
        let function_name = name.clone();
        let function = lua.create_function(move |lua, args: Variadic<Value>| {
            let args: Vec<ScriptValue> = args.iter().map(script_value).collect();
            let returns = scripts
                .call(&module_name, &function_name, &args)
                .map_err(mlua::Error::external)?;
            returns
                .into_iter()
                .map(|value| lua_value(lua, value))
                .collect::<mlua::Result<MultiValue>>()
        })?;
        table.set(name.as_str(), function)?;
    }

    for (name, value) in scripts.module_numbers(module) {
        table.set(name.as_str(), value)?;
    }

    lua.globals().set(module, table)?;
    Ok(())
}

fn script_value(value: &Value) -> ScriptValue {
    match value {
        Value::Boolean(flag) => ScriptValue::Boolean(*flag),
        Value::Integer(number) => ScriptValue::Number(*number as f64),
        Value::Number(number) => ScriptValue::Number(*number),
        Value::String(text) => ScriptValue::Text(text.to_string_lossy().to_string()),
        _ => ScriptValue::Nil,
    }
}

fn lua_value(lua: &Lua, value: ScriptValue) -> mlua::Result<Value> {
    Ok(match value {
        ScriptValue::Nil => Value::Nil,
        ScriptValue::Boolean(flag) => Value::Boolean(flag),
        ScriptValue::Number(number) => Value::Number(number),
        ScriptValue::Text(text) => Value::String(lua.create_string(&text)?),
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use mlua::Lua;

    use super::*;
    use crate::context::PluginContext;
    use crate::host::testkit::MemoryLog;
    use crate::script::bindings;
    use crate::{PLUGIN_NAME, SCRIPT_API_VERSION};

    fn lua_harness() -> (Lua, Arc<PluginContext>) {
        let ctx = Arc::new(PluginContext::new(None, MemoryLog::shared()));
        let scripts = Arc::new(ScriptRegistry::new());
        bindings::register(&scripts, &ctx);

        let lua = Lua::new();
        install_module(&lua, scripts, PLUGIN_NAME).unwrap();
        (lua, ctx)
    }

    #[test]
    fn script_calls_reach_the_activity() {
        let (lua, ctx) = lua_harness();

        let ok: bool = lua
            .load(r#"return RichPresence.set_state("In Mission")"#)
            .eval()
            .unwrap();
        assert!(ok);

        let ok: bool = lua
            .load(r#"return RichPresence.set_class("zealot", "Zealot")"#)
            .eval()
            .unwrap();
        assert!(ok);

        let ok: bool = lua
            .load("return RichPresence.set_party_size(2, 4)")
            .eval()
            .unwrap();
        assert!(ok);

        let activity = ctx.activity();
        assert_eq!(activity.state(), "In Mission");
        assert_eq!(activity.small_image(), "zealot");
        assert_eq!(activity.party_current(), 2);
        assert_eq!(activity.party_max(), 4);
    }

    #[test]
    fn numbers_are_not_coerced_to_text() {
        let (lua, ctx) = lua_harness();

        let ok: bool = lua.load("return RichPresence.set_state(42)").eval().unwrap();
        assert!(!ok);
        assert_eq!(ctx.activity().state(), "");
    }

    #[test]
    fn version_constant_is_visible() {
        let (lua, _ctx) = lua_harness();

        let version: f64 = lua.load("return RichPresence.VERSION").eval().unwrap();
        assert_eq!(version, SCRIPT_API_VERSION);
    }

    #[test]
    fn update_returns_no_values() {
        let (lua, _ctx) = lua_harness();

        let count: i64 = lua
            .load("return select('#', RichPresence.update())")
            .eval()
            .unwrap();
        assert_eq!(count, 0);
    }
}
