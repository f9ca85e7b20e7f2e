//! The functions exported to game scripts.
//!
//! Every handler checks argument count and types before touching any state:
//! a mismatched call mutates nothing and returns `false`. Extra trailing
//! arguments are ignored.

use std::sync::Arc;

use crate::context::PluginContext;
use crate::script::{ScriptRegistry, ScriptValue};
use crate::{PLUGIN_NAME, SCRIPT_API_VERSION};

/// Installs the plugin's script module: the `VERSION` constant plus the six
/// presence functions.
pub(crate) fn register(scripts: &ScriptRegistry, ctx: &Arc<PluginContext>) {
    scripts.set_module_number(PLUGIN_NAME, "VERSION", SCRIPT_API_VERSION);

    let state_ctx = Arc::clone(ctx);
    scripts.add_module_function(PLUGIN_NAME, "set_state", move |args| {
        let ok = match args.first().and_then(ScriptValue::as_text) {
            Some(value) => {
                state_ctx.set_state(value);
                true
            }
            None => false,
        };
        vec![ScriptValue::Boolean(ok)]
    });

    let details_ctx = Arc::clone(ctx);
    scripts.add_module_function(PLUGIN_NAME, "set_details", move |args| {
        let ok = match args.first().and_then(ScriptValue::as_text) {
            Some(value) => {
                details_ctx.set_details(value);
                true
            }
            None => false,
        };
        vec![ScriptValue::Boolean(ok)]
    });

    let class_ctx = Arc::clone(ctx);
    scripts.add_module_function(PLUGIN_NAME, "set_class", move |args| {
        // Both arguments are validated up front so the image key and its
        // caption are stored together or not at all.
        let image_key = args.first().and_then(ScriptValue::as_text);
        let caption = args.get(1).and_then(ScriptValue::as_text);
        let ok = match (image_key, caption) {
            (Some(image_key), Some(caption)) => {
                class_ctx.set_class(image_key, caption);
                true
            }
            _ => false,
        };
        vec![ScriptValue::Boolean(ok)]
    });

    let party_ctx = Arc::clone(ctx);
    scripts.add_module_function(PLUGIN_NAME, "set_party_size", move |args| {
        let current = args.first().and_then(ScriptValue::as_number);
        let max = args.get(1).and_then(ScriptValue::as_number);
        let ok = match (current, max) {
            (Some(current), Some(max)) => {
                party_ctx.set_party_size(current as i32, max as i32);
                true
            }
            _ => false,
        };
        vec![ScriptValue::Boolean(ok)]
    });

    let start_ctx = Arc::clone(ctx);
    scripts.add_module_function(PLUGIN_NAME, "set_start_time", move |_args| {
        start_ctx.set_start_time();
        vec![ScriptValue::Boolean(true)]
    });

    let update_ctx = Arc::clone(ctx);
    scripts.add_module_function(PLUGIN_NAME, "update", move |_args| {
        update_ctx.push_update();
        Vec::new()
    });
}
