//! Rich Presence plugin for script-driven games.
//!
//! The host application loads the plugin, drives its five lifecycle entry
//! points, and hands it a scripting binding plus a logging sink. Game
//! scripts then mutate a single presence record (state, details, class
//! icon, party size, elapsed time) through the exported module, and the
//! plugin forwards the record to Discord asynchronously, draining the SDK's
//! completion queue once per frame.

mod activity;
mod context;
pub mod host;
pub mod logging;
mod plugin;
pub mod script;
pub mod sdk;

pub use activity::{Activity, TEXT_LIMIT};
pub use context::PluginContext;
pub use host::{EngineApis, GamePlugin, HostApis, LogSink, TracingLog};
pub use plugin::PresencePlugin;
pub use script::{ScriptError, ScriptRegistry, ScriptValue};
pub use sdk::{ActivitySdk, SdkError};

/// The plugin's name, and the name of the module exported to scripts.
pub const PLUGIN_NAME: &str = "RichPresence";

/// Compatibility constant published to scripts as `RichPresence.VERSION`.
pub const SCRIPT_API_VERSION: f64 = 1.0;
