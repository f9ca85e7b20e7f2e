//! The contract between the host application and the plugin.
//!
//! The host drives the five lifecycle entry points and hands the plugin its
//! collaborator interfaces through a typed capability lookup.

use std::sync::Arc;

use crate::script::ScriptRegistry;

/// The host's logging collaborator: a single `info` sink.
pub trait LogSink: Send + Sync {
    fn info(&self, tag: &str, message: &str);
}

/// Default sink forwarding into the ambient `tracing` subscriber.
pub struct TracingLog;

impl LogSink for TracingLog {
    fn info(&self, tag: &str, message: &str) {
        tracing::info!("[{}] {}", tag, message);
    }
}

/// Capability lookup the host passes to `setup_game` and `loaded`.
pub trait EngineApis {
    /// The logging collaborator.
    fn logging(&self) -> Arc<dyn LogSink>;

    /// The scripting engine binding the plugin registers its functions into.
    fn scripting(&self) -> Arc<ScriptRegistry>;
}

/// The five entry points the host requires of a plugin. Transitions are
/// driven exclusively by host calls; the plugin never initiates its own
/// lifecycle changes.
pub trait GamePlugin {
    /// The plugin's name, also the script module name.
    fn name(&self) -> &'static str;

    /// Called once before the game boots. Must be safe to call without a
    /// prior `loaded`.
    fn setup_game(&mut self, apis: &dyn EngineApis);

    /// Called after all plugins are set up. Reserved hook.
    fn loaded(&mut self, apis: &dyn EngineApis);

    /// Called once per frame with the frame delta in seconds.
    fn update_game(&mut self, dt: f32);

    /// Called when the host unloads the plugin.
    fn shutdown_game(&mut self);
}

/// Ready-made [`EngineApis`] for hosts that own a registry and a log sink.
pub struct HostApis {
    log: Arc<dyn LogSink>,
    scripts: Arc<ScriptRegistry>,
}

impl HostApis {
    pub fn new(log: Arc<dyn LogSink>) -> Self {
        Self {
            log,
            scripts: Arc::new(ScriptRegistry::new()),
        }
    }
}

impl Default for HostApis {
    fn default() -> Self {
        Self::new(Arc::new(TracingLog))
    }
}

impl EngineApis for HostApis {
    fn logging(&self) -> Arc<dyn LogSink> {
        Arc::clone(&self.log)
    }

    fn scripting(&self) -> Arc<ScriptRegistry> {
        Arc::clone(&self.scripts)
    }
}
