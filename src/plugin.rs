//! The plugin the host loads and drives.

use std::sync::Arc;

use crate::context::PluginContext;
use crate::host::{EngineApis, GamePlugin};
use crate::script::bindings;
use crate::sdk::ActivitySdk;
use crate::PLUGIN_NAME;

/// Discord application id for this game's presence assets.
#[cfg(feature = "discord")]
const DISCORD_APP_ID: i64 = 1111429477055090698;

/// Large-image asset shown on every presence card. Set once at setup;
/// scripts cannot change it.
const DEFAULT_LARGE_IMAGE: &str = "game-logo";

/// Rich Presence plugin: registers the script module at setup and forwards
/// presence updates to Discord once per frame.
pub struct PresencePlugin {
    pending_sdk: Option<Box<dyn ActivitySdk>>,
    ctx: Option<Arc<PluginContext>>,
}

impl PresencePlugin {
    /// A plugin that builds the default Discord backend at setup.
    pub fn new() -> Self {
        Self {
            pending_sdk: None,
            ctx: None,
        }
    }

    /// A plugin with an injected backend, for tests and alternate SDKs.
    pub fn with_sdk(sdk: Box<dyn ActivitySdk>) -> Self {
        Self {
            pending_sdk: Some(sdk),
            ctx: None,
        }
    }

    fn create_sdk(&mut self) -> Option<Box<dyn ActivitySdk>> {
        if let Some(sdk) = self.pending_sdk.take() {
            return Some(sdk);
        }
        default_sdk()
    }
}

impl Default for PresencePlugin {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "discord")]
fn default_sdk() -> Option<Box<dyn ActivitySdk>> {
    match crate::sdk::discord::DiscordSdk::new(DISCORD_APP_ID) {
        Ok(sdk) => Some(Box::new(sdk)),
        Err(e) => {
            // Non-fatal: presence updates degrade to no-ops.
            tracing::warn!("[setup_game] {}", e);
            None
        }
    }
}

#[cfg(not(feature = "discord"))]
fn default_sdk() -> Option<Box<dyn ActivitySdk>> {
    None
}

impl GamePlugin for PresencePlugin {
    fn name(&self) -> &'static str {
        PLUGIN_NAME
    }

    fn setup_game(&mut self, apis: &dyn EngineApis) {
        tracing::info!("[setup_game] Initialising");

        let sdk = self.create_sdk();
        let ctx = Arc::new(PluginContext::new(sdk, apis.logging()));
        ctx.set_large_image(DEFAULT_LARGE_IMAGE);

        bindings::register(&apis.scripting(), &ctx);

        ctx.push_update();
        self.ctx = Some(ctx);
    }

    fn loaded(&mut self, _apis: &dyn EngineApis) {
        // Reserved hook.
    }

    fn update_game(&mut self, _dt: f32) {
        if let Some(ctx) = &self.ctx {
            ctx.tick();
        }
    }

    fn shutdown_game(&mut self) {
        tracing::info!("[shutdown_game] Shutting down");
        // No explicit SDK teardown; dropping the context closes the handle.
        self.ctx = None;
    }
}
