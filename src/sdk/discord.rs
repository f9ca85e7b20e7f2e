//! Discord Rich Presence backend using discord-sdk.

use std::num::NonZeroU32;
use std::sync::mpsc as std_mpsc;
use std::time::{Duration, UNIX_EPOCH};

use discord_sdk::{
    activity::{ActivityBuilder, Assets, PartyPrivacy},
    wheel::{UserState, Wheel},
    Discord, Subscriptions,
};
use tokio::sync::mpsc;

use crate::activity::Activity;
use crate::sdk::{ActivitySdk, SdkError, RESULT_OK, RESULT_UPDATE_FAILED};

/// Timeout for waiting for the Discord handshake.
const HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(10);

/// Owns the connection to the local Discord client.
///
/// The connection lives on a background task inside a private runtime, fed
/// through a channel: updates are a non-blocking send and completions come
/// back through [`ActivitySdk::run_callbacks`]. If the client is absent the
/// task parks after logging a warning and the handle degrades to a no-op,
/// letting the game run without Discord.
pub struct DiscordSdk {
    update_tx: mpsc::UnboundedSender<Activity>,
    completion_rx: std_mpsc::Receiver<i32>,
    _runtime: tokio::runtime::Runtime,
}

impl DiscordSdk {
    /// Spawns the connection task for the given application id.
    pub fn new(app_id: i64) -> Result<Self, SdkError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
            .map_err(|e| SdkError::Unavailable(e.to_string()))?;

        let (update_tx, update_rx) = mpsc::unbounded_channel();
        let (completion_tx, completion_rx) = std_mpsc::channel();
        runtime.spawn(run_discord_task(app_id, update_rx, completion_tx));

        Ok(Self {
            update_tx,
            completion_rx,
            _runtime: runtime,
        })
    }
}

impl ActivitySdk for DiscordSdk {
    fn update_activity(&mut self, activity: &Activity) {
        // Fails only when the task is gone; presence silently stops updating.
        let _ = self.update_tx.send(activity.clone());
    }

    fn run_callbacks(&mut self) -> Vec<i32> {
        let mut codes = Vec::new();
        while let Ok(code) = self.completion_rx.try_recv() {
            codes.push(code);
        }
        codes
    }
}

/// Background task that maintains the Discord connection and forwards
/// presence snapshots.
async fn run_discord_task(
    app_id: i64,
    mut update_rx: mpsc::UnboundedReceiver<Activity>,
    completion_tx: std_mpsc::Sender<i32>,
) {
    let (wheel, handler) = Wheel::new(Box::new(|err| {
        tracing::warn!("Discord error: {:?}", err);
    }));

    let mut user_spoke = wheel.user();

    let discord = match Discord::new(app_id, Subscriptions::ACTIVITY, Box::new(handler)) {
        Ok(d) => d,
        Err(e) => {
            tracing::warn!("Discord not available: {:?}", e);
            return;
        }
    };

    tracing::info!("Discord connecting...");

    let user = match tokio::time::timeout(HANDSHAKE_TIMEOUT, async {
        if user_spoke.0.changed().await.is_err() {
            Err("Discord connection closed".to_string())
        } else {
            match &*user_spoke.0.borrow() {
                UserState::Connected(user) => Ok(user.clone()),
                UserState::Disconnected(err) => Err(format!("Discord disconnected: {:?}", err)),
            }
        }
    })
    .await
    {
        Ok(Ok(user)) => user,
        Ok(Err(e)) => {
            tracing::warn!("{}", e);
            return;
        }
        Err(_) => {
            tracing::warn!("Discord handshake timed out");
            return;
        }
    };

    tracing::info!("Discord Rich Presence connected as {}", user.username);

    while let Some(snapshot) = update_rx.recv().await {
        let code = match discord.update_activity(build_activity(&snapshot)).await {
            Ok(_) => RESULT_OK,
            Err(e) => {
                tracing::debug!("Failed to update Discord activity: {:?}", e);
                RESULT_UPDATE_FAILED
            }
        };
        let _ = completion_tx.send(code);
    }

    discord.disconnect().await;
    tracing::info!("Discord Rich Presence disconnected");
}

/// Translates a presence snapshot into the SDK's activity shape. Empty
/// fields are left unset rather than sent as empty strings.
fn build_activity(snapshot: &Activity) -> ActivityBuilder {
    let mut assets = Assets::default();
    if !snapshot.large_image().is_empty() {
        assets = assets.large(snapshot.large_image(), Option::<&str>::None);
    }
    if !snapshot.small_image().is_empty() {
        let caption = (!snapshot.small_text().is_empty()).then(|| snapshot.small_text());
        assets = assets.small(snapshot.small_image(), caption);
    }

    let mut builder = ActivityBuilder::new().assets(assets);
    if !snapshot.state().is_empty() {
        builder = builder.state(snapshot.state());
    }
    if !snapshot.details().is_empty() {
        builder = builder.details(snapshot.details());
    }
    if snapshot.start_timestamp() > 0 {
        let start = UNIX_EPOCH + Duration::from_secs(snapshot.start_timestamp() as u64);
        builder = builder.start_timestamp(start);
    }

    let current = NonZeroU32::new(snapshot.party_current().max(0) as u32);
    let max = NonZeroU32::new(snapshot.party_max().max(0) as u32);
    if current.is_some() || max.is_some() {
        builder = builder.party("party", current, max, PartyPrivacy::Private);
    }

    builder
}
