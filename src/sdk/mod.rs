//! Seam between the plugin and the Discord SDK.
//!
//! The plugin never blocks on the SDK: updates are fire-and-forget and
//! their outcomes come back as numeric result codes through the per-frame
//! callback pump.

#[cfg(feature = "discord")]
pub mod discord;

use crate::activity::Activity;

/// Result code reported for a completed update request.
pub const RESULT_OK: i32 = 0;
/// The update request reached the client but was rejected or lost.
pub const RESULT_UPDATE_FAILED: i32 = 1;

/// An activity backend. One handle is created at setup and lives for the
/// process; there is no explicit teardown beyond dropping it.
pub trait ActivitySdk: Send {
    /// Queues an asynchronous update carrying the given snapshot. The
    /// outcome is delivered later through [`ActivitySdk::run_callbacks`].
    fn update_activity(&mut self, activity: &Activity);

    /// Drains the SDK's completion queue, returning one result code per
    /// finished update request. This is the only call that delivers
    /// completions.
    fn run_callbacks(&mut self) -> Vec<i32>;
}

/// The backend could not be constructed.
#[derive(Debug, thiserror::Error)]
pub enum SdkError {
    #[error("discord client unavailable: {0}")]
    Unavailable(String),
}

#[cfg(test)]
pub(crate) mod testkit {
    use std::sync::{Arc, Mutex};

    use super::ActivitySdk;
    use crate::activity::Activity;

    /// Records every payload it is handed and replays queued result codes
    /// on the next pump.
    #[derive(Default)]
    pub(crate) struct RecordingSdk {
        pub updates: Arc<Mutex<Vec<Activity>>>,
        pub pending_codes: Arc<Mutex<Vec<i32>>>,
    }

    impl ActivitySdk for RecordingSdk {
        fn update_activity(&mut self, activity: &Activity) {
            self.updates.lock().unwrap().push(activity.clone());
        }

        fn run_callbacks(&mut self) -> Vec<i32> {
            self.pending_codes.lock().unwrap().drain(..).collect()
        }
    }
}
