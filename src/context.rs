//! Shared plugin state, built once at setup and handed to every binding.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::activity::Activity;
use crate::host::LogSink;
use crate::sdk::{ActivitySdk, RESULT_OK};
use crate::PLUGIN_NAME;

/// Owns the activity record and the SDK handle.
///
/// A missing handle (SDK creation failed, or the feature is compiled out)
/// degrades every update to a guarded no-op; nothing here is fatal.
pub struct PluginContext {
    activity: Mutex<Activity>,
    sdk: Mutex<Option<Box<dyn ActivitySdk>>>,
    dirty: AtomicBool,
    log: Arc<dyn LogSink>,
}

impl PluginContext {
    pub fn new(sdk: Option<Box<dyn ActivitySdk>>, log: Arc<dyn LogSink>) -> Self {
        Self {
            activity: Mutex::new(Activity::default()),
            sdk: Mutex::new(sdk),
            dirty: AtomicBool::new(false),
            log,
        }
    }

    pub fn set_state(&self, value: &str) {
        self.activity.lock().unwrap().set_state(value);
        self.mark_dirty();
    }

    pub fn set_details(&self, value: &str) {
        self.activity.lock().unwrap().set_details(value);
        self.mark_dirty();
    }

    pub fn set_class(&self, image_key: &str, caption: &str) {
        self.activity.lock().unwrap().set_class(image_key, caption);
        self.mark_dirty();
    }

    pub fn set_party_size(&self, current: i32, max: i32) {
        self.activity.lock().unwrap().set_party_size(current, max);
        self.mark_dirty();
    }

    pub fn set_start_time(&self) {
        self.activity.lock().unwrap().mark_started_now();
        self.mark_dirty();
    }

    pub(crate) fn set_large_image(&self, key: &str) {
        self.activity.lock().unwrap().set_large_image(key);
        self.mark_dirty();
    }

    /// A copy of the current presence record.
    pub fn activity(&self) -> Activity {
        self.activity.lock().unwrap().clone()
    }

    /// Issues one asynchronous update carrying the current snapshot.
    pub fn push_update(&self) {
        self.dirty.store(false, Ordering::Relaxed);
        let snapshot = self.activity.lock().unwrap().clone();
        if let Some(sdk) = self.sdk.lock().unwrap().as_mut() {
            sdk.update_activity(&snapshot);
        }
    }

    /// Drains the SDK's completion queue, reporting each non-success code
    /// through the host log.
    pub fn pump_callbacks(&self) {
        let codes = match self.sdk.lock().unwrap().as_mut() {
            Some(sdk) => sdk.run_callbacks(),
            None => return,
        };
        for code in codes {
            if code != RESULT_OK {
                self.log
                    .info(PLUGIN_NAME, &format!("non-zero update result: {}", code));
            }
        }
    }

    /// Per-frame tick: pump completions, then push an update if a script
    /// mutated the activity since the last push.
    pub fn tick(&self) {
        self.pump_callbacks();
        if self.dirty.swap(false, Ordering::Relaxed) {
            self.push_update();
        }
    }

    fn mark_dirty(&self) {
        self.dirty.store(true, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::host::testkit::MemoryLog;
    use crate::sdk::testkit::RecordingSdk;

    #[test]
    fn push_without_a_handle_is_a_no_op() {
        let ctx = PluginContext::new(None, MemoryLog::shared());
        ctx.set_state("In Mission");
        ctx.push_update();
        ctx.tick();
    }

    #[test]
    fn non_success_codes_become_one_log_line_each() {
        let sdk = RecordingSdk::default();
        let codes = Arc::clone(&sdk.pending_codes);
        let log = MemoryLog::shared();
        let ctx = PluginContext::new(Some(Box::new(sdk)), log.clone());

        codes.lock().unwrap().extend([RESULT_OK, 4]);
        ctx.pump_callbacks();

        let lines = log.lines.lock().unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].0, PLUGIN_NAME);
        assert!(lines[0].1.contains('4'), "code missing from {:?}", lines[0].1);
        drop(lines);

        // Activity is unaffected by completion delivery.
        assert_eq!(ctx.activity(), Activity::default());
    }

    #[test]
    fn tick_pushes_only_after_a_mutation() {
        let sdk = RecordingSdk::default();
        let updates = Arc::clone(&sdk.updates);
        let ctx = PluginContext::new(Some(Box::new(sdk)), MemoryLog::shared());

        ctx.tick();
        ctx.tick();
        assert!(updates.lock().unwrap().is_empty());

        ctx.set_state("In Mission");
        ctx.tick();
        ctx.tick();

        let pushed = updates.lock().unwrap();
        assert_eq!(pushed.len(), 1);
        assert_eq!(pushed[0].state(), "In Mission");
    }
}
