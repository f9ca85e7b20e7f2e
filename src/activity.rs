//! The current presence snapshot mirrored into the SDK on each update.

use std::time::{SystemTime, UNIX_EPOCH};

/// Maximum length, in bytes, of every text field in the presence payload.
pub const TEXT_LIMIT: usize = 127;

/// A single mutable presence record. There is no history and no rollback;
/// script calls overwrite prior values with last-write-wins semantics.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Activity {
    state: String,
    details: String,
    small_image: String,
    small_text: String,
    large_image: String,
    party_current: i32,
    party_max: i32,
    start_timestamp: i64,
}

impl Activity {
    /// Sets the one-line status shown under the game name.
    pub fn set_state(&mut self, value: &str) {
        self.state = clamp_text(value);
    }

    /// Sets the second status line.
    pub fn set_details(&mut self, value: &str) {
        self.details = clamp_text(value);
    }

    /// Sets the small-image key and its hover caption together.
    ///
    /// Callers validate both arguments before calling; this never stores
    /// one half of the pair on its own.
    pub fn set_class(&mut self, image_key: &str, caption: &str) {
        self.small_image = clamp_text(image_key);
        self.small_text = clamp_text(caption);
    }

    /// Stores the party sizes as given. No ordering or bounds check is
    /// performed; `current > max` is accepted and left to the SDK.
    pub fn set_party_size(&mut self, current: i32, max: i32) {
        self.party_current = current;
        self.party_max = max;
    }

    /// Sets the elapsed-time anchor to wall-clock now. Never cleared.
    pub fn mark_started_now(&mut self) {
        self.start_timestamp = unix_now();
    }

    /// Sets the large-image asset key. Fixed once at setup; scripts have
    /// no binding that reaches this.
    pub fn set_large_image(&mut self, key: &str) {
        self.large_image = clamp_text(key);
    }

    pub fn state(&self) -> &str {
        &self.state
    }

    pub fn details(&self) -> &str {
        &self.details
    }

    pub fn small_image(&self) -> &str {
        &self.small_image
    }

    pub fn small_text(&self) -> &str {
        &self.small_text
    }

    pub fn large_image(&self) -> &str {
        &self.large_image
    }

    pub fn party_current(&self) -> i32 {
        self.party_current
    }

    pub fn party_max(&self) -> i32 {
        self.party_max
    }

    pub fn start_timestamp(&self) -> i64 {
        self.start_timestamp
    }
}

/// Truncates to at most [`TEXT_LIMIT`] bytes, silently, without splitting
/// a UTF-8 character.
fn clamp_text(value: &str) -> String {
    if value.len() <= TEXT_LIMIT {
        return value.to_owned();
    }
    let mut end = TEXT_LIMIT;
    while !value.is_char_boundary(end) {
        end -= 1;
    }
    value[..end].to_owned()
}

/// Wall-clock seconds since the Unix epoch.
pub(crate) fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs() as i64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_stored_verbatim() {
        let mut activity = Activity::default();
        activity.set_state("In Mission");
        assert_eq!(activity.state(), "In Mission");
    }

    #[test]
    fn long_text_keeps_the_first_127_bytes() {
        let long = "x".repeat(300);
        let mut activity = Activity::default();
        activity.set_state(&long);
        activity.set_details(&long);
        assert_eq!(activity.state(), &long[..TEXT_LIMIT]);
        assert_eq!(activity.details(), &long[..TEXT_LIMIT]);
    }

    #[test]
    fn truncation_never_splits_a_character() {
        // 126 ASCII bytes followed by a 3-byte character straddling the bound.
        let mut input = "a".repeat(126);
        input.push('€');
        input.push_str("tail");

        let mut activity = Activity::default();
        activity.set_details(&input);

        assert!(activity.details().len() <= TEXT_LIMIT);
        assert_eq!(activity.details(), "a".repeat(126));
    }

    #[test]
    fn class_stores_both_halves() {
        let mut activity = Activity::default();
        activity.set_class("zealot", "Zealot");
        assert_eq!(activity.small_image(), "zealot");
        assert_eq!(activity.small_text(), "Zealot");
    }

    #[test]
    fn party_sizes_are_not_range_checked() {
        let mut activity = Activity::default();
        activity.set_party_size(5, 4);
        assert_eq!(activity.party_current(), 5);
        assert_eq!(activity.party_max(), 4);
    }

    #[test]
    fn start_time_is_monotonic_under_wall_clock() {
        let mut activity = Activity::default();
        activity.mark_started_now();
        let first = activity.start_timestamp();
        activity.mark_started_now();
        assert!(activity.start_timestamp() >= first);
        assert!(first > 0);
    }
}
