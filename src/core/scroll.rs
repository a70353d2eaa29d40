//! # Scroll Position Monitor
//!
//! Decides whether the "jump to latest" control is visible. The check is a
//! plain threshold on the absolute scroll offset, re-run on every scroll
//! event. No hysteresis, no debouncing.
//!
//! Offsets are measured the way a bottom-anchored (reversed) list reports
//! them: 0 at the newest message, negative as the user scrolls back.

/// Default distance (in rows) past which the jump control appears.
pub const DEFAULT_JUMP_THRESHOLD: u32 = 2000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollMonitor {
    threshold: u32,
    show_jump: bool,
}

impl Default for ScrollMonitor {
    fn default() -> Self {
        Self::new(DEFAULT_JUMP_THRESHOLD)
    }
}

impl ScrollMonitor {
    pub fn new(threshold: u32) -> Self {
        Self {
            threshold,
            show_jump: false,
        }
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    /// Re-evaluate for a new offset. Strictly greater than the threshold shows the control.
    pub fn on_scroll(&mut self, offset: i64) -> bool {
        self.show_jump = offset.unsigned_abs() > u64::from(self.threshold);
        self.show_jump
    }

    pub fn show_jump_to_latest(&self) -> bool {
        self.show_jump
    }
}

/// Signed offset of a top-anchored viewport, expressed relative to the bottom.
///
/// `scroll_y` is the top-anchored offset, `max_y` the largest valid one.
pub fn offset_from_bottom(scroll_y: u16, max_y: u16) -> i64 {
    i64::from(scroll_y) - i64::from(max_y)
}
