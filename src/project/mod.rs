//! Process-wide project state
//!
//! The marker model never owns the project frame rate; it reads it from a
//! shared profile at each conversion. Frame indices derived through the
//! profile are rate-relative snapshots: changing the rate changes what
//! `frame` means, so nothing in the crate caches a frame index.

use std::sync::RwLock;

use crate::domain::model::FrameRate;

/// Shared holder of the current project frame rate.
///
/// Lifetime matches the open project; models take it by `Arc` at
/// construction.
pub struct ProjectProfile {
    frame_rate: RwLock<FrameRate>,
}

impl ProjectProfile {
    pub fn new(frame_rate: FrameRate) -> Self {
        Self {
            frame_rate: RwLock::new(frame_rate),
        }
    }

    /// The frame rate at this instant
    pub fn frame_rate(&self) -> FrameRate {
        *self.frame_rate.read().unwrap()
    }

    /// Replace the project frame rate.
    ///
    /// Snap targets registered with a marker model were fed frame indices
    /// under the old rate; re-register them after a rate change.
    pub fn set_frame_rate(&self, frame_rate: FrameRate) {
        *self.frame_rate.write().unwrap() = frame_rate;
    }
}

impl Default for ProjectProfile {
    fn default() -> Self {
        Self::new(FrameRate::fps_25())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_rate_is_shared_state() {
        let profile = ProjectProfile::default();
        assert_eq!(profile.frame_rate(), FrameRate::fps_25());

        profile.set_frame_rate(FrameRate::fps_ntsc());
        assert_eq!(profile.frame_rate(), FrameRate::fps_ntsc());
    }
}
