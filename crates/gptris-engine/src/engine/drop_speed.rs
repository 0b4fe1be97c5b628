use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Gravity mode of the falling piece.
///
/// `Fast` is entered by the fast-drop command and lasts until the piece
/// settles.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_more::IsVariant,
)]
pub enum DropSpeed {
    #[default]
    Normal,
    Fast,
}

/// Tick intervals for each [`DropSpeed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpeedSettings {
    pub normal: Duration,
    pub fast: Duration,
}

impl Default for SpeedSettings {
    fn default() -> Self {
        Self {
            normal: Duration::from_millis(500),
            fast: Duration::from_millis(50),
        }
    }
}

impl SpeedSettings {
    #[must_use]
    pub fn interval(&self, speed: DropSpeed) -> Duration {
        match speed {
            DropSpeed::Normal => self.normal,
            DropSpeed::Fast => self.fast,
        }
    }
}
