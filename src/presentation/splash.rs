use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::UiConfig;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum SplashStage {
    Logo,
    Tagline,
    Hero,
}

impl SplashStage {
    pub fn next(self) -> Self {
        match self {
            SplashStage::Logo => SplashStage::Tagline,
            SplashStage::Tagline | SplashStage::Hero => SplashStage::Hero,
        }
    }
}

/// Timed splash → hero sequence. `Hero` is where it stays.
#[derive(Debug, Clone, PartialEq)]
pub struct SplashSequence {
    logo: Duration,
    tagline: Duration,
}

impl SplashSequence {
    pub fn new(logo: Duration, tagline: Duration) -> Self {
        Self { logo, tagline }
    }

    pub fn from_config(config: &UiConfig) -> Self {
        Self::new(
            Duration::from_millis(config.splash_logo_ms),
            Duration::from_millis(config.splash_tagline_ms),
        )
    }

    pub fn stage_at(&self, elapsed: Duration) -> SplashStage {
        if elapsed < self.logo {
            SplashStage::Logo
        } else if elapsed < self.logo + self.tagline {
            SplashStage::Tagline
        } else {
            SplashStage::Hero
        }
    }

    /// How long `stage` is shown; `None` for the resting stage.
    pub fn duration_of(&self, stage: SplashStage) -> Option<Duration> {
        match stage {
            SplashStage::Logo => Some(self.logo),
            SplashStage::Tagline => Some(self.tagline),
            SplashStage::Hero => None,
        }
    }

    pub fn total(&self) -> Duration {
        self.logo + self.tagline
    }
}

impl Default for SplashSequence {
    fn default() -> Self {
        Self::from_config(&UiConfig::default())
    }
}
