//! Client options.

use serde::{Deserialize, Serialize};

/// Tunables for the higher-level read patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientOptions {
    /// Upper bound on the window fetched for a sample after a successful trial read.
    pub sample_window_cap: u32,

    /// Oversampling factor after a successful trial read.
    pub narrow_multiplier: u32,

    /// Oversampling factor when the trial read failed.
    pub wide_multiplier: u32,

    /// Largest limit the client will ever request in one query.
    pub max_fetch_limit: u32,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            sample_window_cap: 50,
            narrow_multiplier: 2,
            wide_multiplier: 3,
            max_fetch_limit: 300,
        }
    }
}

impl ClientOptions {
    /// `min(count × narrow_multiplier, sample_window_cap)`
    pub fn narrow_window(&self, count: u32) -> u32 {
        count
            .saturating_mul(self.narrow_multiplier)
            .min(self.sample_window_cap)
            .min(self.max_fetch_limit)
    }

    /// `min(count × wide_multiplier, max_fetch_limit)`
    pub fn wide_window(&self, count: u32) -> u32 {
        count
            .saturating_mul(self.wide_multiplier)
            .min(self.max_fetch_limit)
    }
}
