use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::{Rect, RootMargin, intersection_ratio};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Visible share of the element, in `0.0..=1.0`, that counts as "in view".
    #[serde(deserialize_with = "unit_interval")]
    pub threshold: f64,
    pub root_margin: RootMargin,
    /// Once revealed, stay revealed and stop watching.
    pub trigger_once: bool,
    #[serde(with = "millis")]
    pub delay: Duration,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            threshold: 0.1,
            root_margin: RootMargin::default(),
            trigger_once: true,
            delay: Duration::ZERO,
        }
    }
}

impl DetectorConfig {
    pub fn threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold.clamp(0.0, 1.0);
        self
    }

    pub fn root_margin(mut self, root_margin: RootMargin) -> Self {
        self.root_margin = root_margin;
        self
    }

    pub fn trigger_once(mut self, trigger_once: bool) -> Self {
        self.trigger_once = trigger_once;
        self
    }

    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Whether a visible `ratio` meets the threshold.
    ///
    /// A zero threshold still needs some overlap: touching edges do not count.
    pub fn is_intersecting(&self, ratio: f64) -> bool {
        ratio > 0.0 && ratio >= self.threshold
    }
}

/// Snapshot of one element's reveal progress.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RevealState {
    pub has_triggered: bool,
    pub is_revealed: bool,
}

/// Tracks whether one element should be shown.
///
/// The detector is a plain state machine fed with intersection changes and
/// clock ticks, so the host decides where the time and geometry come from.
/// Every method that may flip the revealed flag returns the new value when it
/// changed.
#[derive(Debug, Clone)]
pub struct VisibilityDetector {
    config: DetectorConfig,
    revealed: bool,
    has_triggered: bool,
    intersecting: bool,
    pending: Option<Instant>,
}

impl VisibilityDetector {
    pub fn new(config: DetectorConfig) -> Self {
        Self {
            config,
            revealed: false,
            has_triggered: false,
            intersecting: false,
            pending: None,
        }
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    pub fn state(&self) -> RevealState {
        RevealState {
            has_triggered: self.has_triggered,
            is_revealed: self.revealed,
        }
    }

    pub fn is_intersecting(&self) -> bool {
        self.intersecting
    }

    /// A trigger-once detector that has fired needs no more observations.
    pub fn is_done(&self) -> bool {
        self.config.trigger_once && self.has_triggered
    }

    /// When the pending delayed reveal is due, if one is scheduled.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending
    }

    /// Feeds an observed layout and converts it to an intersection change.
    pub fn observe_layout(&mut self, target: Rect, viewport: Rect, now: Instant) -> Option<bool> {
        let ratio = intersection_ratio(target, viewport, &self.config.root_margin);
        let intersecting = self.config.is_intersecting(ratio);
        self.observe(intersecting, now)
    }

    pub fn observe(&mut self, intersecting: bool, now: Instant) -> Option<bool> {
        if self.is_done() {
            return None;
        }
        self.intersecting = intersecting;

        if !intersecting {
            // Leaving the viewport cancels a reveal that has not fired yet.
            self.pending = None;
            if !self.config.trigger_once && self.revealed {
                return self.set_revealed(false);
            }
            return None;
        }

        if self.revealed {
            return None;
        }

        if self.config.delay.is_zero() {
            return self.fire();
        }

        if self.pending.is_none() {
            self.pending = Some(now + self.config.delay);
        }
        None
    }

    /// Fires the delayed reveal once its deadline has passed.
    pub fn tick(&mut self, now: Instant) -> Option<bool> {
        match self.pending {
            Some(deadline) if now >= deadline => {
                self.pending = None;
                self.fire()
            }
            _ => None,
        }
    }

    /// Drops any pending reveal; nothing fires after this.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    fn fire(&mut self) -> Option<bool> {
        if self.config.trigger_once {
            self.has_triggered = true;
        }
        self.set_revealed(true)
    }

    fn set_revealed(&mut self, revealed: bool) -> Option<bool> {
        if self.revealed == revealed {
            return None;
        }
        self.revealed = revealed;
        Some(revealed)
    }
}

fn unit_interval<'de, D: serde::Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    let value = f64::deserialize(deserializer)?;
    if value.is_nan() {
        return Err(serde::de::Error::custom("threshold must be a number"));
    }
    Ok(value.clamp(0.0, 1.0))
}

mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
