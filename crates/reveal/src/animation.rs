use std::time::Duration;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString, VariantArray};

pub const DEFAULT_DURATION_MS: u32 = 700;

#[derive(
    EnumString,
    Display,
    AsRefStr,
    VariantArray,
    Default,
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum Animation {
    FadeIn,
    #[default]
    SlideUp,
    SlideDown,
    SlideLeft,
    SlideRight,
    ScaleUp,
}

impl Animation {
    /// Utility classes for the pre-reveal pose.
    pub fn hidden_classes(&self) -> &'static str {
        match self {
            Animation::FadeIn => "opacity-0",
            Animation::SlideUp => "opacity-0 translate-y-8",
            Animation::SlideDown => "opacity-0 -translate-y-8",
            Animation::SlideLeft => "opacity-0 translate-x-8",
            Animation::SlideRight => "opacity-0 -translate-x-8",
            Animation::ScaleUp => "opacity-0 scale-95",
        }
    }

    /// Every animation settles into the same resting pose.
    pub fn shown_classes(&self) -> &'static str {
        "opacity-100 translate-y-0 translate-x-0 scale-100"
    }
}

/// Presentation of one scroll-revealed element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Reveal {
    pub animation: Animation,
    pub duration_ms: u32,
    /// Extra classes from the caller, appended verbatim.
    pub class_name: String,
    #[serde(skip)]
    pub delay: Duration,
}

impl Default for Reveal {
    fn default() -> Self {
        Self {
            animation: Animation::default(),
            duration_ms: DEFAULT_DURATION_MS,
            class_name: String::new(),
            delay: Duration::ZERO,
        }
    }
}

impl Reveal {
    pub fn new(animation: Animation) -> Self {
        Self {
            animation,
            ..Default::default()
        }
    }

    pub fn duration_ms(mut self, duration_ms: u32) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = class_name.into();
        self
    }

    /// Class list for the element given the detector's revealed flag.
    pub fn classes(&self, revealed: bool) -> String {
        let state = if revealed {
            self.animation.shown_classes()
        } else {
            self.animation.hidden_classes()
        };

        let mut classes = format!(
            "transition-all ease-out duration-{} {state}",
            self.duration_ms
        );
        if !self.class_name.trim().is_empty() {
            classes.push(' ');
            classes.push_str(self.class_name.trim());
        }
        classes
    }

    /// Inline style carrying the transition delay, if any.
    pub fn style(&self) -> Option<String> {
        if self.delay.is_zero() {
            return None;
        }
        Some(format!("transition-delay: {}ms", self.delay.as_millis()))
    }
}
