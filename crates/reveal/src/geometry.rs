use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum MarginError {
    #[error("root margin takes 1 to 4 values, got {0}")]
    Arity(usize),

    #[error("invalid margin length `{0}`, expected px or %")]
    Length(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn area(&self) -> f64 {
        self.width.max(0.0) * self.height.max(0.0)
    }

    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        if right < x || bottom < y {
            return None;
        }

        Some(Rect::new(x, y, right - x, bottom - y))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Length {
    Px(f64),
    Percent(f64),
}

impl Length {
    fn resolve(self, basis: f64) -> f64 {
        match self {
            Length::Px(px) => px,
            Length::Percent(pct) => basis * pct / 100.0,
        }
    }
}

impl FromStr for Length {
    type Err = MarginError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || MarginError::Length(s.to_owned());

        if let Some(px) = s.strip_suffix("px") {
            return px.parse().map(Length::Px).map_err(|_| invalid());
        }
        if let Some(pct) = s.strip_suffix('%') {
            return pct.parse().map(Length::Percent).map_err(|_| invalid());
        }
        // Unitless zero is the only bare number CSS accepts here.
        match s.parse::<f64>() {
            Ok(value) if value == 0.0 => Ok(Length::Px(0.0)),
            _ => Err(invalid()),
        }
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Length::Px(px) => write!(f, "{px}px"),
            Length::Percent(pct) => write!(f, "{pct}%"),
        }
    }
}

/// Inset applied to the viewport before intersecting, in CSS margin order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RootMargin {
    pub top: Length,
    pub right: Length,
    pub bottom: Length,
    pub left: Length,
}

impl RootMargin {
    pub const ZERO: RootMargin = RootMargin {
        top: Length::Px(0.0),
        right: Length::Px(0.0),
        bottom: Length::Px(0.0),
        left: Length::Px(0.0),
    };

    /// Grows (positive) or shrinks (negative) `viewport` by the margin.
    /// Percentages resolve against the viewport's height for top/bottom and
    /// its width for left/right.
    pub fn apply(&self, viewport: Rect) -> Rect {
        let top = self.top.resolve(viewport.height);
        let right = self.right.resolve(viewport.width);
        let bottom = self.bottom.resolve(viewport.height);
        let left = self.left.resolve(viewport.width);

        Rect::new(
            viewport.x - left,
            viewport.y - top,
            viewport.width + left + right,
            viewport.height + top + bottom,
        )
    }
}

impl Default for RootMargin {
    fn default() -> Self {
        Self {
            bottom: Length::Px(-50.0),
            ..Self::ZERO
        }
    }
}

impl FromStr for RootMargin {
    type Err = MarginError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let values = s
            .split_whitespace()
            .map(Length::from_str)
            .collect::<Result<Vec<_>, _>>()?;

        let (top, right, bottom, left) = match values[..] {
            [all] => (all, all, all, all),
            [vertical, horizontal] => (vertical, horizontal, vertical, horizontal),
            [top, horizontal, bottom] => (top, horizontal, bottom, horizontal),
            [top, right, bottom, left] => (top, right, bottom, left),
            _ => return Err(MarginError::Arity(values.len())),
        };

        Ok(Self {
            top,
            right,
            bottom,
            left,
        })
    }
}

impl TryFrom<String> for RootMargin {
    type Error = MarginError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<RootMargin> for String {
    fn from(value: RootMargin) -> Self {
        value.to_string()
    }
}

impl fmt::Display for RootMargin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} {}", self.top, self.right, self.bottom, self.left)
    }
}

/// Fraction of `target` visible inside the margin-adjusted `viewport`.
pub fn intersection_ratio(target: Rect, viewport: Rect, margin: &RootMargin) -> f64 {
    let root = margin.apply(viewport);
    let Some(visible) = target.intersection(&root) else {
        return 0.0;
    };

    let area = target.area();
    if area == 0.0 {
        return 1.0;
    }

    (visible.area() / area).clamp(0.0, 1.0)
}
