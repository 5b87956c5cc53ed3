// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Placement grammar: a primary side plus an optional alignment.
//!
//! ## Grammar
//!
//! - A bare side: `top`, `bottom`, `left`, or `right`. Alignment is `center`.
//! - `top` or `bottom`, then [`SEPARATOR`], then `center`, `left`, or `right`.
//! - `left` or `right`, then [`SEPARATOR`], then `center`, `top`, or `bottom`.
//!
//! Anything else is rejected with [`InvalidPlacement`].

use alloc::format;
use alloc::string::String;
use core::fmt;
use core::str::FromStr;

/// Separator between the side and alignment tokens.
pub const SEPARATOR: char = '|';

/// Primary side of the anchor the panel is placed on.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Side {
    /// Above the anchor.
    Top,
    /// Below the anchor.
    Bottom,
    /// Left of the anchor.
    Left,
    /// Right of the anchor.
    Right,
}

impl Side {
    /// Returns true for `Top` and `Bottom`, whose cross axis is horizontal.
    pub const fn is_vertical(self) -> bool {
        matches!(self, Self::Top | Self::Bottom)
    }

    /// The grammar token for this side.
    pub const fn token(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Bottom => "bottom",
            Self::Left => "left",
            Self::Right => "right",
        }
    }

    fn from_token(token: &str) -> Option<Self> {
        match token {
            "top" => Some(Self::Top),
            "bottom" => Some(Self::Bottom),
            "left" => Some(Self::Left),
            "right" => Some(Self::Right),
            _ => None,
        }
    }
}

/// Cross-axis alignment of the panel along the anchor's edge.
///
/// `Start` is the left edge for vertical sides and the top edge for horizontal
/// sides; `End` is the opposite edge.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Align {
    /// Align to the left (or top) edge of the anchor.
    Start,
    /// Center on the anchor.
    #[default]
    Center,
    /// Align to the right (or bottom) edge of the anchor.
    End,
}

impl Align {
    fn from_token(side: Side, token: &str) -> Option<Self> {
        match (side.is_vertical(), token) {
            (_, "center") => Some(Self::Center),
            (true, "left") | (false, "top") => Some(Self::Start),
            (true, "right") | (false, "bottom") => Some(Self::End),
            _ => None,
        }
    }
}

/// A parsed placement: side plus alignment.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlacementSpec {
    /// Primary side.
    pub side: Side,
    /// Cross-axis alignment.
    pub align: Align,
}

impl Default for PlacementSpec {
    /// `bottom|left`.
    fn default() -> Self {
        Self::new(Side::Bottom, Align::Start)
    }
}

impl PlacementSpec {
    /// Create a placement from its parts.
    pub const fn new(side: Side, align: Align) -> Self {
        Self { side, align }
    }

    /// Parse a placement string.
    ///
    /// The bare-side form only applies when no alignment token is present, so
    /// `"top"` is `(Top, Center)` while `"top|"` is rejected.
    pub fn parse(spec: &str) -> Result<Self, InvalidPlacement> {
        let invalid = || InvalidPlacement {
            spec: String::from(spec),
        };
        let (side_token, align_token) = match spec.split_once(SEPARATOR) {
            Some((side, align)) => (side, Some(align)),
            None => (spec, None),
        };
        let side = Side::from_token(side_token).ok_or_else(invalid)?;
        let align = match align_token {
            None => Align::Center,
            Some(token) => Align::from_token(side, token).ok_or_else(invalid)?,
        };
        Ok(Self { side, align })
    }

    /// The alignment as written in the grammar for this side.
    pub const fn align_token(self) -> &'static str {
        match (self.align, self.side.is_vertical()) {
            (Align::Center, _) => "center",
            (Align::Start, true) => "left",
            (Align::End, true) => "right",
            (Align::Start, false) => "top",
            (Align::End, false) => "bottom",
        }
    }

    /// Panel class names: `ns-popover-<side>-placement` and `ns-popover-<align>-align`.
    pub fn class_names(self) -> [String; 2] {
        [
            format!("ns-popover-{}-placement", self.side.token()),
            format!("ns-popover-{}-align", self.align_token()),
        ]
    }
}

impl FromStr for PlacementSpec {
    type Err = InvalidPlacement;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for PlacementSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.side.token(), SEPARATOR, self.align_token())
    }
}

/// A placement string that does not match the grammar.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[error("\"{spec}\" is not a valid placement or has an invalid combination of placements.")]
pub struct InvalidPlacement {
    /// The rejected input.
    pub spec: String,
}
