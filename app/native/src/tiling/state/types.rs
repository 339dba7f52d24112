//! Core value types for the container tree.
//!
//! These are plain values shared by the tree, the handlers and the adapter
//! boundary:
//! - Geometry (`Rect`, `Point`)
//! - Layout axes (`TilingDirection`, `Direction`)
//! - Native identities (`WindowHandle`, `MonitorInfo`, `WindowInfo`)

use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

// ============================================================================
// Geometry Types
// ============================================================================

/// A point in screen coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// X coordinate.
    pub x: f64,
    /// Y coordinate.
    pub y: f64,
}

impl Point {
    /// Creates a new point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self { Self { x, y } }
}

/// A rectangle with position and size.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// Create a new rectangle.
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Create a zero-sized rectangle at origin.
    #[must_use]
    pub const fn zero() -> Self { Self::new(0.0, 0.0, 0.0, 0.0) }

    /// Check if this rectangle has valid dimensions.
    #[must_use]
    pub fn is_valid(&self) -> bool { self.width > 0.0 && self.height > 0.0 }

    /// Check if this rectangle contains a point.
    #[must_use]
    pub fn contains_point(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x < self.x + self.width
            && point.y >= self.y
            && point.y < self.y + self.height
    }

    /// Get the center point of this rectangle.
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Shrink the rectangle by `amount` on every edge.
    ///
    /// Never produces negative dimensions.
    #[must_use]
    pub fn inset(&self, amount: f64) -> Self {
        Self::new(
            self.x + amount,
            self.y + amount,
            2.0f64.mul_add(-amount, self.width).max(0.0),
            2.0f64.mul_add(-amount, self.height).max(0.0),
        )
    }

    /// Length of the rectangle along a tiling axis.
    #[must_use]
    pub const fn extent(&self, direction: TilingDirection) -> f64 {
        match direction {
            TilingDirection::Horizontal => self.width,
            TilingDirection::Vertical => self.height,
        }
    }

    /// Check if two rectangles are approximately equal (within epsilon).
    #[must_use]
    pub fn approx_eq(&self, other: &Self, epsilon: f64) -> bool {
        (self.x - other.x).abs() < epsilon
            && (self.y - other.y).abs() < epsilon
            && (self.width - other.width).abs() < epsilon
            && (self.height - other.height).abs() < epsilon
    }
}

// ============================================================================
// Layout Axes
// ============================================================================

/// The axis along which a container lays out its children.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "kebab-case")]
pub enum TilingDirection {
    /// Children side by side, left to right.
    #[default]
    Horizontal,
    /// Children stacked, top to bottom.
    Vertical,
}

impl TilingDirection {
    /// Returns the other axis.
    #[must_use]
    pub const fn inverse(self) -> Self {
        match self {
            Self::Horizontal => Self::Vertical,
            Self::Vertical => Self::Horizontal,
        }
    }

    /// Returns the direction name as a static kebab-case string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Horizontal => "horizontal",
            Self::Vertical => "vertical",
        }
    }
}

impl fmt::Display for TilingDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

/// A movement direction for focus and window moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    /// The tiling axis a movement in this direction travels along.
    ///
    /// Left/right moves need a horizontal container, up/down a vertical one.
    #[must_use]
    pub const fn tiling_direction(self) -> TilingDirection {
        match self {
            Self::Left | Self::Right => TilingDirection::Horizontal,
            Self::Up | Self::Down => TilingDirection::Vertical,
        }
    }

    /// Returns `true` for directions that move towards the start of a
    /// container's children (left and up).
    #[must_use]
    pub const fn is_backward(self) -> bool { matches!(self, Self::Left | Self::Up) }
}

// ============================================================================
// Native Identities
// ============================================================================

/// Opaque native window handle reported by the platform adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WindowHandle(pub u64);

impl fmt::Display for WindowHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{:#x}", self.0) }
}

/// Descriptive metadata of a native window, used by ignore rules.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WindowInfo {
    /// Window title.
    pub title: String,
    /// Native window class name.
    pub class_name: String,
    /// Name of the owning process.
    pub process_name: String,
}

/// A physical display as enumerated by the platform adapter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitorInfo {
    /// Stable device name (e.g., `\\.\DISPLAY1`).
    pub id: String,

    /// Working area of the display (excluding taskbars and docks).
    pub rect: Rect,

    /// Is this the primary display?
    #[serde(default)]
    pub is_primary: bool,
}

/// A window that already exists when the manager starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowSeed {
    pub handle: WindowHandle,
    pub rect: Rect,
    #[serde(default)]
    pub info: WindowInfo,
}

/// Mouse button state sampled with a cursor move.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MouseButtons {
    pub left: bool,
    pub right: bool,
}

impl MouseButtons {
    /// Returns `true` if any button is held (a drag is in progress).
    #[must_use]
    pub const fn any_pressed(self) -> bool { self.left || self.right }
}

// ============================================================================
// Tests
// ============================================================================
