//! Axis-aligned box overlap tests
//!
//! Every entity is a centred box; y grows downward so `min.y` is the top edge.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::tuning::Insets;

/// An axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Box of `size` centred on `center`
    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        let half = size / 2.0;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Shrink each side independently
    pub fn inset(&self, insets: &Insets) -> Self {
        Self {
            min: Vec2::new(self.min.x + insets.left, self.min.y + insets.top),
            max: Vec2::new(self.max.x - insets.right, self.max.y - insets.bottom),
        }
    }

    /// Strict overlap; boxes that only share an edge do not touch
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) / 2.0
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }
}

/// Index of the first box in `boxes` overlapping `probe`
pub fn first_overlap<I>(probe: &Aabb, boxes: I) -> Option<usize>
where
    I: IntoIterator<Item = Aabb>,
{
    boxes.into_iter().position(|b| probe.overlaps(&b))
}
