use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Axis-aligned bounding box over grid cell coordinates.
///
/// Bounds are inclusive on both ends, so `[0,0]-[0,0]` covers exactly one
/// cell. A region whose minimum exceeds its maximum on either axis covers
/// no cells; the canonical such value is [`Region::NULL`].
///
/// The fields are public, so an empty region with other inverted bounds can
/// be built by hand. Such a value is not equal to `NULL`; test emptiness with
/// [`is_null`](Region::is_null), or canonicalize with
/// [`normalized`](Region::normalized). Deserialization always canonicalizes.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RawRegion")]
pub struct Region {
    pub min_x: i32,
    pub min_y: i32,
    pub max_x: i32,
    pub max_y: i32,
}

/// Wire shape of [`Region`], before empty bounds are canonicalized.
#[derive(Deserialize)]
struct RawRegion {
    min_x: i32,
    min_y: i32,
    max_x: i32,
    max_y: i32,
}

impl From<RawRegion> for Region {
    fn from(raw: RawRegion) -> Self {
        Region {
            min_x: raw.min_x,
            min_y: raw.min_y,
            max_x: raw.max_x,
            max_y: raw.max_y,
        }
        .normalized()
    }
}

impl Region {
    /// The "no region" value. Never intersects anything and is absorbed by
    /// [`expand`](Region::expand).
    pub const NULL: Region = Region {
        min_x: i32::MAX,
        min_y: i32::MAX,
        max_x: i32::MIN,
        max_y: i32::MIN,
    };

    /// Create a region from inclusive bounds.
    pub fn new(min_x: i32, min_y: i32, max_x: i32, max_y: i32) -> Result<Self, TypeError> {
        if min_x > max_x || min_y > max_y {
            return Err(TypeError::InvertedRegion {
                min_x,
                min_y,
                max_x,
                max_y,
            });
        }
        Ok(Self {
            min_x,
            min_y,
            max_x,
            max_y,
        })
    }

    /// Create the region spanned by two opposite corners, in any order.
    pub fn from_corners(a: (i32, i32), b: (i32, i32)) -> Self {
        Self {
            min_x: a.0.min(b.0),
            min_y: a.1.min(b.1),
            max_x: a.0.max(b.0),
            max_y: a.1.max(b.1),
        }
    }

    /// A single-cell region.
    pub fn cell(x: i32, y: i32) -> Self {
        Self::from_corners((x, y), (x, y))
    }

    /// Returns `true` if this region covers no cells.
    pub fn is_null(&self) -> bool {
        self.min_x > self.max_x || self.min_y > self.max_y
    }

    /// This region, or [`Region::NULL`] if it covers no cells.
    pub fn normalized(self) -> Self {
        if self.is_null() {
            Self::NULL
        } else {
            self
        }
    }

    /// Number of cell columns covered.
    pub fn width(&self) -> u64 {
        if self.is_null() {
            return 0;
        }
        (i64::from(self.max_x) - i64::from(self.min_x) + 1) as u64
    }

    /// Number of cell rows covered.
    pub fn height(&self) -> u64 {
        if self.is_null() {
            return 0;
        }
        (i64::from(self.max_y) - i64::from(self.min_y) + 1) as u64
    }

    /// Number of cells covered, saturating at `u64::MAX` for a region
    /// spanning the whole coordinate plane.
    pub fn area(&self) -> u64 {
        self.width().saturating_mul(self.height())
    }

    /// Returns `true` if the cell `(x, y)` lies inside this region.
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }

    /// Returns `true` if the two regions overlap, or if the gap between them
    /// is at most `tolerance` cells on both axes.
    ///
    /// Touching regions (`max_x == other.min_x`) overlap at tolerance zero.
    /// A null region never intersects anything.
    pub fn intersects(&self, other: &Region, tolerance: u32) -> bool {
        if self.is_null() || other.is_null() {
            return false;
        }
        let tol = i64::from(tolerance);
        i64::from(self.min_x) <= i64::from(other.max_x) + tol
            && i64::from(other.min_x) <= i64::from(self.max_x) + tol
            && i64::from(self.min_y) <= i64::from(other.max_y) + tol
            && i64::from(other.min_y) <= i64::from(self.max_y) + tol
    }

    /// Grow this region in place to the union bounding box of itself and
    /// `other`.
    pub fn expand(&mut self, other: &Region) {
        if other.is_null() {
            return;
        }
        if self.is_null() {
            *self = *other;
            return;
        }
        self.min_x = self.min_x.min(other.min_x);
        self.min_y = self.min_y.min(other.min_y);
        self.max_x = self.max_x.max(other.max_x);
        self.max_y = self.max_y.max(other.max_y);
    }

    /// The union bounding box of two regions.
    pub fn union(&self, other: &Region) -> Region {
        let mut merged = *self;
        merged.expand(other);
        merged
    }
}

impl Default for Region {
    fn default() -> Self {
        Self::NULL
    }
}

impl fmt::Debug for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Region({self})")
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            return write!(f, "null");
        }
        write!(
            f,
            "[{},{}]-[{},{}]",
            self.min_x, self.min_y, self.max_x, self.max_y
        )
    }
}

impl FromStr for Region {
    type Err = TypeError;

    /// Parse the `Display` form: `[x0,y0]-[x1,y1]` or `null`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s == "null" {
            return Ok(Self::NULL);
        }
        let invalid = || TypeError::InvalidRegion(s.to_string());

        let (lo, hi) = s.split_once("]-[").ok_or_else(invalid)?;
        let lo = lo.strip_prefix('[').ok_or_else(invalid)?;
        let hi = hi.strip_suffix(']').ok_or_else(invalid)?;

        let point = |text: &str| -> Result<(i32, i32), TypeError> {
            let (x, y) = text.split_once(',').ok_or_else(invalid)?;
            let x = x.trim().parse().map_err(|_| invalid())?;
            let y = y.trim().parse().map_err(|_| invalid())?;
            Ok((x, y))
        };

        let (min_x, min_y) = point(lo)?;
        let (max_x, max_y) = point(hi)?;
        Self::new(min_x, min_y, max_x, max_y)
    }
}
