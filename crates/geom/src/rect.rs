use std::fmt;

use super::{Error, Point, Result};

/// An axis-aligned rectangle with a signed origin.
///
/// The far corner is `top + (width, height)` and is part of the rectangle:
/// containment is inclusive on both edges. A rectangle whose fields are all
/// `-1` is "unset" and acts as the identity for [`Rect::merge`].
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub struct Rect {
    /// Top-left corner.
    pub top: Point,
    /// Width.
    pub width: i32,
    /// Height.
    pub height: i32,
}

impl Default for Rect {
    fn default() -> Self {
        Self::UNSET
    }
}

impl Rect {
    /// The unset sentinel.
    pub const UNSET: Self = Self {
        top: Point { x: -1, y: -1 },
        width: -1,
        height: -1,
    };

    /// Construct a rectangle from coordinates and size.
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            top: Point { x, y },
            width,
            height,
        }
    }

    /// Construct a rectangle, rejecting negative sizes and far corners that
    /// do not fit in an `i32`.
    pub fn checked(x: i32, y: i32, width: i32, height: i32) -> Result<Self> {
        if width < 0 || height < 0 {
            return Err(Error::Geometry(format!(
                "negative size {width}x{height} at ({x}, {y})"
            )));
        }
        if x.checked_add(width).is_none() || y.checked_add(height).is_none() {
            return Err(Error::Geometry(format!(
                "size {width}x{height} at ({x}, {y}) overflows"
            )));
        }
        Ok(Self::new(x, y, width, height))
    }

    /// Is this the unset sentinel?
    pub fn is_unset(&self) -> bool {
        *self == Self::UNSET
    }

    /// The far corner of the rectangle, saturating at the `i32` bounds.
    pub fn bottom(&self) -> Point {
        Point {
            x: self.top.x.saturating_add(self.width),
            y: self.top.y.saturating_add(self.height),
        }
    }

    /// Does the rectangle contain the point? Both edges are inclusive.
    pub fn contains(&self, x: i32, y: i32) -> bool {
        if self.is_unset() {
            return false;
        }
        let bottom = self.bottom();
        x >= self.top.x && y >= self.top.y && x <= bottom.x && y <= bottom.y
    }

    /// Does the rectangle contain the point? Both edges are inclusive.
    pub fn contains_point(&self, p: Point) -> bool {
        self.contains(p.x, p.y)
    }

    /// Does this rectangle fully enclose `other`? Every rectangle encloses the
    /// unset sentinel.
    pub fn encloses(&self, other: &Self) -> bool {
        if other.is_unset() {
            return true;
        }
        if self.is_unset() {
            return false;
        }
        let (a, b) = (self.bottom(), other.bottom());
        self.top.x <= other.top.x && self.top.y <= other.top.y && a.x >= b.x && a.y >= b.y
    }

    /// Grow this rectangle to the bounding box of itself and `other`.
    pub fn merge(&mut self, other: &Self) {
        if other.is_unset() {
            return;
        }
        if self.is_unset() {
            *self = *other;
            return;
        }
        let top = self.top.min(other.top);
        let bottom = self.bottom().max(other.bottom());
        self.top = top;
        self.width = bottom.x.saturating_sub(top.x);
        self.height = bottom.y.saturating_sub(top.y);
    }

    /// Return the bounding box of this rectangle and `other`.
    pub fn merged(mut self, other: &Self) -> Self {
        self.merge(other);
        self
    }

    /// Shrink the rectangle by `margin` on every side. The size never drops
    /// below zero.
    pub fn inset(&self, margin: i32) -> Self {
        if self.is_unset() {
            return *self;
        }
        Self {
            top: Point {
                x: self.top.x.saturating_add(margin),
                y: self.top.y.saturating_add(margin),
            },
            width: self.width.saturating_sub(margin.saturating_mul(2)).max(0),
            height: self.height.saturating_sub(margin.saturating_mul(2)).max(0),
        }
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_unset() {
            return write!(f, "unset");
        }
        write!(
            f,
            "({}, {}) {}x{}",
            self.top.x, self.top.y, self.width, self.height
        )
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn contains_is_inclusive() {
        let r = Rect::new(10, 10, 5, 5);
        assert!(r.contains(10, 10));
        assert!(r.contains(15, 15));
        assert!(r.contains(12, 15));
        assert!(!r.contains(16, 12));
        assert!(!r.contains(9, 12));
    }

    #[test]
    fn unset_contains_nothing() {
        assert!(!Rect::UNSET.contains(-1, -1));
        assert!(!Rect::default().contains(0, 0));
    }

    #[test]
    fn merge_into_unset_copies() {
        let mut r = Rect::UNSET;
        r.merge(&Rect::new(90, 5, 120, 400));
        assert_eq!(r, Rect::new(90, 5, 120, 400));
    }

    #[test]
    fn merge_unset_is_noop() {
        let mut r = Rect::new(1, 2, 3, 4);
        r.merge(&Rect::UNSET);
        assert_eq!(r, Rect::new(1, 2, 3, 4));
    }

    #[test]
    fn merge_grows_both_corners() {
        let mut r = Rect::new(100, 50, 100, 40);
        r.merge(&Rect::new(90, 100, 50, 60));
        assert_eq!(r, Rect::new(90, 50, 110, 110));
        assert_eq!(r.bottom(), Point::new(200, 160));
    }

    #[test]
    fn merge_enclosed_is_noop() {
        let mut r = Rect::new(90, 5, 120, 400);
        r.merge(&Rect::new(100, 50, 100, 40));
        r.merge(&Rect::new(100, 100, 100, 40));
        assert_eq!(r, Rect::new(90, 5, 120, 400));
    }

    #[test]
    fn checked_rejects_negative() {
        assert!(Rect::checked(0, 0, -1, 4).is_err());
        assert!(Rect::checked(0, 0, 4, -1).is_err());
        assert_eq!(Rect::checked(-3, -3, 0, 0), Ok(Rect::new(-3, -3, 0, 0)));
    }

    #[test]
    fn checked_rejects_overflowing_corner() {
        assert!(Rect::checked(i32::MAX - 5, 0, 10, 10).is_err());
        assert!(Rect::checked(0, i32::MAX, 0, 1).is_err());
        assert_eq!(
            Rect::checked(i32::MAX - 10, 0, 10, 10),
            Ok(Rect::new(i32::MAX - 10, 0, 10, 10))
        );
    }

    #[test]
    fn extreme_rects_do_not_panic() {
        let far = Rect::new(i32::MAX - 5, 0, 10, 10);
        assert!(!far.contains(0, 0));
        assert!(far.contains(i32::MAX, 5));
        let near = Rect::new(i32::MIN, 0, 1, 1);
        let merged = near.merged(&far);
        assert_eq!(merged.top, Point::new(i32::MIN, 0));
        assert_eq!(merged.width, i32::MAX);
    }

    #[test]
    fn inset_clamps() {
        assert_eq!(Rect::new(0, 0, 10, 6).inset(2), Rect::new(2, 2, 6, 2));
        assert_eq!(Rect::new(0, 0, 3, 3).inset(2), Rect::new(2, 2, 0, 0));
        assert!(Rect::UNSET.inset(2).is_unset());
    }

    #[test]
    fn display() {
        assert_eq!(Rect::new(1, 2, 3, 4).to_string(), "(1, 2) 3x4");
        assert_eq!(Rect::UNSET.to_string(), "unset");
    }

    fn rect_strategy() -> impl Strategy<Value = Rect> {
        (-500i32..500, -500i32..500, 0i32..300, 0i32..300)
            .prop_map(|(x, y, w, h)| Rect::new(x, y, w, h))
    }

    proptest! {
        #[test]
        fn merged_encloses_both(a in rect_strategy(), b in rect_strategy()) {
            let m = a.merged(&b);
            prop_assert!(m.encloses(&a));
            prop_assert!(m.encloses(&b));
        }

        #[test]
        fn merge_preserves_containment(
            a in rect_strategy(),
            b in rect_strategy(),
            x in -600i32..900,
            y in -600i32..900,
        ) {
            let m = a.merged(&b);
            if a.contains(x, y) || b.contains(x, y) {
                prop_assert!(m.contains(x, y));
            }
        }

        #[test]
        fn merge_sequence_encloses_all(rects in prop::collection::vec(rect_strategy(), 1..12)) {
            let mut acc = Rect::UNSET;
            for r in &rects {
                acc.merge(r);
            }
            for r in &rects {
                prop_assert!(acc.encloses(r));
            }
        }
    }
}
