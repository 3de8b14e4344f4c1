use super::{Logical, Point, Rectangle};

/// Kind of a rectangle part of a region
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RectangleKind {
    /// This rectangle should be added to the region
    Add,
    /// The intersection of this rectangle with the region should
    /// be removed from the region
    Subtract,
}

/// Description of the contents of a region, in surface-local coordinates
///
/// A region is defined as an union and difference of rectangles.
///
/// This struct contains an ordered `Vec` containing the rectangles defining
/// a region. They are added or subtracted in this order to compute the
/// actual contents of the region.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Region {
    /// List of rectangle part of this region
    pub rects: Vec<(RectangleKind, Rectangle<i32, Logical>)>,
}

impl Region {
    /// An empty region
    pub fn new() -> Region {
        Region::default()
    }

    /// A region made of a single rectangle
    pub fn from_rect(rect: Rectangle<i32, Logical>) -> Region {
        Region {
            rects: vec![(RectangleKind::Add, rect)],
        }
    }

    /// Add a rectangle to this region
    pub fn add(&mut self, rect: Rectangle<i32, Logical>) {
        self.rects.push((RectangleKind::Add, rect));
    }

    /// Subtract a rectangle from this region
    pub fn subtract(&mut self, rect: Rectangle<i32, Logical>) {
        self.rects.push((RectangleKind::Subtract, rect));
    }

    /// Whether this region holds no rectangle that could contain a point
    pub fn is_empty(&self) -> bool {
        !self
            .rects
            .iter()
            .any(|(kind, rect)| *kind == RectangleKind::Add && !rect.is_empty())
    }

    /// Checks whether given point is inside the region
    pub fn contains<P: Into<Point<i32, Logical>>>(&self, point: P) -> bool {
        let point = point.into();
        let mut contains = false;
        for (kind, rect) in &self.rects {
            if rect.contains(point) {
                match kind {
                    RectangleKind::Add => contains = true,
                    RectangleKind::Subtract => contains = false,
                }
            }
        }
        contains
    }

    /// Checks whether a fractional point lies inside the region, flooring its coordinates
    pub fn contains_f64(&self, point: Point<f64, Logical>) -> bool {
        self.contains(point.to_i32_floor::<i32>())
    }

    /// The first rectangle added to this region
    pub fn first_rect(&self) -> Option<Rectangle<i32, Logical>> {
        self.rects
            .iter()
            .find(|(kind, rect)| *kind == RectangleKind::Add && !rect.is_empty())
            .map(|(_, rect)| *rect)
    }

    /// Restrict a motion from `from` to `to` to this region.
    ///
    /// Returns `to` if it lies inside the region. Otherwise the destination is clamped
    /// into the rectangle containing `from`. Returns `None` if `from` is outside
    /// the region, in which case the motion has to be discarded.
    pub fn confine(&self, from: Point<f64, Logical>, to: Point<f64, Logical>) -> Option<Point<f64, Logical>> {
        if !self.contains_f64(from) {
            return None;
        }
        if self.contains_f64(to) {
            return Some(to);
        }

        let start = from.to_i32_floor::<i32>();
        let rect = self
            .rects
            .iter()
            .rev()
            .find(|(kind, rect)| *kind == RectangleKind::Add && rect.contains(start))
            .map(|(_, rect)| *rect)?;

        let max_x = (rect.loc.x + rect.size.w - 1) as f64;
        let max_y = (rect.loc.y + rect.size.h - 1) as f64;
        let clamped: Point<f64, Logical> = (
            to.x.clamp(rect.loc.x as f64, max_x),
            to.y.clamp(rect.loc.y as f64, max_y),
        )
            .into();

        if self.contains_f64(clamped) {
            Some(clamped)
        } else {
            Some(from)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(x: i32, y: i32, w: i32, h: i32) -> Rectangle<i32, Logical> {
        Rectangle::new((x, y).into(), (w, h).into())
    }

    #[test]
    fn subtract_punches_holes() {
        let mut region = Region::from_rect(rect(0, 0, 100, 100));
        region.subtract(rect(40, 40, 20, 20));

        assert!(region.contains((10, 10)));
        assert!(!region.contains((45, 45)));
        assert!(!region.contains((100, 50)));
    }

    #[test]
    fn empty_region_confines_nothing() {
        let region = Region::new();
        assert!(region.is_empty());
        assert_eq!(None, region.confine((1.0, 1.0).into(), (2.0, 2.0).into()));
    }

    #[test]
    fn confine_clamps_to_rect_edge() {
        let region = Region::from_rect(rect(0, 0, 100, 50));
        let confined = region.confine((10.0, 10.0).into(), (150.0, -20.0).into());
        assert_eq!(Some(Point::from((99.0, 0.0))), confined);
    }

    #[test]
    fn confine_keeps_inner_motion() {
        let region = Region::from_rect(rect(0, 0, 100, 50));
        let confined = region.confine((10.0, 10.0).into(), (20.5, 30.25).into());
        assert_eq!(Some(Point::from((20.5, 30.25))), confined);
    }

    #[test]
    fn first_rect_skips_subtractions() {
        let mut region = Region::new();
        region.subtract(rect(0, 0, 10, 10));
        region.add(rect(20, 20, 10, 10));
        assert_eq!(Some(rect(20, 20, 10, 10)), region.first_rect());
    }
}
