use std::fmt;
use std::marker::PhantomData;
use std::ops::{Add, Sub};

/// Coordinate space of the output layout
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Logical;

/// Coordinate space of absolute input devices
///
/// Raw positions are normalized to `0.0..=1.0` over the area the device is mapped to.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Raw;

/// Numeric types usable as layout coordinates
pub trait Coordinate:
    Copy + Default + PartialOrd + fmt::Debug + Add<Output = Self> + Sub<Output = Self>
{
    /// The origin value
    const ZERO: Self;

    /// Widen to f64
    fn to_f64(self) -> f64;
    /// Narrow from f64, truncating toward zero for integers
    fn from_f64(v: f64) -> Self;
}

impl Coordinate for i32 {
    const ZERO: i32 = 0;

    #[inline]
    fn to_f64(self) -> f64 {
        self as f64
    }

    #[inline]
    fn from_f64(v: f64) -> i32 {
        v as i32
    }
}

impl Coordinate for f64 {
    const ZERO: f64 = 0.0;

    #[inline]
    fn to_f64(self) -> f64 {
        self
    }

    #[inline]
    fn from_f64(v: f64) -> f64 {
        v
    }
}

fn smaller<N: PartialOrd>(a: N, b: N) -> N {
    if b < a {
        b
    } else {
        a
    }
}

fn larger<N: PartialOrd>(a: N, b: N) -> N {
    if b > a {
        b
    } else {
        a
    }
}

/// A position in the `Kind` coordinate space
#[derive(Clone, Copy, PartialEq, Eq, Default)]
pub struct Point<N, Kind> {
    /// Horizontal position, growing to the right
    pub x: N,
    /// Vertical position, growing downwards
    pub y: N,
    _kind: PhantomData<Kind>,
}

impl<N: Coordinate, Kind> Point<N, Kind> {
    /// Convert to floating point coordinates
    #[inline]
    pub fn to_f64(self) -> Point<f64, Kind> {
        (self.x.to_f64(), self.y.to_f64()).into()
    }
}

impl<Kind> Point<f64, Kind> {
    /// Round to the nearest integer position
    #[inline]
    pub fn to_i32_round<N: Coordinate>(self) -> Point<N, Kind> {
        (N::from_f64(self.x.round()), N::from_f64(self.y.round())).into()
    }

    /// Integer position of the pixel containing this point
    #[inline]
    pub fn to_i32_floor<N: Coordinate>(self) -> Point<N, Kind> {
        (N::from_f64(self.x.floor()), N::from_f64(self.y.floor())).into()
    }
}

impl<N: fmt::Debug, Kind> fmt::Debug for Point<N, Kind> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:?}, {:?})", self.x, self.y)
    }
}

impl<N, Kind> From<(N, N)> for Point<N, Kind> {
    #[inline]
    fn from((x, y): (N, N)) -> Self {
        Point { x, y, _kind: PhantomData }
    }
}

impl<N, Kind> From<Point<N, Kind>> for (N, N) {
    #[inline]
    fn from(point: Point<N, Kind>) -> (N, N) {
        (point.x, point.y)
    }
}

impl<N: Coordinate, Kind> Add for Point<N, Kind> {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        (self.x + other.x, self.y + other.y).into()
    }
}

impl<N: Coordinate, Kind> Sub for Point<N, Kind> {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        (self.x - other.x, self.y - other.y).into()
    }
}

/// Width and height in the `Kind` coordinate space
#[derive(Clone, Copy, PartialEq, Eq, Default)]
pub struct Size<N, Kind> {
    /// Width
    pub w: N,
    /// Height
    pub h: N,
    _kind: PhantomData<Kind>,
}

impl<N: Coordinate, Kind> Size<N, Kind> {
    /// Convert to floating point dimensions
    #[inline]
    pub fn to_f64(self) -> Size<f64, Kind> {
        (self.w.to_f64(), self.h.to_f64()).into()
    }

    /// Whether either dimension is zero
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.w == N::ZERO || self.h == N::ZERO
    }
}

impl<Kind> Size<f64, Kind> {
    /// Round both dimensions to the nearest integer
    #[inline]
    pub fn to_i32_round<N: Coordinate>(self) -> Size<N, Kind> {
        (N::from_f64(self.w.round()), N::from_f64(self.h.round())).into()
    }
}

impl<N: fmt::Debug, Kind> fmt::Debug for Size<N, Kind> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}x{:?}", self.w, self.h)
    }
}

impl<N, Kind> From<(N, N)> for Size<N, Kind> {
    #[inline]
    fn from((w, h): (N, N)) -> Self {
        Size { w, h, _kind: PhantomData }
    }
}

impl<N, Kind> From<Size<N, Kind>> for (N, N) {
    #[inline]
    fn from(size: Size<N, Kind>) -> (N, N) {
        (size.w, size.h)
    }
}

/// An axis-aligned area given by its top-left corner and its size
#[derive(Clone, Copy, PartialEq, Eq, Default)]
pub struct Rectangle<N, Kind> {
    /// Top-left corner
    pub loc: Point<N, Kind>,
    /// Extent from the corner
    pub size: Size<N, Kind>,
}

impl<N: Coordinate, Kind> Rectangle<N, Kind> {
    /// Create a rectangle from its corner and size
    #[inline]
    pub fn new(loc: Point<N, Kind>, size: Size<N, Kind>) -> Self {
        Rectangle { loc, size }
    }

    /// An area of `size` anchored at the origin
    #[inline]
    pub fn from_size(size: Size<N, Kind>) -> Self {
        Rectangle::new((N::ZERO, N::ZERO).into(), size)
    }

    /// The empty rectangle at the origin
    #[inline]
    pub fn zero() -> Self {
        Rectangle::from_size((N::ZERO, N::ZERO).into())
    }

    /// Convert to floating point coordinates
    #[inline]
    pub fn to_f64(self) -> Rectangle<f64, Kind> {
        Rectangle::new(self.loc.to_f64(), self.size.to_f64())
    }

    /// Whether the rectangle covers no pixel
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.size.is_empty()
    }

    fn right(&self) -> N {
        self.loc.x + self.size.w
    }

    fn bottom(&self) -> N {
        self.loc.y + self.size.h
    }

    /// Whether `point` lies inside, counting the top and left edges but not the bottom and right ones
    #[inline]
    pub fn contains<P: Into<Point<N, Kind>>>(self, point: P) -> bool {
        let point = point.into();
        point.x >= self.loc.x && point.x < self.right() && point.y >= self.loc.y && point.y < self.bottom()
    }

    /// The smallest rectangle covering both `self` and `other`
    pub fn merge(self, other: Self) -> Self {
        let x = smaller(self.loc.x, other.loc.x);
        let y = smaller(self.loc.y, other.loc.y);
        let right = larger(self.right(), other.right());
        let bottom = larger(self.bottom(), other.bottom());
        Rectangle::new((x, y).into(), (right - x, bottom - y).into())
    }
}

impl<Kind> Rectangle<f64, Kind> {
    /// Midpoint of the rectangle
    #[inline]
    pub fn center(&self) -> Point<f64, Kind> {
        (self.loc.x + self.size.w / 2.0, self.loc.y + self.size.h / 2.0).into()
    }

    /// Round corner and size to integers
    #[inline]
    pub fn to_i32_round<N: Coordinate>(self) -> Rectangle<N, Kind> {
        Rectangle::new(self.loc.to_i32_round(), self.size.to_i32_round())
    }
}

impl<N: fmt::Debug, Kind> fmt::Debug for Rectangle<N, Kind> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}@{:?}", self.size, self.loc)
    }
}

/// Rotation and reflection an output applies to its contents
#[derive(Debug, Default, PartialEq, Eq, Hash, Clone, Copy)]
pub enum Transform {
    /// Unchanged
    #[default]
    Normal,
    /// Rotated by 90 degrees
    _90,
    /// Rotated by 180 degrees
    _180,
    /// Rotated by 270 degrees
    _270,
    /// Mirrored around the vertical axis
    Flipped,
    /// Mirrored, then rotated by 90 degrees
    Flipped90,
    /// Mirrored, then rotated by 180 degrees
    Flipped180,
    /// Mirrored, then rotated by 270 degrees
    Flipped270,
}

impl Transform {
    /// Whether the transform mirrors the output
    pub fn flipped(&self) -> bool {
        matches!(
            self,
            Transform::Flipped | Transform::Flipped90 | Transform::Flipped180 | Transform::Flipped270
        )
    }

    /// Clockwise rotation in degrees, ignoring any reflection
    pub fn degrees(&self) -> u32 {
        match self {
            Transform::Normal | Transform::Flipped => 0,
            Transform::_90 | Transform::Flipped90 => 90,
            Transform::_180 | Transform::Flipped180 => 180,
            Transform::_270 | Transform::Flipped270 => 270,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Logical, Point, Rectangle, Transform};

    fn rect(x: i32, y: i32, w: i32, h: i32) -> Rectangle<i32, Logical> {
        Rectangle::new((x, y).into(), (w, h).into())
    }

    #[test]
    fn pixels_on_the_far_edges_are_outside() {
        let output = rect(1920, 0, 1280, 1024);
        assert!(output.contains((1920, 0)));
        assert!(output.contains((3199, 1023)));
        assert!(!output.contains((3200, 0)));
        assert!(!output.contains((1920, 1024)));
        assert!(!output.contains((1919, 500)));
    }

    #[test]
    fn layout_bounds_of_outputs_with_different_heights() {
        let bounds = rect(0, 0, 1920, 1080).merge(rect(1920, 0, 1280, 1024));
        assert_eq!(rect(0, 0, 3200, 1080), bounds);

        let above = rect(0, -600, 800, 600).merge(bounds);
        assert_eq!(rect(0, -600, 3200, 1680), above);
    }

    #[test]
    fn rounding_a_damaged_area() {
        let area = Rectangle::<f64, Logical>::new((10.25, 19.75).into(), (99.5, 0.25).into());
        assert_eq!(rect(10, 20, 100, 0), area.to_i32_round());
        assert!(area.to_i32_round::<i32>().is_empty());
        assert_eq!(Point::<f64, Logical>::from((60.0, 19.875)), area.center());
    }

    #[test]
    fn cursor_position_floors_into_its_pixel() {
        let point = Point::<f64, Logical>::from((-0.5, 2.9));
        assert_eq!(Point::from((-1, 2)), point.to_i32_floor::<i32>());
    }

    #[test]
    fn only_plain_rotations_are_unflipped() {
        assert_eq!(0, Transform::Normal.degrees());
        assert_eq!(90, Transform::_90.degrees());
        assert_eq!(270, Transform::Flipped270.degrees());
        assert!(Transform::Flipped90.flipped());
        assert!(!Transform::_180.flipped());
    }
}
