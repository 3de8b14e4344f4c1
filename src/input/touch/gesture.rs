use crate::{
    backend::input::TouchSlot,
    config::GestureConfig,
    utils::{Logical, Point, Rectangle},
};

/// Edge of an output a swipe starts from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// Top edge
    Top,
    /// Bottom edge
    Bottom,
    /// Left edge
    Left,
    /// Right edge
    Right,
}

impl Side {
    /// Command bound to a swipe from this edge
    pub fn command<'a>(&self, config: &'a GestureConfig) -> &'a str {
        match self {
            Side::Top => &config.top,
            Side::Bottom => &config.bottom,
            Side::Left => &config.left,
            Side::Right => &config.right,
        }
    }
}

/// An edge swipe in progress
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchGesture {
    slot: TouchSlot,
    side: Side,
    start: Point<f64, Logical>,
    last: Point<f64, Logical>,
    bounds: Rectangle<f64, Logical>,
}

impl TouchGesture {
    /// Start tracking a touch point as a possible edge swipe
    ///
    /// Returns `None` unless the point lies within `edge_margin` of an edge of `bounds`.
    /// The closest edge wins, ties are resolved top, bottom, left, right.
    pub fn begin(
        slot: TouchSlot,
        start: Point<f64, Logical>,
        bounds: Rectangle<f64, Logical>,
        edge_margin: f64,
    ) -> Option<TouchGesture> {
        let distances = [
            (Side::Top, start.y - bounds.loc.y),
            (Side::Bottom, bounds.loc.y + bounds.size.h - start.y),
            (Side::Left, start.x - bounds.loc.x),
            (Side::Right, bounds.loc.x + bounds.size.w - start.x),
        ];

        let (side, distance) = distances
            .into_iter()
            .reduce(|best, candidate| if candidate.1 < best.1 { candidate } else { best })?;
        if distance > edge_margin {
            return None;
        }

        Some(TouchGesture {
            slot,
            side,
            start,
            last: start,
            bounds,
        })
    }

    /// Touch slot driving this gesture
    pub fn slot(&self) -> TouchSlot {
        self.slot
    }

    /// Edge the gesture started from
    pub fn side(&self) -> Side {
        self.side
    }

    /// Where the gesture started, in layout coordinates
    pub fn start(&self) -> Point<f64, Logical> {
        self.start
    }

    /// Record the latest location of the touch point
    pub fn update(&mut self, location: Point<f64, Logical>) {
        self.last = location;
    }

    /// Whether the travelled distance makes a valid swipe
    ///
    /// The touch must have moved away from its edge by at least `min_travel`, or half of
    /// the output extent on small outputs, and more than it moved along the edge.
    pub fn finish(&self, min_travel: f64) -> bool {
        let delta = self.last - self.start;
        let (inward, along, extent) = match self.side {
            Side::Top => (delta.y, delta.x, self.bounds.size.h),
            Side::Bottom => (-delta.y, delta.x, self.bounds.size.h),
            Side::Left => (delta.x, delta.y, self.bounds.size.w),
            Side::Right => (-delta.x, delta.y, self.bounds.size.w),
        };
        let threshold = min_travel.min(extent / 2.0);
        inward >= threshold && inward > along.abs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn output() -> Rectangle<f64, Logical> {
        Rectangle::new((1920.0, 0.0).into(), (1280.0, 720.0).into())
    }

    #[test]
    fn nearest_edge_is_picked() {
        let gesture = TouchGesture::begin(TouchSlot(0), (1925.0, 300.0).into(), output(), 24.0).unwrap();
        assert_eq!(Side::Left, gesture.side());
        let gesture = TouchGesture::begin(TouchSlot(0), (2500.0, 710.0).into(), output(), 24.0).unwrap();
        assert_eq!(Side::Bottom, gesture.side());
        let gesture = TouchGesture::begin(TouchSlot(0), (3195.0, 718.0).into(), output(), 24.0).unwrap();
        assert_eq!(Side::Bottom, gesture.side());
    }

    #[test]
    fn touch_away_from_edges_does_not_arm() {
        assert!(TouchGesture::begin(TouchSlot(0), (2500.0, 300.0).into(), output(), 24.0).is_none());
    }

    #[test]
    fn short_or_sideways_swipe_is_rejected() {
        let mut gesture = TouchGesture::begin(TouchSlot(0), (1925.0, 300.0).into(), output(), 24.0).unwrap();
        gesture.update((1990.0, 300.0).into());
        assert!(!gesture.finish(100.0));
        gesture.update((2100.0, 500.0).into());
        assert!(!gesture.finish(100.0));
        gesture.update((2100.0, 340.0).into());
        assert!(gesture.finish(100.0));
    }

    #[test]
    fn small_outputs_need_half_their_extent() {
        let bounds = Rectangle::new((0.0, 0.0).into(), (100.0, 120.0).into());
        let mut gesture = TouchGesture::begin(TouchSlot(3), (50.0, 2.0).into(), bounds, 24.0).unwrap();
        assert_eq!(Side::Top, gesture.side());
        gesture.update((50.0, 63.0).into());
        assert!(gesture.finish(100.0));
    }

    #[test]
    fn sides_map_to_configured_commands() {
        let config = GestureConfig::default();
        assert_eq!("switch_workspace prev", Side::Left.command(&config));
        assert_eq!("exec killall cloth-kbd || cloth-kbd", Side::Bottom.command(&config));
    }
}
