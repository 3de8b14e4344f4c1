//! Various utilities functions and types

pub mod clock;
mod geometry;
pub mod hook;
pub(crate) mod ids;
mod region;

pub use self::clock::{Clock, Monotonic};
pub use self::geometry::{Coordinate, Logical, Point, Raw, Rectangle, Size, Transform};
pub use self::hook::{SubscriptionToken, Subscriptions};
pub use self::region::{RectangleKind, Region};
