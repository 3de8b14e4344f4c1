//! Pointer confinement and locking
//!
//! Clients may ask for the pointer to be confined to a region of one of their surfaces, or
//! locked in place. A seat keeps every constraint requested for it, at most one per surface,
//! and activates the one of the surface holding its pointer focus.
//!
//! Switching the active constraint always deactivates the previous one before the next one
//! is activated, [`Seat::constrain`](super::Seat::constrain) notifies the compositor in
//! that order.

use indexmap::IndexMap;

use crate::{
    desktop::SurfaceId,
    utils::{ids::foreign_id, Logical, Point, Region},
};

foreign_id!(
    /// A pointer constraint object
    ConstraintId
);

/// Kind of pointer constraint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstraintKind {
    /// The pointer may move within the region of the constraint
    Confine,
    /// The pointer may not move at all
    Lock,
}

/// A pointer constraint requested by a client
#[derive(Debug, Clone, PartialEq)]
pub struct PointerConstraint {
    /// Identity of the constraint
    pub id: ConstraintId,
    /// Surface the constraint applies to
    pub surface: SurfaceId,
    /// Kind of constraint
    pub kind: ConstraintKind,
    /// Region of the surface the constraint applies to, in surface-local coordinates
    pub region: Region,
    /// Where the client would like the cursor to be when a lock ends
    pub cursor_hint: Option<Point<f64, Logical>>,
}

/// Errors of the pointer constraint handling
#[derive(Debug, thiserror::Error)]
pub enum ConstraintError {
    /// The surface already has a constraint on this seat
    #[error("Surface {0:?} already has a pointer constraint")]
    AlreadyConstrained(SurfaceId),
    /// The constraint is not known to this seat
    #[error("Unknown pointer constraint {0:?}")]
    UnknownConstraint(ConstraintId),
    /// The constrained surface left the cursor before the commit could be applied
    #[error("Surface of pointer constraint {0:?} is no longer under the cursor")]
    StaleConstraintTarget(ConstraintId),
}

/// Pointer constraints of a seat
#[derive(Debug, Default)]
pub struct PointerConstraints {
    constraints: IndexMap<ConstraintId, PointerConstraint>,
    active: Option<ConstraintId>,
    confine: Region,
}

impl PointerConstraints {
    /// Register a new constraint
    pub fn insert(&mut self, constraint: PointerConstraint) -> Result<(), ConstraintError> {
        if self.for_surface(constraint.surface).is_some() {
            return Err(ConstraintError::AlreadyConstrained(constraint.surface));
        }
        self.constraints.insert(constraint.id, constraint);
        Ok(())
    }

    /// Forget a constraint
    ///
    /// If the constraint was active, no constraint is active anymore.
    pub fn remove(&mut self, id: ConstraintId) -> Option<PointerConstraint> {
        let constraint = self.constraints.shift_remove(&id)?;
        if self.active == Some(id) {
            self.active = None;
            self.confine = Region::new();
        }
        Some(constraint)
    }

    /// Get a constraint by id
    pub fn get(&self, id: ConstraintId) -> Option<&PointerConstraint> {
        self.constraints.get(&id)
    }

    /// Get a mutable constraint by id
    ///
    /// Call [`PointerConstraints::refresh_region`] after changing the region of the
    /// active constraint.
    pub fn get_mut(&mut self, id: ConstraintId) -> Option<&mut PointerConstraint> {
        self.constraints.get_mut(&id)
    }

    /// The constraint of a surface, if any
    pub fn for_surface(&self, surface: SurfaceId) -> Option<&PointerConstraint> {
        self.constraints.values().find(|c| c.surface == surface)
    }

    /// The active constraint
    pub fn active(&self) -> Option<&PointerConstraint> {
        self.active.and_then(|id| self.constraints.get(&id))
    }

    /// Region relative motion is confined to, while a constraint is active
    ///
    /// The region of a lock is empty, disallowing every motion.
    pub fn confine_region(&self) -> &Region {
        &self.confine
    }

    /// Deactivate the active constraint, returning it
    pub fn deactivate(&mut self) -> Option<ConstraintId> {
        self.confine = Region::new();
        self.active.take()
    }

    /// Activate a constraint
    ///
    /// The previously active constraint has to be deactivated first.
    pub fn activate(&mut self, id: ConstraintId) -> Result<&PointerConstraint, ConstraintError> {
        debug_assert!(self.active.is_none());
        if !self.constraints.contains_key(&id) {
            return Err(ConstraintError::UnknownConstraint(id));
        }
        self.active = Some(id);
        self.refresh_region();
        self.get(id).ok_or(ConstraintError::UnknownConstraint(id))
    }

    /// Copy the region of the active constraint into the confinement region
    pub fn refresh_region(&mut self) {
        self.confine = match self.active() {
            Some(constraint) if constraint.kind == ConstraintKind::Confine => constraint.region.clone(),
            _ => Region::new(),
        };
    }

    /// Number of registered constraints
    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    /// Whether no constraint is registered
    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::Rectangle;

    fn constraint(id: u64, surface: u64, kind: ConstraintKind) -> PointerConstraint {
        PointerConstraint {
            id: ConstraintId(id),
            surface: SurfaceId(surface),
            kind,
            region: Region::from_rect(Rectangle::new((0, 0).into(), (100, 100).into())),
            cursor_hint: None,
        }
    }

    #[test]
    fn one_constraint_per_surface() {
        let mut constraints = PointerConstraints::default();
        constraints.insert(constraint(1, 10, ConstraintKind::Confine)).unwrap();
        assert!(matches!(
            constraints.insert(constraint(2, 10, ConstraintKind::Lock)),
            Err(ConstraintError::AlreadyConstrained(SurfaceId(10)))
        ));
        constraints.insert(constraint(3, 11, ConstraintKind::Lock)).unwrap();
        assert_eq!(2, constraints.len());
    }

    #[test]
    fn lock_confines_to_nothing() {
        let mut constraints = PointerConstraints::default();
        constraints.insert(constraint(1, 10, ConstraintKind::Confine)).unwrap();
        constraints.insert(constraint(2, 11, ConstraintKind::Lock)).unwrap();

        constraints.activate(ConstraintId(1)).unwrap();
        assert!(constraints.confine_region().contains((50, 50)));

        assert_eq!(Some(ConstraintId(1)), constraints.deactivate());
        constraints.activate(ConstraintId(2)).unwrap();
        assert!(constraints.confine_region().is_empty());
    }

    #[test]
    fn removing_the_active_constraint_deactivates_it() {
        let mut constraints = PointerConstraints::default();
        constraints.insert(constraint(1, 10, ConstraintKind::Confine)).unwrap();
        constraints.activate(ConstraintId(1)).unwrap();
        assert!(constraints.remove(ConstraintId(1)).is_some());
        assert!(constraints.active().is_none());
        assert!(constraints.confine_region().is_empty());
        assert!(matches!(
            constraints.activate(ConstraintId(1)),
            Err(ConstraintError::UnknownConstraint(ConstraintId(1)))
        ));
    }
}
