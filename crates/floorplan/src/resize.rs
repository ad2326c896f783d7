//! The resize gesture and its batch confirmation.
//!
//! [`ResizeCoordinator`] is a small state machine driven by pointer events:
//!
//! ```text
//!            begin                 release (size changed)
//!   Idle ───────────► Resizing ─────────────────────────► PendingConfirmation
//!    ▲                   │                                     │
//!    │  release (same    │                                     │ commit(scope)
//!    │  size) / cancel   │                                     │ or cancel
//!    └───────────────────┴─────────────────────────────────────┘
//! ```
//!
//! While resizing, the candidate size is recomputed from the pointer's
//! offset to where the gesture started, snapped to the grid and clamped to
//! the entity kind's limits. Nothing is written to the [`PositionStore`]
//! until a pending resize is committed with a [`ResizeScope`].

use std::fmt::{self, Display};

use log::{debug, info};
use thiserror::Error;

use floorplan_core::{
    entity::{EntityKey, EntityType, Floor, PlacedEntity},
    geometry::{Point, Size, SizeLimits},
};

use crate::store::PositionStore;

/// Errors raised by out-of-order resize events.
///
/// A rejected event never changes the coordinator's state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResizeError {
    #[error("cannot start resizing {requested}: {phase} is in progress")]
    Busy {
        requested: EntityKey,
        phase: ResizePhase,
    },

    #[error("no resize gesture in progress")]
    NotResizing,

    #[error("pointer moved before the resize handle was pressed")]
    HandleNotPressed,

    #[error("no resize is waiting for confirmation")]
    NoPendingResize,

    #[error("same-floor and all-floors scopes are mutually exclusive")]
    ConflictingScopes,
}

/// Which entities receive a confirmed resize.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ResizeScope {
    /// Only the entity that was resized.
    #[default]
    ThisEntity,
    /// Every entity on the same floor with the same type.
    SameFloorAndType,
    /// Every entity on any floor with the same type.
    AllFloorsAndType,
}

impl ResizeScope {
    /// Maps the two confirmation choices to a scope.
    ///
    /// Neither choice selects [`ResizeScope::ThisEntity`].
    ///
    /// # Errors
    ///
    /// Returns [`ResizeError::ConflictingScopes`] when both are set.
    ///
    /// # Examples
    ///
    /// ```
    /// # use floorplan::resize::ResizeScope;
    /// assert_eq!(ResizeScope::from_flags(false, false), Ok(ResizeScope::ThisEntity));
    /// assert_eq!(ResizeScope::from_flags(true, false), Ok(ResizeScope::SameFloorAndType));
    /// assert_eq!(ResizeScope::from_flags(false, true), Ok(ResizeScope::AllFloorsAndType));
    /// assert!(ResizeScope::from_flags(true, true).is_err());
    /// ```
    pub fn from_flags(same_floor: bool, all_floors: bool) -> Result<Self, ResizeError> {
        match (same_floor, all_floors) {
            (false, false) => Ok(Self::ThisEntity),
            (true, false) => Ok(Self::SameFloorAndType),
            (false, true) => Ok(Self::AllFloorsAndType),
            (true, true) => Err(ResizeError::ConflictingScopes),
        }
    }

    /// Returns true if `entity` falls within this scope for `pending`.
    pub fn includes(self, pending: &PendingResize, entity: &PlacedEntity) -> bool {
        match self {
            Self::ThisEntity => entity.key() == pending.key,
            Self::SameFloorAndType => {
                entity.floor() == pending.floor && entity.entity_type() == pending.entity_type
            }
            Self::AllFloorsAndType => entity.entity_type() == pending.entity_type,
        }
    }
}

/// The coarse state of a [`ResizeCoordinator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResizePhase {
    Idle,
    Resizing,
    PendingConfirmation,
}

impl Display for ResizePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Idle => "idle",
            Self::Resizing => "resizing",
            Self::PendingConfirmation => "pending confirmation",
        };
        write!(f, "{s}")
    }
}

/// A finished resize gesture waiting for the user to choose a scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingResize {
    key: EntityKey,
    size: Size,
    entity_type: EntityType,
    floor: Floor,
}

impl PendingResize {
    pub fn key(&self) -> EntityKey {
        self.key
    }

    /// Returns the new size, already snapped and clamped.
    pub fn size(&self) -> Size {
        self.size
    }

    pub fn entity_type(&self) -> EntityType {
        self.entity_type
    }

    pub fn floor(&self) -> Floor {
        self.floor
    }
}

#[derive(Debug, Clone, Copy)]
struct Gesture {
    key: EntityKey,
    entity_type: EntityType,
    floor: Floor,
    limits: SizeLimits,
    initial: Size,
    baseline: Size,
    handle_origin: Option<Point>,
    current: Size,
}

#[derive(Debug, Clone, Copy, Default)]
enum State {
    #[default]
    Idle,
    Resizing(Gesture),
    PendingConfirmation(PendingResize),
}

/// Drives a single resize gesture from start to confirmation.
#[derive(Debug, Clone)]
pub struct ResizeCoordinator {
    grid: i32,
    state: State,
}

impl ResizeCoordinator {
    /// Creates an idle coordinator snapping to `grid`.
    pub fn new(grid: i32) -> Self {
        Self {
            grid,
            state: State::Idle,
        }
    }

    pub fn phase(&self) -> ResizePhase {
        match self.state {
            State::Idle => ResizePhase::Idle,
            State::Resizing(_) => ResizePhase::Resizing,
            State::PendingConfirmation(_) => ResizePhase::PendingConfirmation,
        }
    }

    /// Returns the resize waiting for confirmation, if any.
    pub fn pending(&self) -> Option<&PendingResize> {
        match &self.state {
            State::PendingConfirmation(pending) => Some(pending),
            _ => None,
        }
    }

    /// Returns the in-gesture size of `key` while it is being resized.
    ///
    /// Used for rendering; the store still holds the committed size.
    pub fn transient_size(&self, key: EntityKey) -> Option<Size> {
        match &self.state {
            State::Resizing(gesture) if gesture.key == key => Some(gesture.current),
            _ => None,
        }
    }

    /// Enters resize mode for `entity`, capturing its current size as the
    /// baseline.
    ///
    /// # Errors
    ///
    /// Returns [`ResizeError::Busy`] unless the coordinator is idle.
    pub fn begin(&mut self, entity: &PlacedEntity, limits: SizeLimits) -> Result<(), ResizeError> {
        if !matches!(self.state, State::Idle) {
            return Err(ResizeError::Busy {
                requested: entity.key(),
                phase: self.phase(),
            });
        }

        let baseline = entity.rect().size();
        self.state = State::Resizing(Gesture {
            key: entity.key(),
            entity_type: entity.entity_type(),
            floor: entity.floor(),
            limits,
            initial: baseline,
            baseline,
            handle_origin: None,
            current: baseline,
        });
        debug!(key:% = entity.key(), baseline:?; "Resize started");
        Ok(())
    }

    /// Records where the pointer pressed the resize handle.
    ///
    /// Later moves are measured from this point against the size the entity
    /// had at that moment.
    ///
    /// # Errors
    ///
    /// Returns [`ResizeError::NotResizing`] outside a gesture.
    pub fn pointer_down(&mut self, at: Point) -> Result<(), ResizeError> {
        let State::Resizing(gesture) = &mut self.state else {
            return Err(ResizeError::NotResizing);
        };
        gesture.baseline = gesture.current;
        gesture.handle_origin = Some(at);
        Ok(())
    }

    /// Recomputes the candidate size for a pointer at `at`.
    ///
    /// Each dimension is the baseline plus the pointer's offset from the
    /// handle press, snapped to the grid and clamped to the limits.
    ///
    /// # Errors
    ///
    /// Returns [`ResizeError::NotResizing`] outside a gesture and
    /// [`ResizeError::HandleNotPressed`] before [`Self::pointer_down`].
    pub fn pointer_move(&mut self, at: Point) -> Result<Size, ResizeError> {
        let grid = self.grid;
        let State::Resizing(gesture) = &mut self.state else {
            return Err(ResizeError::NotResizing);
        };
        let handle_origin = gesture.handle_origin.ok_or(ResizeError::HandleNotPressed)?;

        gesture.current = gesture
            .baseline
            .add_delta(at.sub_point(handle_origin))
            .snap(grid)
            .clamp(gesture.limits);
        Ok(gesture.current)
    }

    /// Ends the gesture.
    ///
    /// Returns the pending resize when the size changed from the one the
    /// entity had when resizing began, moving to confirmation. Otherwise
    /// returns `None` and goes back to idle.
    ///
    /// # Errors
    ///
    /// Returns [`ResizeError::NotResizing`] outside a gesture.
    pub fn release(&mut self) -> Result<Option<PendingResize>, ResizeError> {
        let State::Resizing(gesture) = self.state else {
            return Err(ResizeError::NotResizing);
        };

        // Re-pressing the handle moves the baseline, so compare against the
        // size captured when the gesture began.
        if gesture.current == gesture.initial {
            self.state = State::Idle;
            debug!(key:% = gesture.key; "Resize released without change");
            return Ok(None);
        }

        let pending = PendingResize {
            key: gesture.key,
            size: gesture.current,
            entity_type: gesture.entity_type,
            floor: gesture.floor,
        };
        self.state = State::PendingConfirmation(pending);
        debug!(key:% = gesture.key, size:? = gesture.current; "Resize awaiting confirmation");
        Ok(Some(pending))
    }

    /// Applies the pending resize to every entity in `scope` and returns to
    /// idle.
    ///
    /// Top-left corners are kept. Returns the keys of the resized entities
    /// in render order; it is empty when the resized entity was removed
    /// meanwhile and the scope names only that entity.
    ///
    /// # Errors
    ///
    /// Returns [`ResizeError::NoPendingResize`] unless a resize is waiting
    /// for confirmation.
    pub fn commit(
        &mut self,
        scope: ResizeScope,
        store: &mut PositionStore,
    ) -> Result<Vec<EntityKey>, ResizeError> {
        let State::PendingConfirmation(pending) = self.state else {
            return Err(ResizeError::NoPendingResize);
        };

        let resized = store.resize_matching(pending.size, |entity| scope.includes(&pending, entity));
        self.state = State::Idle;

        info!(
            key:% = pending.key,
            scope:?,
            size:? = pending.size,
            resized_count = resized.len();
            "Resize committed"
        );
        Ok(resized)
    }

    /// Abandons the gesture or the pending resize without touching the store.
    ///
    /// Returns true if anything was discarded.
    pub fn cancel(&mut self) -> bool {
        let discarded = !matches!(self.state, State::Idle);
        if discarded {
            debug!(phase:% = self.phase(); "Resize cancelled");
        }
        self.state = State::Idle;
        discarded
    }
}

impl Default for ResizeCoordinator {
    fn default() -> Self {
        Self::new(floorplan_core::geometry::GRID_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use floorplan_core::{
        entity::{FacilityType, RoomType},
        geometry::Rect,
    };

    use super::*;

    fn floor(number: i64) -> Floor {
        Floor::new(number).unwrap()
    }

    fn room_limits() -> SizeLimits {
        SizeLimits::new(60, 400)
    }

    fn double_room(id: u64, floor_number: i64, left: i32) -> PlacedEntity {
        PlacedEntity::new(id, RoomType::Double, floor(floor_number))
            .with_rect(Rect::new(left, 20, 120, 100))
    }

    fn hotel() -> PositionStore {
        let mut store = PositionStore::new();
        for entity in [
            double_room(1, 2, 20),
            double_room(2, 2, 160),
            double_room(3, 2, 300),
            double_room(4, 3, 20),
            PlacedEntity::new(5, RoomType::Single, floor(2)).with_rect(Rect::new(440, 20, 120, 100)),
            PlacedEntity::new(1, FacilityType::Elevator, floor(2))
                .with_rect(Rect::new(20, 200, 80, 80)),
        ] {
            store.insert(entity);
        }
        store
    }

    fn drag(coordinator: &mut ResizeCoordinator, entity: &PlacedEntity, delta: Point) -> Option<PendingResize> {
        let handle = entity.rect().origin().add_point(Point::new(
            entity.rect().width(),
            entity.rect().height(),
        ));
        coordinator.begin(entity, room_limits()).unwrap();
        coordinator.pointer_down(handle).unwrap();
        coordinator.pointer_move(handle.add_point(delta)).unwrap();
        coordinator.release().unwrap()
    }

    #[test]
    fn test_same_floor_and_type_scope() {
        let mut store = hotel();
        let mut coordinator = ResizeCoordinator::new(20);
        let target = store.get(EntityKey::room(1)).unwrap().clone();

        let pending = drag(&mut coordinator, &target, Point::new(20, 20)).unwrap();
        assert_eq!(pending.size(), Size::new(140, 120));
        assert_eq!(pending.entity_type(), EntityType::Room(RoomType::Double));
        assert_eq!(pending.floor(), floor(2));
        assert_eq!(coordinator.phase(), ResizePhase::PendingConfirmation);

        let resized = coordinator
            .commit(ResizeScope::SameFloorAndType, &mut store)
            .unwrap();
        assert_eq!(
            resized,
            vec![EntityKey::room(1), EntityKey::room(2), EntityKey::room(3)]
        );
        for key in &resized {
            assert_eq!(store.get_position(*key).unwrap().size(), Size::new(140, 120));
        }
        assert_eq!(
            store.get_position(EntityKey::room(2)).unwrap().origin(),
            Point::new(160, 20)
        );

        // Other floors and other types keep their size.
        assert_eq!(store.get_position(EntityKey::room(4)).unwrap().size(), Size::new(120, 100));
        assert_eq!(store.get_position(EntityKey::room(5)).unwrap().size(), Size::new(120, 100));
        assert_eq!(store.get_position(EntityKey::facility(1)).unwrap().size(), Size::new(80, 80));
        assert_eq!(coordinator.phase(), ResizePhase::Idle);
    }

    #[test]
    fn test_this_entity_scope() {
        let mut store = hotel();
        let mut coordinator = ResizeCoordinator::new(20);
        let target = store.get(EntityKey::room(2)).unwrap().clone();

        drag(&mut coordinator, &target, Point::new(-40, 0)).unwrap();
        let resized = coordinator.commit(ResizeScope::ThisEntity, &mut store).unwrap();

        assert_eq!(resized, vec![EntityKey::room(2)]);
        assert_eq!(store.get_position(EntityKey::room(2)).unwrap().size(), Size::new(80, 100));
        assert_eq!(store.get_position(EntityKey::room(1)).unwrap().size(), Size::new(120, 100));
    }

    #[test]
    fn test_all_floors_and_type_scope() {
        let mut store = hotel();
        let mut coordinator = ResizeCoordinator::new(20);
        let target = store.get(EntityKey::room(4)).unwrap().clone();

        drag(&mut coordinator, &target, Point::new(0, 60)).unwrap();
        let resized = coordinator
            .commit(ResizeScope::AllFloorsAndType, &mut store)
            .unwrap();

        assert_eq!(resized.len(), 4);
        assert!(!resized.contains(&EntityKey::room(5)));
        assert_eq!(store.get_position(EntityKey::room(1)).unwrap().size(), Size::new(120, 160));
    }

    #[test]
    fn test_small_drag_snaps_back_to_idle() {
        let store = hotel();
        let mut coordinator = ResizeCoordinator::new(20);
        let target = store.get(EntityKey::room(1)).unwrap().clone();

        assert_eq!(drag(&mut coordinator, &target, Point::new(3, 3)), None);
        assert_eq!(coordinator.phase(), ResizePhase::Idle);
        assert!(coordinator.pending().is_none());
    }

    #[test]
    fn test_transient_size_during_gesture() {
        let store = hotel();
        let mut coordinator = ResizeCoordinator::new(20);
        let target = store.get(EntityKey::room(1)).unwrap().clone();

        coordinator.begin(&target, room_limits()).unwrap();
        assert_eq!(coordinator.transient_size(target.key()), Some(Size::new(120, 100)));
        coordinator.pointer_down(Point::new(140, 120)).unwrap();
        assert_eq!(
            coordinator.pointer_move(Point::new(199, 131)).unwrap(),
            Size::new(180, 120)
        );
        assert_eq!(coordinator.transient_size(target.key()), Some(Size::new(180, 120)));
        assert_eq!(coordinator.transient_size(EntityKey::room(2)), None);

        // The store is untouched until commit.
        assert_eq!(store.get_position(target.key()).unwrap().size(), Size::new(120, 100));
    }

    #[test]
    fn test_pointer_move_clamps_to_limits() {
        let store = hotel();
        let mut coordinator = ResizeCoordinator::new(20);
        let target = store.get(EntityKey::room(1)).unwrap().clone();

        coordinator.begin(&target, room_limits()).unwrap();
        coordinator.pointer_down(Point::new(0, 0)).unwrap();
        assert_eq!(
            coordinator.pointer_move(Point::new(-500, 900)).unwrap(),
            Size::new(60, 400)
        );
    }

    #[test]
    fn test_repressing_handle_keeps_initial_size_for_release() {
        let store = hotel();
        let mut coordinator = ResizeCoordinator::new(20);
        let target = store.get(EntityKey::room(1)).unwrap().clone();

        coordinator.begin(&target, room_limits()).unwrap();
        coordinator.pointer_down(Point::new(0, 0)).unwrap();
        coordinator.pointer_move(Point::new(40, 0)).unwrap();
        coordinator.pointer_down(Point::new(500, 500)).unwrap();
        assert_eq!(
            coordinator.pointer_move(Point::new(500, 500)).unwrap(),
            Size::new(160, 100)
        );
        assert!(coordinator.release().unwrap().is_some());
    }

    #[test]
    fn test_cancel_discards_pending() {
        let mut store = hotel();
        let mut coordinator = ResizeCoordinator::new(20);
        let target = store.get(EntityKey::room(1)).unwrap().clone();

        drag(&mut coordinator, &target, Point::new(40, 40)).unwrap();
        assert!(coordinator.cancel());
        assert!(!coordinator.cancel());
        assert_eq!(
            coordinator.commit(ResizeScope::ThisEntity, &mut store),
            Err(ResizeError::NoPendingResize)
        );
        assert_eq!(store.get_position(target.key()).unwrap().size(), Size::new(120, 100));
    }

    #[test]
    fn test_out_of_order_events_are_rejected() {
        let store = hotel();
        let mut coordinator = ResizeCoordinator::new(20);
        let first = store.get(EntityKey::room(1)).unwrap().clone();
        let second = store.get(EntityKey::room(2)).unwrap().clone();

        assert_eq!(coordinator.pointer_down(Point::new(0, 0)), Err(ResizeError::NotResizing));
        assert_eq!(coordinator.pointer_move(Point::new(0, 0)), Err(ResizeError::NotResizing));
        assert_eq!(coordinator.release(), Err(ResizeError::NotResizing));

        coordinator.begin(&first, room_limits()).unwrap();
        assert_eq!(
            coordinator.pointer_move(Point::new(10, 10)),
            Err(ResizeError::HandleNotPressed)
        );
        assert_eq!(
            coordinator.begin(&second, room_limits()),
            Err(ResizeError::Busy {
                requested: second.key(),
                phase: ResizePhase::Resizing,
            })
        );
        assert_eq!(coordinator.transient_size(first.key()), Some(Size::new(120, 100)));
    }

    #[test]
    fn test_commit_after_entity_removed() {
        let mut store = hotel();
        let mut coordinator = ResizeCoordinator::new(20);
        let target = store.get(EntityKey::room(3)).unwrap().clone();

        drag(&mut coordinator, &target, Point::new(20, 0)).unwrap();
        store.remove_position(target.key());

        let resized = coordinator.commit(ResizeScope::ThisEntity, &mut store).unwrap();
        assert!(resized.is_empty());
        assert_eq!(coordinator.phase(), ResizePhase::Idle);
    }

    #[test]
    fn test_scope_from_flags_rejects_both() {
        assert_eq!(
            ResizeScope::from_flags(true, true),
            Err(ResizeError::ConflictingScopes)
        );
        assert_eq!(ResizeScope::default(), ResizeScope::ThisEntity);
    }
}
