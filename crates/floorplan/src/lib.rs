//! Floorplan - A grid-snapping layout engine for hotel floor plans.
//!
//! Rooms and facilities are placed as rectangles on independent floors.
//! New entities are put in the first free grid slot, dragged entities snap
//! to the grid, and a resize can be applied to a single entity or to every
//! entity of the same type at once.

pub mod config;
pub mod persist;
pub mod placement;
pub mod resize;
pub mod store;

mod error;

pub use floorplan_core::{entity, error::EntityError, geometry};

pub use error::FloorplanError;

use log::{debug, info};

use floorplan_core::{
    entity::{EntityKey, EntityKind, EntityType, Floor, PlacedEntity},
    geometry::{Point, Rect, Size},
};

use config::AppConfig;
use persist::{BatchUpdateRequest, EntityRecord, LayoutSnapshot};
use placement::PlacementFinder;
use resize::{PendingResize, ResizeCoordinator, ResizePhase, ResizeScope};
use store::PositionStore;

/// Editing session over the floor plans of one hotel.
///
/// This owns the entity positions together with the in-progress resize
/// gesture, and exposes the edits a floor-plan view performs.
///
/// # Examples
///
/// ```rust
/// use floorplan::{
///     LayoutEditor,
///     config::AppConfig,
///     entity::{EntityKey, Floor, RoomType},
///     geometry::{Point, Rect},
/// };
///
/// let mut editor = LayoutEditor::new(AppConfig::default());
/// let floor = Floor::new(1).unwrap();
///
/// // Place two rooms; the second one goes right of the first
/// let first = editor.place_new(1, RoomType::Single, floor).unwrap();
/// let second = editor.place_new(2, RoomType::Single, floor).unwrap();
/// assert_eq!(first, Rect::new(20, 20, 120, 100));
/// assert_eq!(second, Rect::new(140, 20, 120, 100));
///
/// // Drag the first room down by a bit more than two grid cells
/// let moved = editor
///     .drag_end(EntityKey::room(1), first.origin(), Point::new(3, 47))
///     .unwrap();
/// assert_eq!(moved.origin(), Point::new(20, 60));
///
/// // Or use default config
/// let editor = LayoutEditor::default();
/// assert!(editor.store().is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct LayoutEditor {
    config: AppConfig,
    finder: PlacementFinder,
    store: PositionStore,
    resize: ResizeCoordinator,
}

impl LayoutEditor {
    /// Create an empty editor with the given configuration.
    ///
    /// # Arguments
    ///
    /// * `config` - Grid, canvas, seeding and size limit settings
    pub fn new(config: AppConfig) -> Self {
        Self::with_store(config, PositionStore::new())
    }

    /// Create an editor for an entity listing.
    ///
    /// Positions come from `cache` first, then from the listing, and are
    /// seeded otherwise. Sizes are clamped into the configured limits. See
    /// [`PositionStore::load`].
    ///
    /// # Errors
    ///
    /// Returns `FloorplanError` for invalid or duplicate records.
    pub fn load(
        config: AppConfig,
        listing: &[EntityRecord],
        cache: Option<&LayoutSnapshot>,
    ) -> Result<Self, FloorplanError> {
        let finder = PlacementFinder::new(&config);
        let store = PositionStore::load(listing, cache, &finder, config.limits())?;
        Ok(Self::with_store(config, store))
    }

    /// Create an editor restoring a saved snapshot.
    ///
    /// Origins are kept as saved; sizes are clamped into the configured
    /// limits.
    ///
    /// # Errors
    ///
    /// Returns `FloorplanError::DuplicateEntity` if the snapshot is
    /// inconsistent.
    pub fn from_snapshot(config: AppConfig, snapshot: LayoutSnapshot) -> Result<Self, FloorplanError> {
        let store = PositionStore::from_snapshot(snapshot, config.limits())?;
        Ok(Self::with_store(config, store))
    }

    fn with_store(config: AppConfig, store: PositionStore) -> Self {
        Self {
            finder: PlacementFinder::new(&config),
            resize: ResizeCoordinator::new(config.grid().size()),
            config,
            store,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn store(&self) -> &PositionStore {
        &self.store
    }

    /// Adds a new entity in the first free slot of its floor.
    ///
    /// The entity gets its type's default size. Only entities on the same
    /// floor count as obstacles.
    ///
    /// # Errors
    ///
    /// Returns `FloorplanError::DuplicateEntity` if the entity is already
    /// placed.
    pub fn place_new(
        &mut self,
        id: u64,
        entity_type: impl Into<EntityType>,
        floor: Floor,
    ) -> Result<Rect, FloorplanError> {
        let entity = PlacedEntity::new(id, entity_type, floor);
        let key = entity.key();
        if self.store.contains(key) {
            return Err(FloorplanError::DuplicateEntity(key));
        }

        let size = entity.entity_type().default_size();
        let occupied = self.store.occupied_on_floor(floor);
        let rect = Rect::from_origin(self.finder.find_free(size, &occupied), size);

        self.store.insert(entity.with_rect(rect));
        info!(key:%, floor:%, rect:?; "Entity placed");
        Ok(rect)
    }

    /// Removes an entity, discarding any resize that involves it.
    ///
    /// Returns the removed entity, or `None` if it was not placed.
    pub fn remove(&mut self, key: EntityKey) -> Option<PlacedEntity> {
        let involved = self.resize.pending().map(PendingResize::key) == Some(key)
            || self.resize.transient_size(key).is_some();
        if involved {
            self.resize.cancel();
        }
        let removed = self.store.remove_position(key);
        if removed.is_some() {
            info!(key:%; "Entity removed");
        }
        removed
    }

    /// Finishes a drag that started with the entity's corner at `origin`
    /// and moved the pointer by `delta`.
    ///
    /// The new corner is snapped to the grid. Dragging may overlap other
    /// entities.
    ///
    /// # Errors
    ///
    /// Returns `FloorplanError::UnknownEntity` if the entity is not placed.
    pub fn drag_end(&mut self, key: EntityKey, origin: Point, delta: Point) -> Result<Rect, FloorplanError> {
        let target = origin.add_point(delta).snap(self.config.grid().size());
        let rect = self.store.move_to(key, target)?;
        debug!(key:%, rect:?; "Drag finished");
        Ok(rect)
    }

    /// Rotates an entity by a quarter turn clockwise.
    ///
    /// # Errors
    ///
    /// Returns `FloorplanError::UnknownEntity` if the entity is not placed.
    pub fn rotate(&mut self, key: EntityKey) -> Result<i32, FloorplanError> {
        let rotation = self
            .store
            .get(key)
            .ok_or(FloorplanError::UnknownEntity(key))?
            .rotation()
            .quarter_turn();
        self.store.set_rotation(key, rotation)?;
        Ok(rotation.degrees())
    }

    pub fn resize_phase(&self) -> ResizePhase {
        self.resize.phase()
    }

    pub fn pending_resize(&self) -> Option<&PendingResize> {
        self.resize.pending()
    }

    /// Enters resize mode for an entity, using its kind's size limits.
    ///
    /// # Errors
    ///
    /// Returns `FloorplanError::UnknownEntity` if the entity is not placed
    /// and `FloorplanError::Resize` if another resize is in progress.
    pub fn begin_resize(&mut self, key: EntityKey) -> Result<(), FloorplanError> {
        let entity = self.store.get(key).ok_or(FloorplanError::UnknownEntity(key))?;
        let limits = self.config.limits().for_kind(entity.kind());
        self.resize.begin(entity, limits)?;
        Ok(())
    }

    /// Records where the resize handle was pressed.
    ///
    /// # Errors
    ///
    /// Returns `FloorplanError::Resize` outside a resize gesture.
    pub fn resize_pointer_down(&mut self, at: Point) -> Result<(), FloorplanError> {
        Ok(self.resize.pointer_down(at)?)
    }

    /// Updates the transient size for a pointer at `at`.
    ///
    /// # Errors
    ///
    /// Returns `FloorplanError::Resize` outside a pressed resize gesture.
    pub fn resize_pointer_move(&mut self, at: Point) -> Result<Size, FloorplanError> {
        Ok(self.resize.pointer_move(at)?)
    }

    /// Ends the resize gesture.
    ///
    /// Returns the resize awaiting a scope, or `None` if the size did not
    /// change.
    ///
    /// # Errors
    ///
    /// Returns `FloorplanError::Resize` outside a resize gesture.
    pub fn resize_release(&mut self) -> Result<Option<PendingResize>, FloorplanError> {
        Ok(self.resize.release()?)
    }

    /// Applies the pending resize to every entity in `scope`.
    ///
    /// Returns the keys of the resized entities.
    ///
    /// # Errors
    ///
    /// Returns `FloorplanError::Resize` if no resize is pending.
    pub fn confirm_resize(&mut self, scope: ResizeScope) -> Result<Vec<EntityKey>, FloorplanError> {
        Ok(self.resize.commit(scope, &mut self.store)?)
    }

    /// Discards the resize gesture or the pending resize.
    pub fn cancel_resize(&mut self) -> bool {
        self.resize.cancel()
    }

    /// Returns the entities of `floor` as they should be drawn, in render
    /// order.
    ///
    /// An entity being resized is reported with its in-gesture size.
    pub fn render_floor(&self, floor: Floor) -> Vec<PlacedEntity> {
        self.store
            .entities_on_floor(floor)
            .map(|entity| match self.resize.transient_size(entity.key()) {
                Some(size) => entity.clone().with_rect(entity.rect().with_size(size)),
                None => entity.clone(),
            })
            .collect()
    }

    /// Returns the floors that hold at least one entity, ascending.
    pub fn floors(&self) -> Vec<Floor> {
        self.store.floors()
    }

    /// Puts every entity back on the seeding grid with its default size.
    ///
    /// Any resize in progress is discarded. Returns the number of entities
    /// reset.
    pub fn reset_layout(&mut self) -> usize {
        self.resize.cancel();
        let count = self.store.reseed(&self.finder);
        info!(entity_count = count; "Layout reset");
        count
    }

    /// Takes a snapshot of every entity for the caller to persist.
    ///
    /// Saving never changes the editor: if persisting the snapshot fails,
    /// the in-memory layout is kept as it is.
    pub fn save(&self) -> LayoutSnapshot {
        let snapshot = self.store.snapshot();
        info!(entity_count = snapshot.entities().len(); "Layout saved");
        snapshot
    }

    /// Builds the bulk position update for every entity of `kind`.
    pub fn batch_update(&self, kind: EntityKind) -> BatchUpdateRequest {
        self.store.batch_update(kind)
    }
}

impl Default for LayoutEditor {
    fn default() -> Self {
        Self::new(AppConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use floorplan_core::entity::{FacilityType, RoomType};

    use super::*;

    fn floor(number: i64) -> Floor {
        Floor::new(number).unwrap()
    }

    #[test]
    fn test_place_new_avoids_same_floor_only() {
        let mut editor = LayoutEditor::default();
        let first = editor.place_new(1, RoomType::Double, floor(1)).unwrap();
        let other_floor = editor.place_new(2, RoomType::Double, floor(2)).unwrap();
        let second = editor.place_new(3, RoomType::Double, floor(1)).unwrap();

        assert_eq!(first, Rect::new(20, 20, 120, 100));
        assert_eq!(other_floor, first);
        assert_eq!(second, Rect::new(140, 20, 120, 100));
        assert!(!first.overlaps(&second));
    }

    #[test]
    fn test_place_new_uses_type_default_size() {
        let mut editor = LayoutEditor::default();
        let rect = editor.place_new(1, FacilityType::Elevator, floor(1)).unwrap();
        assert_eq!(rect.size(), FacilityType::Elevator.default_size());
    }

    #[test]
    fn test_place_new_rejects_duplicate() {
        let mut editor = LayoutEditor::default();
        editor.place_new(1, RoomType::Single, floor(1)).unwrap();
        assert!(matches!(
            editor.place_new(1, RoomType::Deluxe, floor(2)),
            Err(FloorplanError::DuplicateEntity(key)) if key == EntityKey::room(1)
        ));
        // A facility may reuse a room's id.
        assert!(editor.place_new(1, FacilityType::Stairs, floor(1)).is_ok());
    }

    #[test]
    fn test_drag_end_snaps_and_allows_overlap() {
        let mut editor = LayoutEditor::default();
        let first = editor.place_new(1, RoomType::Single, floor(1)).unwrap();
        let second = editor.place_new(2, RoomType::Single, floor(1)).unwrap();

        let moved = editor
            .drag_end(EntityKey::room(2), second.origin(), Point::new(-111, 19))
            .unwrap();
        assert_eq!(moved, Rect::new(20, 40, 120, 100));
        assert!(moved.overlaps(&first));
    }

    #[test]
    fn test_drag_end_unknown_entity() {
        let mut editor = LayoutEditor::default();
        assert!(matches!(
            editor.drag_end(EntityKey::facility(4), Point::new(0, 0), Point::new(20, 0)),
            Err(FloorplanError::UnknownEntity(_))
        ));
    }

    #[test]
    fn test_rotate_wraps_around() {
        let mut editor = LayoutEditor::default();
        editor.place_new(1, FacilityType::Corridor, floor(1)).unwrap();
        let key = EntityKey::facility(1);

        let degrees: Vec<i32> = (0..4).map(|_| editor.rotate(key).unwrap()).collect();
        assert_eq!(degrees, vec![90, 180, 270, 0]);
    }

    #[test]
    fn test_render_floor_shows_transient_size() {
        let mut editor = LayoutEditor::default();
        editor.place_new(1, RoomType::Single, floor(1)).unwrap();
        editor.place_new(2, RoomType::Single, floor(2)).unwrap();
        let key = EntityKey::room(1);

        editor.begin_resize(key).unwrap();
        editor.resize_pointer_down(Point::new(140, 120)).unwrap();
        editor.resize_pointer_move(Point::new(180, 120)).unwrap();

        let rendered = editor.render_floor(floor(1));
        assert_eq!(rendered.len(), 1);
        assert_eq!(rendered[0].rect(), Rect::new(20, 20, 160, 100));
        assert_eq!(editor.store().get_position(key), Some(Rect::new(20, 20, 120, 100)));

        editor.cancel_resize();
        assert_eq!(editor.render_floor(floor(1))[0].rect(), Rect::new(20, 20, 120, 100));
    }

    #[test]
    fn test_begin_resize_uses_kind_limits() {
        let mut editor = LayoutEditor::default();
        editor.place_new(1, FacilityType::Elevator, floor(1)).unwrap();

        editor.begin_resize(EntityKey::facility(1)).unwrap();
        editor.resize_pointer_down(Point::new(0, 0)).unwrap();
        // Facilities may shrink below the room minimum.
        assert_eq!(
            editor.resize_pointer_move(Point::new(-500, -500)).unwrap(),
            Size::new(40, 40)
        );
    }

    #[test]
    fn test_remove_cancels_involved_resize() {
        let mut editor = LayoutEditor::default();
        editor.place_new(1, RoomType::Single, floor(1)).unwrap();
        editor.place_new(2, RoomType::Single, floor(1)).unwrap();

        editor.begin_resize(EntityKey::room(1)).unwrap();
        editor.remove(EntityKey::room(2));
        assert_eq!(editor.resize_phase(), ResizePhase::Resizing);

        editor.remove(EntityKey::room(1));
        assert_eq!(editor.resize_phase(), ResizePhase::Idle);
        assert_eq!(editor.store().len(), 0);
    }

    #[test]
    fn test_reset_layout_reseeds_by_index() {
        let mut editor = LayoutEditor::default();
        editor.place_new(1, RoomType::Single, floor(1)).unwrap();
        editor.place_new(2, FacilityType::Elevator, floor(2)).unwrap();
        editor
            .drag_end(EntityKey::room(1), Point::new(20, 20), Point::new(400, 400))
            .unwrap();

        assert_eq!(editor.reset_layout(), 2);
        assert_eq!(
            editor.store().get_position(EntityKey::room(1)),
            Some(Rect::new(20, 20, 120, 100))
        );
        assert_eq!(
            editor.store().get_position(EntityKey::facility(2)).unwrap().origin(),
            Point::new(320, 20)
        );
    }

    #[test]
    fn test_save_and_restore() {
        let mut editor = LayoutEditor::default();
        editor.place_new(1, RoomType::Business, floor(3)).unwrap();
        editor.rotate(EntityKey::room(1)).unwrap();

        let restored = LayoutEditor::from_snapshot(AppConfig::default(), editor.save()).unwrap();
        assert_eq!(restored.save(), editor.save());
    }

    #[test]
    fn test_load_clamps_out_of_range_listing_size() {
        let record = |id, width, height| EntityRecord {
            id,
            kind: EntityKind::Room,
            entity_type: "单人间".to_string(),
            floor: 1,
            left: Some(20),
            top: Some(20),
            width: Some(width),
            height: Some(height),
            rotation: None,
        };
        let mut editor =
            LayoutEditor::load(AppConfig::default(), &[record(1, 10, -50), record(2, 5000, 5000)], None)
                .unwrap();

        assert_eq!(editor.store().get_position(EntityKey::room(1)), Some(Rect::new(20, 20, 60, 60)));
        assert_eq!(editor.store().get_position(EntityKey::room(2)), Some(Rect::new(20, 20, 400, 400)));

        // A gesture that does not move the pointer leaves nothing to confirm
        editor.begin_resize(EntityKey::room(1)).unwrap();
        editor.resize_pointer_down(Point::new(80, 80)).unwrap();
        assert_eq!(editor.resize_pointer_move(Point::new(80, 80)).unwrap(), Size::new(60, 60));
        assert_eq!(editor.resize_release().unwrap(), None);
        assert_eq!(editor.resize_phase(), ResizePhase::Idle);
    }
}
