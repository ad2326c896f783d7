//! The authoritative in-memory positions of every loaded entity.
//!
//! [`PositionStore`] owns one [`PlacedEntity`] per [`EntityKey`]. Insertion
//! order is preserved and is the render order. Nothing in the store is
//! persisted implicitly: callers take a [`LayoutSnapshot`] or a
//! [`BatchUpdateRequest`] when they want to save.

use indexmap::IndexMap;
use log::{debug, info, warn};

use floorplan_core::{
    entity::{EntityKey, EntityKind, Floor, PlacedEntity, Rotation},
    geometry::{Point, Rect, Size},
};

use crate::{
    FloorplanError,
    config::LimitsConfig,
    persist::{BatchUpdateItem, BatchUpdateRequest, EntityRecord, LayoutSnapshot},
    placement::PlacementFinder,
};

/// Per-entity rectangles for the loaded floors.
#[derive(Debug, Clone, Default)]
pub struct PositionStore {
    entities: IndexMap<EntityKey, PlacedEntity>,
}

impl PositionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store from an entity listing.
    ///
    /// Each entity's rectangle is resolved independently:
    ///
    /// 1. The rectangle saved in `cache`, if the entity appears there.
    /// 2. Otherwise the position and size carried by the listing itself.
    /// 3. Otherwise the seeding position for the entity's index in `listing`
    ///    and its type's default size.
    ///
    /// Cached entities that are absent from the listing are dropped; the
    /// listing decides which entities exist. Every resolved size is clamped
    /// into the `limits` for the entity's kind.
    ///
    /// # Errors
    ///
    /// Returns [`FloorplanError::Entity`] for an invalid record and
    /// [`FloorplanError::DuplicateEntity`] when the listing names the same
    /// entity twice.
    pub fn load(
        listing: &[EntityRecord],
        cache: Option<&LayoutSnapshot>,
        finder: &PlacementFinder,
        limits: &LimitsConfig,
    ) -> Result<Self, FloorplanError> {
        let cached: IndexMap<EntityKey, &PlacedEntity> = cache
            .map(|snapshot| {
                snapshot
                    .entities()
                    .iter()
                    .map(|entity| (entity.key(), entity))
                    .collect()
            })
            .unwrap_or_default();

        let mut store = Self::new();
        let mut seeded = 0usize;

        for (index, record) in listing.iter().enumerate() {
            let parsed = record.parse()?;
            let mut entity = PlacedEntity::new(parsed.id, parsed.entity_type, parsed.floor)
                .with_rotation(parsed.rotation);
            let key = entity.key();

            if let Some(saved) = cached.get(&key) {
                entity.set_rect(saved.rect());
                entity.set_rotation(saved.rotation());
            } else {
                let origin = parsed.origin.unwrap_or_else(|| {
                    seeded += 1;
                    finder.seed_position(index)
                });
                let size = parsed
                    .size
                    .unwrap_or_else(|| parsed.entity_type.default_size());
                entity.set_rect(Rect::from_origin(origin, size));
            }
            clamp_to_limits(&mut entity, limits);

            if store.entities.insert(key, entity).is_some() {
                return Err(FloorplanError::DuplicateEntity(key));
            }
        }

        info!(
            entity_count = store.len(),
            cached_count = cached.len(),
            seeded_count = seeded;
            "Positions loaded"
        );
        Ok(store)
    }

    /// Restores a store from a snapshot, keeping every saved origin.
    ///
    /// Sizes outside the `limits` for their kind are clamped.
    ///
    /// # Errors
    ///
    /// Returns [`FloorplanError::DuplicateEntity`] if the snapshot lists the
    /// same entity twice.
    pub fn from_snapshot(
        snapshot: LayoutSnapshot,
        limits: &LimitsConfig,
    ) -> Result<Self, FloorplanError> {
        let mut store = Self::new();
        for mut entity in snapshot.into_entities() {
            clamp_to_limits(&mut entity, limits);
            let key = entity.key();
            if store.entities.insert(key, entity).is_some() {
                return Err(FloorplanError::DuplicateEntity(key));
            }
        }
        Ok(store)
    }

    /// Returns every entity in render order as a snapshot.
    pub fn snapshot(&self) -> LayoutSnapshot {
        LayoutSnapshot::new(self.entities.values().cloned().collect())
    }

    /// Returns the bulk update payload for all entities of `kind`.
    pub fn batch_update(&self, kind: EntityKind) -> BatchUpdateRequest {
        BatchUpdateRequest {
            items: self
                .entities
                .values()
                .filter(|entity| entity.kind() == kind)
                .map(BatchUpdateItem::from)
                .collect(),
        }
    }

    /// Inserts an entity, replacing and returning any entity with the same key.
    pub fn insert(&mut self, entity: PlacedEntity) -> Option<PlacedEntity> {
        debug!(key:% = entity.key(), rect:? = entity.rect(); "Entity inserted");
        self.entities.insert(entity.key(), entity)
    }

    /// Replaces the rectangle of a loaded entity.
    ///
    /// This never creates an entity; new entities need a type and floor and
    /// go through [`insert`](Self::insert).
    ///
    /// # Errors
    ///
    /// Returns [`FloorplanError::UnknownEntity`] if `key` is not loaded.
    pub fn upsert_position(&mut self, key: EntityKey, rect: Rect) -> Result<(), FloorplanError> {
        let entity = self.get_mut(key)?;
        entity.set_rect(rect);
        debug!(key:% = key, rect:?; "Position updated");
        Ok(())
    }

    /// Moves a loaded entity so its top-left corner is at `origin`.
    ///
    /// # Errors
    ///
    /// Returns [`FloorplanError::UnknownEntity`] if `key` is not loaded.
    pub fn move_to(&mut self, key: EntityKey, origin: Point) -> Result<Rect, FloorplanError> {
        let entity = self.get_mut(key)?;
        let rect = entity.rect().with_origin(origin);
        entity.set_rect(rect);
        debug!(key:% = key, rect:?; "Entity moved");
        Ok(rect)
    }

    /// Sets the rotation of a loaded entity.
    ///
    /// # Errors
    ///
    /// Returns [`FloorplanError::UnknownEntity`] if `key` is not loaded.
    pub fn set_rotation(&mut self, key: EntityKey, rotation: Rotation) -> Result<(), FloorplanError> {
        self.get_mut(key)?.set_rotation(rotation);
        Ok(())
    }

    /// Removes an entity, returning it if it was loaded.
    pub fn remove_position(&mut self, key: EntityKey) -> Option<PlacedEntity> {
        let removed = self.entities.shift_remove(&key);
        if removed.is_some() {
            debug!(key:% = key; "Entity removed");
        }
        removed
    }

    pub fn get(&self, key: EntityKey) -> Option<&PlacedEntity> {
        self.entities.get(&key)
    }

    pub fn get_position(&self, key: EntityKey) -> Option<Rect> {
        self.get(key).map(PlacedEntity::rect)
    }

    pub fn contains(&self, key: EntityKey) -> bool {
        self.entities.contains_key(&key)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Iterates over all entities in render order.
    pub fn iter(&self) -> impl Iterator<Item = &PlacedEntity> {
        self.entities.values()
    }

    /// Iterates over the entities on `floor` in render order.
    pub fn entities_on_floor(&self, floor: Floor) -> impl Iterator<Item = &PlacedEntity> {
        self.iter().filter(move |entity| entity.floor() == floor)
    }

    /// Returns the rectangles occupied on `floor`.
    pub fn occupied_on_floor(&self, floor: Floor) -> Vec<Rect> {
        self.entities_on_floor(floor).map(PlacedEntity::rect).collect()
    }

    /// Returns the distinct floors that hold at least one entity, ascending.
    pub fn floors(&self) -> Vec<Floor> {
        let mut floors: Vec<Floor> = self.iter().map(PlacedEntity::floor).collect();
        floors.sort_unstable();
        floors.dedup();
        floors
    }

    /// Moves every entity to the seeding position of its index and restores
    /// its type's default size. Rotation is kept.
    ///
    /// Returns the number of entities reset.
    pub fn reseed(&mut self, finder: &PlacementFinder) -> usize {
        for (index, entity) in self.entities.values_mut().enumerate() {
            let rect = Rect::from_origin(
                finder.seed_position(index),
                entity.entity_type().default_size(),
            );
            entity.set_rect(rect);
        }
        debug!(entity_count = self.entities.len(); "Positions reseeded");
        self.entities.len()
    }

    /// Resizes every entity accepted by `filter` in a single pass, keeping
    /// each top-left corner in place.
    ///
    /// Returns the keys of the resized entities in render order.
    pub fn resize_matching(
        &mut self,
        size: Size,
        mut filter: impl FnMut(&PlacedEntity) -> bool,
    ) -> Vec<EntityKey> {
        self.entities
            .values_mut()
            .filter(|entity| filter(entity))
            .map(|entity| {
                entity.set_rect(entity.rect().with_size(size));
                entity.key()
            })
            .collect()
    }

    fn get_mut(&mut self, key: EntityKey) -> Result<&mut PlacedEntity, FloorplanError> {
        self.entities
            .get_mut(&key)
            .ok_or(FloorplanError::UnknownEntity(key))
    }
}

fn clamp_to_limits(entity: &mut PlacedEntity, limits: &LimitsConfig) {
    let rect = entity.rect();
    let clamped = rect.size().clamp(limits.for_kind(entity.kind()));
    if clamped != rect.size() {
        warn!(key:% = entity.key(), size:? = rect.size(), clamped:? = clamped; "Loaded size out of range, clamped");
        entity.set_rect(rect.with_size(clamped));
    }
}

#[cfg(test)]
mod tests {
    use floorplan_core::entity::{EntityType, FacilityType, RoomType};

    use super::*;
    use crate::config::AppConfig;

    fn floor(number: i64) -> Floor {
        Floor::new(number).unwrap()
    }

    fn record(id: u64, kind: EntityKind, entity_type: &str, floor: i64) -> EntityRecord {
        EntityRecord {
            id,
            kind,
            entity_type: entity_type.to_string(),
            floor,
            left: None,
            top: None,
            width: None,
            height: None,
            rotation: None,
        }
    }

    fn finder() -> PlacementFinder {
        PlacementFinder::new(&AppConfig::default())
    }

    fn limits() -> LimitsConfig {
        LimitsConfig::default()
    }

    #[test]
    fn test_insert_get_remove() {
        let mut store = PositionStore::new();
        let room = PlacedEntity::new(1, RoomType::Single, floor(1)).with_rect(Rect::new(20, 20, 120, 100));

        assert!(store.insert(room.clone()).is_none());
        assert_eq!(store.get_position(EntityKey::room(1)), Some(Rect::new(20, 20, 120, 100)));
        assert_eq!(store.get_position(EntityKey::facility(1)), None);

        assert_eq!(store.remove_position(EntityKey::room(1)), Some(room));
        assert!(store.is_empty());
        assert_eq!(store.remove_position(EntityKey::room(1)), None);
    }

    #[test]
    fn test_upsert_position_replaces_rect() {
        let mut store = PositionStore::new();
        store.insert(PlacedEntity::new(1, RoomType::Single, floor(1)));

        store
            .upsert_position(EntityKey::room(1), Rect::new(40, 60, 140, 120))
            .unwrap();
        assert_eq!(
            store.get_position(EntityKey::room(1)),
            Some(Rect::new(40, 60, 140, 120))
        );
    }

    #[test]
    fn test_upsert_position_unknown_entity() {
        let mut store = PositionStore::new();
        let err = store
            .upsert_position(EntityKey::room(7), Rect::default())
            .unwrap_err();
        assert!(matches!(err, FloorplanError::UnknownEntity(key) if key == EntityKey::room(7)));
        assert!(store.is_empty());
    }

    #[test]
    fn test_move_to_keeps_size() {
        let mut store = PositionStore::new();
        store.insert(
            PlacedEntity::new(2, FacilityType::Stairs, floor(1)).with_rect(Rect::new(0, 0, 80, 120)),
        );

        let rect = store
            .move_to(EntityKey::facility(2), Point::new(200, 40))
            .unwrap();
        assert_eq!(rect, Rect::new(200, 40, 80, 120));
    }

    #[test]
    fn test_load_seeds_missing_positions_by_index() {
        let listing = vec![
            record(1, EntityKind::Room, "单人间", 1),
            record(2, EntityKind::Room, "双人间", 1),
            record(3, EntityKind::Facility, "corridor", 1),
        ];
        let store = PositionStore::load(&listing, None, &finder(), &limits()).unwrap();

        assert_eq!(store.get_position(EntityKey::room(1)), Some(Rect::new(20, 20, 120, 100)));
        assert_eq!(store.get_position(EntityKey::room(2)), Some(Rect::new(320, 20, 120, 100)));
        assert_eq!(
            store.get_position(EntityKey::facility(3)),
            Some(Rect::new(620, 20, 200, 60))
        );
    }

    #[test]
    fn test_load_prefers_listing_position_over_seed() {
        let mut listed = record(1, EntityKind::Room, "单人间", 1);
        listed.left = Some(400);
        listed.top = Some(300);
        listed.width = Some(160);
        listed.height = Some(140);

        let store = PositionStore::load(&[listed], None, &finder(), &limits()).unwrap();
        assert_eq!(
            store.get_position(EntityKey::room(1)),
            Some(Rect::new(400, 300, 160, 140))
        );
    }

    #[test]
    fn test_load_prefers_cache_over_listing() {
        let mut listed = record(1, EntityKind::Room, "单人间", 1);
        listed.left = Some(400);
        listed.top = Some(300);

        let cache = LayoutSnapshot::new(vec![
            PlacedEntity::new(1, RoomType::Single, floor(1)).with_rect(Rect::new(60, 80, 140, 100)),
            PlacedEntity::new(99, RoomType::Single, floor(1)),
        ]);

        let store = PositionStore::load(&[listed], Some(&cache), &finder(), &limits()).unwrap();
        assert_eq!(
            store.get_position(EntityKey::room(1)),
            Some(Rect::new(60, 80, 140, 100))
        );
        // Entities only known to the cache are not resurrected
        assert!(!store.contains(EntityKey::room(99)));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_load_keeps_listing_type_and_floor_over_cache() {
        let listed = record(1, EntityKind::Room, "豪华套房", 3);
        let cache = LayoutSnapshot::new(vec![
            PlacedEntity::new(1, RoomType::Single, floor(1)).with_rect(Rect::new(60, 80, 140, 100)),
        ]);

        let store = PositionStore::load(&[listed], Some(&cache), &finder(), &limits()).unwrap();
        let entity = store.get(EntityKey::room(1)).unwrap();
        assert_eq!(entity.entity_type(), EntityType::Room(RoomType::Deluxe));
        assert_eq!(entity.floor(), floor(3));
        assert_eq!(entity.rect(), Rect::new(60, 80, 140, 100));
    }

    #[test]
    fn test_load_rejects_duplicates() {
        let listing = vec![
            record(1, EntityKind::Room, "单人间", 1),
            record(1, EntityKind::Room, "双人间", 2),
        ];
        let err = PositionStore::load(&listing, None, &finder(), &limits()).unwrap_err();
        assert!(matches!(err, FloorplanError::DuplicateEntity(_)));
    }

    #[test]
    fn test_same_id_different_kinds_coexist() {
        let listing = vec![
            record(1, EntityKind::Room, "单人间", 1),
            record(1, EntityKind::Facility, "elevator", 1),
        ];
        let store = PositionStore::load(&listing, None, &finder(), &limits()).unwrap();
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_floors_sorted_and_distinct() {
        let listing = vec![
            record(1, EntityKind::Room, "单人间", 3),
            record(2, EntityKind::Room, "单人间", 1),
            record(3, EntityKind::Room, "单人间", 3),
            record(4, EntityKind::Facility, "stairs", 2),
        ];
        let store = PositionStore::load(&listing, None, &finder(), &limits()).unwrap();
        assert_eq!(store.floors(), vec![floor(1), floor(2), floor(3)]);
        assert_eq!(store.occupied_on_floor(floor(3)).len(), 2);
    }

    #[test]
    fn test_snapshot_round_trip_reproduces_rects() {
        let listing = vec![
            record(1, EntityKind::Room, "单人间", 1),
            record(2, EntityKind::Room, "双人间", 2),
            record(5, EntityKind::Facility, "reception", 1),
        ];
        let mut store = PositionStore::load(&listing, None, &finder(), &limits()).unwrap();
        store
            .move_to(EntityKey::room(2), Point::new(260, 180))
            .unwrap();

        let json = store.snapshot().to_json().unwrap();
        let restored = PositionStore::from_snapshot(LayoutSnapshot::from_json(&json).unwrap(), &limits()).unwrap();

        for entity in store.iter() {
            assert_eq!(restored.get_position(entity.key()), Some(entity.rect()));
        }
        assert_eq!(restored.len(), store.len());
    }

    #[test]
    fn test_batch_update_filters_kind() {
        let listing = vec![
            record(1, EntityKind::Room, "单人间", 1),
            record(2, EntityKind::Facility, "elevator", 1),
            record(3, EntityKind::Facility, "stairs", 2),
        ];
        let store = PositionStore::load(&listing, None, &finder(), &limits()).unwrap();

        let request = store.batch_update(EntityKind::Facility);
        let ids: Vec<u64> = request.items.iter().map(|item| item.id).collect();
        assert_eq!(ids, vec![2, 3]);
        assert_eq!(store.batch_update(EntityKind::Room).items.len(), 1);
    }

    #[test]
    fn test_resize_matching_keeps_origin() {
        let mut store = PositionStore::new();
        store.insert(PlacedEntity::new(1, RoomType::Double, floor(2)).with_rect(Rect::new(20, 20, 120, 100)));
        store.insert(PlacedEntity::new(2, RoomType::Single, floor(2)).with_rect(Rect::new(160, 20, 120, 100)));

        let keys = store.resize_matching(Size::new(140, 120), |entity| {
            entity.entity_type() == EntityType::Room(RoomType::Double)
        });

        assert_eq!(keys, vec![EntityKey::room(1)]);
        assert_eq!(store.get_position(EntityKey::room(1)), Some(Rect::new(20, 20, 140, 120)));
        assert_eq!(store.get_position(EntityKey::room(2)), Some(Rect::new(160, 20, 120, 100)));
    }

    #[test]
    fn test_reseed_restores_grid_and_default_size() {
        let mut store = PositionStore::new();
        store.insert(
            PlacedEntity::new(7, FacilityType::Corridor, floor(1))
                .with_rect(Rect::new(500, 500, 300, 40))
                .with_rotation(Rotation::from_degrees(90).unwrap()),
        );
        store.insert(PlacedEntity::new(3, RoomType::Deluxe, floor(2)).with_rect(Rect::new(0, 0, 400, 400)));

        assert_eq!(store.reseed(&finder()), 2);
        let corridor = store.get(EntityKey::facility(7)).unwrap();
        assert_eq!(corridor.rect(), Rect::new(20, 20, 200, 60));
        assert_eq!(corridor.rotation().degrees(), 90);
        assert_eq!(store.get_position(EntityKey::room(3)), Some(Rect::new(320, 20, 120, 100)));
    }

    #[test]
    fn test_load_clamps_listing_size_into_limits() {
        let mut small = record(1, EntityKind::Room, "单人间", 1);
        small.width = Some(10);
        small.height = Some(-50);
        let mut large = record(2, EntityKind::Room, "单人间", 1);
        large.width = Some(5000);
        large.height = Some(5000);
        let mut facility = record(3, EntityKind::Facility, "stairs", 1);
        facility.width = Some(0);
        facility.height = Some(20);

        let store = PositionStore::load(&[small, large, facility], None, &finder(), &limits()).unwrap();

        assert_eq!(store.get_position(EntityKey::room(1)).unwrap().size(), Size::new(60, 60));
        assert_eq!(store.get_position(EntityKey::room(2)).unwrap().size(), Size::new(400, 400));
        assert_eq!(store.get_position(EntityKey::facility(3)).unwrap().size(), Size::new(40, 40));
    }

    #[test]
    fn test_load_clamps_cached_size_into_limits() {
        let listed = record(4, EntityKind::Room, "单人间", 1);
        let cache = LayoutSnapshot::new(vec![
            PlacedEntity::new(4, RoomType::Single, floor(1)).with_rect(Rect::new(40, 60, 900, 20)),
        ]);

        let store = PositionStore::load(&[listed], Some(&cache), &finder(), &limits()).unwrap();
        assert_eq!(store.get_position(EntityKey::room(4)), Some(Rect::new(40, 60, 400, 60)));
    }

    #[test]
    fn test_from_snapshot_clamps_size_and_keeps_origin() {
        let snapshot = LayoutSnapshot::new(vec![
            PlacedEntity::new(9, FacilityType::Elevator, floor(2)).with_rect(Rect::new(200, 140, 10, 1000)),
        ]);

        let store = PositionStore::from_snapshot(snapshot, &limits()).unwrap();
        assert_eq!(store.get_position(EntityKey::facility(9)), Some(Rect::new(200, 140, 40, 400)));
    }
}
