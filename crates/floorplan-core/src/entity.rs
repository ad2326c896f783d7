//! Entity model for rooms and facilities placed on a floor plan.
//!
//! Every entity placed on a plan is a [`PlacedEntity`]: a [`Rect`] together
//! with an identity ([`EntityKey`]), the [`Floor`] it belongs to, its
//! [`EntityType`] and a [`Rotation`].
//!
//! Entity types come from closed enumerations ([`RoomType`] and
//! [`FacilityType`]). Raw strings are validated once, when they enter the
//! model, so that grouping entities "by type" can never silently match
//! nothing because of a typo.

use std::{
    fmt::{self, Display},
    num::NonZeroU32,
    str::FromStr,
};

use serde::{Deserialize, Serialize};

use crate::{
    error::EntityError,
    geometry::{Point, Rect, Size, SizeLimits},
};

/// Smallest width or height a room can be resized to.
pub const ROOM_MIN_SIZE: i32 = 60;

/// Smallest width or height a facility can be resized to.
pub const FACILITY_MIN_SIZE: i32 = 40;

/// Largest width or height any entity can be resized to.
pub const MAX_SIZE: i32 = 400;

/// Default size of a newly created room.
pub const DEFAULT_ROOM_SIZE: Size = Size::new(120, 100);

/// The two families of entities drawn on a floor plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Room,
    Facility,
}

impl EntityKind {
    /// Returns the resize limits that apply to entities of this kind.
    pub fn default_size_limits(self) -> SizeLimits {
        match self {
            Self::Room => SizeLimits::new(ROOM_MIN_SIZE, MAX_SIZE),
            Self::Facility => SizeLimits::new(FACILITY_MIN_SIZE, MAX_SIZE),
        }
    }
}

impl FromStr for EntityKind {
    type Err = EntityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "room" => Ok(Self::Room),
            "facility" => Ok(Self::Facility),
            _ => Err(EntityError::UnknownKind(s.to_string())),
        }
    }
}

impl From<EntityKind> for &'static str {
    fn from(val: EntityKind) -> Self {
        match val {
            EntityKind::Room => "room",
            EntityKind::Facility => "facility",
        }
    }
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s: &'static str = (*self).into();
        write!(f, "{s}")
    }
}

/// Room categories offered by the hotel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoomType {
    #[serde(rename = "单人间")]
    Single,
    #[serde(rename = "双人间")]
    Double,
    #[serde(rename = "豪华套房")]
    Deluxe,
    #[serde(rename = "总统套房")]
    Presidential,
    #[serde(rename = "商务套房")]
    Business,
}

impl RoomType {
    /// All room types, in display order.
    pub const ALL: [RoomType; 5] = [
        Self::Single,
        Self::Double,
        Self::Deluxe,
        Self::Presidential,
        Self::Business,
    ];

    /// Returns the canonical name used by the hotel's records.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Single => "单人间",
            Self::Double => "双人间",
            Self::Deluxe => "豪华套房",
            Self::Presidential => "总统套房",
            Self::Business => "商务套房",
        }
    }
}

impl FromStr for RoomType {
    type Err = EntityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|room_type| room_type.as_str() == s)
            .ok_or_else(|| EntityError::UnknownType(s.to_string()))
    }
}

impl Display for RoomType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Non-room fixtures drawn on a floor plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FacilityType {
    Elevator,
    Corridor,
    Laundry,
    Stairs,
    Bathroom,
    Storage,
    Rest,
    Reception,
    Bed,
    Microwave,
}

impl FacilityType {
    /// All facility types, in palette order.
    pub const ALL: [FacilityType; 10] = [
        Self::Elevator,
        Self::Corridor,
        Self::Laundry,
        Self::Stairs,
        Self::Bathroom,
        Self::Storage,
        Self::Rest,
        Self::Reception,
        Self::Bed,
        Self::Microwave,
    ];

    /// Returns the identifier used in stored records.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Elevator => "elevator",
            Self::Corridor => "corridor",
            Self::Laundry => "laundry",
            Self::Stairs => "stairs",
            Self::Bathroom => "bathroom",
            Self::Storage => "storage",
            Self::Rest => "rest",
            Self::Reception => "reception",
            Self::Bed => "bed",
            Self::Microwave => "microwave",
        }
    }

    /// Returns the label shown to hotel staff.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Elevator => "电梯",
            Self::Corridor => "走廊",
            Self::Laundry => "洗衣房",
            Self::Stairs => "楼梯",
            Self::Bathroom => "卫生间",
            Self::Storage => "储物间",
            Self::Rest => "休息区",
            Self::Reception => "前台",
            Self::Bed => "床位区",
            Self::Microwave => "餐饮区",
        }
    }

    /// Returns the size a new facility of this type is created with.
    pub fn default_size(self) -> Size {
        match self {
            Self::Elevator | Self::Bathroom | Self::Storage => Size::new(80, 80),
            Self::Corridor => Size::new(200, 60),
            Self::Laundry | Self::Microwave => Size::new(100, 100),
            Self::Stairs => Size::new(80, 120),
            Self::Rest => Size::new(160, 120),
            Self::Reception => Size::new(140, 80),
            Self::Bed => Size::new(100, 80),
        }
    }
}

impl FromStr for FacilityType {
    type Err = EntityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|facility_type| facility_type.as_str() == s)
            .ok_or_else(|| EntityError::UnknownType(s.to_string()))
    }
}

impl Display for FacilityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The type of a placed entity, room or facility.
///
/// Serialized as the bare type string. Room and facility names never
/// collide, so the kind is recoverable from the string alone.
///
/// # Examples
///
/// ```
/// # use floorplan_core::entity::{EntityKind, EntityType, FacilityType, RoomType};
/// let double: EntityType = "双人间".parse().unwrap();
/// assert_eq!(double, EntityType::Room(RoomType::Double));
/// assert_eq!(double.kind(), EntityKind::Room);
///
/// let stairs: EntityType = "stairs".parse().unwrap();
/// assert_eq!(stairs, EntityType::Facility(FacilityType::Stairs));
///
/// assert!("双人房".parse::<EntityType>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum EntityType {
    Room(RoomType),
    Facility(FacilityType),
}

impl EntityType {
    pub fn kind(self) -> EntityKind {
        match self {
            Self::Room(_) => EntityKind::Room,
            Self::Facility(_) => EntityKind::Facility,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Room(room_type) => room_type.as_str(),
            Self::Facility(facility_type) => facility_type.as_str(),
        }
    }

    /// Returns the label shown to hotel staff. Room type names already are
    /// the staff labels.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Room(room_type) => room_type.as_str(),
            Self::Facility(facility_type) => facility_type.display_name(),
        }
    }

    /// Returns the size a new entity of this type is created with.
    pub fn default_size(self) -> Size {
        match self {
            Self::Room(_) => DEFAULT_ROOM_SIZE,
            Self::Facility(facility_type) => facility_type.default_size(),
        }
    }

    /// Parses a type string and checks that it belongs to `kind`.
    ///
    /// # Errors
    ///
    /// Returns [`EntityError::UnknownType`] for an unrecognized string and
    /// [`EntityError::KindMismatch`] when the type exists but belongs to the
    /// other kind.
    pub fn parse_for_kind(kind: EntityKind, s: &str) -> Result<Self, EntityError> {
        let entity_type: EntityType = s.parse()?;
        if entity_type.kind() != kind {
            return Err(EntityError::KindMismatch {
                kind,
                entity_type: s.to_string(),
            });
        }
        Ok(entity_type)
    }
}

impl FromStr for EntityType {
    type Err = EntityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(room_type) = s.parse::<RoomType>() {
            return Ok(Self::Room(room_type));
        }
        s.parse::<FacilityType>().map(Self::Facility)
    }
}

impl TryFrom<String> for EntityType {
    type Error = EntityError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<EntityType> for String {
    fn from(val: EntityType) -> Self {
        val.as_str().to_string()
    }
}

impl From<RoomType> for EntityType {
    fn from(val: RoomType) -> Self {
        Self::Room(val)
    }
}

impl From<FacilityType> for EntityType {
    fn from(val: FacilityType) -> Self {
        Self::Facility(val)
    }
}

impl Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A floor number. Floors are numbered from 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u32")]
pub struct Floor(NonZeroU32);

impl Floor {
    /// Creates a floor, rejecting zero and negative numbers.
    ///
    /// # Errors
    ///
    /// Returns [`EntityError::InvalidFloor`] when `number` is not a positive
    /// `u32`.
    pub fn new(number: i64) -> Result<Self, EntityError> {
        u32::try_from(number)
            .ok()
            .and_then(NonZeroU32::new)
            .map(Self)
            .ok_or(EntityError::InvalidFloor(number))
    }

    pub fn number(self) -> u32 {
        self.0.get()
    }
}

impl TryFrom<i64> for Floor {
    type Error = EntityError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Floor> for u32 {
    fn from(val: Floor) -> Self {
        val.number()
    }
}

impl Display for Floor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}F", self.number())
    }
}

/// Identifier of an entity, unique within its [`EntityKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(u64);

impl EntityId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for EntityId {
    fn from(val: u64) -> Self {
        Self(val)
    }
}

impl Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Globally unique identity of an entity: its kind plus its id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityKey {
    kind: EntityKind,
    id: EntityId,
}

impl EntityKey {
    pub fn new(kind: EntityKind, id: EntityId) -> Self {
        Self { kind, id }
    }

    /// Shorthand for the key of a room.
    pub fn room(id: u64) -> Self {
        Self::new(EntityKind::Room, EntityId(id))
    }

    /// Shorthand for the key of a facility.
    pub fn facility(id: u64) -> Self {
        Self::new(EntityKind::Facility, EntityId(id))
    }

    pub fn kind(self) -> EntityKind {
        self.kind
    }

    pub fn id(self) -> EntityId {
        self.id
    }
}

impl Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.kind, self.id)
    }
}

/// Clockwise rotation of an entity in quarter turns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct Rotation(u16);

impl Rotation {
    /// Creates a rotation from degrees, normalized into `0..360`.
    ///
    /// # Errors
    ///
    /// Returns [`EntityError::InvalidRotation`] unless `degrees` is a
    /// multiple of 90.
    pub fn from_degrees(degrees: i32) -> Result<Self, EntityError> {
        if degrees % 90 != 0 {
            return Err(EntityError::InvalidRotation(degrees));
        }
        Ok(Self(degrees.rem_euclid(360) as u16))
    }

    pub fn degrees(self) -> i32 {
        i32::from(self.0)
    }

    /// Returns this rotation advanced by one clockwise quarter turn.
    pub fn quarter_turn(self) -> Self {
        Self((self.0 + 90) % 360)
    }
}

impl TryFrom<i32> for Rotation {
    type Error = EntityError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::from_degrees(value)
    }
}

impl From<Rotation> for i32 {
    fn from(val: Rotation) -> Self {
        val.degrees()
    }
}

/// A room or facility together with its rectangle on a floor.
///
/// # Examples
///
/// ```
/// # use floorplan_core::{entity::{Floor, PlacedEntity, RoomType}, geometry::Rect};
/// let room = PlacedEntity::new(7, RoomType::Double, Floor::new(2).unwrap())
///     .with_rect(Rect::new(20, 20, 120, 100));
///
/// assert_eq!(room.key().to_string(), "room#7");
/// assert_eq!(room.rect().right(), 140);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedEntity {
    id: EntityId,
    #[serde(rename = "type")]
    entity_type: EntityType,
    floor: Floor,
    #[serde(flatten)]
    rect: Rect,
    #[serde(default)]
    rotation: Rotation,
}

impl PlacedEntity {
    /// Creates an entity with its type's default size at the origin.
    pub fn new(id: u64, entity_type: impl Into<EntityType>, floor: Floor) -> Self {
        let entity_type = entity_type.into();
        Self {
            id: EntityId(id),
            entity_type,
            floor,
            rect: Rect::from_origin(Point::default(), entity_type.default_size()),
            rotation: Rotation::default(),
        }
    }

    /// Sets the rectangle (builder style).
    pub fn with_rect(mut self, rect: Rect) -> Self {
        self.rect = rect;
        self
    }

    /// Sets the rotation (builder style).
    pub fn with_rotation(mut self, rotation: Rotation) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn key(&self) -> EntityKey {
        EntityKey::new(self.kind(), self.id)
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn kind(&self) -> EntityKind {
        self.entity_type.kind()
    }

    pub fn entity_type(&self) -> EntityType {
        self.entity_type
    }

    pub fn floor(&self) -> Floor {
        self.floor
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    pub fn set_rect(&mut self, rect: Rect) {
        self.rect = rect;
    }

    pub fn set_rotation(&mut self, rotation: Rotation) {
        self.rotation = rotation;
    }
}
