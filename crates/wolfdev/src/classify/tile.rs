//! Geometry plane codes.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    /// The door panel runs north to south.
    Vertical,
    Horizontal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DoorLock {
    Unlocked,
    GoldKey,
    SilverKey,
    Key3,
    Key4,
    Elevator,
}

impl DoorLock {
    pub(super) const fn from_index(index: usize) -> Self {
        match index {
            0 => DoorLock::Unlocked,
            1 => DoorLock::GoldKey,
            2 => DoorLock::SilverKey,
            3 => DoorLock::Key3,
            4 => DoorLock::Key4,
            _ => DoorLock::Elevator,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Door {
    pub lock: DoorLock,
    pub orientation: Orientation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tile {
    Background,
    Wall,
    Door(Door),
    SecretExit,
    /// A floor area. Areas connect for sound propagation; `None` is the
    /// ambush marker, which takes the number of a neighbouring area.
    Area(Option<u8>),
    Unknown,
}

impl Tile {
    #[must_use]
    pub fn is_solid(self) -> bool {
        matches!(self, Tile::Wall)
    }
}

pub(super) const FIRST_DOOR_CODE: usize = 90;
pub(super) const LAST_DOOR_CODE: usize = 101;
pub(super) const AMBUSH_CODE: usize = 106;
pub(super) const SECRET_EXIT_CODE: usize = 107;
pub(super) const FIRST_AREA_CODE: usize = 108;
pub(super) const LAST_AREA_CODE: usize = 143;
