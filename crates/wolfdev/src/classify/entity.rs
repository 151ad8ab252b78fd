//! Object plane codes: spawns, decorations, pickups and actors.

/// Compass direction an actor or the player faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    /// Actor codes come in groups of four ordered east, north, west, south.
    pub(super) const fn from_actor_offset(offset: usize) -> Self {
        match offset {
            0 => Direction::East,
            1 => Direction::North,
            2 => Direction::West,
            _ => Direction::South,
        }
    }

    /// Player spawns are ordered north, east, south, west.
    pub(super) const fn from_spawn_offset(offset: usize) -> Self {
        match offset {
            0 => Direction::North,
            1 => Direction::East,
            2 => Direction::South,
            _ => Direction::West,
        }
    }
}

/// The direction a patrol turns to when it reaches a turn point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Heading {
    East,
    NorthEast,
    North,
    NorthWest,
    West,
    SouthWest,
    South,
    SouthEast,
}

impl Heading {
    pub(super) const fn from_offset(offset: usize) -> Self {
        match offset {
            0 => Heading::East,
            1 => Heading::NorthEast,
            2 => Heading::North,
            3 => Heading::NorthWest,
            4 => Heading::West,
            5 => Heading::SouthWest,
            6 => Heading::South,
            _ => Heading::SouthEast,
        }
    }
}

/// The lowest difficulty at which an actor appears.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Skill {
    Easy,
    Medium,
    Hard,
}

impl Skill {
    pub(super) const ALL: [Skill; 3] = [Skill::Easy, Skill::Medium, Skill::Hard];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActorKind {
    Guard,
    Officer,
    SS,
    Dog,
    Mutant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Actor {
    pub kind: ActorKind,
    pub facing: Direction,
    /// Patrolling rather than standing still. Dogs always patrol.
    pub moving: bool,
    pub skill: Skill,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Boss {
    Hans,
    Schabbs,
    RobedHitler,
    Hitler,
    Otto,
    Gretel,
    Fettgesicht,
    TransGrosse,
    UberMutant,
    BarnacleWilhelm,
    DeathKnight,
    AngelOfDeath,
    KerryKangaroo,
    ErnieElephant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GhostColor {
    Red,
    Yellow,
    Rose,
    Blue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StaticObject {
    Water,
    OilDrum,
    TableWithChairs,
    FloorLamp,
    Chandelier,
    HangingSkeleton,
    DogFood,
    WhiteColumn,
    GreenPlant,
    Skeleton,
    Sink,
    BrownPlant,
    Vase,
    Table,
    CeilingLightGreen,
    BrownUtensils,
    Armor,
    Cage,
    CageSkeleton,
    Bones1,
    GoldKey,
    SilverKey,
    Bed,
    Basket,
    Food,
    Medkit,
    Ammo,
    MachineGun,
    ChainGun,
    Cross,
    Chalice,
    Chest,
    Crown,
    ExtraLife,
    BonesBlood,
    Barrel,
    WellWater,
    Well,
    PoolOfBlood,
    Flag,
    AardwolfSign,
    Bones2,
    Bones3,
    Bones4,
    BlueUtensils,
    Stove,
    Rack,
    Vines,
    // Spear of Destiny replacements and additions.
    SkullsOnStick,
    CageBloodyBones,
    CageSkulls,
    CeilingLightRed,
    CowSkull,
    WellBlood,
    AngelStatue,
    BrownColumn,
    AmmoBox,
    TruckRear,
    SpearOfDestiny,
}

impl StaticObject {
    /// Whether the player collects this object by walking over it.
    #[must_use]
    pub fn is_pickup(self) -> bool {
        matches!(
            self,
            StaticObject::DogFood
                | StaticObject::GoldKey
                | StaticObject::SilverKey
                | StaticObject::Food
                | StaticObject::Medkit
                | StaticObject::Ammo
                | StaticObject::MachineGun
                | StaticObject::ChainGun
                | StaticObject::Cross
                | StaticObject::Chalice
                | StaticObject::Chest
                | StaticObject::Crown
                | StaticObject::ExtraLife
                | StaticObject::BonesBlood
                | StaticObject::PoolOfBlood
                | StaticObject::AmmoBox
                | StaticObject::SpearOfDestiny
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Entity {
    None,
    PlayerSpawn(Direction),
    Static(StaticObject),
    Actor(Actor),
    TurnPoint(Heading),
    Boss(Boss),
    /// The Spear of Destiny ghost that cannot be killed for good.
    Spectre,
    PacmanGhost(GhostColor),
    Pushwall,
    EndGame,
    /// Ends the level without an elevator.
    NextLevel,
    /// Ends the level and leads to the secret level.
    SecretLevel,
    DeadGuard,
    Unknown,
}

impl Entity {
    #[must_use]
    pub fn is_player_spawn(self) -> bool {
        matches!(self, Entity::PlayerSpawn(_))
    }

    #[must_use]
    pub fn is_enemy(self) -> bool {
        matches!(
            self,
            Entity::Actor(_) | Entity::Boss(_) | Entity::Spectre | Entity::PacmanGhost(_)
        )
    }
}
