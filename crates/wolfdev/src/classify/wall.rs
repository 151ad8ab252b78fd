//! Named wall textures.

/// Highest wall code a geometry plane uses for solid walls.
pub const MAX_WALL_CODE: u16 = 89;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Wall {
    GreyBrick1,
    GreyBrick2,
    GreyBrickFlag,
    GreyBrickHitler,
    Cell,
    GreyBrickEagle,
    CellSkeleton,
    BlueBrick1,
    BlueBrick2,
    WoodEagle,
    WoodHitler,
    Wood,
    Entrance,
    SteelSign,
    Steel,
    Landscape,
    RedBrick,
    RedBrickSwastika,
    Purple,
    RedBrickFlag,
    Elevator,
    DeadElevator,
    WoodIronCross,
    DirtyBrick1,
    PurpleBlood,
    DirtyBrick2,
    GreyBrick3,
    GreyBrickSign,
    BrownWeave,
    BrownWeaveBlood2,
    BrownWeaveBlood3,
    BrownWeaveBlood1,
    StainedGlass,
    BlueWallSkull,
    GreyWall1,
    BlueWallSwastika,
    GreyWallVent,
    MulticolorBrick,
    GreyWall2,
    BlueWall,
    BlueBrickSign,
    BrownMarble1,
    GreyWallMap,
    BrownStone1,
    BrownStone2,
    BrownMarble2,
    BrownMarbleFlag,
    WoodPanel,
    GreyWallHitler,
    // Spear of Destiny only from here.
    StoneWall1,
    StoneWall2,
    StoneWallFlag,
    StoneWallWreath,
    GreyConcreteLight,
    GreyConcreteDark,
    BloodWall,
    Concrete,
    RampartStone1,
    RampartStone2,
    ElevatorWall,
    WhitePanel,
    BrownConcrete,
    PurpleBrick,
    Unknown,
}

/// Every named wall, indexed by code minus one.
pub(super) const NAMED_WALLS: [Wall; 63] = [
    Wall::GreyBrick1,
    Wall::GreyBrick2,
    Wall::GreyBrickFlag,
    Wall::GreyBrickHitler,
    Wall::Cell,
    Wall::GreyBrickEagle,
    Wall::CellSkeleton,
    Wall::BlueBrick1,
    Wall::BlueBrick2,
    Wall::WoodEagle,
    Wall::WoodHitler,
    Wall::Wood,
    Wall::Entrance,
    Wall::SteelSign,
    Wall::Steel,
    Wall::Landscape,
    Wall::RedBrick,
    Wall::RedBrickSwastika,
    Wall::Purple,
    Wall::RedBrickFlag,
    Wall::Elevator,
    Wall::DeadElevator,
    Wall::WoodIronCross,
    Wall::DirtyBrick1,
    Wall::PurpleBlood,
    Wall::DirtyBrick2,
    Wall::GreyBrick3,
    Wall::GreyBrickSign,
    Wall::BrownWeave,
    Wall::BrownWeaveBlood2,
    Wall::BrownWeaveBlood3,
    Wall::BrownWeaveBlood1,
    Wall::StainedGlass,
    Wall::BlueWallSkull,
    Wall::GreyWall1,
    Wall::BlueWallSwastika,
    Wall::GreyWallVent,
    Wall::MulticolorBrick,
    Wall::GreyWall2,
    Wall::BlueWall,
    Wall::BlueBrickSign,
    Wall::BrownMarble1,
    Wall::GreyWallMap,
    Wall::BrownStone1,
    Wall::BrownStone2,
    Wall::BrownMarble2,
    Wall::BrownMarbleFlag,
    Wall::WoodPanel,
    Wall::GreyWallHitler,
    Wall::StoneWall1,
    Wall::StoneWall2,
    Wall::StoneWallFlag,
    Wall::StoneWallWreath,
    Wall::GreyConcreteLight,
    Wall::GreyConcreteDark,
    Wall::BloodWall,
    Wall::Concrete,
    Wall::RampartStone1,
    Wall::RampartStone2,
    Wall::ElevatorWall,
    Wall::WhitePanel,
    Wall::BrownConcrete,
    Wall::PurpleBrick,
];

/// The page holding the lit face of a wall's texture in the page file. The
/// shaded face is the page after it.
#[must_use]
pub const fn wall_texture_page(code: u16) -> Option<u16> {
    match code {
        1..=MAX_WALL_CODE => Some((code - 1) * 2),
        _ => None,
    }
}
