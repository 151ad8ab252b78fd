//! Dense lookup tables, built at compile time.

use super::{
    entity::{
        Actor, ActorKind, Boss, Direction, Entity, GhostColor, Heading, Skill, StaticObject,
    },
    tile::{
        AMBUSH_CODE, Door, DoorLock, FIRST_AREA_CODE, FIRST_DOOR_CODE, LAST_AREA_CODE,
        LAST_DOOR_CODE, Orientation, SECRET_EXIT_CODE, Tile,
    },
    wall::{NAMED_WALLS, Wall},
};

pub(super) const TILE_CODES: usize = LAST_AREA_CODE + 1;
pub(super) const WALL_CODES: usize = NAMED_WALLS.len() + 1;
pub(super) const ENTITY_CODES: usize = 260;

const LAST_SOLID_CODE: usize = 89;
const PLAYER_SPAWN_CODE: usize = 19;
const FIRST_STATIC_CODE: usize = 23;
const FIRST_TURN_CODE: usize = 90;
const PUSHWALL_CODE: usize = 98;
const END_GAME_CODE: usize = 99;
const SECRET_LEVEL_CODE: usize = 100;
const DEAD_GUARD_CODE: usize = 124;
const FIRST_GHOST_CODE: usize = 224;

pub(super) struct Tables {
    pub(super) tiles: [Tile; TILE_CODES],
    pub(super) walls: [Wall; WALL_CODES],
    pub(super) entities: [Entity; ENTITY_CODES],
}

pub(super) static WOLFENSTEIN: Tables = Tables {
    tiles: tiles(),
    walls: walls(49),
    entities: wolfenstein_entities(),
};

pub(super) static SPEAR: Tables = Tables {
    tiles: tiles(),
    walls: walls(63),
    entities: spear_entities(),
};

pub(super) static NOAHS_ARK: Tables = Tables {
    tiles: tiles(),
    walls: walls(NAMED_WALLS.len()),
    entities: noahs_ark_entities(),
};

#[allow(clippy::cast_possible_truncation)]
const fn tiles() -> [Tile; TILE_CODES] {
    let mut tiles = [Tile::Unknown; TILE_CODES];
    tiles[0] = Tile::Background;
    let mut code = 1;
    while code <= LAST_SOLID_CODE {
        tiles[code] = Tile::Wall;
        code += 1;
    }
    code = FIRST_DOOR_CODE;
    while code <= LAST_DOOR_CODE {
        let orientation = if code % 2 == 0 {
            Orientation::Vertical
        } else {
            Orientation::Horizontal
        };
        tiles[code] = Tile::Door(Door {
            lock: DoorLock::from_index((code - FIRST_DOOR_CODE) / 2),
            orientation,
        });
        code += 1;
    }
    tiles[AMBUSH_CODE] = Tile::Area(None);
    tiles[SECRET_EXIT_CODE] = Tile::SecretExit;
    code = FIRST_AREA_CODE;
    while code <= LAST_AREA_CODE {
        tiles[code] = Tile::Area(Some((code - FIRST_AREA_CODE) as u8));
        code += 1;
    }
    tiles
}

const fn walls(named: usize) -> [Wall; WALL_CODES] {
    let mut walls = [Wall::Unknown; WALL_CODES];
    let mut i = 0;
    while i < named {
        walls[i + 1] = NAMED_WALLS[i];
        i += 1;
    }
    walls
}

struct ActorCodes {
    kind: ActorKind,
    /// First code of each skill tier's group of four.
    standing: [usize; 3],
    patrolling: [usize; 3],
}

const ACTOR_CODES: [ActorCodes; 5] = [
    ActorCodes {
        kind: ActorKind::Guard,
        standing: [108, 144, 180],
        patrolling: [112, 148, 184],
    },
    ActorCodes {
        kind: ActorKind::Officer,
        standing: [116, 152, 188],
        patrolling: [120, 156, 192],
    },
    ActorCodes {
        kind: ActorKind::SS,
        standing: [126, 162, 198],
        patrolling: [130, 166, 202],
    },
    ActorCodes {
        kind: ActorKind::Dog,
        standing: [134, 170, 206],
        patrolling: [138, 174, 210],
    },
    ActorCodes {
        kind: ActorKind::Mutant,
        standing: [216, 234, 252],
        patrolling: [220, 238, 256],
    },
];

const fn actor(kind: ActorKind, offset: usize, moving: bool, skill: Skill) -> Entity {
    Entity::Actor(Actor {
        kind,
        facing: Direction::from_actor_offset(offset),
        moving,
        skill,
    })
}

const fn common_entities() -> [Entity; ENTITY_CODES] {
    let mut entities = [Entity::Unknown; ENTITY_CODES];
    entities[0] = Entity::None;
    let mut i = 0;
    while i < 4 {
        entities[PLAYER_SPAWN_CODE + i] = Entity::PlayerSpawn(Direction::from_spawn_offset(i));
        i += 1;
    }
    i = 0;
    while i < 8 {
        entities[FIRST_TURN_CODE + i] = Entity::TurnPoint(Heading::from_offset(i));
        i += 1;
    }
    entities[PUSHWALL_CODE] = Entity::Pushwall;
    entities
}

const fn with_actors(mut entities: [Entity; ENTITY_CODES]) -> [Entity; ENTITY_CODES] {
    let mut a = 0;
    while a < ACTOR_CODES.len() {
        let codes = &ACTOR_CODES[a];
        let always_moving = matches!(codes.kind, ActorKind::Dog);
        let mut s = 0;
        while s < Skill::ALL.len() {
            let mut d = 0;
            while d < 4 {
                entities[codes.standing[s] + d] =
                    actor(codes.kind, d, always_moving, Skill::ALL[s]);
                entities[codes.patrolling[s] + d] = actor(codes.kind, d, true, Skill::ALL[s]);
                d += 1;
            }
            s += 1;
        }
        a += 1;
    }
    entities[END_GAME_CODE] = Entity::EndGame;
    entities[DEAD_GUARD_CODE] = Entity::DeadGuard;
    entities
}

const fn with_statics(
    mut entities: [Entity; ENTITY_CODES],
    statics: &[StaticObject],
) -> [Entity; ENTITY_CODES] {
    let mut i = 0;
    while i < statics.len() {
        entities[FIRST_STATIC_CODE + i] = Entity::Static(statics[i]);
        i += 1;
    }
    entities
}

const WOLFENSTEIN_STATICS: [StaticObject; 48] = [
    StaticObject::Water,
    StaticObject::OilDrum,
    StaticObject::TableWithChairs,
    StaticObject::FloorLamp,
    StaticObject::Chandelier,
    StaticObject::HangingSkeleton,
    StaticObject::DogFood,
    StaticObject::WhiteColumn,
    StaticObject::GreenPlant,
    StaticObject::Skeleton,
    StaticObject::Sink,
    StaticObject::BrownPlant,
    StaticObject::Vase,
    StaticObject::Table,
    StaticObject::CeilingLightGreen,
    StaticObject::BrownUtensils,
    StaticObject::Armor,
    StaticObject::Cage,
    StaticObject::CageSkeleton,
    StaticObject::Bones1,
    StaticObject::GoldKey,
    StaticObject::SilverKey,
    StaticObject::Bed,
    StaticObject::Basket,
    StaticObject::Food,
    StaticObject::Medkit,
    StaticObject::Ammo,
    StaticObject::MachineGun,
    StaticObject::ChainGun,
    StaticObject::Cross,
    StaticObject::Chalice,
    StaticObject::Chest,
    StaticObject::Crown,
    StaticObject::ExtraLife,
    StaticObject::BonesBlood,
    StaticObject::Barrel,
    StaticObject::WellWater,
    StaticObject::Well,
    StaticObject::PoolOfBlood,
    StaticObject::Flag,
    StaticObject::AardwolfSign,
    StaticObject::Bones2,
    StaticObject::Bones3,
    StaticObject::Bones4,
    StaticObject::BlueUtensils,
    StaticObject::Stove,
    StaticObject::Rack,
    StaticObject::Vines,
];

const fn spear_statics() -> [StaticObject; 52] {
    let mut statics = [StaticObject::Vines; 52];
    let mut i = 0;
    while i < WOLFENSTEIN_STATICS.len() {
        statics[i] = WOLFENSTEIN_STATICS[i];
        i += 1;
    }
    statics[33 - FIRST_STATIC_CODE] = StaticObject::SkullsOnStick;
    statics[38 - FIRST_STATIC_CODE] = StaticObject::CageBloodyBones;
    statics[45 - FIRST_STATIC_CODE] = StaticObject::CageSkulls;
    statics[63 - FIRST_STATIC_CODE] = StaticObject::CeilingLightRed;
    statics[67 - FIRST_STATIC_CODE] = StaticObject::CowSkull;
    statics[68 - FIRST_STATIC_CODE] = StaticObject::WellBlood;
    statics[69 - FIRST_STATIC_CODE] = StaticObject::AngelStatue;
    statics[71 - FIRST_STATIC_CODE] = StaticObject::BrownColumn;
    statics[72 - FIRST_STATIC_CODE] = StaticObject::AmmoBox;
    statics[73 - FIRST_STATIC_CODE] = StaticObject::TruckRear;
    statics[74 - FIRST_STATIC_CODE] = StaticObject::SpearOfDestiny;
    statics
}

const SPEAR_STATICS: [StaticObject; 52] = spear_statics();

const fn wolfenstein_entities() -> [Entity; ENTITY_CODES] {
    let mut entities = with_statics(with_actors(common_entities()), &WOLFENSTEIN_STATICS);
    entities[160] = Entity::Boss(Boss::RobedHitler);
    entities[178] = Entity::Boss(Boss::Hitler);
    entities[179] = Entity::Boss(Boss::Fettgesicht);
    entities[196] = Entity::Boss(Boss::Schabbs);
    entities[197] = Entity::Boss(Boss::Gretel);
    entities[214] = Entity::Boss(Boss::Hans);
    entities[215] = Entity::Boss(Boss::Otto);
    entities[FIRST_GHOST_CODE] = Entity::PacmanGhost(GhostColor::Red);
    entities[FIRST_GHOST_CODE + 1] = Entity::PacmanGhost(GhostColor::Yellow);
    entities[FIRST_GHOST_CODE + 2] = Entity::PacmanGhost(GhostColor::Rose);
    entities[FIRST_GHOST_CODE + 3] = Entity::PacmanGhost(GhostColor::Blue);
    entities
}

const fn spear_entities() -> [Entity; ENTITY_CODES] {
    let mut entities = with_statics(with_actors(common_entities()), &SPEAR_STATICS);
    entities[106] = Entity::Spectre;
    entities[107] = Entity::Boss(Boss::AngelOfDeath);
    entities[125] = Entity::Boss(Boss::TransGrosse);
    entities[142] = Entity::Boss(Boss::UberMutant);
    entities[143] = Entity::Boss(Boss::BarnacleWilhelm);
    entities[161] = Entity::Boss(Boss::DeathKnight);
    entities
}

/// Noah's Ark keeps the Wolfenstein layout. Its level exits and two of its
/// boss slots carry their own meanings.
const fn noahs_ark_entities() -> [Entity; ENTITY_CODES] {
    let mut entities = wolfenstein_entities();
    entities[END_GAME_CODE] = Entity::NextLevel;
    entities[SECRET_LEVEL_CODE] = Entity::SecretLevel;
    entities[197] = Entity::Boss(Boss::ErnieElephant);
    entities[214] = Entity::Boss(Boss::KerryKangaroo);
    entities
}
