//! What plane codes mean.
//!
//! The same code means different things in different games, so lookups go
//! through a [`Classifier`] chosen once per archive from its
//! [`VariantTag`]. Every family's tables are dense arrays built at compile
//! time; a lookup is a bounds check and an index, and every `u16` maps to
//! something, with `Unknown` for codes the game never assigned.

pub mod entity;
mod tables;
pub mod tile;
pub mod wall;

use std::fmt;

pub use entity::{
    Actor, ActorKind, Boss, Direction, Entity, GhostColor, Heading, Skill, StaticObject,
};
pub use tile::{Door, DoorLock, Orientation, Tile};
pub use wall::{Wall, wall_texture_page};

use crate::variant::{Family, VariantTag};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlaneKind {
    /// Walls, doors and floor areas.
    Geometry,
    /// Spawns, decorations, pickups and actors.
    Objects,
    /// Unused by the retail games.
    Extra,
}

impl PlaneKind {
    pub const ALL: [PlaneKind; 3] = [PlaneKind::Geometry, PlaneKind::Objects, PlaneKind::Extra];

    #[must_use]
    pub fn index(self) -> usize {
        match self {
            PlaneKind::Geometry => 0,
            PlaneKind::Objects => 1,
            PlaneKind::Extra => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Tile(Tile),
    Wall(Wall),
    Entity(Entity),
}

#[derive(Clone, Copy)]
pub struct Classifier {
    family: Family,
    tables: &'static tables::Tables,
}

impl fmt::Debug for Classifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Classifier")
            .field("family", &self.family)
            .finish_non_exhaustive()
    }
}

impl Classifier {
    #[must_use]
    pub fn new(variant: VariantTag) -> Self {
        Self::for_family(variant.family())
    }

    #[must_use]
    pub fn for_family(family: Family) -> Self {
        let tables = match family {
            Family::Wolfenstein => &tables::WOLFENSTEIN,
            Family::Spear => &tables::SPEAR,
            Family::NoahsArk => &tables::NOAHS_ARK,
        };
        Classifier { family, tables }
    }

    #[must_use]
    pub fn family(self) -> Family {
        self.family
    }

    #[must_use]
    pub fn tile(self, code: u16) -> Tile {
        self.tables
            .tiles
            .get(usize::from(code))
            .copied()
            .unwrap_or(Tile::Unknown)
    }

    #[must_use]
    pub fn wall(self, code: u16) -> Wall {
        self.tables
            .walls
            .get(usize::from(code))
            .copied()
            .unwrap_or(Wall::Unknown)
    }

    #[must_use]
    pub fn entity(self, code: u16) -> Entity {
        self.tables
            .entities
            .get(usize::from(code))
            .copied()
            .unwrap_or(Entity::Unknown)
    }

    /// Classifies a code from the given plane. Solid walls on the geometry
    /// plane are reported by texture.
    #[must_use]
    pub fn classify(self, plane: PlaneKind, code: u16) -> Category {
        match plane {
            PlaneKind::Geometry => match self.tile(code) {
                Tile::Wall => Category::Wall(self.wall(code)),
                tile => Category::Tile(tile),
            },
            PlaneKind::Objects => Category::Entity(self.entity(code)),
            PlaneKind::Extra if code == 0 => Category::Tile(Tile::Background),
            PlaneKind::Extra => Category::Tile(Tile::Unknown),
        }
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    const FAMILIES: [Family; 3] = [Family::Wolfenstein, Family::Spear, Family::NoahsArk];

    #[test]
    fn zero_is_background_everywhere() {
        for family in FAMILIES {
            let classifier = Classifier::for_family(family);
            assert_eq!(classifier.tile(0), Tile::Background);
            assert_eq!(classifier.entity(0), Entity::None);
            assert_eq!(
                classifier.classify(PlaneKind::Geometry, 0),
                Category::Tile(Tile::Background)
            );
        }
    }

    #[test]
    fn door_orientation_follows_parity() {
        let classifier = Classifier::for_family(Family::Wolfenstein);
        for code in 90..=101u16 {
            let Tile::Door(door) = classifier.tile(code) else {
                panic!("code {code} is not a door");
            };
            let expected = if code % 2 == 0 {
                Orientation::Vertical
            } else {
                Orientation::Horizontal
            };
            assert_eq!(door.orientation, expected, "code {code}");
        }
        assert_eq!(
            classifier.tile(93),
            Tile::Door(Door {
                lock: DoorLock::GoldKey,
                orientation: Orientation::Horizontal
            })
        );
        assert!(matches!(
            classifier.tile(100),
            Tile::Door(Door {
                lock: DoorLock::Elevator,
                ..
            })
        ));
    }

    #[test]
    fn areas_and_exits() {
        let classifier = Classifier::for_family(Family::Spear);
        assert_eq!(classifier.tile(106), Tile::Area(None));
        assert_eq!(classifier.tile(107), Tile::SecretExit);
        assert_eq!(classifier.tile(108), Tile::Area(Some(0)));
        assert_eq!(classifier.tile(143), Tile::Area(Some(35)));
        assert_eq!(classifier.tile(144), Tile::Unknown);
    }

    #[test]
    fn walls_are_named_per_family() {
        let wolf = Classifier::for_family(Family::Wolfenstein);
        let spear = Classifier::for_family(Family::Spear);
        assert_eq!(wolf.classify(PlaneKind::Geometry, 1), Category::Wall(Wall::GreyBrick1));
        assert_eq!(wolf.wall(49), Wall::GreyWallHitler);
        assert_eq!(wolf.wall(50), Wall::Unknown);
        assert_eq!(spear.wall(50), Wall::StoneWall1);
        assert_eq!(spear.wall(63), Wall::PurpleBrick);
        assert_eq!(spear.classify(PlaneKind::Geometry, 70), Category::Wall(Wall::Unknown));
    }

    #[test]
    fn actor_codes_decompose() {
        let classifier = Classifier::for_family(Family::Wolfenstein);
        assert_eq!(
            classifier.entity(108),
            Entity::Actor(Actor {
                kind: ActorKind::Guard,
                facing: Direction::East,
                moving: false,
                skill: Skill::Easy
            })
        );
        assert_eq!(
            classifier.entity(187),
            Entity::Actor(Actor {
                kind: ActorKind::Guard,
                facing: Direction::South,
                moving: true,
                skill: Skill::Hard
            })
        );
        assert_eq!(
            classifier.entity(153),
            Entity::Actor(Actor {
                kind: ActorKind::Officer,
                facing: Direction::North,
                moving: false,
                skill: Skill::Medium
            })
        );
        // Dogs never stand still.
        for code in [134u16, 170, 206, 138] {
            assert!(matches!(
                classifier.entity(code),
                Entity::Actor(Actor {
                    kind: ActorKind::Dog,
                    moving: true,
                    ..
                })
            ));
        }
        assert!(matches!(
            classifier.entity(259),
            Entity::Actor(Actor {
                kind: ActorKind::Mutant,
                skill: Skill::Hard,
                ..
            })
        ));
    }

    #[test]
    fn spawns_and_turn_points() {
        let classifier = Classifier::for_family(Family::NoahsArk);
        assert_eq!(classifier.entity(19), Entity::PlayerSpawn(Direction::North));
        assert_eq!(classifier.entity(22), Entity::PlayerSpawn(Direction::West));
        assert_eq!(classifier.entity(91), Entity::TurnPoint(Heading::NorthEast));
        assert_eq!(classifier.entity(98), Entity::Pushwall);
    }

    #[test]
    fn noahs_ark_shares_the_wolfenstein_layout() {
        let ark = Classifier::for_family(Family::NoahsArk);
        assert_eq!(
            ark.entity(108),
            Entity::Actor(Actor {
                kind: ActorKind::Guard,
                facing: Direction::East,
                moving: false,
                skill: Skill::Easy
            })
        );
        assert_eq!(
            ark.entity(221),
            Entity::Actor(Actor {
                kind: ActorKind::Mutant,
                facing: Direction::North,
                moving: true,
                skill: Skill::Easy
            })
        );
        assert_eq!(ark.entity(43), Entity::Static(StaticObject::GoldKey));
        assert_eq!(ark.entity(124), Entity::DeadGuard);
        assert_eq!(ark.wall(1), Wall::GreyBrick1);
        assert_eq!(ark.wall(63), Wall::PurpleBrick);
    }

    #[test]
    fn noahs_ark_exits_and_bosses() {
        let ark = Classifier::for_family(Family::NoahsArk);
        assert_eq!(ark.entity(99), Entity::NextLevel);
        assert_eq!(ark.entity(100), Entity::SecretLevel);
        assert_eq!(ark.entity(214), Entity::Boss(Boss::KerryKangaroo));
        assert_eq!(ark.entity(197), Entity::Boss(Boss::ErnieElephant));
        assert!(ark.entity(214).is_enemy());
        assert_eq!(ark.entity(178), Entity::Boss(Boss::Hitler));
        let wolf = Classifier::for_family(Family::Wolfenstein);
        assert_eq!(wolf.entity(99), Entity::EndGame);
        assert_eq!(wolf.entity(100), Entity::Unknown);
    }

    #[test]
    fn spear_substitutes_statics_and_bosses() {
        let wolf = Classifier::for_family(Family::Wolfenstein);
        let spear = Classifier::for_family(Family::Spear);
        assert_eq!(wolf.entity(33), Entity::Static(StaticObject::Sink));
        assert_eq!(spear.entity(33), Entity::Static(StaticObject::SkullsOnStick));
        assert_eq!(wolf.entity(74), Entity::Unknown);
        assert_eq!(spear.entity(74), Entity::Static(StaticObject::SpearOfDestiny));
        assert_eq!(wolf.entity(214), Entity::Boss(Boss::Hans));
        assert_eq!(spear.entity(214), Entity::Unknown);
        assert_eq!(spear.entity(107), Entity::Boss(Boss::AngelOfDeath));
        assert_eq!(wolf.entity(225), Entity::PacmanGhost(GhostColor::Yellow));
        assert_eq!(wolf.entity(43), Entity::Static(StaticObject::GoldKey));
        assert!(matches!(wolf.entity(48), Entity::Static(s) if s.is_pickup()));
    }

    proptest! {
        #[test]
        fn classification_is_total_and_deterministic(code in any::<u16>(), family in 0usize..3, plane in 0usize..3) {
            let classifier = Classifier::for_family(FAMILIES[family]);
            let plane = PlaneKind::ALL[plane];
            let first = classifier.classify(plane, code);
            prop_assert_eq!(first, classifier.classify(plane, code));
            if code > 259 {
                prop_assert_eq!(classifier.entity(code), Entity::Unknown);
            }
        }
    }
}
