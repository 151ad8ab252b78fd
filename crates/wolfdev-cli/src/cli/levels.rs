use anyhow::Context as _;
use clap::{Parser, ValueEnum};
use itertools::Itertools as _;
use wolfdev::{
    LevelSlot, VariantTag,
    classify::{Category, Classifier, PlaneKind},
};

use super::LoadArgs;

#[derive(Clone, Copy, ValueEnum)]
pub(super) enum PlaneArg {
    Geometry,
    Objects,
    Extra,
}

impl From<PlaneArg> for PlaneKind {
    fn from(value: PlaneArg) -> Self {
        match value {
            PlaneArg::Geometry => PlaneKind::Geometry,
            PlaneArg::Objects => PlaneKind::Objects,
            PlaneArg::Extra => PlaneKind::Extra,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub(super) enum GameArg {
    Wl1,
    Wl6,
    Sod,
    Sd2,
    Sd3,
    N3d,
}

impl From<GameArg> for VariantTag {
    fn from(value: GameArg) -> Self {
        match value {
            GameArg::Wl1 => VariantTag::Wl1,
            GameArg::Wl6 => VariantTag::Wl6,
            GameArg::Sod => VariantTag::Sod,
            GameArg::Sd2 => VariantTag::Sd2,
            GameArg::Sd3 => VariantTag::Sd3,
            GameArg::N3d => VariantTag::N3d,
        }
    }
}

fn describe(category: Category) -> String {
    match category {
        Category::Tile(tile) => format!("tile {tile:?}"),
        Category::Wall(wall) => format!("wall {wall:?}"),
        Category::Entity(entity) => format!("entity {entity:?}"),
    }
}

/// Lists every level slot of a data set.
#[derive(Parser)]
pub(super) struct ListLevels {
    #[clap(flatten)]
    load: LoadArgs,
}

impl ListLevels {
    pub(super) fn run(&self) -> anyhow::Result<()> {
        let archive = self.load.load()?;
        for (slot, entry) in archive.slots().iter().enumerate() {
            match entry {
                LevelSlot::Absent => {}
                LevelSlot::Present(level) => {
                    let spawn = if level.has_player_spawn() { "" } else { "  (no spawn)" };
                    println!(
                        "{slot:3}  {:<16}  {:>3}x{:<3}  {}{spawn}",
                        level.name(),
                        level.width(),
                        level.height(),
                        level.description(),
                    );
                }
                LevelSlot::Skipped(err) => println!("{slot:3}  skipped: {err}"),
            }
        }
        Ok(())
    }
}

/// Prints the codes of one plane of a level as a grid.
#[derive(Parser)]
pub(super) struct DumpPlane {
    #[clap(flatten)]
    load: LoadArgs,
    /// The level slot to print.
    #[clap(long)]
    level: usize,
    /// The plane to print.
    #[clap(long, value_enum, default_value = "geometry")]
    plane: PlaneArg,
    /// Print the category of each code instead of the raw grid.
    #[clap(long)]
    categories: bool,
}

impl DumpPlane {
    pub(super) fn run(&self) -> anyhow::Result<()> {
        let archive = self.load.load()?;
        let level = archive
            .level(self.level)
            .with_context(|| format!("No level in slot {}", self.level))?;
        let kind = PlaneKind::from(self.plane);
        let plane = level.plane(kind);
        if plane.is_empty() {
            println!("Plane is empty.");
            return Ok(());
        }
        let width = usize::from(level.width());
        if self.categories {
            let classifier = level.classifier();
            let counts = plane
                .codes()
                .iter()
                .map(|&code| (code, classifier.classify(kind, code)))
                .counts();
            let sorted = counts.into_iter().sorted_by_key(|((code, _), _)| *code);
            for ((code, category), count) in sorted {
                println!("{code:#06x}  {count:5}  {}", describe(category));
            }
        } else {
            for row in &plane.codes().iter().chunks(width) {
                println!("{}", row.map(|code| format!("{code:04x}")).join(" "));
            }
        }
        Ok(())
    }
}

/// Classifies raw plane codes without loading a data set.
#[derive(Parser)]
pub(super) struct Classify {
    /// The game whose code tables to use.
    #[clap(long, value_enum)]
    game: GameArg,
    /// The plane the codes come from.
    #[clap(long, value_enum, default_value = "objects")]
    plane: PlaneArg,
    /// The codes to classify.
    #[clap(required = true)]
    codes: Vec<u16>,
}

impl Classify {
    pub(super) fn run(&self) -> anyhow::Result<()> {
        let classifier = Classifier::new(VariantTag::from(self.game));
        let kind = PlaneKind::from(self.plane);
        for &code in &self.codes {
            println!("{code:5}  {}", describe(classifier.classify(kind, code)));
        }
        Ok(())
    }
}
