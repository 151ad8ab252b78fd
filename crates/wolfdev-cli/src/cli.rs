use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use wolfdev::{Archive, LoadOptions, compression::LengthPrefix};

mod levels;
mod resources;

/// Options for locating and loading a data set.
#[derive(clap::Args)]
struct LoadArgs {
    /// Path to the data directory, or any data file in it.
    #[clap(index = 1)]
    path: PathBuf,
    /// Spear of Destiny mission to load (1, 2 or 3).
    #[clap(long, default_value_t = 1, value_parser = clap::value_parser!(u8).range(1..=3))]
    mission: u8,
    /// Load data files even when the game cannot be identified.
    #[clap(long)]
    allow_unrecognized: bool,
    /// Do not load the audio archive.
    #[clap(long)]
    no_audio: bool,
    /// Plane streams use 32-bit length prefixes.
    #[clap(long)]
    wide_lengths: bool,
}

impl LoadArgs {
    fn options(&self) -> LoadOptions {
        LoadOptions {
            spear_mission: self.mission,
            allow_unrecognized: self.allow_unrecognized,
            load_audio: !self.no_audio,
            length_prefix: if self.wide_lengths {
                LengthPrefix::DoubleWord
            } else {
                LengthPrefix::Word
            },
        }
    }

    fn load(&self) -> anyhow::Result<Archive> {
        let options = self.options();
        log::debug!("Loading {} with {options:?}", self.path.display());
        Archive::load(&self.path, &options)
            .with_context(|| format!("Failed to load {}", self.path.display()))
    }
}

/// Summarizes a data set.
#[derive(Parser)]
struct Info {
    #[clap(flatten)]
    load: LoadArgs,
}

impl Info {
    fn run(&self) -> anyhow::Result<()> {
        let archive = self.load.load()?;
        println!("Game:          {}", archive.description());
        println!("RLEW tag:      {:#06x}", archive.rlew_tag());
        println!(
            "Levels:        {} of {} slots",
            archive.level_count(),
            archive.slots().len()
        );
        for (slot, err) in archive.skipped() {
            println!("  skipped {slot}: {err}");
        }
        let resources = archive.resources();
        println!(
            "Pages:         {} walls, {} sprites, {} sound pages",
            resources.wall_count(),
            resources.sprite_count(),
            resources.sound_page_count()
        );
        println!(
            "Digitized:     {} sounds at {} Hz",
            resources.digitized_sounds().len(),
            archive.sample_rate()
        );
        match archive.audio() {
            Some(audio) => println!("Audio chunks:  {}", audio.len()),
            None => println!("Audio chunks:  not loaded"),
        }
        Ok(())
    }
}

#[derive(Subcommand)]
enum Cmd {
    #[clap(name = "info")]
    Info(Info),
    #[clap(name = "levels")]
    Levels(levels::ListLevels),
    #[clap(name = "plane")]
    Plane(levels::DumpPlane),
    #[clap(name = "classify")]
    Classify(levels::Classify),
    #[clap(name = "pages")]
    Pages(resources::ListPages),
    #[clap(name = "sprite")]
    Sprite(resources::ExtractSprite),
    #[clap(name = "audio")]
    Audio(resources::ListAudio),
}

#[derive(Parser)]
#[clap(version, about)]
pub(crate) struct Cli {
    /// Log more detail. Repeat for more.
    #[clap(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    #[clap(subcommand)]
    command: Cmd,
}

impl Cli {
    fn init_logging(&self) {
        let level = match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        };
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
    }

    pub(crate) fn run(&self) -> anyhow::Result<()> {
        self.init_logging();
        match &self.command {
            Cmd::Info(info) => info.run()?,
            Cmd::Levels(levels) => levels.run()?,
            Cmd::Plane(plane) => plane.run()?,
            Cmd::Classify(classify) => classify.run()?,
            Cmd::Pages(pages) => pages.run()?,
            Cmd::Sprite(sprite) => sprite.run()?,
            Cmd::Audio(audio) => audio.run()?,
        }
        Ok(())
    }
}
