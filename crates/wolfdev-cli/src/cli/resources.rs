use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;
use itertools::Itertools as _;
use wolfdev::vswap::{TEXTURE_SIZE, TRANSPARENT};

use super::LoadArgs;

/// Lists the pages of the page file.
#[derive(Parser)]
pub(super) struct ListPages {
    #[clap(flatten)]
    load: LoadArgs,
}

impl ListPages {
    pub(super) fn run(&self) -> anyhow::Result<()> {
        let archive = self.load.load()?;
        let resources = archive.resources();
        let header = resources.header();
        for (index, chunk) in resources.chunk_table().iter().enumerate() {
            let group = if index < header.sprite_start() {
                "wall"
            } else if index < header.sound_start() {
                "sprite"
            } else {
                "sound"
            };
            let len = resources.chunk(index).map_or(0, |data| data.len());
            println!(
                "{index:4}  {group:<6}  {:#010x}  {len:6}",
                chunk.offset()
            );
        }
        let [walls, sprites, sounds] = resources.group_spans();
        println!("Spans: {walls} wall bytes, {sprites} sprite bytes, {sounds} sound bytes");
        for (number, sound) in resources.digitized_sounds().iter().enumerate() {
            println!(
                "Digitized {number:3}: page {:4}, {} samples",
                sound.start_page(),
                sound.data().len()
            );
        }
        Ok(())
    }
}

/// Decodes one sprite and prints it, or writes its pixels to a file.
#[derive(Parser)]
pub(super) struct ExtractSprite {
    #[clap(flatten)]
    load: LoadArgs,
    /// Index of the sprite, counted from the first sprite page.
    #[clap(long)]
    index: usize,
    /// Write the 64x64 column-major palette indices here.
    #[clap(short = 'o', long)]
    output: Option<PathBuf>,
}

impl ExtractSprite {
    pub(super) fn run(&self) -> anyhow::Result<()> {
        let archive = self.load.load()?;
        let sprite = archive
            .resources()
            .sprite(self.index)
            .with_context(|| format!("No sprite {}", self.index))?;
        let info = sprite.info()?;
        println!(
            "Columns {}..={}, rows {}..{}",
            info.left, info.right, info.top, info.bottom
        );
        let pixels = sprite.decode()?;
        if let Some(output) = &self.output {
            std::fs::write(output, &pixels)
                .with_context(|| format!("Failed to write {}", output.display()))?;
            return Ok(());
        }
        for y in 0..TEXTURE_SIZE {
            let row = (0..TEXTURE_SIZE)
                .map(|x| {
                    if pixels[x * TEXTURE_SIZE + y] == TRANSPARENT {
                        '.'
                    } else {
                        '#'
                    }
                })
                .join("");
            println!("{row}");
        }
        Ok(())
    }
}

/// Lists the chunks of the audio archive.
#[derive(Parser)]
pub(super) struct ListAudio {
    #[clap(flatten)]
    load: LoadArgs,
}

impl ListAudio {
    pub(super) fn run(&self) -> anyhow::Result<()> {
        let archive = self.load.load()?;
        let audio = archive
            .audio()
            .context("The data set has no usable audio archive")?;
        println!("Sample rate: {} Hz", audio.sample_rate());
        for chunk in audio.chunks() {
            println!(
                "{:4}  {:<10}  {:3}  {:<10}  {:6}",
                chunk.index(),
                format!("{:?}", chunk.category()),
                chunk.number(),
                chunk.name(),
                chunk.data().len()
            );
        }
        Ok(())
    }
}
