#![no_main]

use libfuzzer_sys::fuzz_target;
use wolfdev::{Archive, LoadOptions};

fn body(root_dir: &std::path::Path) -> anyhow::Result<()> {
    let archive = Archive::load(root_dir, &LoadOptions::default())?;
    for level in archive.levels() {
        let _ = level.description();
    }
    for index in 0..archive.resources().sprite_count() {
        if let Some(sprite) = archive.resources().sprite(index) {
            let _ = sprite.decode();
        }
    }
    Ok(())
}

fn split_sized(data: &[u8]) -> Option<(&[u8], &[u8])> {
    let (size, rest) = data.split_first_chunk::<4>()?;
    let size = u32::from_le_bytes(*size) as usize;
    (size <= rest.len()).then(|| rest.split_at(size))
}

fuzz_target!(|data: &[u8]| {
    let Some((map_head, rest)) = split_sized(data) else {
        return;
    };
    let Some((game_maps, vswap)) = split_sized(rest) else {
        return;
    };
    let tempdir = tempfile::tempdir().unwrap();

    std::fs::write(tempdir.path().join("MAPHEAD.WL6"), map_head).unwrap();
    std::fs::write(tempdir.path().join("GAMEMAPS.WL6"), game_maps).unwrap();
    std::fs::write(tempdir.path().join("VSWAP.WL6"), vswap).unwrap();

    let _ = body(tempdir.path());
});
