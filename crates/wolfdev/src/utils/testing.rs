//! Encoders and archive builders for tests. Decoding is the only supported
//! direction, so these favour clarity over compression ratio.

use crate::{
    compression::{
        CodecParams, LengthPrefix,
        carmack::{FAR_TAG, NEAR_TAG},
    },
    maps::LEVEL_HEADER_SIZE,
};

fn push_length(out: &mut Vec<u16>, bytes: usize, prefix: LengthPrefix) {
    match prefix {
        LengthPrefix::Word => out.push(u16::try_from(bytes).unwrap()),
        LengthPrefix::DoubleWord => {
            let bytes = u32::try_from(bytes).unwrap();
            out.push((bytes & 0xFFFF) as u16);
            out.push((bytes >> 16) as u16);
        }
    }
}

/// RLEW-encodes `words`, using a run for anything repeated three or more
/// times and for literal occurrences of the tag.
pub(crate) fn rlew_compress(words: &[u16], tag: u16, prefix: LengthPrefix) -> Vec<u16> {
    let mut out = Vec::new();
    push_length(&mut out, words.len() * 2, prefix);
    let mut i = 0;
    while i < words.len() {
        let value = words[i];
        let run = words[i..]
            .iter()
            .take(usize::from(u16::MAX))
            .take_while(|&&w| w == value)
            .count();
        if run >= 3 || value == tag {
            out.extend([tag, u16::try_from(run).unwrap(), value]);
            i += run;
        } else {
            out.push(value);
            i += 1;
        }
    }
    out
}

/// Carmack-encodes `words` using literals only, escaping words that look
/// like tags.
pub(crate) fn carmack_literals(words: &[u16], prefix: LengthPrefix) -> Vec<u8> {
    let mut header = Vec::new();
    push_length(&mut header, words.len() * 2, prefix);
    let mut out: Vec<u8> = header.iter().flat_map(|w| w.to_le_bytes()).collect();
    for &word in words {
        let [low, high] = word.to_le_bytes();
        if high == NEAR_TAG || high == FAR_TAG {
            out.extend([0, high, low]);
        } else {
            out.extend([low, high]);
        }
    }
    out
}

pub(crate) fn compress_plane(plane: &[u16], params: CodecParams) -> Vec<u8> {
    carmack_literals(
        &rlew_compress(plane, params.rlew_tag, params.prefix),
        params.prefix,
    )
}

/// A level to place in a test map file. Empty planes are stored with zero
/// length.
pub(crate) struct TestLevel {
    pub(crate) name: &'static str,
    pub(crate) width: u16,
    pub(crate) height: u16,
    pub(crate) planes: [Vec<u16>; 3],
}

impl TestLevel {
    pub(crate) fn new(name: &'static str, width: u16, height: u16) -> Self {
        let cells = usize::from(width) * usize::from(height);
        TestLevel {
            name,
            width,
            height,
            planes: [vec![1; cells], vec![0; cells], Vec::new()],
        }
    }

    pub(crate) fn with_object(mut self, x: usize, y: usize, code: u16) -> Self {
        self.planes[1][y * usize::from(self.width) + x] = code;
        self
    }
}

/// Encodes `level` as it would appear at byte `base` of a map file: the
/// header followed by its compressed planes.
pub(crate) fn level_record(base: usize, level: &TestLevel, params: CodecParams) -> Vec<u8> {
    let planes: Vec<Vec<u8>> = level
        .planes
        .iter()
        .map(|p| {
            if p.is_empty() {
                Vec::new()
            } else {
                compress_plane(p, params)
            }
        })
        .collect();
    let mut offsets = [0u32; 3];
    let mut next = base + LEVEL_HEADER_SIZE;
    for (offset, plane) in offsets.iter_mut().zip(&planes) {
        if !plane.is_empty() {
            *offset = u32::try_from(next).unwrap();
            next += plane.len();
        }
    }

    let mut out = Vec::new();
    for offset in offsets {
        out.extend(offset.to_le_bytes());
    }
    for plane in &planes {
        out.extend(u16::try_from(plane.len()).unwrap().to_le_bytes());
    }
    out.extend(level.width.to_le_bytes());
    out.extend(level.height.to_le_bytes());
    let mut name = [0u8; 16];
    name[..level.name.len()].copy_from_slice(level.name.as_bytes());
    out.extend(name);
    out.extend(b"!ID!");
    for plane in planes {
        out.extend(plane);
    }
    out
}

/// Builds a `MAPHEAD`/`GAMEMAPS` pair. `None` entries become absent slots.
pub(crate) fn map_files(params: CodecParams, levels: &[Option<TestLevel>]) -> (Vec<u8>, Vec<u8>) {
    let mut head = params.rlew_tag.to_le_bytes().to_vec();
    let mut maps = b"TED5v1.0".to_vec();
    for level in levels {
        match level {
            Some(level) => {
                head.extend(u32::try_from(maps.len()).unwrap().to_le_bytes());
                let record = level_record(maps.len(), level, params);
                maps.extend(record);
            }
            None => head.extend(0u32.to_le_bytes()),
        }
    }
    (head, maps)
}

/// Builds a page file. The digitized sound list is appended as the last
/// sound page.
pub(crate) fn page_file(
    walls: &[Vec<u8>],
    sprites: &[Vec<u8>],
    sounds: &[Vec<u8>],
    digitized: &[(u16, u16)],
) -> Vec<u8> {
    let list: Vec<u8> = digitized
        .iter()
        .flat_map(|&(start, len)| [start.to_le_bytes(), len.to_le_bytes()])
        .flatten()
        .collect();
    let pages: Vec<&[u8]> = walls
        .iter()
        .chain(sprites)
        .chain(sounds)
        .map(Vec::as_slice)
        .chain(std::iter::once(list.as_slice()))
        .collect();
    let count = pages.len();
    let sprite_start = walls.len();
    let sound_start = walls.len() + sprites.len();

    let mut out = Vec::new();
    for value in [count, sprite_start, sound_start] {
        out.extend(u16::try_from(value).unwrap().to_le_bytes());
    }
    let mut next = 6 + count * 6;
    for page in &pages {
        let offset = if page.is_empty() { 0 } else { next };
        out.extend(u32::try_from(offset).unwrap().to_le_bytes());
        next += page.len();
    }
    for page in &pages {
        out.extend(u16::try_from(page.len()).unwrap().to_le_bytes());
    }
    for page in pages {
        out.extend(page);
    }
    out
}
