//! Path hashing used to identify PAK entries.

/// Hash `path` the way the game does when looking up an entry.
///
/// The path is lower-cased and folded character by character into an accumulator that starts at
/// the archive's `seed`: `acc = c ^ acc.rotate_left(5)`. Backslashes are skipped entirely, forward
/// slashes are hashed like any other character. Characters are taken as UTF-16 code units.
pub fn path_hash(seed: u32, path: &str) -> u32 {
    path.to_lowercase()
        .encode_utf16()
        .filter(|&c| c != u16::from(b'\\'))
        .fold(seed, |acc, c| u32::from(c) ^ acc.rotate_left(5))
}
