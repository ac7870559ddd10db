//! Known-path dictionary used to name PAK entries.

use std::{
    collections::{hash_map::Entry, HashMap},
    io::BufRead,
};

use tracing::{debug, instrument};

use crate::{error::Result, hash::path_hash};

/// Maps path hashes back to the paths they were computed from.
///
/// A dictionary is tied to the seed of the archive it was built for. When two different paths
/// hash to the same value the first one inserted is kept.
#[derive(Debug, Clone, Default)]
pub struct PathDictionary {
    seed: u32,
    paths: HashMap<u32, Box<str>>,
}

impl PathDictionary {
    /// Create an empty dictionary for archives using `seed`
    pub fn new(seed: u32) -> Self {
        Self {
            seed,
            paths: HashMap::new(),
        }
    }

    /// Build a dictionary from a list of paths
    pub fn from_paths<I, S>(seed: u32, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut dictionary = Self::new(seed);
        dictionary.extend(paths);
        dictionary
    }

    /// Build a dictionary from newline delimited text, one path per line
    #[instrument(skip(reader), err)]
    pub fn from_reader<R: BufRead>(seed: u32, reader: R) -> Result<Self> {
        let mut dictionary = Self::new(seed);
        for line in reader.lines() {
            dictionary.insert(line?.trim_end_matches('\r'));
        }
        Ok(dictionary)
    }

    /// Hash and register a path, returning whether it was added.
    ///
    /// Empty paths and paths whose hash is already taken are ignored.
    pub fn insert(&mut self, path: &str) -> bool {
        if path.is_empty() {
            return false;
        }

        match self.paths.entry(path_hash(self.seed, path)) {
            Entry::Vacant(slot) => {
                slot.insert(path.into());
                true
            }
            Entry::Occupied(existing) => {
                if existing.get().as_ref() != path {
                    debug!(
                        "hash 0x{:08X} of {} already taken by {}",
                        existing.key(),
                        path,
                        existing.get()
                    );
                }
                false
            }
        }
    }

    /// Register every path in `paths`
    pub fn extend<I, S>(&mut self, paths: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for path in paths {
            self.insert(path.as_ref());
        }
    }

    /// Look up the path for a hash
    pub fn get(&self, hash: u32) -> Option<&str> {
        self.paths.get(&hash).map(|p| p.as_ref())
    }

    /// Seed this dictionary hashes with
    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// Number of distinct hashes known
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Whether no paths are known
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}
