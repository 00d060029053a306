//! Sources of words used to obfuscate the names of a generated domain.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WordSourceError {
    #[error("no more words available")]
    Exhausted,
    #[error("the word list is empty")]
    EmptyList,
    #[error("could not read word list {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Provides a new word on each call. Words are not guaranteed to be distinct.
pub trait WordSource {
    fn next_word(&mut self) -> Result<String, WordSourceError>;
}

impl<W: WordSource + ?Sized> WordSource for &mut W {
    fn next_word(&mut self) -> Result<String, WordSourceError> {
        (**self).next_word()
    }
}

/// Draws words uniformly from a list.
///
/// The random generator is independent from the one used for generating instances: unless a seed
/// is given, it is seeded from the OS and the drawn words differ from one run to the other.
pub struct RandomWords {
    words: Vec<String>,
    rng: SmallRng,
}

impl RandomWords {
    /// Draws from a built-in list of common English words.
    pub fn new(seed: Option<u64>) -> Self {
        RandomWords {
            words: BUILTIN_WORDS.iter().map(|w| w.to_string()).collect(),
            rng: seeded_rng(seed),
        }
    }

    /// Draws from the given words. Fails if the list is empty.
    pub fn from_words(words: Vec<String>, seed: Option<u64>) -> Result<Self, WordSourceError> {
        if words.is_empty() {
            return Err(WordSourceError::EmptyList);
        }
        Ok(RandomWords {
            words,
            rng: seeded_rng(seed),
        })
    }

    /// Reads a word list with one word per line. Blank lines are ignored.
    pub fn from_file(path: &Path, seed: Option<u64>) -> Result<Self, WordSourceError> {
        let content = std::fs::read_to_string(path).map_err(|source| WordSourceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let words = content
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(String::from)
            .collect();
        Self::from_words(words, seed)
    }
}

fn seeded_rng(seed: Option<u64>) -> SmallRng {
    match seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_os_rng(),
    }
}

impl WordSource for RandomWords {
    fn next_word(&mut self) -> Result<String, WordSourceError> {
        let i = self.rng.random_range(0..self.words.len());
        Ok(self.words[i].clone())
    }
}

/// Returns the given words in order, then fails.
#[derive(Clone, Debug, Default)]
pub struct FixedWords {
    words: VecDeque<String>,
}

impl FixedWords {
    pub fn new<S: Into<String>>(words: impl IntoIterator<Item = S>) -> Self {
        FixedWords {
            words: words.into_iter().map(Into::into).collect(),
        }
    }
}

impl WordSource for FixedWords {
    fn next_word(&mut self) -> Result<String, WordSourceError> {
        self.words.pop_front().ok_or(WordSourceError::Exhausted)
    }
}

const BUILTIN_WORDS: &[&str] = &[
    "anchor", "apple", "arch", "arrow", "autumn", "badge", "bakery", "balcony", "bamboo", "banner", "barrel",
    "basket", "beacon", "blanket", "bottle", "bracket", "breeze", "bridge", "bucket", "cabin", "cactus", "candle",
    "canyon", "carpet", "castle", "cellar", "chimney", "cinder", "clover", "cobalt", "comet", "copper", "cotton",
    "crater", "crystal", "dagger", "desert", "dolphin", "drawer", "ember", "engine", "falcon", "feather", "fern",
    "fiddle", "flannel", "forest", "fossil", "garden", "garlic", "glacier", "goblet", "granite", "gravel", "harbor",
    "harvest", "hazel", "helmet", "hollow", "island", "ivory", "jacket", "jasmine", "kettle", "ladder", "lantern",
    "lemon", "lilac", "lobster", "magnet", "maple", "marble", "meadow", "mirror", "mosaic", "nectar", "needle",
    "nutmeg", "oasis", "orchard", "oyster", "paddle", "parcel", "pebble", "pepper", "pillow", "pocket", "puzzle",
    "quarry", "quilt", "rabbit", "raven", "ribbon", "saddle", "satchel", "shovel", "silver", "spindle", "spruce",
    "squirrel", "summit", "tablet", "teapot", "thimble", "thistle", "timber", "tunnel", "velvet", "violin",
    "walnut", "willow", "window", "winter", "wizard", "yarrow", "zephyr",
];
