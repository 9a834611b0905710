//! Word lists backing the sentiment scorer
//!
//! Each sentiment word carries a polarity in `[-1, 1]` and a subjectivity in
//! `[0, 1]`. Intensifiers are adverbs that scale the next sentiment word.

use crate::{ConfigError, ConfigResult};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// Sentiment values for a single word
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct WordSentiment {
    pub polarity: f64,
    pub subjectivity: f64,
}

/// (word, polarity, subjectivity)
const BUILTIN_WORDS: &[(&str, f64, f64)] = &[
    // positive
    ("good", 0.7, 0.6),
    ("great", 0.8, 0.75),
    ("excellent", 1.0, 1.0),
    ("best", 1.0, 0.3),
    ("better", 0.5, 0.5),
    ("nice", 0.6, 1.0),
    ("happy", 0.8, 1.0),
    ("glad", 0.5, 1.0),
    ("love", 0.5, 0.6),
    ("loved", 0.7, 0.8),
    ("lovely", 0.5, 0.75),
    ("like", 0.2, 0.4),
    ("enjoy", 0.4, 0.5),
    ("wonderful", 1.0, 1.0),
    ("amazing", 0.6, 0.9),
    ("awesome", 1.0, 1.0),
    ("fantastic", 0.4, 0.9),
    ("brilliant", 0.9, 1.0),
    ("beautiful", 0.85, 1.0),
    ("perfect", 1.0, 1.0),
    ("pleasant", 0.73, 0.97),
    ("positive", 0.23, 0.55),
    ("helpful", 0.5, 0.6),
    ("useful", 0.3, 0.1),
    ("interesting", 0.5, 0.5),
    ("exciting", 0.3, 0.8),
    ("fun", 0.3, 0.2),
    ("easy", 0.43, 0.83),
    ("fast", 0.2, 0.6),
    ("friendly", 0.38, 0.5),
    ("reliable", 0.4, 0.5),
    ("secure", 0.4, 0.6),
    ("safe", 0.5, 0.5),
    ("clean", 0.37, 0.69),
    ("clear", 0.1, 0.38),
    ("free", 0.4, 0.8),
    ("important", 0.4, 1.0),
    ("successful", 0.75, 0.95),
    ("impressive", 1.0, 1.0),
    ("recommended", 0.3, 0.4),
    ("thanks", 0.2, 0.2),
    ("welcome", 0.8, 0.9),
    ("popular", 0.6, 0.8),
    ("powerful", 0.3, 1.0),
    ("smart", 0.21, 0.64),
    ("strong", 0.43, 0.73),
    ("right", 0.29, 0.54),
    ("fine", 0.42, 0.5),
    ("new", 0.14, 0.45),
    ("real", 0.2, 0.3),
    ("true", 0.35, 0.65),
    // negative
    ("bad", -0.7, 0.67),
    ("terrible", -1.0, 1.0),
    ("awful", -1.0, 1.0),
    ("horrible", -1.0, 1.0),
    ("worst", -1.0, 1.0),
    ("worse", -0.4, 0.6),
    ("poor", -0.4, 0.6),
    ("sad", -0.5, 1.0),
    ("unhappy", -0.6, 0.9),
    ("hate", -0.8, 0.9),
    ("hated", -0.9, 0.9),
    ("angry", -0.5, 1.0),
    ("ugly", -0.7, 1.0),
    ("wrong", -0.5, 0.9),
    ("broken", -0.4, 0.4),
    ("boring", -1.0, 1.0),
    ("disappointing", -0.6, 0.7),
    ("disappointed", -0.75, 0.75),
    ("negative", -0.3, 0.4),
    ("difficult", -0.5, 1.0),
    ("hard", -0.29, 0.54),
    ("dangerous", -0.6, 0.9),
    ("slow", -0.3, 0.39),
    ("annoying", -0.8, 0.9),
    ("useless", -0.5, 0.2),
    ("stupid", -0.8, 1.0),
    ("failed", -0.5, 0.3),
    ("dead", -0.2, 0.4),
    ("sorry", -0.5, 1.0),
    ("unfortunately", -0.5, 1.0),
    ("problem", -0.1, 0.3),
    ("expensive", -0.5, 0.7),
    ("confusing", -0.3, 0.7),
    ("insecure", -0.5, 0.7),
    ("weak", -0.38, 0.62),
    ("fake", -0.5, 1.0),
    ("painful", -0.7, 0.9),
    ("scary", -0.5, 1.0),
    ("dirty", -0.6, 0.8),
    // mostly subjective, neutral polarity
    ("simple", 0.0, 0.36),
    ("large", 0.21, 0.43),
    ("small", -0.25, 0.4),
    ("big", 0.0, 0.1),
    ("little", -0.19, 0.5),
    ("old", 0.1, 0.2),
    ("strange", -0.05, 0.15),
    ("serious", -0.33, 0.67),
];

/// (adverb, multiplier)
const BUILTIN_INTENSIFIERS: &[(&str, f64)] = &[
    ("very", 1.3),
    ("really", 1.3),
    ("extremely", 1.5),
    ("incredibly", 1.5),
    ("highly", 1.3),
    ("truly", 1.2),
    ("so", 1.2),
    ("too", 1.2),
    ("most", 1.3),
    ("quite", 1.1),
    ("fairly", 0.9),
    ("somewhat", 0.7),
    ("slightly", 0.5),
    ("barely", 0.4),
];

/// Lookup tables for sentiment words and intensifiers
#[derive(Debug, Clone, Default)]
pub struct Lexicon {
    words: HashMap<String, WordSentiment>,
    intensifiers: HashMap<String, f64>,
}

/// On-disk overlay format
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct LexiconFile {
    words: HashMap<String, WordSentiment>,
    intensifiers: HashMap<String, f64>,
}

impl Lexicon {
    /// The word list compiled into the binary
    pub fn builtin() -> Self {
        let words = BUILTIN_WORDS
            .iter()
            .map(|&(word, polarity, subjectivity)| {
                (
                    word.to_string(),
                    WordSentiment {
                        polarity,
                        subjectivity,
                    },
                )
            })
            .collect();

        let intensifiers = BUILTIN_INTENSIFIERS
            .iter()
            .map(|&(word, factor)| (word.to_string(), factor))
            .collect();

        Self {
            words,
            intensifiers,
        }
    }

    /// Loads a TOML overlay and merges it over the built-in list
    ///
    /// ```toml
    /// [words]
    /// splendid = { polarity = 0.9, subjectivity = 0.8 }
    ///
    /// [intensifiers]
    /// mega = 1.5
    /// ```
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let mut lexicon = Self::builtin();
        lexicon.merge_toml(&content)?;
        Ok(lexicon)
    }

    /// Parses a TOML overlay and merges it into this lexicon
    pub fn merge_toml(&mut self, content: &str) -> ConfigResult<()> {
        let file: LexiconFile = toml::from_str(content)?;

        for (word, sentiment) in file.words {
            if !(-1.0..=1.0).contains(&sentiment.polarity) {
                return Err(ConfigError::Lexicon(format!(
                    "polarity for '{}' must be in [-1, 1], got {}",
                    word, sentiment.polarity
                )));
            }
            if !(0.0..=1.0).contains(&sentiment.subjectivity) {
                return Err(ConfigError::Lexicon(format!(
                    "subjectivity for '{}' must be in [0, 1], got {}",
                    word, sentiment.subjectivity
                )));
            }
            self.words.insert(word.to_lowercase(), sentiment);
        }

        for (word, factor) in file.intensifiers {
            if !factor.is_finite() || factor <= 0.0 {
                return Err(ConfigError::Lexicon(format!(
                    "intensifier '{}' must be a positive number, got {}",
                    word, factor
                )));
            }
            self.intensifiers.insert(word.to_lowercase(), factor);
        }

        Ok(())
    }

    /// Looks up a lowercase word
    pub fn word(&self, word: &str) -> Option<WordSentiment> {
        self.words.get(word).copied()
    }

    /// Looks up a lowercase intensifier
    pub fn intensifier(&self, word: &str) -> Option<f64> {
        self.intensifiers.get(word).copied()
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}
