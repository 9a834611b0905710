use crate::config::SentimentConfig;
use crate::sentiment::Lexicon;
use crate::ConfigResult;
use serde::{Deserialize, Serialize};
use std::path::Path;
use unicode_segmentation::UnicodeSegmentation;

/// Negation affects a sentiment word at most this many words later
/// ("not a very good" still flips "good").
const NEGATION_WINDOW: usize = 3;

/// Polarity multiplier applied to a negated word
const NEGATION_FACTOR: f64 = -0.5;

/// Sentiment of one sentence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentenceScore {
    /// The sentence with whitespace collapsed
    pub text: String,
    /// -1 (negative) to +1 (positive)
    pub polarity: f64,
    /// 0 (objective) to 1 (subjective)
    pub subjectivity: f64,
}

/// Lexicon-based sentence scorer
///
/// Text is split on Unicode sentence boundaries (UAX #29). Within a sentence
/// each word found in the lexicon contributes one assessment; the sentence
/// score is the mean of its assessments, or 0/0 when none matched.
#[derive(Debug, Clone)]
pub struct SentimentScorer {
    lexicon: Lexicon,
}

impl Default for SentimentScorer {
    fn default() -> Self {
        Self::new(Lexicon::builtin())
    }
}

impl SentimentScorer {
    pub fn new(lexicon: Lexicon) -> Self {
        Self { lexicon }
    }

    /// Builds the scorer once at startup
    ///
    /// A configured lexicon that cannot be read or fails validation is
    /// reported here, before any page is fetched.
    pub fn from_config(config: &SentimentConfig) -> ConfigResult<Self> {
        let lexicon = match &config.lexicon_path {
            Some(path) => {
                let lexicon = Lexicon::load(Path::new(path))?;
                tracing::info!("Loaded lexicon from {} ({} words)", path, lexicon.len());
                lexicon
            }
            None => Lexicon::builtin(),
        };
        Ok(Self::new(lexicon))
    }

    /// Scores every sentence of `text`
    ///
    /// Empty text (or text without any alphanumeric content) yields an empty
    /// vector.
    pub fn score(&self, text: &str) -> Vec<SentenceScore> {
        text.unicode_sentences()
            .filter_map(|sentence| {
                let sentence = collapse_whitespace(sentence);
                if !sentence.chars().any(char::is_alphanumeric) {
                    return None;
                }
                let (polarity, subjectivity) = self.score_sentence(&sentence);
                Some(SentenceScore {
                    text: sentence,
                    polarity,
                    subjectivity,
                })
            })
            .collect()
    }

    /// Returns (polarity, subjectivity) for a single sentence
    pub fn score_sentence(&self, sentence: &str) -> (f64, f64) {
        let mut assessments: Vec<(f64, f64)> = Vec::new();
        let mut negation_distance: Option<usize> = None;
        let mut intensity = 1.0;

        for word in sentence.unicode_words() {
            let word = word.to_lowercase();

            if is_negation(&word) {
                negation_distance = Some(0);
                continue;
            }

            if let Some(factor) = self.lexicon.intensifier(&word) {
                intensity *= factor;
                continue;
            }

            match self.lexicon.word(&word) {
                Some(entry) => {
                    let mut polarity = entry.polarity * intensity;
                    let subjectivity = entry.subjectivity * intensity;
                    if negation_distance.is_some() {
                        polarity *= NEGATION_FACTOR;
                    }
                    assessments.push((polarity.clamp(-1.0, 1.0), subjectivity.clamp(0.0, 1.0)));
                    negation_distance = None;
                    intensity = 1.0;
                }
                None => {
                    intensity = 1.0;
                    negation_distance = negation_distance
                        .map(|d| d + 1)
                        .filter(|&d| d < NEGATION_WINDOW);
                }
            }
        }

        if assessments.is_empty() {
            return (0.0, 0.0);
        }

        let count = assessments.len() as f64;
        let polarity = assessments.iter().map(|(p, _)| p).sum::<f64>() / count;
        let subjectivity = assessments.iter().map(|(_, s)| s).sum::<f64>() / count;
        (polarity.clamp(-1.0, 1.0), subjectivity.clamp(0.0, 1.0))
    }
}

fn is_negation(word: &str) -> bool {
    matches!(
        word,
        "not" | "no" | "never" | "nor" | "neither" | "cannot" | "without" | "hardly"
    ) || word.ends_with("n't")
        || word.ends_with("n\u{2019}t")
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
