//! Sentence-level sentiment scoring
//!
//! Plain page text is split into sentences and each sentence receives a
//! polarity (-1 to +1) and a subjectivity (0 to 1) from a word lexicon.

mod lexicon;
mod scorer;

pub use lexicon::{Lexicon, WordSentiment};
pub use scorer::{SentenceScore, SentimentScorer};
