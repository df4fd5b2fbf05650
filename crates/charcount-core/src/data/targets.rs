//! The set of characters whose presence determines a sample's label.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CharCountError, Result};
use crate::vocab::Vocab;

/// Distinct target characters. The label of a sequence is the number of
/// these that occur in it at least once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetSet {
    chars: BTreeSet<char>,
}

impl TargetSet {
    pub fn new<I: IntoIterator<Item = char>>(chars: I) -> Self {
        Self {
            chars: chars.into_iter().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Labels run `0..=len`, so there is one more class than targets.
    pub fn num_classes(&self) -> usize {
        self.chars.len() + 1
    }

    /// Check that every label `0..=len` can actually be drawn: each target
    /// must be a vocabulary token and a sequence must be long enough to hold
    /// all of them.
    pub fn validate(&self, vocab: &Vocab, sequence_length: usize) -> Result<()> {
        if let Some(missing) = self
            .chars
            .iter()
            .find(|c| vocab.index_of(&c.to_string()).is_none())
        {
            return Err(CharCountError::InvalidConfig(format!(
                "target {missing:?} is not in the vocabulary"
            )));
        }
        if self.chars.len() > sequence_length {
            return Err(CharCountError::InvalidConfig(format!(
                "{} targets cannot all fit in a sequence of length {}",
                self.chars.len(),
                sequence_length
            )));
        }
        Ok(())
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Count distinct targets among `tokens`. Repeats do not count twice and
    /// multi-character tokens such as `unk` never match.
    pub fn label_of_tokens<S: AsRef<str>>(&self, tokens: &[S]) -> u32 {
        self.chars
            .iter()
            .filter(|&&c| {
                tokens.iter().any(|t| {
                    let mut it = t.as_ref().chars();
                    it.next() == Some(c) && it.next().is_none()
                })
            })
            .count() as u32
    }

    /// Count distinct targets among the characters of `text`.
    pub fn label_of(&self, text: &str) -> u32 {
        let present: BTreeSet<char> = text.chars().collect();
        self.chars.intersection(&present).count() as u32
    }
}

impl Default for TargetSet {
    fn default() -> Self {
        Self::new(['a', 'b', 'c'])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_labels() {
        let targets = TargetSet::default();
        assert_eq!(targets.label_of("favfee"), 1);
        assert_eq!(targets.label_of("wbsdfg"), 1);
        assert_eq!(targets.label_of("rqwdbc"), 2);
        assert_eq!(targets.label_of("nakbca"), 3);
        assert_eq!(targets.label_of("xyzxyz"), 0);
    }

    #[test]
    fn test_duplicates_do_not_inflate() {
        let targets = TargetSet::default();
        assert_eq!(targets.label_of("aaaaaa"), 1);
        assert_eq!(targets.label_of_tokens(&["b", "b", "b", "c", "c", "x"]), 2);
    }

    #[test]
    fn test_unk_token_is_not_a_target() {
        let targets = TargetSet::new(['u']);
        assert_eq!(targets.label_of_tokens(&["unk", "x"]), 0);
        assert_eq!(targets.label_of_tokens(&["unk", "u"]), 1);
    }

    #[test]
    fn test_validate_rejects_target_outside_vocab() {
        let vocab = Vocab::build();
        assert!(TargetSet::default().validate(&vocab, 6).is_ok());

        let err = TargetSet::new(['A']).validate(&vocab, 6).unwrap_err();
        assert!(matches!(err, CharCountError::InvalidConfig(ref m) if m.contains("'A'")));
    }

    #[test]
    fn test_validate_rejects_more_targets_than_positions() {
        let vocab = Vocab::build();
        assert!(TargetSet::new("abcdef".chars()).validate(&vocab, 6).is_ok());
        assert!(matches!(
            TargetSet::new("abcdefgh".chars()).validate(&vocab, 6),
            Err(CharCountError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("targets.json");

        let targets = TargetSet::new(['x', 'y', 'z']);
        targets.save(&path).unwrap();
        assert_eq!(TargetSet::load(&path).unwrap(), targets);
    }

    #[test]
    fn test_num_classes() {
        assert_eq!(TargetSet::default().num_classes(), 4);
        assert_eq!(TargetSet::new(['a', 'a']).len(), 1);
    }
}
