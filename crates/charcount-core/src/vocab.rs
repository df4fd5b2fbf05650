//! # Vocabulary
//!
//! Fixed mapping from single-character tokens to embedding indices. The
//! lowercase alphabet takes indices `0..26` in order and the `unk` sentinel
//! takes the last index.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{CharCountError, Result};

/// Token used for characters outside the alphabet.
pub const UNK_TOKEN: &str = "unk";

/// Characters covered by the vocabulary, in index order.
pub const ALPHABET: &str = "abcdefghijklmnopqrstuvwxyz";

/// Character vocabulary for encoding samples.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vocab {
    token_to_idx: HashMap<String, u32>,
    idx_to_token: Vec<String>,
}

impl Vocab {
    /// Build the standard vocabulary: `a`..`z` then `unk`.
    pub fn build() -> Self {
        let idx_to_token: Vec<String> = ALPHABET
            .chars()
            .map(|c| c.to_string())
            .chain(std::iter::once(UNK_TOKEN.to_string()))
            .collect();

        let token_to_idx = idx_to_token
            .iter()
            .enumerate()
            .map(|(i, t)| (t.clone(), i as u32))
            .collect();

        Self {
            token_to_idx,
            idx_to_token,
        }
    }

    pub fn len(&self) -> usize {
        self.idx_to_token.len()
    }

    pub fn is_empty(&self) -> bool {
        self.idx_to_token.is_empty()
    }

    pub fn index_of(&self, token: &str) -> Option<u32> {
        self.token_to_idx.get(token).copied()
    }

    pub fn token(&self, index: u32) -> Option<&str> {
        self.idx_to_token.get(index as usize).map(String::as_str)
    }

    /// All tokens in index order.
    pub fn tokens(&self) -> &[String] {
        &self.idx_to_token
    }

    pub fn unk_index(&self) -> u32 {
        // `from_map` guarantees presence.
        self.token_to_idx[UNK_TOKEN]
    }

    /// Encode tokens, mapping anything unknown to `unk`.
    pub fn encode_lenient<S: AsRef<str>>(&self, tokens: &[S]) -> Vec<u32> {
        let unk = self.unk_index();
        tokens
            .iter()
            .map(|t| self.index_of(t.as_ref()).unwrap_or(unk))
            .collect()
    }

    /// Encode a raw string one character at a time. Unknown characters are
    /// an error rather than `unk`.
    pub fn encode_strict(&self, input: &str) -> Result<Vec<u32>> {
        input
            .chars()
            .map(|c| {
                let token = c.to_string();
                self.index_of(&token)
                    .ok_or_else(|| CharCountError::UnknownToken {
                        token,
                        input: input.to_string(),
                    })
            })
            .collect()
    }

    /// Rebuild a vocabulary from a token → index map.
    ///
    /// Indices must cover `0..len` exactly once and `unk` must be present.
    pub fn from_map(token_to_idx: HashMap<String, u32>) -> Result<Self> {
        if !token_to_idx.contains_key(UNK_TOKEN) {
            return Err(CharCountError::InvalidVocab(format!(
                "missing {UNK_TOKEN:?} entry"
            )));
        }

        let mut idx_to_token = vec![None; token_to_idx.len()];
        for (token, &idx) in &token_to_idx {
            let slot = idx_to_token.get_mut(idx as usize).ok_or_else(|| {
                CharCountError::InvalidVocab(format!(
                    "index {idx} for {token:?} is out of range 0..{}",
                    token_to_idx.len()
                ))
            })?;
            if let Some(existing) = slot.replace(token.clone()) {
                return Err(CharCountError::InvalidVocab(format!(
                    "index {idx} is shared by {existing:?} and {token:?}"
                )));
            }
        }

        // With no duplicates and no out-of-range indices every slot is filled.
        let idx_to_token = idx_to_token.into_iter().flatten().collect();

        Ok(Self {
            token_to_idx,
            idx_to_token,
        })
    }

    /// Write the vocabulary as indented JSON, keys in index order.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

impl Default for Vocab {
    fn default() -> Self {
        Self::build()
    }
}

impl Serialize for Vocab {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (idx, token) in self.idx_to_token.iter().enumerate() {
            map.serialize_entry(token, &idx)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Vocab {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let map = HashMap::<String, u32>::deserialize(deserializer)?;
        Vocab::from_map(map).map_err(serde::de::Error::custom)
    }
}
