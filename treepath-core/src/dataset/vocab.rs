//! Token vocabulary
//!
//!     Bidirectional string <-> integer table, persisted as the file pair
//!     `string2integer.json` / `integer2string.json`. Lookups fail loudly
//!     in both directions; the vocabulary is built once over the full
//!     corpus and must cover every token the samples produce.

use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;

use crate::error::{VocabularyError, VocabularyResult};
use crate::kind::{DOWN_ARROW, UP_ARROW};

pub const STRING_TO_INTEGER_FILE: &str = "string2integer.json";
pub const INTEGER_TO_STRING_FILE: &str = "integer2string.json";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Vocabulary {
    string_to_id: BTreeMap<String, i64>,
    id_to_string: BTreeMap<i64, String>,
}

impl Vocabulary {
    /// Builds a vocabulary over the given tokens, ids assigned in first
    /// encounter order. The direction markers are always included.
    pub fn from_tokens<'a>(tokens: impl IntoIterator<Item = &'a str>) -> Vocabulary {
        let mut vocab = Vocabulary::default();
        vocab.insert(DOWN_ARROW);
        vocab.insert(UP_ARROW);
        for token in tokens {
            vocab.insert(token);
        }
        vocab
    }

    fn insert(&mut self, token: &str) {
        if self.string_to_id.contains_key(token) {
            return;
        }
        let id = self.string_to_id.len() as i64;
        self.string_to_id.insert(token.to_string(), id);
        self.id_to_string.insert(id, token.to_string());
    }

    pub fn len(&self) -> usize {
        self.string_to_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.string_to_id.is_empty()
    }

    pub fn id(&self, token: &str) -> VocabularyResult<i64> {
        self.string_to_id
            .get(token)
            .copied()
            .ok_or_else(|| VocabularyError::MissingToken(token.to_string()))
    }

    pub fn token(&self, id: i64) -> VocabularyResult<String> {
        self.id_to_string
            .get(&id)
            .cloned()
            .ok_or(VocabularyError::UnknownId(id))
    }

    /// Writes the `string2integer.json` / `integer2string.json` pair.
    pub fn save(&self, dir: &Path) -> io::Result<()> {
        let forward: Map<String, Value> = self
            .string_to_id
            .iter()
            .map(|(token, &id)| (token.clone(), Value::from(id)))
            .collect();
        let backward: Map<String, Value> = self
            .id_to_string
            .iter()
            .map(|(&id, token)| (id.to_string(), Value::from(token.as_str())))
            .collect();

        fs::write(
            dir.join(STRING_TO_INTEGER_FILE),
            serde_json::to_string_pretty(&Value::Object(forward))?,
        )?;
        fs::write(
            dir.join(INTEGER_TO_STRING_FILE),
            serde_json::to_string_pretty(&Value::Object(backward))?,
        )
    }

    /// Loads the pair written by [`save`](Self::save). Only the forward
    /// file is authoritative; the backward map is rebuilt from it.
    pub fn load(dir: &Path) -> io::Result<Vocabulary> {
        let text = fs::read_to_string(dir.join(STRING_TO_INTEGER_FILE))?;
        let forward: BTreeMap<String, i64> = serde_json::from_str(&text)?;

        let mut vocab = Vocabulary::default();
        for (token, id) in forward {
            vocab.id_to_string.insert(id, token.clone());
            vocab.string_to_id.insert(token, id);
        }
        Ok(vocab)
    }
}
