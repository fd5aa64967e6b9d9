use std::io::Read;

use log::info;
use serde::Deserialize;
use serde_yaml::Mapping;
use smallvec::SmallVec;
use smartstring::alias::String;

use super::{Fact, FactStore};
use crate::Result;

/// Top level of a fact document.
#[derive(Debug, Deserialize)]
struct Document {
    /// Prompt -> [`Entry`], in document order.
    facts: Mapping,
}

#[derive(Debug, Deserialize)]
struct Entry {
    response: String,
    #[serde(default)]
    related: SmallVec<[String; 2]>,
    #[serde(default)]
    mnemonic: String,
}

impl FactStore {
    /// Parses a YAML fact document.
    ///
    /// ```yaml
    /// facts:
    ///   dog:
    ///     response: 犬
    ///     related: [cat]
    ///     mnemonic: a dog in a big house
    /// ```
    pub fn from_yaml_str(s: &str) -> Result<Self> {
        Self::from_document(serde_yaml::from_str(s)?)
    }

    /// Parses a YAML fact document read from `reader`.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Self::from_document(serde_yaml::from_reader(reader)?)
    }

    fn from_document(document: Document) -> Result<Self> {
        let facts = document
            .facts
            .into_iter()
            .map(|(prompt, entry)| -> Result<Fact> {
                let prompt: String = serde_yaml::from_value(prompt)?;
                let entry: Entry = serde_yaml::from_value(entry)?;
                Ok(Fact {
                    prompt,
                    response: entry.response,
                    related: entry.related,
                    mnemonic: entry.mnemonic,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let store = Self::from_facts(facts)?;
        info!("loaded {} facts", store.len());
        Ok(store)
    }
}
