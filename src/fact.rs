use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use smartstring::alias::String;

use crate::{Error, Result};

mod loading;

/// A single prompt/response study item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fact {
    pub prompt: String,
    pub response: String,
    #[serde(default)]
    pub related: SmallVec<[String; 2]>,
    /// Memory aid shown after a wrong answer.
    #[serde(default)]
    pub mnemonic: String,
}

impl Fact {
    pub fn new(prompt: impl Into<String>, response: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            response: response.into(),
            related: SmallVec::new(),
            mnemonic: String::new(),
        }
    }

    pub fn with_mnemonic(mut self, mnemonic: impl Into<String>) -> Self {
        self.mnemonic = mnemonic.into();
        self
    }

    pub fn with_related<'a>(mut self, related: impl IntoIterator<Item = &'a str>) -> Self {
        self.related = related.into_iter().map(String::from).collect();
        self
    }
}

/// All facts of a quiz, keyed by prompt.
///
/// Keeps facts in the order they were given in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FactStore {
    facts: Vec<Fact>,
    index: HashMap<String, usize>,
}

impl FactStore {
    /// Fails with [`Error::DuplicatePrompt`] if two facts share a prompt.
    pub fn from_facts(facts: impl IntoIterator<Item = Fact>) -> Result<Self> {
        let mut store = Self::default();
        for fact in facts {
            if store.index.contains_key(&fact.prompt) {
                return Err(Error::DuplicatePrompt(fact.prompt.to_string()));
            }
            store.index.insert(fact.prompt.clone(), store.facts.len());
            store.facts.push(fact);
        }
        Ok(store)
    }

    pub fn get(&self, prompt: &str) -> Option<&Fact> {
        self.index.get(prompt).map(|&i| &self.facts[i])
    }

    pub fn contains(&self, prompt: &str) -> bool {
        self.index.contains_key(prompt)
    }

    pub fn prompts(&self) -> impl Iterator<Item = &str> {
        self.facts.iter().map(|fact| fact.prompt.as_str())
    }

    /// Every distinct response, in fact order. This is the pool distractors
    /// are drawn from.
    pub fn responses(&self) -> Vec<String> {
        let mut responses: Vec<String> = Vec::with_capacity(self.facts.len());
        for fact in &self.facts {
            if !responses.contains(&fact.response) {
                responses.push(fact.response.clone());
            }
        }
        responses
    }

    pub fn iter(&self) -> impl Iterator<Item = &Fact> {
        self.facts.iter()
    }

    pub fn len(&self) -> usize {
        self.facts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }
}

/// When two pieces of text count as the same response.
///
/// Used both to check a player's answer and to keep a question's choices
/// apart: a distractor that matches the correct response, or another
/// distractor, is never offered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
#[non_exhaustive]
pub struct MatchingRules {
    pub ignore_caps: bool,
}

impl Default for MatchingRules {
    fn default() -> Self {
        Self { ignore_caps: true }
    }
}

impl MatchingRules {
    pub fn test_match(&self, a: &str, b: &str) -> bool {
        let a = a.trim();
        let b = b.trim();
        if self.ignore_caps {
            unicase::eq(a, b)
        } else {
            a == b
        }
    }

    /// Whether any of `responses` matches `text`.
    pub fn matches_any<S: AsRef<str>>(&self, responses: &[S], text: &str) -> bool {
        responses
            .iter()
            .any(|response| self.test_match(response.as_ref(), text))
    }
}

#[cfg(test)]
impl FactStore {
    /// The four animals used throughout the tests.
    pub(crate) fn example() -> FactStore {
        let facts = [
            Fact::new("dog", "犬").with_mnemonic("m1"),
            Fact::new("cat", "猫").with_mnemonic("m2"),
            Fact::new("fish", "魚").with_mnemonic("m3"),
            Fact::new("bird", "鳥").with_mnemonic("m4"),
        ];
        FactStore::from_facts(facts).expect("example prompts are unique")
    }
}
