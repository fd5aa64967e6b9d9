use std::collections::HashMap;

use log::{debug, trace};
use rand::Rng;
use serde::{Deserialize, Serialize};
use smartstring::alias::String;

use crate::{Error, Result};

/// Tuning for how strongly answers move a prompt's selection weight.
///
/// A wrong answer multiplies the weight by `miss_factor`, a right answer
/// divides it by `hit_factor`; the result is kept within
/// `min_weight..=max_weight`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
#[non_exhaustive]
pub struct PickerConfig {
    /// Weight every prompt starts with.
    pub base_weight: f64,
    pub miss_factor: f64,
    pub hit_factor: f64,
    /// Lower bound; keeps well known prompts in rotation.
    pub min_weight: f64,
    pub max_weight: f64,
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self {
            base_weight: 1.0,
            miss_factor: 4.0,
            hit_factor: 2.0,
            min_weight: 0.25,
            max_weight: 64.0,
        }
    }
}

impl PickerConfig {
    pub fn validate(&self) -> Result<()> {
        let weights = [self.base_weight, self.min_weight, self.max_weight];
        if weights.iter().any(|w| !w.is_finite() || *w <= 0.0) {
            return Err(Error::InvalidConfig("weights must be finite and positive"));
        }
        if !(self.min_weight <= self.base_weight && self.base_weight <= self.max_weight) {
            return Err(Error::InvalidConfig(
                "base_weight must lie between min_weight and max_weight",
            ));
        }
        if !(self.miss_factor.is_finite() && self.miss_factor >= 1.0)
            || !(self.hit_factor.is_finite() && self.hit_factor >= 1.0)
        {
            return Err(Error::InvalidConfig("factors must be finite and at least 1"));
        }
        Ok(())
    }
}

/// What the picker remembers about one prompt.
#[derive(Debug, Clone, PartialEq)]
pub struct PerformanceRecord {
    /// Relative likelihood of being picked.
    pub weight: f64,
    pub correct: u32,
    pub incorrect: u32,
    /// Turn on which the prompt was last picked, if ever.
    pub last_served: Option<u64>,
}

impl PerformanceRecord {
    fn new(weight: f64) -> Self {
        Self {
            weight,
            correct: 0,
            incorrect: 0,
            last_served: None,
        }
    }
}

/// Weighted random picker biased towards prompts that were answered wrong.
#[derive(Debug, Clone)]
pub struct AdaptivePicker {
    prompts: Vec<String>,
    index: HashMap<String, usize>,
    records: Vec<PerformanceRecord>,
    last: Option<usize>,
    turn: u64,
    config: PickerConfig,
}

impl AdaptivePicker {
    pub fn new<I, S>(prompts: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_config(prompts, PickerConfig::default())
    }

    /// Fails with [`Error::NoPrompts`] if `prompts` is empty. Repeated prompts
    /// are only kept once.
    pub fn with_config<I, S>(prompts: I, config: PickerConfig) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        config.validate()?;

        let mut picker = Self {
            prompts: Vec::new(),
            index: HashMap::new(),
            records: Vec::new(),
            last: None,
            turn: 0,
            config,
        };
        for prompt in prompts {
            let prompt = prompt.into();
            if picker.index.contains_key(&prompt) {
                continue;
            }
            picker.index.insert(prompt.clone(), picker.prompts.len());
            picker.prompts.push(prompt);
            picker
                .records
                .push(PerformanceRecord::new(picker.config.base_weight));
        }

        if picker.prompts.is_empty() {
            return Err(Error::NoPrompts);
        }
        // Every weight may reach `max_weight`; their sum must stay finite.
        if !(picker.config.max_weight * picker.prompts.len() as f64).is_finite() {
            return Err(Error::InvalidConfig(
                "max_weight is too large for this many prompts",
            ));
        }
        Ok(picker)
    }

    /// Picks the next prompt to ask.
    ///
    /// Never returns the prompt picked on the previous call unless it is the
    /// only one.
    pub fn next_question<R: Rng + ?Sized>(&mut self, rng: &mut R) -> &str {
        let skip = if self.records.len() > 1 {
            self.last
        } else {
            None
        };
        let candidates = || {
            self.records
                .iter()
                .enumerate()
                .filter(move |(i, _)| Some(*i) != skip)
        };

        // Weights are bounded below by a positive `min_weight`, so `total > 0`.
        let total: f64 = candidates().map(|(_, record)| record.weight).sum();
        let mut target = rng.gen_range(0.0..total);
        let mut chosen = 0;
        for (i, record) in candidates() {
            chosen = i;
            if target < record.weight {
                break;
            }
            target -= record.weight;
        }

        self.turn += 1;
        self.last = Some(chosen);
        let record = &mut self.records[chosen];
        record.last_served = Some(self.turn);
        debug!(
            "picked {:?} (weight {} of {})",
            self.prompts[chosen], record.weight, total
        );
        &self.prompts[chosen]
    }

    pub fn feedback(&mut self, prompt: &str, correct: bool) -> Result<()> {
        let &i = self
            .index
            .get(prompt)
            .ok_or_else(|| Error::UnknownPrompt(prompt.into()))?;
        let config = &self.config;
        let record = &mut self.records[i];
        if correct {
            record.correct += 1;
            record.weight = (record.weight / config.hit_factor).max(config.min_weight);
        } else {
            record.incorrect += 1;
            record.weight = (record.weight * config.miss_factor).min(config.max_weight);
        }
        trace!(
            "feedback for {prompt:?}: correct={correct}, weight now {}",
            record.weight
        );
        Ok(())
    }

    pub fn record(&self, prompt: &str) -> Option<&PerformanceRecord> {
        self.index.get(prompt).map(|&i| &self.records[i])
    }

    pub fn contains(&self, prompt: &str) -> bool {
        self.index.contains_key(prompt)
    }

    pub fn prompts(&self) -> impl Iterator<Item = &str> {
        self.prompts.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.prompts.len()
    }

    /// Always false for a constructed picker.
    pub fn is_empty(&self) -> bool {
        self.prompts.is_empty()
    }

    pub fn config(&self) -> &PickerConfig {
        &self.config
    }
}

/// Picks which prompt to quiz next.
///
/// Starts out [`QuestionPicker::NotReady`] until the facts have been loaded,
/// then becomes [`QuestionPicker::Ready`] for the rest of its life.
#[derive(Debug, Clone, Default)]
pub enum QuestionPicker {
    #[default]
    NotReady,
    Ready(AdaptivePicker),
}

impl QuestionPicker {
    pub fn ready<I, S>(prompts: I, config: PickerConfig) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        AdaptivePicker::with_config(prompts, config).map(Self::Ready)
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    pub fn next_question<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<&str> {
        match self {
            Self::NotReady => Err(Error::NotReady),
            Self::Ready(picker) => Ok(picker.next_question(rng)),
        }
    }

    pub fn feedback(&mut self, prompt: &str, correct: bool) -> Result<()> {
        match self {
            Self::NotReady => Err(Error::NotReady),
            Self::Ready(picker) => picker.feedback(prompt, correct),
        }
    }

    pub fn as_ready(&self) -> Option<&AdaptivePicker> {
        match self {
            Self::NotReady => None,
            Self::Ready(picker) => Some(picker),
        }
    }
}
