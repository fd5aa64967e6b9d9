use rand::Rng;
use smallvec::SmallVec;
use smartstring::alias::String;

use crate::{
    fact::{Fact, MatchingRules},
    sample, Result,
};

/// Number of wrong answers offered alongside the right one by default.
pub const DEFAULT_DISTRACTORS: usize = 3;
/// Expected length of `Question::responses`; used to size the smallvec.
const CHOICE_LIST_LEN: usize = DEFAULT_DISTRACTORS + 1;

/// A multiple choice question built from a single fact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    fact: Fact,
    responses: SmallVec<[String; CHOICE_LIST_LEN]>,
    correct_index: usize,
}

impl Question {
    /// Builds a question for `fact` with up to `distractors` wrong answers
    /// drawn from `pool`.
    ///
    /// Pool entries that match the correct response under `rules` are never
    /// offered, and no two offered responses match each other. If the pool has
    /// fewer usable entries than `distractors`, all of them are used.
    pub fn build<R: Rng + ?Sized>(
        fact: &Fact,
        pool: &[String],
        distractors: usize,
        rules: &MatchingRules,
        rng: &mut R,
    ) -> Result<Self> {
        let mut usable: Vec<&String> = Vec::with_capacity(pool.len());
        for response in pool {
            if rules.test_match(&fact.response, response)
                || rules.matches_any(usable.as_slice(), response)
            {
                continue;
            }
            usable.push(response);
        }

        let count = distractors.min(usable.len());
        let mut candidates = SmallVec::<[&String; CHOICE_LIST_LEN]>::with_capacity(count + 1);
        // The correct response goes first so it can be found after shuffling.
        candidates.push(&fact.response);
        candidates.extend(sample::random_choices(&usable, count, rng)?);

        let order = sample::shuffle(&(0..candidates.len()).collect::<Vec<_>>(), rng);
        let mut responses = SmallVec::with_capacity(candidates.len());
        let mut correct_index = 0;
        for (slot, &i) in order.iter().enumerate() {
            if i == 0 {
                correct_index = slot;
            }
            responses.push(candidates[i].clone());
        }

        Ok(Self {
            fact: fact.clone(),
            responses,
            correct_index,
        })
    }

    pub fn fact(&self) -> &Fact {
        &self.fact
    }

    /// Text to show the player.
    pub fn prompt(&self) -> &str {
        &self.fact.prompt
    }

    /// Candidate responses in display order.
    pub fn responses(&self) -> &[String] {
        &self.responses
    }

    pub fn correct_index(&self) -> usize {
        self.correct_index
    }

    pub fn correct(&self) -> &str {
        &self.responses[self.correct_index]
    }

    /// Whether `answer` is one of the offered responses.
    pub fn is_offered(&self, rules: &MatchingRules, answer: &str) -> bool {
        rules.matches_any(self.responses.as_slice(), answer)
    }

    /// Whether or not `answer` is the correct response to this question.
    pub fn is_correct_answer(&self, rules: &MatchingRules, answer: &str) -> bool {
        rules.test_match(&self.fact.response, answer)
    }
}
