use std::collections::HashSet;

use log::{debug, info};
use rand::Rng;
use serde::{Deserialize, Serialize};
use smartstring::alias::String;

use crate::{
    fact::{FactStore, MatchingRules},
    picker::{PickerConfig, QuestionPicker},
    question::{Question, DEFAULT_DISTRACTORS},
    Error, Result,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
#[non_exhaustive]
pub struct SessionConfig {
    /// How many wrong answers to offer with each question.
    pub distractors: usize,
    /// How to test if an answer is correct.
    pub matching_rules: MatchingRules,
    pub picker: PickerConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            distractors: DEFAULT_DISTRACTORS,
            matching_rules: MatchingRules::default(),
            picker: PickerConfig::default(),
        }
    }
}

impl SessionConfig {
    /// Parses a YAML config document. Missing keys take their defaults.
    pub fn from_yaml_str(s: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(s)?;
        config.picker.validate()?;
        Ok(config)
    }
}

/// Running totals for a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub answered: u32,
    pub correct: u32,
    /// Distinct prompts asked so far.
    pub seen: usize,
    pub total: usize,
}

/// Result of answering a question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Correct,
    Wrong {
        expected: String,
        /// Aid for remembering the expected response next time.
        mnemonic: String,
    },
}

impl Outcome {
    pub fn is_correct(&self) -> bool {
        matches!(self, Outcome::Correct)
    }
}

/// One player working through a set of facts.
///
/// A session starts out not ready; questions can only be asked once facts
/// have been loaded with [`Session::load`].
#[derive(Debug, Clone, Default)]
pub struct Session {
    config: SessionConfig,
    facts: FactStore,
    /// Distractor pool, cached from `facts`.
    responses: Vec<String>,
    picker: QuestionPicker,
    question: Option<Question>,
    answer: Option<String>,
    answered: u32,
    correct: u32,
    seen: HashSet<String>,
}

impl Session {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    pub fn with_facts(config: SessionConfig, facts: FactStore) -> Result<Self> {
        let mut session = Self::new(config);
        session.load(facts)?;
        Ok(session)
    }

    /// Hands the loaded facts to the session, making it ready.
    ///
    /// Can only succeed once. On error the session is left untouched.
    pub fn load(&mut self, facts: FactStore) -> Result<()> {
        if self.picker.is_ready() {
            return Err(Error::AlreadyLoaded);
        }
        let picker = QuestionPicker::ready(facts.prompts(), self.config.picker.clone())?;
        self.responses = facts.responses();
        self.facts = facts;
        self.picker = picker;
        info!(
            "session ready with {} facts and {} distinct responses",
            self.facts.len(),
            self.responses.len()
        );
        Ok(())
    }

    pub fn is_ready(&self) -> bool {
        self.picker.is_ready()
    }

    /// Moves on to a new question, dropping the current one whether or not it
    /// was answered.
    pub fn next_question<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<&Question> {
        let prompt = String::from(self.picker.next_question(rng)?);
        let fact = self
            .facts
            .get(&prompt)
            .ok_or_else(|| Error::UnknownPrompt(prompt.to_string()))?;
        let question = Question::build(
            fact,
            &self.responses,
            self.config.distractors,
            &self.config.matching_rules,
            rng,
        )?;
        debug!("asking {prompt:?} with {} choices", question.responses().len());

        self.seen.insert(prompt);
        self.answer = None;
        Ok(&*self.question.insert(question))
    }

    /// Answers the current question and reports the result to the picker.
    ///
    /// `response` must be one of the question's responses; anything else is
    /// rejected with [`Error::NotOffered`] and not counted.
    pub fn answer(&mut self, response: &str) -> Result<Outcome> {
        let question = self.question.as_ref().ok_or(Error::NoActiveQuestion)?;
        if self.answer.is_some() {
            return Err(Error::AlreadyAnswered);
        }
        if !question.is_offered(&self.config.matching_rules, response) {
            return Err(Error::NotOffered(response.into()));
        }

        let correct = question.is_correct_answer(&self.config.matching_rules, response);
        self.picker.feedback(question.prompt(), correct)?;

        let outcome = if correct {
            Outcome::Correct
        } else {
            let fact = question.fact();
            Outcome::Wrong {
                expected: fact.response.clone(),
                mnemonic: fact.mnemonic.clone(),
            }
        };

        self.answer = Some(response.into());
        self.answered += 1;
        if correct {
            self.correct += 1;
        }
        Ok(outcome)
    }

    pub fn question(&self) -> Option<&Question> {
        self.question.as_ref()
    }

    /// The answer given to the current question, if any.
    pub fn last_answer(&self) -> Option<&str> {
        self.answer.as_deref()
    }

    pub fn has_answered(&self) -> bool {
        self.answer.is_some()
    }

    pub fn summary(&self) -> Summary {
        Summary {
            answered: self.answered,
            correct: self.correct,
            seen: self.seen.len(),
            total: self.facts.len(),
        }
    }

    pub fn facts(&self) -> &FactStore {
        &self.facts
    }

    pub fn picker(&self) -> &QuestionPicker {
        &self.picker
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use crate::{fact::Fact, ErrorKind};

    use super::*;

    fn ready_session() -> Session {
        Session::with_facts(SessionConfig::default(), FactStore::example()).unwrap()
    }

    fn wrong_choice(question: &Question) -> String {
        question
            .responses()
            .iter()
            .find(|r| r.as_str() != question.correct())
            .cloned()
            .unwrap()
    }

    #[test]
    fn not_ready_until_loaded() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut session = Session::new(SessionConfig::default());
        assert!(!session.is_ready());
        let err = session.next_question(&mut rng).unwrap_err();
        assert!(matches!(err, Error::NotReady));
        assert_eq!(err.kind(), ErrorKind::InvalidState);
        assert!(matches!(session.answer("犬"), Err(Error::NoActiveQuestion)));

        session.load(FactStore::example()).unwrap();
        assert!(session.is_ready());
        assert!(session.next_question(&mut rng).is_ok());
    }

    #[test]
    fn load_only_once() {
        let mut session = ready_session();
        let err = session.load(FactStore::example()).unwrap_err();
        assert!(matches!(err, Error::AlreadyLoaded));
        assert!(session.is_ready());
    }

    #[test]
    fn load_empty_store() {
        let mut session = Session::new(SessionConfig::default());
        let err = session.load(FactStore::default()).unwrap_err();
        assert!(matches!(err, Error::NoPrompts));
        assert!(!session.is_ready());
        // A failed load does not use up the transition.
        session.load(FactStore::example()).unwrap();
        assert!(session.is_ready());
    }

    #[test]
    fn animals_end_to_end() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let mut session = ready_session();

        let question = session.next_question(&mut rng).unwrap();
        assert!(["dog", "cat", "fish", "bird"].contains(&question.prompt()));
        let responses: HashSet<&str> = question.responses().iter().map(String::as_str).collect();
        assert_eq!(question.responses().len(), 4);
        assert_eq!(responses, HashSet::from(["犬", "猫", "魚", "鳥"]));
        assert_eq!(question.correct(), question.fact().response.as_str());

        // Get "dog" wrong once, then it should come up more than a quarter of
        // the time.
        while session.question().unwrap().prompt() != "dog" {
            session.next_question(&mut rng).unwrap();
        }
        let wrong = wrong_choice(session.question().unwrap());
        assert_eq!(
            session.answer(&wrong).unwrap(),
            Outcome::Wrong {
                expected: "犬".into(),
                mnemonic: "m1".into(),
            }
        );

        let mut dogs = 0;
        for _ in 0..100 {
            if session.next_question(&mut rng).unwrap().prompt() == "dog" {
                dogs += 1;
            }
        }
        assert!(dogs > 25, "dog asked {dogs} times");
    }

    #[test]
    fn counters() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut session = ready_session();
        assert_eq!(
            session.summary(),
            Summary {
                answered: 0,
                correct: 0,
                seen: 0,
                total: 4,
            }
        );

        let correct = String::from(session.next_question(&mut rng).unwrap().correct());
        assert!(session.answer(&correct).unwrap().is_correct());
        assert!(session.has_answered());
        assert_eq!(session.last_answer(), Some(correct.as_str()));

        let wrong = wrong_choice(session.next_question(&mut rng).unwrap());
        assert!(!session.has_answered());
        assert!(!session.answer(&wrong).unwrap().is_correct());

        let summary = session.summary();
        assert_eq!(summary.answered, 2);
        assert_eq!(summary.correct, 1);
        // Never the same prompt twice in a row.
        assert_eq!(summary.seen, 2);
        assert_eq!(summary.total, 4);
    }

    #[test]
    fn answer_only_once() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let mut session = ready_session();
        let correct = String::from(session.next_question(&mut rng).unwrap().correct());
        session.answer(&correct).unwrap();
        let err = session.answer(&correct).unwrap_err();
        assert!(matches!(err, Error::AlreadyAnswered));
        assert_eq!(session.summary().answered, 1);
        assert_eq!(session.summary().correct, 1);
    }

    #[test]
    fn answer_must_be_offered() {
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let mut session = ready_session();
        let prompt = String::from(session.next_question(&mut rng).unwrap().prompt());

        let err = session.answer("象").unwrap_err();
        assert!(matches!(err, Error::NotOffered(ref r) if r == "象"));
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert!(!session.has_answered());
        assert_eq!(session.summary().answered, 0);
        let record = session.picker().as_ready().unwrap().record(&prompt).unwrap();
        assert_eq!(record.incorrect, 0);

        // The question can still be answered properly.
        let correct = String::from(session.question().unwrap().correct());
        assert!(session.answer(&correct).unwrap().is_correct());
    }

    #[test]
    fn feedback_reaches_picker() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut session = ready_session();
        let question = session.next_question(&mut rng).unwrap();
        let prompt = String::from(question.prompt());
        let wrong = wrong_choice(question);
        session.answer(&wrong).unwrap();

        let picker = session.picker().as_ready().unwrap();
        let record = picker.record(&prompt).unwrap();
        assert_eq!(record.incorrect, 1);
        assert_eq!(record.weight, 4.0);
    }

    #[test]
    fn seen_covers_everything_eventually() {
        let mut rng = ChaCha8Rng::seed_from_u64(6);
        let mut session = ready_session();
        for _ in 0..200 {
            session.next_question(&mut rng).unwrap();
        }
        assert_eq!(session.summary().seen, 4);
    }

    #[test]
    fn answer_matching_ignores_caps() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let facts = FactStore::from_facts([Fact::new("a", "Apple"), Fact::new("b", "Pear")]).unwrap();
        let mut session = Session::with_facts(SessionConfig::default(), facts).unwrap();
        let question = session.next_question(&mut rng).unwrap();
        let answer = question.correct().to_lowercase();
        assert!(session.answer(&answer).unwrap().is_correct());
    }

    #[test]
    fn fewer_distractors() {
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let config = SessionConfig {
            distractors: 1,
            ..Default::default()
        };
        let mut session = Session::with_facts(config, FactStore::example()).unwrap();
        assert_eq!(session.next_question(&mut rng).unwrap().responses().len(), 2);
    }

    #[test]
    fn config_from_yaml() {
        let config = SessionConfig::from_yaml_str(
            "distractors: 5
matching_rules:
  ignore_caps: false
picker:
  miss_factor: 8.0
",
        )
        .unwrap();
        assert_eq!(config.distractors, 5);
        assert!(!config.matching_rules.ignore_caps);
        assert_eq!(config.picker.miss_factor, 8.0);
        assert_eq!(config.picker.hit_factor, 2.0);

        assert_eq!(SessionConfig::from_yaml_str("{}").unwrap(), SessionConfig::default());
    }

    #[test]
    fn config_rejects_bad_picker() {
        let err = SessionConfig::from_yaml_str("picker:\n  min_weight: -1.0\n").unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }
}
