//! Quiz mode: a shuffled deck of scenarios, each with one recommended answer.
//!
//! Every question is asked exactly once per round, in an order fixed when the
//! round starts. Answers only move the score; company state is untouched.
use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};

use crate::constants::POINTS_PER_CORRECT_ANSWER;
use crate::data::{CatalogError, EventDefinition, validate_events};
use crate::session::{SessionError, SessionPhase};

const STANDARD_QUIZ_DATA: &str = include_str!("../data/quiz.json");

/// A scenario paired with the index of its recommended option.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizQuestion {
    #[serde(flatten)]
    pub event: EventDefinition,
    pub correct: usize,
}

#[derive(Deserialize)]
struct QuizDocument {
    #[serde(default)]
    questions: Vec<QuizQuestion>,
}

impl TryFrom<QuizDocument> for QuizDeck {
    type Error = CatalogError;

    fn try_from(document: QuizDocument) -> Result<Self, Self::Error> {
        Self::new(document.questions)
    }
}

/// Validated set of quiz questions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "QuizDocument")]
pub struct QuizDeck {
    questions: Vec<QuizQuestion>,
}

impl QuizDeck {
    /// Build a deck from questions.
    ///
    /// # Errors
    ///
    /// Fails on the same shape problems as [`crate::EventCatalog::new`], or
    /// when a question marks an option that does not exist.
    pub fn new(questions: Vec<QuizQuestion>) -> Result<Self, CatalogError> {
        validate_events(questions.iter().map(|question| &question.event))?;
        if let Some(question) = questions
            .iter()
            .find(|question| question.correct >= question.event.options.len())
        {
            return Err(CatalogError::AnswerOutOfRange {
                id: question.event.id.clone(),
                correct: question.correct,
                count: question.event.options.len(),
            });
        }
        Ok(Self { questions })
    }

    /// Load a deck from a JSON document of the form `{"questions": [...]}`.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed or fails validation.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let document: QuizDocument = serde_json::from_str(json)?;
        Self::try_from(document)
    }

    /// Load the ten-question deck embedded in the crate.
    ///
    /// # Errors
    ///
    /// Returns an error if the embedded asset is malformed.
    pub fn load_standard() -> Result<Self, CatalogError> {
        Self::from_json(STANDARD_QUIZ_DATA)
    }

    #[must_use]
    pub fn questions(&self) -> &[QuizQuestion] {
        &self.questions
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// Always false for a validated deck.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

/// One recorded answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizAnswer {
    pub question_id: String,
    pub option_index: usize,
    pub correct: bool,
    pub points: u32,
}

/// Result of one successful `answer`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizOutcome {
    pub answer: QuizAnswer,
    pub score: u32,
    pub phase: SessionPhase,
}

/// One round through a shuffled deck.
#[derive(Debug, Clone)]
pub struct QuizSession {
    deck: QuizDeck,
    rng: ChaCha20Rng,
    rng_seed: u64,
    order: Vec<usize>,
    position: usize,
    score: u32,
    answers: Vec<QuizAnswer>,
}

impl QuizSession {
    /// Shuffle `deck` and present its first question.
    #[must_use]
    pub fn new(deck: QuizDeck, rng_seed: u64) -> Self {
        let mut session = Self {
            deck,
            rng: ChaCha20Rng::seed_from_u64(rng_seed),
            rng_seed,
            order: Vec::new(),
            position: 0,
            score: 0,
            answers: Vec::new(),
        };
        session.shuffle();
        session
    }

    /// Start a new round with a fresh order. The RNG stream continues.
    pub fn restart(&mut self) {
        log::info!(
            "restarting quiz after {} answer(s), score {}",
            self.answers.len(),
            self.score
        );
        self.shuffle();
    }

    fn shuffle(&mut self) {
        self.order = (0..self.deck.len()).collect();
        self.order.shuffle(&mut self.rng);
        self.position = 0;
        self.score = 0;
        self.answers.clear();
    }

    /// Answer the current question with the option at `option_index`.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidState`] once every question has been
    /// answered and [`SessionError::InvalidChoice`] when the index is out of
    /// range. On error the round is left unchanged.
    pub fn answer(&mut self, option_index: usize) -> Result<QuizOutcome, SessionError> {
        let question = self.current().ok_or(SessionError::InvalidState {
            operation: "answer",
            phase: SessionPhase::Ended,
        })?;
        let available = question.event.options.len();
        if option_index >= available {
            return Err(SessionError::InvalidChoice {
                index: option_index,
                available,
            });
        }

        let correct = option_index == question.correct;
        let points = if correct { POINTS_PER_CORRECT_ANSWER } else { 0 };
        let answer = QuizAnswer {
            question_id: question.event.id.clone(),
            option_index,
            correct,
            points,
        };
        log::debug!(
            "quiz {}: option {option_index} ({})",
            answer.question_id,
            if correct { "correct" } else { "wrong" }
        );

        self.score = self.score.saturating_add(points);
        self.answers.push(answer.clone());
        self.position += 1;
        if self.is_finished() {
            log::info!("quiz finished: {} / {}", self.score, self.max_score());
        }

        Ok(QuizOutcome {
            answer,
            score: self.score,
            phase: self.phase(),
        })
    }

    /// Question awaiting an answer; `None` once the round is over.
    #[must_use]
    pub fn current(&self) -> Option<&QuizQuestion> {
        self.order
            .get(self.position)
            .and_then(|idx| self.deck.questions().get(*idx))
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        if self.is_finished() {
            SessionPhase::Ended
        } else {
            SessionPhase::Active
        }
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.position >= self.order.len()
    }

    #[must_use]
    pub const fn score(&self) -> u32 {
        self.score
    }

    /// Final score; `None` until the last question is answered.
    #[must_use]
    pub fn final_score(&self) -> Option<u32> {
        self.is_finished().then_some(self.score)
    }

    #[must_use]
    pub fn max_score(&self) -> u32 {
        u32::try_from(self.deck.len())
            .unwrap_or(u32::MAX)
            .saturating_mul(POINTS_PER_CORRECT_ANSWER)
    }

    #[must_use]
    pub fn answers(&self) -> &[QuizAnswer] {
        &self.answers
    }

    /// Question ids in the order this round presents them.
    pub fn order(&self) -> impl Iterator<Item = &str> + '_ {
        self.order
            .iter()
            .filter_map(|idx| self.deck.questions().get(*idx))
            .map(|question| question.event.id.as_str())
    }

    #[must_use]
    pub const fn deck(&self) -> &QuizDeck {
        &self.deck
    }

    #[must_use]
    pub const fn rng_seed(&self) -> u64 {
        self.rng_seed
    }
}
