//! Client-side quiz session: the generation state machine, the user's answer
//! selection and scoring.
//!
//! `Idle -> Submitting -> Ready(quiz) | Failed(reason)`, and back to `Idle` via
//! [`QuizSession::reset`]. Starting a new submission always discards the
//! previous quiz and answers. Nothing here is persisted.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::error::QuizError;
use crate::quiz::Quiz;

/// Question index -> chosen option index. A missing entry means unanswered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerSelection(BTreeMap<usize, usize>);

impl AnswerSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record (or replace) the answer for one question.
    pub fn select(&mut self, question: usize, option: usize) {
        self.0.insert(question, option);
    }

    pub fn get(&self, question: usize) -> Option<usize> {
        self.0.get(&question).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.0.iter().map(|(q, o)| (*q, *o))
    }
}

impl FromIterator<(usize, usize)> for AnswerSelection {
    fn from_iter<I: IntoIterator<Item = (usize, usize)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Number of questions whose selected option equals the correct answer.
pub fn score(quiz: &Quiz, answers: &AnswerSelection) -> usize {
    quiz.questions
        .iter()
        .enumerate()
        .filter(|(i, q)| answers.get(*i).is_some_and(|o| q.is_correct(o)))
        .count()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreReport {
    pub correct: usize,
    pub total: usize,
}

impl ScoreReport {
    pub fn percent(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        ((self.correct as f64 / self.total as f64) * 100.0).round() as u32
    }
}

/// How an option is highlighted once results are shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionMark {
    Correct,
    /// Chosen by the user but wrong
    Incorrect,
    Neutral,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Submitting,
    Ready(Quiz),
    Failed(String),
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SessionError {
    #[error("a quiz is already being generated")]
    SubmissionInProgress,
    #[error("no quiz generation is in progress")]
    NotSubmitting,
    #[error("no quiz is loaded")]
    NoQuiz,
    #[error("question {0} does not exist")]
    QuestionOutOfRange(usize),
    #[error("question {question} has no option {option}")]
    OptionOutOfRange { question: usize, option: usize },
    #[error("only {answered} of {total} questions are answered")]
    Unanswered { answered: usize, total: usize },
    #[error("answers are locked once results are shown")]
    ResultsShown,
}

#[derive(Debug, Clone)]
pub struct QuizSession {
    state: SessionState,
    answers: AnswerSelection,
    results_shown: bool,
}

impl Default for QuizSession {
    fn default() -> Self {
        Self {
            state: SessionState::Idle,
            answers: AnswerSelection::new(),
            results_shown: false,
        }
    }
}

impl QuizSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn is_submitting(&self) -> bool {
        self.state == SessionState::Submitting
    }

    /// The upload control is available whenever nothing is in flight.
    pub fn can_submit(&self) -> bool {
        !self.is_submitting()
    }

    pub fn quiz(&self) -> Option<&Quiz> {
        match &self.state {
            SessionState::Ready(quiz) => Some(quiz),
            _ => None,
        }
    }

    pub fn answers(&self) -> &AnswerSelection {
        &self.answers
    }

    pub fn results_shown(&self) -> bool {
        self.results_shown
    }

    /// Enter `Submitting`, discarding any previous quiz and answers.
    /// Refused while another submission is outstanding.
    pub fn begin_submission(&mut self) -> Result<(), SessionError> {
        if self.is_submitting() {
            return Err(SessionError::SubmissionInProgress);
        }
        self.clear();
        self.state = SessionState::Submitting;
        Ok(())
    }

    /// Finish the outstanding submission with the generation outcome.
    pub fn complete(&mut self, outcome: Result<Quiz, QuizError>) -> Result<(), SessionError> {
        if !self.is_submitting() {
            return Err(SessionError::NotSubmitting);
        }
        self.state = match outcome {
            Ok(quiz) => SessionState::Ready(quiz),
            Err(e) => SessionState::Failed(e.to_string()),
        };
        Ok(())
    }

    /// Back to `Idle` with no quiz and no answers.
    pub fn reset(&mut self) {
        self.clear();
        self.state = SessionState::Idle;
    }

    /// Refused once results are shown; answers are locked from then on.
    pub fn select_answer(&mut self, question: usize, option: usize) -> Result<(), SessionError> {
        let quiz = self.quiz().ok_or(SessionError::NoQuiz)?;
        if self.results_shown {
            return Err(SessionError::ResultsShown);
        }
        let q = quiz
            .questions
            .get(question)
            .ok_or(SessionError::QuestionOutOfRange(question))?;
        if option >= q.options.len() {
            return Err(SessionError::OptionOutOfRange { question, option });
        }
        self.answers.select(question, option);
        Ok(())
    }

    pub fn score(&self) -> Option<ScoreReport> {
        self.quiz().map(|quiz| ScoreReport {
            correct: score(quiz, &self.answers),
            total: quiz.questions.len(),
        })
    }

    /// Every question must be answered first.
    pub fn can_show_results(&self) -> bool {
        self.quiz()
            .is_some_and(|quiz| self.answers.len() >= quiz.questions.len())
    }

    pub fn show_results(&mut self) -> Result<ScoreReport, SessionError> {
        let report = self.score().ok_or(SessionError::NoQuiz)?;
        if self.answers.len() < report.total {
            return Err(SessionError::Unanswered {
                answered: self.answers.len(),
                total: report.total,
            });
        }
        self.results_shown = true;
        Ok(report)
    }

    /// Highlight for one option; everything is neutral until results are shown.
    pub fn option_mark(&self, question: usize, option: usize) -> OptionMark {
        let Some(q) = self.quiz().and_then(|quiz| quiz.questions.get(question)) else {
            return OptionMark::Neutral;
        };
        if !self.results_shown {
            return OptionMark::Neutral;
        }
        if q.is_correct(option) {
            OptionMark::Correct
        } else if self.answers.get(question) == Some(option) {
            OptionMark::Incorrect
        } else {
            OptionMark::Neutral
        }
    }

    fn clear(&mut self) {
        self.answers.clear();
        self.results_shown = false;
    }
}
