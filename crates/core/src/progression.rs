//! Lesson Progression Engine
//!
//! Drives a student through a course one module at a time. The engine is
//! stateless between requests: the caller supplies the module it is on, and
//! each call resolves that position against the catalog, asks the tutor for
//! feedback, judges it, and decides whether to advance, retry or finish.

use crate::{
    catalog::{CatalogError, CourseCatalog, Module},
    evaluation, prompts,
    prompts::PromptSet,
    llm_client::TutorClient,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Shown instead of a new explanation when the student should try again.
pub const RETRY_MESSAGE: &str = "Give it another try!";

/// Request-level failures. These are reported back to the caller as data.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LessonError {
    #[error("Invalid course ID.")]
    InvalidCourse,
    #[error("Invalid module ID.")]
    InvalidModule,
}

impl From<CatalogError> for LessonError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::ModuleNotFound { .. } => LessonError::InvalidModule,
            _ => LessonError::InvalidCourse,
        }
    }
}

/// The opening turn of a lesson.
#[derive(Debug, Clone, PartialEq)]
pub struct LessonStart {
    pub course_id: String,
    pub module_id: u32,
    pub message: String,
    pub question: Option<String>,
}

impl LessonStart {
    pub fn expects_answer(&self) -> bool {
        self.question.is_some()
    }
}

/// Where the lesson goes after a submission has been judged.
#[derive(Debug, Clone, PartialEq)]
pub enum NextStep {
    /// The student moves on to `module_id`, introduced by a fresh explanation.
    Advance {
        module_id: u32,
        explanation: String,
        question: Option<String>,
    },
    /// The student stays on `module_id` and answers the same question again.
    Retry {
        module_id: u32,
        question: Option<String>,
    },
    /// The submitted module has no successor, so the course is finished.
    Complete,
}

/// The result of judging one submission.
#[derive(Debug, Clone, PartialEq)]
pub struct AnswerOutcome {
    pub feedback: String,
    pub correct: bool,
    pub next: NextStep,
}

/// The lesson state machine, built once at startup and shared across requests.
pub struct LessonEngine {
    catalog: Arc<CourseCatalog>,
    tutor: Arc<dyn TutorClient>,
    prompts: Arc<PromptSet>,
}

impl LessonEngine {
    pub fn new(
        catalog: Arc<CourseCatalog>,
        tutor: Arc<dyn TutorClient>,
        prompts: Arc<PromptSet>,
    ) -> Self {
        Self {
            catalog,
            tutor,
            prompts,
        }
    }

    pub fn catalog(&self) -> &CourseCatalog {
        &self.catalog
    }

    /// Opens a course by explaining its first module.
    pub async fn start_lesson(&self, course_id: &str) -> Result<LessonStart, LessonError> {
        let course = self.catalog.get_course(course_id).map_err(|e| {
            warn!(course_id, "Lesson requested for unknown course");
            LessonError::from(e)
        })?;
        let first = course.first_module().ok_or(LessonError::InvalidModule)?;

        let message = self
            .tutor
            .generate(&self.prompts.welcome, &prompts::welcome_request(first))
            .await;

        info!(course_id, module_id = first.id, "Lesson started");
        Ok(LessonStart {
            course_id: course.id.clone(),
            module_id: first.id,
            message,
            question: first.question.clone(),
        })
    }

    /// Judges a submission for `module_id` and decides the next step.
    ///
    /// Unknown courses and modules are rejected before the tutor is consulted.
    pub async fn submit_answer(
        &self,
        course_id: &str,
        module_id: i64,
        answer: &str,
    ) -> Result<AnswerOutcome, LessonError> {
        let course = self.catalog.get_course(course_id).map_err(|e| {
            warn!(course_id, "Answer submitted for unknown course");
            LessonError::from(e)
        })?;
        let current = self.catalog.get_module(course, module_id).map_err(|e| {
            warn!(course_id, module_id, "Answer submitted for unknown module");
            LessonError::from(e)
        })?;

        let feedback_request = prompts::feedback_request(current, course.pedagogy, answer);
        debug!(
            course_id,
            module_id,
            pedagogy = ?course.pedagogy,
            request_chars = feedback_request.len(),
            "Requesting feedback"
        );
        let feedback = self
            .tutor
            .generate(self.prompts.feedback_for(course.pedagogy), &feedback_request)
            .await;
        let correct = evaluation::evaluate(&feedback);

        let next = match course.next_module(current.id) {
            None => NextStep::Complete,
            Some(next) if correct => self.advance_to(next).await,
            Some(_) => NextStep::Retry {
                module_id: current.id,
                question: current.question.clone(),
            },
        };

        info!(course_id, module_id, correct, next = ?next_id(&next), "Answer judged");
        Ok(AnswerOutcome {
            feedback,
            correct,
            next,
        })
    }

    async fn advance_to(&self, next: &Module) -> NextStep {
        let explanation = self
            .tutor
            .generate(&self.prompts.transition, &prompts::transition_request(next))
            .await;

        NextStep::Advance {
            module_id: next.id,
            explanation,
            question: next.question.clone(),
        }
    }
}

fn next_id(step: &NextStep) -> Option<u32> {
    match step {
        NextStep::Advance { module_id, .. } | NextStep::Retry { module_id, .. } => Some(*module_id),
        NextStep::Complete => None,
    }
}
