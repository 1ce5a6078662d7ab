//! API Models
//!
//! Request and response payloads for the lesson endpoints, and the conversions
//! that shape the lesson engine's decisions into those payloads.

use serde::{Deserialize, Serialize};
use tutor_core::{
    catalog::CourseSummary,
    progression::{AnswerOutcome, LessonStart, NextStep},
};
use utoipa::{IntoParams, ToSchema};

#[derive(Serialize, ToSchema, Debug, Clone, PartialEq)]
pub struct CourseListing {
    #[schema(example = "python-basics")]
    pub id: String,
    #[schema(example = "Python Basics: Variables and Data Types")]
    pub title: String,
}

impl From<CourseSummary> for CourseListing {
    fn from(summary: CourseSummary) -> Self {
        Self {
            id: summary.id,
            title: summary.title,
        }
    }
}

/// Query string selecting a course. Other parameters (e.g. `student_id`) are ignored.
#[derive(Deserialize, IntoParams, Debug)]
#[into_params(parameter_in = Query)]
pub struct CourseQuery {
    /// Identifier of the course, as listed by `GET /courses`.
    pub course_id: Option<String>,
}

#[derive(Deserialize, ToSchema, Debug)]
pub struct SubmitAnswerPayload {
    #[schema(example = 1)]
    pub module_id: i64,
    #[schema(example = "player_name = 'Alice'")]
    pub answer: String,
}

#[derive(Serialize, ToSchema, Debug, Clone, PartialEq)]
pub struct StartLessonResponse {
    pub module_id: u32,
    pub message: String,
    pub expects_code: bool,
    pub course_id: String,
    pub question: Option<String>,
}

impl From<LessonStart> for StartLessonResponse {
    fn from(start: LessonStart) -> Self {
        Self {
            expects_code: start.expects_answer(),
            module_id: start.module_id,
            message: start.message,
            course_id: start.course_id,
            question: start.question,
        }
    }
}

/// Feedback on a submission plus the lesson's next step.
///
/// `next_module_id` is `null` once the course is complete, in which case the
/// `next_*` text fields are omitted. `question` always mirrors the module the
/// student is now on.
#[derive(Serialize, ToSchema, Debug, Clone, PartialEq)]
pub struct SubmitAnswerResponse {
    pub feedback: String,
    pub next_module_id: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_explanation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_question: Option<String>,
    pub expects_code: bool,
    pub question: Option<String>,
}

impl From<AnswerOutcome> for SubmitAnswerResponse {
    fn from(outcome: AnswerOutcome) -> Self {
        let feedback = outcome.feedback;
        match outcome.next {
            NextStep::Advance {
                module_id,
                explanation,
                question,
            } => Self {
                feedback,
                next_module_id: Some(module_id),
                next_explanation: Some(explanation),
                expects_code: question.is_some(),
                next_question: question.clone(),
                question,
            },
            NextStep::Retry {
                module_id,
                question,
            } => Self {
                feedback,
                next_module_id: Some(module_id),
                next_explanation: Some(tutor_core::progression::RETRY_MESSAGE.to_string()),
                expects_code: question.is_some(),
                next_question: question.clone(),
                question,
            },
            NextStep::Complete => Self {
                feedback,
                next_module_id: None,
                next_explanation: None,
                next_question: None,
                expects_code: false,
                question: None,
            },
        }
    }
}

/// Error payload, returned on the same channel as successful responses.
#[derive(Serialize, ToSchema, Debug)]
pub struct ErrorResponse {
    #[schema(example = "Invalid course ID.")]
    pub error: String,
}
