//! Shared Application State
//!
//! This module defines the `AppState` struct, which holds the read-only
//! resources every handler needs.

use std::sync::Arc;
use tutor_core::progression::LessonEngine;

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<LessonEngine>,
    /// Course served by the single-course `/start_lesson` and `/submit_answer` routes.
    pub default_course_id: Arc<String>,
}
