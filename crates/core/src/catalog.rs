//! Course Catalog
//!
//! This module defines the static course content served by the tutor: courses,
//! their ordered modules, and the read-only `CourseCatalog` that is loaded and
//! validated once at startup and then shared by every request.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

/// Errors raised while loading the catalog or looking up its content.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Course '{0}' not found")]
    CourseNotFound(String),
    #[error("Module {module_id} not found in course '{course_id}'")]
    ModuleNotFound { course_id: String, module_id: i64 },
    #[error("Failed to read catalog file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("Failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid course '{course_id}': {reason}")]
    InvalidCourse { course_id: String, reason: String },
}

/// Selects how the tutor phrases feedback on a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pedagogy {
    /// The student writes code; feedback reviews it like a code review.
    CodeSubmission,
    /// The student answers in prose; feedback nudges with hints.
    GuidedHint,
}

/// A single lesson unit within a course.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Module {
    pub id: u32,
    pub title: String,
    pub explanation: String,
    #[serde(default)]
    pub question: Option<String>,
    /// Advisory hints for the AI reviewer. Never matched against submissions.
    #[serde(default)]
    pub answer_keywords: Vec<String>,
}

impl Module {
    /// Whether the student is expected to submit an answer for this module.
    pub fn expects_answer(&self) -> bool {
        self.question.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Course {
    pub id: String,
    pub title: String,
    pub pedagogy: Pedagogy,
    pub modules: Vec<Module>,
}

impl Course {
    /// Looks up a module by id. Ids run `1..=N`, so this is an index lookup.
    pub fn module(&self, module_id: i64) -> Option<&Module> {
        let index = usize::try_from(module_id).ok()?.checked_sub(1)?;
        self.modules.get(index)
    }

    /// The module the lesson opens with.
    pub fn first_module(&self) -> Option<&Module> {
        self.modules.first()
    }

    /// The module following `module_id`, or `None` at the end of the course.
    pub fn next_module(&self, module_id: u32) -> Option<&Module> {
        self.module(i64::from(module_id) + 1)
    }

    fn validate(&self) -> Result<(), CatalogError> {
        let invalid = |reason: String| CatalogError::InvalidCourse {
            course_id: self.id.clone(),
            reason,
        };

        let last = self
            .modules
            .last()
            .ok_or_else(|| invalid("course has no modules".to_string()))?;

        for (expected, module) in (1u32..).zip(&self.modules) {
            if module.id != expected {
                return Err(invalid(format!(
                    "module ids must run 1..N without gaps, found {} where {} was expected",
                    module.id, expected
                )));
            }
        }

        if last.question.is_some() || !last.answer_keywords.is_empty() {
            return Err(invalid(format!(
                "final module {} must have no question and no answer keywords",
                last.id
            )));
        }

        Ok(())
    }
}

/// The `{id, title}` pair shown in course listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CourseSummary {
    pub id: String,
    pub title: String,
}

/// On-disk shape of the catalog file.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CatalogDocument {
    version: String,
    courses: Vec<Course>,
}

/// The immutable set of courses, built once at process start.
#[derive(Debug)]
pub struct CourseCatalog {
    version: String,
    courses: Vec<Course>,
    index: HashMap<String, usize>,
}

impl CourseCatalog {
    /// Builds a catalog from already-parsed courses, enforcing content invariants.
    pub fn new(version: impl Into<String>, courses: Vec<Course>) -> Result<Self, CatalogError> {
        let mut index = HashMap::with_capacity(courses.len());
        for (position, course) in courses.iter().enumerate() {
            course.validate()?;
            if index.insert(course.id.clone(), position).is_some() {
                return Err(CatalogError::InvalidCourse {
                    course_id: course.id.clone(),
                    reason: "duplicate course id".to_string(),
                });
            }
        }

        Ok(Self {
            version: version.into(),
            courses,
            index,
        })
    }

    /// Parses and validates a catalog from its JSON representation.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let document: CatalogDocument = serde_json::from_str(json)?;
        Self::new(document.version, document.courses)
    }

    /// Reads, parses and validates the catalog file at `path`.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let json = std::fs::read_to_string(path).map_err(|source| CatalogError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let catalog = Self::from_json(&json)?;
        info!(
            path = %path.display(),
            version = %catalog.version,
            courses = catalog.courses.len(),
            "Course catalog loaded"
        );
        Ok(catalog)
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Lists all courses in catalog order.
    pub fn list_courses(&self) -> Vec<CourseSummary> {
        self.courses
            .iter()
            .map(|course| CourseSummary {
                id: course.id.clone(),
                title: course.title.clone(),
            })
            .collect()
    }

    pub fn get_course(&self, course_id: &str) -> Result<&Course, CatalogError> {
        self.index
            .get(course_id)
            .map(|&position| &self.courses[position])
            .ok_or_else(|| CatalogError::CourseNotFound(course_id.to_string()))
    }

    pub fn get_module<'a>(
        &self,
        course: &'a Course,
        module_id: i64,
    ) -> Result<&'a Module, CatalogError> {
        course
            .module(module_id)
            .ok_or_else(|| CatalogError::ModuleNotFound {
                course_id: course.id.clone(),
                module_id,
            })
    }
}
