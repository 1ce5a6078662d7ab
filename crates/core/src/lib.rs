//! Core lesson logic for the tutor service: the course catalog, tutor
//! instructions, the AI text-generation client, the answer heuristic and the
//! progression state machine. Transport concerns live in `tutor-api`.

pub mod catalog;
pub mod evaluation;
pub mod llm_client;
pub mod progression;
pub mod prompts;
