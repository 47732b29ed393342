//! Strict parse-then-validate boundary for mutating request payloads.
//!
//! Raw form data arrives loosely typed; nothing downstream trusts its shape.
//! Each parser returns a typed, bounds-checked value or a `Validation` error
//! naming the first violated rule. Runs before sanitization, authorization,
//! and any store access.

use serde::Deserialize;
use uuid::Uuid;

use crate::error::CoreError;

pub const MAX_QUESTION_LEN: usize = 500;
pub const MAX_OPTION_LEN: usize = 200;
pub const MIN_OPTIONS: usize = 2;
pub const MAX_OPTIONS: usize = 10;

/// Raw create/update payload as submitted by the client.
#[derive(Debug, Deserialize)]
pub struct PollPayload {
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub options: Vec<String>,
}

/// Raw vote payload. The option index arrives as text from form data.
#[derive(Debug, Deserialize)]
pub struct VotePayload {
    #[serde(default)]
    pub option: String,
}

/// Validated poll content: trimmed, non-empty, within length bounds.
#[derive(Debug, Clone)]
pub struct PollInput {
    pub question: String,
    pub options: Vec<String>,
}

impl PollInput {
    pub fn parse(payload: PollPayload) -> Result<Self, CoreError> {
        let question = payload.question.trim().to_string();
        if question.is_empty() {
            return Err(CoreError::validation("Question is required"));
        }
        if question.chars().count() > MAX_QUESTION_LEN {
            return Err(CoreError::validation(
                "Question must be less than 500 characters",
            ));
        }

        if payload.options.len() < MIN_OPTIONS {
            return Err(CoreError::validation("At least 2 options are required"));
        }
        if payload.options.len() > MAX_OPTIONS {
            return Err(CoreError::validation("Maximum 10 options allowed"));
        }

        let mut options = Vec::with_capacity(payload.options.len());
        for option in &payload.options {
            let option = option.trim();
            if option.is_empty() {
                return Err(CoreError::validation("Option text is required"));
            }
            if option.chars().count() > MAX_OPTION_LEN {
                return Err(CoreError::validation(
                    "Option must be less than 200 characters",
                ));
            }
            options.push(option.to_string());
        }

        Ok(Self { question, options })
    }
}

/// Validated vote: a well-formed poll id and a non-negative option index.
/// Whether the index is in range for the poll is checked later, against the
/// poll row itself.
#[derive(Debug, Clone, Copy)]
pub struct VoteInput {
    pub poll_id: Uuid,
    pub option_index: i32,
}

impl VoteInput {
    pub fn parse(poll_id: &str, payload: &VotePayload) -> Result<Self, CoreError> {
        let poll_id = parse_poll_id(poll_id)?;

        let raw = payload.option.trim();
        let option_index: i32 = raw
            .parse()
            .ok()
            .filter(|n| *n >= 0)
            .ok_or_else(|| {
                CoreError::validation(format!("Option index must be a non-negative integer, got '{raw}'"))
            })?;

        Ok(Self {
            poll_id,
            option_index,
        })
    }
}

/// Parse an opaque poll identifier from a path segment.
pub fn parse_poll_id(raw: &str) -> Result<Uuid, CoreError> {
    Uuid::parse_str(raw.trim()).map_err(|_| CoreError::validation("Invalid poll ID"))
}
