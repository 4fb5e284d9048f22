//! Protocol-compliance checks for envelopes from untrusted sources.
//!
//! Unlike `EnvelopeBuilder::build`, validation never fails fast: every check
//! runs and every violation is collected so the caller can report all
//! problems with a received message at once.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::{MAX_FUTURE_SKEW_SECS, MAX_MESSAGE_AGE_SECS, MIN_IDENTIFIER_LEN};
use crate::envelope::{Envelope, MessageType};

/// Temporal bounds applied to envelope timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorConfig {
    /// How far in the future a timestamp may lie.
    pub max_future_skew_secs: u64,
    /// How far in the past a timestamp may lie.
    pub max_age_secs: u64,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            max_future_skew_secs: MAX_FUTURE_SKEW_SECS,
            max_age_secs: MAX_MESSAGE_AGE_SECS,
        }
    }
}

/// Outcome of a validation run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationResult {
    errors: Vec<String>,
}

impl ValidationResult {
    pub fn valid() -> Self {
        Self { errors: Vec::new() }
    }

    pub fn invalid(error: impl Into<String>) -> Self {
        Self {
            errors: vec![error.into()],
        }
    }

    pub fn from_errors(errors: Vec<String>) -> Self {
        Self { errors }
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<String> {
        self.errors
    }

    /// All errors joined with `"; "`.
    pub fn errors_as_string(&self) -> String {
        self.errors.join("; ")
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "valid")
        } else {
            write!(f, "invalid: {}", self.errors_as_string())
        }
    }
}

/// Checks envelopes for protocol compliance.
#[derive(Debug, Clone, Default)]
pub struct MessageValidator {
    config: ValidatorConfig,
}

impl MessageValidator {
    pub fn new(config: ValidatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Validate an envelope that may be absent (e.g. a decoded empty record).
    pub fn validate_received(&self, envelope: Option<&Envelope>) -> ValidationResult {
        match envelope {
            Some(envelope) => self.validate(envelope),
            None => ValidationResult::invalid("Message envelope cannot be null"),
        }
    }

    /// Validate against the current time.
    pub fn validate(&self, envelope: &Envelope) -> ValidationResult {
        self.validate_at(envelope, Utc::now())
    }

    /// Validate with `now` as the reference instant for temporal checks.
    pub fn validate_at(&self, envelope: &Envelope, now: DateTime<Utc>) -> ValidationResult {
        let mut errors = Vec::new();

        check_required_fields(envelope, &mut errors);
        check_field_formats(envelope, &mut errors);
        check_type_rules(envelope, &mut errors);
        self.check_timestamps(envelope, now, &mut errors);

        if errors.is_empty() {
            tracing::debug!(id = %envelope.id, "Envelope validation passed");
            ValidationResult::valid()
        } else {
            tracing::warn!(
                id = %envelope.id,
                error_count = errors.len(),
                "Envelope validation failed"
            );
            ValidationResult::from_errors(errors)
        }
    }

    fn check_timestamps(&self, envelope: &Envelope, now: DateTime<Utc>, errors: &mut Vec<String>) {
        let timestamp = envelope.timestamp;

        if let Some(limit) = offset(now, self.config.max_future_skew_secs, true) {
            if timestamp > limit {
                errors.push("Message timestamp is too far in the future".into());
            }
        }

        if let Some(limit) = offset(now, self.config.max_age_secs, false) {
            if timestamp < limit {
                errors.push(format!(
                    "Message timestamp is too old (more than {} seconds)",
                    self.config.max_age_secs
                ));
            }
        }

        if envelope.ttl.is_some() && envelope.is_expired_at(now) {
            errors.push("Message has expired according to its TTL".into());
        }
    }
}

fn check_required_fields(envelope: &Envelope, errors: &mut Vec<String>) {
    if is_blank(&envelope.id) {
        errors.push("Message ID is required and cannot be blank".into());
    }
    if is_blank(&envelope.from) {
        errors.push("From field is required and cannot be blank".into());
    }
    if envelope.payload.is_null() {
        errors.push("Payload is required".into());
    }
}

// Blank values are already reported as missing, so format rules only look at
// non-blank ones.
fn check_field_formats(envelope: &Envelope, errors: &mut Vec<String>) {
    if !is_blank(&envelope.id) && char_len(&envelope.id) < MIN_IDENTIFIER_LEN {
        errors.push(format!(
            "Message ID must be at least {MIN_IDENTIFIER_LEN} characters long"
        ));
    }

    if !is_blank(&envelope.from) && !is_valid_agent_name(&envelope.from) {
        errors.push("From field contains invalid characters".into());
    }

    if let Some(to) = envelope.to.as_deref().filter(|t| !is_blank(t)) {
        if !is_valid_agent_name(to) {
            errors.push("To field contains invalid characters".into());
        }
    }

    if let Some(task_id) = envelope.task_id.as_deref().filter(|t| !is_blank(t)) {
        if char_len(task_id) < MIN_IDENTIFIER_LEN {
            errors.push(format!(
                "Task ID must be at least {MIN_IDENTIFIER_LEN} characters long when provided"
            ));
        }
    }
}

fn check_type_rules(envelope: &Envelope, errors: &mut Vec<String>) {
    match envelope.message_type {
        MessageType::Command => {
            if is_blank_opt(envelope.method.as_deref()) {
                errors.push("Command messages must specify a method".into());
            }
            if is_blank_opt(envelope.to.as_deref()) {
                errors.push("Command messages must specify a target agent (to field)".into());
            }
        }
        MessageType::Reply => {
            if is_blank_opt(envelope.task_id.as_deref()) {
                errors.push("Reply messages must have a task ID for correlation".into());
            }
        }
        MessageType::Event => {
            if envelope.payload.as_str().is_some_and(is_blank) {
                errors.push("Event messages must have meaningful payload content".into());
            }
        }
    }
}

/// Agent names are restricted to `[a-zA-Z0-9._-]+`.
pub fn is_valid_agent_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
}

fn offset(now: DateTime<Utc>, secs: u64, forward: bool) -> Option<DateTime<Utc>> {
    let delta = Duration::try_seconds(i64::try_from(secs).ok()?)?;
    if forward {
        now.checked_add_signed(delta)
    } else {
        now.checked_sub_signed(delta)
    }
}

/// Length in characters, not bytes, ignoring surrounding whitespace.
fn char_len(value: &str) -> usize {
    value.trim().chars().count()
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

fn is_blank_opt(value: Option<&str>) -> bool {
    value.map_or(true, is_blank)
}
