//! Optional LLM tuning parameters and the edit/validation rules applied to
//! them before a request is allowed out the door.
//!
//! Absence is meaningful: an unset field is omitted from the serialized
//! object entirely so the backend falls back to its own defaults. Clearing a
//! field therefore never writes a zero or an empty string.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum::{Display, EnumString};

use crate::error::ValidationError;

pub const TEMPERATURE_MIN: f64 = 0.0;
pub const TEMPERATURE_MAX: f64 = 2.0;
pub const MAX_TOKENS_MIN: u32 = 100;
pub const MAX_TOKENS_MAX: u32 = 32_000;
pub const TOP_P_MIN: f64 = 0.0;
pub const TOP_P_MAX: f64 = 1.0;
pub const CONTEXT_LENGTH_MIN: u32 = 512;
pub const CONTEXT_LENGTH_MAX: u32 = 128_000;

/// Tuning overrides sent with an anonymization request. Every field is
/// independently optional; `context_length` only means anything to the
/// local/ollama provider class but may be sent regardless.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct LlmParameters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_length: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_name: Option<String>,
}

/// The closed set of editable parameter fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ParamField {
    Temperature,
    MaxTokens,
    TopP,
    ContextLength,
    ModelName,
}

impl ParamField {
    /// Parse a CLI-supplied field name, rejecting anything outside the set.
    pub fn parse(name: &str) -> Result<Self, ValidationError> {
        Self::from_str(name.trim()).map_err(|_| ValidationError::UnknownField(name.to_string()))
    }
}

impl LlmParameters {
    pub fn is_empty(&self) -> bool {
        self.temperature.is_none()
            && self.max_tokens.is_none()
            && self.top_p.is_none()
            && self.context_length.is_none()
            && self.model_name.is_none()
    }

    /// Apply one field edit. Empty (or whitespace-only) input clears the
    /// field to absent; numeric fields reject malformed or out-of-range
    /// input instead of storing it.
    pub fn apply_edit(&mut self, field: ParamField, raw: &str) -> Result<(), ValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            self.clear(field);
            return Ok(());
        }
        match field {
            ParamField::Temperature => {
                self.temperature =
                    Some(parse_float(field, trimmed, TEMPERATURE_MIN, TEMPERATURE_MAX)?);
            }
            ParamField::MaxTokens => {
                self.max_tokens = Some(parse_int(field, trimmed, MAX_TOKENS_MIN, MAX_TOKENS_MAX)?);
            }
            ParamField::TopP => {
                self.top_p = Some(parse_float(field, trimmed, TOP_P_MIN, TOP_P_MAX)?);
            }
            ParamField::ContextLength => {
                self.context_length = Some(parse_int(
                    field,
                    trimmed,
                    CONTEXT_LENGTH_MIN,
                    CONTEXT_LENGTH_MAX,
                )?);
            }
            ParamField::ModelName => {
                self.model_name = Some(trimmed.to_string());
            }
        }
        Ok(())
    }

    pub fn clear(&mut self, field: ParamField) {
        match field {
            ParamField::Temperature => self.temperature = None,
            ParamField::MaxTokens => self.max_tokens = None,
            ParamField::TopP => self.top_p = None,
            ParamField::ContextLength => self.context_length = None,
            ParamField::ModelName => self.model_name = None,
        }
    }

    /// Return every field to absent in one step.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Check every present field against its allowed range. Fields set
    /// through [`apply_edit`](Self::apply_edit) are already in range; this
    /// covers values assigned directly.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(value) = self.temperature {
            check_float(
                ParamField::Temperature,
                value,
                TEMPERATURE_MIN,
                TEMPERATURE_MAX,
            )?;
        }
        if let Some(value) = self.max_tokens {
            check_int(ParamField::MaxTokens, value, MAX_TOKENS_MIN, MAX_TOKENS_MAX)?;
        }
        if let Some(value) = self.top_p {
            check_float(ParamField::TopP, value, TOP_P_MIN, TOP_P_MAX)?;
        }
        if let Some(value) = self.context_length {
            check_int(
                ParamField::ContextLength,
                value,
                CONTEXT_LENGTH_MIN,
                CONTEXT_LENGTH_MAX,
            )?;
        }
        Ok(())
    }
}

fn parse_float(
    field: ParamField,
    raw: &str,
    min: f64,
    max: f64,
) -> Result<f64, ValidationError> {
    let value: f64 = raw.parse().map_err(|_| ValidationError::NotNumeric {
        field: field.to_string(),
        value: raw.to_string(),
    })?;
    check_float(field, value, min, max)?;
    Ok(value)
}

fn check_float(field: ParamField, value: f64, min: f64, max: f64) -> Result<(), ValidationError> {
    if !value.is_finite() || value < min || value > max {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            value: format!("{:?}", value),
            min: format!("{:?}", min),
            max: format!("{:?}", max),
        });
    }
    Ok(())
}

fn parse_int(field: ParamField, raw: &str, min: u32, max: u32) -> Result<u32, ValidationError> {
    let value: u32 = raw.parse().map_err(|_| ValidationError::NotNumeric {
        field: field.to_string(),
        value: raw.to_string(),
    })?;
    check_int(field, value, min, max)?;
    Ok(value)
}

fn check_int(field: ParamField, value: u32, min: u32, max: u32) -> Result<(), ValidationError> {
    if value < min || value > max {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            value: value.to_string(),
            min: min.to_string(),
            max: max.to_string(),
        });
    }
    Ok(())
}
