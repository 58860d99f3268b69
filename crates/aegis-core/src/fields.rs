//! Response input fields and their validation.
//!
//! [`ResponseDraft`] is the untyped form (straight from JSON or CLI flags).
//! [`ResponseFields`] is the typed form stored by the upsert. Both paths
//! collect every rejected field into one [`ValidationErrors`] so the caller
//! can fix them all at once; nothing is written unless validation passes.

use serde::{Deserialize, Serialize};

use crate::enums::ComplianceStatus;
use crate::errors::{CoreError, ValidationErrors};

pub const MIN_MATURITY: u8 = 1;
pub const MAX_MATURITY: u8 = 5;

/// Typed response fields written by an upsert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseFields {
    pub compliance_status: ComplianceStatus,
    pub maturity_level: Option<u8>,
    pub gaps: Option<String>,
    pub recommendations: Option<String>,
    pub notes: Option<String>,
}

impl ResponseFields {
    /// Check maturity range and free-text lengths.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` listing every offending field.
    pub fn check(&self, max_text_len: usize) -> Result<(), CoreError> {
        let mut errors = ValidationErrors::default();
        if let Some(level) = self.maturity_level {
            check_maturity(i64::from(level), &mut errors);
        }
        self.check_text(max_text_len, &mut errors);
        errors.into_result()
    }

    fn check_text(&self, max_text_len: usize, errors: &mut ValidationErrors) {
        for (field, value) in [
            ("gaps", &self.gaps),
            ("recommendations", &self.recommendations),
            ("notes", &self.notes),
        ] {
            if let Some(text) = value {
                let len = text.chars().count();
                if len > max_text_len {
                    errors.push(
                        field,
                        format!("{len} characters exceeds the limit of {max_text_len}"),
                    );
                }
            }
        }
    }
}

fn check_maturity(level: i64, errors: &mut ValidationErrors) {
    if !(i64::from(MIN_MATURITY)..=i64::from(MAX_MATURITY)).contains(&level) {
        errors.push(
            "maturityLevel",
            format!("{level} is outside {MIN_MATURITY}..={MAX_MATURITY}"),
        );
    }
}

/// Untyped response input, as submitted by a caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseDraft {
    pub compliance_status: String,
    #[serde(default)]
    pub maturity_level: Option<i64>,
    #[serde(default)]
    pub gaps: Option<String>,
    #[serde(default)]
    pub recommendations: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl ResponseDraft {
    /// Parse and validate into [`ResponseFields`].
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` listing every rejected field.
    pub fn validate(self, max_text_len: usize) -> Result<ResponseFields, CoreError> {
        let mut errors = ValidationErrors::default();

        let status = match self.compliance_status.parse::<ComplianceStatus>() {
            Ok(status) => Some(status),
            Err(CoreError::Validation(e)) => {
                errors.0.extend(e.0);
                None
            }
            Err(other) => return Err(other),
        };

        let maturity = match self.maturity_level {
            Some(level) => {
                check_maturity(level, &mut errors);
                u8::try_from(level).ok()
            }
            None => None,
        };

        let fields = ResponseFields {
            compliance_status: status.unwrap_or(ComplianceStatus::NotAssessed),
            maturity_level: maturity,
            gaps: self.gaps,
            recommendations: self.recommendations,
            notes: self.notes,
        };
        fields.check_text(max_text_len, &mut errors);

        errors.into_result()?;
        Ok(fields)
    }
}

/// Builder for [`ResponseFields`].
pub struct ResponseFieldsBuilder(ResponseFields);

impl ResponseFieldsBuilder {
    #[must_use]
    pub const fn new(status: ComplianceStatus) -> Self {
        Self(ResponseFields {
            compliance_status: status,
            maturity_level: None,
            gaps: None,
            recommendations: None,
            notes: None,
        })
    }

    #[must_use]
    pub const fn maturity(mut self, level: u8) -> Self {
        self.0.maturity_level = Some(level);
        self
    }

    #[must_use]
    pub fn gaps(mut self, gaps: impl Into<String>) -> Self {
        self.0.gaps = Some(gaps.into());
        self
    }

    #[must_use]
    pub fn recommendations(mut self, recommendations: impl Into<String>) -> Self {
        self.0.recommendations = Some(recommendations.into());
        self
    }

    #[must_use]
    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.0.notes = Some(notes.into());
        self
    }

    #[must_use]
    pub fn build(self) -> ResponseFields {
        self.0
    }
}
