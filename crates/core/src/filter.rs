//! Filter criteria value objects used to build engine list queries.
//!
//! Each searchable field position carries a string template. A criteria is
//! constructed with a fixed template count; replacing the templates with a
//! sequence of a different length fails with [`FilterFormatError`]. The
//! concrete kinds add per-kind template validation and an in-process
//! predicate over typed field values, used by the in-memory engine and by
//! the executor/process list views.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::Timestamp;

/// Errors raised when filter templates are malformed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
pub enum FilterFormatError {
    /// The replacement sequence length does not equal the fixed count.
    #[error("Incorrect filter template count: expected {expected}, got {actual}")]
    TemplateCount { expected: usize, actual: usize },

    /// A template's content is not valid for the criteria kind.
    #[error("Filter template '{template}' is not a valid {expected}")]
    BadTemplate { template: String, expected: String },
}

fn bad_template(template: &str, expected: &str) -> FilterFormatError {
    FilterFormatError::BadTemplate {
        template: template.to_string(),
        expected: expected.to_string(),
    }
}

// ---------------------------------------------------------------------------
// FilterTemplates
// ---------------------------------------------------------------------------

/// Fixed-size ordered sequence of string templates, one per searchable
/// field position.
///
/// The count is fixed at construction; [`FilterTemplates::apply`] rejects
/// replacement sequences of any other length. Equality and hashing are
/// structural over the stored sequence.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FilterTemplates {
    templates: Vec<String>,
    templates_count: usize,
}

impl FilterTemplates {
    /// All templates empty; the count is fixed to `templates_count`.
    pub fn empty(templates_count: usize) -> Self {
        Self {
            templates: vec![String::new(); templates_count],
            templates_count,
        }
    }

    /// Count fixed to the initial sequence length.
    pub fn new(templates: Vec<String>) -> Self {
        let templates_count = templates.len();
        Self {
            templates,
            templates_count,
        }
    }

    pub fn count(&self) -> usize {
        self.templates_count
    }

    pub fn all(&self) -> &[String] {
        &self.templates
    }

    pub fn get(&self, position: usize) -> &str {
        &self.templates[position]
    }

    /// Replace the stored sequence. Fails when the replacement length
    /// differs from the count fixed at construction.
    pub fn apply(&mut self, new_templates: Vec<String>) -> Result<(), FilterFormatError> {
        if new_templates.len() != self.templates_count {
            return Err(FilterFormatError::TemplateCount {
                expected: self.templates_count,
                actual: new_templates.len(),
            });
        }
        self.templates = new_templates;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Field values
// ---------------------------------------------------------------------------

/// Typed value of a searchable field, fed to criteria predicates.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Long(i64),
    Date(Timestamp),
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Long(value)
    }
}

impl From<Timestamp> for FieldValue {
    fn from(value: Timestamp) -> Self {
        FieldValue::Date(value)
    }
}

// ---------------------------------------------------------------------------
// Concrete criteria kinds
// ---------------------------------------------------------------------------

/// Single-template criteria matching text fields with `*` (any run) and
/// `?` (any single character) wildcards, case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StringFilterCriteria {
    templates: FilterTemplates,
}

impl StringFilterCriteria {
    pub const TEMPLATES_COUNT: usize = 1;

    pub fn new(template: impl Into<String>) -> Self {
        Self {
            templates: FilterTemplates::new(vec![template.into()]),
        }
    }

    pub fn templates(&self) -> &FilterTemplates {
        &self.templates
    }

    pub fn apply_templates(&mut self, new: Vec<String>) -> Result<(), FilterFormatError> {
        self.templates.apply(new)
    }

    pub fn matches(&self, value: &FieldValue) -> bool {
        let FieldValue::Text(text) = value else {
            return false;
        };
        wildcard_matches(self.templates.get(0), text)
    }
}

impl Default for StringFilterCriteria {
    fn default() -> Self {
        Self {
            templates: FilterTemplates::empty(Self::TEMPLATES_COUNT),
        }
    }
}

/// Translate a wildcard template into an anchored case-insensitive regex
/// and test `text` against it. An empty template matches everything.
fn wildcard_matches(template: &str, text: &str) -> bool {
    if template.is_empty() {
        return true;
    }
    let mut pattern = String::from("(?i)^");
    for chunk in template.split_inclusive(['*', '?']) {
        match chunk.chars().last() {
            Some('*') => {
                pattern.push_str(&regex::escape(&chunk[..chunk.len() - 1]));
                pattern.push_str(".*");
            }
            Some('?') => {
                pattern.push_str(&regex::escape(&chunk[..chunk.len() - 1]));
                pattern.push('.');
            }
            _ => pattern.push_str(&regex::escape(chunk)),
        }
    }
    pattern.push('$');
    // The pattern is built from an escaped template, compilation cannot fail.
    regex::Regex::new(&pattern)
        .map(|re| re.is_match(text))
        .unwrap_or(false)
}

/// Single-template criteria matching text fields by case-insensitive
/// containment, wherever the term appears.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubstringFilterCriteria {
    templates: FilterTemplates,
}

impl SubstringFilterCriteria {
    pub const TEMPLATES_COUNT: usize = 1;

    pub fn new(term: impl Into<String>) -> Self {
        Self {
            templates: FilterTemplates::new(vec![term.into()]),
        }
    }

    pub fn templates(&self) -> &FilterTemplates {
        &self.templates
    }

    pub fn apply_templates(&mut self, new: Vec<String>) -> Result<(), FilterFormatError> {
        self.templates.apply(new)
    }

    pub fn matches(&self, value: &FieldValue) -> bool {
        let FieldValue::Text(text) = value else {
            return false;
        };
        text.to_lowercase()
            .contains(&self.templates.get(0).to_lowercase())
    }
}

/// Two-template criteria bounding an integer field inclusively from below
/// and above. An empty template means unbounded on that side.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LongRangeFilterCriteria {
    templates: FilterTemplates,
}

impl LongRangeFilterCriteria {
    pub const TEMPLATES_COUNT: usize = 2;

    pub fn new(from: Option<i64>, to: Option<i64>) -> Self {
        let bound = |b: Option<i64>| b.map(|v| v.to_string()).unwrap_or_default();
        Self {
            templates: FilterTemplates::new(vec![bound(from), bound(to)]),
        }
    }

    pub fn templates(&self) -> &FilterTemplates {
        &self.templates
    }

    pub fn apply_templates(&mut self, new: Vec<String>) -> Result<(), FilterFormatError> {
        for template in &new {
            if !template.is_empty() && template.parse::<i64>().is_err() {
                return Err(bad_template(template, "integer"));
            }
        }
        self.templates.apply(new)
    }

    pub fn matches(&self, value: &FieldValue) -> bool {
        let FieldValue::Long(n) = value else {
            return false;
        };
        let parse = |t: &str| t.parse::<i64>().ok();
        // Unparseable templates (possible after deserialization) act as
        // unbounded sides rather than rejecting every value.
        let from = parse(self.templates.get(0));
        let to = parse(self.templates.get(1));
        from.is_none_or(|f| *n >= f) && to.is_none_or(|t| *n <= t)
    }
}

/// Two-template criteria bounding a date field inclusively; templates are
/// RFC 3339 timestamps, empty meaning unbounded.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRangeFilterCriteria {
    templates: FilterTemplates,
}

impl DateRangeFilterCriteria {
    pub const TEMPLATES_COUNT: usize = 2;

    pub fn new(from: Option<Timestamp>, to: Option<Timestamp>) -> Self {
        let bound = |b: Option<Timestamp>| b.map(|v| v.to_rfc3339()).unwrap_or_default();
        Self {
            templates: FilterTemplates::new(vec![bound(from), bound(to)]),
        }
    }

    pub fn templates(&self) -> &FilterTemplates {
        &self.templates
    }

    pub fn apply_templates(&mut self, new: Vec<String>) -> Result<(), FilterFormatError> {
        for template in &new {
            if !template.is_empty() && DateTime::parse_from_rfc3339(template).is_err() {
                return Err(bad_template(template, "RFC 3339 timestamp"));
            }
        }
        self.templates.apply(new)
    }

    pub fn matches(&self, value: &FieldValue) -> bool {
        let FieldValue::Date(d) = value else {
            return false;
        };
        let parse = |t: &str| {
            DateTime::parse_from_rfc3339(t)
                .ok()
                .map(|dt| dt.with_timezone(&Utc))
        };
        let from = parse(self.templates.get(0));
        let to = parse(self.templates.get(1));
        from.is_none_or(|f| *d >= f) && to.is_none_or(|t| *d <= t)
    }
}

// ---------------------------------------------------------------------------
// FieldFilter union
// ---------------------------------------------------------------------------

/// Union of the concrete criteria kinds, as stored in a batch presentation
/// and sent over the wire.
///
/// Two filters of the same kind with equal template sequences compare equal
/// and hash equally; filters of different kinds never compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldFilter {
    Text(StringFilterCriteria),
    Substring(SubstringFilterCriteria),
    LongRange(LongRangeFilterCriteria),
    DateRange(DateRangeFilterCriteria),
}

impl FieldFilter {
    pub fn templates(&self) -> &FilterTemplates {
        match self {
            FieldFilter::Text(c) => c.templates(),
            FieldFilter::Substring(c) => c.templates(),
            FieldFilter::LongRange(c) => c.templates(),
            FieldFilter::DateRange(c) => c.templates(),
        }
    }

    pub fn apply_templates(&mut self, new: Vec<String>) -> Result<(), FilterFormatError> {
        match self {
            FieldFilter::Text(c) => c.apply_templates(new),
            FieldFilter::Substring(c) => c.apply_templates(new),
            FieldFilter::LongRange(c) => c.apply_templates(new),
            FieldFilter::DateRange(c) => c.apply_templates(new),
        }
    }

    pub fn matches(&self, value: &FieldValue) -> bool {
        match self {
            FieldFilter::Text(c) => c.matches(value),
            FieldFilter::Substring(c) => c.matches(value),
            FieldFilter::LongRange(c) => c.matches(value),
            FieldFilter::DateRange(c) => c.matches(value),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
