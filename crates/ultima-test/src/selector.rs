//! CSS-like selectors for finding widgets in a tree.
//!
//! Three forms are accepted: `#actions-42` and `[data-testid='actions-42']`
//! match [`Widget::test_id`], `[aria-label='Acciones']` matches
//! [`Widget::accessible_name`].

use thiserror::Error;
use ultima_core::Widget;

/// What a widget must carry to match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// `data-testid`
    TestId(String),
    /// `aria-label`
    AccessibleName(String),
}

impl Selector {
    /// Read a selector.
    ///
    /// # Errors
    ///
    /// Returns an error if the selector is not one of the supported forms.
    pub fn parse(input: &str) -> Result<Self, SelectorError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(SelectorError::Empty);
        }

        if let Some(id) = input.strip_prefix('#') {
            if id.is_empty() {
                return Err(SelectorError::MissingId);
            }
            return Ok(Self::TestId(id.to_string()));
        }

        let Some(body) = input.strip_prefix('[') else {
            let first = input.chars().next().unwrap_or_default();
            return Err(SelectorError::NotAnAttribute(first));
        };
        let body = body
            .strip_suffix(']')
            .ok_or(SelectorError::Unclosed)?;
        let (name, value) = body.split_once('=').ok_or(SelectorError::MissingValue)?;
        let value = value.trim_matches(|c| c == '\'' || c == '"').to_string();

        match name.trim() {
            "data-testid" => Ok(Self::TestId(value)),
            "aria-label" => Ok(Self::AccessibleName(value)),
            other => Err(SelectorError::UnknownAttribute(other.to_string())),
        }
    }

    /// Whether `widget` itself matches. Children are not searched.
    #[must_use]
    pub fn matches(&self, widget: &dyn Widget) -> bool {
        match self {
            Self::TestId(id) => widget.test_id() == Some(id.as_str()),
            Self::AccessibleName(name) => widget.accessible_name() == Some(name.as_str()),
        }
    }
}

/// Why a selector string was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectorError {
    #[error("empty selector")]
    Empty,
    /// `#` with nothing after it
    #[error("'#' must be followed by a test id")]
    MissingId,
    /// Neither `#id` nor `[attr=value]`
    #[error("selectors start with '#' or '[', found '{0}'")]
    NotAnAttribute(char),
    #[error("attribute selector is missing ']'")]
    Unclosed,
    /// `[attr]` without `=value`
    #[error("attribute selector needs a value")]
    MissingValue,
    /// Attribute other than `data-testid` or `aria-label`
    #[error("unsupported attribute: '{0}'")]
    UnknownAttribute(String),
}
