//! Typed field selectors
//!
//! Each extracted field is declared once as a [`FieldSelector`]: the CSS path
//! that locates it, which match to take, how to read a value off the element,
//! and whether its absence is fatal. Extraction failures are therefore
//! enumerable: a required selector that finds nothing yields
//! `ExtractionError::MissingField` naming exactly that field.

use crate::extract::Field;
use crate::ExtractionError;
use scraper::{ElementRef, Html, Selector};

/// How a value is read from the matched element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Read {
    /// Concatenated text content, trimmed
    Text,
    /// First class token other than the given one (e.g. `star-rating Three` → `Three`)
    ClassTokenExcept(&'static str),
    /// Attribute value, trimmed; an empty attribute counts as absent
    Attr(&'static str),
}

/// Whether a field's absence fails the whole page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    Required,
    /// Absence yields the sentinel text instead of an error
    Optional { sentinel: &'static str },
}

/// Declarative definition of one extracted field
#[derive(Debug, Clone, Copy)]
pub struct FieldSelector {
    pub field: Field,
    pub css: &'static str,
    /// Which match to take (0 = first)
    pub nth: usize,
    pub read: Read,
    pub requirement: Requirement,
}

impl FieldSelector {
    /// Evaluates the selector against a document
    pub fn extract(&self, document: &Html) -> Result<String, ExtractionError> {
        let selector = compile(self.field, self.css)?;

        let value = document
            .select(&selector)
            .nth(self.nth)
            .and_then(|element| read_value(element, self.read));

        match (value, self.requirement) {
            (Some(value), _) => Ok(value),
            (None, Requirement::Optional { sentinel }) => Ok(sentinel.to_string()),
            (None, Requirement::Required) => {
                Err(ExtractionError::MissingField { field: self.field })
            }
        }
    }
}

/// Compiles a CSS selector, attributing failures to `field`
pub fn compile(field: Field, css: &str) -> Result<Selector, ExtractionError> {
    Selector::parse(css).map_err(|e| ExtractionError::InvalidSelector {
        field,
        css: css.to_string(),
        message: format!("{:?}", e),
    })
}

/// Trimmed text content of an element
pub fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

fn read_value(element: ElementRef<'_>, read: Read) -> Option<String> {
    match read {
        Read::Text => Some(element_text(element)),
        Read::ClassTokenExcept(base) => element
            .value()
            .classes()
            .find(|class| *class != base)
            .map(str::to_string),
        Read::Attr(name) => element
            .value()
            .attr(name)
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string),
    }
}
