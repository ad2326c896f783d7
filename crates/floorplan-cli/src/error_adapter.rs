//! Error adapter for converting FloorplanError to miette diagnostics.
//!
//! This module provides the bridge between the library's standard error types
//! and miette's rich diagnostic formatting used in the CLI.
//!
//! JSON documents that fail to parse are reported with a snippet of the
//! document and a label at the position `serde_json` stopped at.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan, SourceSpan};

use floorplan::{
    EntityError, FloorplanError,
    entity::{EntityKind, FacilityType, RoomType},
};

/// Adapter for a JSON document that failed to parse.
///
/// This adapter wraps the [`serde_json::Error`] together with the document
/// and implements [`MietteDiagnostic`] to point at the failing position.
pub struct ParseAdapter<'a> {
    /// The wrapped error
    err: &'a serde_json::Error,
    /// Document text for displaying snippets
    src: &'a str,
}

impl<'a> ParseAdapter<'a> {
    /// Create a new parse adapter.
    pub fn new(err: &'a serde_json::Error, src: &'a str) -> Self {
        Self { err, src }
    }

    /// Returns the byte span `serde_json` reported, clamped to the document.
    fn span(&self) -> SourceSpan {
        let offset = byte_offset(self.src, self.err.line(), self.err.column());
        let len = usize::from(offset < self.src.len());
        SourceSpan::new(offset.into(), len)
    }
}

impl fmt::Debug for ParseAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParseAdapter")
            .field("err", &self.err)
            .finish()
    }
}

impl fmt::Display for ParseAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid JSON document: {}", self.err)
    }
}

impl std::error::Error for ParseAdapter<'_> {}

impl MietteDiagnostic for ParseAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new("floorplan::parse"))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        if self.err.is_data() {
            Some(Box::new(
                "the document is valid JSON but a field has the wrong shape or value",
            ))
        } else {
            None
        }
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&self.src as &dyn miette::SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let label = LabeledSpan::new_primary_with_span(Some("here".to_string()), self.span());
        Some(Box::new(std::iter::once(label)))
    }
}

/// Adapter for non-diagnostic [`FloorplanError`] variants.
///
/// This adapter handles errors that don't carry a source document, such as
/// I/O errors, configuration errors and invalid edits.
pub struct ErrorAdapter<'a>(pub &'a FloorplanError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            FloorplanError::Io(_) => "floorplan::io",
            FloorplanError::Json(_) => "floorplan::json",
            FloorplanError::Parse { .. } => "floorplan::parse",
            FloorplanError::Config(_) => "floorplan::config",
            FloorplanError::Entity(_) => "floorplan::entity",
            FloorplanError::UnknownEntity(_) => "floorplan::unknown_entity",
            FloorplanError::DuplicateEntity(_) => "floorplan::duplicate_entity",
            FloorplanError::Resize(_) => "floorplan::resize",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let help = match &self.0 {
            FloorplanError::Entity(EntityError::UnknownType(_)) => format!(
                "room types: {}; facility types: {}",
                type_list(RoomType::ALL.iter().map(|t| t.as_str())),
                type_list(FacilityType::ALL.iter().map(|t| t.as_str())),
            ),
            FloorplanError::Entity(EntityError::KindMismatch { kind, .. }) => match kind {
                EntityKind::Room => format!(
                    "room types: {}",
                    type_list(RoomType::ALL.iter().map(|t| t.as_str()))
                ),
                EntityKind::Facility => format!(
                    "facility types: {}",
                    type_list(FacilityType::ALL.iter().map(|t| t.as_str()))
                ),
            },
            FloorplanError::UnknownEntity(_) => {
                "use the `show` command to list placed entities".to_string()
            }
            FloorplanError::DuplicateEntity(_) => {
                "ids are unique per kind; pick another id or remove the existing entity"
                    .to_string()
            }
            _ => return None,
        };
        Some(Box::new(help))
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        None
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        None
    }
}

/// A reportable error that can be rendered by miette.
///
/// This enum wraps either a parse diagnostic or a non-diagnostic error,
/// providing a uniform interface for error rendering.
#[derive(Debug)]
pub enum Reportable<'a> {
    /// A JSON parse failure with its document.
    Diagnostic(ParseAdapter<'a>),
    /// A simple error without source location.
    Error(ErrorAdapter<'a>),
}

impl fmt::Display for Reportable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reportable::Diagnostic(d) => fmt::Display::fmt(d, f),
            Reportable::Error(e) => fmt::Display::fmt(e, f),
        }
    }
}

impl std::error::Error for Reportable<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Reportable::Diagnostic(_) => None,
            Reportable::Error(e) => e.source(),
        }
    }
}

impl MietteDiagnostic for Reportable<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Diagnostic(d) => d.code(),
            Reportable::Error(e) => e.code(),
        }
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Diagnostic(d) => d.help(),
            Reportable::Error(e) => e.help(),
        }
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        match self {
            Reportable::Diagnostic(d) => d.source_code(),
            Reportable::Error(e) => e.source_code(),
        }
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        match self {
            Reportable::Diagnostic(d) => d.labels(),
            Reportable::Error(e) => e.labels(),
        }
    }
}

/// Convert a [`FloorplanError`] into a list of reportable errors.
///
/// [`FloorplanError::Parse`] becomes a [`Reportable::Diagnostic`] pointing
/// into the document; every other variant becomes a single
/// [`Reportable::Error`].
pub fn to_reportables(err: &FloorplanError) -> Vec<Reportable<'_>> {
    match err {
        FloorplanError::Parse { err, src } => {
            vec![Reportable::Diagnostic(ParseAdapter::new(err, src))]
        }
        _ => vec![Reportable::Error(ErrorAdapter(err))],
    }
}

fn type_list<'a>(names: impl Iterator<Item = &'a str>) -> String {
    names.collect::<Vec<_>>().join(", ")
}

/// Converts a 1-based line and column into a byte offset within `src`.
///
/// `serde_json` reports column 0 when it stops at the start of a line.
fn byte_offset(src: &str, line: usize, column: usize) -> usize {
    let line_start: usize = src
        .split_inclusive('\n')
        .take(line.saturating_sub(1))
        .map(str::len)
        .sum();
    (line_start + column.saturating_sub(1)).min(src.len())
}
