//! Structured descriptions of why two records did not match.
//!
//! Leaf values are flattened into `String` using their `Debug`
//! implementation (or, for nested records, their printer), so an
//! [`Explanation`] can be examined without knowledge of the record types
//! involved.
//!
//! [`Explanation`]: struct.Explanation.html

use core::fmt;

/// How much a matcher reports once it has found a mismatch.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum Report {
    /// Stop at the first mismatching field (or, for repeated fields, the
    /// first mismatching index or the length difference).
    #[default]
    First,
    /// Keep walking and collect every mismatch, including the individual
    /// excess elements behind a length difference.
    All,
}

/// One step in a [`FieldPath`].
///
/// [`FieldPath`]: struct.FieldPath.html
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Segment {
    /// A declared field, by name.
    Field(&'static str),
    /// An element of a repeated field.
    Index(usize),
}

/// Location of a mismatch relative to the record being matched, such as
/// `bar.aa` or `repeated_bar[2].aa`.
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct FieldPath(Vec<Segment>);

impl FieldPath {
    pub fn segments(&self) -> &[Segment] {
        &self.0
    }

    /// Checks whether the path names the record itself rather than one of
    /// its fields.
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub(crate) fn push(&mut self, segment: Segment) {
        self.0.push(segment)
    }

    pub(crate) fn pop(&mut self) {
        self.0.pop();
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            match segment {
                Segment::Field(name) if i == 0 => f.write_str(name)?,
                Segment::Field(name) => write!(f, ".{}", name)?,
                Segment::Index(index) => write!(f, "[{}]", index)?,
            }
        }
        Ok(())
    }
}

/// What differed at a [`Mismatch`]'s path.
///
/// [`Mismatch`]: struct.Mismatch.html
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum MismatchKind {
    /// Two scalar values differ.
    Value { expected: String, actual: String },
    /// Two repeated fields have different lengths.
    Length { expected: usize, actual: usize },
    /// An element of the expected sequence has no counterpart in the actual
    /// one.
    Missing { expected: String },
    /// An element of the actual sequence has no counterpart in the expected
    /// one.
    Unexpected { actual: String },
}

/// A single difference between an expected and an actual record.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Mismatch {
    pub path: FieldPath,
    pub kind: MismatchKind,
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.kind {
            MismatchKind::Value { expected, actual } => {
                write!(f, "{}: expected {}, got {}", self.path, expected, actual)
            }
            MismatchKind::Length { expected, actual } => write!(
                f,
                "{}: expected {} elements, got {}",
                self.path, expected, actual
            ),
            MismatchKind::Missing { expected } => {
                write!(f, "{}: missing expected element {}", self.path, expected)
            }
            MismatchKind::Unexpected { actual } => {
                write!(f, "{}: unexpected element {}", self.path, actual)
            }
        }
    }
}

/// The result of testing an actual record against an expected one.
///
/// An explanation with no mismatches means every declared field matched.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Explanation {
    record: &'static str,
    mismatches: Vec<Mismatch>,
}

impl Explanation {
    pub(crate) fn new(record: &'static str, mismatches: Vec<Mismatch>) -> Self {
        Explanation { record, mismatches }
    }

    /// Name of the record type that was matched.
    pub fn record(&self) -> &'static str {
        self.record
    }

    pub fn is_match(&self) -> bool {
        self.mismatches.is_empty()
    }

    /// Mismatches in the order the matcher found them: declaration order of
    /// fields, then index order within repeated fields.
    pub fn mismatches(&self) -> &[Mismatch] {
        &self.mismatches
    }

    pub fn first(&self) -> Option<&Mismatch> {
        self.mismatches.first()
    }

    pub fn into_mismatches(self) -> Vec<Mismatch> {
        self.mismatches
    }
}

impl fmt::Display for Explanation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.is_match() {
            return write!(f, "{} matches", self.record);
        }
        write!(f, "{} differs:", self.record)?;
        for mismatch in &self.mismatches {
            write!(f, "\n  {}", mismatch)?;
        }
        Ok(())
    }
}
