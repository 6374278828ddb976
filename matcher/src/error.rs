use thiserror::Error;

/// Reasons a matcher, printer, or whole schema could not be constructed.
///
/// These are setup failures. A record that simply doesn't match is reported
/// through an [`Explanation`], never through this type.
///
/// [`Explanation`]: struct.Explanation.html
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum BuildError {
    /// Looked up the artifacts for a record type that was never registered.
    #[error("type `{record}` has not been registered")]
    NotRegistered { record: &'static str },

    /// A nested or repeated-nested field refers to a record type whose
    /// artifacts do not exist yet.
    #[error(
        "field `{record}.{field}` refers to type `{dependency}`, \
         which has not been registered yet"
    )]
    Unresolved {
        record: &'static str,
        field: &'static str,
        dependency: &'static str,
    },

    /// The same record type was registered twice.
    #[error("record `{record}` is registered more than once")]
    DuplicateRecord { record: &'static str },

    /// A field set declares the same field name twice.
    #[error("record `{record}` declares field `{field}` more than once")]
    DuplicateField {
        record: &'static str,
        field: &'static str,
    },

    /// The "contains a field of type" relation has a cycle, so no
    /// construction order exists. Lists every record left unordered.
    #[error("records {records:?} contain each other and cannot be ordered")]
    Cycle { records: Vec<&'static str> },
}
