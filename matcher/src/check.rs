//! Assertion support: a matcher and printer paired into one failure message.

use std::sync::Arc;

use thiserror::Error;

use crate::{Explanation, Matcher, Printer};

/// Compares records of type `R` and produces a self-contained failure when
/// they differ. Obtained from [`Registry::checker`].
///
/// [`Registry::checker`]: struct.Registry.html#method.checker
#[derive(Debug)]
pub struct Checker<R> {
    matcher: Arc<Matcher<R>>,
    printer: Arc<Printer<R>>,
    pretty: bool,
}

impl<R: 'static> Checker<R> {
    pub(crate) fn new(
        matcher: Arc<Matcher<R>>,
        printer: Arc<Printer<R>>,
        pretty: bool,
    ) -> Self {
        Checker {
            matcher,
            printer,
            pretty,
        }
    }

    pub fn matcher(&self) -> &Matcher<R> {
        &self.matcher
    }

    pub fn printer(&self) -> &Printer<R> {
        &self.printer
    }

    /// Succeeds if `actual` matches `expected`; otherwise renders both
    /// records and explains the difference.
    pub fn check(&self, expected: &R, actual: &R) -> Result<(), MatchFailure> {
        if self.matcher.matches(expected, actual) {
            return Ok(());
        }
        let render = |value: &R| {
            if self.pretty {
                self.printer.render_pretty(value)
            } else {
                self.printer.render(value)
            }
        };
        Err(MatchFailure {
            record: self.matcher.name(),
            expected: render(expected),
            actual: render(actual),
            explanation: self.matcher.test(expected, actual),
        })
    }
}

/// Two records that were expected to match but did not.
#[derive(Clone, Debug, Error)]
#[error("{record} mismatch\nexpected: {expected}\n  actual: {actual}\n{explanation}")]
pub struct MatchFailure {
    pub record: &'static str,
    pub expected: String,
    pub actual: String,
    pub explanation: Explanation,
}

/// Asserts that two records match according to the matcher registered for
/// their type, panicking with both renderings and the explanation otherwise.
///
/// ```
/// use fieldwise::{assert_record_eq, FieldSet, Registry};
///
/// struct Point { x: i32, y: i32, label: String }
///
/// let mut registry = Registry::new();
/// registry.register(
///     FieldSet::<Point>::new("Point")
///         .scalar("x", |p| &p.x)
///         .scalar("y", |p| &p.y),
/// )?;
///
/// // `label` is not declared, so it doesn't take part.
/// assert_record_eq!(
///     registry,
///     &Point { x: 1, y: 2, label: "a".into() },
///     &Point { x: 1, y: 2, label: "b".into() },
/// );
/// # Ok::<(), fieldwise::BuildError>(())
/// ```
#[macro_export]
macro_rules! assert_record_eq {
    ($registry:expr, $expected:expr, $actual:expr $(,)?) => {
        match $registry.checker() {
            Ok(checker) => {
                if let Err(failure) = checker.check($expected, $actual) {
                    panic!("{}", failure);
                }
            }
            Err(err) => panic!("{}", err),
        }
    };
}
