//! Deep equality over declared fields.

use core::fmt;
use std::sync::Arc;

use itertools::{EitherOrBoth, Itertools};

use crate::field::{
    Extract, NestedAccess, RepeatedAccess, RepeatedNestedAccess, ScalarAccess,
};
use crate::{
    Explanation, FieldPath, Mismatch, MismatchKind, Printer, Report, Scalar,
    Segment,
};

/// A structural equality predicate for record type `R`.
///
/// A matcher compares only the fields declared in the [`FieldSet`] it was
/// built from; anything else on the record is ignored. Scalar fields compare
/// exactly, nested fields delegate to the nested type's matcher, and repeated
/// fields compare pairwise: equal length, and element `i` against element `i`.
///
/// Matchers are built by a [`Registry`] and are immutable afterwards, so one
/// matcher can be shared freely between threads.
///
/// [`FieldSet`]: struct.FieldSet.html
/// [`Registry`]: struct.Registry.html
pub struct Matcher<R> {
    name: &'static str,
    report: Report,
    fields: Vec<(&'static str, Arc<dyn FieldMatcher<R>>)>,
}

impl<R: 'static> Matcher<R> {
    pub(crate) fn new(
        name: &'static str,
        report: Report,
        fields: Vec<(&'static str, Arc<dyn FieldMatcher<R>>)>,
    ) -> Self {
        Matcher {
            name,
            report,
            fields,
        }
    }

    /// Name of the record type this matcher compares.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Names of the declared fields, in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|(name, _)| *name)
    }

    /// How much [`test`] reports by default.
    ///
    /// [`test`]: #method.test
    pub fn report(&self) -> Report {
        self.report
    }

    /// Checks whether every declared field of `actual` matches `expected`.
    ///
    /// This stops at the first difference and doesn't format anything, so it
    /// is the cheap way to ask the question.
    pub fn matches(&self, expected: &R, actual: &R) -> bool {
        let mut walk = Walk::detect();
        self.walk(expected, actual, &mut walk);
        !walk.failed
    }

    /// Compares `actual` against `expected` and explains any differences,
    /// reporting as much as this matcher's [`Report`] setting asks for.
    ///
    /// [`Report`]: enum.Report.html
    pub fn test(&self, expected: &R, actual: &R) -> Explanation {
        self.test_with(expected, actual, self.report)
    }

    /// Like [`test`], with an explicit [`Report`] setting.
    ///
    /// [`test`]: #method.test
    /// [`Report`]: enum.Report.html
    pub fn test_with(
        &self,
        expected: &R,
        actual: &R,
        report: Report,
    ) -> Explanation {
        let mut walk = Walk::collect(report);
        self.walk(expected, actual, &mut walk);
        Explanation::new(self.name, walk.found)
    }

    /// Adapts this matcher to a predicate over `(expected, actual)` pairs,
    /// for use with iterator adaptors over zipped sequences.
    pub fn pair(&self) -> impl Fn((&R, &R)) -> bool + '_ {
        move |(expected, actual): (&R, &R)| self.matches(expected, actual)
    }

    pub(crate) fn walk(&self, expected: &R, actual: &R, walk: &mut Walk) {
        for (name, field) in &self.fields {
            walk.path.push(Segment::Field(*name));
            field.walk(expected, actual, walk);
            walk.path.pop();
            if walk.done() {
                break;
            }
        }
    }
}

impl<R> fmt::Debug for Matcher<R> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Matcher")
            .field("name", &self.name)
            .field("report", &self.report)
            .field(
                "fields",
                &self.fields.iter().map(|(name, _)| name).collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// One declared field's contribution to a record matcher.
pub(crate) trait FieldMatcher<R>: Send + Sync {
    fn walk(&self, expected: &R, actual: &R, walk: &mut Walk);
}

#[derive(Copy, Clone, Debug)]
enum Mode {
    /// Only find out whether there is a difference.
    Detect,
    /// Describe differences.
    Collect(Report),
}

/// State threaded through a matcher while it compares two records.
pub(crate) struct Walk {
    mode: Mode,
    path: FieldPath,
    found: Vec<Mismatch>,
    failed: bool,
}

impl Walk {
    fn detect() -> Self {
        Walk::new(Mode::Detect)
    }

    fn collect(report: Report) -> Self {
        Walk::new(Mode::Collect(report))
    }

    fn new(mode: Mode) -> Self {
        Walk {
            mode,
            path: FieldPath::default(),
            found: vec![],
            failed: false,
        }
    }

    /// Checks whether there is no point in looking any further.
    fn done(&self) -> bool {
        self.failed && !matches!(self.mode, Mode::Collect(Report::All))
    }

    /// Notes a difference at the current path. `kind` is only evaluated when
    /// differences are being described.
    fn mismatch<F>(&mut self, kind: F)
    where
        F: FnOnce() -> MismatchKind,
    {
        self.failed = true;
        if let Mode::Collect(_) = self.mode {
            self.found.push(Mismatch {
                path: self.path.clone(),
                kind: kind(),
            });
        }
    }

    fn scalar<V: Scalar>(&mut self, expected: &V, actual: &V) {
        if !V::same(expected, actual) {
            self.mismatch(|| MismatchKind::Value {
                expected: format!("{:?}", expected),
                actual: format!("{:?}", actual),
            });
        }
    }

    /// Compares two sequences element by element, in order.
    fn pairwise<T, C>(&mut self, expected: &[T], actual: &[T], elements: &C)
    where
        C: Elements<T> + ?Sized,
    {
        if expected.len() != actual.len() {
            self.mismatch(|| MismatchKind::Length {
                expected: expected.len(),
                actual: actual.len(),
            });
            if self.done() {
                return;
            }
        }

        for (i, pair) in expected.iter().zip_longest(actual).enumerate() {
            self.path.push(Segment::Index(i));
            match pair {
                EitherOrBoth::Both(e, a) => elements.compare(self, e, a),
                EitherOrBoth::Left(e) => self.mismatch(|| MismatchKind::Missing {
                    expected: elements.show(e),
                }),
                EitherOrBoth::Right(a) => {
                    self.mismatch(|| MismatchKind::Unexpected {
                        actual: elements.show(a),
                    })
                }
            }
            self.path.pop();
            if self.done() {
                break;
            }
        }
    }
}

/// How the elements of a repeated field are compared and shown.
trait Elements<T> {
    fn compare(&self, walk: &mut Walk, expected: &T, actual: &T);

    fn show(&self, value: &T) -> String;
}

struct ScalarElements;

impl<V: Scalar> Elements<V> for ScalarElements {
    fn compare(&self, walk: &mut Walk, expected: &V, actual: &V) {
        walk.scalar(expected, actual)
    }

    fn show(&self, value: &V) -> String {
        format!("{:?}", value)
    }
}

////////////////////////////////////////////////////////////////////////////////
// Field shapes

impl<R, E, V> FieldMatcher<R> for ScalarAccess<E, V>
where
    E: Extract<R, V>,
    V: Scalar,
{
    fn walk(&self, expected: &R, actual: &R, walk: &mut Walk) {
        walk.scalar(self.extract.get(expected), self.extract.get(actual))
    }
}

impl<R, E, V> FieldMatcher<R> for RepeatedAccess<E, V>
where
    E: Extract<R, [V]>,
    V: Scalar,
{
    fn walk(&self, expected: &R, actual: &R, walk: &mut Walk) {
        walk.pairwise(
            self.extract.get(expected),
            self.extract.get(actual),
            &ScalarElements,
        )
    }
}

/// A nested field bound to the nested type's matcher.
pub(crate) struct NestedMatch<E, N> {
    access: Arc<NestedAccess<E, N>>,
    matcher: Arc<Matcher<N>>,
}

impl<E, N> NestedMatch<E, N> {
    pub(crate) fn new(
        access: Arc<NestedAccess<E, N>>,
        matcher: Arc<Matcher<N>>,
    ) -> Self {
        NestedMatch { access, matcher }
    }
}

impl<R, E, N> FieldMatcher<R> for NestedMatch<E, N>
where
    E: Extract<R, N>,
    N: 'static,
{
    fn walk(&self, expected: &R, actual: &R, walk: &mut Walk) {
        self.matcher.walk(
            self.access.extract.get(expected),
            self.access.extract.get(actual),
            walk,
        )
    }
}

/// A repeated-nested field bound to the nested type's matcher, and to its
/// printer for showing excess elements.
pub(crate) struct RepeatedNestedMatch<E, N> {
    access: Arc<RepeatedNestedAccess<E, N>>,
    matcher: Arc<Matcher<N>>,
    printer: Arc<Printer<N>>,
}

impl<E, N> RepeatedNestedMatch<E, N> {
    pub(crate) fn new(
        access: Arc<RepeatedNestedAccess<E, N>>,
        matcher: Arc<Matcher<N>>,
        printer: Arc<Printer<N>>,
    ) -> Self {
        RepeatedNestedMatch {
            access,
            matcher,
            printer,
        }
    }
}

impl<E, N: 'static> Elements<N> for RepeatedNestedMatch<E, N> {
    fn compare(&self, walk: &mut Walk, expected: &N, actual: &N) {
        self.matcher.walk(expected, actual, walk)
    }

    fn show(&self, value: &N) -> String {
        self.printer.render(value)
    }
}

impl<R, E, N> FieldMatcher<R> for RepeatedNestedMatch<E, N>
where
    E: Extract<R, [N]>,
    N: 'static,
{
    fn walk(&self, expected: &R, actual: &R, walk: &mut Walk) {
        walk.pairwise(
            self.access.extract.get(expected),
            self.access.extract.get(actual),
            self,
        )
    }
}
