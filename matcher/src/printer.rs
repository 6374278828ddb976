//! Render records for diagnostics using `Debug` and `Formatter`.

use core::fmt;
use std::sync::Arc;

use crate::field::{
    Extract, NestedAccess, RepeatedAccess, RepeatedNestedAccess, ScalarAccess,
};
use crate::Scalar;

/// A diagnostic renderer for record type `R`.
///
/// Only fields that are present are shown: scalars and nested records whose
/// presence check passes, and repeated fields that are non-empty. Fields are
/// shown in declaration order, nested records recursively through their own
/// printers:
///
/// ```text
/// Foo { a: 1, bar: Bar { aa: 5 }, repeated_bar: [Bar { aa: 1 }, Bar] }
/// ```
///
/// A record with nothing present renders as its bare type name. The
/// alternate flag (`{:#?}`) on [`display`] gives an indented form.
///
/// [`display`]: #method.display
pub struct Printer<R> {
    name: &'static str,
    fields: Vec<(&'static str, Arc<dyn FieldPrinter<R>>)>,
}

impl<R> Printer<R> {
    pub(crate) fn new(
        name: &'static str,
        fields: Vec<(&'static str, Arc<dyn FieldPrinter<R>>)>,
    ) -> Self {
        Printer { name, fields }
    }

    /// Name of the record type this printer renders.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Wraps `value` into an object that, when formatted using `Debug` or
    /// `Display`, shows its present fields.
    pub fn display<'a>(&'a self, value: &'a R) -> Rendered<'a, R> {
        Rendered {
            printer: self,
            value,
        }
    }

    /// Renders `value` on a single line.
    pub fn render(&self, value: &R) -> String {
        format!("{:?}", self.display(value))
    }

    /// Renders `value` indented across multiple lines.
    pub fn render_pretty(&self, value: &R) -> String {
        format!("{:#?}", self.display(value))
    }
}

impl<R> fmt::Debug for Printer<R> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Printer")
            .field("name", &self.name)
            .field(
                "fields",
                &self.fields.iter().map(|(name, _)| name).collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// A record paired with its printer. See [`Printer::display`].
///
/// [`Printer::display`]: struct.Printer.html#method.display
pub struct Rendered<'a, R> {
    printer: &'a Printer<R>,
    value: &'a R,
}

impl<'a, R> fmt::Debug for Rendered<'a, R> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut out = f.debug_struct(self.printer.name);
        for (name, field) in &self.printer.fields {
            field.print(*name, self.value, &mut out);
        }
        out.finish()
    }
}

impl<'a, R> fmt::Display for Rendered<'a, R> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// One declared field's contribution to a record printer.
pub(crate) trait FieldPrinter<R>: Send + Sync {
    /// Adds the field to `out` if it is present on `record`.
    fn print(
        &self,
        name: &'static str,
        record: &R,
        out: &mut fmt::DebugStruct<'_, '_>,
    );
}

struct List<'a, N> {
    printer: &'a Printer<N>,
    items: &'a [N],
}

impl<'a, N> fmt::Debug for List<'a, N> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_list()
            .entries(self.items.iter().map(|item| self.printer.display(item)))
            .finish()
    }
}

////////////////////////////////////////////////////////////////////////////////
// Field shapes

impl<R, E, V> FieldPrinter<R> for ScalarAccess<E, V>
where
    E: Extract<R, V>,
    V: Scalar,
{
    fn print(
        &self,
        name: &'static str,
        record: &R,
        out: &mut fmt::DebugStruct<'_, '_>,
    ) {
        if self.extract.has(record) {
            out.field(name, self.extract.get(record));
        }
    }
}

impl<R, E, V> FieldPrinter<R> for RepeatedAccess<E, V>
where
    E: Extract<R, [V]>,
    V: Scalar,
{
    fn print(
        &self,
        name: &'static str,
        record: &R,
        out: &mut fmt::DebugStruct<'_, '_>,
    ) {
        let items = self.extract.get(record);
        if !items.is_empty() {
            out.field(name, &items);
        }
    }
}

/// A nested field bound to the nested type's printer.
pub(crate) struct NestedPrint<E, N> {
    access: Arc<NestedAccess<E, N>>,
    printer: Arc<Printer<N>>,
}

impl<E, N> NestedPrint<E, N> {
    pub(crate) fn new(
        access: Arc<NestedAccess<E, N>>,
        printer: Arc<Printer<N>>,
    ) -> Self {
        NestedPrint { access, printer }
    }
}

impl<R, E, N> FieldPrinter<R> for NestedPrint<E, N>
where
    E: Extract<R, N>,
{
    fn print(
        &self,
        name: &'static str,
        record: &R,
        out: &mut fmt::DebugStruct<'_, '_>,
    ) {
        if self.access.extract.has(record) {
            let nested = self.access.extract.get(record);
            out.field(name, &self.printer.display(nested));
        }
    }
}

/// A repeated-nested field bound to the nested type's printer.
pub(crate) struct RepeatedNestedPrint<E, N> {
    access: Arc<RepeatedNestedAccess<E, N>>,
    printer: Arc<Printer<N>>,
}

impl<E, N> RepeatedNestedPrint<E, N> {
    pub(crate) fn new(
        access: Arc<RepeatedNestedAccess<E, N>>,
        printer: Arc<Printer<N>>,
    ) -> Self {
        RepeatedNestedPrint { access, printer }
    }
}

impl<R, E, N> FieldPrinter<R> for RepeatedNestedPrint<E, N>
where
    E: Extract<R, [N]>,
{
    fn print(
        &self,
        name: &'static str,
        record: &R,
        out: &mut fmt::DebugStruct<'_, '_>,
    ) {
        let items = self.access.extract.get(record);
        if !items.is_empty() {
            out.field(
                name,
                &List {
                    printer: &self.printer,
                    items,
                },
            );
        }
    }
}
