//! Structural matchers and diagnostic printers for tree-shaped records,
//! generated from declarative field lists.
//!
//! # Simple application
//!
//! Describe each record type once, as an ordered list of the fields that
//! should take part, and a [`Registry`] derives two artifacts from it:
//!
//! - a [`Matcher`], which decides whether two records are equal over the
//!   declared fields and explains where they differ, and
//! - a [`Printer`], which renders only the fields that are actually present,
//!   for readable assertion messages.
//!
//! ```
//! use fieldwise::{assert_record_eq, FieldSet, Registry};
//!
//! #[derive(Default)]
//! struct Bar { aa: Option<i32> }
//! struct Foo { a: Option<i32>, bar: Option<Bar>, scratch: u64 }
//!
//! let registry = Registry::builder()
//!     .record(
//!         FieldSet::<Foo>::new("Foo")
//!             .optional("a", |r| r.a.as_ref())
//!             .optional_nested("bar", |r| r.bar.as_ref()),
//!     )
//!     .record(FieldSet::<Bar>::new("Bar").optional("aa", |r| r.aa.as_ref()))
//!     .build()?;
//!
//! let expected = Foo { a: Some(1), bar: Some(Bar { aa: Some(5) }), scratch: 0 };
//! let actual = Foo { a: Some(1), bar: Some(Bar { aa: Some(5) }), scratch: 77 };
//! assert_record_eq!(registry, &expected, &actual);
//!
//! let printer = registry.printer::<Foo>()?;
//! assert_eq!(printer.render(&expected), "Foo { a: 1, bar: Bar { aa: 5 } }");
//! # Ok::<(), fieldwise::BuildError>(())
//! ```
//!
//! With the `derive` feature (on by default), `#[derive(Record)]` writes the
//! field list from the struct definition.
//!
//! # Under the hood
//!
//! A [`FieldSet`] is plain data: names, shapes, and accessors. Nothing about
//! it depends on other record types having been described. Turning it into a
//! matcher or printer is where nested record types get resolved, and that
//! happens against the artifacts already held by a [`Registry`], so record
//! types must be registered contents first. [`SchemaBuilder`] sorts that out
//! and rejects schemas where records contain each other.
//!
//! Once built, matchers and printers are immutable and can be shared between
//! threads.
//!
//! [`Registry`]: struct.Registry.html
//! [`Matcher`]: struct.Matcher.html
//! [`Printer`]: struct.Printer.html
//! [`FieldSet`]: struct.FieldSet.html
//! [`SchemaBuilder`]: struct.SchemaBuilder.html

#[cfg(feature = "derive")]
pub use fieldwise_derive::Record;

mod check;
mod error;
mod explain;
mod field;
mod matcher;
mod printer;
mod registry;
#[macro_use]
mod scalar;

pub use check::{Checker, MatchFailure};
pub use error::BuildError;
pub use explain::{
    Explanation, FieldPath, Mismatch, MismatchKind, Report, Segment,
};
pub use field::{Field, FieldKind, FieldSet};
pub use matcher::Matcher;
pub use printer::{Printer, Rendered};
pub use registry::{Options, Registry, SchemaBuilder};
pub use scalar::Scalar;

/// A record type that declares its own field list.
///
/// Usually derived; see the crate docs. Implementing it by hand is just a
/// matter of returning the [`FieldSet`]:
///
/// ```
/// use fieldwise::{FieldSet, Record, Registry};
///
/// struct Bar { aa: i32 }
///
/// impl Record for Bar {
///     fn fields() -> FieldSet<Self> {
///         FieldSet::<Bar>::new("Bar").scalar("aa", |r| &r.aa)
///     }
/// }
///
/// let mut registry = Registry::new();
/// registry.register_record::<Bar>()?;
/// assert!(registry.matcher::<Bar>()?.matches(&Bar { aa: 1 }, &Bar { aa: 1 }));
/// # Ok::<(), fieldwise::BuildError>(())
/// ```
///
/// [`FieldSet`]: struct.FieldSet.html
pub trait Record: Sized + 'static {
    fn fields() -> FieldSet<Self>;
}
