//! Declarative field lists for record types.
//!
//! A [`FieldSet`] names the fields of one record type that take part in
//! matching and printing, in declaration order, along with how to extract
//! each one. It knows nothing about matchers or printers; those are derived
//! from it by a [`Registry`], which resolves nested record types to their
//! already-built artifacts.
//!
//! [`FieldSet`]: struct.FieldSet.html
//! [`Registry`]: struct.Registry.html

use core::any::TypeId;
use core::fmt;
use core::marker::PhantomData;
use std::collections::HashSet;
use std::sync::Arc;

use crate::matcher::{FieldMatcher, NestedMatch, RepeatedNestedMatch};
use crate::printer::{FieldPrinter, NestedPrint, RepeatedNestedPrint};
use crate::{BuildError, Registry, Scalar};

/// The shape of a declared field.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum FieldKind {
    /// A directly comparable value.
    Scalar,
    /// A single instance of another record type.
    Nested,
    /// An ordered sequence of scalars.
    RepeatedScalar,
    /// An ordered sequence of instances of another record type.
    RepeatedNested,
}

impl FieldKind {
    pub fn is_repeated(self) -> bool {
        match self {
            FieldKind::RepeatedScalar | FieldKind::RepeatedNested => true,
            FieldKind::Scalar | FieldKind::Nested => false,
        }
    }
}

/// One declared field of a record type `R`.
pub struct Field<R> {
    name: &'static str,
    kind: FieldKind,
    access: Arc<dyn Access<R>>,
}

impl<R: 'static> Field<R> {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    /// Checks whether the field is explicitly set on `record`. Repeated
    /// fields are present when non-empty.
    pub fn is_present(&self, record: &R) -> bool {
        self.access.is_present(record)
    }

    pub(crate) fn dependency(&self) -> Option<TypeId> {
        self.access.dependency()
    }

    pub(crate) fn bind_matcher(
        &self,
        registry: &Registry,
        record: &'static str,
    ) -> Result<Arc<dyn FieldMatcher<R>>, BuildError> {
        Arc::clone(&self.access)
            .bind_matcher(registry)
            .map_err(|e| self.unresolved(record, e))
    }

    pub(crate) fn bind_printer(
        &self,
        registry: &Registry,
        record: &'static str,
    ) -> Result<Arc<dyn FieldPrinter<R>>, BuildError> {
        Arc::clone(&self.access)
            .bind_printer(registry)
            .map_err(|e| self.unresolved(record, e))
    }

    fn unresolved(&self, record: &'static str, err: BuildError) -> BuildError {
        match err {
            BuildError::NotRegistered { record: dependency } => {
                BuildError::Unresolved {
                    record,
                    field: self.name,
                    dependency,
                }
            }
            other => other,
        }
    }
}

impl<R> Clone for Field<R> {
    fn clone(&self) -> Self {
        Field {
            name: self.name,
            kind: self.kind,
            access: Arc::clone(&self.access),
        }
    }
}

impl<R> fmt::Debug for Field<R> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Field")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .finish()
    }
}

/// The ordered list of declared fields for a record type `R`.
///
/// Built with chained calls, one per field:
///
/// ```
/// use fieldwise::{FieldKind, FieldSet};
///
/// #[derive(Default)]
/// struct Bar { aa: i32 }
/// struct Foo { a: i32, b: Vec<f32>, bar: Option<Bar>, repeated_bar: Vec<Bar> }
///
/// let foo = FieldSet::<Foo>::new("Foo")
///     .scalar("a", |r| &r.a)
///     .repeated("b", |r| &r.b[..])
///     .optional_nested("bar", |r| r.bar.as_ref())
///     .repeated_nested("repeated_bar", |r| &r.repeated_bar[..]);
///
/// let kinds: Vec<_> = foo.fields().iter().map(|f| f.kind()).collect();
/// assert_eq!(kinds, [
///     FieldKind::Scalar,
///     FieldKind::RepeatedScalar,
///     FieldKind::Nested,
///     FieldKind::RepeatedNested,
/// ]);
/// ```
///
/// A field set with no fields is legal: every pair of records matches, and
/// the printer renders only the record name.
pub struct FieldSet<R> {
    name: &'static str,
    fields: Vec<Field<R>>,
}

impl<R: 'static> FieldSet<R> {
    /// Starts an empty field set for the record type called `name`.
    pub fn new(name: &'static str) -> Self {
        FieldSet {
            name,
            fields: vec![],
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn fields(&self) -> &[Field<R>] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Record types referenced by nested and repeated-nested fields, without
    /// duplicates, in declaration order.
    pub fn dependencies(&self) -> Vec<TypeId> {
        let mut seen = HashSet::new();
        self.fields
            .iter()
            .filter_map(Field::dependency)
            .filter(|id| seen.insert(*id))
            .collect()
    }

    /// Declares a scalar field that is always considered present.
    pub fn scalar<V, G>(self, name: &'static str, get: G) -> Self
    where
        V: Scalar,
        G: Fn(&R) -> &V + Send + Sync + 'static,
    {
        self.push(name, FieldKind::Scalar, ScalarAccess::new(Always(get)))
    }

    /// Declares a scalar field with its own presence check.
    pub fn scalar_with_presence<V, G, H>(
        self,
        name: &'static str,
        get: G,
        has: H,
    ) -> Self
    where
        V: Scalar,
        G: Fn(&R) -> &V + Send + Sync + 'static,
        H: Fn(&R) -> bool + Send + Sync + 'static,
    {
        self.push(
            name,
            FieldKind::Scalar,
            ScalarAccess::new(Flagged { get, has }),
        )
    }

    /// Declares an optional scalar field. An absent value compares as
    /// `V::default()` and is left out of printed output.
    pub fn optional<V, G>(self, name: &'static str, get: G) -> Self
    where
        V: Scalar + Default,
        G: Fn(&R) -> Option<&V> + Send + Sync + 'static,
    {
        self.push(
            name,
            FieldKind::Scalar,
            ScalarAccess::new(Defaulted {
                get,
                fallback: V::default(),
            }),
        )
    }

    /// Declares a nested record field that is always considered present.
    pub fn nested<N, G>(self, name: &'static str, get: G) -> Self
    where
        N: 'static,
        G: Fn(&R) -> &N + Send + Sync + 'static,
    {
        self.push(name, FieldKind::Nested, NestedAccess::new(Always(get)))
    }

    /// Declares a nested record field with its own presence check.
    pub fn nested_with_presence<N, G, H>(
        self,
        name: &'static str,
        get: G,
        has: H,
    ) -> Self
    where
        N: 'static,
        G: Fn(&R) -> &N + Send + Sync + 'static,
        H: Fn(&R) -> bool + Send + Sync + 'static,
    {
        self.push(
            name,
            FieldKind::Nested,
            NestedAccess::new(Flagged { get, has }),
        )
    }

    /// Declares an optional nested record field. An absent record compares
    /// as `N::default()` and is left out of printed output.
    pub fn optional_nested<N, G>(self, name: &'static str, get: G) -> Self
    where
        N: Default + Send + Sync + 'static,
        G: Fn(&R) -> Option<&N> + Send + Sync + 'static,
    {
        self.push(
            name,
            FieldKind::Nested,
            NestedAccess::new(Defaulted {
                get,
                fallback: N::default(),
            }),
        )
    }

    /// Declares an ordered sequence of scalars.
    pub fn repeated<V, G>(self, name: &'static str, get: G) -> Self
    where
        V: Scalar,
        G: Fn(&R) -> &[V] + Send + Sync + 'static,
    {
        self.push(
            name,
            FieldKind::RepeatedScalar,
            RepeatedAccess::new(Always(get)),
        )
    }

    /// Declares an ordered sequence of nested records.
    pub fn repeated_nested<N, G>(self, name: &'static str, get: G) -> Self
    where
        N: 'static,
        G: Fn(&R) -> &[N] + Send + Sync + 'static,
    {
        self.push(
            name,
            FieldKind::RepeatedNested,
            RepeatedNestedAccess::new(Always(get)),
        )
    }

    fn push<A>(mut self, name: &'static str, kind: FieldKind, access: A) -> Self
    where
        A: Access<R> + 'static,
    {
        self.fields.push(Field {
            name,
            kind,
            access: Arc::new(access),
        });
        self
    }

    /// Rejects field sets that declare a name twice.
    pub(crate) fn check(&self) -> Result<(), BuildError> {
        let mut seen = HashSet::new();
        for field in &self.fields {
            if !seen.insert(field.name) {
                return Err(BuildError::DuplicateField {
                    record: self.name,
                    field: field.name,
                });
            }
        }
        Ok(())
    }
}

impl<R> fmt::Debug for FieldSet<R> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("FieldSet")
            .field("name", &self.name)
            .field("fields", &self.fields)
            .finish()
    }
}

////////////////////////////////////////////////////////////////////////////////
// Extraction

/// Pulls a value of type `T` out of a record `R`, and says whether it was
/// explicitly set.
pub(crate) trait Extract<R, T: ?Sized>: Send + Sync + 'static {
    fn get<'a>(&'a self, record: &'a R) -> &'a T;

    fn has(&self, record: &R) -> bool;
}

/// A getter whose value is always present.
pub(crate) struct Always<G>(G);

impl<R, T, G> Extract<R, T> for Always<G>
where
    T: ?Sized,
    G: Fn(&R) -> &T + Send + Sync + 'static,
{
    fn get<'a>(&'a self, record: &'a R) -> &'a T {
        (self.0)(record)
    }

    fn has(&self, _: &R) -> bool {
        true
    }
}

/// A getter paired with a separate presence check.
pub(crate) struct Flagged<G, H> {
    get: G,
    has: H,
}

impl<R, T, G, H> Extract<R, T> for Flagged<G, H>
where
    G: Fn(&R) -> &T + Send + Sync + 'static,
    H: Fn(&R) -> bool + Send + Sync + 'static,
{
    fn get<'a>(&'a self, record: &'a R) -> &'a T {
        (self.get)(record)
    }

    fn has(&self, record: &R) -> bool {
        (self.has)(record)
    }
}

/// A getter for an `Option`, reading absent values as a stored default.
pub(crate) struct Defaulted<G, T> {
    get: G,
    fallback: T,
}

impl<R, T, G> Extract<R, T> for Defaulted<G, T>
where
    T: Send + Sync + 'static,
    G: Fn(&R) -> Option<&T> + Send + Sync + 'static,
{
    fn get<'a>(&'a self, record: &'a R) -> &'a T {
        (self.get)(record).unwrap_or(&self.fallback)
    }

    fn has(&self, record: &R) -> bool {
        (self.get)(record).is_some()
    }
}

////////////////////////////////////////////////////////////////////////////////
// Field shapes

/// Type-erased view of one declared field, from which the field's part of a
/// matcher and of a printer are bound once the registry can supply the
/// artifacts of nested record types.
pub(crate) trait Access<R>: Send + Sync {
    fn is_present(&self, record: &R) -> bool;

    /// The nested record type this field delegates to, if any.
    fn dependency(&self) -> Option<TypeId>;

    fn bind_matcher(
        self: Arc<Self>,
        registry: &Registry,
    ) -> Result<Arc<dyn FieldMatcher<R>>, BuildError>;

    fn bind_printer(
        self: Arc<Self>,
        registry: &Registry,
    ) -> Result<Arc<dyn FieldPrinter<R>>, BuildError>;
}

pub(crate) struct ScalarAccess<E, V> {
    pub(crate) extract: E,
    _value: PhantomData<fn() -> V>,
}

impl<E, V> ScalarAccess<E, V> {
    fn new(extract: E) -> Self {
        ScalarAccess {
            extract,
            _value: PhantomData,
        }
    }
}

impl<R, E, V> Access<R> for ScalarAccess<E, V>
where
    R: 'static,
    E: Extract<R, V>,
    V: Scalar,
{
    fn is_present(&self, record: &R) -> bool {
        self.extract.has(record)
    }

    fn dependency(&self) -> Option<TypeId> {
        None
    }

    fn bind_matcher(
        self: Arc<Self>,
        _: &Registry,
    ) -> Result<Arc<dyn FieldMatcher<R>>, BuildError> {
        Ok(self)
    }

    fn bind_printer(
        self: Arc<Self>,
        _: &Registry,
    ) -> Result<Arc<dyn FieldPrinter<R>>, BuildError> {
        Ok(self)
    }
}

pub(crate) struct NestedAccess<E, N> {
    pub(crate) extract: E,
    _record: PhantomData<fn() -> N>,
}

impl<E, N> NestedAccess<E, N> {
    fn new(extract: E) -> Self {
        NestedAccess {
            extract,
            _record: PhantomData,
        }
    }
}

impl<R, E, N> Access<R> for NestedAccess<E, N>
where
    R: 'static,
    E: Extract<R, N>,
    N: 'static,
{
    fn is_present(&self, record: &R) -> bool {
        self.extract.has(record)
    }

    fn dependency(&self) -> Option<TypeId> {
        Some(TypeId::of::<N>())
    }

    fn bind_matcher(
        self: Arc<Self>,
        registry: &Registry,
    ) -> Result<Arc<dyn FieldMatcher<R>>, BuildError> {
        let matcher = registry.matcher::<N>()?;
        Ok(Arc::new(NestedMatch::new(self, matcher)))
    }

    fn bind_printer(
        self: Arc<Self>,
        registry: &Registry,
    ) -> Result<Arc<dyn FieldPrinter<R>>, BuildError> {
        let printer = registry.printer::<N>()?;
        Ok(Arc::new(NestedPrint::new(self, printer)))
    }
}

pub(crate) struct RepeatedAccess<E, V> {
    pub(crate) extract: E,
    _value: PhantomData<fn() -> V>,
}

impl<E, V> RepeatedAccess<E, V> {
    fn new(extract: E) -> Self {
        RepeatedAccess {
            extract,
            _value: PhantomData,
        }
    }
}

impl<R, E, V> Access<R> for RepeatedAccess<E, V>
where
    R: 'static,
    E: Extract<R, [V]>,
    V: Scalar,
{
    fn is_present(&self, record: &R) -> bool {
        !self.extract.get(record).is_empty()
    }

    fn dependency(&self) -> Option<TypeId> {
        None
    }

    fn bind_matcher(
        self: Arc<Self>,
        _: &Registry,
    ) -> Result<Arc<dyn FieldMatcher<R>>, BuildError> {
        Ok(self)
    }

    fn bind_printer(
        self: Arc<Self>,
        _: &Registry,
    ) -> Result<Arc<dyn FieldPrinter<R>>, BuildError> {
        Ok(self)
    }
}

pub(crate) struct RepeatedNestedAccess<E, N> {
    pub(crate) extract: E,
    _record: PhantomData<fn() -> N>,
}

impl<E, N> RepeatedNestedAccess<E, N> {
    fn new(extract: E) -> Self {
        RepeatedNestedAccess {
            extract,
            _record: PhantomData,
        }
    }
}

impl<R, E, N> Access<R> for RepeatedNestedAccess<E, N>
where
    R: 'static,
    E: Extract<R, [N]>,
    N: 'static,
{
    fn is_present(&self, record: &R) -> bool {
        !self.extract.get(record).is_empty()
    }

    fn dependency(&self) -> Option<TypeId> {
        Some(TypeId::of::<N>())
    }

    fn bind_matcher(
        self: Arc<Self>,
        registry: &Registry,
    ) -> Result<Arc<dyn FieldMatcher<R>>, BuildError> {
        let matcher = registry.matcher::<N>()?;
        let printer = registry.printer::<N>()?;
        Ok(Arc::new(RepeatedNestedMatch::new(self, matcher, printer)))
    }

    fn bind_printer(
        self: Arc<Self>,
        registry: &Registry,
    ) -> Result<Arc<dyn FieldPrinter<R>>, BuildError> {
        let printer = registry.printer::<N>()?;
        Ok(Arc::new(RepeatedNestedPrint::new(self, printer)))
    }
}
