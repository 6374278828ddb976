//! Built matchers and printers for a whole schema, keyed by record type.

use core::any::{type_name, Any, TypeId};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::{debug, trace};

use crate::{
    BuildError, Checker, FieldSet, Matcher, Printer, Record, Report,
};

/// Settings applied to everything a [`Registry`] builds.
///
/// [`Registry`]: struct.Registry.html
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct Options {
    /// How much matchers report when asked to explain a difference.
    pub report: Report,
    /// Whether failure messages render records across multiple lines.
    pub pretty: bool,
}

impl Options {
    pub fn report(mut self, report: Report) -> Self {
        self.report = report;
        self
    }

    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }
}

struct Slot {
    name: &'static str,
    matcher: Arc<dyn Any + Send + Sync>,
    printer: Arc<dyn Any + Send + Sync>,
}

/// The matchers and printers of a schema, keyed by record type.
///
/// A record type's artifacts can only be built once the artifacts of every
/// record type it contains exist, so registration has to follow the
/// "contains a field of type" relation from the leaves up. Registering a
/// container before its contents fails with [`BuildError::Unresolved`]
/// instead of producing a matcher that would misbehave later. The
/// [`SchemaBuilder`] works the order out on its own.
///
/// ```
/// use fieldwise::{FieldSet, Registry};
///
/// #[derive(Default)]
/// struct Bar { aa: i32 }
/// struct Foo { a: i32, bar: Bar }
///
/// let mut registry = Registry::new();
/// registry.register(FieldSet::<Bar>::new("Bar").scalar("aa", |r| &r.aa))?;
/// registry.register(
///     FieldSet::<Foo>::new("Foo")
///         .scalar("a", |r| &r.a)
///         .nested("bar", |r| &r.bar),
/// )?;
///
/// let matcher = registry.matcher::<Foo>()?;
/// let expected = Foo { a: 1, bar: Bar { aa: 5 } };
/// assert!(!matcher.matches(&expected, &Foo { a: 1, bar: Bar { aa: 6 } }));
/// assert!(matcher.matches(&expected, &Foo { a: 1, bar: Bar { aa: 5 } }));
/// # Ok::<(), fieldwise::BuildError>(())
/// ```
///
/// Once built, a registry is never mutated by matching or printing, and can
/// be shared between threads.
///
/// [`BuildError::Unresolved`]: enum.BuildError.html#variant.Unresolved
/// [`SchemaBuilder`]: struct.SchemaBuilder.html
#[derive(Default)]
pub struct Registry {
    options: Options,
    slots: HashMap<TypeId, Slot>,
    order: Vec<TypeId>,
}

impl Registry {
    pub fn new() -> Self {
        Registry::default()
    }

    pub fn with_options(options: Options) -> Self {
        Registry {
            options,
            ..Registry::default()
        }
    }

    /// Starts collecting field sets to be registered in dependency order.
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::new()
    }

    pub fn options(&self) -> Options {
        self.options
    }

    /// Builds a matcher from `fields`, resolving nested record types against
    /// what is already registered.
    pub fn build_matcher<R: 'static>(
        &self,
        fields: &FieldSet<R>,
    ) -> Result<Matcher<R>, BuildError> {
        fields.check()?;
        let bound = fields
            .fields()
            .iter()
            .map(|f| {
                trace!(record = fields.name(), field = f.name(), "bind matcher");
                Ok((f.name(), f.bind_matcher(self, fields.name())?))
            })
            .collect::<Result<Vec<_>, BuildError>>()?;
        Ok(Matcher::new(fields.name(), self.options.report, bound))
    }

    /// Builds a printer from `fields`, resolving nested record types against
    /// what is already registered.
    pub fn build_printer<R: 'static>(
        &self,
        fields: &FieldSet<R>,
    ) -> Result<Printer<R>, BuildError> {
        fields.check()?;
        let bound = fields
            .fields()
            .iter()
            .map(|f| {
                trace!(record = fields.name(), field = f.name(), "bind printer");
                Ok((f.name(), f.bind_printer(self, fields.name())?))
            })
            .collect::<Result<Vec<_>, BuildError>>()?;
        Ok(Printer::new(fields.name(), bound))
    }

    /// Builds and stores the matcher and printer for `R`.
    pub fn register<R: 'static>(
        &mut self,
        fields: FieldSet<R>,
    ) -> Result<(), BuildError> {
        let id = TypeId::of::<R>();
        if self.slots.contains_key(&id) {
            return Err(BuildError::DuplicateRecord {
                record: fields.name(),
            });
        }

        let matcher = self.build_matcher(&fields)?;
        let printer = self.build_printer(&fields)?;
        debug!(
            record = fields.name(),
            fields = fields.len(),
            "registered record"
        );

        self.slots.insert(
            id,
            Slot {
                name: fields.name(),
                matcher: Arc::new(matcher),
                printer: Arc::new(printer),
            },
        );
        self.order.push(id);
        Ok(())
    }

    /// Registers a record type using the field set it declares.
    pub fn register_record<R: Record>(&mut self) -> Result<(), BuildError> {
        self.register(R::fields())
    }

    pub fn contains<R: 'static>(&self) -> bool {
        self.slots.contains_key(&TypeId::of::<R>())
    }

    /// Names of the registered record types, in registration order.
    pub fn records(&self) -> Vec<&'static str> {
        self.order
            .iter()
            .filter_map(|id| self.slots.get(id))
            .map(|slot| slot.name)
            .collect()
    }

    pub fn matcher<R: 'static>(&self) -> Result<Arc<Matcher<R>>, BuildError> {
        Arc::clone(&self.slot::<R>()?.matcher)
            .downcast::<Matcher<R>>()
            .map_err(|_| not_registered::<R>())
    }

    pub fn printer<R: 'static>(&self) -> Result<Arc<Printer<R>>, BuildError> {
        Arc::clone(&self.slot::<R>()?.printer)
            .downcast::<Printer<R>>()
            .map_err(|_| not_registered::<R>())
    }

    /// Pairs the matcher and printer for `R` for use in assertions.
    pub fn checker<R: 'static>(&self) -> Result<Checker<R>, BuildError> {
        Ok(Checker::new(
            self.matcher::<R>()?,
            self.printer::<R>()?,
            self.options.pretty,
        ))
    }

    fn slot<R: 'static>(&self) -> Result<&Slot, BuildError> {
        self.slots
            .get(&TypeId::of::<R>())
            .ok_or_else(not_registered::<R>)
    }
}

fn not_registered<R>() -> BuildError {
    BuildError::NotRegistered {
        record: type_name::<R>(),
    }
}

/// Collects field sets in any order and registers them leaves first.
///
/// ```
/// use fieldwise::{FieldSet, Registry};
///
/// #[derive(Default)]
/// struct Bar { aa: i32 }
/// struct Foo { bar: Vec<Bar> }
///
/// let registry = Registry::builder()
///     .record(FieldSet::<Foo>::new("Foo").repeated_nested("bar", |r| &r.bar[..]))
///     .record(FieldSet::<Bar>::new("Bar").scalar("aa", |r| &r.aa))
///     .build()?;
/// assert_eq!(registry.records(), ["Bar", "Foo"]);
/// # Ok::<(), fieldwise::BuildError>(())
/// ```
pub struct SchemaBuilder {
    options: Options,
    pending: Vec<Box<dyn Pending>>,
}

impl SchemaBuilder {
    fn new() -> Self {
        SchemaBuilder {
            options: Options::default(),
            pending: vec![],
        }
    }

    pub fn options(mut self, options: Options) -> Self {
        self.options = options;
        self
    }

    pub fn record<R: 'static>(mut self, fields: FieldSet<R>) -> Self {
        self.pending.push(Box::new(fields));
        self
    }

    /// Adds a record type using the field set it declares.
    pub fn record_type<R: Record>(self) -> Self {
        self.record(R::fields())
    }

    /// Registers every collected field set in an order where each record
    /// type comes after the record types it contains.
    pub fn build(self) -> Result<Registry, BuildError> {
        let mut registry = Registry::with_options(self.options);
        let mut pending = self.pending;

        let mut seen = HashSet::new();
        for p in &pending {
            if !seen.insert(p.record_type()) {
                return Err(BuildError::DuplicateRecord {
                    record: p.record_name(),
                });
            }
        }

        while !pending.is_empty() {
            let waiting: HashSet<TypeId> =
                pending.iter().map(|p| p.record_type()).collect();
            let ready = pending.iter().position(|p| {
                p.depends_on().iter().all(|dep| !waiting.contains(dep))
            });
            let next = match ready {
                Some(i) => pending.remove(i),
                None => {
                    return Err(BuildError::Cycle {
                        records: pending.iter().map(|p| p.record_name()).collect(),
                    })
                }
            };
            next.install(&mut registry)?;
        }

        debug!(records = ?registry.records(), "schema built");
        Ok(registry)
    }
}

/// A field set waiting for its turn in a [`SchemaBuilder`].
///
/// [`SchemaBuilder`]: struct.SchemaBuilder.html
trait Pending {
    fn record_type(&self) -> TypeId;

    fn record_name(&self) -> &'static str;

    fn depends_on(&self) -> Vec<TypeId>;

    fn install(self: Box<Self>, registry: &mut Registry)
        -> Result<(), BuildError>;
}

impl<R: 'static> Pending for FieldSet<R> {
    fn record_type(&self) -> TypeId {
        TypeId::of::<R>()
    }

    fn record_name(&self) -> &'static str {
        self.name()
    }

    fn depends_on(&self) -> Vec<TypeId> {
        self.dependencies()
    }

    fn install(
        self: Box<Self>,
        registry: &mut Registry,
    ) -> Result<(), BuildError> {
        registry.register(*self)
    }
}
