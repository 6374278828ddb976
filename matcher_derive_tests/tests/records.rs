use fieldwise::{
    assert_record_eq, BuildError, MismatchKind, Options, Record, Registry,
    Report,
};
use once_cell::sync::Lazy;

#[macro_use]
mod common;

#[derive(Record, Debug, Default, Clone, PartialEq)]
struct Bar {
    #[record(optional)]
    aa: Option<i32>,
}

#[derive(Record, Debug, Default, Clone, PartialEq)]
struct Foo {
    #[record(optional)]
    a: Option<i32>,
    #[record(repeated)]
    b: Vec<f32>,
    #[record(nested, optional)]
    bar: Option<Bar>,
    #[record(nested, repeated)]
    repeated_bar: Vec<Bar>,
}

static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    Registry::builder()
        .record_type::<Foo>()
        .record_type::<Bar>()
        .build()
        .unwrap()
});

fn bar(aa: i32) -> Bar {
    Bar { aa: Some(aa) }
}

renders_as! { REGISTRY;
    empty_foo => Foo::default(), "Foo";
    empty_bar => Bar::default(), "Bar";
    scalar_only => Foo { a: Some(0), ..Foo::default() }, "Foo { a: 0 }";
    everything => Foo {
        a: Some(1),
        b: vec![0.5, 1.5],
        bar: Some(bar(5)),
        repeated_bar: vec![bar(1), Bar::default()],
    }, "Foo { a: 1, b: [0.5, 1.5], bar: Bar { aa: 5 }, \
        repeated_bar: [Bar { aa: 1 }, Bar] }";
}

#[test]
fn nested_field_difference() {
    let matcher = REGISTRY.matcher::<Foo>().unwrap();
    let expected = Foo {
        a: Some(1),
        bar: Some(bar(5)),
        ..Foo::default()
    };
    let actual = Foo {
        a: Some(1),
        bar: Some(bar(6)),
        ..Foo::default()
    };
    assert!(!matcher.matches(&expected, &actual));

    let explanation = matcher.test(&expected, &actual);
    let mismatch = explanation.first().unwrap();
    assert_eq!(mismatch.path.to_string(), "bar.aa");
    assert_eq!(
        mismatch.kind,
        MismatchKind::Value {
            expected: "5".into(),
            actual: "6".into(),
        }
    );
}

#[test]
fn repeated_order_and_length() {
    let matcher = REGISTRY.matcher::<Foo>().unwrap();
    let with = |b: &[f32]| Foo {
        b: b.to_vec(),
        ..Foo::default()
    };
    let expected = with(&[1., 2., 3.]);
    assert!(matcher.matches(&expected, &with(&[1., 2., 3.])));
    assert!(!matcher.matches(&expected, &with(&[1., 2.])));
    assert!(!matcher.matches(&expected, &with(&[3., 2., 1.])));

    let mismatch = matcher.test(&expected, &with(&[1., 2.])).into_mismatches();
    assert_eq!(mismatch.len(), 1);
    assert_eq!(
        mismatch[0].kind,
        MismatchKind::Length {
            expected: 3,
            actual: 2,
        }
    );
}

#[test]
fn exhaustive_report() {
    let registry = Registry::builder()
        .options(Options::default().report(Report::All))
        .record_type::<Bar>()
        .record_type::<Foo>()
        .build()
        .unwrap();
    let matcher = registry.matcher::<Foo>().unwrap();

    let expected = Foo {
        a: Some(1),
        repeated_bar: vec![bar(1), bar(2), bar(3)],
        ..Foo::default()
    };
    let actual = Foo {
        a: Some(2),
        repeated_bar: vec![bar(1), bar(9)],
        ..Foo::default()
    };
    assert_eq!(
        matcher.test(&expected, &actual).to_string(),
        "Foo differs:\n  \
         a: expected 1, got 2\n  \
         repeated_bar: expected 3 elements, got 2\n  \
         repeated_bar[1].aa: expected 2, got 9\n  \
         repeated_bar[2]: missing expected element Bar { aa: 3 }"
    );
}

#[test]
fn registering_out_of_order_fails() {
    let mut registry = Registry::new();
    assert!(matches!(
        registry.register_record::<Foo>(),
        Err(BuildError::Unresolved {
            record: "Foo",
            field: "bar",
            ..
        })
    ));
    registry.register_record::<Bar>().unwrap();
    registry.register_record::<Foo>().unwrap();
    assert_eq!(registry.records(), ["Bar", "Foo"]);
}

#[test]
fn passing_assertion() {
    assert_record_eq!(REGISTRY, &bar(3), &bar(3));
}

#[test]
#[should_panic(expected = "repeated_bar[0].aa: expected 1, got 2")]
fn failing_assertion() {
    assert_record_eq!(
        REGISTRY,
        &Foo {
            repeated_bar: vec![bar(1)],
            ..Foo::default()
        },
        &Foo {
            repeated_bar: vec![bar(2)],
            ..Foo::default()
        },
    );
}

#[test]
fn clones_match() {
    let samples = [
        Foo::default(),
        Foo {
            a: Some(4),
            b: vec![f32::NAN],
            ..Foo::default()
        },
        Foo {
            repeated_bar: vec![bar(1), bar(2)],
            ..Foo::default()
        },
    ];
    let matcher = REGISTRY.matcher::<Foo>().unwrap();
    for foo in &samples {
        assert!(matcher.matches(foo, &foo.clone()));
    }
}

#[derive(Record, Debug, Default)]
struct Empty {
    #[record(skip)]
    ignored: i32,
}

#[derive(Record, Debug, Default)]
struct Wrap<T> {
    #[record(nested)]
    inner: T,
}

#[test]
fn zero_field_record() {
    let mut registry = Registry::new();
    registry.register_record::<Empty>().unwrap();
    assert!(Empty::fields().is_empty());
    assert_record_eq!(registry, &Empty { ignored: 1 }, &Empty { ignored: 2 });
    assert_eq!(common::render(&registry, &Empty { ignored: 1 }), "Empty");
}

#[test]
fn generic_record() {
    let registry = Registry::builder()
        .record_type::<Wrap<Bar>>()
        .record_type::<Bar>()
        .build()
        .unwrap();
    let matcher = registry.matcher::<Wrap<Bar>>().unwrap();
    let wrap = |aa| Wrap { inner: bar(aa) };

    assert!(matcher.matches(&wrap(1), &wrap(1)));
    assert!(!matcher.matches(&wrap(1), &wrap(2)));
    assert_eq!(
        matcher.test(&wrap(1), &wrap(2)).first().unwrap().to_string(),
        "inner.aa: expected 1, got 2"
    );
    assert_eq!(
        common::render(&registry, &wrap(3)),
        "Wrap { inner: Bar { aa: 3 } }"
    );
}
