//! A metrics-logging schema: atoms wrapping typed events, batched into
//! shell data, with attribution chains and enum-valued states.

use fieldwise::{
    assert_record_eq, scalar_via_partial_eq, Options, Record, Registry,
};
use once_cell::sync::Lazy;

#[macro_use]
mod common;

#[derive(Debug, Default, Clone, Copy, PartialEq)]
enum DisplayState {
    #[default]
    Unknown,
    Off,
    On,
}

#[derive(Debug, Default, Clone, Copy, PartialEq)]
enum PluggedState {
    #[default]
    None,
    Ac,
    Usb,
}

scalar_via_partial_eq!(DisplayState, PluggedState);

#[derive(Record, Debug, Default, Clone)]
struct AttributionNode {
    #[record(optional)]
    uid: Option<i32>,
    #[record(optional)]
    tag: Option<String>,
}

#[derive(Record, Debug, Default, Clone)]
struct TrainExperimentIds {
    #[record(repeated)]
    experiment_id: Vec<i64>,
}

#[derive(Record, Debug, Default, Clone)]
struct ScreenStateChanged {
    #[record(optional)]
    state: Option<DisplayState>,
}

#[derive(Record, Debug, Default, Clone)]
struct PluggedStateChanged {
    #[record(optional)]
    state: Option<PluggedState>,
}

#[derive(Record, Debug, Default, Clone)]
struct CpuActiveTime {
    #[record(optional)]
    uid: Option<i32>,
    #[record(optional)]
    time_millis: Option<i64>,
}

#[derive(Record, Debug, Default, Clone)]
struct PackageInfo {
    #[record(optional)]
    version: Option<i64>,
    #[record(optional)]
    uid: Option<i32>,
    #[record(optional)]
    deleted: Option<bool>,
    #[record(optional)]
    truncated_certificate_hash: Option<Vec<u8>>,
    #[record(optional)]
    name_hash: Option<i64>,
    #[record(optional)]
    version_string_hash: Option<i64>,
    #[record(optional)]
    name: Option<String>,
    #[record(optional)]
    version_string: Option<String>,
    #[record(optional)]
    installer_index: Option<i32>,
    #[record(optional)]
    installer_hash: Option<i64>,
    #[record(optional)]
    installer: Option<String>,
}

#[derive(Record, Debug, Default, Clone)]
struct TestAtomReported {
    #[record(nested, repeated)]
    attribution_node: Vec<AttributionNode>,
    #[record(optional)]
    int_field: Option<i32>,
    #[record(optional)]
    long_field: Option<i64>,
    #[record(optional)]
    float_field: Option<f32>,
    #[record(optional)]
    string_field: Option<String>,
    #[record(optional)]
    boolean_field: Option<bool>,
    #[record(optional)]
    state: Option<DisplayState>,
    #[record(nested, optional)]
    bytes_field: Option<TrainExperimentIds>,
    #[record(repeated)]
    repeated_int_field: Vec<i32>,
    #[record(repeated)]
    repeated_long_field: Vec<i64>,
    #[record(repeated)]
    repeated_float_field: Vec<f32>,
    #[record(repeated)]
    repeated_string_field: Vec<String>,
    #[record(repeated)]
    repeated_boolean_field: Vec<bool>,
    #[record(repeated)]
    repeated_enum_field: Vec<DisplayState>,
}

#[derive(Record, Debug, Default, Clone)]
struct Atom {
    #[record(nested, optional)]
    screen_state_changed: Option<ScreenStateChanged>,
    #[record(nested, optional)]
    test_atom_reported: Option<TestAtomReported>,
    /// Not declared: never compared, never printed.
    #[record(skip)]
    pushed_at: u64,
}

#[derive(Record, Debug, Default, Clone)]
struct ShellData {
    #[record(nested, repeated)]
    atom: Vec<Atom>,
    #[record(repeated)]
    elapsed_timestamp_nanos: Vec<i64>,
}

/// Registered containers first, to show the builder doesn't care.
static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    Registry::builder()
        .record_type::<ShellData>()
        .record_type::<Atom>()
        .record_type::<TestAtomReported>()
        .record_type::<TrainExperimentIds>()
        .record_type::<AttributionNode>()
        .record_type::<ScreenStateChanged>()
        .record_type::<PluggedStateChanged>()
        .record_type::<CpuActiveTime>()
        .record_type::<PackageInfo>()
        .build()
        .unwrap()
});

fn node(uid: i32, tag: &str) -> AttributionNode {
    AttributionNode {
        uid: Some(uid),
        tag: Some(tag.into()),
    }
}

fn screen(state: DisplayState) -> Atom {
    Atom {
        screen_state_changed: Some(ScreenStateChanged { state: Some(state) }),
        ..Atom::default()
    }
}

fn reported() -> TestAtomReported {
    TestAtomReported {
        attribution_node: vec![node(1001, "tag1"), node(1002, "tag2")],
        int_field: Some(42),
        string_field: Some("test".into()),
        bytes_field: Some(TrainExperimentIds {
            experiment_id: vec![1, 2, 3],
        }),
        repeated_enum_field: vec![DisplayState::Off, DisplayState::On],
        ..TestAtomReported::default()
    }
}

renders_as! { REGISTRY;
    attribution_node => node(1001, "tag1"),
        "AttributionNode { uid: 1001, tag: \"tag1\" }";
    plugged => PluggedStateChanged { state: Some(PluggedState::Usb) },
        "PluggedStateChanged { state: Usb }";
    plugged_unset => PluggedStateChanged::default(), "PluggedStateChanged";
    cpu_active_time => CpuActiveTime { uid: Some(0), time_millis: Some(15) },
        "CpuActiveTime { uid: 0, time_millis: 15 }";
    package_info => PackageInfo {
        uid: Some(10012),
        name: Some("com.example".into()),
        deleted: Some(false),
        ..PackageInfo::default()
    }, "PackageInfo { uid: 10012, deleted: false, name: \"com.example\" }";
    package_info_hashes => PackageInfo {
        truncated_certificate_hash: Some(vec![1, 2]),
        name_hash: Some(77),
        version_string: Some("1.0".into()),
        installer: Some("store".into()),
        ..PackageInfo::default()
    }, "PackageInfo { truncated_certificate_hash: [1, 2], name_hash: 77, \
        version_string: \"1.0\", installer: \"store\" }";
    test_atom => Atom {
        test_atom_reported: Some(reported()),
        ..Atom::default()
    }, "Atom { test_atom_reported: TestAtomReported { \
        attribution_node: [AttributionNode { uid: 1001, tag: \"tag1\" }, \
        AttributionNode { uid: 1002, tag: \"tag2\" }], \
        int_field: 42, string_field: \"test\", \
        bytes_field: TrainExperimentIds { experiment_id: [1, 2, 3] }, \
        repeated_enum_field: [Off, On] } }";
    shell_data => ShellData {
        atom: vec![screen(DisplayState::On), screen(DisplayState::Off)],
        elapsed_timestamp_nanos: vec![100, 200],
    }, "ShellData { atom: [\
        Atom { screen_state_changed: ScreenStateChanged { state: On } }, \
        Atom { screen_state_changed: ScreenStateChanged { state: Off } }], \
        elapsed_timestamp_nanos: [100, 200] }";
}

#[test]
fn registered_contents_first() {
    assert_eq!(
        REGISTRY.records(),
        [
            "TrainExperimentIds",
            "AttributionNode",
            "TestAtomReported",
            "ScreenStateChanged",
            "Atom",
            "ShellData",
            "PluggedStateChanged",
            "CpuActiveTime",
            "PackageInfo",
        ]
    );
}

#[test]
fn undeclared_fields_are_ignored() {
    let expected = Atom {
        pushed_at: 1,
        ..screen(DisplayState::On)
    };
    let actual = Atom {
        pushed_at: 2,
        ..screen(DisplayState::On)
    };
    assert_record_eq!(REGISTRY, &expected, &actual);
}

#[test]
fn shell_data_order_matters() {
    let matcher = REGISTRY.matcher::<ShellData>().unwrap();
    let expected = ShellData {
        atom: vec![screen(DisplayState::On), screen(DisplayState::Off)],
        elapsed_timestamp_nanos: vec![100, 200],
    };
    let swapped = ShellData {
        atom: vec![screen(DisplayState::Off), screen(DisplayState::On)],
        elapsed_timestamp_nanos: vec![100, 200],
    };
    let explanation = matcher.test(&expected, &swapped);
    assert_eq!(
        explanation.first().unwrap().to_string(),
        "atom[0].screen_state_changed.state: expected On, got Off"
    );
}

#[test]
fn deep_path_through_repeated_nested() {
    let matcher = REGISTRY.matcher::<ShellData>().unwrap();
    let wrap = |reported: TestAtomReported| ShellData {
        atom: vec![Atom {
            test_atom_reported: Some(reported),
            ..Atom::default()
        }],
        ..ShellData::default()
    };
    let mut changed = reported();
    changed.attribution_node[1].tag = Some("tag3".into());

    let explanation = matcher.test(&wrap(reported()), &wrap(changed));
    assert_eq!(
        explanation.first().unwrap().to_string(),
        "atom[0].test_atom_reported.attribution_node[1].tag: \
         expected \"tag2\", got \"tag3\""
    );
}

#[test]
fn unset_and_default_compare_equal() {
    let matcher = REGISTRY.matcher::<CpuActiveTime>().unwrap();
    let unset = CpuActiveTime::default();
    let zero = CpuActiveTime {
        uid: Some(0),
        time_millis: Some(0),
    };
    assert!(matcher.matches(&unset, &zero));
    assert!(!matcher.matches(
        &unset,
        &CpuActiveTime {
            uid: Some(1),
            ..CpuActiveTime::default()
        }
    ));
}

#[test]
fn pretty_failure_message() {
    let registry = Registry::builder()
        .options(Options::default().pretty(true))
        .record_type::<ScreenStateChanged>()
        .build()
        .unwrap();
    let checker = registry.checker::<ScreenStateChanged>().unwrap();
    let failure = checker
        .check(
            &ScreenStateChanged {
                state: Some(DisplayState::On),
            },
            &ScreenStateChanged {
                state: Some(DisplayState::Off),
            },
        )
        .unwrap_err();
    assert_eq!(
        failure.expected,
        "ScreenStateChanged {\n    state: On,\n}"
    );
    assert_eq!(failure.explanation.mismatches().len(), 1);
}

#[test]
#[should_panic(expected = "experiment_id: expected 3 elements, got 2")]
fn experiment_ids_length() {
    assert_record_eq!(
        REGISTRY,
        &TrainExperimentIds {
            experiment_id: vec![1, 2, 3],
        },
        &TrainExperimentIds {
            experiment_id: vec![1, 2],
        },
    );
}
