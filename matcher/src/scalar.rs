//! Exact equality for leaf values.

use core::fmt::Debug;

/// A leaf value that is compared directly rather than through a nested
/// matcher: integers, floats, booleans, strings, byte sequences, and
/// protocol enums.
///
/// Comparison is exact. There is no tolerance for floating point values; the
/// only concession is that two NaNs are considered the same, so that a record
/// always matches itself.
///
/// Most user types opt in with [`scalar_via_partial_eq!`]:
///
/// ```
/// #[derive(Debug, PartialEq)]
/// enum DisplayState { On, Off }
///
/// fieldwise::scalar_via_partial_eq!(DisplayState);
///
/// use fieldwise::Scalar;
/// assert!(Scalar::same(&DisplayState::On, &DisplayState::On));
/// assert!(!Scalar::same(&DisplayState::On, &DisplayState::Off));
/// ```
///
/// [`scalar_via_partial_eq!`]: macro.scalar_via_partial_eq.html
pub trait Scalar: Debug + Send + Sync + 'static {
    /// Checks `a` and `b` for equality.
    fn same(a: &Self, b: &Self) -> bool;
}

/// Implements [`Scalar`] for one or more types using their `PartialEq`.
///
/// [`Scalar`]: trait.Scalar.html
#[macro_export]
macro_rules! scalar_via_partial_eq {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::Scalar for $ty {
                fn same(a: &Self, b: &Self) -> bool {
                    a == b
                }
            }
        )+
    };
}

scalar_via_partial_eq!(
    (),
    bool,
    char,
    u8,
    u16,
    u32,
    u64,
    u128,
    usize,
    i8,
    i16,
    i32,
    i64,
    i128,
    isize,
    String,
    &'static str,
    Vec<u8>,
    core::time::Duration,
);

macro_rules! scalar_float {
    ($($ty:ty),*) => {
        $(
            impl Scalar for $ty {
                fn same(a: &Self, b: &Self) -> bool {
                    a == b || (a.is_nan() && b.is_nan())
                }
            }
        )*
    };
}

scalar_float!(f32, f64);
