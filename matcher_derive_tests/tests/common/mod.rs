use fieldwise::Registry;

/// Renders `value` with the printer registered for its type.
pub fn render<R: 'static>(registry: &Registry, value: &R) -> String {
    match registry.printer::<R>() {
        Ok(printer) => printer.render(value),
        Err(err) => panic!("{}", err),
    }
}

/// Generates one test per record, checking that it matches itself and
/// renders as given.
#[macro_export]
macro_rules! renders_as {
    ($registry:expr; $($name:ident => $x:expr, $s:expr;)*) => {
        $(
            #[test]
            fn $name() {
                let x = $x;
                fieldwise::assert_record_eq!($registry, &x, &x);
                assert_eq!(common::render(&$registry, &x), $s);
            }
        )*
    };
}
