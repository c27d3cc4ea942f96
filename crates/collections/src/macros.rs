/// Shorthand for `Entry::new(key.into(), value.into())`
#[macro_export]
macro_rules! entry {
    ( $key: expr, $value: expr) => {
        $crate::Entry::new($key.into(), $value.into())
    };
}
