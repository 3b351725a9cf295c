//! The [`ini!`](crate::ini) macro for building documents inline.

/// Builds a [`Document`](crate::Document) from a JSON-like literal.
///
/// Top-level pairs with a scalar value become global keys; pairs whose value
/// is a `{ ... }` block become sections. Values are anything convertible into
/// [`Value`](crate::Value) and are stored in canonical text form.
///
/// # Examples
///
/// ```rust
/// use inidoc::ini;
///
/// let doc = ini!({
///     "version": 2,
///     "database": {
///         "host": "db.local",
///         "ssl": true,
///         "ratio": 0.75
///     },
///     "empty": {}
/// });
///
/// assert_eq!(doc.get("", "version").unwrap(), "2");
/// assert!(doc.get_as::<bool>("database", "ssl").unwrap());
/// assert!(doc.get_section("empty").unwrap().is_empty());
/// ```
#[macro_export]
macro_rules! ini {
    // Section block
    (@munch $document:ident; $section:literal : { $($body:tt)* } $(, $($rest:tt)*)?) => {
        $crate::ini!(@section $document, $section; $($body)*);
        $crate::ini!(@munch $document; $($($rest)*)?);
    };

    // Global key
    (@munch $document:ident; $key:literal : $value:expr $(, $($rest:tt)*)?) => {
        $document.set_value("", $key, $value);
        $crate::ini!(@munch $document; $($($rest)*)?);
    };

    (@munch $document:ident;) => {};

    (@section $document:ident, $section:literal; $($key:literal : $value:expr),* $(,)?) => {{
        #[allow(unused_variables)]
        let section = $document.section_or_insert($section);
        $(
            section.set_value($key, $value);
        )*
    }};

    ({ $($body:tt)* }) => {{
        #[allow(unused_mut)]
        let mut document = $crate::Document::new();
        $crate::ini!(@munch document; $($body)*);
        document
    }};
}
