//! Convert values to attribute text and stage them onto an element.

use std::borrow::Cow;

use indexmap::{IndexMap, IndexSet};

use crate::error_handling::log_or_panic_result;
use crate::host::Document;

/// A trait for using a arbitrary type as a attribute, style or text value.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a valid attribute value.",
    note = "Try converting the value to a string"
)]
pub trait ToAttribute {
    /// Produce the text of the value.
    fn to_attribute(self) -> Cow<'static, str>;
}

/// generate a `ToAttribute` implementation for a string type
macro_rules! attribute_string {
    ($($t:ty => $cow:expr),* $(,)?) => {
        $(
            impl ToAttribute for $t {
                #[inline]
                fn to_attribute(self) -> Cow<'static, str> {
                    ($cow)(self)
                }
            }
        )*
    };
}

attribute_string! {
    &'static str => Cow::Borrowed,
    String => Cow::Owned,
    Cow<'static, str> => |this| this,
    std::rc::Rc<str> => |this: std::rc::Rc<str>| Cow::Owned(String::from(&*this)),
    std::sync::Arc<str> => |this: std::sync::Arc<str>| Cow::Owned(String::from(&*this)),
    Box<str> => |this: Box<str>| Cow::Owned(String::from(this)),
}

impl ToAttribute for char {
    #[inline]
    fn to_attribute(self) -> Cow<'static, str> {
        Cow::Owned(self.to_string())
    }
}

/// generate `ToAttribute` for numerics, formatted with the given formatting crate
macro_rules! attribute_numeric {
    ($fmt:ident: $($t:ty),*) => {
        $(
            impl ToAttribute for $t {
                #[inline]
                fn to_attribute(self) -> Cow<'static, str> {
                    let mut buffer = $fmt::Buffer::new();
                    Cow::Owned(buffer.format(self).to_owned())
                }
            }
        )*
    };
}

attribute_numeric!(itoa: u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize);
attribute_numeric!(ryu: f32, f64);

/// Join style declarations into a single `prop:value;prop:value` string.
pub(crate) fn serialize_styles(styles: &IndexMap<Cow<'static, str>, Cow<'static, str>>) -> String {
    let mut result = String::new();
    for (index, (name, value)) in styles.iter().enumerate() {
        if index > 0 {
            result.push(';');
        }
        result.push_str(name);
        result.push(':');
        result.push_str(value);
    }
    result
}

/// Join class names with a single space.
pub(crate) fn serialize_classes(classes: &IndexSet<Cow<'static, str>>) -> String {
    let mut result = String::new();
    for (index, class) in classes.iter().enumerate() {
        if index > 0 {
            result.push(' ');
        }
        result.push_str(class);
    }
    result
}

/// The attributes collected for one render, keyed by name in first-insertion order.
///
/// Inserting an existing name replaces its value but keeps its position.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AttributeStage {
    /// name to value
    entries: IndexMap<Cow<'static, str>, Cow<'static, str>>,
}

impl AttributeStage {
    /// Stage custom attributes, then `style` if there are styles, then `class` if there are
    /// classes.
    pub(crate) fn collect(
        custom_attributes: &IndexMap<Cow<'static, str>, Cow<'static, str>>,
        styles: &IndexMap<Cow<'static, str>, Cow<'static, str>>,
        css_classes: &IndexSet<Cow<'static, str>>,
    ) -> Self {
        let mut stage = Self::default();
        for (name, value) in custom_attributes {
            stage.insert(name.clone(), value.clone());
        }
        if !styles.is_empty() {
            stage.insert(Cow::Borrowed("style"), Cow::Owned(serialize_styles(styles)));
        }
        if !css_classes.is_empty() {
            stage.insert(
                Cow::Borrowed("class"),
                Cow::Owned(serialize_classes(css_classes)),
            );
        }
        stage
    }

    /// Stage a single attribute
    pub(crate) fn insert(&mut self, name: Cow<'static, str>, value: Cow<'static, str>) {
        self.entries.insert(name, value);
    }

    /// Value staged for `name`
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(AsRef::as_ref)
    }

    /// Staged attributes in order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_ref(), value.as_ref()))
    }

    /// Number of staged attributes
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Is nothing staged
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Write every staged attribute onto `element` in staging order.
    pub(crate) fn flush<D: Document>(&self, document: &D, element: &D::Node) {
        for (name, value) in self.iter() {
            log::trace!("Setting attribute `{name}`=`{value}`");
            log_or_panic_result!(
                document.set_attribute(element, name, value),
                "Failed to set attribute `{name}`"
            );
        }
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use proptest::prelude::*;

    use super::*;

    /// Check the style string parses as css declarations
    #[expect(clippy::panic, reason = "This is meant for tests")]
    fn assert_valid_declarations(style: &str) {
        let css = format!("h1 {{ {style} }}");
        let result = lightningcss::stylesheet::StyleSheet::parse(
            &css,
            lightningcss::stylesheet::ParserOptions {
                error_recovery: false,
                ..Default::default()
            },
        );
        if let Err(error) = result {
            panic!("The following code was not valid css\n{css}\nerror: {error}");
        }
    }

    fn styles(
        entries: &[(&'static str, &'static str)],
    ) -> IndexMap<Cow<'static, str>, Cow<'static, str>> {
        entries
            .iter()
            .map(|(name, value)| (Cow::Borrowed(*name), Cow::Borrowed(*value)))
            .collect()
    }

    #[test]
    fn numbers_format_without_noise() {
        assert_eq!(42_u8.to_attribute(), "42");
        assert_eq!((-7_i64).to_attribute(), "-7");
        assert_eq!(1.5_f64.to_attribute(), "1.5");
        assert_eq!(2.0_f32.to_attribute(), "2.0");
        assert_eq!('x'.to_attribute(), "x");
        assert_eq!(std::rc::Rc::<str>::from("rc").to_attribute(), "rc");
    }

    #[test]
    fn styles_join_with_semicolons() {
        let result = serialize_styles(&styles(&[("color", "red"), ("display", "none")]));
        assert_eq!(result, "color:red;display:none");
        assert_valid_declarations(&result);
    }

    #[test]
    fn empty_stage() {
        let stage = AttributeStage::collect(&IndexMap::new(), &IndexMap::new(), &IndexSet::new());
        assert!(stage.is_empty());
        assert_eq!(stage.len(), 0);
    }

    #[test]
    fn stage_order_is_custom_style_class() {
        let custom = styles(&[("data-a", "1"), ("title", "t")]);
        let style = styles(&[("color", "red")]);
        let classes: IndexSet<_> = [Cow::Borrowed("x"), Cow::Borrowed("y")].into_iter().collect();

        let stage = AttributeStage::collect(&custom, &style, &classes);
        let staged: Vec<_> = stage.iter().collect();
        assert_eq!(
            staged,
            vec![
                ("data-a", "1"),
                ("title", "t"),
                ("style", "color:red"),
                ("class", "x y"),
            ]
        );
    }

    #[test]
    fn custom_style_attribute_is_overwritten_in_place() {
        let custom = styles(&[("style", "margin:0"), ("data-a", "1")]);
        let style = styles(&[("color", "red")]);

        let stage = AttributeStage::collect(&custom, &style, &IndexSet::new());
        let staged: Vec<_> = stage.iter().collect();
        assert_eq!(staged, vec![("style", "color:red"), ("data-a", "1")]);
    }

    #[test]
    fn custom_class_attribute_survives_without_classes() {
        let custom = styles(&[("class", "raw")]);
        let stage = AttributeStage::collect(&custom, &IndexMap::new(), &IndexSet::new());
        assert_eq!(stage.get("class"), Some("raw"));
    }

    proptest! {
        #[test]
        fn generated_styles_are_valid_css(
            entries in proptest::collection::vec(("[a-z]{1,8}(-[a-z]{1,8})?", "[a-z]{1,8}"), 1..6)
        ) {
            let map: IndexMap<Cow<'static, str>, Cow<'static, str>> = entries
                .into_iter()
                .map(|(name, value)| (Cow::Owned(name), Cow::Owned(value)))
                .collect();
            let result = serialize_styles(&map);
            assert_valid_declarations(&result);
            prop_assert_eq!(result.split(';').count(), map.len());
        }

        #[test]
        fn classes_round_trip_through_whitespace(
            classes in proptest::collection::vec("[a-zA-Z_][a-zA-Z0-9_-]{0,8}", 0..8)
        ) {
            let set: IndexSet<Cow<'static, str>> = classes.into_iter().map(Cow::Owned).collect();
            let result = serialize_classes(&set);
            let split: Vec<&str> = result.split_whitespace().collect();
            let expected: Vec<&str> = set.iter().map(AsRef::as_ref).collect();
            prop_assert_eq!(split, expected);
        }
    }
}
