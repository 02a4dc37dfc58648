//! Descriptors generated by `macrofy!` for the reference wrappers.
//!
//! Each wrapper mirrors one of the shapes the synthesizer distinguishes:
//! read-only values, settable references and typed projections.

use macrofy::{WrapperConfig, WrapperMacro};
use macrofy_macros::macrofy;
use rstest::rstest;
use syn::parse_quote;

macrofy! {
    pub struct Example<Value> {
        pub let wrapped_value: Value;
        pub fn new(wrapped_value: Value) -> Self { Self { wrapped_value } }
    }

    pub class ExampleSettable<Value> {
        pub let mut wrapped_value: Value;
    }

    pub struct ExampleWithProjected<Value> {
        pub let mut wrapped_value: Value;
        pub let projected_value: i64 { hash(&self.wrapped_value) }
    }

    pub class ExampleWithSettableProjected<Value> {
        pub let mut wrapped_value: Value;
        pub let mut projected_value: i64 = 0;
    }

    #[macrofy]
    pub struct ExampleWithWrappedValue<Value> {
        pub let mut wrapped_value: Value;
    }
}

#[rstest]
fn read_only_wrapper_uses_defaults() {
    assert_eq!(ExampleMacro::config(), WrapperConfig::default());
}

#[rstest]
fn settable_reference_wrapper() {
    let expected = WrapperConfig::new()
        .with_reference_type(true)
        .with_wrapped_value_settable(true);
    assert_eq!(ExampleSettableMacro::config(), expected);
}

#[rstest]
fn projected_wrapper_exposes_its_type() {
    let expected = WrapperConfig::new()
        .with_wrapped_value_settable(true)
        .with_projected_value_type(parse_quote!(i64));
    assert_eq!(ExampleWithProjectedMacro::config(), expected);
}

#[rstest]
fn settable_projection_on_reference_wrapper() {
    let config = ExampleWithSettableProjectedMacro::config();
    assert!(config.is_reference_type);
    assert!(config.projected_value_is_settable);
    assert!(!config.storage_is_mutable());
}

#[rstest]
fn wrapped_value_initializer_wrapper() {
    let config = ExampleWithWrappedValueMacro::config();
    assert!(config.wrapped_value_is_settable);
    assert!(config.projected_value_type.is_none());
}

#[rstest]
fn descriptors_register_by_type() {
    let mut registry = macrofy::Registry::new();
    registry.register_macro::<ExampleSettableMacro>("ExampleSettable");
    registry.register_macro::<ExampleWithProjectedMacro>("ExampleWithProjected");
    assert_eq!(registry.len(), 2);
    assert!(registry.get("ExampleSettable").is_some_and(|config| config.is_reference_type));
}
