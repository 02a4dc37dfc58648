use macrofy::WrapperMacro;
use macrofy_macros::macrofy;

macrofy! {
    /// Verifies that `#[macrofy(crate = "macrofy")]` is accepted. Uses the
    /// real crate name as a self-referential alias so no workspace
    /// reconfiguration is needed.
    #[macrofy(crate = "macrofy")]
    pub class Aliased<Value> {
        pub let mut wrapped_value: Value;
        pub let projected_value: u64 { get { self.hits } }
    }
}

fn main() {
    let config: macrofy::WrapperConfig = AliasedMacro::config();
    assert!(config.is_reference_type);
    assert!(config.projected_value_type.is_some());
}
