//! Wrapper registry files.
//!
//! A registry file lists wrapper configurations by attribute path:
//!
//! ```toml
//! [wrappers.Clamped]
//! wrapped_value_is_settable = true
//! projected_value_type = "i64"
//! ```
//!
//! Layers are merged with `figment`; later layers override earlier ones
//! key by key.

use std::collections::BTreeMap;

use camino::{Utf8Path, Utf8PathBuf};
use figment::Figment;
use figment::providers::{Format, Toml};
use macrofy::{Registry, WrapperConfig};
use quote::ToTokens;
use serde::{Deserialize, Serialize};

use crate::error::MacrofyError;
use crate::fs_helpers;

/// Registry file picked up from the working directory when present.
pub const DEFAULT_REGISTRY_FILE: &str = "macrofy.toml";

/// Serialized form of a registry.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RegistryFile {
    /// Wrapper configurations keyed by attribute path.
    #[serde(default)]
    pub wrappers: BTreeMap<String, WrapperSpec>,
}

/// Serialized form of a [`WrapperConfig`]; types are kept as source text.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct WrapperSpec {
    /// See [`WrapperConfig::wrapped_value_is_settable`].
    pub wrapped_value_is_settable: bool,
    /// See [`WrapperConfig::projected_value_is_settable`].
    pub projected_value_is_settable: bool,
    /// See [`WrapperConfig::is_reference_type`].
    pub is_reference_type: bool,
    /// See [`WrapperConfig::wrapper_type`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wrapper_type: Option<String>,
    /// See [`WrapperConfig::projected_value_type`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projected_value_type: Option<String>,
}

impl WrapperSpec {
    /// Parses the type expressions and builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`MacrofyError::InvalidType`] naming `wrapper` and the field
    /// when a type expression does not parse.
    pub fn to_config(&self, wrapper: &str) -> Result<WrapperConfig, MacrofyError> {
        let parse_type = |field: &'static str, source: Option<&String>| {
            source
                .map(|text| syn::parse_str::<syn::Type>(text))
                .transpose()
                .map_err(|error| MacrofyError::InvalidType {
                    wrapper: wrapper.to_owned(),
                    field,
                    source: error,
                })
        };
        Ok(WrapperConfig {
            wrapped_value_is_settable: self.wrapped_value_is_settable,
            projected_value_is_settable: self.projected_value_is_settable,
            is_reference_type: self.is_reference_type,
            wrapper_type: parse_type("wrapper_type", self.wrapper_type.as_ref())?,
            projected_value_type: parse_type(
                "projected_value_type",
                self.projected_value_type.as_ref(),
            )?,
        })
    }

    /// Renders a configuration, printing types as source text.
    #[must_use]
    pub fn from_config(config: &WrapperConfig) -> Self {
        let render = |ty: &syn::Type| ty.to_token_stream().to_string();
        Self {
            wrapped_value_is_settable: config.wrapped_value_is_settable,
            projected_value_is_settable: config.projected_value_is_settable,
            is_reference_type: config.is_reference_type,
            wrapper_type: config.wrapper_type.as_ref().map(render),
            projected_value_type: config.projected_value_type.as_ref().map(render),
        }
    }
}

impl RegistryFile {
    /// Builds the runtime registry.
    ///
    /// # Errors
    ///
    /// Propagates [`WrapperSpec::to_config`] failures.
    pub fn to_registry(&self) -> Result<Registry, MacrofyError> {
        self.wrappers
            .iter()
            .map(|(name, spec)| spec.to_config(name).map(|config| (name.clone(), config)))
            .collect()
    }

    /// Captures the entries of a runtime registry.
    #[must_use]
    pub fn from_registry(registry: &Registry) -> Self {
        Self {
            wrappers: registry
                .entries()
                .map(|(name, config)| (name.to_owned(), WrapperSpec::from_config(config)))
                .collect(),
        }
    }

    /// Renders the registry as a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`MacrofyError::Toml`] when serialization fails.
    pub fn to_toml(&self) -> Result<String, MacrofyError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

/// Merges registry layers, later layers overriding earlier ones.
///
/// `default_file` is optional: a missing file contributes nothing. Every
/// path in `layers` must exist.
///
/// # Errors
///
/// Returns [`MacrofyError::Io`] for unreadable layers,
/// [`MacrofyError::Registry`] for malformed TOML and
/// [`MacrofyError::InvalidType`] for type expressions that do not parse.
pub fn load_registry(
    default_file: Option<&Utf8Path>,
    layers: &[Utf8PathBuf],
) -> Result<Registry, MacrofyError> {
    let mut figment = Figment::new();
    if let Some(path) = default_file.filter(|path| path.is_file()) {
        tracing::debug!(%path, "merging default registry");
        figment = figment.merge(Toml::string(&fs_helpers::read_to_string(path)?));
    }
    for path in layers {
        tracing::debug!(%path, "merging registry layer");
        figment = figment.merge(Toml::string(&fs_helpers::read_to_string(path)?));
    }
    let file: RegistryFile = figment.extract()?;
    let registry = file.to_registry()?;
    tracing::debug!(wrappers = registry.len(), "loaded wrapper registry");
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Context, Result, ensure};
    use rstest::{fixture, rstest};
    use syn::parse_quote;
    use tempfile::TempDir;

    #[fixture]
    fn workdir() -> TempDir {
        tempfile::tempdir().unwrap_or_else(|error| panic!("failed to create temp dir: {error}"))
    }

    fn write(dir: &TempDir, name: &str, contents: &str) -> Result<Utf8PathBuf> {
        let path = Utf8PathBuf::from_path_buf(dir.path().join(name))
            .map_err(|path| anyhow::anyhow!("non UTF-8 temp path {}", path.display()))?;
        std::fs::write(&path, contents).context("write registry")?;
        Ok(path)
    }

    #[rstest]
    fn later_layers_override_earlier_ones(workdir: TempDir) -> Result<()> {
        let base = write(
            &workdir,
            "base.toml",
            "[wrappers.Clamped]\nwrapped_value_is_settable = true\nprojected_value_type = \"i64\"\n",
        )?;
        let local = write(
            &workdir,
            "local.toml",
            "[wrappers.Clamped]\nwrapped_value_is_settable = false\n\n[wrappers.Logged]\nis_reference_type = true\n",
        )?;
        let registry = load_registry(None, &[base, local])?;
        ensure!(registry.len() == 2);
        let clamped = registry.get("Clamped").context("Clamped missing")?;
        ensure!(!clamped.wrapped_value_is_settable, "override not applied");
        ensure!(clamped.projected_value_type == Some(parse_quote!(i64)), "base key lost");
        ensure!(registry.get("Logged").is_some_and(|config| config.is_reference_type));
        Ok(())
    }

    #[rstest]
    fn missing_default_file_is_ignored(workdir: TempDir) -> Result<()> {
        let absent = write(&workdir, "placeholder", "")?.with_file_name(DEFAULT_REGISTRY_FILE);
        let registry = load_registry(Some(&absent), &[])?;
        ensure!(registry.is_empty());
        Ok(())
    }

    #[rstest]
    fn missing_layer_is_an_error(workdir: TempDir) -> Result<()> {
        let absent = write(&workdir, "placeholder", "")?.with_file_name("absent.toml");
        let result = load_registry(None, &[absent]);
        ensure!(matches!(result, Err(MacrofyError::Io { .. })));
        Ok(())
    }

    #[rstest]
    fn rejects_unknown_keys(workdir: TempDir) -> Result<()> {
        let path = write(&workdir, "bad.toml", "[wrappers.Clamped]\nsettable = true\n")?;
        let result = load_registry(None, &[path]);
        ensure!(matches!(result, Err(MacrofyError::Registry(_))));
        Ok(())
    }

    #[rstest]
    fn reports_unparsable_types() -> Result<()> {
        let spec = WrapperSpec {
            projected_value_type: Some("Vec<".to_owned()),
            ..WrapperSpec::default()
        };
        let result = spec.to_config("Broken");
        let Err(MacrofyError::InvalidType { wrapper, field, .. }) = result else {
            anyhow::bail!("expected an invalid type error");
        };
        ensure!(wrapper == "Broken" && field == "projected_value_type");
        Ok(())
    }

    #[rstest]
    fn renders_only_set_types() -> Result<()> {
        let mut registry = Registry::new();
        registry.register(
            "Counted",
            WrapperConfig::new()
                .with_reference_type(true)
                .with_projected_value_type(parse_quote!(u64)),
        );
        let rendered = RegistryFile::from_registry(&registry).to_toml()?;
        ensure!(rendered.contains("[wrappers.Counted]"), "unexpected TOML: {rendered}");
        ensure!(rendered.contains("is_reference_type = true"));
        ensure!(rendered.contains("projected_value_type = \"u64\""));
        ensure!(!rendered.contains("wrapper_type ="), "unset type rendered: {rendered}");
        let parsed: RegistryFile = toml::from_str(&rendered)?;
        ensure!(parsed.to_registry()? == registry);
        Ok(())
    }
}
