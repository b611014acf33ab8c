//! Configuration with layered resolution using figment.
//!
//! Resolution order (highest priority last):
//! 1. Built-in defaults (the ARouter runtime)
//! 2. `autowire.toml` in the working directory, or the file passed with `--config`
//! 3. Environment variables: `AUTOWIRE_*`, sections separated by `__`
//!    (e.g. `AUTOWIRE_NAMING__SUFFIX`)
//!
//! ```toml
//! [naming]
//! suffix = "$$Injector"
//!
//! [runtime]
//! registry = "com.example.router.Router"
//! log_tag = "Router::"
//! ```

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

use crate::error::GenerateError;

pub const DEFAULT_CONFIG_FILE: &str = "autowire.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub naming: Naming,
    #[serde(default)]
    pub runtime: RuntimeSymbols,
}

/// How generated units are named and introduced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Naming {
    /// Appended to the owner's simple name.
    pub suffix: String,
    /// KDoc placed on every generated class.
    pub header: String,
}

impl Default for Naming {
    fn default() -> Self {
        Self {
            suffix: "$$ARouter$$Autowired".to_string(),
            header: "DO NOT EDIT THIS FILE!!! IT WAS GENERATED BY AROUTER.".to_string(),
        }
    }
}

/// Qualified names of the runtime symbols generated code talks to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeSymbols {
    /// Process-wide service registry (`getInstance()`, `navigation(..)`, `build(..)`).
    pub registry: String,
    /// Contract every generated injector implements.
    pub injector_interface: String,
    /// Supertype marking service-locator-provided types.
    pub provider_capability: String,
    /// Optional deserializer service looked up at runtime.
    pub serialization_service: String,
    /// Generic type token used to describe the deserialization target.
    pub type_wrapper: String,
    pub log_facility: String,
    pub log_tag: String,
    /// Marker annotation the discovery source filters on.
    pub autowired_annotation: String,
    pub serializable: String,
    pub parcelable: String,
}

impl Default for RuntimeSymbols {
    fn default() -> Self {
        Self {
            registry: "com.alibaba.android.arouter.launcher.ARouter".to_string(),
            injector_interface: "com.alibaba.android.arouter.facade.template.ISyringe".to_string(),
            provider_capability: "com.alibaba.android.arouter.facade.template.IProvider".to_string(),
            serialization_service: "com.alibaba.android.arouter.facade.service.SerializationService"
                .to_string(),
            type_wrapper: "com.alibaba.android.arouter.facade.model.TypeWrapper".to_string(),
            log_facility: "android.util.Log".to_string(),
            log_tag: "ARouter::".to_string(),
            autowired_annotation: "com.alibaba.android.arouter.facade.annotation.Autowired".to_string(),
            serializable: "java.io.Serializable".to_string(),
            parcelable: "android.os.Parcelable".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from defaults, a TOML file, and the environment.
    ///
    /// When `path` is `None`, `autowire.toml` is read if present.
    pub fn load(path: Option<&Path>) -> Result<Self, GenerateError> {
        let file = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));
        let config = Self::figment(file).extract()?;
        tracing::debug!(file = %file.display(), "loaded configuration");
        Ok(config)
    }

    fn figment(file: &Path) -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(file))
            .merge(Env::prefixed("AUTOWIRE_").split("__"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_target_arouter() {
        let config = Config::default();
        assert_eq!(config.naming.suffix, "$$ARouter$$Autowired");
        assert_eq!(config.runtime.log_tag, "ARouter::");
        assert!(config.runtime.registry.ends_with(".ARouter"));
    }

    #[test]
    fn test_toml_overrides_defaults() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "autowire.toml",
                r#"
                [naming]
                suffix = "$$Injector"

                [runtime]
                log_tag = "Router::"
                "#,
            )?;
            let config = Config::load(None).map_err(|e| e.to_string())?;
            assert_eq!(config.naming.suffix, "$$Injector");
            assert_eq!(config.runtime.log_tag, "Router::");
            // Untouched keys keep their defaults.
            assert_eq!(config.naming.header, Naming::default().header);
            Ok(())
        });
    }

    #[test]
    fn test_env_overrides_file() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("autowire.toml", "[naming]\nsuffix = \"$$FromFile\"\n")?;
            jail.set_env("AUTOWIRE_NAMING__SUFFIX", "$$FromEnv");
            let config = Config::load(None).map_err(|e| e.to_string())?;
            assert_eq!(config.naming.suffix, "$$FromEnv");
            Ok(())
        });
    }
}
