use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::sync::{PoisonError, RwLock};
use toml_edit::{value, DocumentMut};
use tracing::info;

/// The values the message pipeline reads while it formats a message.
///
/// Implementations are queried on every formatting call, so a reloaded value
/// takes effect for the next message without restarting the worker.
pub trait Settings: Send + Sync {
    fn tax_percent(&self) -> f64;
    fn truncate_numbers(&self) -> bool;
}

trait ConfigSerializeDefault {
    fn fix_config(self, name: &str, doc: &mut DocumentMut);
}

macro_rules! impl_simple_default {
    ( $( $type:ty ),* ) => {
        $(
            impl ConfigSerializeDefault for $type {
                fn fix_config(self, name: &str, doc: &mut DocumentMut) {
                    doc.entry(name).or_insert_with(|| value(self));
                }
            }
        )*
    }
}

impl_simple_default!(String, i64, f64, bool);

macro_rules! gen_config {
    (
        $( $(#[$doc:meta])* $name:ident: $type:ty = $default:expr),*
    ) => {
        #[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
        pub struct AuctionsConfig {
            $(
                $(#[$doc])*
                pub $name: $type,
            )*
        }

        impl Default for AuctionsConfig {
            fn default() -> Self {
                AuctionsConfig {
                    $( $name: $default, )*
                }
            }
        }

        impl AuctionsConfig {
            /// Loads the config file, adding any missing keys with their default
            /// value. The file is rewritten only when something was added.
            pub fn load(config_file: impl AsRef<Path>) -> Result<AuctionsConfig, ConfigError> {
                let path = config_file.as_ref();
                let str = match fs::read_to_string(path) {
                    Ok(str) => str,
                    Err(err) if err.kind() == std::io::ErrorKind::NotFound => String::new(),
                    Err(source) => return Err(ConfigError::Io { path: path.to_owned(), source }),
                };
                let mut doc = str.parse::<DocumentMut>().map_err(|source| ConfigError::Syntax {
                    path: path.to_owned(),
                    source,
                })?;

                $(
                    <$type as ConfigSerializeDefault>::fix_config($default, stringify!($name), &mut doc);
                )*

                let patched = doc.to_string();
                if str != patched {
                    info!("Writing default values to {}", path.display());
                    fs::write(path, &patched).map_err(|source| ConfigError::Io {
                        path: path.to_owned(),
                        source,
                    })?;
                }

                toml::from_str(&patched).map_err(|source| ConfigError::Deserialize {
                    path: path.to_owned(),
                    source,
                })
            }
        }
    };
}

gen_config! {
    /// Percentage of the winning bid kept as tax, shown by `[taxpercent]`.
    tax_percent: f64 = 0.0,
    /// Show money values as `1.5K` instead of `1,500`.
    truncate_numbers: bool = false,
    messages_file: String = "messages.toml".to_string()
}

impl Settings for AuctionsConfig {
    fn tax_percent(&self) -> f64 {
        self.tax_percent
    }

    fn truncate_numbers(&self) -> bool {
        self.truncate_numbers
    }
}

/// A config that can be swapped while the message worker is using it.
#[derive(Debug, Default)]
pub struct SharedSettings {
    config: RwLock<AuctionsConfig>,
}

impl SharedSettings {
    pub fn new(config: AuctionsConfig) -> SharedSettings {
        SharedSettings {
            config: RwLock::new(config),
        }
    }

    pub fn replace(&self, config: AuctionsConfig) {
        *self.config.write().unwrap_or_else(PoisonError::into_inner) = config;
    }

    pub fn reload(&self, config_file: impl AsRef<Path>) -> Result<(), ConfigError> {
        let config = AuctionsConfig::load(config_file)?;
        self.replace(config);
        Ok(())
    }

    pub fn snapshot(&self) -> AuctionsConfig {
        self.config
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Settings for SharedSettings {
    fn tax_percent(&self) -> f64 {
        self.config
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .tax_percent
    }

    fn truncate_numbers(&self) -> bool {
        self.config
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .truncate_numbers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("auctions-{}-{}.toml", name, std::process::id()))
    }

    #[test]
    fn load_fills_missing_keys() {
        let path = temp_path("config-fill");
        fs::write(&path, "truncate_numbers = true\n").unwrap();

        let config = AuctionsConfig::load(&path).unwrap();
        assert!(config.truncate_numbers);
        assert_eq!(config.tax_percent, 0.0);
        assert_eq!(config.messages_file, "messages.toml");

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("tax_percent"));
        assert!(written.starts_with("truncate_numbers = true"));
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn load_rejects_wrong_type() {
        let path = temp_path("config-type");
        fs::write(&path, "tax_percent = \"lots\"\n").unwrap();

        let err = AuctionsConfig::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Deserialize { .. }));
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn shared_settings_see_replacement() {
        let shared = SharedSettings::new(AuctionsConfig::default());
        assert!(!shared.truncate_numbers());

        shared.replace(AuctionsConfig {
            truncate_numbers: true,
            tax_percent: 12.5,
            ..Default::default()
        });
        assert!(shared.truncate_numbers());
        assert_eq!(shared.tax_percent(), 12.5);
    }
}
