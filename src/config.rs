use std::path::PathBuf;

use anyhow::Result;
use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::printer::OutputFormat;

#[derive(Debug, Default)]
pub enum ConfigLoadOption {
    #[default]
    Default,

    Path(PathBuf),
}

#[derive(Default, Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub path: Option<String>,
    pub level: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct IngressNginxConfig {
    /// Ingresses with any other class are ignored when reading.
    pub ingress_classes: Vec<String>,
}

impl Default for IngressNginxConfig {
    fn default() -> Self {
        Self {
            ingress_classes: vec!["nginx".to_string()],
        }
    }
}

#[derive(Default, Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub output: OutputFormat,

    /// Providers used when `--providers` is not given. Empty means every registered provider.
    #[serde(default)]
    pub providers: Vec<String>,

    #[serde(default)]
    pub ingress_nginx: IngressNginxConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    pub fn load(option: ConfigLoadOption) -> Result<Self> {
        let figment = Figment::new();

        let figment = match option {
            ConfigLoadOption::Default => figment.merge(Serialized::defaults(Self::default())),
            ConfigLoadOption::Path(path) => figment
                .merge(Serialized::defaults(Self::default()))
                .merge(Yaml::file(path)),
        }
        .merge(Env::prefixed("INGRESS2ALBCONFIG_").split("__"));

        Self::extract(figment)
    }

    fn extract(figment: Figment) -> Result<Self> {
        let config = figment.extract_lossy()?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn defaults_use_yaml_and_nginx_class() {
        let config =
            Config::extract(Figment::new().merge(Serialized::defaults(Config::default()))).unwrap();

        assert_eq!(config.output, OutputFormat::Yaml);
        assert_eq!(config.ingress_nginx.ingress_classes, vec!["nginx".to_string()]);
        assert!(config.providers.is_empty());
    }

    #[test]
    fn yaml_overrides_defaults() {
        let yaml = indoc! {
            "
            output: json
            providers:
              - ingress-nginx
            ingress_nginx:
              ingress_classes:
                - nginx
                - nginx-internal
            logging:
              level: debug
            "
        };

        let config = Config::extract(
            Figment::new()
                .merge(Serialized::defaults(Config::default()))
                .merge(Yaml::string(yaml)),
        )
        .unwrap();

        assert_eq!(
            config,
            Config {
                output: OutputFormat::Json,
                providers: vec!["ingress-nginx".to_string()],
                ingress_nginx: IngressNginxConfig {
                    ingress_classes: vec!["nginx".to_string(), "nginx-internal".to_string()],
                },
                logging: LoggingConfig {
                    path: None,
                    level: Some("debug".to_string()),
                },
            }
        );
    }
}
