use clap::Parser;
use std::path::PathBuf;

use crate::{config::ConfigLoadOption, kube::KubeOptions};

use super::SubCommand;

#[derive(Parser, Debug, Clone, PartialEq)]
#[command(author, version, about, long_about = None, disable_help_subcommand = true)]
pub struct Command {
    /// kubeconfig path
    #[arg(short = 'C', long, global = true, display_order = 1000)]
    pub kubeconfig: Option<PathBuf>,

    /// Context
    #[arg(short, long, global = true, display_order = 1000)]
    pub context: Option<String>,

    /// Logging
    #[arg(short = 'l', long, global = true, display_order = 1000)]
    pub logging: bool,

    /// Config file path
    #[arg(long, global = true, display_order = 1000)]
    pub config_file: Option<PathBuf>,

    #[command(subcommand)]
    pub subcommand: SubCommand,
}

impl Command {
    pub fn init() -> Self {
        Self::parse()
    }

    pub fn kube_options(&self) -> KubeOptions {
        KubeOptions {
            kubeconfig: self.kubeconfig.clone(),
            context: self.context.clone(),
        }
    }

    pub fn config_load_option(&self) -> ConfigLoadOption {
        if let Some(path) = &self.config_file {
            match path.try_exists() {
                Ok(true) => ConfigLoadOption::Path(path.clone()),
                Ok(false) => {
                    eprintln!("Config file not found: {:?}", path);

                    ConfigLoadOption::Default
                }
                Err(err) => {
                    eprintln!("Failed to check config file exists: {}", err);

                    ConfigLoadOption::Default
                }
            }
        } else {
            let Some(path) = xdg_config_home().map(|dir| dir.join("config.yaml")) else {
                return ConfigLoadOption::Default;
            };

            match path.try_exists() {
                Ok(true) => ConfigLoadOption::Path(path),
                Ok(false) => ConfigLoadOption::Default,
                Err(err) => {
                    eprintln!("Failed to check config file exists: {}", err);

                    ConfigLoadOption::Default
                }
            }
        }
    }
}

fn xdg_config_home() -> Option<PathBuf> {
    match std::env::var_os("XDG_CONFIG_HOME") {
        Some(dir) => Some(PathBuf::from(dir).join("ingress2albconfig")),
        None => dirs::home_dir().map(|home| home.join(".config").join("ingress2albconfig")),
    }
}
