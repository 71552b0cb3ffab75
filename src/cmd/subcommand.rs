use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::{printer::OutputFormat, provider::ProviderName, resources::NamespaceFilter};

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum SubCommand {
    /// Prints AlbConfigs, IngressClasses and Ingresses converted from ingress-nginx Ingresses
    Print(PrintArgs),
}

#[derive(Args, Debug, Clone, Default, PartialEq)]
pub struct PrintArgs {
    /// Output format [default: yaml]
    #[arg(short, long, value_name = "yaml|json", value_enum)]
    pub output: Option<OutputFormat>,

    /// Read ingresses from a YAML or JSON manifest instead of the cluster
    #[arg(long, alias = "input_file", value_name = "PATH")]
    pub input_file: Option<PathBuf>,

    /// Namespace scope of this run, ignored with --all-namespaces
    #[arg(short, long)]
    pub namespace: Option<String>,

    /// Read ingresses from all namespaces
    #[arg(short = 'A', long)]
    pub all_namespaces: bool,

    /// Providers to convert with (e.g. --providers ingress-nginx)
    #[arg(long, value_delimiter = ',')]
    pub providers: Option<Vec<String>>,
}

impl PrintArgs {
    /// Namespace filter given explicitly on the command line, if any.
    /// `--all-namespaces` wins over `--namespace`.
    pub fn namespace_filter(&self) -> Option<NamespaceFilter> {
        if self.all_namespaces {
            return Some(NamespaceFilter::All);
        }

        self.namespace.clone().map(NamespaceFilter::Namespace)
    }

    pub fn provider_names(&self) -> Option<Vec<ProviderName>> {
        self.providers
            .as_ref()
            .map(|providers| providers.iter().map(|p| ProviderName::new(p.as_str())).collect())
    }
}
