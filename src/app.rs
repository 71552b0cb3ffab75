use std::io::Write;

use anyhow::{anyhow, Context as _, Result};

use crate::{
    cmd::{Command, PrintArgs, SubCommand},
    config::Config,
    error::Error,
    kube::{kube_client, namespace_in_context, KubeOptions},
    logger,
    printer::{print_resources, OutputFormat, ResourcePrinter},
    provider::{to_alb_api_resources, InputSource, ProviderConf, ProviderName, ProviderRegistry},
    resources::NamespaceFilter,
};

pub struct App;

impl App {
    pub fn run(cmd: Command, config: Config) -> Result<()> {
        let kube_options = cmd.kube_options();

        let rt = tokio::runtime::Runtime::new()?;

        match cmd.subcommand {
            SubCommand::Print(args) => {
                let runner = PrintRunner::new(args, kube_options, config);

                let stdout = std::io::stdout();
                let mut stdout = stdout.lock();

                rt.block_on(runner.run(&ProviderRegistry::builtin(), &mut stdout))
            }
        }
    }
}

/// Reads source ingresses, converts them and prints the result.
pub struct PrintRunner {
    args: PrintArgs,
    kube_options: KubeOptions,
    config: Config,
}

impl PrintRunner {
    pub fn new(args: PrintArgs, kube_options: KubeOptions, config: Config) -> Self {
        Self {
            args,
            kube_options,
            config,
        }
    }

    pub async fn run<W: Write>(&self, registry: &ProviderRegistry, writer: &mut W) -> Result<()> {
        let namespaces = self
            .namespace_filter(|| namespace_in_context(&self.kube_options))
            .context("failed to initialize namespace filter")?;

        logger!(info, "namespace filter {:?}", namespaces);

        let conf = ProviderConf {
            namespaces: namespaces.clone(),
            ingress_nginx: self.config.ingress_nginx.clone(),
        };

        let providers = self.providers();

        let resources = match &self.args.input_file {
            Some(path) => {
                let source = InputSource::File(path.as_path());

                to_alb_api_resources(registry, &conf, source, &providers).await
            }
            None => {
                let client = kube_client(&self.kube_options).await?;

                to_alb_api_resources(registry, &conf, InputSource::Cluster(&client), &providers)
                    .await
            }
        };

        let resources = match resources {
            Ok(resources) => resources,
            Err(Error::Conversion(errors)) => {
                for err in &errors {
                    eprintln!("{}", err);
                }
                return Err(anyhow!("conversion failed with {} errors", errors.len()));
            }
            Err(err) => return Err(err.into()),
        };

        let mut printer = ResourcePrinter::new(self.output_format());

        print_resources(&mut printer, &resources, &namespaces, writer)?;

        Ok(())
    }

    fn output_format(&self) -> OutputFormat {
        self.args.output.unwrap_or(self.config.output)
    }

    fn providers(&self) -> Vec<ProviderName> {
        self.args.provider_names().unwrap_or_else(|| {
            self.config
                .providers
                .iter()
                .map(|p| ProviderName::new(p.as_str()))
                .collect()
        })
    }

    /// `-A` means every namespace and `-n` that namespace. Otherwise the
    /// namespace of the current context is used; if it cannot be read, a file
    /// input falls back to every namespace while a cluster read fails.
    fn namespace_filter<F>(&self, current_namespace: F) -> Result<NamespaceFilter, Error>
    where
        F: FnOnce() -> Result<String, Error>,
    {
        if let Some(filter) = self.args.namespace_filter() {
            return Ok(filter);
        }

        match current_namespace() {
            Ok(ns) => Ok(NamespaceFilter::Namespace(ns)),
            Err(err) if self.args.input_file.is_some() => {
                logger!(info, "use all namespaces: {}", err);
                Ok(NamespaceFilter::All)
            }
            Err(err) => Err(err),
        }
    }
}
