use std::path::PathBuf;

use kube::{
    config::{KubeConfigOptions, Kubeconfig, KubeconfigError, NamedContext},
    Client, Config,
};

use crate::{error::Error, logger};

/// Where to find the cluster: kubeconfig path and context overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KubeOptions {
    pub kubeconfig: Option<PathBuf>,
    pub context: Option<String>,
}

pub fn read_kubeconfig(path: Option<&PathBuf>) -> Result<Kubeconfig, KubeconfigError> {
    if let Some(path) = path {
        Kubeconfig::read_from(path)
    } else {
        Kubeconfig::read()
    }
}

/// The named context, else the current context, else the first one.
pub fn read_context(kubeconfig: &Kubeconfig, context: Option<&str>) -> Result<NamedContext, Error> {
    let find = |name: &str| {
        kubeconfig
            .contexts
            .iter()
            .find(|ctx| ctx.name == name)
            .cloned()
            .ok_or_else(|| Error::Context(format!("Cannot find context {}", name)))
    };

    if let Some(context) = context {
        find(context)
    } else if let Some(current_context) = &kubeconfig.current_context {
        find(current_context)
    } else {
        kubeconfig
            .contexts
            .first()
            .cloned()
            .ok_or_else(|| Error::Context("Empty contexts".to_string()))
    }
}

/// Namespace of the selected context, `default` when the context sets none.
pub fn namespace_in_context(options: &KubeOptions) -> Result<String, Error> {
    let kubeconfig = read_kubeconfig(options.kubeconfig.as_ref())?;

    let context = read_context(&kubeconfig, options.context.as_deref())?;

    Ok(context_namespace(&context))
}

fn context_namespace(context: &NamedContext) -> String {
    context
        .context
        .as_ref()
        .and_then(|ctx| ctx.namespace.clone())
        .unwrap_or_else(|| "default".to_string())
}

pub async fn kube_client(options: &KubeOptions) -> Result<Client, Error> {
    let kubeconfig = read_kubeconfig(options.kubeconfig.as_ref())?;

    let context = read_context(&kubeconfig, options.context.as_deref())?;

    let config_options = KubeConfigOptions {
        context: Some(context.name.to_string()),
        ..Default::default()
    };

    let config = Config::from_custom_kubeconfig(kubeconfig, &config_options).await?;

    logger!(info, "context {} ({})", context.name, config.cluster_url);

    let client = Client::try_from(config)?;

    Ok(client)
}
