//! Source ingress dialects and the registry they are selected from.

pub mod ingress_nginx;

use std::{collections::BTreeMap, fmt, path::Path};

use async_trait::async_trait;

use crate::{
    config::IngressNginxConfig,
    error::Error,
    field::ErrorList,
    logger,
    reader::IngressLister,
    resources::{AlbResources, NamespaceFilter},
};

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProviderName(String);

impl ProviderName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProviderName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for ProviderName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for ProviderName {
    fn from(name: String) -> Self {
        Self(name)
    }
}

/// Settings shared by every provider.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProviderConf {
    pub namespaces: NamespaceFilter,
    pub ingress_nginx: IngressNginxConfig,
}

/// Where source resources are read from.
#[derive(Clone, Copy)]
pub enum InputSource<'a> {
    Cluster(&'a dyn IngressLister),
    File(&'a Path),
}

#[async_trait]
pub trait Provider: Send + Sync {
    async fn read_resources_from_cluster(&mut self, lister: &dyn IngressLister)
        -> Result<(), Error>;

    fn read_resources_from_file(&mut self, path: &Path) -> Result<(), Error>;

    /// Converts the resources read so far. Field errors do not stop the
    /// conversion; callers decide what to do with a partial result.
    fn to_alb_resources(&self) -> (AlbResources, ErrorList);
}

pub type ProviderConstructor = fn(&ProviderConf) -> Box<dyn Provider>;

/// Explicit table of the providers a run may use.
#[derive(Default)]
pub struct ProviderRegistry {
    constructors: BTreeMap<ProviderName, ProviderConstructor>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every provider shipped in this crate.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register(ingress_nginx::NAME, ingress_nginx::IngressNginxProvider::construct);
        registry
    }

    pub fn register(&mut self, name: impl Into<ProviderName>, constructor: ProviderConstructor) {
        self.constructors.insert(name.into(), constructor);
    }

    pub fn supported(&self) -> Vec<ProviderName> {
        self.constructors.keys().cloned().collect()
    }

    pub fn construct(
        &self,
        name: &ProviderName,
        conf: &ProviderConf,
    ) -> Result<Box<dyn Provider>, Error> {
        let constructor = self.constructors.get(name).ok_or_else(|| {
            Error::UnknownProvider(format!(
                "{} (supported: {})",
                name,
                self.supported()
                    .iter()
                    .map(ProviderName::as_str)
                    .collect::<Vec<_>>()
                    .join(", ")
            ))
        })?;

        Ok(constructor(conf))
    }
}

/// Reads and converts resources with every requested provider.
///
/// An empty `providers` means every registered provider. Field errors of all
/// providers are collected, and any of them fails the whole run.
pub async fn to_alb_api_resources(
    registry: &ProviderRegistry,
    conf: &ProviderConf,
    source: InputSource<'_>,
    providers: &[ProviderName],
) -> Result<Vec<AlbResources>, Error> {
    let providers = if providers.is_empty() {
        registry.supported()
    } else {
        providers.to_vec()
    };

    let mut constructed = Vec::with_capacity(providers.len());
    for name in &providers {
        constructed.push((name, registry.construct(name, conf)?));
    }

    for (name, provider) in constructed.iter_mut() {
        match source {
            InputSource::Cluster(lister) => provider.read_resources_from_cluster(lister).await?,
            InputSource::File(path) => provider.read_resources_from_file(path)?,
        }

        logger!(debug, "provider {} read resources", name);
    }

    let mut resources = Vec::with_capacity(constructed.len());
    let mut errors = ErrorList::new();

    for (name, provider) in &constructed {
        let (converted, errs) = provider.to_alb_resources();

        logger!(
            debug,
            "provider {} converted {} resources with {} errors",
            name,
            converted.len(),
            errs.len()
        );

        resources.push(converted);
        errors.extend(errs);
    }

    if !errors.is_empty() {
        return Err(Error::Conversion(errors));
    }

    Ok(resources)
}
