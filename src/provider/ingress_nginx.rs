mod converter;
mod redirect;
mod resource_reader;
mod rewrite;

use std::{collections::BTreeMap, path::Path};

use async_trait::async_trait;
use k8s_openapi::api::networking::v1::Ingress;

use crate::{
    error::Error,
    field::ErrorList,
    reader::IngressLister,
    resources::{AlbResources, NamespacedName},
};

use super::{Provider, ProviderConf};

pub use converter::Converter;
pub use redirect::{RedirectFeature, SSL_REDIRECT_ALB, SSL_REDIRECT_NGINX};
pub use resource_reader::ResourceReader;
pub use rewrite::{translate_rewrite_target, RewriteFeature, REWRITE_TARGET_ALB, REWRITE_TARGET_NGINX};

pub const NAME: &str = "ingress-nginx";

/// Source ingresses of one provider, keyed and ordered by namespaced name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Storage {
    pub ingresses: BTreeMap<NamespacedName, Ingress>,
}

impl FromIterator<Ingress> for Storage {
    fn from_iter<T: IntoIterator<Item = Ingress>>(iter: T) -> Self {
        Self {
            ingresses: iter
                .into_iter()
                .map(|ingress| (NamespacedName::from_resource(&ingress), ingress))
                .collect(),
        }
    }
}

pub struct IngressNginxProvider {
    reader: ResourceReader,
    converter: Converter,
    storage: Storage,
}

impl IngressNginxProvider {
    pub fn new(conf: &ProviderConf) -> Self {
        Self {
            reader: ResourceReader::new(
                conf.namespaces.clone(),
                conf.ingress_nginx.ingress_classes.clone(),
            ),
            converter: Converter::default(),
            storage: Storage::default(),
        }
    }

    pub fn construct(conf: &ProviderConf) -> Box<dyn Provider> {
        Box::new(Self::new(conf))
    }
}

#[async_trait]
impl Provider for IngressNginxProvider {
    async fn read_resources_from_cluster(
        &mut self,
        lister: &dyn IngressLister,
    ) -> Result<(), Error> {
        self.storage = self.reader.read_from_cluster(lister).await?;
        Ok(())
    }

    fn read_resources_from_file(&mut self, path: &Path) -> Result<(), Error> {
        self.storage = self.reader.read_from_file(path)?;
        Ok(())
    }

    fn to_alb_resources(&self) -> (AlbResources, ErrorList) {
        self.converter.convert(&self.storage)
    }
}
