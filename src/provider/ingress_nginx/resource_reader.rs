use std::path::Path;

use crate::{
    error::Error,
    logger,
    reader::{read_ingresses_from_cluster, read_ingresses_from_file, IngressLister},
    resources::NamespaceFilter,
};

use super::Storage;

/// Reads the ingresses served by ingress-nginx.
#[derive(Debug, Clone)]
pub struct ResourceReader {
    namespaces: NamespaceFilter,
    ingress_classes: Vec<String>,
}

impl ResourceReader {
    pub fn new(namespaces: NamespaceFilter, ingress_classes: Vec<String>) -> Self {
        Self {
            namespaces,
            ingress_classes,
        }
    }

    pub async fn read_from_cluster(&self, lister: &dyn IngressLister) -> Result<Storage, Error> {
        let ingresses =
            read_ingresses_from_cluster(lister, &self.namespaces, &self.ingress_classes).await?;

        logger!(info, "ingress-nginx: {} ingresses from cluster", ingresses.len());

        Ok(ingresses.into_iter().collect())
    }

    pub fn read_from_file(&self, path: &Path) -> Result<Storage, Error> {
        let ingresses = read_ingresses_from_file(path, &self.namespaces, &self.ingress_classes)?;

        logger!(
            info,
            "ingress-nginx: {} ingresses from {}",
            ingresses.len(),
            path.display()
        );

        Ok(ingresses.into_iter().collect())
    }
}
