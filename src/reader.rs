//! Reading source ingresses from a cluster or a manifest file.

use std::path::Path;

use async_trait::async_trait;
use k8s_openapi::api::networking::v1::Ingress;
use kube::{api::ListParams, Api, Client};
use serde::Deserialize;
use serde_json::Value;

use crate::{
    convert::declared_ingress_class,
    error::Error,
    logger,
    resources::{ExtractNamespace, NamespaceFilter},
};

const INGRESS_API_VERSION: &str = "networking.k8s.io/v1";

#[async_trait]
pub trait IngressLister: Send + Sync {
    async fn list_ingresses(&self, namespaces: &NamespaceFilter) -> Result<Vec<Ingress>, Error>;
}

#[async_trait]
impl IngressLister for Client {
    async fn list_ingresses(&self, namespaces: &NamespaceFilter) -> Result<Vec<Ingress>, Error> {
        let api: Api<Ingress> = match namespaces {
            NamespaceFilter::All => Api::all(self.clone()),
            NamespaceFilter::Namespace(ns) => Api::namespaced(self.clone(), ns),
        };

        let list = api.list(&ListParams::default()).await?;

        logger!(debug, "listed {} ingresses ({:?})", list.items.len(), namespaces);

        Ok(list.items)
    }
}

/// Ingresses from the cluster whose class is unset or one of `ingress_classes`.
pub async fn read_ingresses_from_cluster(
    lister: &dyn IngressLister,
    namespaces: &NamespaceFilter,
    ingress_classes: &[String],
) -> Result<Vec<Ingress>, Error> {
    let ingresses = lister.list_ingresses(namespaces).await?;

    Ok(retain_ingresses(ingresses, namespaces, ingress_classes))
}

/// Ingresses from a YAML or JSON manifest, filtered like the cluster read.
///
/// `.json` files are read as a stream of JSON values, anything else as
/// multi-document YAML.
pub fn read_ingresses_from_file(
    path: &Path,
    namespaces: &NamespaceFilter,
    ingress_classes: &[String],
) -> Result<Vec<Ingress>, Error> {
    let content = std::fs::read_to_string(path)?;

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let ingresses = if is_json {
        parse_json_manifest(&content)?
    } else {
        parse_yaml_manifest(&content)?
    };

    logger!(
        debug,
        "read {} ingresses from {}",
        ingresses.len(),
        path.display()
    );

    Ok(retain_ingresses(ingresses, namespaces, ingress_classes))
}

pub fn parse_yaml_manifest(content: &str) -> Result<Vec<Ingress>, Error> {
    let mut ingresses = Vec::new();

    for document in serde_yaml::Deserializer::from_str(content) {
        let value = Value::deserialize(document)?;
        collect_ingresses(value, &mut ingresses)?;
    }

    Ok(ingresses)
}

pub fn parse_json_manifest(content: &str) -> Result<Vec<Ingress>, Error> {
    let mut ingresses = Vec::new();

    for value in serde_json::Deserializer::from_str(content).into_iter::<Value>() {
        collect_ingresses(value?, &mut ingresses)?;
    }

    Ok(ingresses)
}

fn collect_ingresses(value: Value, ingresses: &mut Vec<Ingress>) -> Result<(), Error> {
    let kind = value.get("kind").and_then(Value::as_str).unwrap_or_default();

    match kind {
        "Ingress" => {
            let api_version = value
                .get("apiVersion")
                .and_then(Value::as_str)
                .unwrap_or_default();

            if api_version == INGRESS_API_VERSION {
                ingresses.push(serde_json::from_value(value)?);
            } else {
                logger!(debug, "skip Ingress with apiVersion {:?}", api_version);
            }
        }
        kind if kind.ends_with("List") => {
            if let Some(Value::Array(items)) = value.get("items") {
                for item in items.iter().cloned() {
                    collect_ingresses(item, ingresses)?;
                }
            }
        }
        "" => {}
        kind => {
            logger!(debug, "skip {}", kind);
        }
    }

    Ok(())
}

fn retain_ingresses(
    ingresses: Vec<Ingress>,
    namespaces: &NamespaceFilter,
    ingress_classes: &[String],
) -> Vec<Ingress> {
    ingresses
        .into_iter()
        .filter(|ingress| namespaces.matches(&ingress.extract_namespace()))
        .filter(|ingress| match declared_ingress_class(ingress) {
            Some(class) => ingress_classes.iter().any(|c| c == class),
            None => true,
        })
        .collect()
}
