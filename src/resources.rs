use std::{collections::BTreeMap, fmt};

use k8s_openapi::api::networking::v1::{Ingress, IngressClass};
use kube::ResourceExt;

use crate::albconfig::AlbConfig;

#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NamespacedName {
    pub namespace: String,
    pub name: String,
}

impl NamespacedName {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }

    pub fn from_resource<K: ResourceExt>(resource: &K) -> Self {
        Self {
            namespace: resource.extract_namespace(),
            name: resource.name_any(),
        }
    }
}

impl fmt::Display for NamespacedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}

pub trait ExtractNamespace {
    fn extract_namespace(&self) -> String;
}

impl<K> ExtractNamespace for K
where
    K: ResourceExt,
{
    fn extract_namespace(&self) -> String {
        self.namespace().unwrap_or_else(|| "default".to_string())
    }
}

/// Every object produced by one conversion run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlbResources {
    pub albconfigs: Vec<AlbConfig>,
    pub ingress_classes: Vec<IngressClass>,
    pub ingresses: BTreeMap<NamespacedName, Ingress>,
}

impl AlbResources {
    pub fn len(&self) -> usize {
        self.albconfigs.len() + self.ingress_classes.len() + self.ingresses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Namespaces a run is restricted to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum NamespaceFilter {
    #[default]
    All,
    Namespace(String),
}

impl NamespaceFilter {
    pub fn matches(&self, namespace: &str) -> bool {
        match self {
            NamespaceFilter::All => true,
            NamespaceFilter::Namespace(ns) => ns == namespace,
        }
    }

    pub fn namespace(&self) -> Option<&str> {
        match self {
            NamespaceFilter::All => None,
            NamespaceFilter::Namespace(ns) => Some(ns),
        }
    }
}
