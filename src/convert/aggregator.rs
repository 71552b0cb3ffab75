use std::{collections::BTreeMap, fmt};

use k8s_openapi::api::networking::v1::{Ingress, IngressBackend, IngressTLS};
use kube::ResourceExt;

use crate::{logger, resources::ExtractNamespace};

use super::LEGACY_INGRESS_CLASS_ANNOTATION;

const TARGET_GROUP_KEY_PREFIX: &str = "alb__";

/// Identifies the AlbConfig a route belongs to.
///
/// The key is held with an internal prefix so a class name can never collide
/// with reserved names; only [`TargetGroupKey::name`] is ever emitted.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TargetGroupKey(String);

impl TargetGroupKey {
    pub fn new(name: &str) -> Self {
        Self(format!("{TARGET_GROUP_KEY_PREFIX}{name}"))
    }

    pub fn name(&self) -> &str {
        self.0
            .strip_prefix(TARGET_GROUP_KEY_PREFIX)
            .unwrap_or(&self.0)
    }
}

impl fmt::Display for TargetGroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// `spec.ingressClassName` > `kubernetes.io/ingress.class` > `metadata.name`.
pub fn ingress_class(ingress: &Ingress) -> String {
    let explicit = ingress
        .spec
        .as_ref()
        .and_then(|spec| spec.ingress_class_name.as_deref())
        .filter(|class| !class.is_empty());

    if let Some(class) = explicit {
        return class.to_string();
    }

    let legacy = ingress
        .annotations()
        .get(LEGACY_INGRESS_CLASS_ANNOTATION)
        .filter(|class| !class.is_empty());

    if let Some(class) = legacy {
        return class.to_string();
    }

    ingress.name_any()
}

/// Ingress class set explicitly, ignoring the name fallback.
pub fn declared_ingress_class(ingress: &Ingress) -> Option<&str> {
    ingress
        .spec
        .as_ref()
        .and_then(|spec| spec.ingress_class_name.as_deref())
        .filter(|class| !class.is_empty())
        .or_else(|| {
            ingress
                .annotations()
                .get(LEGACY_INGRESS_CLASS_ANNOTATION)
                .map(String::as_str)
                .filter(|class| !class.is_empty())
        })
}

#[derive(Debug, Clone, PartialEq)]
pub struct RuleGroup<'a> {
    pub namespace: String,
    pub name: String,
    pub key: TargetGroupKey,
    pub tls: &'a [IngressTLS],
    pub ingress: &'a Ingress,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DefaultBackendEntry<'a> {
    pub namespace: String,
    pub name: String,
    pub key: TargetGroupKey,
    pub ingress: &'a Ingress,
    pub backend: &'a IngressBackend,
}

#[derive(Debug, Default, PartialEq)]
pub struct Aggregation<'a> {
    pub groups: BTreeMap<TargetGroupKey, Vec<RuleGroup<'a>>>,
    pub default_backends: Vec<DefaultBackendEntry<'a>>,
}

/// Groups ingresses by target group and collects one default backend entry
/// per ingress that declares one. Nothing is validated here.
pub fn aggregate(ingresses: &[Ingress]) -> Aggregation<'_> {
    let mut aggregation = Aggregation::default();

    for ingress in ingresses {
        aggregation.add_ingress(ingress);
    }

    logger!(
        debug,
        "aggregated {} ingresses into {} target groups ({} default backends)",
        ingresses.len(),
        aggregation.groups.len(),
        aggregation.default_backends.len()
    );

    aggregation
}

impl<'a> Aggregation<'a> {
    fn add_ingress(&mut self, ingress: &'a Ingress) {
        let key = TargetGroupKey::new(&ingress_class(ingress));
        let namespace = ingress.extract_namespace();
        let name = ingress.name_any();
        let spec = ingress.spec.as_ref();

        self.groups.entry(key.clone()).or_default().push(RuleGroup {
            namespace: namespace.clone(),
            name: name.clone(),
            key: key.clone(),
            tls: spec.and_then(|spec| spec.tls.as_deref()).unwrap_or_default(),
            ingress,
        });

        if let Some(backend) = spec.and_then(|spec| spec.default_backend.as_ref()) {
            self.default_backends.push(DefaultBackendEntry {
                namespace,
                name,
                key,
                ingress,
                backend,
            });
        }
    }
}
