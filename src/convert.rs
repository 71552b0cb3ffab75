//! Provider-independent conversion of ingresses into ALB resources.

mod aggregator;
mod default_backend;
mod listener;
mod rule_group;

use std::collections::{btree_map::Entry, BTreeMap};

use k8s_openapi::{
    api::networking::v1::{
        Ingress, IngressClass, IngressClassParametersReference, IngressClassSpec,
    },
    apimachinery::pkg::apis::meta::v1::ObjectMeta,
};
use kube::ResourceExt;

use crate::{
    albconfig::AlbConfig,
    field::{ErrorList, FieldError, FieldPath},
    logger,
    resources::{AlbResources, NamespacedName},
};

pub use aggregator::{
    aggregate, declared_ingress_class, ingress_class, Aggregation, DefaultBackendEntry, RuleGroup,
    TargetGroupKey,
};
pub use default_backend::{synthesize_default_routes, DefaultRouteSynthesis};
pub use listener::{build_albconfig, has_tls_coverage, inject_listen_ports, Listeners, Protocol};
pub use rule_group::{convert_rule_groups, RuleGroupConversion};

pub const LEGACY_INGRESS_CLASS_ANNOTATION: &str = "kubernetes.io/ingress.class";
pub const LAST_APPLIED_CONFIG_ANNOTATION: &str = "kubectl.kubernetes.io/last-applied-configuration";
pub const LISTEN_PORTS_ANNOTATION: &str = "alb.ingress.kubernetes.io/listen-ports";

pub const LOAD_BALANCER_EDITION: &str = "Standard";
pub const PROVENANCE_TAG_KEY: &str = "converted/ingress2albconfig";
pub const PROVENANCE_TAG_VALUE: &str = "true";

pub const ALB_INGRESS_CONTROLLER: &str = "ingress.k8s.alibabacloud/alb";

pub const DEFAULT_ROUTE_SUFFIX: &str = "__default";

/// Converts ingresses into AlbConfigs, IngressClasses and ALB ingresses,
/// ignoring any provider specific annotation.
///
/// Any error from normalizing the rule groups discards the whole batch, and
/// default routes are then never synthesized. The same holds for errors from
/// default route synthesis and for name collisions between output routes.
pub fn to_alb_ingress(ingresses: &[Ingress]) -> Result<AlbResources, ErrorList> {
    let aggregation = aggregate(ingresses);

    let RuleGroupConversion {
        ingresses: converted,
        listeners,
        errors,
    } = convert_rule_groups(&aggregation.groups);

    if !errors.is_empty() {
        return Err(errors);
    }

    let DefaultRouteSynthesis {
        ingresses: defaults,
        errors,
    } = synthesize_default_routes(&aggregation.default_backends);

    if !errors.is_empty() {
        return Err(errors);
    }

    let mut errors = ErrorList::new();
    let mut ingresses = BTreeMap::new();
    for ingress in converted.into_iter().chain(defaults) {
        match ingresses.entry(NamespacedName::from_resource(&ingress)) {
            Entry::Vacant(entry) => {
                entry.insert(ingress);
            }
            Entry::Occupied(entry) => {
                errors.push(FieldError::duplicate(
                    FieldPath::new(["metadata", "name"]),
                    ingress.name_any(),
                ));
                logger!(debug, "duplicate output ingress {}", entry.key());
            }
        }
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    let albconfigs: Vec<AlbConfig> = listeners
        .iter()
        .filter(|(_, listeners)| !listeners.is_empty())
        .map(|(key, listeners)| {
            logger!(
                debug,
                "albconfig {} listeners {}",
                key,
                listeners
                    .iter()
                    .map(|p| p.to_string())
                    .collect::<Vec<_>>()
                    .join(",")
            );
            build_albconfig(key, listeners)
        })
        .collect();

    let ingress_classes = albconfigs.iter().map(ingress_class_for).collect();

    Ok(AlbResources {
        albconfigs,
        ingress_classes,
        ingresses,
    })
}

/// IngressClass handing the routes of one AlbConfig to the ALB controller.
pub fn ingress_class_for(albconfig: &AlbConfig) -> IngressClass {
    let name = albconfig.name_any();

    IngressClass {
        metadata: ObjectMeta {
            name: Some(name.clone()),
            ..Default::default()
        },
        spec: Some(IngressClassSpec {
            controller: Some(ALB_INGRESS_CONTROLLER.to_string()),
            parameters: Some(IngressClassParametersReference {
                api_group: Some(<AlbConfig as k8s_openapi::Resource>::GROUP.to_string()),
                kind: <AlbConfig as k8s_openapi::Resource>::KIND.to_string(),
                name,
                namespace: None,
                scope: None,
            }),
        }),
    }
}
