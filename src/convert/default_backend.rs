use std::collections::BTreeMap;

use k8s_openapi::api::networking::v1::{
    HTTPIngressPath, HTTPIngressRuleValue, Ingress, IngressBackend, IngressRule, IngressSpec,
};

use crate::{
    field::{ErrorList, FieldError, FieldPath},
    logger,
    resources::NamespacedName,
};

use super::{
    has_tls_coverage, inject_listen_ports, rule_group::alb_ingress, DefaultBackendEntry,
    Listeners, DEFAULT_ROUTE_SUFFIX,
};

#[derive(Debug, Default)]
pub struct DefaultRouteSynthesis {
    pub ingresses: Vec<Ingress>,
    pub errors: ErrorList,
}

/// Turns every default backend into a standalone catch-all route.
///
/// A failing entry is dropped; the remaining entries are still synthesized.
pub fn synthesize_default_routes(entries: &[DefaultBackendEntry<'_>]) -> DefaultRouteSynthesis {
    let mut synthesis = DefaultRouteSynthesis::default();

    for entry in entries {
        match entry.synthesize() {
            Ok(ingress) => synthesis.ingresses.push(ingress),
            Err(errors) => {
                logger!(
                    debug,
                    "dropped default backend of {}/{}: {}",
                    entry.namespace,
                    entry.name,
                    errors
                );
                synthesis.errors.extend(errors);
            }
        }
    }

    synthesis
}

impl DefaultBackendEntry<'_> {
    pub fn route_name(&self) -> String {
        format!("{}{DEFAULT_ROUTE_SUFFIX}", self.name)
    }

    pub fn synthesize(&self) -> Result<Ingress, ErrorList> {
        let source = NamespacedName::new(&self.namespace, &self.name);

        let Some(service) = self.backend.service.as_ref() else {
            return Err(FieldError::invalid(
                FieldPath::new(["spec", "defaultBackend"]),
                self.backend,
                format!("non-service defaultBackend is not supported: {source}"),
            )
            .into());
        };

        let rule = IngressRule {
            host: None,
            http: Some(HTTPIngressRuleValue {
                paths: vec![HTTPIngressPath {
                    path: Some("/".to_string()),
                    path_type: "Prefix".to_string(),
                    backend: IngressBackend {
                        service: Some(service.clone()),
                        resource: None,
                    },
                }],
            }),
        };

        let mut ingress = alb_ingress(
            &NamespacedName::new(&self.namespace, self.route_name()),
            BTreeMap::new(),
            &self.key,
            IngressSpec {
                rules: Some(vec![rule]),
                ..Default::default()
            },
        );

        let listeners = Listeners::new(has_tls_coverage(self.ingress));

        inject_listen_ports(&mut ingress, &listeners, &source)?;

        Ok(ingress)
    }
}
