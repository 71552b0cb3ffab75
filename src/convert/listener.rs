use std::collections::{BTreeMap, BTreeSet};

use k8s_openapi::{
    api::networking::v1::{Ingress, IngressTLS},
    apimachinery::pkg::apis::meta::v1::ObjectMeta,
};
use strum::{Display, IntoStaticStr};

use crate::{
    albconfig::{AlbConfig, AlbConfigSpec, ListenerSpec, LoadBalancerSpec, Tag},
    field::{FieldError, FieldPath},
    resources::NamespacedName,
};

use super::{
    TargetGroupKey, LISTEN_PORTS_ANNOTATION, LOAD_BALANCER_EDITION, PROVENANCE_TAG_KEY,
    PROVENANCE_TAG_VALUE,
};

/// Declaration order is emission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, IntoStaticStr)]
pub enum Protocol {
    #[strum(serialize = "HTTP")]
    Http,
    #[strum(serialize = "HTTPS")]
    Https,
}

impl Protocol {
    pub fn as_str(self) -> &'static str {
        self.into()
    }

    pub const fn port(self) -> i32 {
        match self {
            Protocol::Http => 80,
            Protocol::Https => 443,
        }
    }
}

/// Listener set of a route or a target group. Always ordered HTTP, HTTPS.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Listeners(BTreeSet<Protocol>);

impl Listeners {
    /// Plain HTTP, plus HTTPS when `secure`.
    pub fn new(secure: bool) -> Self {
        let mut listeners = Self::default();
        listeners.insert(Protocol::Http);
        if secure {
            listeners.insert(Protocol::Https);
        }
        listeners
    }

    pub fn insert(&mut self, protocol: Protocol) {
        self.0.insert(protocol);
    }

    pub fn merge(&mut self, other: &Listeners) {
        self.0.extend(other.0.iter().copied());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Protocol> + '_ {
        self.0.iter().copied()
    }

    /// `[{"HTTP":80},{"HTTPS":443}]`
    pub fn to_listen_ports(&self) -> Result<String, serde_json::Error> {
        let ports: Vec<BTreeMap<&str, i32>> = self
            .iter()
            .map(|protocol| BTreeMap::from([(protocol.as_str(), protocol.port())]))
            .collect();

        serde_json::to_string(&ports)
    }

    pub fn to_listener_specs(&self) -> Vec<ListenerSpec> {
        self.iter()
            .map(|protocol| ListenerSpec::new(protocol.port(), protocol.as_str()))
            .collect()
    }
}

/// True when any rule host of `ingress` appears in one of its own TLS bindings.
///
/// Exact, case-sensitive host match. Stops at the first covered rule.
pub fn has_tls_coverage(ingress: &Ingress) -> bool {
    let Some(spec) = ingress.spec.as_ref() else {
        return false;
    };

    let tls = spec.tls.as_deref().unwrap_or_default();

    spec.rules
        .iter()
        .flatten()
        .any(|rule| is_tls_host(tls, rule.host.as_deref().unwrap_or_default()))
}

fn is_tls_host(tls: &[IngressTLS], host: &str) -> bool {
    tls.iter()
        .flat_map(|tls| tls.hosts.iter().flatten())
        .any(|tls_host| tls_host == host)
}

/// Writes the listen-ports annotation of a converted route.
pub fn inject_listen_ports(
    ingress: &mut Ingress,
    listeners: &Listeners,
    source: &NamespacedName,
) -> Result<(), FieldError> {
    let listen_ports = listeners.to_listen_ports().map_err(|err| {
        FieldError::invalid(
            FieldPath::new(["metadata", "annotations"]),
            listeners.iter().map(|p| p.to_string()).collect::<Vec<_>>(),
            format!("failed to encode listen ports for {source}: {err}"),
        )
    })?;

    ingress
        .metadata
        .annotations
        .get_or_insert_with(Default::default)
        .insert(LISTEN_PORTS_ANNOTATION.to_string(), listen_ports);

    Ok(())
}

pub fn build_albconfig(key: &TargetGroupKey, listeners: &Listeners) -> AlbConfig {
    AlbConfig {
        metadata: ObjectMeta {
            name: Some(key.name().to_string()),
            ..Default::default()
        },
        spec: AlbConfigSpec {
            load_balancer: Some(LoadBalancerSpec {
                name: key.name().to_string(),
                edition: LOAD_BALANCER_EDITION.to_string(),
                tags: vec![Tag {
                    key: PROVENANCE_TAG_KEY.to_string(),
                    value: PROVENANCE_TAG_VALUE.to_string(),
                }],
                ..Default::default()
            }),
            listeners: listeners.to_listener_specs(),
        },
    }
}
