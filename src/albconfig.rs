//! `alibabacloud.com/v1` AlbConfig custom resource.

use k8s_openapi::apimachinery::pkg::{apis::meta::v1::ObjectMeta, util::intstr::IntOrString};
use serde::{ser::SerializeStruct, Deserialize, Serialize, Serializer};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct AlbConfig {
    pub metadata: ObjectMeta,

    pub spec: AlbConfigSpec,
}

impl k8s_openapi::Resource for AlbConfig {
    const API_VERSION: &'static str = "alibabacloud.com/v1";
    const GROUP: &'static str = "alibabacloud.com";
    const KIND: &'static str = "AlbConfig";
    const VERSION: &'static str = "v1";
    const URL_PATH_SEGMENT: &'static str = "albconfigs";
    type Scope = k8s_openapi::ClusterResourceScope;
}

impl k8s_openapi::Metadata for AlbConfig {
    type Ty = ObjectMeta;

    fn metadata(&self) -> &<Self as k8s_openapi::Metadata>::Ty {
        &self.metadata
    }

    fn metadata_mut(&mut self) -> &mut <Self as k8s_openapi::Metadata>::Ty {
        &mut self.metadata
    }
}

impl Serialize for AlbConfig {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct(
            <Self as k8s_openapi::Resource>::KIND,
            4,
        )?;
        state.serialize_field(
            "apiVersion",
            <Self as k8s_openapi::Resource>::API_VERSION,
        )?;
        state.serialize_field("kind", <Self as k8s_openapi::Resource>::KIND)?;
        state.serialize_field("metadata", &self.metadata)?;
        state.serialize_field("spec", &self.spec)?;
        state.end()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AlbConfigSpec {
    #[serde(rename = "config", skip_serializing_if = "Option::is_none")]
    pub load_balancer: Option<LoadBalancerSpec>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub listeners: Vec<ListenerSpec>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListenerSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gzip_enabled: Option<bool>,

    pub port: IntOrString,

    pub protocol: String,

    #[serde(default, skip_serializing_if = "is_zero")]
    pub idle_timeout: i32,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub ca_enabled: bool,

    #[serde(default, skip_serializing_if = "is_zero")]
    pub request_timeout: i32,
}

impl ListenerSpec {
    pub fn new(port: i32, protocol: impl Into<String>) -> Self {
        Self {
            gzip_enabled: None,
            port: IntOrString::Int(port),
            protocol: protocol.into(),
            idle_timeout: 0,
            description: String::new(),
            ca_enabled: false,
            request_timeout: 0,
        }
    }
}

fn is_zero(v: &i32) -> bool {
    *v == 0
}

/// The `config` block of an AlbConfig; mirrors the load balancer attributes
/// the ALB controller accepts.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadBalancerSpec {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub address_allocated_mode: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub address_type: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub ipv6_address_type: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub address_ip_version: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub resource_group_id: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub edition: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub zone_mappings: Vec<ZoneMapping>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_log_config: Option<AccessLogConfig>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub deletion_protection_enabled: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub force_override: Option<bool>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<Tag>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub listener_force_override: Option<bool>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub key: String,
    pub value: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneMapping {
    pub v_switch_id: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessLogConfig {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub log_store: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub log_project: String,
}
