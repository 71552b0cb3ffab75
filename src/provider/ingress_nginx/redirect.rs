use k8s_openapi::api::networking::v1::Ingress;
use kube::ResourceExt;

use crate::{
    feature::{AnnotationPatch, FeatureParser},
    field::ErrorList,
};

pub const SSL_REDIRECT_NGINX: &str = "nginx.ingress.kubernetes.io/ssl-redirect";
pub const SSL_REDIRECT_ALB: &str = "alb.ingress.kubernetes.io/ssl-redirect";

/// Moves `ssl-redirect` to the ALB key with its value unchanged.
pub struct RedirectFeature;

impl FeatureParser for RedirectFeature {
    fn name(&self) -> &'static str {
        "ssl-redirect"
    }

    fn owned_annotations(&self) -> &'static [&'static str] {
        &[SSL_REDIRECT_NGINX, SSL_REDIRECT_ALB]
    }

    fn parse(&self, _: &[Ingress], route: &Ingress) -> Result<AnnotationPatch, ErrorList> {
        let patch = match route.annotations().get(SSL_REDIRECT_NGINX) {
            Some(value) => AnnotationPatch::default()
                .remove(SSL_REDIRECT_NGINX)
                .set(SSL_REDIRECT_ALB, value.as_str()),
            None => AnnotationPatch::default(),
        };

        Ok(patch)
    }
}
