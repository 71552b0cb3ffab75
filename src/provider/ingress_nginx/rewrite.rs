use k8s_openapi::api::networking::v1::Ingress;
use kube::ResourceExt;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::{
    feature::{AnnotationPatch, FeatureParser},
    field::ErrorList,
};

pub const REWRITE_TARGET_NGINX: &str = "nginx.ingress.kubernetes.io/rewrite-target";
pub const REWRITE_TARGET_ALB: &str = "alb.ingress.kubernetes.io/rewrite-target";

static CAPTURE_GROUP_REF: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$(\d+)").expect("invalid regex"));

/// `$1` becomes `${1}`. Already braced references are left alone.
pub fn translate_rewrite_target(target: &str) -> String {
    CAPTURE_GROUP_REF
        .replace_all(target, "$${${1}}")
        .into_owned()
}

/// Moves `rewrite-target` to the ALB key, translating capture group references.
pub struct RewriteFeature;

impl FeatureParser for RewriteFeature {
    fn name(&self) -> &'static str {
        "rewrite-target"
    }

    fn owned_annotations(&self) -> &'static [&'static str] {
        &[REWRITE_TARGET_NGINX, REWRITE_TARGET_ALB]
    }

    fn parse(&self, _: &[Ingress], route: &Ingress) -> Result<AnnotationPatch, ErrorList> {
        let patch = match route.annotations().get(REWRITE_TARGET_NGINX) {
            Some(target) => AnnotationPatch::default()
                .remove(REWRITE_TARGET_NGINX)
                .set(REWRITE_TARGET_ALB, translate_rewrite_target(target)),
            None => AnnotationPatch::default(),
        };

        Ok(patch)
    }
}
