use k8s_openapi::api::networking::v1::Ingress;

use crate::{
    convert::to_alb_ingress,
    feature::{parse_features, FeatureParser},
    field::ErrorList,
    logger,
    resources::AlbResources,
};

use super::{RedirectFeature, RewriteFeature, Storage};

pub struct Converter {
    feature_parsers: Vec<Box<dyn FeatureParser>>,
}

impl Default for Converter {
    fn default() -> Self {
        Self {
            feature_parsers: vec![Box::new(RewriteFeature), Box::new(RedirectFeature)],
        }
    }
}

impl Converter {
    /// Baseline conversion followed by the ingress-nginx annotation features.
    ///
    /// Baseline errors discard the result before any feature runs.
    pub fn convert(&self, storage: &Storage) -> (AlbResources, ErrorList) {
        let ingresses: Vec<Ingress> = storage.ingresses.values().cloned().collect();

        let mut resources = match to_alb_ingress(&ingresses) {
            Ok(resources) => resources,
            Err(errors) => {
                logger!(info, "ingress-nginx: conversion failed: {}", errors);
                return (AlbResources::default(), errors);
            }
        };

        let errors = parse_features(&self.feature_parsers, &ingresses, &mut resources);

        (resources, errors)
    }
}
