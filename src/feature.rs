//! Provider specific annotation rewriting, applied after the baseline conversion.

use std::collections::BTreeMap;

use k8s_openapi::api::networking::v1::Ingress;

use crate::{
    field::{ErrorList, FieldError, FieldPath},
    logger,
    resources::{AlbResources, NamespacedName},
};

/// One independent rewriting pass over the converted ingresses.
///
/// A parser only describes changes through an [`AnnotationPatch`]; every key
/// it touches must be listed in [`FeatureParser::owned_annotations`]. Patches
/// that reach outside that set are rejected with a `Forbidden` error.
pub trait FeatureParser: Send + Sync {
    fn name(&self) -> &'static str;

    fn owned_annotations(&self) -> &'static [&'static str];

    /// `ingresses` are the unconverted sources, `route` one converted ingress.
    fn parse(&self, ingresses: &[Ingress], route: &Ingress) -> Result<AnnotationPatch, ErrorList>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnnotationPatch {
    changes: BTreeMap<String, Option<String>>,
}

impl AnnotationPatch {
    pub fn set(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.changes.insert(key.into(), Some(value.into()));
        self
    }

    pub fn remove(mut self, key: impl Into<String>) -> Self {
        self.changes.insert(key.into(), None);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.changes.keys().map(String::as_str)
    }

    fn apply(self, annotations: &mut BTreeMap<String, String>) {
        for (key, value) in self.changes {
            match value {
                Some(value) => {
                    annotations.insert(key, value);
                }
                None => {
                    annotations.remove(&key);
                }
            }
        }
    }
}

/// Runs every parser over `resources` and merges their patches.
///
/// All parsers read the same snapshot and own disjoint annotation keys, so the
/// order they are listed in has no effect on the result. A parser claiming a
/// key already owned by an earlier one is reported as `Duplicate` and skipped.
/// Errors of one parser do not stop the others.
pub fn parse_features(
    parsers: &[Box<dyn FeatureParser>],
    ingresses: &[Ingress],
    resources: &mut AlbResources,
) -> ErrorList {
    let mut errors = ErrorList::new();
    let mut patches: Vec<(NamespacedName, AnnotationPatch)> = Vec::new();
    let mut owners: BTreeMap<&str, &str> = BTreeMap::new();

    for parser in parsers {
        let claimed: Vec<&str> = parser
            .owned_annotations()
            .iter()
            .copied()
            .filter(|k| owners.contains_key(k))
            .collect();

        if !claimed.is_empty() {
            for k in claimed {
                logger!(
                    info,
                    "feature {} skipped: {} is owned by {}",
                    parser.name(),
                    k,
                    owners[k]
                );
                errors.push(FieldError::duplicate(
                    FieldPath::new(["metadata", "annotations"]).key(k),
                    parser.name(),
                ));
            }
            continue;
        }

        for &k in parser.owned_annotations() {
            owners.insert(k, parser.name());
        }

        for (key, route) in &resources.ingresses {
            let patch = match parser.parse(ingresses, route) {
                Ok(patch) if patch.is_empty() => continue,
                Ok(patch) => patch,
                Err(errs) => {
                    errors.extend(errs);
                    continue;
                }
            };

            let foreign: Vec<&str> = patch
                .keys()
                .filter(|k| !parser.owned_annotations().iter().any(|owned| owned == k))
                .collect();

            if !foreign.is_empty() {
                for k in foreign {
                    errors.push(FieldError::forbidden(
                        FieldPath::new(["metadata", "annotations"]).key(k),
                        format!("feature {} does not own this annotation ({key})", parser.name()),
                    ));
                }
                continue;
            }

            logger!(
                debug,
                "feature {} rewrites {}: {}",
                parser.name(),
                key,
                patch.keys().collect::<Vec<_>>().join(",")
            );

            patches.push((key.clone(), patch));
        }
    }

    for (key, patch) in patches {
        if let Some(route) = resources.ingresses.get_mut(&key) {
            patch.apply(route.metadata.annotations.get_or_insert_with(Default::default));
        }
    }

    errors
}
