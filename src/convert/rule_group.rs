use std::collections::BTreeMap;

use k8s_openapi::{
    api::networking::v1::{HTTPIngressPath, HTTPIngressRuleValue, Ingress, IngressRule, IngressSpec},
    apimachinery::pkg::apis::meta::v1::ObjectMeta,
};

use crate::{
    field::{ErrorList, FieldError, FieldPath},
    logger,
    resources::NamespacedName,
};

use super::{
    has_tls_coverage, inject_listen_ports, Listeners, RuleGroup, TargetGroupKey,
    LAST_APPLIED_CONFIG_ANNOTATION, LEGACY_INGRESS_CLASS_ANNOTATION,
};

const PATH_TYPE_PREFIX: &str = "Prefix";
const PATH_TYPE_EXACT: &str = "Exact";
const PATH_TYPE_IMPLEMENTATION_SPECIFIC: &str = "ImplementationSpecific";

/// Result of normalizing every rule group.
///
/// `listeners` holds the union over each target group; routes that failed to
/// convert still contribute to it.
#[derive(Debug, Default)]
pub struct RuleGroupConversion {
    pub ingresses: Vec<Ingress>,
    pub listeners: BTreeMap<TargetGroupKey, Listeners>,
    pub errors: ErrorList,
}

pub fn convert_rule_groups(
    groups: &BTreeMap<TargetGroupKey, Vec<RuleGroup<'_>>>,
) -> RuleGroupConversion {
    let mut conversion = RuleGroupConversion::default();

    for (key, rule_groups) in groups {
        for rule_group in rule_groups {
            let listeners = Listeners::new(has_tls_coverage(rule_group.ingress));

            conversion
                .listeners
                .entry(key.clone())
                .or_default()
                .merge(&listeners);

            match rule_group.convert(&listeners) {
                Ok((ingress, errors)) => {
                    conversion.errors.extend(errors);
                    conversion.ingresses.push(ingress);
                }
                Err(errors) => {
                    logger!(
                        debug,
                        "dropped ingress {}/{}: {}",
                        rule_group.namespace,
                        rule_group.name,
                        errors
                    );
                    conversion.errors.extend(errors);
                }
            }
        }
    }

    conversion
}

impl RuleGroup<'_> {
    fn source(&self) -> NamespacedName {
        NamespacedName::new(&self.namespace, &self.name)
    }

    /// Converts the source ingress into its ALB counterpart.
    ///
    /// `Ok` may still carry errors for paths that were skipped. `Err` means
    /// the route could not be converted at all.
    pub fn convert(&self, listeners: &Listeners) -> Result<(Ingress, ErrorList), ErrorList> {
        let source = self.source();
        let mut errors = ErrorList::new();

        let spec = self.ingress.spec.as_ref();

        let source_rules = spec.and_then(|spec| spec.rules.as_ref()).into_iter().flatten();

        let mut rules = Vec::new();
        for (i, rule) in source_rules.enumerate() {
            let Some(http) = rule.http.as_ref() else {
                errors.push(FieldError::invalid(
                    FieldPath::new(["spec", "rules"]).index(i),
                    &rule.host,
                    format!("empty http rule in {source}"),
                ));
                return Err(errors);
            };

            let mut paths = Vec::with_capacity(http.paths.len());
            for path in &http.paths {
                match convert_path(path) {
                    Ok(path) => paths.push(path),
                    Err(err) => errors.push(err),
                }
            }

            rules.push(IngressRule {
                host: rule.host.clone(),
                http: Some(HTTPIngressRuleValue { paths }),
            });
        }

        let mut ingress = alb_ingress(
            &source,
            copy_annotations(self.ingress),
            &self.key,
            IngressSpec {
                rules: Some(rules),
                tls: spec.and_then(|spec| spec.tls.clone()),
                ..Default::default()
            },
        );

        if let Err(err) = inject_listen_ports(&mut ingress, listeners, &source) {
            errors.push(err);
            return Err(errors);
        }

        Ok((ingress, errors))
    }
}

fn convert_path(path: &HTTPIngressPath) -> Result<HTTPIngressPath, FieldError> {
    match path.path_type.as_str() {
        PATH_TYPE_PREFIX | PATH_TYPE_EXACT => Ok(path.clone()),
        PATH_TYPE_IMPLEMENTATION_SPECIFIC => {
            let source = path.path.as_deref().unwrap_or_default();
            let normalized = source.strip_suffix('/').unwrap_or(source);

            Ok(HTTPIngressPath {
                path: Some(format!("{normalized}/*")),
                ..path.clone()
            })
        }
        other => Err(FieldError::not_supported(
            FieldPath::new(["spec", "rule", "http", "path", "pathType"]),
            other,
            format!("unsupported path match type: {other}"),
        )),
    }
}

/// Source annotations minus the ones that must not follow the route.
fn copy_annotations(ingress: &Ingress) -> BTreeMap<String, String> {
    let mut annotations = ingress.metadata.annotations.clone().unwrap_or_default();

    annotations.remove(LAST_APPLIED_CONFIG_ANNOTATION);
    annotations.remove(LEGACY_INGRESS_CLASS_ANNOTATION);

    annotations
}

pub(super) fn alb_ingress(
    source: &NamespacedName,
    annotations: BTreeMap<String, String>,
    key: &TargetGroupKey,
    spec: IngressSpec,
) -> Ingress {
    let class = key.name();

    Ingress {
        metadata: ObjectMeta {
            name: Some(source.name.clone()),
            namespace: Some(source.namespace.clone()),
            annotations: Some(annotations),
            ..Default::default()
        },
        spec: Some(IngressSpec {
            ingress_class_name: (!class.is_empty()).then(|| class.to_string()),
            ..spec
        }),
        status: None,
    }
}

#[cfg(test)]
mod tests {
    use indoc::{formatdoc, indoc};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use crate::convert::{aggregate, LISTEN_PORTS_ANNOTATION};
    use crate::field::ErrorType;

    use super::*;

    fn ingresses(yaml: &str) -> Vec<Ingress> {
        serde_yaml::from_str(yaml).unwrap()
    }

    fn listen_ports(ingress: &Ingress) -> Option<&str> {
        ingress
            .metadata
            .annotations
            .as_ref()
            .and_then(|a| a.get(LISTEN_PORTS_ANNOTATION))
            .map(String::as_str)
    }

    mod convert_path {
        use super::*;
        use pretty_assertions::assert_eq;

        fn path(path: &str, path_type: &str) -> HTTPIngressPath {
            serde_yaml::from_str(&formatdoc! {"
                path: {path}
                pathType: {path_type}
                backend:
                  service:
                    name: svc
                    port:
                      number: 80
            "})
            .unwrap()
        }

        #[rstest]
        #[case::prefix("/foo", "Prefix", "/foo")]
        #[case::exact("/foo/", "Exact", "/foo/")]
        #[case::implementation_specific_trailing_slash("/foo/", "ImplementationSpecific", "/foo/*")]
        #[case::implementation_specific_no_slash("/foo", "ImplementationSpecific", "/foo/*")]
        #[case::implementation_specific_root("/", "ImplementationSpecific", "/*")]
        fn keeps_path_type_and_backend(
            #[case] source: &str,
            #[case] path_type: &str,
            #[case] expected: &str,
        ) {
            let actual = convert_path(&path(source, path_type)).unwrap();

            assert_eq!(actual.path.as_deref(), Some(expected));
            assert_eq!(actual.path_type, path_type);
            assert_eq!(actual.backend, path(source, path_type).backend);
        }

        #[test]
        fn only_one_trailing_slash_is_stripped() {
            let actual = convert_path(&path("/foo//", "ImplementationSpecific")).unwrap();

            assert_eq!(actual.path.as_deref(), Some("/foo//*"));
        }

        #[test]
        fn unknown_path_type_is_not_supported() {
            let err = convert_path(&path("/foo", "Regex")).unwrap_err();

            assert_eq!(err.error_type, ErrorType::NotSupported);
            assert_eq!(err.field.to_string(), "spec.rule.http.path.pathType");
            assert_eq!(err.bad_value, serde_json::json!("Regex"));
        }
    }

    mod convert_rule_groups {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn converts_route_and_registers_listeners() {
            let ingresses = ingresses(indoc! {"
                - metadata:
                    name: demo
                    namespace: default
                    annotations:
                      kubectl.kubernetes.io/last-applied-configuration: '{}'
                      nginx.ingress.kubernetes.io/ssl-redirect: 'true'
                  spec:
                    rules:
                    - host: a.example.com
                      http:
                        paths:
                        - path: /
                          pathType: Prefix
                          backend:
                            service:
                              name: svc
                              port:
                                number: 80
                    tls:
                    - hosts:
                      - a.example.com
                      secretName: tls
            "});
            let aggregation = aggregate(&ingresses);

            let conversion = convert_rule_groups(&aggregation.groups);

            assert!(conversion.errors.is_empty());
            assert_eq!(
                conversion.listeners[&TargetGroupKey::new("demo")],
                Listeners::new(true)
            );

            let expected: Ingress = serde_yaml::from_str(indoc! {r#"
                apiVersion: networking.k8s.io/v1
                kind: Ingress
                metadata:
                  name: demo
                  namespace: default
                  annotations:
                    alb.ingress.kubernetes.io/listen-ports: '[{"HTTP":80},{"HTTPS":443}]'
                    nginx.ingress.kubernetes.io/ssl-redirect: 'true'
                spec:
                  ingressClassName: demo
                  rules:
                  - host: a.example.com
                    http:
                      paths:
                      - path: /
                        pathType: Prefix
                        backend:
                          service:
                            name: svc
                            port:
                              number: 80
                  tls:
                  - hosts:
                    - a.example.com
                    secretName: tls
            "#})
            .unwrap();

            assert_eq!(conversion.ingresses, vec![expected]);
        }

        #[test]
        fn shared_group_unions_listeners_but_not_annotations() {
            let ingresses = ingresses(indoc! {"
                - metadata:
                    name: plain
                  spec:
                    ingressClassName: shared
                    rules:
                    - host: a.example.com
                      http:
                        paths:
                        - path: /
                          pathType: Prefix
                          backend:
                            service:
                              name: svc
                              port:
                                number: 80
                - metadata:
                    name: secure
                  spec:
                    ingressClassName: shared
                    rules:
                    - host: b.example.com
                      http:
                        paths:
                        - path: /
                          pathType: Prefix
                          backend:
                            service:
                              name: svc
                              port:
                                number: 80
                    tls:
                    - hosts:
                      - b.example.com
            "});
            let aggregation = aggregate(&ingresses);

            let conversion = convert_rule_groups(&aggregation.groups);

            assert_eq!(conversion.ingresses.len(), 2);
            assert_eq!(
                conversion.listeners[&TargetGroupKey::new("shared")],
                Listeners::new(true)
            );
            assert_eq!(
                conversion
                    .ingresses
                    .iter()
                    .map(listen_ports)
                    .collect::<Vec<_>>(),
                vec![
                    Some(r#"[{"HTTP":80}]"#),
                    Some(r#"[{"HTTP":80},{"HTTPS":443}]"#)
                ]
            );
        }

        #[test]
        fn missing_http_drops_only_that_route() {
            let ingresses = ingresses(indoc! {"
                - metadata:
                    name: broken
                  spec:
                    ingressClassName: shared
                    rules:
                    - host: ok.example.com
                      http:
                        paths:
                        - path: /
                          pathType: Prefix
                          backend:
                            service:
                              name: svc
                              port:
                                number: 80
                    - host: a.example.com
                    tls:
                    - hosts:
                      - a.example.com
                - metadata:
                    name: fine
                  spec:
                    ingressClassName: shared
                    rules:
                    - host: b.example.com
                      http:
                        paths:
                        - path: /
                          pathType: Prefix
                          backend:
                            service:
                              name: svc
                              port:
                                number: 80
            "});
            let aggregation = aggregate(&ingresses);

            let conversion = convert_rule_groups(&aggregation.groups);

            assert_eq!(conversion.errors.len(), 1);
            let err = conversion.errors.iter().next().unwrap();
            assert_eq!(err.field.to_string(), "spec.rules[1]");
            assert_eq!(err.bad_value, serde_json::json!("a.example.com"));

            assert_eq!(conversion.ingresses.len(), 1);
            assert_eq!(conversion.ingresses[0].metadata.name.as_deref(), Some("fine"));

            // the dropped route still counts towards the group's listeners
            assert_eq!(
                conversion.listeners[&TargetGroupKey::new("shared")],
                Listeners::new(true)
            );
        }

        #[test]
        fn unsupported_path_type_skips_only_that_path() {
            let ingresses = ingresses(indoc! {"
                - metadata:
                    name: demo
                  spec:
                    rules:
                    - host: a.example.com
                      http:
                        paths:
                        - path: /a
                          pathType: Regex
                          backend:
                            service:
                              name: svc
                              port:
                                number: 80
                        - path: /b
                          pathType: ImplementationSpecific
                          backend:
                            service:
                              name: svc
                              port:
                                number: 80
            "});
            let aggregation = aggregate(&ingresses);

            let conversion = convert_rule_groups(&aggregation.groups);

            assert_eq!(conversion.errors.len(), 1);
            assert_eq!(conversion.ingresses.len(), 1);

            let paths = &conversion.ingresses[0].spec.as_ref().unwrap().rules.as_ref().unwrap()[0]
                .http
                .as_ref()
                .unwrap()
                .paths;
            assert_eq!(
                paths.iter().map(|p| p.path.as_deref()).collect::<Vec<_>>(),
                vec![Some("/b/*")]
            );
        }

        #[test]
        fn legacy_class_annotation_moves_into_class_name() {
            let ingresses = ingresses(indoc! {"
                - metadata:
                    name: demo
                    annotations:
                      kubernetes.io/ingress.class: nginx
                  spec:
                    rules: []
            "});
            let aggregation = aggregate(&ingresses);

            let conversion = convert_rule_groups(&aggregation.groups);

            let ingress = &conversion.ingresses[0];
            assert_eq!(
                ingress.spec.as_ref().unwrap().ingress_class_name.as_deref(),
                Some("nginx")
            );
            assert_eq!(
                ingress.metadata.annotations.as_ref().unwrap().keys().collect::<Vec<_>>(),
                vec![LISTEN_PORTS_ANNOTATION]
            );
        }
    }
}
