use std::path::{Path, PathBuf};

use ingress2albconfig::{
    error::Error,
    printer::{print_resources, OutputFormat, ResourcePrinter},
    provider::{to_alb_api_resources, InputSource, ProviderConf, ProviderRegistry},
    resources::{AlbResources, NamespaceFilter},
};
use indoc::indoc;
use pretty_assertions::assert_eq;
use serde::Deserialize;
use serde_yaml::Value;

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

async fn convert(name: &str, namespaces: NamespaceFilter) -> Result<Vec<AlbResources>, Error> {
    let path = fixture(name);

    let conf = ProviderConf {
        namespaces,
        ..Default::default()
    };

    to_alb_api_resources(
        &ProviderRegistry::builtin(),
        &conf,
        InputSource::File(&path),
        &[],
    )
    .await
}

fn print(resources: &[AlbResources], format: OutputFormat, namespaces: &NamespaceFilter) -> String {
    let mut buf = Vec::new();
    let mut printer = ResourcePrinter::new(format);

    print_resources(&mut printer, resources, namespaces, &mut buf).unwrap();

    String::from_utf8(buf).unwrap()
}

fn documents(yaml: &str) -> Vec<Value> {
    serde_yaml::Deserializer::from_str(yaml)
        .map(|doc| Value::deserialize(doc).unwrap())
        .collect()
}

fn kind_and_name(doc: &Value) -> (String, String) {
    let namespace = doc["metadata"]["namespace"].as_str();
    let name = doc["metadata"]["name"].as_str().unwrap();

    (
        doc["kind"].as_str().unwrap().to_string(),
        match namespace {
            Some(ns) => format!("{ns}/{name}"),
            None => name.to_string(),
        },
    )
}

#[tokio::test]
async fn nginx_manifest_is_printed_as_alb_resources() {
    let resources = convert("ingress-nginx.yaml", NamespaceFilter::All)
        .await
        .unwrap();

    let output = print(&resources, OutputFormat::Yaml, &NamespaceFilter::All);
    let docs = documents(&output);

    assert_eq!(
        docs.iter().map(kind_and_name).collect::<Vec<_>>(),
        vec![
            ("AlbConfig".to_string(), "nginx".to_string()),
            ("IngressClass".to_string(), "nginx".to_string()),
            ("Ingress".to_string(), "shop/blog".to_string()),
            ("Ingress".to_string(), "shop/storefront".to_string()),
            ("Ingress".to_string(), "shop/storefront__default".to_string()),
        ]
    );

    let albconfig = &docs[0];
    assert_eq!(
        albconfig["spec"]["listeners"],
        serde_yaml::from_str::<Value>("[{port: 80, protocol: HTTP}, {port: 443, protocol: HTTPS}]")
            .unwrap()
    );

    let blog = &docs[2];
    assert_eq!(
        blog["metadata"]["annotations"],
        serde_yaml::from_str::<Value>(r#"{alb.ingress.kubernetes.io/listen-ports: '[{"HTTP":80}]'}"#)
            .unwrap()
    );
    assert_eq!(blog["spec"]["ingressClassName"].as_str(), Some("nginx"));

    let storefront = &docs[3];
    assert_eq!(
        storefront["metadata"]["annotations"],
        serde_yaml::from_str::<Value>(indoc! {r#"
            alb.ingress.kubernetes.io/listen-ports: '[{"HTTP":80},{"HTTPS":443}]'
            alb.ingress.kubernetes.io/rewrite-target: /${2}
            alb.ingress.kubernetes.io/ssl-redirect: "true"
        "#})
        .unwrap()
    );
    assert_eq!(
        storefront["spec"]["rules"][0]["http"]["paths"][0]["path"].as_str(),
        Some("/api(/|$)(.*)/*")
    );
    assert_eq!(
        storefront["spec"]["tls"][0]["secretName"].as_str(),
        Some("shop-tls")
    );

    let default_route = &docs[4];
    assert_eq!(
        default_route["spec"]["rules"][0]["http"]["paths"][0]["backend"]["service"]["name"]
            .as_str(),
        Some("storefront-fallback")
    );
}

#[tokio::test]
async fn json_output_has_one_object_per_resource() {
    let resources = convert("ingress-nginx.yaml", NamespaceFilter::All)
        .await
        .unwrap();

    let output = print(&resources, OutputFormat::Json, &NamespaceFilter::All);

    let count = serde_json::Deserializer::from_str(&output)
        .into_iter::<serde_json::Value>()
        .map(|value| value.unwrap())
        .count();

    assert_eq!(count, 5);
}

#[tokio::test]
async fn other_namespace_prints_nothing() {
    let namespaces = NamespaceFilter::Namespace("ops".into());

    let resources = convert("ingress-nginx.yaml", namespaces.clone())
        .await
        .unwrap();

    assert_eq!(
        print(&resources, OutputFormat::Yaml, &namespaces),
        "No resources found in ops namespace\n"
    );
}

#[tokio::test]
async fn field_errors_fail_the_whole_run() {
    let err = convert("broken.yaml", NamespaceFilter::All)
        .await
        .unwrap_err();

    let errors = match err {
        Error::Conversion(errors) => errors,
        err => panic!("unexpected error: {err}"),
    };

    assert_eq!(
        errors.iter().map(ToString::to_string).collect::<Vec<_>>(),
        vec![r#"spec.rules[0]: Invalid value: "a.example.com": empty http rule in shop/broken"#]
    );
}
