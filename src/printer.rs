use std::io::Write;

use clap::ValueEnum;
use kube::ResourceExt;
use serde::{Deserialize, Serialize};

use crate::{
    error::Error,
    resources::{AlbResources, ExtractNamespace, NamespaceFilter},
};

#[derive(Debug, Default, ValueEnum, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Yaml,
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.to_possible_value()
            .expect("no values are skipped")
            .get_name()
            .fmt(f)
    }
}

/// Writes one object at a time in the chosen format.
///
/// YAML documents are separated by `---`, JSON objects are pretty printed one
/// after another.
#[derive(Debug)]
pub struct ResourcePrinter {
    format: OutputFormat,
    printed: usize,
}

impl ResourcePrinter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format, printed: 0 }
    }

    pub fn print_obj<T, W>(&mut self, obj: &T, writer: &mut W) -> Result<(), Error>
    where
        T: Serialize,
        W: Write,
    {
        match self.format {
            OutputFormat::Yaml => {
                let yaml = serde_yaml::to_string(obj)?;

                if self.printed > 0 {
                    writeln!(writer, "---")?;
                }
                write!(writer, "{}", yaml)?;
            }
            OutputFormat::Json => {
                let json = serde_json::to_string_pretty(obj)?;

                writeln!(writer, "{}", json)?;
            }
        }

        self.printed += 1;

        Ok(())
    }
}

/// Prints AlbConfigs, then IngressClasses, then Ingresses of every bundle.
///
/// An object that fails to print is reported inline and skipped.
pub fn print_resources<W: Write>(
    printer: &mut ResourcePrinter,
    resources: &[AlbResources],
    namespaces: &NamespaceFilter,
    writer: &mut W,
) -> Result<(), Error> {
    let mut count = 0;

    for albconfig in resources.iter().flat_map(|r| &r.albconfigs) {
        count += 1;
        if let Err(err) = printer.print_obj(albconfig, writer) {
            writeln!(
                writer,
                "# Error printing {} AlbConfig: {}",
                albconfig.name_any(),
                err
            )?;
        }
    }

    for ingress_class in resources.iter().flat_map(|r| &r.ingress_classes) {
        count += 1;
        if let Err(err) = printer.print_obj(ingress_class, writer) {
            writeln!(
                writer,
                "# Error printing {} IngressClass: {}",
                ingress_class.name_any(),
                err
            )?;
        }
    }

    for ingress in resources.iter().flat_map(|r| r.ingresses.values()) {
        count += 1;
        if let Err(err) = printer.print_obj(ingress, writer) {
            writeln!(
                writer,
                "# Error printing {}/{} Ingress: {}",
                ingress.extract_namespace(),
                ingress.name_any(),
                err
            )?;
        }
    }

    if count == 0 {
        match namespaces.namespace() {
            Some(ns) => writeln!(writer, "No resources found in {} namespace", ns)?,
            None => writeln!(writer, "No resources found")?,
        }
    }

    Ok(())
}
