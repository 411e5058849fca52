// src/export.rs
//! The entry point of an export: binding a document model to data and a backend.

use crate::config::ExportConfig;
use crate::error::ExportError;
use crate::model::Model;
use crate::template::ExportContext;
use serde_json::Value;
use std::collections::HashMap;
use std::io::Write;
use tabulate_render_core::{DocumentBackend, FormatRegistry, RenderError};
use tabulate_source::DataSource;
use tabulate_style::{AttributeConstraints, PageSize};
use tabulate_types::{DocumentFormat, ModelKind};

/// Stands in for a default source that was never provided.
struct EmptySource;

impl DataSource for EmptySource {
    fn next(&mut self) -> Option<Value> {
        None
    }

    fn size_hint(&self) -> Option<usize> {
        Some(0)
    }
}

/// The record streams one export call reads from.
///
/// Tables read the default source unless they name another one.
pub struct DataSources {
    default: Option<Box<dyn DataSource>>,
    named: HashMap<String, Box<dyn DataSource>>,
    empty: EmptySource,
}

impl Default for DataSources {
    fn default() -> Self {
        Self::new()
    }
}

impl DataSources {
    pub fn new() -> Self {
        Self {
            default: None,
            named: HashMap::new(),
            empty: EmptySource,
        }
    }

    /// Shorthand for a set holding only a default source.
    pub fn single(source: impl DataSource + 'static) -> Self {
        Self::new().with_default(source)
    }

    pub fn with_default(mut self, source: impl DataSource + 'static) -> Self {
        self.default = Some(Box::new(source));
        self
    }

    pub fn with_named(mut self, name: impl Into<String>, source: impl DataSource + 'static) -> Self {
        self.named.insert(name.into(), Box::new(source));
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.named.contains_key(name)
    }

    /// The source a table reads. A table without a default source simply has no records;
    /// naming a source that was not provided is an error.
    pub fn source_mut(
        &mut self,
        name: Option<&str>,
    ) -> Result<&mut (dyn DataSource + 'static), ExportError> {
        match name {
            None => match self.default.as_mut() {
                Some(source) => Ok(source.as_mut()),
                None => Ok(&mut self.empty),
            },
            Some(name) => self
                .named
                .get_mut(name)
                .map(|source| source.as_mut())
                .ok_or_else(|| ExportError::Config(format!("No data source named '{name}'"))),
        }
    }
}

/// Exports document models into one format.
///
/// Holds no per-export state and can be reused for any number of exports.
pub struct Exporter {
    format: DocumentFormat,
    registry: FormatRegistry,
    config: ExportConfig,
    constraints: AttributeConstraints,
}

impl Exporter {
    pub fn builder() -> ExporterBuilder {
        ExporterBuilder::new()
    }

    pub fn format(&self) -> &DocumentFormat {
        &self.format
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// Exports `document` to `output`, flushing the backend exactly once on success.
    ///
    /// On error nothing is flushed and the output holds whatever the backend wrote so far.
    pub fn export(
        &self,
        document: &Model,
        mut sources: DataSources,
        output: Box<dyn Write>,
    ) -> Result<(), ExportError> {
        if document.kind() != ModelKind::Document {
            return Err(ExportError::Config(format!(
                "Only documents can be exported, got {} '{}'",
                document.kind().as_str(),
                document.name()
            )));
        }
        check_sources(document, &sources)?;
        let mut backend = self.registry.open(&self.format, output)?;
        let pages = self.export_into(document, &mut sources, backend.as_mut())?;
        backend.flush()?;
        log::info!(
            "Exported '{}' as {} ({} page(s))",
            document.name(),
            self.format,
            pages
        );
        Ok(())
    }

    fn export_into(
        &self,
        document: &Model,
        sources: &mut DataSources,
        backend: &mut dyn DocumentBackend,
    ) -> Result<usize, ExportError> {
        let mut ctx = ExportContext::new(backend, &self.config, &self.constraints, sources);
        document.export(&mut ctx)?;
        Ok(ctx.page())
    }
}

/// Every named source a table reads must be bound before anything is rendered.
fn check_sources(document: &Model, sources: &DataSources) -> Result<(), ExportError> {
    for model in document.descendants() {
        let Some(name) = model.as_table().and_then(|t| t.source.as_deref()) else {
            continue;
        };
        if !sources.contains(name) {
            return Err(ExportError::Config(format!(
                "Table '{}' reads data source '{}', which was not provided",
                model.name(),
                name
            )));
        }
    }
    Ok(())
}

#[derive(Default)]
pub struct ExporterBuilder {
    format: Option<DocumentFormat>,
    registry: FormatRegistry,
    config: ExportConfig,
    constraints: Option<AttributeConstraints>,
}

impl ExporterBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Selects the document format by identifier. The identifier must be registered.
    pub fn with_format(mut self, format: impl Into<DocumentFormat>) -> Self {
        self.format = Some(format.into());
        self
    }

    /// Replaces the format registry.
    pub fn with_registry(mut self, registry: FormatRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Registers a backend factory for `format`. The first registered format becomes the
    /// selected one unless `with_format` says otherwise.
    pub fn with_backend<F>(mut self, format: impl Into<DocumentFormat>, factory: F) -> Self
    where
        F: Fn(Box<dyn Write>) -> Result<Box<dyn DocumentBackend>, RenderError> + 'static,
    {
        let format = format.into();
        if self.format.is_none() {
            self.format = Some(format.clone());
        }
        self.registry.register(format, factory);
        self
    }

    pub fn with_config(mut self, config: ExportConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_page_size(mut self, page_size: PageSize) -> Self {
        self.config.page_size = page_size;
        self
    }

    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.config.max_pages = max_pages;
        self
    }

    pub fn with_constraints(mut self, constraints: AttributeConstraints) -> Self {
        self.constraints = Some(constraints);
        self
    }

    pub fn build(self) -> Result<Exporter, ExportError> {
        let format = self.format.ok_or_else(|| {
            ExportError::Config(
                "No document format has been configured. Use `with_format` or `with_backend`."
                    .to_string(),
            )
        })?;
        if !self.registry.contains(&format) {
            let known: Vec<String> = self.registry.formats().map(|f| f.to_string()).collect();
            return Err(ExportError::Config(format!(
                "Unknown document format '{}' (registered: {})",
                format,
                known.join(", ")
            )));
        }
        if self.config.max_pages == 0 {
            return Err(ExportError::Config("max_pages must be at least 1".to_string()));
        }
        Ok(Exporter {
            format,
            registry: self.registry,
            config: self.config,
            constraints: self
                .constraints
                .unwrap_or_else(|| AttributeConstraints::standard().clone()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tabulate_source::VecDataSource;

    #[test]
    fn test_missing_default_source_reads_as_empty() {
        let mut sources = DataSources::new();
        assert_eq!(sources.source_mut(None).unwrap().next(), None);
    }

    #[test]
    fn test_named_sources_are_kept_apart() {
        let mut sources = DataSources::single(VecDataSource::new(vec![json!(1)]))
            .with_named("orders", VecDataSource::new(vec![json!("o1")]));
        assert!(sources.contains("orders"));
        assert_eq!(sources.source_mut(Some("orders")).unwrap().next(), Some(json!("o1")));
        assert_eq!(sources.source_mut(None).unwrap().next(), Some(json!(1)));

        let err = sources.source_mut(Some("invoices")).err().unwrap();
        assert!(matches!(err, ExportError::Config(ref m) if m.contains("invoices")));
    }

    #[test]
    fn test_builder_requires_a_known_format() {
        let err = ExporterBuilder::new().build().err().unwrap();
        assert!(matches!(err, ExportError::Config(_)));

        let err = ExporterBuilder::new().with_format("xlsx").build().err().unwrap();
        assert!(matches!(err, ExportError::Config(ref m) if m.contains("xlsx")), "got {err}");
    }
}
