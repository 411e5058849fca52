use crate::dispatch::Dispatcher;
use crate::entity::RenderableEntity;
use crate::error::RenderError;
use crate::operation::OperationRegistry;
use std::collections::HashMap;
use std::io::Write;
use tabulate_types::{DocumentFormat, Size};

/// Binds a rendering context to its byte destination.
///
/// `flush` is called exactly once, after the last entity of a successful export.
pub trait OutputBinding {
    fn flush(&mut self) -> Result<(), RenderError>;
}

/// A backend's registration entry point for one document format.
pub trait BackendProvider {
    /// The backend-owned handle threaded through every operation call.
    type Context: OutputBinding + 'static;

    fn format(&self) -> DocumentFormat;

    fn register(&self, registry: &mut OperationRegistry<Self::Context>);
}

/// A ready-to-use backend with its context type erased.
pub trait DocumentBackend {
    fn format(&self) -> &DocumentFormat;

    fn dispatch(&mut self, entity: &RenderableEntity) -> Result<(), RenderError>;

    fn measure(&mut self, entity: &RenderableEntity) -> Result<Option<Size>, RenderError>;

    /// Consumes the backend, so the output cannot be flushed twice.
    fn flush(self: Box<Self>) -> Result<(), RenderError>;
}

/// A provider's operations bound to one rendering context.
pub struct Backend<R> {
    dispatcher: Dispatcher<R>,
    context: R,
}

impl<R: OutputBinding + 'static> Backend<R> {
    pub fn new<P>(provider: &P, context: R) -> Self
    where
        P: BackendProvider<Context = R>,
    {
        let mut registry = OperationRegistry::new();
        provider.register(&mut registry);
        Self {
            dispatcher: Dispatcher::new(provider.format(), registry),
            context,
        }
    }

    pub fn context(&self) -> &R {
        &self.context
    }

    pub fn boxed(self) -> Box<dyn DocumentBackend> {
        Box::new(self)
    }
}

impl<R: OutputBinding + 'static> DocumentBackend for Backend<R> {
    fn format(&self) -> &DocumentFormat {
        self.dispatcher.format()
    }

    fn dispatch(&mut self, entity: &RenderableEntity) -> Result<(), RenderError> {
        self.dispatcher.dispatch(&mut self.context, entity)
    }

    fn measure(&mut self, entity: &RenderableEntity) -> Result<Option<Size>, RenderError> {
        self.dispatcher.measure(&mut self.context, entity)
    }

    fn flush(mut self: Box<Self>) -> Result<(), RenderError> {
        log::debug!("Flushing '{}' output", self.dispatcher.format());
        self.context.flush()
    }
}

/// Creates a backend writing to the given destination.
pub type BackendFactory =
    Box<dyn Fn(Box<dyn Write>) -> Result<Box<dyn DocumentBackend>, RenderError>>;

/// Maps document format identifiers to backend factories.
///
/// Built explicitly at startup; there is no discovery.
#[derive(Default)]
pub struct FormatRegistry {
    factories: HashMap<DocumentFormat, BackendFactory>,
}

impl FormatRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `factory` for `format`, replacing any earlier registration.
    pub fn register<F>(&mut self, format: impl Into<DocumentFormat>, factory: F) -> &mut Self
    where
        F: Fn(Box<dyn Write>) -> Result<Box<dyn DocumentBackend>, RenderError> + 'static,
    {
        let format = format.into();
        log::debug!("Registering backend for '{}'", format);
        self.factories.insert(format, Box::new(factory));
        self
    }

    pub fn with<F>(mut self, format: impl Into<DocumentFormat>, factory: F) -> Self
    where
        F: Fn(Box<dyn Write>) -> Result<Box<dyn DocumentBackend>, RenderError> + 'static,
    {
        self.register(format, factory);
        self
    }

    pub fn contains(&self, format: &DocumentFormat) -> bool {
        self.factories.contains_key(format)
    }

    pub fn formats(&self) -> impl Iterator<Item = &DocumentFormat> {
        self.factories.keys()
    }

    pub fn open(
        &self,
        format: &DocumentFormat,
        output: Box<dyn Write>,
    ) -> Result<Box<dyn DocumentBackend>, RenderError> {
        let factory = self
            .factories
            .get(format)
            .ok_or_else(|| RenderError::UnknownFormat(format.to_string()))?;
        factory(output)
    }
}
