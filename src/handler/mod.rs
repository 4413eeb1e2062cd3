//! Validated handlers: configuration, bundle, pre-handlers and the wrapper

pub mod bundle;
pub mod pre_handler;
pub mod wrapper;

pub use bundle::{RouteContext, Validated};
pub use pre_handler::{PreHandler, PreHandlerFn};
pub use wrapper::{Schemas, ValidatedHandler, ValidationConfig, wrap};
