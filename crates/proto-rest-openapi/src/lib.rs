//! `OpenAPI` 3.0 generation from protobuf service descriptors.
//!
//! Turns a parsed `.proto` file (messages, enums, services and their
//! `google.api.http` annotations) into an `OpenAPI` document:
//!
//! - [`naming`]: qualified-name and selector normalization
//! - [`SchemaBuilder`]: recursive field → schema translation
//! - [`resolve_bindings`] / [`extract_path_vars`]: HTTP bindings per RPC
//! - [`assemble_document`]: tags, component schemas and path items
//! - [`plugin`]: `protoc` plugin and descriptor-set entry points
//!
//! ```ignore
//! let files = proto_rest_openapi::generate_from_descriptor_set(
//!     &std::fs::read("descriptor.binpb")?,
//!     &[],
//!     &GeneratorConfig::default(),
//! )?;
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub(crate) use proto_rest_core::descriptor;

mod assemble;
mod binding;
mod config;
mod document;
mod error;
mod index;
pub mod naming;
pub mod plugin;
mod schema;

pub use assemble::assemble_document;
pub use binding::{extract_path_vars, resolve_bindings, HttpVerb, MethodBinding, MethodOrdinals};
pub use config::{GeneratorConfig, OutputFormat};
pub use document::{
    ApiDocument, Components, Info, MediaType, Operation, Parameter, ParameterLocation, PathItem,
    RequestBody, Response, Schema, SchemaKind, Tag,
};
pub use error::{Error, Result};
pub use index::{MessageEntry, TypeIndex};
pub use plugin::{
    generate_files, generate_from_descriptor_set, generate_from_request, GeneratedFile,
};
pub use schema::SchemaBuilder;
