//! Shared protobuf descriptor types for the proto-rest-openapi generator.
//!
//! This crate provides custom [`prost::Message`] types that preserve the
//! `google.api.http` extension (field 72295728), field JSON names, map-entry
//! markers and source comments. Standard `prost_types` descriptors drop the
//! extension during decoding, and the generator needs all of the above.
//!
//! [`plugin`] holds the `protoc` plugin request built on the same types, so a
//! `CodeGeneratorRequest` can be decoded without losing annotations. You
//! should not need to depend on this crate directly; use
//! `proto-rest-openapi` instead.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod descriptor;
pub mod plugin;
