//! # tagsmith-core
//!
//! Core types shared across all tagsmith crates.
//!
//! This crate provides:
//! - The fully resolved, immutable [`Config`] consumed by the engine
//! - The output [`Model`] (packages, structs, constants, accessor records, getters)
//! - Import aggregation and alias collision resolution ([`Model::add_struct`])
//! - Cross-cutting error types

pub mod config;
pub mod errors;
pub mod model;

pub use config::{
    Config, ElementConfig, ElementFormat, ElementInput, ElementOutput, ElementTransform,
    GetterConfig, GetterFormat, IdentFormat, InputConfig, InputMode, OutputConfig, OutputMode,
    SelectionPolicy, ValueCase,
};
pub use errors::CoreError;
pub use model::{
    ConstantOutput, FieldOutput, GetterOutput, Model, NoneOutput, PackageModel, ReturnOutput,
    ScanError, StructModel, StructOutput, TypePackageOutput, ValueOutput,
};
