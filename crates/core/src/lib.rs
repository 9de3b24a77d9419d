//! Core types for stipulate
//!
//! This crate holds everything a check chain needs besides the checks
//! themselves:
//! - Configuration: layered settings (global, thread, instance) and their resolution
//! - Failures: the record of one failed check and the collector for deferred mode
//! - Exceptions: conversion of failures into error values, with caller overrides
//! - Conversion: per-type rendering of values in failure messages
//! - Usage errors: misuse of the API, kept apart from validation failures

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod convert;
pub mod error;
pub mod exception;
pub mod failure;

pub use config::{
    resolve, ConfigLayer, Configuration, GlobalConfiguration, GlobalScope, ThreadConfiguration,
    ThreadScope,
};
pub use convert::StringConverter;
pub use error::{require_name, UsageError};
pub use exception::{
    impossible_check, BoxError, Cause, ContractError, ContractException, ExceptionFactory,
    ExceptionType, ExceptionTypeBuilder, Violation,
};
pub use failure::{
    FailureEntry, FailureKind, FailureReport, Materialize, ValidationFailure,
    ValidationFailureCollector,
};
