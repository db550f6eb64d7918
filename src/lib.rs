//! Core library for the lite-report command line application.
//!
//! The library turns retailer sales exports into a running report workbook.
//! Responsibilities are split the same way the pipeline runs: spreadsheet
//! adapters live under [`litereport::engine::io`], the canonical records in
//! [`litereport::engine::model`], the retailer layouts in
//! [`litereport::engine::format`], the add/subtract combination in
//! [`litereport::engine::merge`], and the orchestration in
//! [`litereport::engine::manager`].

pub mod litereport;

pub use litereport::engine::{
    ErrorKind, ReportError, Result, error, format, io, manager, merge, model,
};
