#![warn(rust_2018_idioms)]

pub mod app;
pub mod cache;
pub mod config;
pub mod domain;
pub mod error;
pub mod extractor;
pub mod handler;
pub mod healthcheck;
pub mod markdown;
pub mod service;

#[doc(hidden)]
pub mod test_support;

pub use healthcheck::{healthcheck, healthcheck_with_port};
