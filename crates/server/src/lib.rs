//! HTTP front end for the cost optimizer

pub mod api;
pub mod config;
