pub mod cache;
pub mod client;
pub mod clock;
pub mod config;
pub mod constants;
pub mod error;
pub mod formatting;
pub mod normalization;
pub mod parsing;
pub mod service;
pub mod session;
pub mod storage;
pub mod types;
