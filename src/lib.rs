pub mod albconfig;
pub mod app;
pub mod cmd;
pub mod config;
pub mod convert;
pub mod error;
pub mod feature;
pub mod field;
pub mod kube;
pub mod logging;
pub mod printer;
pub mod provider;
pub mod reader;
pub mod resources;
