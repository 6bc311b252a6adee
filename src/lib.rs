pub mod aggregate;
pub mod catalog;
pub mod config;
pub mod error;
pub mod fetch;
pub mod pipeline;
pub mod report;
pub mod store;
pub mod table;
