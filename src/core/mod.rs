pub mod allocator;
pub mod config;
pub mod formatter;
pub mod input;
pub mod models;
