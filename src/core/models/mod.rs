pub mod allocation;
pub mod bucket;
