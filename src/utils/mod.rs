pub mod connection;
pub mod filters;
