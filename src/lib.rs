pub mod client;
pub mod core;
pub mod providers;
pub mod server;
pub mod store;
