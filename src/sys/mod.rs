pub mod icon;
pub mod runtime;
pub mod server;
