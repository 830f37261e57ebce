pub mod aggregate;
pub mod engine;
pub mod http;
pub mod providers;
pub mod public_ip;
pub mod tor;
pub mod vendors;
