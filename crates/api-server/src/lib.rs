pub mod admin_rest;
pub mod employer_rest;
pub mod rest;
pub mod server;

pub use rest::AppState;
pub use server::ApiServer;
