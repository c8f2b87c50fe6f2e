pub mod loader;
pub mod models;
pub mod parser;
pub mod validator;

pub use loader::ConfigLoader;
pub use models::{BackendKind, Config};
