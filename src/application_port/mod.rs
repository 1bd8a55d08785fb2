mod auth_provider;
mod control_resolver;
mod login_parser;

pub use auth_provider::*;
pub use control_resolver::*;
pub use login_parser::*;
