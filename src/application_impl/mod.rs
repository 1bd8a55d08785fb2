mod auth_provider_fake;
mod auth_provider_local;
mod control_resolver_fake;
mod login_parser_fake;

pub use auth_provider_fake::*;
pub use auth_provider_local::*;
pub use control_resolver_fake::*;
pub use login_parser_fake::*;
