mod controls;
mod login;
mod session;
mod token;

pub use controls::*;
pub use login::*;
pub use session::*;
pub use token::*;
