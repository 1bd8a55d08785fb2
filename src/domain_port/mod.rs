mod cache_store;
mod clock;
mod request_context;

pub use cache_store::*;
pub use clock::*;
pub use request_context::*;
