mod cache_store_memory;
mod manual_clock;

pub use cache_store_memory::*;
pub use manual_clock::*;
