//! Domain types.

mod kpmap;
mod kvmap;
mod payload;
mod secret;

pub use kpmap::KPMap;
pub use kvmap::KVMap;
pub use payload::Payload;
pub use secret::Secret;
