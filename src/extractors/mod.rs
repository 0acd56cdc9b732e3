//! Request extractors shared by the entity handlers.

mod body;
mod meta;

pub use body::RecordBody;
pub use meta::RequestMeta;
