//! Request building blocks: methods, body kinds, key-value rows.

mod body;
mod key_value;
mod method;

pub use body::BodyKind;
pub use key_value::KeyValuePair;
pub use method::HttpMethod;
