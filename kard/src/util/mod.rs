//! Supporting utilities.

mod collections;
mod json;
mod password;

pub use collections::{dedup_in_place, merge_lists};
pub use json::decode_concatenated_json;
pub use password::{generate_password, DEFAULT_PASSWORD_LENGTH};
