//! Small framework-independent helpers

pub mod chunk;
pub mod rand;
pub mod valid;

pub use self::chunk::arr_chunk;
pub use self::rand::{random_alphanum, random_alphanum_default};
pub use self::valid::{is_bool_str, is_phone, is_phone_or_empty};
