// ABOUTME: Low-level wire codec shared by every higher-level SANE protocol component:
// ABOUTME: the word codec, the string codec, and exact-read/exact-write stream helpers.

pub mod stream;
pub mod string;
pub mod word;

pub use string::{encode_string, read_string, write_string};
pub use word::{decode_word, encode_int, encode_version, SaneWord};
