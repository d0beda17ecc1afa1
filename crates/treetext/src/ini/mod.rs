//! INI codec: [`Tree`](crate::Tree) ⇄ dotted-section INI text.
//!
//! - [`encoder`]: tree → `key=value` lines and `[a.b]` section headers
//! - [`decoder`]: INI text → tree, rebuilding nesting from dotted keys
//!
//! `decode(encode(t))` reproduces `t` up to scalar-first key order within
//! each map. Empty maps and lists both come back as empty maps, and keys
//! that themselves contain `.` come back nested.

pub mod decoder;
pub mod encoder;

pub use decoder::decode;
pub use encoder::{encode, encode_with_parent};

/// Line separator written by the encoder. The decoder accepts `\n` and `\r\n`.
pub const LINE_ENDING: &str = if cfg!(windows) { "\r\n" } else { "\n" };

/// Unquoted values read back as `true`.
pub(crate) const TRUE_WORDS: [&str; 3] = ["on", "yes", "true"];
/// Unquoted values read back as `false`.
pub(crate) const FALSE_WORDS: [&str; 4] = ["off", "no", "false", "none"];
