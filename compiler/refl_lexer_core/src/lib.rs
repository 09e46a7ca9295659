//! Low-level scanning primitives for reflection headers.
//!
//! This crate knows nothing about tokens or diagnostics. It provides:
//! - [`Cursor`]: a byte-offset + line cursor over a borrowed `&str`
//! - character classification used by the token reader ([`classify`])
//! - the compound operator table ([`COMPOUND_OPERATORS`])
//!
//! Positions are byte offsets into the source. The cursor only ever stops
//! on character boundaries, so slicing between two cursor positions is
//! always valid.

pub mod classify;
mod cursor;

pub use classify::{is_compound_operator, COMPOUND_OPERATORS};
pub use cursor::Cursor;
