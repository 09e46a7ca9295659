//! Shared types for the reflection header toolchain.
//!
//! Everything that crosses a crate boundary lives here: source [`Span`]s,
//! classified [`Token`]s, and the length limits the header parser relies on
//! when it reports errors against token positions.

mod span;
mod token;

pub use span::Span;
pub use token::{Token, TokenKind};

/// Maximum length (exclusive) of an identifier or numeric literal.
pub const MAX_NAME_LENGTH: usize = 1024;

/// Maximum length (exclusive) of a string literal or raw string.
pub const MAX_STRING_LENGTH: usize = 1024;

/// Compile-time size assertion.
///
/// Usage: `static_assert_size!(Type, expected_size);`
#[macro_export]
macro_rules! static_assert_size {
    ($ty:ty, $size:expr) => {
        const _: [(); $size] = [(); ::std::mem::size_of::<$ty>()];
    };
}
