//! Character classification for header tokens.

/// Two-character operators that scan as a single symbol.
///
/// `>>` is deliberately absent: it closes nested template argument lists
/// and must reach the parser as two `>` symbols.
pub const COMPOUND_OPERATORS: [&str; 17] = [
    "<<", "!=", "<=", ">=", "++", "--", "+=", "-=", "*=", "/=", "&&", "||", "^^", "==", "**", "~=",
    "::",
];

/// Whether `first` followed by `second` forms a compound operator.
pub fn is_compound_operator(first: char, second: char) -> bool {
    match first {
        '<' => matches!(second, '<' | '='),
        '!' | '>' | '*' | '/' | '~' => second == '=' || (first == '*' && second == '*'),
        '+' => matches!(second, '+' | '='),
        '-' => matches!(second, '-' | '='),
        '&' => second == '&',
        '|' => second == '|',
        '^' => second == '^',
        '=' => second == '=',
        ':' => second == ':',
        _ => false,
    }
}

/// Letters (including non-ASCII alphabetics) and `_`.
#[inline]
pub fn is_ident_start(c: char) -> bool {
    c == '_' || c.is_alphabetic()
}

#[inline]
pub fn is_ident_continue(c: char) -> bool {
    c == '_' || c.is_alphanumeric()
}

#[inline]
pub fn is_digit(c: char) -> bool {
    c.is_ascii_digit()
}

#[inline]
pub fn is_hex_digit(c: char) -> bool {
    c.is_ascii_hexdigit()
}

/// Leading sign of a numeric literal.
#[inline]
pub fn is_sign(c: char) -> bool {
    matches!(c, '+' | '-')
}

/// Second character of a `0x` prefix.
#[inline]
pub fn is_hex_marker(c: char) -> bool {
    matches!(c, 'x' | 'X')
}

#[inline]
pub fn is_exponent_marker(c: char) -> bool {
    matches!(c, 'e' | 'E')
}

/// `f` suffix of a float literal.
#[inline]
pub fn is_float_marker(c: char) -> bool {
    matches!(c, 'f' | 'F')
}

/// Integer width/sign suffix: any run of `u`, `U`, `l`, `L`.
#[inline]
pub fn is_integer_suffix(c: char) -> bool {
    matches!(c, 'u' | 'U' | 'l' | 'L')
}

/// Whitespace skipped between tokens.
#[inline]
pub fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n')
}

/// Whitespace trimmed from the end of raw strings.
#[inline]
pub fn is_horizontal_space(c: char) -> bool {
    matches!(c, ' ' | '\t')
}
