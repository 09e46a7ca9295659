use bitflags::bitflags;

bitflags! {
    /// Options for [`TokenReader::get_raw_string`](crate::TokenReader::get_raw_string).
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct RawStringOptions: u8 {
        /// A terminator inside `"..."` does not end the scan.
        const RESPECT_QUOTES = 1 << 0;
        /// Leave the terminator unread.
        const DONT_CONSUME_TERMINATOR = 1 << 1;
    }
}
