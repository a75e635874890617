//! Utilities for printing and handling errors.

use crate::document::Position;

use std::fmt;

/// Write the one-based line number of a position.
pub(crate) fn write_line_information<W: fmt::Write>(
    buffer: &mut W,
    position: &Position,
) -> fmt::Result {
    write!(buffer, "(line {}) ", position.line_number())
}

/// Implement `From` for error enums whose variants wrap another error.
///
/// ```ignore
/// impl_from_error![
///     RuntimeError;
///     [CorruptState, CorruptStateKind]
/// ];
/// ```
macro_rules! impl_from_error {
    ($for_type:ident; $([$variant:ident, $from_type:ident]),+) => {
        $(
            impl From<$from_type> for $for_type {
                fn from(err: $from_type) -> Self {
                    $for_type::$variant(err)
                }
            }
        )*
    }
}
