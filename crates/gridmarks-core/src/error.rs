use derive_more::{Display, Error};

/// Errors produced by the fallible value-type constructors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
pub enum Error {
    /// A digit outside the range 0-8 was supplied.
    #[display("digit out of range: {_0}")]
    DigitOutOfRange(#[error(not(source))] u8),
    /// A coordinate component outside the range 0-8 was supplied.
    #[display("coordinate out of range: ({row}, {col})")]
    KeyOutOfRange {
        /// Row component as supplied.
        row: u8,
        /// Column component as supplied.
        col: u8,
    },
}
