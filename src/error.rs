use derive_more::derive::{Display, Error};

/// A specialized `Result` where the error is this crate's `Error` type.
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Define a unified error type for this crate.
#[expect(missing_docs, reason = "The variants are self-explanatory.")]
#[derive(Debug, Display, Error)]
pub enum Error {
    // `#[error(not(source))]` below tells `derive_more` that `embassy_executor::SpawnError` does
    // not implement Rust's `core::error::Error` trait.
    #[cfg(any(feature = "pico1", feature = "pico2"))]
    #[display("{_0:?}")]
    TaskSpawn(#[error(not(source))] embassy_executor::SpawnError),

    #[display("Error setting output state")]
    CannotSetOutputState,

    #[display("Error reading input state")]
    CannotReadInput,

    #[display("Index out of bounds")]
    IndexOutOfBounds,

    #[display("Unknown remote command 0x{_0:02X}")]
    UnknownCommand(#[error(not(source))] u8),
}

/// Return type of loops that only come back with an error.
///
/// Rust's `!` is unstable, so this uninhabited enum stands in for it.
#[derive(Debug)]
pub enum Never {}
