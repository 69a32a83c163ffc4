//! Error type for ocho

use thiserror::Error;

/// Result type, equivalent to [std::result::Result]<T, [enum@Error]>
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for ocho.
#[derive(Debug, Error)]
pub enum Error {
    /// The ROM file doesn't fit in program memory
    #[error("rom is {size} bytes, but only {capacity} fit above 0x200")]
    RomTooLarge {
        /// Size of the offending file
        size: usize,
        /// Size of the program region
        capacity: usize,
    },
    /// The fetched word matches no documented operation
    #[error("opcode {word:04x} at {addr:03x} not recognized")]
    UnknownInstruction {
        /// The offending word
        word: u16,
        /// Address the word was fetched from
        addr: u16,
    },
    /// A call was issued with 16 return addresses already stacked
    #[error("call at {addr:03x} overflowed the 16-slot stack")]
    StackOverflow {
        /// Address of the offending call
        addr: u16,
    },
    /// A return was issued with nothing on the stack
    #[error("return at {addr:03x} on an empty stack")]
    StackUnderflow {
        /// Address of the offending return
        addr: u16,
    },
    /// Tried to press a key that doesn't exist
    #[error("tried to press key {key:X} which does not exist")]
    InvalidKey {
        /// The offending key
        key: usize,
    },
    /// Tried to get/set an out-of-bounds register
    #[error("tried to access register v{reg:X} which does not exist")]
    InvalidRegister {
        /// The offending register
        reg: usize,
    },
    /// Error originated in [std::io]
    #[error(transparent)]
    IoError(#[from] std::io::Error),
    /// Error originated in [minifb]
    #[error(transparent)]
    MinifbError(#[from] minifb::Error),
}
