use std::io;


#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The source ran out before a read of `needed` bytes could be satisfied.
    #[error("input truncated: needed {needed} bytes, {available} available")]
    Truncated { needed: usize, available: usize },

    #[error("unknown wire type tag {0:#04x}")]
    UnknownType(u8),

    #[error("nesting depth exceeds limit of {limit}")]
    DepthExceeded { limit: usize },

    /// A length or count does not fit the 4-byte prefix.
    #[error("length {len} does not fit in a 32-bit size prefix")]
    SizeOverflow { len: usize },

    #[error("{remaining} trailing bytes after value")]
    TrailingData { remaining: usize },

    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;


impl Error {
    pub fn is_truncated(&self) -> bool {
        matches!(self, Error::Truncated { .. })
    }
}
