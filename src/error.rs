//! Error type shared by the bit workspace and both codecs.

/// Failures surfaced by the core library.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The underlying byte reader or writer failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The bit reader was asked for more bits than remain in the stream.
    ///
    /// Decoders surface this to signal normal end-of-stream; a caller that
    /// expects a known number of values and sees this early should treat it
    /// as corruption rather than a clean finish.
    #[error("end of stream")]
    EndOfStream,
}

/// Convenience alias used throughout the core crate.
pub type Result<T> = std::result::Result<T, CodecError>;
