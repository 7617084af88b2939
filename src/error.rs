/// Convenience alias for results produced by this crate.
pub type GifsmithResult<T> = Result<T, GifsmithError>;

/// Error taxonomy for the decompose/label/re-encode pipeline.
///
/// Components return these to their caller instead of terminating the
/// process; only the binary decides to report-and-exit.
#[derive(thiserror::Error, Debug)]
pub enum GifsmithError {
    /// The input animation contained no frames at all.
    #[error("animation has no frames")]
    EmptyAnimation,

    /// The source file could not be opened or read.
    #[error("input error: {0}")]
    InputIo(String),

    /// The animated or still-image container is malformed. Faults raised
    /// inside the third-party decoder are converted into this variant at
    /// the decode boundary rather than crashing the process.
    #[error("decode error: {0}")]
    Decode(String),

    /// The font asset is missing or unparsable. Fatal: label rendering is
    /// undefined without a face.
    #[error("font error: {0}")]
    FontLoad(String),

    /// The destination sink could not be written.
    #[error("encode error: {0}")]
    EncodeIo(String),

    /// Internal geometry inconsistency. Surfacing this indicates a bug in
    /// bounds computation, not a user error.
    #[error("invariant violation: {0}")]
    InvariantViolation(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl GifsmithError {
    pub fn input_io(msg: impl Into<String>) -> Self {
        Self::InputIo(msg.into())
    }

    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    pub fn font_load(msg: impl Into<String>) -> Self {
        Self::FontLoad(msg.into())
    }

    pub fn encode_io(msg: impl Into<String>) -> Self {
        Self::EncodeIo(msg.into())
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_are_stable() {
        assert!(
            GifsmithError::input_io("x")
                .to_string()
                .contains("input error:")
        );
        assert!(GifsmithError::decode("x").to_string().contains("decode error:"));
        assert!(
            GifsmithError::font_load("x")
                .to_string()
                .contains("font error:")
        );
        assert!(
            GifsmithError::encode_io("x")
                .to_string()
                .contains("encode error:")
        );
        assert!(
            GifsmithError::invariant("x")
                .to_string()
                .contains("invariant violation:")
        );
        assert_eq!(
            GifsmithError::EmptyAnimation.to_string(),
            "animation has no frames"
        );
    }

    #[test]
    fn other_preserves_source() {
        let base = std::io::Error::other("boom");
        let err = GifsmithError::Other(anyhow::Error::new(base));
        assert!(err.to_string().contains("boom"));
    }
}
