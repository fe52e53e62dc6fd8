use thiserror::Error;

/// Error type for background removal and enhancement operations
///
/// Every entry point reports failures synchronously through this type.
/// Degenerate-but-valid inputs (uniform images, images smaller than the
/// sampling band) never produce an error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// The raw byte buffer cannot be interpreted as RGBA at the stated dimensions
    ///
    /// This error is returned when the buffer length is not exactly
    /// `width * height * 4`.
    #[error("Cannot decode {width}x{height} RGBA buffer: expected {expected} bytes, got {actual}")]
    Decode {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },

    /// Width or height is zero
    #[error("Invalid image dimensions {width}x{height}: both must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// Unrecognized enhancement mode name
    #[error("Unsupported enhancement mode: {0}")]
    UnsupportedMode(String),

    /// A kernel or settings parameter is outside its valid range
    #[error("Invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    /// Image and mask dimensions do not match
    #[error("Image and mask dimensions do not match: expected {expected:?}, actual {actual:?}")]
    DimensionMismatch {
        /// Expected dimensions (width, height)
        expected: (u32, u32),
        /// Actual dimensions (width, height)
        actual: (u32, u32),
    },

    /// A newer request superseded this run before its result was delivered
    #[error("Run {generation} was superseded by run {latest}")]
    Superseded { generation: u64, latest: u64 },
}
