use std::fmt;

use thiserror::Error;

/// Alias for the result type of codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// The codec an error originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Codec {
    /// Statistics kernels
    Stats,
    /// Run-end encoding
    Ree,
    /// `ZigZag` sign remapping
    ZigZag,
    /// Adaptive lossless floating-point encoding
    Alp,
    /// `FastLanes` packed integers
    PackedInts,
    /// `FastLanes` fused frame-of-reference
    Ffor,
    /// Exception bitset helpers
    Exceptions,
    /// Buffer allocation helpers
    Buffer,
}

/// The operation of a [`Codec`] an error originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodecFunction {
    /// Parameter discovery that precedes encoding (exponent search, bit width choice, size query)
    Prelude,
    /// Statistics scan
    Scan,
    Encode,
    EncodeSingle,
    CollectExceptions,
    Decode,
    DecodeSingle,
    Patch,
}

impl fmt::Display for Codec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl fmt::Display for CodecFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Errors that can occur when using the codecs.
///
/// Every variant corresponds to exactly one non-`Ok` [`ResultStatus`]; errors are
/// deterministic functions of the input, so retrying the same call yields the same error.
#[non_exhaustive]
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodecError {
    /// Null pointer, zero or mismatched length, or an out-of-range parameter
    #[error("{0}::{1}: invalid input")]
    InvalidInput(Codec, CodecFunction),

    /// A buffer pointer violates the required alignment
    #[error("{0}::{1}: incorrect buffer alignment")]
    IncorrectAlignment(Codec, CodecFunction),

    /// The algorithm could not satisfy its contract
    #[error("{0}::{1}: encoding failed")]
    EncodingFailed(Codec, CodecFunction),

    /// A caller-provided buffer is smaller than required
    #[error("{0}::{1}: output buffer too small")]
    OutputBufferTooSmall(Codec, CodecFunction),

    /// A scratch or buffer allocation failed
    #[error("{0}::{1}: out of memory")]
    OutOfMemory(Codec, CodecFunction),

    /// Internal bug catch-all
    #[error("{0}::{1}: unknown codec error")]
    Unknown(Codec, CodecFunction),
}

/// Status code reported across the C boundary.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResultStatus {
    #[default]
    Ok = 0,
    InvalidInput = 1,
    IncorrectAlignment = 2,
    EncodingFailed = 3,
    OutputBufferTooSmall = 4,
    OutOfMemory = 5,
    UnknownCodecError = 6,
}

impl From<&CodecError> for ResultStatus {
    fn from(err: &CodecError) -> Self {
        match err {
            CodecError::InvalidInput(..) => ResultStatus::InvalidInput,
            CodecError::IncorrectAlignment(..) => ResultStatus::IncorrectAlignment,
            CodecError::EncodingFailed(..) => ResultStatus::EncodingFailed,
            CodecError::OutputBufferTooSmall(..) => ResultStatus::OutputBufferTooSmall,
            CodecError::OutOfMemory(..) => ResultStatus::OutOfMemory,
            CodecError::Unknown(..) => ResultStatus::UnknownCodecError,
        }
    }
}

impl<T> From<&CodecResult<T>> for ResultStatus {
    fn from(result: &CodecResult<T>) -> Self {
        match result {
            Ok(_) => ResultStatus::Ok,
            Err(e) => e.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_are_stable() {
        assert_eq!(ResultStatus::Ok as i32, 0);
        assert_eq!(ResultStatus::UnknownCodecError as i32, 6);
        let err = CodecError::OutputBufferTooSmall(Codec::Ree, CodecFunction::Encode);
        assert_eq!(ResultStatus::from(&err), ResultStatus::OutputBufferTooSmall);
        assert_eq!(err.to_string(), "Ree::Encode: output buffer too small");
    }
}
