mod buffer;
mod encodings;
mod error;
mod native;
pub mod stats;

pub use buffer::{is_aligned, AlignedBuffer, WrittenBuffer, ALIGNMENT, BITPACK_ALIGNMENT};
pub(crate) use buffer::check_aligned;
pub use encodings::{alp, bitpacking, exceptions, ffor, packed_ints, ree, zigzag};
pub use error::{Codec, CodecError, CodecFunction, CodecResult, ResultStatus};
pub use native::{NativeInt, NativeType, NativeUnsigned};
pub use stats::RunLengthStats;
