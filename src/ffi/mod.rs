//! C ABI over [`crate::codecs`].
//!
//! Every operation is exported once per element type as `lwcodec_<codec>_<operation>_<type>`.
//! Conventions shared by all entry points:
//!
//! - Lengths are `u64` element counts; buffer lengths in [`CByteBuffer`] are byte counts.
//! - Output buffers are passed in through the result struct: the caller fills in
//!   `buffer.ptr`/`buffer.len` of every [`CWrittenBuffer`] before the call, and on success the
//!   library overwrites `buffer.len` with the number of bytes written plus the other descriptor
//!   fields. The library never allocates or frees memory it hands across the boundary.
//! - Every buffer pointer must be [`ALIGNMENT`]-aligned, except packed bit-packing byte buffers
//!   which need [`BITPACK_ALIGNMENT`]. A misaligned pointer yields `IncorrectAlignment`, a null
//!   one `InvalidInput`.
//! - On a non-`Ok` status the descriptors must not be read; output buffers may be partially
//!   written. A panic never unwinds into the caller; it is reported as `UnknownCodecError`.
//! - Input and output buffers must not overlap.
#![allow(non_snake_case)]

use std::panic::{self, AssertUnwindSafe};
use std::ptr;
use std::slice;

use half::f16;

use crate::codecs::alp::{self, AlpExponents, AlpFloat};
use crate::codecs::ree::{self, RunEnd};
use crate::codecs::zigzag::{self, ZigZag};
use crate::codecs::{
    bitpacking, check_aligned, ffor, stats, AlignedBuffer, Codec, CodecError, CodecFunction,
    CodecResult, NativeInt, NativeType, ResultStatus, RunLengthStats, WrittenBuffer, ALIGNMENT,
    BITPACK_ALIGNMENT,
};

/// A caller-owned byte region.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CByteBuffer {
    pub ptr: *mut u8,
    pub len: u64,
}

impl CByteBuffer {
    pub fn new(ptr: *mut u8, len: u64) -> Self {
        Self { ptr, len }
    }
}

impl Default for CByteBuffer {
    fn default() -> Self {
        Self::new(ptr::null_mut(), 0)
    }
}

impl From<&mut AlignedBuffer> for CByteBuffer {
    fn from(buf: &mut AlignedBuffer) -> Self {
        Self::new(buf.as_mut_ptr(), buf.len() as u64)
    }
}

/// C layout of [`WrittenBuffer`]: the output region, truncated to what was written.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CWrittenBuffer {
    pub buffer: CByteBuffer,
    pub bit_size_per_element: u8,
    pub num_elements: u64,
    pub input_bytes_used: u64,
}

impl CWrittenBuffer {
    /// An output slot backed by `buffer`.
    pub fn new(buffer: CByteBuffer) -> Self {
        Self {
            buffer,
            ..Self::default()
        }
    }

    fn record(&mut self, written: WrittenBuffer) {
        self.buffer.len = written.bytes_written as u64;
        self.bit_size_per_element = written.bit_size_per_element;
        self.num_elements = written.num_elements as u64;
        self.input_bytes_used = written.input_bytes_used as u64;
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct COneBufferResult {
    pub status: ResultStatus,
    pub buf: CWrittenBuffer,
}

impl COneBufferResult {
    pub fn new(buf: CByteBuffer) -> Self {
        Self {
            status: ResultStatus::Ok,
            buf: CWrittenBuffer::new(buf),
        }
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CTwoBufferResult {
    pub status: ResultStatus,
    pub first: CWrittenBuffer,
    pub second: CWrittenBuffer,
}

impl CTwoBufferResult {
    pub fn new(first: CByteBuffer, second: CByteBuffer) -> Self {
        Self {
            status: ResultStatus::Ok,
            first: CWrittenBuffer::new(first),
            second: CWrittenBuffer::new(second),
        }
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CAlpExponentsResult {
    pub status: ResultStatus,
    pub exponents: AlpExponents,
}

/// Result of packing: the packed bytes and how many exceptions a following
/// `collectExceptions` call must make room for.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CPackedIntsResult {
    pub status: ResultStatus,
    pub encoded: CWrittenBuffer,
    pub num_exceptions: u64,
}

impl CPackedIntsResult {
    pub fn new(encoded: CByteBuffer) -> Self {
        Self {
            status: ResultStatus::Ok,
            encoded: CWrittenBuffer::new(encoded),
            num_exceptions: 0,
        }
    }
}

/// FFOR results have the same shape as [`CPackedIntsResult`].
pub type CFforResult = CPackedIntsResult;

/// The codec and operation an entry point runs, used to tag errors.
#[derive(Debug, Clone, Copy)]
struct Call {
    codec: Codec,
    function: CodecFunction,
}

impl Call {
    const fn new(codec: Codec, function: CodecFunction) -> Self {
        Self { codec, function }
    }

    fn invalid(self) -> CodecError {
        CodecError::InvalidInput(self.codec, self.function)
    }

    fn len(self, len: u64) -> CodecResult<usize> {
        usize::try_from(len).map_err(|_| self.invalid())
    }

    /// Borrows `len` elements at `ptr`.
    ///
    /// # Safety
    ///
    /// If `ptr` is non-null it must be valid for reads of `len` elements for `'a`.
    unsafe fn input<'a, T>(self, ptr: *const T, len: u64) -> CodecResult<&'a [T]> {
        check_aligned(ptr, ALIGNMENT, self.codec, self.function)?;
        let len = self.len(len)?;
        // SAFETY: non-null and aligned; validity is the caller's contract.
        Ok(unsafe { slice::from_raw_parts(ptr, len) })
    }

    /// Borrows the packed bytes described by `bytes`.
    ///
    /// # Safety
    ///
    /// `bytes`, if non-null, must point to a valid descriptor whose region is readable.
    unsafe fn packed_input<'a>(self, bytes: *const CByteBuffer) -> CodecResult<&'a [u8]> {
        // SAFETY: validity of the descriptor is the caller's contract.
        let bytes = unsafe { bytes.as_ref() }.ok_or(self.invalid())?;
        check_aligned(bytes.ptr, BITPACK_ALIGNMENT, self.codec, self.function)?;
        let len = self.len(bytes.len)?;
        // SAFETY: as above.
        Ok(unsafe { slice::from_raw_parts(bytes.ptr, len) })
    }

    /// Borrows a caller-provided output region as whole elements of `T`.
    ///
    /// # Safety
    ///
    /// If `buf.ptr` is non-null it must be valid for writes of `buf.len` bytes for `'a` and not
    /// alias any other borrowed buffer.
    unsafe fn output<'a, T: NativeType>(
        self,
        buf: CByteBuffer,
        align: usize,
    ) -> CodecResult<&'a mut [T]> {
        check_aligned(buf.ptr, align, self.codec, self.function)?;
        let whole = self.len(buf.len)? / size_of::<T>() * size_of::<T>();
        // SAFETY: non-null, and the caller's contract covers the first `whole` bytes.
        let bytes = unsafe { slice::from_raw_parts_mut(buf.ptr, whole) };
        bytemuck::try_cast_slice_mut(bytes)
            .map_err(|_| CodecError::IncorrectAlignment(self.codec, self.function))
    }

    /// Writes a scalar result through `out`.
    ///
    /// # Safety
    ///
    /// If `out` is non-null it must be valid for a write of `R`.
    unsafe fn write<R>(self, out: *mut R, value: R) -> CodecResult<()> {
        // SAFETY: caller's contract.
        let out = unsafe { out.as_mut() }.ok_or(self.invalid())?;
        *out = value;
        Ok(())
    }

    /// Runs `f`, turning a panic into `Unknown`.
    fn run<R>(self, f: impl FnOnce() -> CodecResult<R>) -> CodecResult<R> {
        let result = panic::catch_unwind(AssertUnwindSafe(f)).unwrap_or_else(|_| {
            tracing::debug!(codec = %self.codec, function = %self.function, "caught panic");
            Err(CodecError::Unknown(self.codec, self.function))
        });
        if let Err(err) = &result {
            tracing::debug!(%err, "C call failed");
        }
        result
    }

    /// Runs `f` for an entry point that reports through its return value.
    fn status(self, f: impl FnOnce() -> CodecResult<()>) -> ResultStatus {
        ResultStatus::from(&self.run(f))
    }

    /// Runs `f` with the output region of a one-buffer result and records what it wrote.
    ///
    /// # Safety
    ///
    /// `out`, if non-null, must point to a valid result struct.
    unsafe fn one_buffer(
        self,
        out: *mut COneBufferResult,
        f: impl FnOnce(CByteBuffer) -> CodecResult<WrittenBuffer>,
    ) {
        // SAFETY: caller's contract.
        let Some(out) = (unsafe { out.as_mut() }) else {
            tracing::debug!(codec = %self.codec, function = %self.function, "null result pointer");
            return;
        };
        let result = self.run(|| f(out.buf.buffer));
        out.status = ResultStatus::from(&result);
        if let Ok(written) = result {
            out.buf.record(written);
        }
    }

    /// Two-buffer variant of [`one_buffer`](Self::one_buffer).
    ///
    /// # Safety
    ///
    /// `out`, if non-null, must point to a valid result struct.
    unsafe fn two_buffers(
        self,
        out: *mut CTwoBufferResult,
        f: impl FnOnce(CByteBuffer, CByteBuffer) -> CodecResult<(WrittenBuffer, WrittenBuffer)>,
    ) {
        // SAFETY: caller's contract.
        let Some(out) = (unsafe { out.as_mut() }) else {
            tracing::debug!(codec = %self.codec, function = %self.function, "null result pointer");
            return;
        };
        let result = self.run(|| f(out.first.buffer, out.second.buffer));
        out.status = ResultStatus::from(&result);
        if let Ok((first, second)) = result {
            out.first.record(first);
            out.second.record(second);
        }
    }

    /// Packing variant of [`one_buffer`](Self::one_buffer).
    ///
    /// # Safety
    ///
    /// `out`, if non-null, must point to a valid result struct.
    unsafe fn packed(
        self,
        out: *mut CPackedIntsResult,
        f: impl FnOnce(CByteBuffer) -> CodecResult<ffor::PackedWritten>,
    ) {
        // SAFETY: caller's contract.
        let Some(out) = (unsafe { out.as_mut() }) else {
            tracing::debug!(codec = %self.codec, function = %self.function, "null result pointer");
            return;
        };
        let result = self.run(|| f(out.encoded.buffer));
        out.status = ResultStatus::from(&result);
        if let Ok(packed) = result {
            out.encoded.record(packed.written);
            out.num_exceptions = packed.num_exceptions as u64;
        }
    }
}

const SCAN: Call = Call::new(Codec::Stats, CodecFunction::Scan);

unsafe fn math_scan<T: NativeType, R>(
    ptr: *const T,
    len: u64,
    out: *mut R,
    kernel: impl FnOnce(&[T]) -> CodecResult<R>,
) -> ResultStatus {
    SCAN.status(|| {
        // SAFETY: forwarded from the exported function.
        let values = unsafe { SCAN.input(ptr, len)? };
        let value = kernel(values)?;
        // SAFETY: as above.
        unsafe { SCAN.write(out, value) }
    })
}

unsafe fn ree_encode<T: NativeType>(ptr: *const T, len: u64, out: *mut CTwoBufferResult) {
    let call = Call::new(Codec::Ree, CodecFunction::Encode);
    // SAFETY: forwarded from the exported function.
    unsafe {
        call.two_buffers(out, |first, second| {
            let input = call.input(ptr, len)?;
            let values = call.output::<T>(first, ALIGNMENT)?;
            let run_ends = call.output::<RunEnd>(second, ALIGNMENT)?;
            ree::encode(input, values, run_ends)
        });
    }
}

unsafe fn ree_decode<T: NativeType>(
    values: *const T,
    run_ends: *const RunEnd,
    num_runs: u64,
    out: *mut COneBufferResult,
) {
    let call = Call::new(Codec::Ree, CodecFunction::Decode);
    // SAFETY: forwarded from the exported function.
    unsafe {
        call.one_buffer(out, |buf| {
            let values = call.input(values, num_runs)?;
            let run_ends = call.input(run_ends, num_runs)?;
            ree::decode(values, run_ends, call.output::<T>(buf, ALIGNMENT)?)
        });
    }
}

unsafe fn zz_encode<T: ZigZag>(ptr: *const T, len: u64, out: *mut COneBufferResult) {
    let call = Call::new(Codec::ZigZag, CodecFunction::Encode);
    // SAFETY: forwarded from the exported function.
    unsafe {
        call.one_buffer(out, |buf| {
            zigzag::encode(call.input(ptr, len)?, call.output(buf, ALIGNMENT)?)
        });
    }
}

unsafe fn zz_decode<T: ZigZag>(ptr: *const T::Unsigned, len: u64, out: *mut COneBufferResult) {
    let call = Call::new(Codec::ZigZag, CodecFunction::Decode);
    // SAFETY: forwarded from the exported function.
    unsafe {
        call.one_buffer(out, |buf| {
            zigzag::decode::<T>(call.input(ptr, len)?, call.output(buf, ALIGNMENT)?)
        });
    }
}

unsafe fn alp_find_exponents<T: AlpFloat>(ptr: *const T, len: u64, out: *mut CAlpExponentsResult) {
    let call = Call::new(Codec::Alp, CodecFunction::Prelude);
    // SAFETY: forwarded from the exported function.
    let Some(out) = (unsafe { out.as_mut() }) else {
        tracing::debug!("null result pointer");
        return;
    };
    // SAFETY: as above.
    let result = call.run(|| alp::sample_find_exponents(unsafe { call.input(ptr, len)? }));
    out.status = ResultStatus::from(&result);
    if let Ok(exponents) = result {
        out.exponents = exponents;
    }
}

unsafe fn alp_exponents(call: Call, exponents: *const AlpExponents) -> CodecResult<AlpExponents> {
    // SAFETY: forwarded from the exported function.
    unsafe { exponents.as_ref() }.copied().ok_or(call.invalid())
}

unsafe fn alp_encode<T: AlpFloat>(
    ptr: *const T,
    len: u64,
    exponents: *const AlpExponents,
    out: *mut CTwoBufferResult,
) {
    let call = Call::new(Codec::Alp, CodecFunction::Encode);
    // SAFETY: forwarded from the exported function.
    unsafe {
        call.two_buffers(out, |first, second| {
            alp::encode(
                call.input(ptr, len)?,
                alp_exponents(call, exponents)?,
                call.output(first, ALIGNMENT)?,
                call.output(second, ALIGNMENT)?,
            )
        });
    }
}

unsafe fn alp_decode<T: AlpFloat>(
    ptr: *const T::AlpInt,
    len: u64,
    exponents: *const AlpExponents,
    out: *mut COneBufferResult,
) {
    let call = Call::new(Codec::Alp, CodecFunction::Decode);
    // SAFETY: forwarded from the exported function.
    unsafe {
        call.one_buffer(out, |buf| {
            alp::decode::<T>(
                call.input(ptr, len)?,
                alp_exponents(call, exponents)?,
                call.output(buf, ALIGNMENT)?,
            )
        });
    }
}

unsafe fn alp_encode_single<T: AlpFloat>(
    value: T,
    exponents: *const AlpExponents,
    out: *mut T::AlpInt,
) -> ResultStatus {
    let call = Call::new(Codec::Alp, CodecFunction::EncodeSingle);
    call.status(|| {
        // SAFETY: forwarded from the exported function.
        let encoded = alp::encode_single(value, unsafe { alp_exponents(call, exponents)? })?;
        // SAFETY: as above.
        unsafe { call.write(out, encoded) }
    })
}

unsafe fn alp_decode_single<T: AlpFloat>(
    encoded: T::AlpInt,
    exponents: *const AlpExponents,
    out: *mut T,
) -> ResultStatus {
    let call = Call::new(Codec::Alp, CodecFunction::DecodeSingle);
    call.status(|| {
        // SAFETY: forwarded from the exported function.
        let value = alp::decode_single::<T>(encoded, unsafe { alp_exponents(call, exponents)? })?;
        // SAFETY: as above.
        unsafe { call.write(out, value) }
    })
}

fn flbp_encoded_size<T: NativeInt>(len: u64, num_bits: u8) -> u64 {
    usize::try_from(len)
        .ok()
        .and_then(|len| bitpacking::encoded_size_in_bytes::<T::Unsigned>(len, num_bits).ok())
        .map_or(0, |size| size as u64)
}

unsafe fn ffor_encode<T: NativeInt>(
    codec: Codec,
    ptr: *const T,
    len: u64,
    num_bits: u8,
    min_val: T,
    out: *mut CPackedIntsResult,
) {
    let call = Call::new(codec, CodecFunction::Encode);
    // SAFETY: forwarded from the exported function.
    unsafe {
        call.packed(out, |buf| {
            let values = call.input(ptr, len)?;
            let output = call.output::<u8>(buf, BITPACK_ALIGNMENT)?;
            ffor::encode_frame(values, min_val, num_bits, output, codec)
        });
    }
}

unsafe fn ffor_collect_exceptions<T: NativeInt>(
    codec: Codec,
    ptr: *const T,
    len: u64,
    num_bits: u8,
    min_val: T,
    num_exceptions: u64,
    out: *mut CTwoBufferResult,
) {
    let call = Call::new(codec, CodecFunction::CollectExceptions);
    // SAFETY: forwarded from the exported function.
    unsafe {
        call.two_buffers(out, |first, second| {
            ffor::collect_frame_exceptions(
                call.input(ptr, len)?,
                min_val,
                num_bits,
                call.len(num_exceptions)?,
                call.output(first, ALIGNMENT)?,
                call.output(second, ALIGNMENT)?,
                codec,
            )
        });
    }
}

unsafe fn ffor_decode<T: NativeInt>(
    codec: Codec,
    bytes: *const CByteBuffer,
    num_elements: u64,
    num_bits: u8,
    min_val: T,
    out: *mut COneBufferResult,
) {
    let call = Call::new(codec, CodecFunction::Decode);
    // SAFETY: forwarded from the exported function.
    unsafe {
        call.one_buffer(out, |buf| {
            ffor::decode_frame(
                call.packed_input(bytes)?,
                call.len(num_elements)?,
                min_val,
                num_bits,
                call.output(buf, ALIGNMENT)?,
                codec,
            )
        });
    }
}

macro_rules! export_math {
    ($($t:ident),* $(,)?) => {
        paste::paste! {
            $(
                #[doc = concat!("Largest `", stringify!($t), "` of a column, written to `out`. `InvalidInput` for an empty column.")]
                ///
                /// # Safety
                ///
                /// `ptr` must be valid for `len` reads and `out` for one write.
                #[unsafe(no_mangle)]
                pub unsafe extern "C" fn [<lwcodec_math_max_ $t>](ptr: *const $t, len: u64, out: *mut $t) -> ResultStatus {
                    unsafe { math_scan(ptr, len, out, stats::max) }
                }

                #[doc = concat!("Smallest `", stringify!($t), "` of a column, written to `out`. `InvalidInput` for an empty column.")]
                ///
                /// # Safety
                ///
                /// `ptr` must be valid for `len` reads and `out` for one write.
                #[unsafe(no_mangle)]
                pub unsafe extern "C" fn [<lwcodec_math_min_ $t>](ptr: *const $t, len: u64, out: *mut $t) -> ResultStatus {
                    unsafe { math_scan(ptr, len, out, stats::min) }
                }

                #[doc = concat!("Whether a `", stringify!($t), "` column is non-decreasing.")]
                ///
                /// # Safety
                ///
                /// `ptr` must be valid for `len` reads and `out` for one write.
                #[unsafe(no_mangle)]
                pub unsafe extern "C" fn [<lwcodec_math_isSorted_ $t>](ptr: *const $t, len: u64, out: *mut bool) -> ResultStatus {
                    unsafe { math_scan(ptr, len, out, |v: &[$t]| Ok(stats::is_sorted(v))) }
                }

                #[doc = concat!("Whether every element of a `", stringify!($t), "` column is identical.")]
                ///
                /// # Safety
                ///
                /// `ptr` must be valid for `len` reads and `out` for one write.
                #[unsafe(no_mangle)]
                pub unsafe extern "C" fn [<lwcodec_math_isConstant_ $t>](ptr: *const $t, len: u64, out: *mut bool) -> ResultStatus {
                    unsafe { math_scan(ptr, len, out, |v: &[$t]| Ok(stats::is_constant(v))) }
                }

                #[doc = concat!("Run statistics of a `", stringify!($t), "` column.")]
                ///
                /// # Safety
                ///
                /// `ptr` must be valid for `len` reads and `out` for one write.
                #[unsafe(no_mangle)]
                pub unsafe extern "C" fn [<lwcodec_math_runLengthStats_ $t>](ptr: *const $t, len: u64, out: *mut RunLengthStats) -> ResultStatus {
                    unsafe { math_scan(ptr, len, out, |v: &[$t]| Ok(stats::run_length_stats(v))) }
                }
            )*
        }
    };
}

macro_rules! export_ree {
    ($($t:ident),* $(,)?) => {
        paste::paste! {
            $(
                #[doc = concat!("Run-end encodes a `", stringify!($t), "` column into `out.first` (values) and `out.second` (`u32` run ends).")]
                ///
                /// Both outputs must hold `len` elements.
                ///
                /// # Safety
                ///
                /// `ptr` must be valid for `len` reads and `out` must point to a result struct whose
                /// buffers are valid for writes of their stated lengths.
                #[unsafe(no_mangle)]
                pub unsafe extern "C" fn [<lwcodec_ree_encode_ $t _u32>](ptr: *const $t, len: u64, out: *mut CTwoBufferResult) {
                    unsafe { ree_encode(ptr, len, out) }
                }

                #[doc = concat!("Expands `num_runs` runs of `", stringify!($t), "` into `out.buf`.")]
                ///
                /// # Safety
                ///
                /// `values` and `run_ends` must be valid for `num_runs` reads and `out` must point to a
                /// result struct whose buffer is valid for writes of its stated length.
                #[unsafe(no_mangle)]
                pub unsafe extern "C" fn [<lwcodec_ree_decode_ $t _u32>](values: *const $t, run_ends: *const u32, num_runs: u64, out: *mut COneBufferResult) {
                    unsafe { ree_decode(values, run_ends, num_runs, out) }
                }
            )*
        }
    };
}

macro_rules! export_zigzag {
    ($($t:ident => $u:ident),* $(,)?) => {
        paste::paste! {
            $(
                #[doc = concat!("`ZigZag` encodes `", stringify!($t), "` into `", stringify!($u), "`.")]
                ///
                /// # Safety
                ///
                /// `ptr` must be valid for `len` reads and `out` must point to a result struct whose
                /// buffer is valid for writes of its stated length.
                #[unsafe(no_mangle)]
                pub unsafe extern "C" fn [<lwcodec_zz_encode_ $t>](ptr: *const $t, len: u64, out: *mut COneBufferResult) {
                    unsafe { zz_encode(ptr, len, out) }
                }

                #[doc = concat!("`ZigZag` decodes `", stringify!($u), "` into `", stringify!($t), "`.")]
                ///
                /// # Safety
                ///
                /// As for the encoder.
                #[unsafe(no_mangle)]
                pub unsafe extern "C" fn [<lwcodec_zz_decode_ $t>](ptr: *const $u, len: u64, out: *mut COneBufferResult) {
                    unsafe { zz_decode::<$t>(ptr, len, out) }
                }
            )*
        }
    };
}

macro_rules! export_alp {
    ($($t:ident => $int:ident),* $(,)?) => {
        paste::paste! {
            $(
                #[doc = concat!("Chooses ALP exponents for a `", stringify!($t), "` column from an evenly strided sample.")]
                ///
                /// # Safety
                ///
                /// `ptr` must be valid for `len` reads and `out` for one write.
                #[unsafe(no_mangle)]
                pub unsafe extern "C" fn [<lwcodec_alp_sampleFindExponents_ $t>](ptr: *const $t, len: u64, out: *mut CAlpExponentsResult) {
                    unsafe { alp_find_exponents(ptr, len, out) }
                }

                #[doc = concat!("ALP encodes `", stringify!($t), "` into `", stringify!($int), "` (`out.first`) and an exception bitset (`out.second`).")]
                ///
                /// `out.second.num_elements` is the number of exceptions.
                ///
                /// # Safety
                ///
                /// `ptr` must be valid for `len` reads, `exponents` for one read, and `out` must point to
                /// a result struct whose buffers are valid for writes of their stated lengths.
                #[unsafe(no_mangle)]
                pub unsafe extern "C" fn [<lwcodec_alp_encode_ $t>](ptr: *const $t, len: u64, exponents: *const AlpExponents, out: *mut CTwoBufferResult) {
                    unsafe { alp_encode(ptr, len, exponents, out) }
                }

                #[doc = concat!("Scales `", stringify!($int), "` back into `", stringify!($t), "`.")]
                ///
                /// Exceptions are not restored; the caller patches them from the values it kept.
                ///
                /// # Safety
                ///
                /// As for the encoder.
                #[unsafe(no_mangle)]
                pub unsafe extern "C" fn [<lwcodec_alp_decode_ $t>](ptr: *const $int, len: u64, exponents: *const AlpExponents, out: *mut COneBufferResult) {
                    unsafe { alp_decode::<$t>(ptr, len, exponents, out) }
                }

                #[doc = concat!("Encodes one `", stringify!($t), "`; `EncodingFailed` if it does not round-trip.")]
                ///
                /// # Safety
                ///
                /// `exponents` must be valid for one read and `out` for one write.
                #[unsafe(no_mangle)]
                pub unsafe extern "C" fn [<lwcodec_alp_encodeSingle_ $t>](value: $t, exponents: *const AlpExponents, out: *mut $int) -> ResultStatus {
                    unsafe { alp_encode_single(value, exponents, out) }
                }

                #[doc = concat!("Decodes one `", stringify!($t), "`.")]
                ///
                /// # Safety
                ///
                /// `exponents` must be valid for one read and `out` for one write.
                #[unsafe(no_mangle)]
                pub unsafe extern "C" fn [<lwcodec_alp_decodeSingle_ $t>](encoded: $int, exponents: *const AlpExponents, out: *mut $t) -> ResultStatus {
                    unsafe { alp_decode_single(encoded, exponents, out) }
                }
            )*
        }
    };
}

macro_rules! export_encoded_size {
    ($($t:ident),* $(,)?) => {
        paste::paste! {
            $(
                #[doc = concat!("Exact packed size in bytes of `len` `", stringify!($t), "` at `num_bits`, or 0 for an invalid width.")]
                #[unsafe(no_mangle)]
                pub extern "C" fn [<lwcodec_flbp_encodedSizeInBytes_ $t>](len: u64, num_bits: u8) -> u64 {
                    flbp_encoded_size::<$t>(len, num_bits)
                }
            )*
        }
    };
}

macro_rules! export_packed_ints {
    ($($t:ident),* $(,)?) => {
        paste::paste! {
            $(
                #[doc = concat!("Packs `", stringify!($t), "` at `num_bits` into `out.encoded` and counts the exceptions.")]
                ///
                /// # Safety
                ///
                /// `ptr` must be valid for `len` reads and `out` must point to a result struct whose
                /// buffer is valid for writes of its stated length.
                #[unsafe(no_mangle)]
                pub unsafe extern "C" fn [<lwcodec_flpi_encode_ $t>](ptr: *const $t, len: u64, num_bits: u8, out: *mut CPackedIntsResult) {
                    unsafe { ffor_encode(Codec::PackedInts, ptr, len, num_bits, 0, out) }
                }

                #[doc = concat!("Writes the `", stringify!($t), "` exceptions into `out.first` and their bitset into `out.second`.")]
                ///
                /// # Safety
                ///
                /// As for the encoder.
                #[unsafe(no_mangle)]
                pub unsafe extern "C" fn [<lwcodec_flpi_collectExceptions_ $t>](ptr: *const $t, len: u64, num_bits: u8, num_exceptions: u64, out: *mut CTwoBufferResult) {
                    unsafe { ffor_collect_exceptions(Codec::PackedInts, ptr, len, num_bits, 0, num_exceptions, out) }
                }

                #[doc = concat!("Unpacks `num_elems` `", stringify!($t), "` into `out.buf`; exceptions are not patched.")]
                ///
                /// # Safety
                ///
                /// `bytes` must describe a readable region and `out` must point to a result struct whose
                /// buffer is valid for writes of its stated length.
                #[unsafe(no_mangle)]
                pub unsafe extern "C" fn [<lwcodec_flpi_decode_ $t>](bytes: *const CByteBuffer, num_elems: u64, num_bits: u8, out: *mut COneBufferResult) {
                    unsafe { ffor_decode(Codec::PackedInts, bytes, num_elems, num_bits, 0, out) }
                }
            )*
        }
    };
}

macro_rules! export_ffor {
    ($($t:ident),* $(,)?) => {
        paste::paste! {
            $(
                #[doc = concat!("Packs `", stringify!($t), "` as offsets from `min_val` at `num_bits` and counts the exceptions.")]
                ///
                /// # Safety
                ///
                /// `ptr` must be valid for `len` reads and `out` must point to a result struct whose
                /// buffer is valid for writes of its stated length.
                #[unsafe(no_mangle)]
                pub unsafe extern "C" fn [<lwcodec_ffor_encode_ $t>](ptr: *const $t, len: u64, num_bits: u8, min_val: $t, out: *mut CFforResult) {
                    unsafe { ffor_encode(Codec::Ffor, ptr, len, num_bits, min_val, out) }
                }

                #[doc = concat!("Writes the `", stringify!($t), "` exceptions into `out.first` and their bitset into `out.second`.")]
                ///
                /// # Safety
                ///
                /// As for the encoder.
                #[unsafe(no_mangle)]
                pub unsafe extern "C" fn [<lwcodec_ffor_collectExceptions_ $t>](ptr: *const $t, len: u64, num_bits: u8, min_val: $t, num_exceptions: u64, out: *mut CTwoBufferResult) {
                    unsafe { ffor_collect_exceptions(Codec::Ffor, ptr, len, num_bits, min_val, num_exceptions, out) }
                }

                #[doc = concat!("Unpacks `num_elems` `", stringify!($t), "` and adds `min_val` back; exceptions are not patched.")]
                ///
                /// # Safety
                ///
                /// `bytes` must describe a readable region and `out` must point to a result struct whose
                /// buffer is valid for writes of its stated length.
                #[unsafe(no_mangle)]
                pub unsafe extern "C" fn [<lwcodec_ffor_decode_ $t>](bytes: *const CByteBuffer, num_elems: u64, num_bits: u8, min_val: $t, out: *mut COneBufferResult) {
                    unsafe { ffor_decode(Codec::Ffor, bytes, num_elems, num_bits, min_val, out) }
                }
            )*
        }
    };
}

export_math!(u8, u16, u32, u64, i8, i16, i32, i64, f32, f64);
export_ree!(u8, u16, u32, u64, i8, i16, i32, i64, f16, f32, f64);
export_zigzag!(i8 => u8, i16 => u16, i32 => u32, i64 => u64);
export_alp!(f32 => i32, f64 => i64);
export_encoded_size!(u8, u16, u32, u64, i8, i16, i32, i64);
export_packed_ints!(u8, u16, u32, u64);
export_ffor!(u8, u16, u32, u64, i8, i16, i32, i64);
