use std::alloc::{self, Layout};
use std::ptr::NonNull;

use crate::codecs::{Codec, CodecError, CodecFunction, CodecResult, NativeType};

/// Alignment every buffer crossing the C boundary must satisfy.
pub const ALIGNMENT: usize = 128;

/// Minimum alignment of packed byte buffers handled by the bit-packing kernels.
pub const BITPACK_ALIGNMENT: usize = 64;

/// Describes what a codec wrote into a caller-provided buffer.
///
/// Only meaningful when the call that produced it succeeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WrittenBuffer {
    /// Number of bytes written to the start of the output buffer
    pub bytes_written: usize,
    /// Bit width of each element as stored
    pub bit_size_per_element: u8,
    /// Number of logical elements the written bytes represent
    pub num_elements: usize,
    /// Number of input bytes consumed to produce the output
    pub input_bytes_used: usize,
}

impl WrittenBuffer {
    /// Descriptor for `num_elements` plain values of `T`.
    pub(crate) fn of_elements<T: NativeType>(num_elements: usize, input_bytes_used: usize) -> Self {
        Self {
            bytes_written: num_elements * size_of::<T>(),
            bit_size_per_element: (size_of::<T>() * 8) as u8,
            num_elements,
            input_bytes_used,
        }
    }
}

/// Returns `true` if `ptr` is aligned to `align` bytes.
#[inline]
pub fn is_aligned<T>(ptr: *const T, align: usize) -> bool {
    (ptr as usize) % align == 0
}

pub(crate) fn check_aligned<T>(
    ptr: *const T,
    align: usize,
    codec: Codec,
    function: CodecFunction,
) -> CodecResult<()> {
    if ptr.is_null() {
        Err(CodecError::InvalidInput(codec, function))
    } else if is_aligned(ptr, align) {
        Ok(())
    } else {
        Err(CodecError::IncorrectAlignment(codec, function))
    }
}

/// An owned, zero-initialized byte allocation aligned to [`ALIGNMENT`].
///
/// Buffers handed to the `extern "C"` entry points must be aligned; this is the easiest way for
/// a Rust caller to get one.
///
/// ```
/// # use lwcodec::codecs::{AlignedBuffer, ALIGNMENT, is_aligned};
/// let mut buf = AlignedBuffer::from_slice(&[1u32, 2, 3]).unwrap();
/// assert!(is_aligned(buf.as_ptr(), ALIGNMENT));
/// buf.typed_mut::<u32>()[0] = 7;
/// assert_eq!(buf.typed::<u32>(), &[7, 2, 3]);
/// ```
pub struct AlignedBuffer {
    ptr: NonNull<u8>,
    len: usize,
    layout: Layout,
}

// SAFETY: the buffer uniquely owns its allocation.
unsafe impl Send for AlignedBuffer {}
unsafe impl Sync for AlignedBuffer {}

impl AlignedBuffer {
    /// Allocates `len` zeroed bytes.
    pub fn zeroed(len: usize) -> CodecResult<Self> {
        let oom = CodecError::OutOfMemory(Codec::Buffer, CodecFunction::Prelude);
        // a zero-sized request still gets a real allocation so the pointer is never dangling
        let layout = Layout::from_size_align(len.max(1), ALIGNMENT).map_err(|_| oom)?;
        // SAFETY: the layout has a non-zero size.
        let raw = unsafe { alloc::alloc_zeroed(layout) };
        let ptr = NonNull::new(raw).ok_or(oom)?;
        Ok(Self { ptr, len, layout })
    }

    /// Allocates a buffer holding a copy of `values`.
    pub fn from_slice<T: NativeType>(values: &[T]) -> CodecResult<Self> {
        let mut buf = Self::zeroed(size_of_val(values))?;
        buf.as_mut_slice().copy_from_slice(bytemuck::cast_slice(values));
        Ok(buf)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn as_ptr(&self) -> *const u8 {
        self.ptr.as_ptr()
    }

    pub fn as_mut_ptr(&mut self) -> *mut u8 {
        self.ptr.as_ptr()
    }

    pub fn as_slice(&self) -> &[u8] {
        // SAFETY: `ptr` is valid for `len` initialized bytes for the lifetime of `self`.
        unsafe { std::slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }

    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        // SAFETY: as above, and `&mut self` guarantees exclusive access.
        unsafe { std::slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
    }

    /// Views the buffer as whole elements of `T`; trailing bytes are ignored.
    pub fn typed<T: NativeType>(&self) -> &[T] {
        let whole = self.len / size_of::<T>() * size_of::<T>();
        // the allocation is aligned to ALIGNMENT, a multiple of every native alignment
        bytemuck::cast_slice(&self.as_slice()[..whole])
    }

    /// Mutable variant of [`typed`](Self::typed).
    pub fn typed_mut<T: NativeType>(&mut self) -> &mut [T] {
        let whole = self.len / size_of::<T>() * size_of::<T>();
        bytemuck::cast_slice_mut(&mut self.as_mut_slice()[..whole])
    }
}

impl Drop for AlignedBuffer {
    fn drop(&mut self) {
        // SAFETY: allocated in `zeroed` with exactly this layout.
        unsafe { alloc::dealloc(self.ptr.as_ptr(), self.layout) }
    }
}

impl std::fmt::Debug for AlignedBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlignedBuffer")
            .field("len", &self.len)
            .finish_non_exhaustive()
    }
}
