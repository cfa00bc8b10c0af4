#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

/// Safe Rust API: every codec operates on caller-provided slices and never allocates.
pub mod codecs;

#[cfg(feature = "capi")]
#[cfg_attr(docsrs, doc(cfg(feature = "capi")))]
/// Flat `extern "C"` entry points over [`codecs`], one per operation and element type.
pub mod ffi;
