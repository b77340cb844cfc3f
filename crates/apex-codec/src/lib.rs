//! Manifest codec for `package.xml` descriptors.
//!
//! Decoding walks the XML event stream into a typed intermediate
//! representation ([`PackageDocument`]) instead of reshaping a generic tree.
//! Encoding renders already-sorted `(type, members)` entries with a fixed
//! layout, so identical input always produces byte-identical output.
//!
//! # Modules
//!
//! - [`document`] -- The typed IR and the one-or-many field coercion
//! - [`decode`] -- Event-driven decoder
//! - [`encode`] -- [`DescriptorCodec`] and [`EncodeOptions`]
//! - [`error`] -- [`CodecError`]

pub mod decode;
pub mod document;
pub mod encode;
pub mod error;

pub use decode::decode;
pub use document::{OneOrMany, PackageDocument, TypeBlock};
pub use encode::{DescriptorCodec, EncodeOptions, DEFAULT_API_VERSION, METADATA_NAMESPACE};
pub use error::{CodecError, CodecResult};
