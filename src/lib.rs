//! # s-zip-chunk: Bounded Stream Windows for Streaming ZIP Entry Sources
//!
//! `s-zip-chunk` supplies the data source side of a streamed archive entry:
//! a bounded, seekable window over a larger shared stream. The archive
//! writer pulls one entry's bytes through the window without loading the
//! entry into memory, and without disturbing sibling entries that share the
//! same underlying stream.
//!
//! ## Features
//!
//! - **Bounded windows**: expose `[offset, offset + size)` of a shared
//!   stream as an independent stream starting at position 0
//! - **On-the-fly deflate**: optionally read an entry's bytes through a
//!   deflate filter, compressed as they are pulled
//! - **Safe repositioning**: every seek detaches the filter, repositions the
//!   raw stream, and reattaches a fresh filter with the same configuration -
//!   stale encoder state never corrupts the output
//! - **Non-owning**: a window borrows the handle; the stream stays open and
//!   usable for the next entry
//!
//! ## Quick Start
//!
//! ### Windowing a shared stream
//!
//! ```
//! use s_zip_chunk::{DeflateSource, SourceWindow};
//! use std::io::Cursor;
//!
//! let text = b"The quick brown fox jumped over the lazy dog.".to_vec();
//! let mut source = DeflateSource::new(Cursor::new(text))?;
//!
//! // Window over 8 bytes starting at offset 36
//! let mut window = SourceWindow::new(&mut source, 36, Some(8))?;
//! assert_eq!(window.size()?, Some(8));
//! assert_eq!(window.read_remaining()?, b"lazy dog");
//! assert!(window.is_at_end()?);
//!
//! // The handle is still usable for the next window
//! let mut rest = SourceWindow::new(&mut source, 0, Some(3))?;
//! assert_eq!(rest.read_remaining()?, b"The");
//! # Ok::<(), s_zip_chunk::ChunkError>(())
//! ```
//!
//! ### Compressing an entry as it is read
//!
//! ```
//! use s_zip_chunk::{DeflateSource, FilterConfig, SourceWindow};
//! use flate2::read::DeflateDecoder;
//! use std::io::{Cursor, Read};
//!
//! let data = vec![7u8; 4096];
//! let mut source =
//!     DeflateSource::with_filter(Cursor::new(data.clone()), FilterConfig::default())?;
//!
//! let mut window = SourceWindow::new(&mut source, 0, None)?;
//! let compressed = window.read_remaining()?;
//!
//! // Rewinding reattaches a fresh filter; a second pass compresses the
//! // same bytes from scratch.
//! window.rewind()?;
//! assert_eq!(window.read_remaining()?, compressed);
//!
//! let mut inflated = Vec::new();
//! DeflateDecoder::new(&compressed[..]).read_to_end(&mut inflated)?;
//! assert_eq!(inflated, data);
//! # Ok::<(), s_zip_chunk::ChunkError>(())
//! ```

pub mod error;
pub mod filter;
pub mod handle;
pub mod window;

pub use error::{ChunkError, Result};
pub use filter::{with_filter_detached, FilterConfig};
pub use handle::{DeflateSource, SourceHandle};
pub use window::SourceWindow;
