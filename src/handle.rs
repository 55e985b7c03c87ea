//! Source handle abstraction over a shared seekable stream
//!
//! A window never owns the stream it reads from - it borrows a handle that the
//! archive writer keeps alive for the whole archive. The handle exposes the
//! capability set the window needs (read, seek, tell, size, eof) plus the
//! attach/detach points for an on-the-fly deflate filter, so any concrete
//! stream implementation can sit underneath.

use crate::error::{ChunkError, Result};
use crate::filter::FilterConfig;
use flate2::read::DeflateEncoder;
use std::io::{Read, Seek, SeekFrom};

/// Capability set of a shared, seekable byte source
///
/// `read` pulls bytes through the attached filter when one is installed;
/// `seek`, `position` and `total_size` always talk about the raw stream
/// underneath. Implementations must refuse a raw `seek` while a filter is
/// attached - repositioning has to go through
/// [`with_filter_detached`](crate::filter::with_filter_detached).
pub trait SourceHandle {
    /// Whether the handle is open for reading
    fn is_readable(&self) -> bool;

    /// Whether the handle supports repositioning
    fn is_seekable(&self) -> bool;

    /// Read into `buf`, through the filter when one is attached.
    /// `Ok(0)` on a non-empty `buf` marks exhaustion.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize>;

    /// Raw reposition. Fails with [`ChunkError::Reposition`] when the handle
    /// is not seekable or the underlying seek fails, and with
    /// [`ChunkError::FilterState`] when a filter is still attached.
    /// A successful seek clears the exhaustion state.
    fn seek(&mut self, pos: SeekFrom) -> Result<u64>;

    /// Raw position of the underlying stream
    fn position(&mut self) -> Result<u64>;

    /// Total size of the underlying stream, `None` when unknowable
    fn total_size(&mut self) -> Result<Option<u64>>;

    /// Whether the handle has reported end-of-data
    fn is_exhausted(&mut self) -> Result<bool>;

    /// Install a deflate filter; fails with [`ChunkError::FilterState`] if
    /// one is already attached
    fn attach_filter(&mut self, config: FilterConfig) -> Result<()>;

    /// Remove the filter and discard its internal encoder state, returning
    /// the configuration it was attached with. Bytes already produced are
    /// unaffected. Fails with [`ChunkError::FilterState`] if none is attached.
    fn detach_filter(&mut self) -> Result<FilterConfig>;

    /// Configuration of the currently attached filter, if any
    fn attached_filter(&self) -> Option<&FilterConfig>;
}

/// The reader is either raw or wrapped in a deflate encoder.
/// `Detached` only exists inside a stage transition and never escapes.
enum Stage<R: Read> {
    Raw(R),
    Filtered(DeflateEncoder<R>),
    Detached,
}

/// Seekable byte source that can carry an on-the-fly deflate filter
///
/// Wraps any `Read + Seek` (a `File`, a `Cursor`, a network-backed reader)
/// and implements [`SourceHandle`] for it. With a filter attached, reads
/// yield the deflate-compressed form of the underlying bytes; detaching
/// hands the raw reader back at whatever position the encoder left it.
///
/// The total size is captured once at construction with a
/// position-preserving seek to the end.
pub struct DeflateSource<R: Read + Seek> {
    stage: Stage<R>,
    config: Option<FilterConfig>,
    total_size: u64,
    hit_eof: bool,
}

impl<R: Read + Seek> DeflateSource<R> {
    /// Wrap a reader as a source handle with no filter attached
    pub fn new(mut reader: R) -> Result<Self> {
        let current = reader
            .stream_position()
            .map_err(|e| ChunkError::Position(e.to_string()))?;
        let total_size = reader
            .seek(SeekFrom::End(0))
            .map_err(|e| ChunkError::Reposition(e.to_string()))?;
        reader
            .seek(SeekFrom::Start(current))
            .map_err(|e| ChunkError::Reposition(e.to_string()))?;

        Ok(Self {
            stage: Stage::Raw(reader),
            config: None,
            total_size,
            hit_eof: false,
        })
    }

    /// Wrap a reader and immediately attach a deflate filter
    pub fn with_filter(reader: R, config: FilterConfig) -> Result<Self> {
        let mut source = Self::new(reader)?;
        source.attach_filter(config)?;
        Ok(source)
    }

    /// Consume the source and return the underlying reader
    ///
    /// Any attached filter is discarded without flushing; the reader comes
    /// back at its current raw position.
    pub fn into_inner(self) -> R {
        match self.stage {
            Stage::Raw(reader) => reader,
            Stage::Filtered(encoder) => encoder.into_inner(),
            Stage::Detached => unreachable!("stage never left detached"),
        }
    }
}

impl<R: Read + Seek> SourceHandle for DeflateSource<R> {
    fn is_readable(&self) -> bool {
        true
    }

    fn is_seekable(&self) -> bool {
        true
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        let count = match &mut self.stage {
            Stage::Raw(reader) => reader.read(buf)?,
            Stage::Filtered(encoder) => encoder.read(buf)?,
            Stage::Detached => unreachable!("stage never left detached"),
        };
        if count == 0 && !buf.is_empty() {
            self.hit_eof = true;
        }
        Ok(count)
    }

    fn seek(&mut self, pos: SeekFrom) -> Result<u64> {
        match &mut self.stage {
            Stage::Raw(reader) => {
                let new_pos = reader
                    .seek(pos)
                    .map_err(|e| ChunkError::Reposition(e.to_string()))?;
                self.hit_eof = false;
                Ok(new_pos)
            }
            Stage::Filtered(_) => Err(ChunkError::FilterState(
                "raw seek attempted while a filter is attached".to_string(),
            )),
            Stage::Detached => unreachable!("stage never left detached"),
        }
    }

    fn position(&mut self) -> Result<u64> {
        let reader = match &mut self.stage {
            Stage::Raw(reader) => reader,
            Stage::Filtered(encoder) => encoder.get_mut(),
            Stage::Detached => unreachable!("stage never left detached"),
        };
        reader
            .stream_position()
            .map_err(|e| ChunkError::Position(e.to_string()))
    }

    fn total_size(&mut self) -> Result<Option<u64>> {
        Ok(Some(self.total_size))
    }

    fn is_exhausted(&mut self) -> Result<bool> {
        if self.hit_eof {
            return Ok(true);
        }
        // While filtered, the encoder may still hold buffered output after
        // the raw reader reaches its end; only a zero-length read decides.
        if self.config.is_some() {
            return Ok(false);
        }
        Ok(self.position()? >= self.total_size)
    }

    fn attach_filter(&mut self, config: FilterConfig) -> Result<()> {
        if matches!(self.stage, Stage::Filtered(_)) {
            return Err(ChunkError::FilterState(
                "filter is already attached".to_string(),
            ));
        }
        let stage = std::mem::replace(&mut self.stage, Stage::Detached);
        let reader = match stage {
            Stage::Raw(reader) => reader,
            _ => unreachable!("stage never left detached"),
        };
        self.stage = Stage::Filtered(DeflateEncoder::new(reader, config.to_compression()));
        self.config = Some(config);
        Ok(())
    }

    fn detach_filter(&mut self) -> Result<FilterConfig> {
        if matches!(self.stage, Stage::Raw(_)) {
            return Err(ChunkError::FilterState(
                "no filter attached to detach".to_string(),
            ));
        }
        let stage = std::mem::replace(&mut self.stage, Stage::Detached);
        let encoder = match stage {
            Stage::Filtered(encoder) => encoder,
            _ => unreachable!("stage never left detached"),
        };
        self.stage = Stage::Raw(encoder.into_inner());
        self.config.take().ok_or_else(|| {
            ChunkError::FilterState("attached filter has no recorded configuration".to_string())
        })
    }

    fn attached_filter(&self) -> Option<&FilterConfig> {
        self.config.as_ref()
    }
}
