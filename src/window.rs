//! Bounded stream window over a shared source handle
//!
//! A [`SourceWindow`] presents the sub-range `[base_offset, base_offset + limit)`
//! of a larger stream as an independent stream starting at position 0. The
//! archive writer pulls one entry's bytes through it without the entry ever
//! being loaded into memory, and sibling windows over the same handle are
//! undisturbed because every position the window exposes is relative.

use crate::error::{ChunkError, Result};
use crate::filter::with_filter_detached;
use crate::handle::SourceHandle;
use std::io::{self, Read, SeekFrom};

const READ_BUF_SIZE: usize = 8 * 1024;

/// Bounded, seekable view over a borrowed source handle
///
/// The window borrows the handle for its lifetime - it never closes it, and
/// the exclusive borrow keeps a second window off the same handle until this
/// one is dropped. Construction leaves the handle positioned at
/// `base_offset`, so the first read starts exactly at the window start.
///
/// Repositioning while a deflate filter is attached to the handle is
/// sequenced through the filter guard: detach, raw seek, reattach with the
/// same configuration. A window that has read up to its boundary reports
/// end-of-data, but a later [`seek`](Self::seek) or
/// [`rewind`](Self::rewind) makes it readable again.
pub struct SourceWindow<'a, H: SourceHandle + ?Sized> {
    handle: &'a mut H,
    base_offset: u64,
    limit: Option<u64>,
}

impl<H: SourceHandle + ?Sized> std::fmt::Debug for SourceWindow<'_, H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceWindow")
            .field("base_offset", &self.base_offset)
            .field("limit", &self.limit)
            .finish_non_exhaustive()
    }
}

impl<'a, H: SourceHandle + ?Sized> SourceWindow<'a, H> {
    /// Create a window over `[base_offset, base_offset + limit)` of the
    /// handle's stream, or `[base_offset, end)` when `limit` is `None`.
    ///
    /// Rewinds immediately; fails with [`ChunkError::Reposition`] when the
    /// handle is not seekable.
    pub fn new(handle: &'a mut H, base_offset: u64, limit: Option<u64>) -> Result<Self> {
        let mut window = Self {
            handle,
            base_offset,
            limit,
        };
        window.rewind()?;
        Ok(window)
    }

    /// Offset of the window start in the handle's raw coordinate space
    pub fn base_offset(&self) -> u64 {
        self.base_offset
    }

    /// Maximum number of bytes readable through this window, if bounded
    pub fn limit(&self) -> Option<u64> {
        self.limit
    }

    /// Reposition to logical offset 0 (raw `base_offset`)
    pub fn rewind(&mut self) -> Result<()> {
        let base = self.base_offset;
        with_filter_detached(&mut *self.handle, |h| h.seek(SeekFrom::Start(base)))?;
        Ok(())
    }

    /// Reposition within the window
    ///
    /// `Start(n)` targets raw `base_offset + n`. `Current(d)` and `End(d)`
    /// pass through to the handle's own current position and end; the window
    /// tracks no independent end position for seeking.
    pub fn seek(&mut self, pos: SeekFrom) -> Result<()> {
        let base = self.base_offset;
        with_filter_detached(&mut *self.handle, |h| {
            let target = match pos {
                SeekFrom::Start(offset) => {
                    SeekFrom::Start(base.checked_add(offset).ok_or_else(|| {
                        ChunkError::Reposition("seek target overflows".to_string())
                    })?)
                }
                relative => relative,
            };
            h.seek(target)
        })?;
        Ok(())
    }

    /// Current logical position: raw position minus `base_offset`, clamped
    /// at 0 when an end-relative seek landed before the window start
    pub fn position(&mut self) -> Result<u64> {
        Ok(self.handle.position()?.saturating_sub(self.base_offset))
    }

    /// Number of bytes available through the window, `None` when the
    /// handle's total size is unknown
    ///
    /// A `base_offset` beyond the physical end yields 0, not an error.
    pub fn size(&mut self) -> Result<Option<u64>> {
        let total = match self.handle.total_size()? {
            Some(total) => total,
            None => return Ok(None),
        };
        let available = total.saturating_sub(self.base_offset);
        Ok(Some(match self.limit {
            Some(limit) => available.min(limit),
            None => available,
        }))
    }

    /// Whether the window has no further bytes to produce
    ///
    /// True once the handle reports exhaustion, or once the logical position
    /// has reached `limit` - the window can end before the physical stream
    /// does, which is what truncates a multi-entry concatenated source.
    pub fn is_at_end(&mut self) -> Result<bool> {
        if self.handle.is_exhausted()? {
            return Ok(true);
        }
        match self.limit {
            Some(limit) => Ok(self.position()? >= limit),
            None => Ok(false),
        }
    }

    /// Read all remaining bytes up to the window boundary
    ///
    /// Fails with [`ChunkError::NotReadable`] when the handle is not open
    /// for reading. Never reads past `limit`, even though the handle may
    /// hold further bytes belonging to a different window.
    pub fn read_remaining(&mut self) -> Result<Vec<u8>> {
        if !self.handle.is_readable() {
            return Err(ChunkError::NotReadable);
        }

        let mut remaining = match self.limit {
            Some(limit) => Some(limit.saturating_sub(self.position()?)),
            None => None,
        };

        let mut out = Vec::new();
        let mut buf = [0u8; READ_BUF_SIZE];
        loop {
            let want = match remaining {
                Some(0) => break,
                Some(n) => n.min(READ_BUF_SIZE as u64) as usize,
                None => READ_BUF_SIZE,
            };
            let count = self.handle.read(&mut buf[..want])?;
            if count == 0 {
                break;
            }
            out.extend_from_slice(&buf[..count]);
            if let Some(n) = remaining.as_mut() {
                *n -= count as u64;
            }
        }
        Ok(out)
    }
}

/// Produce-next-block contract for the archive writer: sequential reads
/// bounded by the window, `Ok(0)` at the boundary.
impl<H: SourceHandle + ?Sized> Read for SourceWindow<'_, H> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if !self.handle.is_readable() {
            return Err(to_io_error(ChunkError::NotReadable));
        }
        let want = match self.limit {
            Some(limit) => {
                let pos = self.position().map_err(to_io_error)?;
                let remaining = limit.saturating_sub(pos);
                if remaining == 0 {
                    return Ok(0);
                }
                buf.len().min(remaining.min(usize::MAX as u64) as usize)
            }
            None => buf.len(),
        };
        self.handle.read(&mut buf[..want]).map_err(to_io_error)
    }
}

fn to_io_error(err: ChunkError) -> io::Error {
    match err {
        ChunkError::Io(e) => e,
        other => io::Error::new(io::ErrorKind::Other, other),
    }
}
