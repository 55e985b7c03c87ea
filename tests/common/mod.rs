//! In-memory pipe-like source handle for exercising error paths the real
//! deflate source cannot produce (non-seekable, non-readable, unknown size).

use s_zip_chunk::{ChunkError, FilterConfig, Result, SourceHandle};
use std::io::SeekFrom;

pub struct PipeSource {
    data: Vec<u8>,
    pos: u64,
    pub readable: bool,
    /// `None` = unlimited seeks; `Some(n)` = n more seeks succeed, then the
    /// handle behaves like a pipe and refuses to reposition.
    pub seeks_allowed: Option<u32>,
    pub size_known: bool,
    filter: Option<FilterConfig>,
    hit_eof: bool,
}

impl PipeSource {
    pub fn new(data: Vec<u8>) -> Self {
        Self {
            data,
            pos: 0,
            readable: true,
            seeks_allowed: None,
            size_known: true,
            filter: None,
            hit_eof: false,
        }
    }

    pub fn raw_pos(&self) -> u64 {
        self.pos
    }
}

impl SourceHandle for PipeSource {
    fn is_readable(&self) -> bool {
        self.readable
    }

    fn is_seekable(&self) -> bool {
        self.seeks_allowed != Some(0)
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        if !self.readable {
            return Err(ChunkError::NotReadable);
        }
        let start = (self.pos as usize).min(self.data.len());
        let count = buf.len().min(self.data.len() - start);
        buf[..count].copy_from_slice(&self.data[start..start + count]);
        self.pos += count as u64;
        if count == 0 && !buf.is_empty() {
            self.hit_eof = true;
        }
        Ok(count)
    }

    fn seek(&mut self, pos: SeekFrom) -> Result<u64> {
        match self.seeks_allowed {
            Some(0) => {
                return Err(ChunkError::Reposition(
                    "pipe does not support seeking".to_string(),
                ))
            }
            Some(ref mut n) => *n -= 1,
            None => {}
        }
        if self.filter.is_some() {
            return Err(ChunkError::FilterState(
                "raw seek attempted while a filter is attached".to_string(),
            ));
        }
        let target = match pos {
            SeekFrom::Start(offset) => offset as i64,
            SeekFrom::Current(delta) => self.pos as i64 + delta,
            SeekFrom::End(delta) => self.data.len() as i64 + delta,
        };
        if target < 0 {
            return Err(ChunkError::Reposition(
                "seek before start of stream".to_string(),
            ));
        }
        self.pos = target as u64;
        self.hit_eof = false;
        Ok(self.pos)
    }

    fn position(&mut self) -> Result<u64> {
        Ok(self.pos)
    }

    fn total_size(&mut self) -> Result<Option<u64>> {
        if self.size_known {
            Ok(Some(self.data.len() as u64))
        } else {
            Ok(None)
        }
    }

    fn is_exhausted(&mut self) -> Result<bool> {
        Ok(self.hit_eof || self.pos >= self.data.len() as u64)
    }

    fn attach_filter(&mut self, config: FilterConfig) -> Result<()> {
        if self.filter.is_some() {
            return Err(ChunkError::FilterState(
                "filter is already attached".to_string(),
            ));
        }
        // Identity filter: good enough to exercise the lifecycle guard.
        self.filter = Some(config);
        Ok(())
    }

    fn detach_filter(&mut self) -> Result<FilterConfig> {
        self.filter
            .take()
            .ok_or_else(|| ChunkError::FilterState("no filter attached to detach".to_string()))
    }

    fn attached_filter(&self) -> Option<&FilterConfig> {
        self.filter.as_ref()
    }
}
