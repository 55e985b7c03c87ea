//! Filter configuration and the detach/seek/reattach guard
//!
//! A deflate encoder attached to a stream accumulates internal state (sliding
//! window, partial codewords) that an arbitrary jump in the raw byte position
//! silently invalidates. Every reposition therefore has to be sequenced as
//! detach, raw seek, reattach with the same configuration. That sequencing
//! lives in exactly one place: [`with_filter_detached`].

use crate::error::Result;
use crate::handle::SourceHandle;
use flate2::Compression;

/// Configuration for the on-the-fly deflate filter
///
/// Recorded when the filter is attached and reused verbatim when a fresh
/// encoder is installed after a reposition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterConfig {
    level: u32,
}

impl FilterConfig {
    /// Create a filter configuration with a DEFLATE compression level (0-9)
    pub fn new(level: u32) -> Self {
        assert!(level <= 9, "compression level must be 0-9");
        Self { level }
    }

    /// Compression level this filter encodes with
    pub fn level(&self) -> u32 {
        self.level
    }

    pub(crate) fn to_compression(self) -> Compression {
        Compression::new(self.level)
    }
}

impl Default for FilterConfig {
    /// Default compression level (6), matching the streaming ZIP writer
    fn default() -> Self {
        Self { level: 6 }
    }
}

/// Run `action` (a raw reposition) with any attached filter detached for the
/// duration of the call, then restore the prior attach state.
///
/// If a filter is attached it is detached first, `action` runs against the
/// raw handle, and a fresh filter with the recorded configuration is
/// reattached afterwards - whether or not `action` succeeded. When both the
/// action and the reattach fail, the action's error is reported. With no
/// filter attached, `action` runs directly.
///
/// All repositioning in this crate goes through here; nothing else may seek
/// the raw handle while a filter could be attached.
pub fn with_filter_detached<H, T, F>(handle: &mut H, action: F) -> Result<T>
where
    H: SourceHandle + ?Sized,
    F: FnOnce(&mut H) -> Result<T>,
{
    if handle.attached_filter().is_none() {
        return action(handle);
    }

    let config = handle.detach_filter()?;
    let outcome = action(handle);
    let restored = handle.attach_filter(config);

    match outcome {
        Ok(value) => restored.map(|_| value),
        Err(err) => Err(err),
    }
}
