//! HTTP Range header planning.
//!
//! Turns an optional `Range` header and a known resource size into a concrete
//! serving window. Pure computation, no I/O.
//!
//! Supported forms:
//! - `bytes=START-END` (END clamped to the resource size)
//! - `bytes=START-` (open-ended)
//! - `bytes=-SUFFIX` (last SUFFIX bytes)
//!
//! Anything else - missing `bytes=` prefix, non-numeric fields, multi-range
//! lists, `start > end`, `start >= size` - is rejected as unsatisfiable
//! rather than silently served as the whole file.

use crate::error::{Error, Result};

/// Concrete serving window for a resource of known size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangePlan {
    /// Serve the entire resource with status 200.
    Whole,
    /// Serve `start..=end` with status 206.
    Partial { start: u64, end: u64 },
}

impl RangePlan {
    /// Number of bytes this plan will serve for a resource of `size` bytes.
    pub fn length(&self, size: u64) -> u64 {
        match self {
            RangePlan::Whole => size,
            RangePlan::Partial { start, end } => end - start + 1,
        }
    }
}

/// Compute the serving window for a request.
///
/// `None` (no Range header) always yields [`RangePlan::Whole`]. A present but
/// invalid header yields [`Error::RangeNotSatisfiable`], which maps to a 416
/// response carrying `Content-Range: bytes */{size}`.
pub fn plan(header: Option<&str>, size: u64) -> Result<RangePlan> {
    let Some(value) = header else {
        return Ok(RangePlan::Whole);
    };

    let unsatisfiable = || Error::RangeNotSatisfiable { size };

    let range_spec = value.strip_prefix("bytes=").ok_or_else(unsatisfiable)?;
    if range_spec.contains(',') {
        // Multi-range requests are not supported.
        return Err(unsatisfiable());
    }

    let (start_str, end_str) = range_spec.split_once('-').ok_or_else(unsatisfiable)?;
    let start_str = start_str.trim();
    let end_str = end_str.trim();

    match (start_str.is_empty(), end_str.is_empty()) {
        // bytes=-SUFFIX (last SUFFIX bytes)
        (true, false) => {
            let suffix: u64 = end_str.parse().map_err(|_| unsatisfiable())?;
            if suffix == 0 || size == 0 {
                return Err(unsatisfiable());
            }
            Ok(RangePlan::Partial {
                start: size.saturating_sub(suffix),
                end: size - 1,
            })
        }
        // bytes=START-
        (false, true) => {
            let start: u64 = start_str.parse().map_err(|_| unsatisfiable())?;
            if start >= size {
                return Err(unsatisfiable());
            }
            Ok(RangePlan::Partial {
                start,
                end: size - 1,
            })
        }
        // bytes=START-END
        (false, false) => {
            let start: u64 = start_str.parse().map_err(|_| unsatisfiable())?;
            let end: u64 = end_str.parse().map_err(|_| unsatisfiable())?;
            if start > end || start >= size {
                return Err(unsatisfiable());
            }
            Ok(RangePlan::Partial {
                start,
                end: end.min(size - 1),
            })
        }
        // bytes=-
        (true, true) => Err(unsatisfiable()),
    }
}
