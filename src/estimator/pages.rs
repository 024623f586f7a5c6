//! Leaf page packing
//!
//! An 8192 byte page keeps 8096 bytes for rows and the slot array. Each row
//! costs its own size plus a 2 byte slot entry.

use super::errors::{EstimationError, EstimationResult};

/// Physical page size
pub const PAGE_SIZE_BYTES: u64 = 8192;

/// Bytes available for rows and slot array
pub const USABLE_PAGE_BYTES: u64 = 8096;

/// Slot array entry per row
pub const SLOT_ENTRY_BYTES: u64 = 2;

const BYTES_PER_MB: u64 = 1024 * 1024;

/// Page geometry for one row size and fill factor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagePacking {
    pub rows_per_page: u64,
    /// Rows left empty per page; `None` without a fill factor
    pub free_rows_per_page: Option<u64>,
}

impl PagePacking {
    /// Packs rows of `index_row_size` bytes, leaving room per `fill_factor`.
    ///
    /// `fill_factor` must already be validated to `[1, 100]`.
    pub fn compute(index_row_size: u64, fill_factor: Option<u32>) -> EstimationResult<Self> {
        let rows_per_page = rows_per_page(index_row_size);
        if rows_per_page == 0 {
            return Err(EstimationError::row_too_large(index_row_size, USABLE_PAGE_BYTES));
        }

        let free_rows_per_page = match fill_factor {
            None => None,
            Some(ff) => {
                let free = free_rows_per_page(index_row_size, ff);
                if free >= rows_per_page {
                    return Err(EstimationError::fill_factor_too_low(ff, rows_per_page, free));
                }
                Some(free)
            }
        };

        Ok(Self {
            rows_per_page,
            free_rows_per_page,
        })
    }

    /// Rows actually written per page at build time
    pub fn usable_rows_per_page(&self) -> u64 {
        self.rows_per_page - self.free_rows_per_page.unwrap_or(0)
    }

    /// Leaf pages needed to hold `row_count` rows
    pub fn pages_required(&self, row_count: u64) -> u64 {
        div_up(row_count, self.usable_rows_per_page())
    }
}

/// Rows of the given size that fit on one page
pub fn rows_per_page(index_row_size: u64) -> u64 {
    USABLE_PAGE_BYTES / (index_row_size + SLOT_ENTRY_BYTES)
}

/// Rows intentionally left empty per page.
///
/// floor(8096 * (100 - ff) / 100 / (size + 2)), folded into one integer
/// division since nested floors of positive integers compose.
pub fn free_rows_per_page(index_row_size: u64, fill_factor: u32) -> u64 {
    let reserved = USABLE_PAGE_BYTES * u64::from(100 - fill_factor.min(100));
    reserved / (100 * (index_row_size + SLOT_ENTRY_BYTES))
}

/// Integer division rounding up
pub fn div_up(n: u64, d: u64) -> u64 {
    n / d + u64::from(n % d != 0)
}

/// Bytes to whole megabytes, rounding half to even
pub fn bytes_to_rounded_mb(bytes: u64) -> u64 {
    let whole = bytes / BYTES_PER_MB;
    let rem = bytes % BYTES_PER_MB;
    let twice = rem * 2;
    if twice > BYTES_PER_MB || (twice == BYTES_PER_MB && whole % 2 == 1) {
        whole + 1
    } else {
        whole
    }
}
