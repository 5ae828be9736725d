//! Pre-built [`tracing::Span`] constructors for block execution.
//!
//! Using consistent span names and field sets makes it easy to filter,
//! search and correlate a block's logs, from its transactions through the
//! end-of-block harvest.

use tracing::{info_span, Span};

/// Span covering the execution of a whole block.
pub fn block_execute_span(height: u64) -> Span {
    info_span!("block_execute", height = %height)
}

/// Span covering a single transaction within a block.
pub fn tx_span(height: u64, index: usize) -> Span {
    info_span!("tx", height = %height, index = %index)
}

/// Span covering end-of-block processing.
pub fn end_block_span(height: u64) -> Span {
    info_span!("end_block", height = %height)
}

/// Span covering the auto-restake scan over a block's event log.
pub fn harvest_span(height: u64, event_count: usize) -> Span {
    info_span!("harvest", height = %height, events = %event_count)
}
