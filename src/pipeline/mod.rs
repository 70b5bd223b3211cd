//! Per-image orchestration of the decode → analyze → composite passes,
//! including file I/O. Each image is an independent unit of work; batch
//! entry points fan out across a rayon worker pool with no shared state.

pub mod analyze;
pub mod edit;
pub mod export;
pub mod io;
