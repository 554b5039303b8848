//! orview: export OpenReview forum discussions as threaded transcripts
//!
//! The [`domain`] module holds the core — tree building, post classification
//! and transcript rendering — and performs no I/O beyond the sink it is
//! given. [`client`] talks to the OpenReview v2 API, [`dump`] writes the raw
//! note structure file, and [`cli`] wires everything to the terminal.

pub mod cli;
pub mod client;
pub mod config;
pub mod domain;
pub mod dump;
pub mod util;
