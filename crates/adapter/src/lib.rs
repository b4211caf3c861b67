//! Adapter module - connects the simulation to remote peers and observers
//!
//! The core never parses or formats text. This crate owns everything that
//! does: the line protocol spoken with a remote scoring harness, both ends of
//! that conversation, JSON event records and environment configuration.
//!
//! # Protocol Overview
//!
//! A **line-oriented text protocol**, one message per line:
//!
//! 1. **Handshake**: harness sends `INIT`, agent answers `OK`
//! 2. **State updates**: `U` lines carry the active piece and changed cells,
//!    `L` lines carry the new score and the cleared rows
//! 3. **Decisions**: harness sends `M`, agent answers with action values
//!
//! See [`protocol`] for the exact encoding.
//!
//! # Example Protocol Flow
//!
//! ```text
//! Harness -> Agent: INIT
//! Agent -> Harness: OK
//! Harness -> Agent: U T 4 2 0 T,1,4 T,2,3 T,2,4 T,2,5
//! Harness -> Agent: M
//! Agent -> Harness: 3 5
//! Harness -> Agent: U T 3 20 0 N,1,4 N,2,3 N,2,4 N,2,5 T,19,3 T,20,2 T,20,3 T,20,4
//! ```
//!
//! # Implementation
//!
//! - Uses **tokio** for async I/O; both ends are generic over
//!   `AsyncBufRead`/`AsyncWrite` so stdio, sockets and in-memory pipes all work
//! - Malformed lines end the session with an `anyhow` error
//! - Logging goes to stderr, stdout is reserved for the protocol
//!
//! # Modules
//!
//! - [`protocol`]: line codec and the agent-side [`RemoteState`] mirror
//! - [`runner`]: agent side, answers `M` requests
//! - [`harness`]: harness side, drives a [`Game`](crate::core::Game)
//! - [`observe`]: JSON event records and the event log
//! - [`config`]: environment configuration

pub mod config;
pub mod harness;
pub mod observe;
pub mod protocol;
pub mod runner;

pub use turn_tetris_core as core;
pub use turn_tetris_types as types;

pub use config::SessionConfig;
pub use harness::{drive_game, RemoteAgent};
pub use observe::{EventKind, EventLog, EventRecord};
pub use protocol::{encode_full_state, parse_inbound, Inbound, RemoteState};
pub use runner::run_agent;
