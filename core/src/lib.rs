//! # Glizzy Core
//!
//! The sweep engine. Resolves which handles to target, generates payloads,
//! drives writes and reads through a [`transport::Transport`], classifies each
//! outcome and folds the results into a per-handle summary.
//!
//! The engine never talks to the Bluetooth stack or the terminal directly:
//! both sit behind the [`transport::Transport`] and [`reporter::Reporter`] traits.

pub mod cancel;
pub mod executor;
pub mod payload;
pub mod reporter;
pub mod resolver;
pub mod results;
pub mod sweep;
pub mod transport;
