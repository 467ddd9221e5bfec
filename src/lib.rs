//! # Simple Border
//!
//! Puts photos on a 4:5 canvas with an even, percentage-based border, ready
//! for portrait-format feeds. One image or a whole batch; the source pixels
//! are never resampled.
//!
//! # Architecture
//!
//! ```text
//! sources ──► queue ──► process (load → compose → PNG) ──► save
//!   intake      queue      imaging + process                save
//! ```
//!
//! - **Single image**: load one source, render, report sizes, save as one file.
//! - **Bulk**: queue many sources (deduplicated), render each in order while
//!   streaming progress events, then write every success into one folder.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`imaging`] | Canvas geometry, border parameters, image loading, compositing |
//! | [`queue`] | Ordered, deduplicated list of sources and their per-entry state |
//! | [`process`] | Bulk pipeline: drives pending entries to `Processed` or `Failed` |
//! | [`save`] | Persistence gateway: single and bulk writes with per-item results |
//! | [`intake`] | Pickers and drop routing (single vs bulk) |
//! | [`naming`] | `bordered_<base>_4x5_<pct>pct_<colour><ext>` output names |
//! | [`config`] | Layered `simple-border.toml` loading and validation |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## No Scaling
//!
//! The base 4:5 rectangle is the smallest one that contains the source. The
//! source is centred at native resolution, so bordering never costs detail.
//! The price is that non-4:5 sources show a wider margin on one axis.
//!
//! ## Failure Isolation
//!
//! A file that will not decode fails only its own queue entry. Bulk runs
//! always finish and report what happened per item, both for processing and
//! for saving.
//!
//! ## Pure Core
//!
//! Geometry, naming and output formatting are pure functions. Everything that
//! touches disk sits behind [`imaging::ImageLoader`], [`intake::Picker`] or
//! [`save::PersistenceGateway`], so the pipeline is tested with mocks.

pub mod config;
pub mod imaging;
pub mod intake;
pub mod naming;
pub mod output;
pub mod process;
pub mod queue;
pub mod save;

#[cfg(test)]
pub(crate) mod test_helpers;
