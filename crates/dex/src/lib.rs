//! # Companion Dex
//!
//! The catalog/progress reconciliation engine behind the Pokédex
//! completion view.
//!
//! ```text
//! CatalogStore ──┐
//!                ├──> merge ──> Ready { all, displayed, generation }
//! ProgressRecord ┘                        │
//!                                         └──> watch channel (snapshots)
//! ```
//!
//! [`DexView`] owns the state machine (`Idle → Loading → Ready | Error`);
//! [`merge`] is the pure reconciliation step it runs on every catalog load
//! and successful import.

mod reconcile;
mod view;

pub use reconcile::{merge, MergedEntry};
pub use view::{DexView, DexViewState, ReadyView};
