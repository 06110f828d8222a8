//! Idempotent persistence of decoded and resolved legacy data.
//!
//! Two modes are supported:
//!
//! - [`script`]: generate batched upsert statements for the legacy item
//!   catalog that skip existing keys, or apply them batch by batch.
//! - [`rederive`]: delete a derived relation and insert every row again,
//!   one statement at a time, collecting failures instead of aborting.
//!
//! Both converge to the same end state when run repeatedly on the same input.

pub mod catalog;
mod error;
pub mod lines;
pub mod rederive;
pub mod script;
mod session;

pub use catalog::{SeedReport, load_catalog, seed_catalog};
pub use error::{Result, StoreError, is_duplicate_key};
pub use lines::{ReresolveReport, reresolve_stored_lines};
pub use rederive::{DerivedRelation, RederiveReport, StatementFailure, rederive};
pub use script::{
    ApplyReport, DEFAULT_BATCH_SIZE, ScriptOptions, ScriptSummary, apply_upsert_script,
    render_upsert_script, write_upsert_script,
};
pub use session::StoreSession;
