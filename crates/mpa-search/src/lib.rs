//! Search orchestration, result merging and HTML rendering for the Manual
//! Purchase Agent client, plus the profile, purchase and export services that
//! act on a finished search.

pub mod error;
pub mod export;
pub mod generic;
pub mod merge;
pub mod orchestrator;
pub mod profile;
pub mod progress;
pub mod purchase;
pub mod render;
pub mod view;

pub use error::SearchError;
pub use export::suppliers_csv;
pub use generic::GenericService;
pub use orchestrator::{SearchOrchestrator, SearchSnapshot};
pub use profile::ProfileStore;
pub use progress::{ProgressTracker, Stage, StageStatus};
pub use purchase::{PurchaseOutcome, PurchaseService};
pub use render::icons::{IconResolver, SupplierIcon};
pub use view::{MemoryView, Region, SearchView};
