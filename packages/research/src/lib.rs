//! Strain Research Core
//!
//! Turns loosely formatted LLM research text into structured strain
//! records, and orchestrates a spreadsheet-backed cache with targeted
//! backfill for partially known strains.
//!
//! # Design
//!
//! - One declarative field schema drives the extractor, the merger's
//!   field walk, and the spreadsheet column contract
//! - The merger only fills gaps: cached data is never overwritten by a
//!   lower-confidence backfill response
//! - Every failure degrades: provider down means fallback text, cache
//!   down means a forced miss, unparseable text means raw chat output
//!
//! # Usage
//!
//! ```rust,ignore
//! use research::{MemoryStore, Researcher};
//! use research::testing::MockProvider;
//!
//! let store = MemoryStore::new();
//! let provider = MockProvider::new().with_response(report_text);
//! let researcher = Researcher::new(store, provider);
//!
//! let outcome = researcher.research("blue dream", &[]).await;
//! ```
//!
//! # Modules
//!
//! - [`schema`] - Declarative field descriptors
//! - [`record`] - The canonical strain entity and presence rules
//! - [`extract`] - Field extractor over provider text
//! - [`merge`] - Fill-only record merger
//! - [`traits`] - Provider and store abstractions
//! - [`stores`] - Cache backends (memory, Google Sheets)
//! - [`orchestrator`] - The per-query state machine
//! - [`prompts`] - Prompt templates as configuration
//! - [`render`] - Dashboard cards and report regeneration
//! - [`testing`] - Mock implementations

pub mod error;
pub mod extract;
pub mod merge;
pub mod orchestrator;
pub mod prompts;
pub mod record;
pub mod render;
pub mod schema;
pub mod stores;
pub mod testing;
pub mod traits;

// Re-export core types at crate root
pub use error::{ResearchError, Result};
pub use extract::{extract, extract_fields, scrub};
pub use merge::{merge, MergeOutcome};
pub use orchestrator::{RecordSource, ResearchConfig, ResearchOutcome, Researcher};
pub use record::{is_absent_token, Rating, StrainRecord, ABSENCE_TOKENS};
pub use render::{dashboard, record_to_text, Card, CardField, Dashboard};
pub use schema::{FieldId, FieldKind, FieldSpec, STRAIN_SCHEMA};
pub use traits::{
    provider::{ChatTurn, CompletionProvider, CompletionRequest, GeneratedImage, ImageProvider, Role},
    store::{CacheHit, RowLocator, StrainStore},
};

// Re-export stores
pub use stores::{MemoryStore, SheetsStore};
