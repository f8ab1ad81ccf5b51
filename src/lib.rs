//! PassForge Core - Event Credential Generator
//!
//! # Guarantees
//! 1. Eligibility Is a Rule Table
//! 2. Exhibitor Status Overrides Session Flags
//! 3. Names Depend on Identity, Never on Time
//! 4. Failures Are Per Artifact
//! 5. Validation Runs Before Any Rendering

pub mod registrant;
pub mod session;
pub mod eligibility;
pub mod assets;
pub mod payload;
pub mod layout;
pub mod compositor;
pub mod validation;
pub mod hashing;
pub mod output;
pub mod config;
pub mod generator;
pub mod status;
pub mod batch;

pub use registrant::{Category, Entitlements, Registrant, RegistrantId};
pub use session::{SessionDetails, SessionKind};
pub use eligibility::{resolve, ArtifactKind, ArtifactSpec, InvitationKind, Resolution, ScheduleKind};
pub use assets::{AssetLayout, AssetLibrary};
pub use compositor::{ArtifactError, Compositor};
pub use config::{ConfigError, GeneratorConfig};
pub use generator::{GeneratedArtifact, GenerationError, GenerationReport, PassGenerator};
pub use status::PassStatus;
pub use batch::{BatchOutcome, BatchRunner, BatchSummary};

pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");
