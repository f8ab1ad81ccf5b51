//! Pass Generator - Single Entry Point per Registrant
//!
//! CRITICAL: generate_for_registrant MUST validate before rendering. A
//! rejected registrant leaves nothing on disk.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::assets::AssetLibrary;
use crate::compositor::{ArtifactError, Compositor};
use crate::config::GeneratorConfig;
use crate::eligibility::{resolve_with_layout, ArtifactKind, ArtifactSpec, Resolution};
use crate::hashing::{compute_digest, hash_id_number, sign};
use crate::output::{OutputError, OutputStore};
use crate::payload;
use crate::registrant::{Registrant, RegistrantId};
use crate::session::SessionKind;
use crate::validation::{ValidationResult, ValidationViolation, Validator};

#[cfg(feature = "test-hooks")]
use std::sync::atomic::{AtomicU32, Ordering};

#[cfg(feature = "test-hooks")]
static VALIDATION_CALL_COUNT: AtomicU32 = AtomicU32::new(0);

#[cfg(feature = "test-hooks")]
pub fn get_validation_call_count() -> u32 {
    VALIDATION_CALL_COUNT.load(Ordering::SeqCst)
}

#[cfg(feature = "test-hooks")]
pub fn reset_validation_call_count() {
    VALIDATION_CALL_COUNT.store(0, Ordering::SeqCst);
}

/// Failure of a whole registrant or of generator setup.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("Registrant {id} rejected: {}", .reasons.join("; "))]
    InvalidRegistrant { id: RegistrantId, reasons: Vec<String> },

    #[error("Output directory unavailable: {0}")]
    Output(#[from] OutputError),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GeneratedArtifact {
    pub kind: ArtifactKind,
    pub output_path: PathBuf,
    pub is_scannable_pass: bool,
}

/// A pass whose template was not found.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SkippedArtifact {
    pub kind: SessionKind,
    pub template_path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FailedArtifact {
    pub kind: SessionKind,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationReport {
    pub registrant_id: RegistrantId,
    pub artifacts: Vec<GeneratedArtifact>,
    pub skipped: Vec<SkippedArtifact>,
    pub failed: Vec<FailedArtifact>,
    pub warnings: Vec<ValidationViolation>,
    pub digest: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
    pub generated_at: DateTime<Utc>,
}

/// The deterministic part of a report; wall-clock time stays out.
#[derive(Serialize)]
struct DigestInput<'a> {
    registrant_id: RegistrantId,
    artifacts: &'a [GeneratedArtifact],
    skipped: Vec<SessionKind>,
    failed: Vec<SessionKind>,
}

impl GenerationReport {
    pub fn passes(&self) -> impl Iterator<Item = &GeneratedArtifact> {
        self.artifacts.iter().filter(|a| a.is_scannable_pass)
    }

    pub fn attachments(&self) -> impl Iterator<Item = &GeneratedArtifact> {
        self.artifacts.iter().filter(|a| !a.is_scannable_pass)
    }

    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }

    /// Every resolved pass was produced.
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty() && self.skipped.is_empty()
    }

    /// Kinds worth retrying on their own.
    pub fn retryable(&self) -> Vec<SessionKind> {
        self.failed.iter().map(|f| f.kind).collect()
    }
}

pub struct PassGenerator {
    assets: AssetLibrary,
    output: OutputStore,
    compositor: Compositor,
    validator: Validator,
    event_label: String,
    signing_secret: Option<String>,
}

impl PassGenerator {
    pub fn new(config: &GeneratorConfig) -> Result<Self, GenerationError> {
        let compositor = Compositor::new(config.style.clone(), config.placement)
            .map_err(|e| GenerationError::Config(e.to_string()))?;
        Ok(Self {
            assets: AssetLibrary::new(&config.assets_dir, config.layout.clone()),
            output: OutputStore::open(&config.output_dir)?,
            compositor,
            validator: Validator::new(),
            event_label: config.event_label.clone(),
            signing_secret: config.signing_secret.clone(),
        })
    }

    pub fn assets(&self) -> &AssetLibrary {
        &self.assets
    }

    pub fn output(&self) -> &OutputStore {
        &self.output
    }

    /// Validate a registrant against the caller contract
    pub fn validate_registrant(&self, registrant: &Registrant) -> ValidationResult {
        #[cfg(feature = "test-hooks")]
        VALIDATION_CALL_COUNT.fetch_add(1, Ordering::SeqCst);

        self.validator.validate(registrant)
    }

    pub fn resolve(&self, registrant: &Registrant) -> Resolution {
        resolve_with_layout(registrant, self.assets.layout())
    }

    /// Render one pass and write it to its deterministic path.
    pub fn generate_pass(
        &self,
        registrant: &Registrant,
        spec: &ArtifactSpec,
    ) -> Result<GeneratedArtifact, ArtifactError> {
        let template_path = self.assets.pass_template_path(&spec.template_ref);
        let text = payload::encode(registrant, spec.kind, &self.event_label);
        let image = self.compositor.render(&template_path, &text)?;

        let output_path = self.output.pass_path(registrant, spec.kind);
        Compositor::save(&image, &output_path)?;

        Ok(GeneratedArtifact {
            kind: ArtifactKind::Pass(spec.kind),
            output_path,
            is_scannable_pass: true,
        })
    }

    /// Existing invitation and schedule files, in resolver order.
    pub fn locate_attachments(&self, resolution: &Resolution) -> Vec<GeneratedArtifact> {
        let invitations = resolution.invitations.iter().map(|i| {
            (
                ArtifactKind::Invitation(i.kind),
                self.assets.invitation_path(&i.file_ref),
            )
        });
        let schedules = resolution.schedules.iter().map(|s| {
            (
                ArtifactKind::Schedule(s.kind),
                self.assets.schedule_path(&s.file_ref),
            )
        });

        invitations
            .chain(schedules)
            .filter_map(|(kind, path)| match AssetLibrary::locate(path.clone()) {
                Some(output_path) => Some(GeneratedArtifact {
                    kind,
                    output_path,
                    is_scannable_pass: false,
                }),
                None => {
                    debug!(%kind, path = %path.display(), "Attachment not found, skipping");
                    None
                }
            })
            .collect()
    }

    /// Generate every pass and collect attachments for one registrant.
    ///
    /// Per-artifact failures land in the report; only contract violations
    /// are returned as errors.
    pub fn generate_for_registrant(
        &self,
        registrant: &Registrant,
    ) -> Result<GenerationReport, GenerationError> {
        let id_hash = hash_id_number(&registrant.id_number);

        // MANDATORY: nothing is rendered for a registrant that fails validation.
        let validation = self.validate_registrant(registrant);
        if !validation.valid {
            let reasons: Vec<_> = validation
                .errors()
                .map(|v| format!("{}: {}", v.rule, v.message))
                .collect();
            warn!(registrant = registrant.id, %id_hash, ?reasons, "Registrant rejected");
            return Err(GenerationError::InvalidRegistrant {
                id: registrant.id,
                reasons,
            });
        }

        let resolution = self.resolve(registrant);
        info!(
            registrant = registrant.id,
            %id_hash,
            category = ?registrant.category,
            passes = resolution.passes.len(),
            invitations = resolution.invitations.len(),
            schedules = resolution.schedules.len(),
            "Starting pass generation"
        );

        let mut artifacts = vec![];
        let mut skipped = vec![];
        let mut failed = vec![];

        for spec in &resolution.passes {
            match self.generate_pass(registrant, spec) {
                Ok(artifact) => {
                    info!(
                        registrant = registrant.id,
                        kind = %spec.kind,
                        path = %artifact.output_path.display(),
                        "Generated pass"
                    );
                    artifacts.push(artifact);
                }
                Err(ArtifactError::TemplateMissing(template_path)) => {
                    warn!(
                        registrant = registrant.id,
                        kind = %spec.kind,
                        template = %template_path.display(),
                        "Template not found, skipping pass"
                    );
                    skipped.push(SkippedArtifact {
                        kind: spec.kind,
                        template_path,
                    });
                }
                Err(e) => {
                    warn!(registrant = registrant.id, kind = %spec.kind, error = %e, "Pass generation failed");
                    failed.push(FailedArtifact {
                        kind: spec.kind,
                        reason: e.to_string(),
                    });
                }
            }
        }

        let attachments = self.locate_attachments(&resolution);
        if !attachments.is_empty() {
            info!(registrant = registrant.id, count = attachments.len(), "Added attachments");
        }
        artifacts.extend(attachments);

        let digest = compute_digest(&DigestInput {
            registrant_id: registrant.id,
            artifacts: &artifacts,
            skipped: skipped.iter().map(|s| s.kind).collect(),
            failed: failed.iter().map(|f| f.kind).collect(),
        })?;
        let signature = self
            .signing_secret
            .as_ref()
            .map(|secret| sign(secret.as_bytes(), &digest));

        Ok(GenerationReport {
            registrant_id: registrant.id,
            artifacts,
            skipped,
            failed,
            warnings: validation.non_blocking(),
            digest,
            signature,
            generated_at: Utc::now(),
        })
    }
}
