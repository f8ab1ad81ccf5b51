//! Pass Status - Generation-State Flags for the Caller to Persist

use serde::{Deserialize, Serialize};

use crate::eligibility::ArtifactKind;
use crate::generator::GenerationReport;
use crate::registrant::{Registrant, RegistrantId};
use crate::session::SessionKind;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlagStatus {
    pub allocated: bool,
    pub generated: bool,
}

impl FlagStatus {
    fn satisfied(&self) -> bool {
        !self.allocated || self.generated
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassStatus {
    pub registrant_id: RegistrantId,
    pub exhibition_day1: FlagStatus,
    pub exhibition_day2: FlagStatus,
    pub interactive_sessions: FlagStatus,
    pub plenary: FlagStatus,
    pub all_generated: bool,
}

impl PassStatus {
    /// Summarize which allocated entitlements a report actually covered.
    ///
    /// Exhibitors count as allocated for both exhibition days and never for
    /// interactive or plenary sessions.
    pub fn from_report(registrant: &Registrant, report: &GenerationReport) -> Self {
        let generated = |kind: SessionKind| {
            report
                .artifacts
                .iter()
                .any(|a| a.kind == ArtifactKind::Pass(kind))
        };
        let flags = &registrant.entitlements;

        let (day1, day2, interactive, plenary) = if registrant.is_exhibitor() {
            let both = generated(SessionKind::ExhibitionBothDays);
            (
                FlagStatus { allocated: true, generated: both },
                FlagStatus { allocated: true, generated: both },
                FlagStatus::default(),
                FlagStatus::default(),
            )
        } else {
            (
                FlagStatus {
                    allocated: flags.exhibition_day1,
                    generated: generated(SessionKind::ExhibitionDay1),
                },
                FlagStatus {
                    allocated: flags.exhibition_day2,
                    generated: generated(SessionKind::ExhibitionDay2),
                },
                FlagStatus {
                    allocated: flags.interactive_sessions,
                    generated: generated(SessionKind::InteractiveSessions),
                },
                FlagStatus {
                    allocated: flags.plenary,
                    generated: generated(SessionKind::Plenary),
                },
            )
        };

        let all_generated = [day1, day2, interactive, plenary]
            .iter()
            .all(FlagStatus::satisfied);

        Self {
            registrant_id: registrant.id,
            exhibition_day1: day1,
            exhibition_day2: day2,
            interactive_sessions: interactive,
            plenary,
            all_generated,
        }
    }
}
