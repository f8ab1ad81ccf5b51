//! Eligibility Resolver - Ordered Rule Tables
//!
//! Entitlement flags map to artifacts through static rule tables. Each slot is
//! evaluated top to bottom; a `FirstMatch` slot stops at the first rule that
//! applies, an `EveryMatch` slot emits every rule that applies, in table order.
//!
//! Exhibitor status is an override: exhibitors are routed to their own slots
//! and never see the visitor tables, so `interactive_sessions` and `plenary`
//! are ignored for them whatever their stored value.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use crate::assets::AssetLayout;
use crate::registrant::{Category, Entitlements, Registrant};
use crate::session::SessionKind;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum InvitationKind {
    Exhibitor,
    Day1Morning,
    PlenaryAfternoon,
    Interactive,
    Day2Exhibition,
}

impl InvitationKind {
    pub const ALL: [InvitationKind; 5] = [
        InvitationKind::Exhibitor,
        InvitationKind::Day1Morning,
        InvitationKind::PlenaryAfternoon,
        InvitationKind::Interactive,
        InvitationKind::Day2Exhibition,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            InvitationKind::Exhibitor => "exhibitor",
            InvitationKind::Day1Morning => "day1_morning",
            InvitationKind::PlenaryAfternoon => "plenary_afternoon",
            InvitationKind::Interactive => "interactive",
            InvitationKind::Day2Exhibition => "day2_exhibition",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleKind {
    Day1Full,
    Day1Plenary,
    Day2,
}

impl ScheduleKind {
    pub const ALL: [ScheduleKind; 3] = [
        ScheduleKind::Day1Full,
        ScheduleKind::Day1Plenary,
        ScheduleKind::Day2,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ScheduleKind::Day1Full => "day1_full",
            ScheduleKind::Day1Plenary => "day1_plenary",
            ScheduleKind::Day2 => "day2",
        }
    }
}

/// Any artifact the engine can hand back to a caller.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(tag = "family", content = "kind", rename_all = "snake_case")]
pub enum ArtifactKind {
    Pass(SessionKind),
    Invitation(InvitationKind),
    Schedule(ScheduleKind),
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArtifactKind::Pass(k) => write!(f, "pass:{}", k.as_str()),
            ArtifactKind::Invitation(k) => write!(f, "invitation:{}", k.as_str()),
            ArtifactKind::Schedule(k) => write!(f, "schedule:{}", k.as_str()),
        }
    }
}

/// A pass to render: session kind bound to its template filename.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ArtifactSpec {
    pub kind: SessionKind,
    pub template_ref: String,
}

/// A pre-existing file to attach, located by naming convention.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AttachmentSpec<K> {
    pub kind: K,
    pub file_ref: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Resolution {
    pub passes: Vec<ArtifactSpec>,
    pub invitations: Vec<AttachmentSpec<InvitationKind>>,
    pub schedules: Vec<AttachmentSpec<ScheduleKind>>,
}

impl Resolution {
    pub fn pass_kinds(&self) -> Vec<SessionKind> {
        self.passes.iter().map(|p| p.kind).collect()
    }

    pub fn invitation_kinds(&self) -> Vec<InvitationKind> {
        self.invitations.iter().map(|i| i.kind).collect()
    }

    pub fn schedule_kinds(&self) -> Vec<ScheduleKind> {
        self.schedules.iter().map(|s| s.kind).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.passes.is_empty() && self.invitations.is_empty() && self.schedules.is_empty()
    }
}

// --- Rule tables ---

pub struct Rule<T: 'static> {
    pub name: &'static str,
    pub when: fn(&Entitlements) -> bool,
    pub emit: T,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    FirstMatch,
    EveryMatch,
}

pub struct Slot<T: 'static> {
    pub name: &'static str,
    pub selection: Selection,
    pub rules: &'static [Rule<T>],
}

impl<T: Copy + 'static> Slot<T> {
    fn evaluate(&self, flags: &Entitlements, out: &mut Vec<T>) {
        for rule in self.rules {
            if (rule.when)(flags) {
                debug!(slot = self.name, rule = rule.name, "Rule matched");
                out.push(rule.emit);
                if self.selection == Selection::FirstMatch {
                    return;
                }
            }
        }
    }
}

/// Slots per category for one artifact family.
pub struct RuleBook<T: 'static> {
    pub exhibitor: &'static [Slot<T>],
    pub visitor: &'static [Slot<T>],
}

impl<T: Copy + 'static> RuleBook<T> {
    pub fn evaluate(&self, category: Category, flags: &Entitlements) -> Vec<T> {
        let slots = match category {
            Category::Exhibitor => self.exhibitor,
            Category::Visitor => self.visitor,
        };
        let mut out = vec![];
        for slot in slots {
            slot.evaluate(flags, &mut out);
        }
        out
    }
}

fn always(_: &Entitlements) -> bool {
    true
}

pub static PASS_RULES: RuleBook<SessionKind> = RuleBook {
    exhibitor: &[Slot {
        name: "exhibitor_pass",
        selection: Selection::FirstMatch,
        rules: &[Rule {
            name: "exhibitor_both_days",
            when: always,
            emit: SessionKind::ExhibitionBothDays,
        }],
    }],
    visitor: &[Slot {
        name: "visitor_passes",
        selection: Selection::EveryMatch,
        rules: &[
            Rule {
                name: "exhibition_day1",
                when: |f| f.exhibition_day1,
                emit: SessionKind::ExhibitionDay1,
            },
            Rule {
                name: "exhibition_day2",
                when: |f| f.exhibition_day2,
                emit: SessionKind::ExhibitionDay2,
            },
            Rule {
                name: "interactive_sessions",
                when: |f| f.interactive_sessions,
                emit: SessionKind::InteractiveSessions,
            },
            Rule {
                name: "plenary",
                when: |f| f.plenary,
                emit: SessionKind::Plenary,
            },
        ],
    }],
};

pub static INVITATION_RULES: RuleBook<InvitationKind> = RuleBook {
    exhibitor: &[Slot {
        name: "exhibitor_invitation",
        selection: Selection::FirstMatch,
        rules: &[Rule {
            name: "exhibitor",
            when: always,
            emit: InvitationKind::Exhibitor,
        }],
    }],
    visitor: &[
        Slot {
            name: "day1_invitation",
            selection: Selection::FirstMatch,
            rules: &[
                // Morning arrival also covers an afternoon plenary.
                Rule {
                    name: "day1_morning",
                    when: |f| f.exhibition_day1,
                    emit: InvitationKind::Day1Morning,
                },
                Rule {
                    name: "plenary_afternoon",
                    when: |f| f.plenary,
                    emit: InvitationKind::PlenaryAfternoon,
                },
            ],
        },
        Slot {
            name: "day2_invitation",
            selection: Selection::FirstMatch,
            rules: &[
                // Interactive supersedes the exhibition-only card.
                Rule {
                    name: "interactive",
                    when: |f| f.interactive_sessions,
                    emit: InvitationKind::Interactive,
                },
                Rule {
                    name: "day2_exhibition",
                    when: |f| f.exhibition_day2,
                    emit: InvitationKind::Day2Exhibition,
                },
            ],
        },
    ],
};

pub static SCHEDULE_RULES: RuleBook<ScheduleKind> = RuleBook {
    exhibitor: &[],
    visitor: &[
        Slot {
            name: "day1_schedule",
            selection: Selection::FirstMatch,
            rules: &[
                Rule {
                    name: "day1_full",
                    when: |f| f.exhibition_day1,
                    emit: ScheduleKind::Day1Full,
                },
                Rule {
                    name: "day1_plenary",
                    when: |f| f.plenary,
                    emit: ScheduleKind::Day1Plenary,
                },
            ],
        },
        Slot {
            name: "day2_schedule",
            selection: Selection::FirstMatch,
            rules: &[Rule {
                name: "day2",
                when: |f| f.exhibition_day2 || f.interactive_sessions,
                emit: ScheduleKind::Day2,
            }],
        },
    ],
};

/// Resolve artifacts using the default asset layout.
pub fn resolve(registrant: &Registrant) -> Resolution {
    resolve_with_layout(registrant, &AssetLayout::default())
}

/// Resolve artifacts, binding each to its filename in `layout`.
pub fn resolve_with_layout(registrant: &Registrant, layout: &AssetLayout) -> Resolution {
    let category = registrant.category;
    let flags = &registrant.entitlements;

    let passes = PASS_RULES
        .evaluate(category, flags)
        .into_iter()
        .map(|kind| ArtifactSpec {
            kind,
            template_ref: layout.pass_template(kind).to_string(),
        })
        .collect();

    let invitations = INVITATION_RULES
        .evaluate(category, flags)
        .into_iter()
        .map(|kind| AttachmentSpec {
            kind,
            file_ref: layout.invitation_file(kind).to_string(),
        })
        .collect();

    let schedules = SCHEDULE_RULES
        .evaluate(category, flags)
        .into_iter()
        .map(|kind| AttachmentSpec {
            kind,
            file_ref: layout.schedule_file(kind).to_string(),
        })
        .collect();

    Resolution { passes, invitations, schedules }
}
