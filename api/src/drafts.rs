//! Versioned draft schemas.
//!
//! Setup, group, and fixture drafts are persisted as JSON files keyed by
//! tournament id. Every envelope carries a `version` tag and is validated on
//! load through the `from_json` constructors — a malformed or
//! future-versioned draft is an error for the caller to surface, never data
//! to be trusted. The planner itself neither reads nor writes drafts.

use crate::planner::{BracketMatch, GroupBucket};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Current draft schema version. Bump when a field change breaks decoding.
pub const DRAFT_VERSION: u32 = 1;

#[derive(Debug)]
pub enum DraftError {
    /// The payload is not valid JSON for the expected shape.
    InvalidJson(String),
    /// The envelope decoded but carries a version this build cannot read.
    UnsupportedVersion { found: u32 },
    /// Structurally valid JSON that violates a draft invariant.
    Invalid(String),
}

impl fmt::Display for DraftError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DraftError::InvalidJson(msg) => write!(f, "invalid draft json: {msg}"),
            DraftError::UnsupportedVersion { found } => {
                write!(f, "unsupported draft version {found} (expected {DRAFT_VERSION})")
            }
            DraftError::Invalid(msg) => write!(f, "invalid draft: {msg}"),
        }
    }
}

fn check_version(found: u32) -> Result<(), DraftError> {
    if found != DRAFT_VERSION {
        return Err(DraftError::UnsupportedVersion { found });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Setup draft — shape parameters + knockout skeleton
// ---------------------------------------------------------------------------

/// How a tournament category is structured.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StructureMode {
    #[default]
    GroupsKnockout,
    KnockoutOnly,
    GroupPhaseOnly,
    Swiss,
}

impl StructureMode {
    pub fn label(&self) -> &'static str {
        match self {
            StructureMode::GroupsKnockout => "Groups + Knockout",
            StructureMode::KnockoutOnly => "Knockout only",
            StructureMode::GroupPhaseOnly => "Group phase only",
            StructureMode::Swiss => "Swiss",
        }
    }

    pub fn has_groups(&self) -> bool {
        !matches!(self, StructureMode::KnockoutOnly)
    }

    pub fn has_knockout(&self) -> bool {
        matches!(self, StructureMode::GroupsKnockout | StructureMode::KnockoutOnly)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetupDraft {
    pub version: u32,
    pub formats: Vec<String>,
    pub structure_mode: StructureMode,
    pub group_count: usize,
    pub teams_per_group: usize,
    pub qualifiers_per_group: usize,
    pub bracket: Vec<BracketMatch>,
}

impl SetupDraft {
    pub fn from_json(raw: &str) -> Result<Self, DraftError> {
        let draft: Self =
            serde_json::from_str(raw).map_err(|e| DraftError::InvalidJson(e.to_string()))?;
        check_version(draft.version)?;
        for m in &draft.bracket {
            if m.id.is_empty() {
                return Err(DraftError::Invalid("bracket match with empty id".into()));
            }
        }
        Ok(draft)
    }
}

// ---------------------------------------------------------------------------
// Groups draft
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupsDraft {
    pub version: u32,
    pub groups: Vec<GroupBucket>,
}

impl GroupsDraft {
    pub fn from_json(raw: &str) -> Result<Self, DraftError> {
        let draft: Self =
            serde_json::from_str(raw).map_err(|e| DraftError::InvalidJson(e.to_string()))?;
        check_version(draft.version)?;
        for g in &draft.groups {
            if g.id.is_empty() {
                return Err(DraftError::Invalid("group with empty id".into()));
            }
        }
        Ok(draft)
    }
}

// ---------------------------------------------------------------------------
// Fixtures draft — scheduled/scored matches, all stages
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStage {
    #[default]
    Group,
    Knockout,
    Swiss,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    #[default]
    Pending,
    Final,
}

/// One scheduled or played match. Scores stay strings — the backend owns
/// score semantics; drafts only carry what the admin typed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchFixture {
    pub id: String,
    pub stage: MatchStage,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub round: Option<u32>,
    pub home: String,
    pub away: String,
    pub scheduled_at: String,
    pub score_home: String,
    pub score_away: String,
    pub status: MatchStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchesDraft {
    pub version: u32,
    pub matches: Vec<MatchFixture>,
}

impl MatchesDraft {
    pub fn from_json(raw: &str) -> Result<Self, DraftError> {
        let draft: Self =
            serde_json::from_str(raw).map_err(|e| DraftError::InvalidJson(e.to_string()))?;
        check_version(draft.version)?;
        for m in &draft.matches {
            if m.id.is_empty() {
                return Err(DraftError::Invalid("fixture with empty id".into()));
            }
        }
        Ok(draft)
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::generate_groups_skeleton;

    #[test]
    fn setup_draft_round_trips() {
        let draft = SetupDraft {
            version: DRAFT_VERSION,
            formats: vec!["Singles".into()],
            structure_mode: StructureMode::GroupsKnockout,
            group_count: 2,
            teams_per_group: 4,
            qualifiers_per_group: 2,
            bracket: crate::planner::generate_bracket_skeleton(2, 2),
        };
        let json = serde_json::to_string_pretty(&draft).expect("serialize");
        let back = SetupDraft::from_json(&json).expect("decode");
        assert_eq!(back, draft);
    }

    #[test]
    fn setup_draft_uses_camel_case_keys() {
        let draft = SetupDraft { version: DRAFT_VERSION, ..Default::default() };
        let json = serde_json::to_value(&draft).expect("serialize");
        assert!(json.get("groupCount").is_some());
        assert!(json.get("structureMode").is_some());
    }

    #[test]
    fn future_version_is_rejected() {
        let raw = r#"{"version":2,"groups":[]}"#;
        match GroupsDraft::from_json(raw) {
            Err(DraftError::UnsupportedVersion { found: 2 }) => {}
            other => panic!("expected version rejection, got {other:?}"),
        }
    }

    #[test]
    fn garbage_is_rejected_not_defaulted() {
        assert!(matches!(
            GroupsDraft::from_json("{not json"),
            Err(DraftError::InvalidJson(_))
        ));
        assert!(matches!(
            SetupDraft::from_json(r#"{"version":"one"}"#),
            Err(DraftError::InvalidJson(_))
        ));
    }

    #[test]
    fn empty_group_id_is_rejected() {
        let draft = GroupsDraft {
            version: DRAFT_VERSION,
            groups: vec![GroupBucket { id: String::new(), name: "Group A".into(), participants: vec![] }],
        };
        let json = serde_json::to_string(&draft).expect("serialize");
        assert!(matches!(GroupsDraft::from_json(&json), Err(DraftError::Invalid(_))));
    }

    #[test]
    fn groups_draft_accepts_generated_skeleton() {
        let draft = GroupsDraft {
            version: DRAFT_VERSION,
            groups: generate_groups_skeleton(3, 4, &[]),
        };
        let json = serde_json::to_string(&draft).expect("serialize");
        let back = GroupsDraft::from_json(&json).expect("decode");
        assert_eq!(back.groups.len(), 3);
    }

    #[test]
    fn structure_mode_wire_names_are_snake_case() {
        let json = serde_json::to_string(&StructureMode::GroupPhaseOnly).expect("serialize");
        assert_eq!(json, r#""group_phase_only""#);
    }

    #[test]
    fn fixture_round_trips_with_optional_fields_absent() {
        let fixture = MatchFixture {
            id: "fx_1".into(),
            stage: MatchStage::Knockout,
            home: "A1".into(),
            away: "B2".into(),
            status: MatchStatus::Pending,
            ..Default::default()
        };
        let draft = MatchesDraft { version: DRAFT_VERSION, matches: vec![fixture] };
        let json = serde_json::to_string(&draft).expect("serialize");
        assert!(!json.contains("groupId"), "absent options are omitted");
        let back = MatchesDraft::from_json(&json).expect("decode");
        assert_eq!(back, draft);
    }
}
