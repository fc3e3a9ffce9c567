use crate::app::MenuItem;
use log::warn;
use matchflow_api::planner::{
    self, BracketMatch, GroupBucket, MIN_TEAMS_PER_GROUP, generate_bracket_skeleton,
    generate_groups_skeleton,
};
use matchflow_api::{
    DRAFT_VERSION, Event, GroupsDraft, MatchFixture, MatchStage, MatchStatus, MatchesDraft,
    SetupDraft, StructureMode, Subscription, Team, TournamentCategory,
};
use std::collections::BTreeMap;

// ---------------------------------------------------------------------------
// Events list state
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct EventsState {
    pub events: Vec<Event>,
    pub selected: usize,
}

impl EventsState {
    pub fn load(&mut self, events: Vec<Event>) {
        self.events = events;
        if self.selected >= self.events.len() {
            self.selected = self.events.len().saturating_sub(1);
        }
    }

    pub fn navigate_down(&mut self) {
        let max = self.events.len().saturating_sub(1);
        if self.selected < max {
            self.selected += 1;
        }
    }

    pub fn navigate_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn selected_event(&self) -> Option<&Event> {
        self.events.get(self.selected)
    }
}

// ---------------------------------------------------------------------------
// Dashboard state
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct DashboardState {
    /// The caller's registration for the selected event, when loaded.
    pub subscription: Option<Subscription>,
}

// ---------------------------------------------------------------------------
// Category / team states
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct CategoriesState {
    pub event_id: Option<i64>,
    pub categories: Vec<TournamentCategory>,
    pub selected: usize,
}

impl CategoriesState {
    pub fn load(&mut self, event_id: i64, categories: Vec<TournamentCategory>) {
        self.event_id = Some(event_id);
        self.categories = categories;
        if self.selected >= self.categories.len() {
            self.selected = self.categories.len().saturating_sub(1);
        }
    }

    pub fn navigate_down(&mut self) {
        let max = self.categories.len().saturating_sub(1);
        if self.selected < max {
            self.selected += 1;
        }
    }

    pub fn navigate_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn selected_category(&self) -> Option<&TournamentCategory> {
        self.categories.get(self.selected)
    }
}

#[derive(Debug, Default)]
pub struct TeamsState {
    pub category_id: Option<i64>,
    pub teams: Vec<Team>,
    pub selected: usize,
}

impl TeamsState {
    pub fn load(&mut self, category_id: i64, teams: Vec<Team>) {
        self.category_id = Some(category_id);
        self.teams = teams;
        if self.selected >= self.teams.len() {
            self.selected = self.teams.len().saturating_sub(1);
        }
    }

    pub fn navigate_down(&mut self) {
        let max = self.teams.len().saturating_sub(1);
        if self.selected < max {
            self.selected += 1;
        }
    }

    pub fn navigate_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn selected_team(&self) -> Option<&Team> {
        self.teams.get(self.selected)
    }
}

// ---------------------------------------------------------------------------
// Setup editor state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SetupPane {
    #[default]
    Groups,
    Bracket,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MatchSide {
    #[default]
    Home,
    Away,
}

/// Selection cursor over the two setup boards.
#[derive(Debug, Clone, Copy, Default)]
pub struct SetupCursor {
    pub pane: SetupPane,
    pub group: usize,
    pub slot: usize,
    pub round: usize,
    pub match_idx: usize,
    pub side: MatchSide,
}

/// What an open inline editor is writing into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditTarget {
    GroupName { id: String },
    GroupSlot { id: String, index: usize },
    MatchName { id: String },
    MatchSide { id: String, side: MatchSide },
}

#[derive(Debug, Clone)]
pub struct EditBuffer {
    pub target: EditTarget,
    pub value: String,
}

impl EditBuffer {
    pub fn push_char(&mut self, c: char) {
        self.value.push(c);
    }

    pub fn backspace(&mut self) {
        self.value.pop();
    }
}

/// The tournament setup editor: shape parameters plus the editable group and
/// knockout skeletons. All mutations happen here through explicit operations;
/// the planner functions stay pure and stateless. Manual ids come from a
/// session-monotonic counter, never the clock, so every operation is
/// reproducible in tests.
#[derive(Debug, Default)]
pub struct SetupState {
    pub event_id: Option<i64>,
    pub category_id: Option<i64>,
    pub formats: Vec<String>,
    pub structure_mode: StructureMode,
    pub group_count: usize,
    pub teams_per_group: usize,
    pub qualifiers_per_group: usize,
    pub groups: Vec<GroupBucket>,
    pub bracket: Vec<BracketMatch>,
    pub cursor: SetupCursor,
    pub editing: Option<EditBuffer>,
    /// Unsaved edits since the last draft save.
    pub dirty: bool,
    manual_seq: u64,
}

impl SetupState {
    pub fn new() -> Self {
        Self {
            group_count: 2,
            teams_per_group: 4,
            qualifiers_per_group: 2,
            ..Self::default()
        }
    }

    /// Target a tournament category: reset shape to its group count and
    /// build fresh skeletons.
    pub fn open_category(&mut self, category: &TournamentCategory) {
        self.event_id = Some(category.event_id);
        self.category_id = Some(category.id);
        self.group_count = category.groups.max(1) as usize;
        self.cursor = SetupCursor::default();
        self.editing = None;
        self.regenerate();
        self.dirty = false;
    }

    // -----------------------------------------------------------------------
    // Shape parameters
    // -----------------------------------------------------------------------

    pub fn qualified(&self) -> usize {
        self.group_count.max(1) * self.qualifiers_per_group.max(1)
    }

    pub fn bracket_size(&self) -> u64 {
        planner::next_power_of_two(self.qualified().max(2) as i64)
    }

    /// False when the qualified count does not fill a power-of-two bracket.
    /// The planner never fails on this — the Setup view surfaces an advisory
    /// banner with [`SetupState::bracket_size`] as the suggestion.
    pub fn shape_feasible(&self) -> bool {
        planner::is_power_of_two(self.qualified() as i64)
    }

    pub fn adjust_group_count(&mut self, delta: i64) {
        self.group_count = apply_delta(self.group_count, delta, 1);
    }

    pub fn adjust_teams_per_group(&mut self, delta: i64) {
        self.teams_per_group = apply_delta(self.teams_per_group, delta, MIN_TEAMS_PER_GROUP);
    }

    pub fn adjust_qualifiers(&mut self, delta: i64) {
        self.qualifiers_per_group = apply_delta(self.qualifiers_per_group, delta, 1);
    }

    // -----------------------------------------------------------------------
    // Skeleton regeneration
    // -----------------------------------------------------------------------

    /// Names entered so far, in board order, blanks skipped.
    pub fn entered_teams(&self) -> Vec<String> {
        self.groups
            .iter()
            .flat_map(|g| g.participants.iter())
            .filter(|p| !p.trim().is_empty())
            .cloned()
            .collect()
    }

    /// Rebuild both skeletons from the current shape, redistributing entered
    /// names. Names beyond the new capacity are dropped (the planner's
    /// documented best-effort contract); the drop is logged so shrink-induced
    /// loss is at least visible.
    pub fn regenerate(&mut self) {
        let existing = self.entered_teams();
        let capacity = self.group_count.max(1) * self.teams_per_group.max(MIN_TEAMS_PER_GROUP);
        if existing.len() > capacity {
            warn!(
                "regenerate drops {} entered name(s) beyond the new capacity of {capacity}",
                existing.len() - capacity
            );
        }
        self.groups =
            generate_groups_skeleton(self.group_count, self.teams_per_group, &existing);
        self.bracket = generate_bracket_skeleton(self.group_count, self.qualifiers_per_group);
        self.group_count = self.groups.len();
        self.cursor = SetupCursor { pane: self.cursor.pane, ..SetupCursor::default() };
        self.dirty = true;
    }

    // -----------------------------------------------------------------------
    // Group operations
    // -----------------------------------------------------------------------

    fn next_manual_id(&mut self) -> u64 {
        self.manual_seq += 1;
        self.manual_seq
    }

    pub fn add_group(&mut self) {
        let seq = self.next_manual_id();
        let slots = self.teams_per_group.max(MIN_TEAMS_PER_GROUP);
        self.groups.push(GroupBucket {
            id: format!("g_m{seq}"),
            name: format!("Group {}", planner::group_letter(self.groups.len())),
            participants: vec![String::new(); slots],
        });
        self.group_count = self.groups.len();
        self.dirty = true;
    }

    /// Deleting the last remaining group is rejected.
    pub fn delete_group(&mut self, id: &str) -> bool {
        if self.groups.len() <= 1 {
            return false;
        }
        let before = self.groups.len();
        self.groups.retain(|g| g.id != id);
        if self.groups.len() == before {
            return false;
        }
        self.group_count = self.groups.len();
        self.cursor.group = self.cursor.group.min(self.groups.len() - 1);
        self.dirty = true;
        true
    }

    pub fn add_team_slot(&mut self, group_id: &str) {
        if let Some(group) = self.groups.iter_mut().find(|g| g.id == group_id) {
            group.participants.push(String::new());
            self.dirty = true;
        }
    }

    pub fn set_group_slot(&mut self, group_id: &str, index: usize, value: &str) {
        if let Some(group) = self.groups.iter_mut().find(|g| g.id == group_id) {
            while group.participants.len() <= index {
                group.participants.push(String::new());
            }
            group.participants[index] = value.trim().to_string();
            self.dirty = true;
        }
    }

    /// Clear a slot. Blank slots above the structural minimum are removed
    /// outright; slots within the minimum are emptied in place so the board
    /// keeps its shape.
    pub fn clear_group_slot(&mut self, group_id: &str, index: usize) {
        let minimum_slots = self.teams_per_group.max(MIN_TEAMS_PER_GROUP);
        if let Some(group) = self.groups.iter_mut().find(|g| g.id == group_id) {
            while group.participants.len() <= index {
                group.participants.push(String::new());
            }
            let value = group.participants[index].clone();
            if value.trim().is_empty() && group.participants.len() > minimum_slots {
                group.participants.remove(index);
                self.cursor.slot = self.cursor.slot.min(group.participants.len().saturating_sub(1));
            } else {
                group.participants[index] = String::new();
            }
            self.dirty = true;
        }
    }

    /// Blank names keep the old name.
    pub fn rename_group(&mut self, id: &str, name: &str) {
        let name = name.trim();
        if name.is_empty() {
            return;
        }
        if let Some(group) = self.groups.iter_mut().find(|g| g.id == id) {
            group.name = name.to_string();
            self.dirty = true;
        }
    }

    // -----------------------------------------------------------------------
    // Bracket operations
    // -----------------------------------------------------------------------

    pub fn rename_match(&mut self, id: &str, name: &str) {
        let name = name.trim();
        if name.is_empty() {
            return;
        }
        if let Some(m) = self.bracket.iter_mut().find(|m| m.id == id) {
            m.name = name.to_string();
            self.dirty = true;
        }
    }

    pub fn set_match_side(&mut self, id: &str, side: MatchSide, value: &str) {
        if let Some(m) = self.bracket.iter_mut().find(|m| m.id == id) {
            match side {
                MatchSide::Home => m.home = value.trim().to_string(),
                MatchSide::Away => m.away = value.trim().to_string(),
            }
            self.dirty = true;
        }
    }

    /// Append a standalone first-round match with both sides TBD.
    pub fn add_single_match(&mut self) {
        let seq = self.next_manual_id();
        let round = self
            .bracket
            .iter()
            .find(|m| m.round_index == 0)
            .map(|m| m.round.clone())
            .unwrap_or_else(|| {
                planner::round_name_for_size(planner::next_power_of_two(self.qualified() as i64))
            });
        self.bracket.push(BracketMatch {
            id: format!("bm_m{seq}"),
            name: format!("Match E{}", self.bracket.len() + 1),
            round,
            round_index: 0,
            home: "TBD".to_string(),
            away: "TBD".to_string(),
        });
        self.dirty = true;
    }

    /// Append an extra match to the last existing round (e.g. a third-place
    /// playoff next to the final). No-op on an empty bracket.
    pub fn add_final_match(&mut self) -> bool {
        let Some(last) = self.bracket.iter().max_by_key(|m| m.round_index) else {
            return false;
        };
        let round_index = last.round_index;
        let round = last.round.clone();
        let seq = self.next_manual_id();
        self.bracket.push(BracketMatch {
            id: format!("bm_m{seq}"),
            name: format!("Match E{}", self.bracket.len() + 1),
            round,
            round_index,
            home: "TBD".to_string(),
            away: "TBD".to_string(),
        });
        self.dirty = true;
        true
    }

    pub fn delete_match(&mut self, id: &str) -> bool {
        let before = self.bracket.len();
        self.bracket.retain(|m| m.id != id);
        let deleted = self.bracket.len() != before;
        if deleted {
            self.dirty = true;
        }
        deleted
    }

    /// Bracket grouped by round, ascending `round_index`, in-round order
    /// preserved exactly as generated. Rendering must not re-sort.
    pub fn rounds(&self) -> Vec<Vec<&BracketMatch>> {
        let mut by_round: BTreeMap<usize, Vec<&BracketMatch>> = BTreeMap::new();
        for m in &self.bracket {
            by_round.entry(m.round_index).or_default().push(m);
        }
        by_round.into_values().collect()
    }

    // -----------------------------------------------------------------------
    // Cursor + inline editor
    // -----------------------------------------------------------------------

    pub fn toggle_pane(&mut self) {
        self.cursor.pane = match self.cursor.pane {
            SetupPane::Groups => SetupPane::Bracket,
            SetupPane::Bracket => SetupPane::Groups,
        };
    }

    pub fn cursor_up(&mut self) {
        match self.cursor.pane {
            SetupPane::Groups => self.cursor.slot = self.cursor.slot.saturating_sub(1),
            SetupPane::Bracket => {
                if self.cursor.side == MatchSide::Away {
                    self.cursor.side = MatchSide::Home;
                } else if self.cursor.match_idx > 0 {
                    self.cursor.match_idx -= 1;
                    self.cursor.side = MatchSide::Away;
                }
            }
        }
    }

    pub fn cursor_down(&mut self) {
        match self.cursor.pane {
            SetupPane::Groups => {
                let max = self
                    .groups
                    .get(self.cursor.group)
                    .map(|g| g.participants.len().saturating_sub(1))
                    .unwrap_or(0);
                if self.cursor.slot < max {
                    self.cursor.slot += 1;
                }
            }
            SetupPane::Bracket => {
                if self.cursor.side == MatchSide::Home {
                    self.cursor.side = MatchSide::Away;
                } else {
                    let max = self
                        .rounds()
                        .get(self.cursor.round)
                        .map(|r| r.len().saturating_sub(1))
                        .unwrap_or(0);
                    if self.cursor.match_idx < max {
                        self.cursor.match_idx += 1;
                        self.cursor.side = MatchSide::Home;
                    }
                }
            }
        }
    }

    pub fn cursor_left(&mut self) {
        match self.cursor.pane {
            SetupPane::Groups => self.cursor.group = self.cursor.group.saturating_sub(1),
            SetupPane::Bracket => {
                self.cursor.round = self.cursor.round.saturating_sub(1);
                self.clamp_bracket_cursor();
            }
        }
        self.clamp_group_cursor();
    }

    pub fn cursor_right(&mut self) {
        match self.cursor.pane {
            SetupPane::Groups => {
                let max = self.groups.len().saturating_sub(1);
                if self.cursor.group < max {
                    self.cursor.group += 1;
                }
            }
            SetupPane::Bracket => {
                let max = self.rounds().len().saturating_sub(1);
                if self.cursor.round < max {
                    self.cursor.round += 1;
                }
                self.clamp_bracket_cursor();
            }
        }
        self.clamp_group_cursor();
    }

    fn clamp_group_cursor(&mut self) {
        if let Some(group) = self.groups.get(self.cursor.group) {
            self.cursor.slot = self.cursor.slot.min(group.participants.len().saturating_sub(1));
        }
    }

    fn clamp_bracket_cursor(&mut self) {
        let rounds = self.rounds();
        if let Some(round) = rounds.get(self.cursor.round) {
            self.cursor.match_idx = self.cursor.match_idx.min(round.len().saturating_sub(1));
        }
    }

    /// The group under the cursor, if any.
    pub fn cursor_group(&self) -> Option<&GroupBucket> {
        self.groups.get(self.cursor.group)
    }

    /// The match under the cursor, if any.
    pub fn cursor_match(&self) -> Option<&BracketMatch> {
        let rounds = self.rounds();
        rounds
            .get(self.cursor.round)
            .and_then(|r| r.get(self.cursor.match_idx))
            .copied()
    }

    /// Open the inline editor for whatever the cursor points at.
    pub fn begin_edit(&mut self) {
        let buffer = match self.cursor.pane {
            SetupPane::Groups => self.cursor_group().map(|g| {
                let index = self.cursor.slot;
                EditBuffer {
                    target: EditTarget::GroupSlot { id: g.id.clone(), index },
                    value: g.participants.get(index).cloned().unwrap_or_default(),
                }
            }),
            SetupPane::Bracket => self.cursor_match().map(|m| {
                let side = self.cursor.side;
                EditBuffer {
                    target: EditTarget::MatchSide { id: m.id.clone(), side },
                    value: match side {
                        MatchSide::Home => m.home.clone(),
                        MatchSide::Away => m.away.clone(),
                    },
                }
            }),
        };
        self.editing = buffer;
    }

    /// Open the inline editor on the name of the group/match under the cursor.
    pub fn begin_rename(&mut self) {
        let buffer = match self.cursor.pane {
            SetupPane::Groups => self.cursor_group().map(|g| EditBuffer {
                target: EditTarget::GroupName { id: g.id.clone() },
                value: g.name.clone(),
            }),
            SetupPane::Bracket => self.cursor_match().map(|m| EditBuffer {
                target: EditTarget::MatchName { id: m.id.clone() },
                value: m.name.clone(),
            }),
        };
        self.editing = buffer;
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    /// Commit the open inline editor into the targeted field.
    pub fn commit_edit(&mut self) {
        let Some(buffer) = self.editing.take() else {
            return;
        };
        match buffer.target {
            EditTarget::GroupName { id } => self.rename_group(&id, &buffer.value),
            EditTarget::GroupSlot { id, index } => {
                self.set_group_slot(&id, index, &buffer.value)
            }
            EditTarget::MatchName { id } => self.rename_match(&id, &buffer.value),
            EditTarget::MatchSide { id, side } => {
                self.set_match_side(&id, side, &buffer.value)
            }
        }
    }

    // -----------------------------------------------------------------------
    // Draft conversion
    // -----------------------------------------------------------------------

    pub fn to_setup_draft(&self) -> SetupDraft {
        SetupDraft {
            version: DRAFT_VERSION,
            formats: self.formats.clone(),
            structure_mode: self.structure_mode,
            group_count: self.group_count,
            teams_per_group: self.teams_per_group,
            qualifiers_per_group: self.qualifiers_per_group,
            bracket: self.bracket.clone(),
        }
    }

    pub fn apply_setup_draft(&mut self, draft: SetupDraft) {
        self.formats = draft.formats;
        self.structure_mode = draft.structure_mode;
        self.group_count = draft.group_count.max(1);
        self.teams_per_group = draft.teams_per_group.max(MIN_TEAMS_PER_GROUP);
        self.qualifiers_per_group = draft.qualifiers_per_group.max(1);
        self.bracket = draft.bracket;
        self.cursor = SetupCursor::default();
        self.dirty = false;
    }

    pub fn to_groups_draft(&self) -> GroupsDraft {
        GroupsDraft { version: DRAFT_VERSION, groups: self.groups.clone() }
    }

    /// Export the knockout skeleton as pending fixtures, ready for scheduling
    /// once the backend owns them.
    pub fn to_matches_draft(&self) -> MatchesDraft {
        let matches = self
            .bracket
            .iter()
            .map(|m| MatchFixture {
                id: format!("fx_{}", m.id),
                stage: MatchStage::Knockout,
                group_id: None,
                round: Some(m.round_index as u32 + 1),
                home: m.home.clone(),
                away: m.away.clone(),
                scheduled_at: String::new(),
                score_home: String::new(),
                score_away: String::new(),
                status: MatchStatus::Pending,
            })
            .collect();
        MatchesDraft { version: DRAFT_VERSION, matches }
    }

    pub fn apply_groups_draft(&mut self, draft: GroupsDraft) {
        self.groups = draft.groups;
        if !self.groups.is_empty() {
            self.group_count = self.groups.len();
        }
        self.cursor = SetupCursor::default();
        self.dirty = false;
    }
}

fn apply_delta(value: usize, delta: i64, floor: usize) -> usize {
    let next = value as i64 + delta;
    next.max(floor as i64) as usize
}

// ---------------------------------------------------------------------------
// Root app state
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct AppState {
    pub active_tab: MenuItem,
    pub previous_tab: MenuItem,
    pub show_intro: bool,
    pub show_logs: bool,
    pub last_error: Option<String>,
    /// One-line status feedback (draft saved, group deleted, ...).
    pub status: Option<String>,
    pub user_id: Option<i64>,
    pub user_role: Option<String>,
    pub events: EventsState,
    pub dashboard: DashboardState,
    pub categories: CategoriesState,
    pub teams: TeamsState,
    pub setup: SetupState,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            show_intro: true,
            setup: SetupState::new(),
            ..Self::default()
        }
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_with_skeletons() -> SetupState {
        let mut setup = SetupState::new();
        setup.regenerate();
        setup
    }

    #[test]
    fn regenerate_builds_both_skeletons() {
        let setup = setup_with_skeletons();
        assert_eq!(setup.groups.len(), 2);
        assert_eq!(setup.bracket.len(), 3, "4 qualifiers -> bracket of 4 -> 3 matches");
    }

    #[test]
    fn regenerate_keeps_entered_names() {
        let mut setup = setup_with_skeletons();
        let g0 = setup.groups[0].id.clone();
        let g1 = setup.groups[1].id.clone();
        setup.set_group_slot(&g0, 0, "Ana");
        setup.set_group_slot(&g1, 0, "Bruno");
        setup.adjust_group_count(1); // 3 groups now
        setup.regenerate();
        assert_eq!(setup.groups.len(), 3);
        assert_eq!(setup.groups[0].participants[0], "Ana");
        assert_eq!(setup.groups[1].participants[0], "Bruno");
    }

    #[test]
    fn add_group_extends_letters_and_count() {
        let mut setup = setup_with_skeletons();
        setup.add_group();
        assert_eq!(setup.groups.len(), 3);
        assert_eq!(setup.group_count, 3);
        assert_eq!(setup.groups[2].name, "Group C");
        assert_eq!(setup.groups[2].id, "g_m1", "manual ids come from the session counter");
    }

    #[test]
    fn deleting_the_last_group_is_rejected() {
        let mut setup = SetupState::new();
        setup.group_count = 1;
        setup.regenerate();
        let id = setup.groups[0].id.clone();
        assert!(!setup.delete_group(&id));
        assert_eq!(setup.groups.len(), 1);
    }

    #[test]
    fn delete_group_syncs_count() {
        let mut setup = setup_with_skeletons();
        let id = setup.groups[1].id.clone();
        assert!(setup.delete_group(&id));
        assert_eq!(setup.groups.len(), 1);
        assert_eq!(setup.group_count, 1);
    }

    #[test]
    fn clear_slot_removes_blank_extra_rows_only() {
        let mut setup = setup_with_skeletons();
        let id = setup.groups[0].id.clone();
        setup.add_team_slot(&id);
        assert_eq!(setup.groups[0].participants.len(), 5);

        // Blank slot above the minimum: removed entirely.
        setup.clear_group_slot(&id, 4);
        assert_eq!(setup.groups[0].participants.len(), 4);

        // Filled slot within the minimum: cleared in place.
        setup.set_group_slot(&id, 1, "Carla");
        setup.clear_group_slot(&id, 1);
        assert_eq!(setup.groups[0].participants.len(), 4);
        assert_eq!(setup.groups[0].participants[1], "");
    }

    #[test]
    fn set_slot_pads_to_index() {
        let mut setup = setup_with_skeletons();
        let id = setup.groups[0].id.clone();
        setup.set_group_slot(&id, 6, "  Dina  ");
        assert_eq!(setup.groups[0].participants.len(), 7);
        assert_eq!(setup.groups[0].participants[6], "Dina");
    }

    #[test]
    fn blank_rename_keeps_old_name() {
        let mut setup = setup_with_skeletons();
        let id = setup.groups[0].id.clone();
        setup.rename_group(&id, "   ");
        assert_eq!(setup.groups[0].name, "Group A");
        setup.rename_group(&id, "Pool 1");
        assert_eq!(setup.groups[0].name, "Pool 1");
    }

    #[test]
    fn add_single_match_lands_in_round_zero() {
        let mut setup = setup_with_skeletons();
        setup.add_single_match();
        let added = setup.bracket.last().expect("added match");
        assert_eq!(added.round_index, 0);
        assert_eq!(added.id, "bm_m1");
        assert_eq!(added.name, "Match E4");
        assert_eq!(added.round, "Semifinals", "matches the existing first round label");
        assert_eq!((added.home.as_str(), added.away.as_str()), ("TBD", "TBD"));
    }

    #[test]
    fn add_final_match_appends_to_last_round() {
        let mut setup = setup_with_skeletons();
        assert!(setup.add_final_match());
        let added = setup.bracket.last().expect("added match");
        assert_eq!(added.round, "Final");
        assert_eq!(added.round_index, 1);

        let mut empty = SetupState::new();
        assert!(!empty.add_final_match(), "no round to append to");
    }

    #[test]
    fn rounds_group_in_generation_order() {
        let setup = setup_with_skeletons();
        let rounds = setup.rounds();
        assert_eq!(rounds.len(), 2);
        assert_eq!(rounds[0].len(), 2);
        assert_eq!(rounds[1].len(), 1);
        assert_eq!(rounds[0][0].name, "Match E1");
        assert_eq!(rounds[0][1].name, "Match E2");
    }

    #[test]
    fn shape_feasibility_advisory() {
        let mut setup = SetupState::new();
        setup.group_count = 3;
        setup.qualifiers_per_group = 2;
        assert_eq!(setup.qualified(), 6);
        assert!(!setup.shape_feasible());
        assert_eq!(setup.bracket_size(), 8);

        setup.group_count = 4;
        assert!(setup.shape_feasible());
    }

    #[test]
    fn shape_adjustment_respects_floors() {
        let mut setup = SetupState::new();
        setup.adjust_group_count(-10);
        assert_eq!(setup.group_count, 1);
        setup.adjust_teams_per_group(-10);
        assert_eq!(setup.teams_per_group, MIN_TEAMS_PER_GROUP);
        setup.adjust_qualifiers(-10);
        assert_eq!(setup.qualifiers_per_group, 1);
    }

    #[test]
    fn inline_edit_commits_into_group_slot() {
        let mut setup = setup_with_skeletons();
        setup.begin_edit();
        let buffer = setup.editing.as_mut().expect("editor open");
        for c in "Elisa".chars() {
            buffer.push_char(c);
        }
        setup.commit_edit();
        assert_eq!(setup.groups[0].participants[0], "Elisa");
        assert!(setup.editing.is_none());
    }

    #[test]
    fn inline_edit_commits_into_match_side() {
        let mut setup = setup_with_skeletons();
        setup.toggle_pane();
        setup.cursor_down(); // Home -> Away
        setup.begin_edit();
        {
            let buffer = setup.editing.as_mut().expect("editor open");
            buffer.value.clear();
            for c in "B9".chars() {
                buffer.push_char(c);
            }
        }
        setup.commit_edit();
        assert_eq!(setup.bracket[0].away, "B9");
    }

    #[test]
    fn setup_draft_round_trip() {
        let mut setup = setup_with_skeletons();
        setup.formats = vec!["Singles".into()];
        let draft = setup.to_setup_draft();
        let json = serde_json::to_string(&draft).expect("serialize");
        let decoded = SetupDraft::from_json(&json).expect("decode");

        let mut restored = SetupState::new();
        restored.apply_setup_draft(decoded);
        assert_eq!(restored.bracket, setup.bracket);
        assert_eq!(restored.group_count, setup.group_count);
        assert!(!restored.dirty);
    }

    #[test]
    fn matches_draft_exports_pending_knockout_fixtures() {
        let setup = setup_with_skeletons();
        let draft = setup.to_matches_draft();
        assert_eq!(draft.matches.len(), setup.bracket.len());
        let first = &draft.matches[0];
        assert_eq!(first.id, "fx_bm_0_1");
        assert_eq!(first.stage, MatchStage::Knockout);
        assert_eq!(first.round, Some(1));
        assert_eq!(first.status, MatchStatus::Pending);
        assert_eq!(first.home, "A1");
    }

    #[test]
    fn groups_draft_round_trip() {
        let mut setup = setup_with_skeletons();
        let id = setup.groups[0].id.clone();
        setup.set_group_slot(&id, 0, "Ana");
        let json = serde_json::to_string(&setup.to_groups_draft()).expect("serialize");
        let decoded = GroupsDraft::from_json(&json).expect("decode");

        let mut restored = SetupState::new();
        restored.apply_groups_draft(decoded);
        assert_eq!(restored.groups[0].participants[0], "Ana");
        assert_eq!(restored.group_count, 2);
    }
}
