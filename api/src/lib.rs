pub mod client;
pub mod drafts;
pub mod planner;
pub mod token;
pub mod wire;

use chrono::NaiveDate;

pub use drafts::{
    DRAFT_VERSION, DraftError, GroupsDraft, MatchFixture, MatchStage, MatchStatus, MatchesDraft,
    SetupDraft, StructureMode,
};
pub use planner::{BracketMatch, GroupBucket};

// ---------------------------------------------------------------------------
// Domain types — clean model, independent of the backend wire format
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct Event {
    pub id: i64,
    pub name: String,
    pub event_type: String, // "tournament" | "class" | ...
    pub sport: Option<String>,
    pub level: Option<String>,
    pub timezone: String,
    pub location_name: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub registration_deadline: Option<NaiveDate>,
    pub capacity: Option<u32>,
    pub entry_fee: Option<f64>,
    pub currency: Option<String>,
    pub description: Option<String>,
    pub is_public: bool,
}

impl Event {
    pub fn is_tournament(&self) -> bool {
        self.event_type.eq_ignore_ascii_case("tournament")
    }

    /// Starts today or later. Events without a start date never qualify.
    pub fn is_upcoming(&self, today: NaiveDate) -> bool {
        self.start_date.map(|d| d >= today).unwrap_or(false)
    }

    /// Registration stays open through the deadline day; no deadline means
    /// open until the event starts.
    pub fn registration_open(&self, today: NaiveDate) -> bool {
        match (self.registration_deadline, self.start_date) {
            (Some(deadline), _) => today <= deadline,
            (None, Some(start)) => today <= start,
            (None, None) => false,
        }
    }
}

/// Competition discipline of a tournament category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Discipline {
    #[default]
    Singles,
    DoublesMale,
    DoublesFemale,
    MixedDoubles,
    Teams,
}

impl Discipline {
    pub fn label(&self) -> &'static str {
        match self {
            Discipline::Singles => "Singles",
            Discipline::DoublesMale => "Doubles Male",
            Discipline::DoublesFemale => "Doubles Female",
            Discipline::MixedDoubles => "Mixed Doubles",
            Discipline::Teams => "Teams",
        }
    }

    /// Parse a backend discipline string; unknown values read as Singles.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "doubles male" | "doubles_male" => Discipline::DoublesMale,
            "doubles female" | "doubles_female" => Discipline::DoublesFemale,
            "mixed doubles" | "mixed_doubles" => Discipline::MixedDoubles,
            "teams" => Discipline::Teams,
            _ => Discipline::Singles,
        }
    }

    /// Entry label for boards and editors: doubles and team disciplines
    /// register teams, singles registers players.
    pub fn entry_label(&self) -> &'static str {
        match self {
            Discipline::Singles => "Player",
            _ => "Team",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct TournamentCategory {
    pub id: i64,
    pub event_id: i64,
    pub name: String,
    pub discipline: Discipline,
    pub groups: u32,
}

#[derive(Debug, Clone, Default)]
pub struct Team {
    pub id: i64,
    pub category_id: i64,
    pub name: String,
    pub players: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SubscriptionStatus {
    #[default]
    Pending,
    Confirmed,
    Withdrawn,
}

impl SubscriptionStatus {
    pub fn label(&self) -> &'static str {
        match self {
            SubscriptionStatus::Pending => "pending",
            SubscriptionStatus::Confirmed => "confirmed",
            SubscriptionStatus::Withdrawn => "withdrawn",
        }
    }
}

/// The caller's own registration for one event.
#[derive(Debug, Clone, Default)]
pub struct Subscription {
    pub event_id: i64,
    pub status: SubscriptionStatus,
    pub categories: Vec<CategoryEntry>,
}

#[derive(Debug, Clone, Default)]
pub struct CategoryEntry {
    pub category_id: i64,
    pub category_name: String,
    pub partner_preference: Option<String>,
}
