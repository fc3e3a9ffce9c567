use crate::state::network::LoadingState;
use crossterm::event::KeyEvent;
use matchflow_api::{Event, Subscription, Team, TournamentCategory};

#[derive(Debug, Clone)]
pub enum NetworkRequest {
    LoadEvents,
    LoadCategories { event_id: i64 },
    LoadTeams { category_id: i64 },
    LoadSubscription { event_id: i64 },
    WithdrawSubscription { event_id: i64 },
    SaveCategory { category: TournamentCategory },
    DeleteTeam { team_id: i64, category_id: i64 },
}

#[derive(Debug)]
pub enum NetworkResponse {
    LoadingStateChanged { loading_state: LoadingState },
    EventsLoaded { events: Vec<Event> },
    CategoriesLoaded { event_id: i64, categories: Vec<TournamentCategory> },
    TeamsLoaded { category_id: i64, teams: Vec<Team> },
    SubscriptionLoaded { subscription: Subscription },
    CategorySaved { category: TournamentCategory },
    SubscriptionWithdrawn { event_id: i64 },
    /// The backend rejected the held token; the UI clears it and reports.
    TokenRejected { message: String },
    Error { message: String },
}

#[derive(Debug, Clone)]
pub enum UiEvent {
    KeyPressed(KeyEvent),
    Resize,
    AppStarted,
}
