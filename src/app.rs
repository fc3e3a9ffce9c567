use crate::state::app_settings::AppSettings;
use crate::state::app_state::AppState;
use crate::state::drafts;
use matchflow_api::{Event, Subscription, Team, TournamentCategory, token};

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub enum MenuItem {
    #[default]
    Dashboard,
    Events,
    Setup,
    Groups,
    Teams,
    Help,
}

pub struct App {
    pub settings: AppSettings,
    pub state: AppState,
}

impl App {
    pub fn new() -> Self {
        let settings = AppSettings::load();

        let mut app = Self { state: AppState::new(), settings };

        if let Some(level) = app.settings.log_level {
            log::set_max_level(level);
            tui_logger::set_default_level(level);
        }

        // The backend enforces auth; claims are read only to personalise the UI.
        if let Ok(bearer) = std::env::var("MATCHFLOW_TOKEN")
            && !bearer.trim().is_empty()
        {
            app.state.user_id = token::user_id(&bearer);
            app.state.user_role = token::role(&bearer);
        }

        app
    }

    /// Whether the current role may edit events and tournament structure.
    pub fn has_creator_access(&self) -> bool {
        token::has_creator_access(self.state.user_role.as_deref())
    }

    // -----------------------------------------------------------------------
    // Network response handlers — called from main_ui_loop
    // -----------------------------------------------------------------------

    pub fn on_events_loaded(&mut self, events: Vec<Event>) {
        self.state.last_error = None;
        self.state.events.load(events);
    }

    pub fn on_categories_loaded(&mut self, event_id: i64, categories: Vec<TournamentCategory>) {
        self.state.last_error = None;
        self.state.categories.load(event_id, categories);
        // Entering Setup targets the selected category once its list arrives.
        if self.state.active_tab == MenuItem::Setup
            && self.state.setup.category_id.is_none()
            && let Some(category) = self.state.categories.selected_category()
        {
            let category = category.clone();
            self.open_setup_for(&category);
        }
    }

    pub fn on_teams_loaded(&mut self, category_id: i64, teams: Vec<Team>) {
        self.state.last_error = None;
        self.state.teams.load(category_id, teams);
    }

    pub fn on_subscription_loaded(&mut self, subscription: Subscription) {
        self.state.last_error = None;
        self.state.dashboard.subscription = Some(subscription);
    }

    pub fn on_category_saved(&mut self, category: TournamentCategory) {
        self.state.status = Some(format!("Category '{}' saved", category.name));
        if let Some(existing) = self
            .state
            .categories
            .categories
            .iter_mut()
            .find(|c| c.id == category.id)
        {
            *existing = category;
        } else {
            self.state.categories.categories.push(category);
        }
    }

    pub fn on_subscription_withdrawn(&mut self, event_id: i64) {
        self.state.status = Some(format!("Withdrawn from event {event_id}"));
        if let Some(sub) = &mut self.state.dashboard.subscription
            && sub.event_id == event_id
        {
            sub.status = matchflow_api::SubscriptionStatus::Withdrawn;
        }
    }

    pub fn on_token_rejected(&mut self, message: String) {
        self.state.user_id = None;
        self.state.user_role = None;
        self.state.last_error = Some(message);
    }

    pub fn on_error(&mut self, message: String) {
        self.state.last_error = Some(message);
    }

    // -----------------------------------------------------------------------
    // Tab management
    // -----------------------------------------------------------------------

    pub fn update_tab(&mut self, next: MenuItem) {
        if self.state.active_tab == next {
            return;
        }
        self.state.previous_tab = self.state.active_tab;
        self.state.active_tab = next;
        self.state.status = None;
        if matches!(next, MenuItem::Setup | MenuItem::Groups)
            && self.state.setup.groups.is_empty()
        {
            self.state.setup.regenerate();
        }
    }

    pub fn exit_help(&mut self) {
        if self.state.active_tab == MenuItem::Help {
            self.state.active_tab = self.state.previous_tab;
        }
    }

    pub fn toggle_show_logs(&mut self) {
        self.state.show_logs = !self.state.show_logs;
    }

    pub fn toggle_full_screen(&mut self) {
        self.settings.full_screen = !self.settings.full_screen;
    }

    pub fn dismiss_intro(&mut self) {
        self.state.show_intro = false;
    }

    // -----------------------------------------------------------------------
    // Setup editor wiring
    // -----------------------------------------------------------------------

    /// Point the setup editor at a category and pull in any saved drafts.
    pub fn open_setup_for(&mut self, category: &TournamentCategory) {
        self.state.setup.open_category(category);
        match self.load_drafts() {
            Ok(true) => self.state.status = Some("Draft loaded".to_string()),
            Ok(false) => {}
            Err(e) => self.state.last_error = Some(e),
        }
    }

    /// Persist the setup + groups drafts for the current tournament.
    pub fn save_drafts(&mut self) -> Result<(), String> {
        let Some(event_id) = self.state.setup.event_id.or_else(|| {
            self.state.events.selected_event().map(|e| e.id)
        }) else {
            return Err("No tournament selected — pick an event first".to_string());
        };
        drafts::save_setup_draft(event_id, &self.state.setup.to_setup_draft())?;
        drafts::save_groups_draft(event_id, &self.state.setup.to_groups_draft())?;
        drafts::save_matches_draft(event_id, &self.state.setup.to_matches_draft())?;
        self.state.setup.dirty = false;
        self.state.status = Some(format!("Drafts saved for event {event_id}"));
        Ok(())
    }

    /// Load drafts for the current tournament. Returns true when anything
    /// was restored.
    pub fn load_drafts(&mut self) -> Result<bool, String> {
        let Some(event_id) = self.state.setup.event_id.or_else(|| {
            self.state.events.selected_event().map(|e| e.id)
        }) else {
            return Err("No tournament selected — pick an event first".to_string());
        };
        let mut restored = false;
        if let Some(setup) = drafts::load_setup_draft(event_id)? {
            self.state.setup.apply_setup_draft(setup);
            restored = true;
        }
        if let Some(groups) = drafts::load_groups_draft(event_id)? {
            self.state.setup.apply_groups_draft(groups);
            restored = true;
        }
        if let Some(matches) = drafts::load_matches_draft(event_id)? {
            log::info!(
                "{} drafted fixture(s) on disk for event {event_id}",
                matches.matches.len()
            );
        }
        Ok(restored)
    }

    // -----------------------------------------------------------------------
    // Selection helpers for key handling
    // -----------------------------------------------------------------------

    pub fn selected_event_id(&self) -> Option<i64> {
        self.state.events.selected_event().map(|e| e.id)
    }

    pub fn selected_category_id(&self) -> Option<i64> {
        self.state.categories.selected_category().map(|c| c.id)
    }
}
