use crate::state::messages::{NetworkRequest, NetworkResponse};
use log::{debug, error};
use matchflow_api::client::{ApiError, MatchFlowApi};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::mpsc;

const SPINNER_CHARS: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];
pub const ERROR_CHAR: char = '!';

#[derive(Debug, Copy, Clone)]
pub struct LoadingState {
    pub is_loading: bool,
    pub spinner_char: char,
}

impl Default for LoadingState {
    fn default() -> Self {
        Self { is_loading: false, spinner_char: ' ' }
    }
}

pub struct NetworkWorker {
    client: MatchFlowApi,
    requests: mpsc::Receiver<NetworkRequest>,
    responses: mpsc::Sender<NetworkResponse>,
    is_loading: Arc<AtomicBool>,
}

impl NetworkWorker {
    pub fn new(
        requests: mpsc::Receiver<NetworkRequest>,
        responses: mpsc::Sender<NetworkResponse>,
    ) -> Self {
        Self {
            client: MatchFlowApi::new(),
            requests,
            responses,
            is_loading: Arc::new(AtomicBool::new(false)),
        }
    }

    pub async fn run(mut self) {
        while let Some(request) = self.requests.recv().await {
            self.start_loading_animation().await;

            let result = match request {
                NetworkRequest::LoadEvents => self.handle_load_events().await,
                NetworkRequest::LoadCategories { event_id } => {
                    self.handle_load_categories(event_id).await
                }
                NetworkRequest::LoadTeams { category_id } => {
                    self.handle_load_teams(category_id).await
                }
                NetworkRequest::LoadSubscription { event_id } => {
                    self.handle_load_subscription(event_id).await
                }
                NetworkRequest::WithdrawSubscription { event_id } => {
                    self.handle_withdraw(event_id).await
                }
                NetworkRequest::SaveCategory { category } => {
                    self.handle_save_category(category).await
                }
                NetworkRequest::DeleteTeam { team_id, category_id } => {
                    self.handle_delete_team(team_id, category_id).await
                }
            };

            debug!("network request complete");
            self.stop_loading_animation(result.is_ok()).await;

            let response = match result {
                Ok(response) => response,
                Err(err @ ApiError::Unauthorized(_)) => {
                    // Stop replaying a rejected token; the user logs in again.
                    self.client.set_token(None);
                    NetworkResponse::TokenRejected { message: err.to_string() }
                }
                Err(err) => NetworkResponse::Error { message: err.to_string() },
            };

            if let Err(e) = self.responses.send(response).await {
                error!("Failed to send network response: {e}");
                break;
            }
        }
    }

    async fn handle_load_events(&self) -> Result<NetworkResponse, ApiError> {
        debug!("loading events");
        let events = self.client.fetch_events().await?;
        Ok(NetworkResponse::EventsLoaded { events })
    }

    async fn handle_load_categories(&self, event_id: i64) -> Result<NetworkResponse, ApiError> {
        debug!("loading categories for event {event_id}");
        let categories = self.client.fetch_categories(event_id).await?;
        Ok(NetworkResponse::CategoriesLoaded { event_id, categories })
    }

    async fn handle_load_teams(&self, category_id: i64) -> Result<NetworkResponse, ApiError> {
        debug!("loading teams for category {category_id}");
        let teams = self.client.fetch_teams(category_id).await?;
        Ok(NetworkResponse::TeamsLoaded { category_id, teams })
    }

    async fn handle_load_subscription(&self, event_id: i64) -> Result<NetworkResponse, ApiError> {
        debug!("loading subscription for event {event_id}");
        let subscription = self.client.fetch_subscription(event_id).await?;
        Ok(NetworkResponse::SubscriptionLoaded { subscription })
    }

    async fn handle_withdraw(&self, event_id: i64) -> Result<NetworkResponse, ApiError> {
        debug!("withdrawing subscription for event {event_id}");
        self.client.withdraw_subscription(event_id).await?;
        Ok(NetworkResponse::SubscriptionWithdrawn { event_id })
    }

    async fn handle_save_category(
        &self,
        category: matchflow_api::TournamentCategory,
    ) -> Result<NetworkResponse, ApiError> {
        debug!("saving category {} for event {}", category.name, category.event_id);
        let category = self.client.save_category(&category).await?;
        Ok(NetworkResponse::CategorySaved { category })
    }

    async fn handle_delete_team(
        &self,
        team_id: i64,
        category_id: i64,
    ) -> Result<NetworkResponse, ApiError> {
        debug!("deleting team {team_id}");
        self.client.delete_team(team_id).await?;
        // Re-fetch so the list reflects the deletion.
        let teams = self.client.fetch_teams(category_id).await?;
        Ok(NetworkResponse::TeamsLoaded { category_id, teams })
    }

    async fn start_loading_animation(&self) {
        self.is_loading.store(true, Ordering::Relaxed);

        let mut loading_state = LoadingState { is_loading: true, spinner_char: SPINNER_CHARS[0] };
        let _ = self
            .responses
            .send(NetworkResponse::LoadingStateChanged { loading_state })
            .await;

        let responses = self.responses.clone();
        let is_loading = self.is_loading.clone();

        tokio::spawn(async move {
            let mut spinner_index = 1;
            let mut interval = tokio::time::interval(Duration::from_millis(33));
            loop {
                interval.tick().await;
                if !is_loading.load(Ordering::Relaxed) {
                    break;
                }
                loading_state.spinner_char = SPINNER_CHARS[spinner_index];
                spinner_index = (spinner_index + 1) % SPINNER_CHARS.len();
                let _ = responses
                    .send(NetworkResponse::LoadingStateChanged { loading_state })
                    .await;
            }
        });
    }

    async fn stop_loading_animation(&self, is_ok: bool) {
        self.is_loading.store(false, Ordering::Relaxed);
        tokio::time::sleep(Duration::from_millis(15)).await;

        let spinner_char = if is_ok { ' ' } else { ERROR_CHAR };
        let _ = self
            .responses
            .send(NetworkResponse::LoadingStateChanged {
                loading_state: LoadingState { is_loading: false, spinner_char },
            })
            .await;
    }
}
