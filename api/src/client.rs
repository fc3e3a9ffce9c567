use crate::wire::{
    CategoryDto, EventDto, LoginRequest, LoginResponse, SubscriptionCategoryDto, SubscriptionDto,
    TeamDto,
};
use crate::{
    CategoryEntry, Discipline, Event, Subscription, SubscriptionStatus, Team, TournamentCategory,
};
use chrono::NaiveDate;
use reqwest::{Client, Method, StatusCode};
use std::fmt;
use std::time::Duration;

pub type ApiResult<T> = Result<T, ApiError>;

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8080/api";

/// MatchFlow backend client.
///
/// Base URL comes from `MATCHFLOW_API_URL`; an initial bearer token may be
/// provided via `MATCHFLOW_TOKEN` or obtained through [`MatchFlowApi::login`].
#[derive(Debug, Clone)]
pub struct MatchFlowApi {
    client: Client,
    base_url: String,
    token: Option<String>,
    timeout: Duration,
}

impl Default for MatchFlowApi {
    fn default() -> Self {
        let base_url = std::env::var("MATCHFLOW_API_URL")
            .ok()
            .filter(|u| !u.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let token = std::env::var("MATCHFLOW_TOKEN")
            .ok()
            .filter(|t| !t.trim().is_empty());
        Self {
            client: Client::builder()
                .user_agent("matchflow/0.1 (terminal tournament admin)")
                .build()
                .unwrap_or_default(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
            timeout: Duration::from_secs(10),
        }
    }
}

#[derive(Debug)]
pub enum ApiError {
    Network(reqwest::Error, String),
    Api(reqwest::Error, String),
    Parsing(reqwest::Error, String),
    /// HTTP 401 — the held token is no longer accepted. The application
    /// reacts by clearing the token and prompting for a fresh login.
    Unauthorized(String),
    NotFound(String),
    Other(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(e, url) => write!(f, "Network error for {url}: {e}"),
            ApiError::Api(e, url) => write!(f, "API error for {url}: {e}"),
            ApiError::Parsing(e, url) => write!(f, "Parse error for {url}: {e}"),
            ApiError::Unauthorized(url) => write!(f, "Unauthorized for {url}: token rejected"),
            ApiError::NotFound(msg) => write!(f, "Not found: {msg}"),
            ApiError::Other(msg) => write!(f, "Error: {msg}"),
        }
    }
}

impl MatchFlowApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Client against an explicit base URL (tests, alternate deployments).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
            ..Self::default()
        }
    }

    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token.filter(|t| !t.trim().is_empty());
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    // -----------------------------------------------------------------------
    // Auth
    // -----------------------------------------------------------------------

    /// Exchange credentials for a bearer token. The token is returned, not
    /// stored — callers decide whether to keep it.
    pub async fn login(&self, email: &str, password: &str) -> ApiResult<String> {
        let body = serde_json::to_value(LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        })
        .map_err(|e| ApiError::Other(format!("encode login request: {e}")))?;
        let raw: LoginResponse = self.request(Method::POST, "/auth/login", Some(body)).await?;
        raw.token
            .or(raw.access_token)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ApiError::Other("login response carried no token".into()))
    }

    // -----------------------------------------------------------------------
    // Events
    // -----------------------------------------------------------------------

    pub async fn fetch_events(&self) -> ApiResult<Vec<Event>> {
        let raw: Vec<EventDto> = self.request(Method::GET, "/events", None).await?;
        Ok(raw.into_iter().map(map_event).collect())
    }

    pub async fn create_event(&self, event: &Event) -> ApiResult<Event> {
        let body = serde_json::to_value(map_event_to_dto(event))
            .map_err(|e| ApiError::Other(format!("encode event: {e}")))?;
        let raw: EventDto = self.request(Method::POST, "/events", Some(body)).await?;
        Ok(map_event(raw))
    }

    // -----------------------------------------------------------------------
    // Tournament categories
    // -----------------------------------------------------------------------

    pub async fn fetch_categories(&self, event_id: i64) -> ApiResult<Vec<TournamentCategory>> {
        let path = format!("/tournament-categories?eventId={event_id}");
        let raw: Vec<CategoryDto> = self.request(Method::GET, &path, None).await?;
        Ok(raw.into_iter().map(map_category).collect())
    }

    /// Create (id 0) or update (id > 0) a category.
    pub async fn save_category(
        &self,
        category: &TournamentCategory,
    ) -> ApiResult<TournamentCategory> {
        let body = serde_json::to_value(map_category_to_dto(category))
            .map_err(|e| ApiError::Other(format!("encode category: {e}")))?;
        let raw: CategoryDto = if category.id > 0 {
            let path = format!("/tournament-categories/{}", category.id);
            self.request(Method::PUT, &path, Some(body)).await?
        } else {
            self.request(Method::POST, "/tournament-categories", Some(body)).await?
        };
        Ok(map_category(raw))
    }

    pub async fn delete_category(&self, id: i64) -> ApiResult<()> {
        let path = format!("/tournament-categories/{id}");
        self.execute(Method::DELETE, &path, None).await.map(|_| ())
    }

    // -----------------------------------------------------------------------
    // Teams
    // -----------------------------------------------------------------------

    pub async fn fetch_teams(&self, category_id: i64) -> ApiResult<Vec<Team>> {
        let path = format!("/teams?categoryId={category_id}");
        let raw: Vec<TeamDto> = self.request(Method::GET, &path, None).await?;
        Ok(raw.into_iter().map(map_team).collect())
    }

    /// Create (id 0) or update (id > 0) a team.
    pub async fn save_team(&self, team: &Team) -> ApiResult<Team> {
        let body = serde_json::to_value(map_team_to_dto(team))
            .map_err(|e| ApiError::Other(format!("encode team: {e}")))?;
        let raw: TeamDto = if team.id > 0 {
            let path = format!("/teams/{}", team.id);
            self.request(Method::PUT, &path, Some(body)).await?
        } else {
            self.request(Method::POST, "/teams", Some(body)).await?
        };
        Ok(map_team(raw))
    }

    pub async fn delete_team(&self, id: i64) -> ApiResult<()> {
        let path = format!("/teams/{id}");
        self.execute(Method::DELETE, &path, None).await.map(|_| ())
    }

    // -----------------------------------------------------------------------
    // Subscriptions
    // -----------------------------------------------------------------------

    /// The caller's own registration for an event.
    pub async fn fetch_subscription(&self, event_id: i64) -> ApiResult<Subscription> {
        let path = format!("/events/{event_id}/subscriptions/me");
        let raw: SubscriptionDto = self.request(Method::GET, &path, None).await?;
        Ok(map_subscription(event_id, raw))
    }

    pub async fn withdraw_subscription(&self, event_id: i64) -> ApiResult<()> {
        let path = format!("/events/{event_id}/subscriptions/me/withdraw");
        self.execute(Method::POST, &path, None).await.map(|_| ())
    }

    // -----------------------------------------------------------------------
    // Request plumbing
    // -----------------------------------------------------------------------

    async fn request<T: serde::de::DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> ApiResult<T> {
        let url = format!("{}{path}", self.base_url);
        let response = self.execute(method, path, body).await?;
        response.json::<T>().await.map_err(|e| ApiError::Parsing(e, url))
    }

    async fn execute(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> ApiResult<reqwest::Response> {
        let url = format!("{}{path}", self.base_url);
        let mut request = self.client.request(method, url.as_str()).timeout(self.timeout);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Network(e, url.clone()))?;

        match response.status() {
            StatusCode::UNAUTHORIZED => Err(ApiError::Unauthorized(url)),
            StatusCode::NOT_FOUND => Err(ApiError::NotFound(url)),
            _ => response.error_for_status().map_err(|e| ApiError::Api(e, url)),
        }
    }
}

// ---------------------------------------------------------------------------
// Mapping: backend wire types → clean domain types
// ---------------------------------------------------------------------------

/// Backend dates arrive as `"2026-05-01"` or with a time suffix; keep the
/// calendar day, drop the rest.
fn parse_date(raw: Option<&str>) -> Option<NaiveDate> {
    let raw = raw?.trim();
    let day = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

fn map_event(dto: EventDto) -> Event {
    Event {
        id: dto.id.unwrap_or_default(),
        name: dto.name.unwrap_or_default(),
        event_type: dto.event_type.unwrap_or_else(|| "tournament".to_string()),
        sport: dto.sport,
        level: dto.level,
        timezone: dto.timezone.unwrap_or_else(|| "UTC".to_string()),
        location_name: dto.location_name,
        start_date: parse_date(dto.start_date.as_deref()),
        end_date: parse_date(dto.end_date.as_deref()),
        registration_deadline: parse_date(dto.registration_deadline.as_deref()),
        capacity: dto.capacity,
        entry_fee: dto.entry_fee,
        currency: dto.currency,
        description: dto.description,
        is_public: dto.is_public.unwrap_or(false),
    }
}

fn map_event_to_dto(event: &Event) -> EventDto {
    EventDto {
        id: (event.id > 0).then_some(event.id),
        name: Some(event.name.clone()),
        event_type: Some(event.event_type.clone()),
        sport: event.sport.clone(),
        level: event.level.clone(),
        timezone: Some(event.timezone.clone()),
        location_name: event.location_name.clone(),
        start_date: event.start_date.map(|d| d.format("%Y-%m-%d").to_string()),
        end_date: event.end_date.map(|d| d.format("%Y-%m-%d").to_string()),
        registration_deadline: event
            .registration_deadline
            .map(|d| d.format("%Y-%m-%d").to_string()),
        capacity: event.capacity,
        entry_fee: event.entry_fee,
        currency: event.currency.clone(),
        description: event.description.clone(),
        is_public: Some(event.is_public),
        ..EventDto::default()
    }
}

fn map_category(dto: CategoryDto) -> TournamentCategory {
    TournamentCategory {
        id: dto.id.unwrap_or_default(),
        event_id: dto.event_id.unwrap_or_default(),
        name: dto.name.unwrap_or_default(),
        discipline: dto
            .discipline
            .as_deref()
            .map(Discipline::parse)
            .unwrap_or_default(),
        groups: dto.groups.unwrap_or(1).max(1),
    }
}

fn map_category_to_dto(category: &TournamentCategory) -> CategoryDto {
    CategoryDto {
        id: (category.id > 0).then_some(category.id),
        event_id: Some(category.event_id),
        name: Some(category.name.clone()),
        discipline: Some(category.discipline.label().to_string()),
        groups: Some(category.groups),
    }
}

fn map_team(dto: TeamDto) -> Team {
    Team {
        id: dto.id.unwrap_or_default(),
        category_id: dto.category_id.unwrap_or_default(),
        name: dto.name.unwrap_or_default(),
        players: dto.players.unwrap_or_default(),
    }
}

fn map_team_to_dto(team: &Team) -> TeamDto {
    TeamDto {
        id: (team.id > 0).then_some(team.id),
        category_id: Some(team.category_id),
        name: Some(team.name.clone()),
        players: Some(team.players.clone()),
    }
}

fn parse_subscription_status(raw: Option<&str>) -> SubscriptionStatus {
    match raw.map(str::trim).map(str::to_lowercase).as_deref() {
        Some("confirmed") => SubscriptionStatus::Confirmed,
        Some("withdrawn") => SubscriptionStatus::Withdrawn,
        _ => SubscriptionStatus::Pending,
    }
}

fn map_subscription(event_id: i64, dto: SubscriptionDto) -> Subscription {
    Subscription {
        event_id: dto.event_id.unwrap_or(event_id),
        status: parse_subscription_status(dto.status.as_deref()),
        categories: dto
            .categories
            .unwrap_or_default()
            .into_iter()
            .map(map_subscription_category)
            .collect(),
    }
}

fn map_subscription_category(dto: SubscriptionCategoryDto) -> CategoryEntry {
    CategoryEntry {
        category_id: dto.category_id.unwrap_or_default(),
        category_name: dto.category_name.unwrap_or_default(),
        partner_preference: dto.partner_preference,
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_date_accepts_plain_and_timestamped() {
        let expected = NaiveDate::from_ymd_opt(2026, 5, 1);
        assert_eq!(parse_date(Some("2026-05-01")), expected);
        assert_eq!(parse_date(Some("2026-05-01T09:30:00Z")), expected);
        assert_eq!(parse_date(Some("soon")), None);
        assert_eq!(parse_date(None), None);
    }

    #[test]
    fn map_event_fills_defaults() {
        let event = map_event(EventDto { name: Some("Spring Open".into()), ..Default::default() });
        assert_eq!(event.name, "Spring Open");
        assert_eq!(event.event_type, "tournament");
        assert_eq!(event.timezone, "UTC");
        assert!(!event.is_public);
    }

    #[test]
    fn map_category_parses_discipline_and_clamps_groups() {
        let category = map_category(CategoryDto {
            id: Some(3),
            name: Some("Open Doubles".into()),
            discipline: Some("Mixed Doubles".into()),
            groups: Some(0),
            ..Default::default()
        });
        assert_eq!(category.discipline, Discipline::MixedDoubles);
        assert_eq!(category.groups, 1, "zero groups clamps to 1");
    }

    #[test]
    fn subscription_status_parsing() {
        assert_eq!(parse_subscription_status(Some("Confirmed")), SubscriptionStatus::Confirmed);
        assert_eq!(parse_subscription_status(Some("withdrawn")), SubscriptionStatus::Withdrawn);
        assert_eq!(parse_subscription_status(Some("???")), SubscriptionStatus::Pending);
        assert_eq!(parse_subscription_status(None), SubscriptionStatus::Pending);
    }

    #[test]
    fn event_dto_round_trip_keeps_dates() {
        let event = Event {
            id: 5,
            name: "Autumn Cup".into(),
            event_type: "tournament".into(),
            timezone: "Europe/Lisbon".into(),
            start_date: NaiveDate::from_ymd_opt(2026, 10, 3),
            is_public: true,
            ..Default::default()
        };
        let back = map_event(map_event_to_dto(&event));
        assert_eq!(back.id, 5);
        assert_eq!(back.start_date, event.start_date);
        assert!(back.is_public);
    }

    // -----------------------------------------------------------------------
    // Endpoint tests against a mock server
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn fetch_events_decodes_backend_payload() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/events")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"[{"id":1,"name":"Spring Open","eventType":"tournament",
                     "timezone":"Europe/Lisbon","startDate":"2026-05-01","isPublic":true}]"#,
            )
            .create_async()
            .await;

        let api = MatchFlowApi::with_base_url(server.url());
        let events = api.fetch_events().await.expect("fetch events");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].name, "Spring Open");
        assert_eq!(events[0].start_date, NaiveDate::from_ymd_opt(2026, 5, 1));
    }

    #[tokio::test]
    async fn fetch_categories_sends_event_id_query() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/tournament-categories?eventId=7")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"id":11,"eventId":7,"name":"Open Singles","discipline":"Singles","groups":4}]"#)
            .create_async()
            .await;

        let api = MatchFlowApi::with_base_url(server.url());
        let categories = api.fetch_categories(7).await.expect("fetch categories");
        assert_eq!(categories.len(), 1);
        assert_eq!(categories[0].event_id, 7);
        assert_eq!(categories[0].groups, 4);
    }

    #[tokio::test]
    async fn unauthorized_maps_to_dedicated_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server.mock("GET", "/events").with_status(401).create_async().await;

        let api = MatchFlowApi::with_base_url(server.url());
        match api.fetch_events().await {
            Err(ApiError::Unauthorized(_)) => {}
            other => panic!("expected Unauthorized, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn login_reads_token_from_either_key() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/auth/login")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"accessToken":"tok_123"}"#)
            .create_async()
            .await;

        let api = MatchFlowApi::with_base_url(server.url());
        let token = api.login("admin@example.com", "hunter2").await.expect("login");
        assert_eq!(token, "tok_123");
    }
}
