use log::LevelFilter;

#[derive(Debug, Default, Clone)]
pub struct AppSettings {
    pub full_screen: bool,
    pub log_level: Option<LevelFilter>,
}

impl AppSettings {
    pub fn load() -> Self {
        let log_level = std::env::var("MATCHFLOW_LOG")
            .ok()
            .and_then(|raw| raw.trim().parse::<LevelFilter>().ok());
        Self { full_screen: false, log_level }
    }
}
