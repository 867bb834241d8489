use crate::config::env::{self, EnvKey};
use crate::modules::course::heuristics::ComposerRules;
use std::str::FromStr;
use uuid::Uuid;

/// Creator used for requests that carry no creator header.
pub const DEFAULT_DEMO_CREATOR_ID: Uuid = Uuid::from_u128(0x0000_0000_0000_4000_8000_0000_0000_0001);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppRole {
    Api,
    Worker,
    All,
}

impl AppRole {
    pub fn serves_http(&self) -> bool {
        matches!(self, AppRole::Api | AppRole::All)
    }

    pub fn runs_workers(&self) -> bool {
        matches!(self, AppRole::Worker | AppRole::All)
    }
}

impl FromStr for AppRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "api" => Ok(AppRole::Api),
            "worker" => Ok(AppRole::Worker),
            "all" => Ok(AppRole::All),
            other => Err(format!("unknown APP_ROLE '{}'", other)),
        }
    }
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub server_port: u16,
    pub database_url: String,
    pub rabbitmq_url: Option<String>,
    pub role: AppRole,
    pub worker_concurrency: usize,
    pub dispatch_capacity: usize,
    pub run_migrations: bool,
    pub demo_creator_id: Uuid,
    pub composer: ComposerRules,
}

impl AppConfig {
    pub fn new() -> Result<Self, std::env::VarError> {
        let defaults = ComposerRules::default();
        let composer = ComposerRules {
            topic_min_chars: env::get_parsed(EnvKey::TopicMinChars, defaults.topic_min_chars),
            title_max_chars: env::get_parsed(EnvKey::CourseTitleMaxChars, defaults.title_max_chars),
            ..defaults
        };

        Ok(Self {
            server_port: env::get_parsed(EnvKey::ServerPort, 3000),
            database_url: env::get(EnvKey::DatabaseUrl)?,
            rabbitmq_url: env::get_optional(EnvKey::RabbitMqUrl),
            role: env::get_or(EnvKey::AppRole, "all").parse().unwrap_or(AppRole::All),
            worker_concurrency: env::get_parsed(EnvKey::WorkerConcurrency, 2usize).max(1),
            dispatch_capacity: env::get_parsed(EnvKey::DispatchCapacity, 1024usize).max(1),
            run_migrations: env::get_parsed(EnvKey::RunMigrations, true),
            demo_creator_id: env::get_parsed(EnvKey::DemoCreatorId, DEFAULT_DEMO_CREATOR_ID),
            composer,
        })
    }

    /// Configuration for in-process use without any environment.
    #[cfg(test)]
    pub fn for_tests() -> Self {
        Self {
            server_port: 0,
            database_url: String::new(),
            rabbitmq_url: None,
            role: AppRole::All,
            worker_concurrency: 1,
            dispatch_capacity: 16,
            run_migrations: false,
            demo_creator_id: DEFAULT_DEMO_CREATOR_ID,
            composer: ComposerRules::default(),
        }
    }
}
