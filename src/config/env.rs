use std::env;
use std::str::FromStr;

pub enum EnvKey {
    ServerPort,
    DatabaseUrl,
    RabbitMqUrl,
    AppRole,
    WorkerConcurrency,
    DispatchCapacity,
    RunMigrations,
    DemoCreatorId,
    TopicMinChars,
    CourseTitleMaxChars,
}

impl EnvKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnvKey::ServerPort => "APP_PORT",
            EnvKey::DatabaseUrl => "DATABASE_URL",
            EnvKey::RabbitMqUrl => "RABBITMQ_URL",
            EnvKey::AppRole => "APP_ROLE",
            EnvKey::WorkerConcurrency => "WORKER_CONCURRENCY",
            EnvKey::DispatchCapacity => "DISPATCH_CAPACITY",
            EnvKey::RunMigrations => "RUN_MIGRATIONS",
            EnvKey::DemoCreatorId => "DEMO_CREATOR_ID",
            EnvKey::TopicMinChars => "TOPIC_MIN_CHARS",
            EnvKey::CourseTitleMaxChars => "COURSE_TITLE_MAX_CHARS",
        }
    }
}

pub fn get(key: EnvKey) -> Result<String, env::VarError> {
    env::var(key.as_str())
}

/// Like [`get`], but treats an empty value as unset.
pub fn get_optional(key: EnvKey) -> Option<String> {
    env::var(key.as_str()).ok().filter(|v| !v.trim().is_empty())
}

pub fn get_or(key: EnvKey, default: &str) -> String {
    env::var(key.as_str()).unwrap_or_else(|_| default.to_string())
}

pub fn get_parsed<T: FromStr>(key: EnvKey, default: T) -> T {
    match get(key) {
        Ok(val) => val.parse::<T>().unwrap_or(default),
        Err(_) => default,
    }
}
