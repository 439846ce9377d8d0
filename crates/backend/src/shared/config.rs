use once_cell::sync::OnceCell;
use serde::Deserialize;
use std::path::{Path, PathBuf};

static CONFIG: OnceCell<Config> = OnceCell::new();

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub tax: TaxConfig,
    pub notifications: NotificationsConfig,
    pub email: EmailConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DatabaseConfig {
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: "target/db/rental.db".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,
    /// Каталог со статикой фронтенда (trunk dist)
    pub static_dir: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            static_dir: "dist".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AuthConfig {
    pub access_token_hours: i64,
    pub refresh_token_days: i64,
    /// Неудачных входов подряд до блокировки
    pub max_failed_logins: i64,
    pub lockout_minutes: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            access_token_hours: 24,
            refresh_token_days: 30,
            max_failed_logins: 5,
            lockout_minutes: 15,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct TaxConfig {
    pub vat_rate: f64,
    pub income_tax_rate: f64,
}

impl Default for TaxConfig {
    fn default() -> Self {
        Self {
            vat_rate: 0.15,
            income_tax_rate: 0.20,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct NotificationsConfig {
    /// Период фоновой проверки правил, секунд (0 = воркер выключен)
    pub check_interval_seconds: u64,
    pub insurance_warning_days: i64,
    pub registration_warning_days: i64,
    pub service_warning_km: i64,
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            check_interval_seconds: 300,
            insurance_warning_days: 30,
            registration_warning_days: 30,
            service_warning_km: 500,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct EmailConfig {
    /// HTTP-шлюз для отправки писем. Без него письма только пишутся в лог.
    pub webhook_url: Option<String>,
    pub from: String,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            webhook_url: None,
            from: "noreply@rental.local".to_string(),
        }
    }
}

/// Default configuration embedded in the binary
const DEFAULT_CONFIG: &str = r#"
[database]
path = "target/db/rental.db"

[server]
port = 3000
static_dir = "dist"
"#;

/// Load configuration from config.toml file
///
/// Search order:
/// 1. Next to the executable (for production)
/// 2. Falls back to embedded default config
pub fn load_config() -> anyhow::Result<Config> {
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            let config_path = exe_dir.join("config.toml");

            if config_path.exists() {
                tracing::info!("Loading config from: {}", config_path.display());
                let contents = std::fs::read_to_string(&config_path)?;
                return parse_config(&contents);
            } else {
                tracing::warn!("config.toml not found at: {}", config_path.display());
            }
        }
    }

    tracing::info!("Using default embedded configuration");
    parse_config(DEFAULT_CONFIG)
}

fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let config: Config = toml::from_str(contents)?;
    Ok(config)
}

/// Загружает конфигурацию один раз за процесс и кладёт её в глобальную ячейку
pub fn init() -> anyhow::Result<&'static Config> {
    if let Some(cfg) = CONFIG.get() {
        return Ok(cfg);
    }
    let cfg = load_config()?;
    Ok(CONFIG.get_or_init(|| cfg))
}

/// Текущая конфигурация. До `init()` возвращает значения по умолчанию.
pub fn get() -> &'static Config {
    CONFIG.get_or_init(Config::default)
}

/// Get the database file path from configuration
/// Resolves relative paths relative to the executable directory
pub fn get_database_path(config: &Config) -> anyhow::Result<PathBuf> {
    resolve_near_exe(&config.database.path)
}

/// Каталог статики фронтенда относительно исполняемого файла
pub fn get_static_dir(config: &Config) -> anyhow::Result<PathBuf> {
    resolve_near_exe(&config.server.static_dir)
}

fn resolve_near_exe(raw: &str) -> anyhow::Result<PathBuf> {
    let path = Path::new(raw);

    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            return Ok(exe_dir.join(path));
        }
    }

    Ok(PathBuf::from(raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_loads() {
        let config = parse_config(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.database.path, "target/db/rental.db");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.auth.max_failed_logins, 5);
        assert!(config.email.webhook_url.is_none());
    }

    #[test]
    fn test_partial_sections_use_defaults() {
        let config = parse_config(
            r#"
[tax]
vat_rate = 0.1

[notifications]
check_interval_seconds = 0
"#,
        )
        .unwrap();
        assert_eq!(config.tax.vat_rate, 0.1);
        assert_eq!(config.tax.income_tax_rate, 0.20);
        assert_eq!(config.notifications.check_interval_seconds, 0);
        assert_eq!(config.notifications.insurance_warning_days, 30);
        assert_eq!(config.database.path, "target/db/rental.db");
    }

    #[test]
    fn test_absolute_path_kept() {
        let mut config = Config::default();
        config.database.path = if cfg!(windows) {
            "C:/data/rental.db".to_string()
        } else {
            "/var/lib/rental.db".to_string()
        };
        let resolved = get_database_path(&config).unwrap();
        assert!(resolved.is_absolute());
        assert!(resolved.ends_with("rental.db"));
    }
}
