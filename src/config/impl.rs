use config::{Config, ConfigError, Environment, File};
use std::sync::OnceLock;

use super::AppConfig;

static APP_CONFIG: OnceLock<AppConfig> = OnceLock::new();

impl AppConfig {
    /// 加载配置
    pub fn load() -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            // 首先加载默认配置文件
            .add_source(File::with_name("config").required(false))
            // 然后根据环境加载特定配置文件
            .add_source(
                File::with_name(&format!(
                    "config.{}",
                    std::env::var("APP_ENV").unwrap_or_else(|_| "development".into())
                ))
                .required(false),
            )
            // 最后加载环境变量覆盖
            .add_source(
                Environment::with_prefix("EVALHUB")
                    .separator("__")
                    .try_parsing(true),
            );

        // 支持从环境变量加载
        builder = builder
            .set_override_option("app.environment", std::env::var("APP_ENV").ok())?
            .set_override_option("app.log_level", std::env::var("RUST_LOG").ok())?
            .set_override_option("server.host", std::env::var("SERVER_HOST").ok())?
            .set_override_option("server.port", std::env::var("SERVER_PORT").ok())?
            .set_override_option("server.unix_socket_path", std::env::var("UNIX_SOCKET").ok())?
            .set_override_option("server.workers", std::env::var("CPU_COUNT").ok())?
            .set_override_option("database.url", std::env::var("DATABASE_URL").ok())?
            .set_override_option("upload.dir", std::env::var("UPLOAD_DIR").ok())?
            .set_override_option(
                "upload.public_base_url",
                std::env::var("PUBLIC_BASE_URL").ok(),
            )?
            .set_override_option("ai.api_key", std::env::var("OPENAI_API_KEY").ok())?
            .set_override_option("ai.base_url", std::env::var("OPENAI_BASE_URL").ok())?
            .set_override_option("ai.model", std::env::var("OPENAI_MODEL").ok())?;

        let config = builder.build()?;
        let mut app_config: AppConfig = config.try_deserialize()?;

        // 处理工作线程数
        if app_config.server.workers == 0 {
            app_config.server.workers = num_cpus::get().min(app_config.server.max_workers);
        }

        app_config.validate()?;
        Ok(app_config)
    }

    /// 校验启动时必须成立的配置项
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.upload.dir.trim().is_empty() {
            return Err(ConfigError::Message("upload.dir must not be empty".into()));
        }
        if self.upload.max_size == 0 {
            return Err(ConfigError::Message(
                "upload.max_size must be greater than 0".into(),
            ));
        }
        if self.upload.max_size > self.server.limits.max_payload_size {
            return Err(ConfigError::Message(format!(
                "upload.max_size ({}) exceeds server.limits.max_payload_size ({})",
                self.upload.max_size, self.server.limits.max_payload_size
            )));
        }
        if !self.ai.base_url.starts_with("http://") && !self.ai.base_url.starts_with("https://") {
            return Err(ConfigError::Message(format!(
                "ai.base_url must be an http(s) URL, got {}",
                self.ai.base_url
            )));
        }
        if self.ai.request_timeout == 0 {
            return Err(ConfigError::Message(
                "ai.request_timeout must be greater than 0".into(),
            ));
        }
        Ok(())
    }

    /// 是否配置了 AI 密钥
    pub fn ai_configured(&self) -> bool {
        !self.ai.api_key.trim().is_empty()
    }

    /// 获取全局配置实例
    pub fn get() -> &'static AppConfig {
        APP_CONFIG.get_or_init(|| {
            Self::load().unwrap_or_else(|e| {
                eprintln!("Failed to load configuration: {e}");
                std::process::exit(1);
            })
        })
    }

    /// 初始化配置 (在应用启动时调用)
    pub fn init() -> Result<(), ConfigError> {
        let config = Self::load()?;
        APP_CONFIG
            .set(config)
            .map_err(|_| ConfigError::Message("Configuration already initialized".to_string()))?;
        Ok(())
    }

    /// 检查是否为生产环境
    pub fn is_production(&self) -> bool {
        self.app.environment == "production"
    }

    /// 检查是否为开发环境
    pub fn is_development(&self) -> bool {
        self.app.environment == "development"
    }

    /// 获取服务器绑定地址
    pub fn server_bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// 获取 Unix 套接字路径 (如果配置了)
    #[cfg(unix)]
    pub fn unix_socket_path(&self) -> Option<&str> {
        if self.server.unix_socket_path.is_empty() {
            None
        } else {
            Some(&self.server.unix_socket_path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> AppConfig {
        let raw = r#"
            [app]
            system_name = "EvalHub"
            environment = "development"
            log_level = "info"

            [server]
            host = "127.0.0.1"
            port = 8080
            unix_socket_path = ""
            workers = 1
            max_workers = 8
            [server.timeouts]
            client_request = 60000
            client_disconnect = 5000
            keep_alive = 30
            [server.limits]
            max_payload_size = 1048576

            [database]
            url = "sqlite::memory:"
            pool_size = 1
            timeout = 5

            [cache]
            type = "moka"
            default_ttl = 60
            [cache.memory]
            max_capacity = 100

            [cors]
            allowed_origins = ["*"]
            allowed_methods = ["GET"]
            allowed_headers = ["*"]
            max_age = 60

            [upload]
            dir = "uploads"
            public_base_url = "http://127.0.0.1:8080/storage"
            max_size = 1024

            [ai]
            base_url = "https://api.openai.com/v1"
            model = "gpt-4o-mini"
            request_timeout = 30
        "#;
        Config::builder()
            .add_source(File::from_str(raw, config::FileFormat::Toml))
            .build()
            .and_then(|c| c.try_deserialize())
            .expect("sample config should deserialize")
    }

    #[test]
    fn test_sample_config_is_valid() {
        let config = sample();
        assert!(config.validate().is_ok());
        assert!(!config.ai_configured());
        assert_eq!(config.server_bind_address(), "127.0.0.1:8080");
    }

    #[test]
    fn test_upload_limit_must_fit_payload_limit() {
        let mut config = sample();
        config.upload.max_size = config.server.limits.max_payload_size + 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_ai_base_url_must_be_http() {
        let mut config = sample();
        config.ai.base_url = "api.openai.com".into();
        assert!(config.validate().is_err());

        config.ai.base_url = "https://api.openai.com/v1".into();
        config.ai.api_key = "sk-test".into();
        assert!(config.ai_configured());
    }
}
