use config::ConfigError;

#[derive(serde::Deserialize, Clone)]
pub struct Settings {
    pub database: DatabaseSettings,
    pub application: ApplicationSettings,
    pub jwt: JwtSettings,
}

#[derive(serde::Deserialize, Clone)]
pub struct ApplicationSettings {
    pub port: u16,
}

#[derive(serde::Deserialize, Clone)]
pub struct DatabaseSettings {
    pub username: String,
    pub password: String,
    pub port: u16,
    pub host: String,
    pub database_name: String,
}

impl DatabaseSettings {
    pub fn connection_string(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}",
            self.username, self.password, self.host, self.port, self.database_name
        )
    }

    pub fn connection_string_without_db(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}",
            self.username, self.password, self.host, self.port
        )
    }
}

/// JWT authentication settings
///
/// Constructed once at startup and handed to the token issuer and the
/// request gate by reference; there is no process-wide mutable singleton.
#[derive(serde::Deserialize, Clone)]
pub struct JwtSettings {
    pub issuer: String,
    pub audience: String,
    pub key: String,
    pub access_token_expire_minutes: i64,
    pub refresh_token_expire_days: i64,
}

impl JwtSettings {
    /// All fields are required; an empty issuer/audience/key or a
    /// non-positive lifetime refuses to start the process.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.issuer.trim().is_empty() {
            return Err(ConfigError::Message("jwt.issuer must not be empty".into()));
        }
        if self.audience.trim().is_empty() {
            return Err(ConfigError::Message(
                "jwt.audience must not be empty".into(),
            ));
        }
        if self.key.trim().is_empty() {
            return Err(ConfigError::Message("jwt.key must not be empty".into()));
        }
        if self.access_token_expire_minutes <= 0 {
            return Err(ConfigError::Message(
                "jwt.access_token_expire_minutes must be positive".into(),
            ));
        }
        if self.refresh_token_expire_days <= 0 {
            return Err(ConfigError::Message(
                "jwt.refresh_token_expire_days must be positive".into(),
            ));
        }
        Ok(())
    }
}

pub fn get_configuration() -> Result<Settings, ConfigError> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("configuration").required(false))
        .add_source(config::Environment::with_prefix("APP").separator("__"))
        .build()?;
    let settings = settings.try_deserialize::<Settings>()?;
    settings.jwt.validate()?;
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_jwt_settings() -> JwtSettings {
        JwtSettings {
            issuer: "task-manager-api".to_string(),
            audience: "task-manager-api".to_string(),
            key: "test-signing-key-at-least-32-characters-long".to_string(),
            access_token_expire_minutes: 30,
            refresh_token_expire_days: 1,
        }
    }

    #[test]
    fn valid_settings_pass_validation() {
        assert!(valid_jwt_settings().validate().is_ok());
    }

    #[test]
    fn empty_key_is_rejected() {
        let mut settings = valid_jwt_settings();
        settings.key = "".to_string();
        assert!(settings.validate().is_err());
    }

    #[test]
    fn blank_issuer_is_rejected() {
        let mut settings = valid_jwt_settings();
        settings.issuer = "   ".to_string();
        assert!(settings.validate().is_err());
    }

    #[test]
    fn non_positive_lifetimes_are_rejected() {
        let mut settings = valid_jwt_settings();
        settings.access_token_expire_minutes = 0;
        assert!(settings.validate().is_err());

        let mut settings = valid_jwt_settings();
        settings.refresh_token_expire_days = -1;
        assert!(settings.validate().is_err());
    }
}
