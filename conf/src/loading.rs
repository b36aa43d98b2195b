//! Load configuration from files and the environment.
use std::fs::File;
use std::path::PathBuf;

use anyhow::Context;
use anyhow::Result;

use crate::Conf;

/// Environment variable overriding the configured Datadog site.
const ENV_SITE: &str = "DOGSYNC_SITE";

/// Environment variable overriding the configured API key.
const ENV_API_KEY: &str = "DOGSYNC_API_KEY";

/// Environment variable overriding the configured application key.
const ENV_APP_KEY: &str = "DOGSYNC_APP_KEY";

/// Errors handling dogsync configuration.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Unable to decode configuration from file at the given path.
    #[error("unable to decode configuration from file at '{0}'")]
    // (path,)
    Decode(String),

    /// A required configuration value is missing.
    #[error("required configuration value '{0}' is missing, set it in the configuration file or the '{1}' environment variable")]
    // (key, env_var)
    Missing(&'static str, &'static str),

    /// Unable to read configuration file at the given path.
    #[error("unable to read configuration file at '{0}'")]
    // (path,)
    Open(String),
}

/// Load process configuration from the specified path.
///
/// When no file exists at the path the default configuration is returned so
/// credential values can be provided through the environment alone.
pub fn load(path: &str) -> Result<Conf> {
    if !PathBuf::from(path).exists() {
        return Ok(Conf::default());
    }
    let file = File::open(path).with_context(|| Error::Open(path.into()))?;
    let conf = serde_yaml::from_reader(file).with_context(|| Error::Decode(path.into()))?;
    Ok(conf)
}

impl Conf {
    /// Override credential values from the process environment.
    pub fn with_env_overrides(self) -> Conf {
        self.with_overrides(|variable| std::env::var(variable).ok())
    }

    /// Fail unless every value the connector cannot run without is set.
    pub fn validate(&self) -> Result<()> {
        if self.site.is_empty() {
            anyhow::bail!(Error::Missing("site", ENV_SITE));
        }
        if self.api_key.is_empty() {
            anyhow::bail!(Error::Missing("api_key", ENV_API_KEY));
        }
        if self.app_key.is_empty() {
            anyhow::bail!(Error::Missing("app_key", ENV_APP_KEY));
        }
        Ok(())
    }

    fn with_overrides<F>(mut self, lookup: F) -> Conf
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(site) = lookup(ENV_SITE) {
            self.site = site;
        }
        if let Some(api_key) = lookup(ENV_API_KEY) {
            self.api_key = api_key;
        }
        if let Some(app_key) = lookup(ENV_APP_KEY) {
            self.app_key = app_key;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use crate::Conf;
    use crate::LogLevel;
    use crate::LogMode;

    #[test]
    fn decode_from_yaml() {
        let conf: Conf = serde_yaml::from_str(
            r#"
site: datadoghq.eu
api_key: api
app_key: app
log:
  level: debug
  mode: json
"#,
        )
        .expect("the configuration to decode");
        assert_eq!(conf.site, "datadoghq.eu");
        assert_eq!(conf.log.level, LogLevel::Debug);
        assert_eq!(conf.log.mode, LogMode::Json);
    }

    #[test]
    fn defaults_apply() {
        let conf: Conf = serde_yaml::from_str("site: datadoghq.com").expect("decode to succeed");
        assert_eq!(conf.api_key, "");
        assert_eq!(conf.log.level, LogLevel::Info);
        assert_eq!(conf.log.mode, LogMode::Term);
    }

    #[test]
    fn environment_overrides_credentials() {
        let conf = Conf {
            site: "datadoghq.com".to_string(),
            api_key: "from-file".to_string(),
            ..Default::default()
        };
        let conf = conf.with_overrides(|variable| match variable {
            "DOGSYNC_API_KEY" => Some("from-env".to_string()),
            "DOGSYNC_APP_KEY" => Some("app-from-env".to_string()),
            _ => None,
        });
        assert_eq!(conf.site, "datadoghq.com");
        assert_eq!(conf.api_key, "from-env");
        assert_eq!(conf.app_key, "app-from-env");
    }

    #[test]
    fn validate_reports_missing_values() {
        let conf = Conf {
            site: "datadoghq.com".to_string(),
            api_key: "api".to_string(),
            ..Default::default()
        };
        let error = match conf.validate() {
            Err(error) => error,
            Ok(_) => panic!("expected validation to fail"),
        };
        assert_eq!(
            error.to_string(),
            "required configuration value 'app_key' is missing, set it in the configuration file or the 'DOGSYNC_APP_KEY' environment variable",
        );
    }

    #[test]
    fn validate_accepts_complete_configuration() {
        let conf = Conf {
            site: "datadoghq.com".to_string(),
            api_key: "api".to_string(),
            app_key: "app".to_string(),
            ..Default::default()
        };
        conf.validate().expect("the configuration to be valid");
    }
}
