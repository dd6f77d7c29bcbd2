use config::{Config, ConfigError, Environment, File};
use once_cell::sync::OnceCell;
use std::env;
use std::path::PathBuf;
pub mod models;
pub use models::*;

/// Loads the application configuration.
///
/// Sources, later ones winning: `config/default`, `config/{RUN_ENV}`,
/// then environment variables with the `DIALBRIDGE` prefix (nested keys use
/// `__`, e.g. `DIALBRIDGE_TWILIO__ACCOUNT_SID`). The classic `TWILIO_*`
/// variable names are honored as a final fallback so a stock Twilio `.env`
/// works unchanged.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    ensure_dotenv_loaded();

    let run_env = env::var("RUN_ENV").unwrap_or_else(|_| "debug".to_string());
    let prefix = env::var("PREFIX").unwrap_or_else(|_| "DIALBRIDGE".to_string());

    let workspace_root = workspace_root();
    let default_path = workspace_root.join("config/default");
    let env_path = workspace_root.join(format!("config/{}", run_env));

    let builder = Config::builder()
        .add_source(File::from(default_path).required(false))
        .add_source(File::from(env_path).required(false))
        .add_source(Environment::with_prefix(&prefix).separator("__"));

    let mut raw_config: AppConfig = builder.build()?.try_deserialize()?;
    apply_legacy_twilio_env(&mut raw_config);
    Ok(raw_config)
}

// Under cargo the manifest dir is crates/dialbridge_config; two levels up is
// the workspace root where config/ lives. Outside cargo, fall back to CWD.
fn workspace_root() -> PathBuf {
    let manifest_dir = PathBuf::from(
        env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".to_string()),
    );
    manifest_dir
        .ancestors()
        .nth(2)
        .map(|root| root.to_path_buf())
        .unwrap_or(manifest_dir)
}

/// Fills unset Twilio fields from the legacy `TWILIO_*` environment names.
pub fn apply_legacy_twilio_env(config: &mut AppConfig) {
    let section = config.twilio.get_or_insert_with(TwilioConfig::default);
    fallback_env(&mut section.account_sid, "TWILIO_ACCOUNT_SID");
    fallback_env(&mut section.auth_token, "TWILIO_AUTH_TOKEN");
    fallback_env(&mut section.phone_number, "TWILIO_PHONE_NUMBER");
    fallback_env(&mut section.app_sid, "TWILIO_APP_SID");
    fallback_env(&mut section.service_url, "TWILIO_SERVICE_URL");
}

fn fallback_env(field: &mut Option<String>, var: &str) {
    let is_blank = field.as_deref().map_or(true, |value| value.trim().is_empty());
    if is_blank {
        if let Ok(value) = env::var(var) {
            if !value.trim().is_empty() {
                *field = Some(value);
            }
        }
    }
}

static INIT_DOTENV: OnceCell<()> = OnceCell::new();

/// Ensures the `.env` file is loaded into the process environment exactly
/// once. `DOTENV_OVERRIDE` selects an alternative file.
pub fn ensure_dotenv_loaded() {
    INIT_DOTENV.get_or_init(|| {
        let dotenv_path =
            env::var("DOTENV_OVERRIDE").unwrap_or_else(|_| ".env".to_string());
        dotenv::from_filename(&dotenv_path).ok();
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> AppConfig {
        AppConfig {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
            },
            twilio: None,
            logging: None,
        }
    }

    #[test]
    fn legacy_env_names_populate_an_empty_section() {
        env::set_var("TWILIO_ACCOUNT_SID", "AC_legacy");
        env::set_var("TWILIO_AUTH_TOKEN", "token_legacy");

        let mut config = base_config();
        apply_legacy_twilio_env(&mut config);

        let twilio = config.twilio.expect("section created by fallback");
        assert_eq!(twilio.account_sid.as_deref(), Some("AC_legacy"));
        assert_eq!(twilio.auth_token.as_deref(), Some("token_legacy"));

        env::remove_var("TWILIO_ACCOUNT_SID");
        env::remove_var("TWILIO_AUTH_TOKEN");
    }

    #[test]
    fn explicit_values_win_over_legacy_env() {
        env::set_var("TWILIO_PHONE_NUMBER", "+15559999999");

        let mut config = base_config();
        config.twilio = Some(TwilioConfig {
            phone_number: Some("+15550001111".to_string()),
            ..Default::default()
        });
        apply_legacy_twilio_env(&mut config);

        assert_eq!(
            config.twilio.unwrap().phone_number.as_deref(),
            Some("+15550001111")
        );

        env::remove_var("TWILIO_PHONE_NUMBER");
    }
}
