//! Layered configuration loading
//!
//! Files are merged in order, later layers winning, and `PUSH_RELAY_*`
//! environment variables are applied last.

use std::path::{Path, PathBuf};

use config::builder::{ConfigBuilder, DefaultState};
use config::{Config, Environment, File, FileFormat};

use crate::config::environment::Environment as AppEnvironment;
use crate::config::error::ConfigError;
use crate::config::settings::Settings;

/// Directory holding `default.toml` and its overlays
const CONFIG_DIR_ENV: &str = "PUSH_RELAY_CONFIG_DIR";

/// Single file replacing the layered directory
const CONFIG_FILE_ENV: &str = "PUSH_RELAY_CONFIG_FILE";

const DEFAULT_CONFIG_DIR: &str = "config";

/// `PUSH_RELAY_SERVER__PORT` maps to `server.port`
const ENV_PREFIX: &str = "PUSH_RELAY";
const ENV_SEPARATOR: &str = "__";

type Builder = ConfigBuilder<DefaultState>;

/// One configuration file and whether its absence is an error
struct FileLayer {
    path: PathBuf,
    required: bool,
}

/// Loads [`Settings`] from TOML files plus environment overrides.
///
/// Directory mode reads `default.toml` (required), then `{environment}.toml`
/// and `local.toml` when present. File mode reads only the given file.
#[derive(Debug)]
pub struct ConfigLoader {
    config_dir: PathBuf,
    config_file: Option<PathBuf>,
    environment: AppEnvironment,
}

impl ConfigLoader {
    /// Loader driven by `PUSH_RELAY_CONFIG_DIR`, `PUSH_RELAY_CONFIG_FILE`
    /// and `PUSH_RELAY_APP_ENV`.
    ///
    /// # Errors
    ///
    /// Fails when both the directory and the file variable are set.
    pub fn new() -> Result<Self, ConfigError> {
        let dir_var = std::env::var(CONFIG_DIR_ENV).ok();
        let config_file = std::env::var(CONFIG_FILE_ENV).ok().map(PathBuf::from);

        if dir_var.is_some() && config_file.is_some() {
            return Err(ConfigError::mutual_exclusivity(
                "PUSH_RELAY_CONFIG_DIR and PUSH_RELAY_CONFIG_FILE cannot both be set. \
                 Use PUSH_RELAY_CONFIG_DIR for layered configuration or \
                 PUSH_RELAY_CONFIG_FILE for a single configuration file.",
            ));
        }

        Ok(Self {
            config_dir: dir_var
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_DIR)),
            config_file,
            environment: AppEnvironment::from_env(),
        })
    }

    /// Loader that reads a single configuration file
    ///
    /// Environment variable overrides still apply on top of the file.
    pub fn from_file(path: impl Into<PathBuf>) -> Self {
        Self {
            config_dir: PathBuf::from(DEFAULT_CONFIG_DIR),
            config_file: Some(path.into()),
            environment: AppEnvironment::from_env(),
        }
    }

    /// Override the environment used to pick `{environment}.toml`
    pub fn with_environment(mut self, environment: AppEnvironment) -> Self {
        self.environment = environment;
        self
    }

    pub fn environment(&self) -> AppEnvironment {
        self.environment
    }

    /// Merge every source, deserialize and validate.
    ///
    /// # Errors
    ///
    /// Missing required file, unparsable TOML, a value of the wrong type, or
    /// a setting rejected by [`Settings::validate`].
    pub fn load(&self) -> Result<Settings, ConfigError> {
        let settings: Settings = self.build_config()?.try_deserialize().map_err(|e| {
            ConfigError::ParseError(format!("Failed to deserialize configuration: {}", e))
        })?;

        settings.validate()?;
        Ok(settings)
    }

    fn file_layers(&self) -> Vec<FileLayer> {
        if let Some(file) = &self.config_file {
            return vec![FileLayer {
                path: file.clone(),
                required: true,
            }];
        }

        let overlay = format!("{}.toml", self.environment.as_str());
        [("default.toml", true), (overlay.as_str(), false), ("local.toml", false)]
            .into_iter()
            .map(|(name, required)| FileLayer {
                path: self.config_dir.join(name),
                required,
            })
            .collect()
    }

    fn build_config(&self) -> Result<Config, ConfigError> {
        let builder = self
            .file_layers()
            .into_iter()
            .try_fold(Config::builder(), |builder, layer| {
                add_file_source(builder, &layer.path, layer.required)
            })?;

        add_env_source(builder).build().map_err(ConfigError::from)
    }
}

fn add_file_source(builder: Builder, path: &Path, required: bool) -> Result<Builder, ConfigError> {
    if required && !path.is_file() {
        return Err(ConfigError::file_not_found(format!(
            "Required configuration file not found: {}",
            path.display()
        )));
    }

    let source = File::new(&path.to_string_lossy(), FileFormat::Toml).required(required);
    Ok(builder.add_source(source))
}

fn add_env_source(builder: Builder) -> Builder {
    builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator(ENV_SEPARATOR)
            .ignore_empty(true)
            .try_parsing(true),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::Mutex;
    use tempfile::TempDir;

    // Tests touching process environment variables must not interleave
    static TEST_MUTEX: Mutex<()> = Mutex::new(());

    const DEFAULT_CONFIG: &str = r#"
[application]
name = "push-relay"

[server]
host = "127.0.0.1"
port = 3000

[logger]
level = "info"

[firebase]
project_id = "default-project"
users_collection = "users"

[notifications.direct]
default_title = "Test"
"#;

    fn setup_config_dir(files: &[(&str, &str)]) -> TempDir {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        for (name, content) in files {
            fs::write(temp_dir.path().join(name), content).expect("Failed to write config file");
        }
        temp_dir
    }

    /// Sets environment variables for the duration of a test and restores them on drop
    struct EnvGuard {
        vars_to_restore: Vec<(String, Option<String>)>,
    }

    impl EnvGuard {
        fn new() -> Self {
            Self {
                vars_to_restore: Vec::new(),
            }
        }

        fn set(&mut self, key: &str, value: &str) {
            self.vars_to_restore
                .push((key.to_string(), std::env::var(key).ok()));
            unsafe {
                std::env::set_var(key, value);
            }
        }

        fn remove(&mut self, key: &str) {
            self.vars_to_restore
                .push((key.to_string(), std::env::var(key).ok()));
            unsafe {
                std::env::remove_var(key);
            }
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            for (key, original_value) in self.vars_to_restore.iter().rev() {
                unsafe {
                    match original_value {
                        Some(value) => std::env::set_var(key, value),
                        None => std::env::remove_var(key),
                    }
                }
            }
        }
    }

    fn clean_env() -> EnvGuard {
        let mut env = EnvGuard::new();
        env.remove(CONFIG_DIR_ENV);
        env.remove(CONFIG_FILE_ENV);
        env.remove(AppEnvironment::ENV_VAR);
        env.remove("PUSH_RELAY_SERVER__PORT");
        env.remove("PUSH_RELAY_FIREBASE__PROJECT_ID");
        env
    }

    #[test]
    fn test_config_loader_new_default() {
        let _guard = TEST_MUTEX.lock().unwrap();
        let _env = clean_env();

        let loader = ConfigLoader::new().expect("Should create loader");
        assert_eq!(loader.config_dir, PathBuf::from("config"));
        assert!(loader.config_file.is_none());
        assert_eq!(loader.environment(), AppEnvironment::Development);
    }

    #[test]
    fn test_config_loader_mutual_exclusivity_error() {
        let _guard = TEST_MUTEX.lock().unwrap();
        let mut env = clean_env();
        env.set(CONFIG_DIR_ENV, "/custom/config");
        env.set(CONFIG_FILE_ENV, "/path/to/config.toml");

        match ConfigLoader::new() {
            Err(ConfigError::MutualExclusivityError(msg)) => {
                assert!(msg.contains("PUSH_RELAY_CONFIG_DIR"));
                assert!(msg.contains("PUSH_RELAY_CONFIG_FILE"));
            }
            other => panic!("Expected MutualExclusivityError, got {:?}", other),
        }
    }

    #[test]
    fn test_load_missing_default_toml() {
        let _guard = TEST_MUTEX.lock().unwrap();
        let mut env = clean_env();
        let temp_dir = setup_config_dir(&[]);
        env.set(CONFIG_DIR_ENV, temp_dir.path().to_str().unwrap());

        let result = ConfigLoader::new().unwrap().load();
        match result {
            Err(ConfigError::FileNotFound(msg)) => assert!(msg.contains("default.toml")),
            other => panic!("Expected FileNotFound error, got {:?}", other),
        }
    }

    #[test]
    fn test_load_full_precedence_chain() {
        let _guard = TEST_MUTEX.lock().unwrap();
        let mut env = clean_env();

        let production = r#"
[server]
host = "0.0.0.0"
port = 8080

[firebase]
project_id = "prod-project"
"#;
        let local = r#"
[server]
port = 9000
"#;
        let temp_dir = setup_config_dir(&[
            ("default.toml", DEFAULT_CONFIG),
            ("production.toml", production),
            ("local.toml", local),
        ]);
        env.set(CONFIG_DIR_ENV, temp_dir.path().to_str().unwrap());
        env.set(AppEnvironment::ENV_VAR, "production");
        env.set("PUSH_RELAY_FIREBASE__PROJECT_ID", "env-project");

        let settings = ConfigLoader::new().unwrap().load().expect("Should load");

        // environment variable beats every file
        assert_eq!(settings.firebase.project_id, "env-project");
        // local.toml beats production.toml
        assert_eq!(settings.server.port, 9000);
        // production.toml beats default.toml
        assert_eq!(settings.server.host, "0.0.0.0");
        // default.toml and built-in defaults fill the rest
        assert_eq!(settings.firebase.users_collection, "users");
        assert_eq!(settings.firebase.token_field, "fcmToken");
        assert_eq!(
            settings.notifications.direct.default_body,
            "Push from Appwrite"
        );
    }

    #[test]
    fn test_with_environment_overrides_env_var() {
        let _guard = TEST_MUTEX.lock().unwrap();
        let mut env = clean_env();

        let staging = r#"
[server]
port = 7000
"#;
        let temp_dir = setup_config_dir(&[
            ("default.toml", DEFAULT_CONFIG),
            ("staging.toml", staging),
        ]);
        env.set(CONFIG_DIR_ENV, temp_dir.path().to_str().unwrap());
        env.set(AppEnvironment::ENV_VAR, "production");

        let settings = ConfigLoader::new()
            .unwrap()
            .with_environment(AppEnvironment::Staging)
            .load()
            .expect("Should load");
        assert_eq!(settings.server.port, 7000);
    }

    #[test]
    fn test_load_single_file_mode() {
        let _guard = TEST_MUTEX.lock().unwrap();
        let mut env = clean_env();

        let single = r#"
[server]
port = 5000

[firebase]
project_id = "single-project"
client_email = "relay@single-project.iam.gserviceaccount.com"
"#;
        let temp_dir = setup_config_dir(&[("single.toml", single)]);
        env.set("PUSH_RELAY_SERVER__PORT", "5001");

        let settings = ConfigLoader::from_file(temp_dir.path().join("single.toml"))
            .load()
            .expect("Should load");
        assert_eq!(settings.server.port, 5001);
        assert_eq!(settings.firebase.project_id, "single-project");
        assert_eq!(
            settings.firebase.client_email,
            "relay@single-project.iam.gserviceaccount.com"
        );
    }

    #[test]
    fn test_load_rejects_invalid_settings() {
        let _guard = TEST_MUTEX.lock().unwrap();
        let _env = clean_env();

        let invalid = r#"
[notifications.test]
android_priority = "urgent"
"#;
        let temp_dir = setup_config_dir(&[("bad.toml", invalid)]);
        let result = ConfigLoader::from_file(temp_dir.path().join("bad.toml")).load();
        assert!(matches!(
            result,
            Err(ConfigError::ValidationError { ref field, .. }) if field == "notifications.test.android_priority"
        ));
    }
}
