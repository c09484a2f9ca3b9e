//! Trigger configuration (~/.matahari/triggers.toml)
//!
//! The file is optional. Without it the controller runs the built-in Mata Hari
//! table. A file that exists but does not validate stops startup.

use std::{
    env,
    ffi::OsString,
    path::{Path, PathBuf},
};

use log::{info, warn};
use serde::Deserialize;

use crate::{
    db::{self, find_solenoid, find_switch},
    debounce::DEFAULT_DEBOUNCE_TICKS,
    error::ConfigError,
    triggers::{Tick, TriggerRule, TriggerTable},
};

/// Environment variable naming a trigger file to use instead of the default.
pub const CONFIG_ENV: &str = "MATAHARI_TRIGGERS";

/// On-disk layout of the trigger file.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TriggerFile {
    pub debounce_ticks: Option<Tick>,
    pub priority: Vec<RuleEntry>,
    pub debounced: Vec<RuleEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleEntry {
    pub switch: IdOrName,
    pub solenoid: IdOrName,
    pub ticks: u16,
}

/// A switch or solenoid written as `35` or as `"LeftSling"`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum IdOrName {
    Id(u32),
    Name(String),
}

impl IdOrName {
    fn key(&self) -> String {
        match self {
            IdOrName::Id(id) => id.to_string(),
            IdOrName::Name(name) => name.clone(),
        }
    }
}

impl RuleEntry {
    fn resolve(&self) -> Result<TriggerRule, ConfigError> {
        let switch_key = self.switch.key();
        let switch = find_switch(&switch_key).ok_or(ConfigError::UnknownSwitch(switch_key))?;
        let solenoid_key = self.solenoid.key();
        let solenoid =
            find_solenoid(&solenoid_key).ok_or(ConfigError::UnknownSolenoid(solenoid_key))?;
        Ok(TriggerRule::new(switch, solenoid, self.ticks))
    }
}

impl std::str::FromStr for TriggerFile {
    type Err = ConfigError;

    fn from_str(content: &str) -> Result<Self, Self::Err> {
        Ok(toml::from_str(content)?)
    }
}

impl TriggerFile {
    pub fn has_rules(&self) -> bool {
        !self.priority.is_empty() || !self.debounced.is_empty()
    }

    pub fn into_config(self, source: ConfigSource) -> Result<Config, ConfigError> {
        let table = if self.has_rules() {
            let priority = self
                .priority
                .iter()
                .map(RuleEntry::resolve)
                .collect::<Result<Vec<_>, _>>()?;
            let debounced = self
                .debounced
                .iter()
                .map(RuleEntry::resolve)
                .collect::<Result<Vec<_>, _>>()?;
            TriggerTable::new(&priority, &debounced)?
        } else {
            info!("trigger file defines no rules, keeping the built-in table");
            db::mata_hari_triggers()?
        };

        Ok(Config {
            table,
            debounce_ticks: self.debounce_ticks.unwrap_or(DEFAULT_DEBOUNCE_TICKS),
            source,
        })
    }
}

/// Where the active table came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    BuiltIn,
    File(PathBuf),
}

/// Validated controller configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub table: TriggerTable,
    pub debounce_ticks: Tick,
    pub source: ConfigSource,
}

impl Config {
    pub fn built_in() -> Result<Self, ConfigError> {
        Ok(Config {
            table: db::mata_hari_triggers()?,
            debounce_ticks: DEFAULT_DEBOUNCE_TICKS,
            source: ConfigSource::BuiltIn,
        })
    }

    /// Loads the configuration.
    ///
    /// An explicit path wins, then [`CONFIG_ENV`], then the default file in
    /// the home directory. The first two must exist; a missing default file
    /// means the built-in table.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::resolve(path, env::var_os(CONFIG_ENV), dirs::home_dir())
    }

    fn resolve(
        path: Option<&Path>,
        env_path: Option<OsString>,
        home: Option<PathBuf>,
    ) -> Result<Self, ConfigError> {
        if let Some(path) = path {
            return Self::from_file(path);
        }
        if let Some(path) = env_path {
            return Self::from_file(Path::new(&path));
        }
        match home.map(default_path_in) {
            Some(path) if path.exists() => Self::from_file(&path),
            Some(path) => {
                info!("{} not found, using the built-in table", path.display());
                Self::built_in()
            }
            None => {
                warn!("no home directory, using the built-in table");
                Self::built_in()
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        info!("Loading triggers from {}", path.display());
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        content
            .parse::<TriggerFile>()?
            .into_config(ConfigSource::File(path.to_path_buf()))
    }
}

fn default_path_in(home: PathBuf) -> PathBuf {
    home.join(".matahari").join("triggers.toml")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::{Solenoid, Switch};
    use crate::triggers::TriggerClass;
    use std::io::Write;

    fn parse(content: &str) -> Result<Config, ConfigError> {
        content
            .parse::<TriggerFile>()?
            .into_config(ConfigSource::BuiltIn)
    }

    #[test]
    fn names_and_ids_are_accepted() {
        let config = parse(
            r#"
            debounce_ticks = 3

            [[priority]]
            switch = "LeftSling"
            solenoid = 11
            ticks = 5

            [[debounced]]
            switch = 29
            solenoid = "Chime1000"
            ticks = 2
            "#,
        )
        .unwrap();

        assert_eq!(config.debounce_ticks, 3);
        assert_eq!(
            config.table.lookup(Switch::LeftSling),
            Some(TriggerRule::new(Switch::LeftSling, Solenoid::LeftSling, 5))
        );
        let chime = config.table.trigger(Switch::TopBLane).unwrap();
        assert_eq!(chime.class, TriggerClass::Debounced);
        assert_eq!(chime.rule.solenoid, Solenoid::Chime1000);
        assert_eq!(config.table.len(), 2);
    }

    #[test]
    fn empty_file_keeps_built_in_table() {
        let config = parse("debounce_ticks = 4").unwrap();
        assert_eq!(config.debounce_ticks, 4);
        assert_eq!(config.table, db::mata_hari_triggers().unwrap());

        let config = parse("").unwrap();
        assert_eq!(config.debounce_ticks, DEFAULT_DEBOUNCE_TICKS);
    }

    #[test]
    fn unknown_switch_is_rejected() {
        let err = parse(
            r#"
            [[priority]]
            switch = 9999
            solenoid = 11
            ticks = 4
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::UnknownSwitch(key) if key == "9999"));
    }

    #[test]
    fn unknown_solenoid_is_rejected() {
        let err = parse(
            r#"
            [[debounced]]
            switch = "TopALane"
            solenoid = "Chime5"
            ticks = 4
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::UnknownSolenoid(key) if key == "Chime5"));
    }

    #[test]
    fn zero_duration_is_rejected() {
        let err = parse(
            r#"
            [[priority]]
            switch = "Bumper1"
            solenoid = "Bumper1"
            ticks = 0
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::ZeroDuration(Switch::Bumper1)));
    }

    #[test]
    fn negative_duration_does_not_parse() {
        let err = parse(
            r#"
            [[priority]]
            switch = "Bumper1"
            solenoid = "Bumper1"
            ticks = -4
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn duplicate_across_classes_is_rejected() {
        let err = parse(
            r#"
            [[priority]]
            switch = "Bumper2"
            solenoid = "Bumper2"
            ticks = 4

            [[debounced]]
            switch = "Bumper2"
            solenoid = "Chime10"
            ticks = 2
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::ConflictingClass(Switch::Bumper2)));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = parse("debounce = 2").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn loads_from_explicit_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[[priority]]\nswitch = \"RightSling\"\nsolenoid = \"RightSling\"\nticks = 6"
        )
        .unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.source, ConfigSource::File(file.path().to_path_buf()));
        assert_eq!(
            config.table.lookup(Switch::RightSling).map(|r| r.fire_duration_ticks),
            Some(6)
        );
        assert_eq!(config.table.lookup(Switch::LeftSling), None);
    }

    #[test]
    fn missing_explicit_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(Some(&dir.path().join("nope.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    const SLING_ONLY: &str =
        "[[priority]]\nswitch = \"RightSling\"\nsolenoid = \"RightSling\"\nticks = 6\n";

    #[test]
    fn env_path_is_used_when_no_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("env.toml");
        std::fs::write(&path, SLING_ONLY).unwrap();

        let config = Config::resolve(None, Some(path.clone().into_os_string()), None).unwrap();
        assert_eq!(config.source, ConfigSource::File(path));
        assert_eq!(config.table.len(), 1);
    }

    #[test]
    fn explicit_path_beats_env_path() {
        let dir = tempfile::tempdir().unwrap();
        let explicit = dir.path().join("explicit.toml");
        std::fs::write(&explicit, SLING_ONLY).unwrap();
        let missing = dir.path().join("missing.toml").into_os_string();

        let config = Config::resolve(Some(&explicit), Some(missing), None).unwrap();
        assert_eq!(config.source, ConfigSource::File(explicit));
    }

    #[test]
    fn missing_env_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.toml");
        let err = Config::resolve(None, Some(missing.into_os_string()), None).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn default_file_in_home_is_used() {
        let home = tempfile::tempdir().unwrap();
        let path = default_path_in(home.path().to_path_buf());
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, SLING_ONLY).unwrap();

        let config = Config::resolve(None, None, Some(home.path().to_path_buf())).unwrap();
        assert_eq!(config.source, ConfigSource::File(path));
    }

    #[test]
    fn missing_default_file_falls_back_to_built_in() {
        let home = tempfile::tempdir().unwrap();
        let config = Config::resolve(None, None, Some(home.path().to_path_buf())).unwrap();
        assert_eq!(config.source, ConfigSource::BuiltIn);
        assert_eq!(config.table, db::mata_hari_triggers().unwrap());

        let config = Config::resolve(None, None, None).unwrap();
        assert_eq!(config.source, ConfigSource::BuiltIn);
    }
}
