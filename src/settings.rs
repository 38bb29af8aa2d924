use crate::log_analyzer::report::OutputFormat;
use crate::log_analyzer::StaticVersionTable;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use valtools_core::i18n::Language;
use valtools_core::{Result, ValtoolsError};

/// Имя файла настроек
pub const SETTINGS_FILE: &str = "valtools.toml";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Язык сообщений об ошибках
    pub language: Language,
    /// Уровень логирования: error, warn, info, debug, trace
    pub log_level: String,
    /// Дополнительно писать лог в файл
    pub log_file: Option<PathBuf>,
    /// Формат отчёта по умолчанию
    pub format: OutputFormat,
    /// Подсвечивать отчёт в терминале
    pub color: bool,
    /// Последние известные версии модов, поверх встроенной таблицы
    pub latest_versions: BTreeMap<String, String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            language: Language::English,
            log_level: "info".to_string(),
            log_file: None,
            format: OutputFormat::Text,
            color: true,
            latest_versions: BTreeMap::new(),
        }
    }
}

pub struct SettingsManager;

impl SettingsManager {
    /// Путь к файлу настроек по умолчанию (`<config dir>/valtools/valtools.toml`)
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "valtools").map(|dirs| dirs.config_dir().join(SETTINGS_FILE))
    }

    /// Загрузить настройки. Явно указанный файл обязан существовать,
    /// отсутствие файла по умолчанию даёт настройки по умолчанию.
    pub fn load(explicit: Option<&Path>) -> Result<Settings> {
        if let Some(path) = explicit {
            if !path.is_file() {
                return Err(ValtoolsError::InvalidConfig(format!(
                    "settings file {} does not exist",
                    path.display()
                )));
            }
            return Self::load_from(path);
        }

        match Self::default_path() {
            Some(path) if path.is_file() => Self::load_from(&path),
            _ => {
                log::debug!("No settings file found, using defaults");
                Ok(Settings::default())
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Settings> {
        let content = std::fs::read_to_string(path)?;
        let settings = Self::parse(&content)?;
        log::debug!("Loaded settings from {:?}", path);
        Ok(settings)
    }

    pub fn parse(content: &str) -> Result<Settings> {
        let settings: Settings = toml::from_str(content)?;
        settings.validate()?;
        Ok(settings)
    }
}

impl Settings {
    pub fn validate(&self) -> Result<()> {
        if self.log_level_filter().is_none() {
            return Err(ValtoolsError::InvalidConfig(format!(
                "unknown log_level '{}'",
                self.log_level
            )));
        }
        if let Some((name, _)) = self
            .latest_versions
            .iter()
            .find(|(_, version)| version.trim().is_empty())
        {
            return Err(ValtoolsError::InvalidVersion(format!(
                "empty latest version for '{}'",
                name
            )));
        }
        Ok(())
    }

    pub fn log_level_filter(&self) -> Option<log::LevelFilter> {
        self.log_level.parse().ok()
    }

    /// Встроенная таблица версий с переопределениями из настроек
    pub fn version_table(&self) -> StaticVersionTable {
        StaticVersionTable::with_overrides(&self.latest_versions)
    }
}
