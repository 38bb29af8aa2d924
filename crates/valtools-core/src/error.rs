use serde::Serialize;
use thiserror::Error;

use crate::i18n::Language;

/// Информация об ошибке с подсказкой для восстановления
#[derive(Debug, Clone, Serialize)]
pub struct ErrorInfo {
    /// Код ошибки для идентификации
    pub code: String,
    /// Человекочитаемое сообщение
    pub message: String,
    /// Подсказка для исправления
    pub recovery_hint: Option<String>,
    /// Технические детали (для логов)
    pub details: Option<String>,
}

impl ErrorInfo {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            recovery_hint: None,
            details: None,
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.recovery_hint = Some(hint.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

impl std::fmt::Display for ErrorInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(ref details) = self.details {
            write!(f, " ({})", details)?;
        }
        if let Some(ref hint) = self.recovery_hint {
            write!(f, "\n  → {}", hint)?;
        }
        Ok(())
    }
}

#[derive(Error, Debug)]
pub enum ValtoolsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Log file not found: {0}")]
    LogNotFound(String),

    #[error("Invalid version format: {0}")]
    InvalidVersion(String),

    #[error("Unsupported output format: {0}")]
    UnsupportedFormat(String),
}

impl ValtoolsError {
    /// Информация об ошибке на английском (язык по умолчанию)
    pub fn to_error_info(&self) -> ErrorInfo {
        self.localized_error_info(Language::default())
    }

    /// Возвращает локализованную информацию об ошибке
    pub fn localized_error_info(&self, lang: Language) -> ErrorInfo {
        match self {
            ValtoolsError::Io(e) => match lang {
                Language::Russian => {
                    let hint = if e.kind() == std::io::ErrorKind::PermissionDenied {
                        "Проверьте права доступа к файлу лога"
                    } else if e.kind() == std::io::ErrorKind::NotFound {
                        "Файл не найден. Проверьте путь к логу"
                    } else {
                        "Проверьте, что файл доступен и не занят другим процессом"
                    };
                    ErrorInfo::new("IO_ERROR", format!("Ошибка файловой системы: {}", e.kind()))
                        .with_hint(hint)
                        .with_details(e.to_string())
                }
                Language::English => {
                    let hint = if e.kind() == std::io::ErrorKind::PermissionDenied {
                        "Check access permissions for the log file"
                    } else if e.kind() == std::io::ErrorKind::NotFound {
                        "File not found. Check the path to the log"
                    } else {
                        "Ensure the file is accessible and not locked by another process"
                    };
                    ErrorInfo::new("IO_ERROR", format!("Filesystem error: {}", e.kind()))
                        .with_hint(hint)
                        .with_details(e.to_string())
                }
            },
            ValtoolsError::Json(e) => match lang {
                Language::Russian => ErrorInfo::new("JSON_ERROR", "Ошибка сериализации результата")
                    .with_details(e.to_string()),
                Language::English => ErrorInfo::new("JSON_ERROR", "Failed to serialize the result")
                    .with_details(e.to_string()),
            },
            ValtoolsError::ConfigParse(e) => match lang {
                Language::Russian => ErrorInfo::new("CONFIG_PARSE_ERROR", "Не удалось разобрать файл настроек")
                    .with_hint("Проверьте синтаксис TOML в valtools.toml")
                    .with_details(e.to_string()),
                Language::English => ErrorInfo::new("CONFIG_PARSE_ERROR", "Failed to parse the settings file")
                    .with_hint("Check the TOML syntax in valtools.toml")
                    .with_details(e.to_string()),
            },
            ValtoolsError::InvalidConfig(msg) => match lang {
                Language::Russian => ErrorInfo::new("INVALID_CONFIG", "Некорректная конфигурация")
                    .with_hint("Проверьте путь, переданный в --config, и значения в файле настроек")
                    .with_details(msg.clone()),
                Language::English => ErrorInfo::new("INVALID_CONFIG", "Invalid configuration")
                    .with_hint("Check the path given to --config and the values in the settings file")
                    .with_details(msg.clone()),
            },
            ValtoolsError::LogNotFound(path) => match lang {
                Language::Russian => ErrorInfo::new("LOG_NOT_FOUND", format!("Лог '{}' не найден", path))
                    .with_hint("Лог BepInEx обычно лежит в BepInEx/LogOutput.log рядом с игрой"),
                Language::English => ErrorInfo::new("LOG_NOT_FOUND", format!("Log '{}' not found", path))
                    .with_hint("The BepInEx log is usually at BepInEx/LogOutput.log next to the game"),
            },
            ValtoolsError::InvalidVersion(msg) => match lang {
                Language::Russian => ErrorInfo::new("INVALID_VERSION", "Неверный формат версии")
                    .with_details(msg.clone()),
                Language::English => ErrorInfo::new("INVALID_VERSION", "Invalid version format")
                    .with_details(msg.clone()),
            },
            ValtoolsError::UnsupportedFormat(format) => match lang {
                Language::Russian => ErrorInfo::new("UNSUPPORTED_FORMAT", format!("Формат '{}' не поддерживается", format))
                    .with_hint("Доступные форматы: text, json, markdown"),
                Language::English => ErrorInfo::new("UNSUPPORTED_FORMAT", format!("Format '{}' is not supported", format))
                    .with_hint("Available formats: text, json, markdown"),
            },
        }
    }
}

pub type Result<T> = std::result::Result<T, ValtoolsError>;

impl serde::Serialize for ValtoolsError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        // Сериализуем как ErrorInfo для более полной информации
        self.to_error_info().serialize(serializer)
    }
}
