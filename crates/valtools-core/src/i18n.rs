use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Язык сообщений об ошибках (`--lang`, `language` в valtools.toml)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Language {
    #[serde(rename = "ru")]
    Russian,
    #[serde(rename = "en")]
    #[default]
    English,
}

impl FromStr for Language {
    type Err = String;

    /// Принимает код или название языка, регистр не важен
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ru" | "russian" | "русский" => Ok(Language::Russian),
            "en" | "english" => Ok(Language::English),
            _ => Err(format!("Unknown language '{}', expected en or ru", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_language() {
        assert_eq!("RU".parse::<Language>(), Ok(Language::Russian));
        assert_eq!(" english ".parse::<Language>(), Ok(Language::English));
        assert!("de".parse::<Language>().is_err());
        assert_eq!(Language::default(), Language::English);
    }

    #[test]
    fn test_language_toml_codes() {
        #[derive(Deserialize)]
        struct Wrapper {
            language: Language,
        }
        let parsed: Wrapper = toml::from_str("language = \"ru\"").unwrap();
        assert_eq!(parsed.language, Language::Russian);
        assert!(toml::from_str::<Wrapper>("language = \"Russian\"").is_err());
    }
}
