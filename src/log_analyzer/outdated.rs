//! Проверка устаревших модов по таблице известных последних версий
//!
//! Таблица покрывает лишь несколько модов и не заменяет запрос к реестру
//! Thunderstore. Источник версий подключаемый, см. [`LatestVersionSource`].

use crate::utils::is_older;
use std::collections::{BTreeMap, HashMap};
use valtools_core::{ModEntry, OutdatedEntry, OutdatedStatus};

/// Встроенная таблица последних известных версий
pub const KNOWN_LATEST_VERSIONS: &[(&str, &str)] = &[
    ("Jotunn", "2.20.0"),
    ("HookGenPatcher", "0.0.5.56"),
    ("ServerSync", "1.13.0"),
];

/// Источник последних известных версий модов
pub trait LatestVersionSource {
    /// Последняя версия мода, если источник о нём знает
    fn latest_version(&self, name: &str) -> Option<String>;
}

impl LatestVersionSource for HashMap<String, String> {
    fn latest_version(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

impl LatestVersionSource for BTreeMap<String, String> {
    fn latest_version(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

/// Статическая таблица версий (встроенная + переопределения из настроек)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticVersionTable {
    versions: BTreeMap<String, String>,
}

impl StaticVersionTable {
    pub fn builtin() -> Self {
        Self {
            versions: KNOWN_LATEST_VERSIONS
                .iter()
                .map(|(name, version)| (name.to_string(), version.to_string()))
                .collect(),
        }
    }

    /// Встроенная таблица, поверх которой лежат записи из настроек
    pub fn with_overrides<'a, I>(overrides: I) -> Self
    where
        I: IntoIterator<Item = (&'a String, &'a String)>,
    {
        let mut table = Self::builtin();
        for (name, version) in overrides {
            table.versions.insert(name.clone(), version.clone());
        }
        table
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.versions
            .iter()
            .map(|(name, version)| (name.as_str(), version.as_str()))
    }

    pub fn len(&self) -> usize {
        self.versions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }
}

impl Default for StaticVersionTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl LatestVersionSource for StaticVersionTable {
    fn latest_version(&self, name: &str) -> Option<String> {
        self.versions.get(name).cloned()
    }
}

/// Моды, чья версия строго меньше известной последней.
/// Моды, о которых источник не знает, не помечаются.
pub fn find_outdated_mods(
    mods: &[ModEntry],
    source: &(dyn LatestVersionSource + Send + Sync),
) -> Vec<OutdatedEntry> {
    mods.iter()
        .filter_map(|entry| {
            let latest = source.latest_version(&entry.name)?;
            if !is_older(&entry.version, &latest) {
                return None;
            }
            log::debug!(
                "Outdated mod: {} {} (latest {})",
                entry.name,
                entry.version,
                latest
            );
            Some(OutdatedEntry {
                name: entry.name.clone(),
                current_version: entry.version.clone(),
                latest_version: latest,
                status: OutdatedStatus::Outdated,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jotunn_outdated() {
        let mods = vec![ModEntry::new("Jotunn", "2.19.0")];
        let outdated = find_outdated_mods(&mods, &StaticVersionTable::builtin());

        assert_eq!(outdated.len(), 1);
        assert_eq!(outdated[0].name, "Jotunn");
        assert_eq!(outdated[0].current_version, "2.19.0");
        assert_eq!(outdated[0].latest_version, "2.20.0");
        assert_eq!(outdated[0].status, OutdatedStatus::Outdated);
    }

    #[test]
    fn test_up_to_date_and_unknown_mods_not_flagged() {
        let mods = vec![
            ModEntry::new("Jotunn", "2.20.0"),
            ModEntry::new("ServerSync", "1.14.0"),
            ModEntry::new("SomethingElse", "0.0.1"),
        ];
        assert!(find_outdated_mods(&mods, &StaticVersionTable::builtin()).is_empty());
    }

    #[test]
    fn test_four_segment_versions() {
        let mods = vec![ModEntry::new("HookGenPatcher", "0.0.5.6")];
        let outdated = find_outdated_mods(&mods, &StaticVersionTable::builtin());
        assert_eq!(outdated.len(), 1);
    }

    #[test]
    fn test_overrides_replace_builtin() {
        let mut overrides = HashMap::new();
        overrides.insert("Jotunn".to_string(), "2.18.0".to_string());
        overrides.insert("ValheimPlus".to_string(), "0.9.9".to_string());
        let table = StaticVersionTable::with_overrides(&overrides);

        assert_eq!(table.latest_version("Jotunn").as_deref(), Some("2.18.0"));
        assert_eq!(table.latest_version("ServerSync").as_deref(), Some("1.13.0"));
        assert_eq!(table.len(), 4);

        let mods = vec![ModEntry::new("Jotunn", "2.19.0")];
        assert!(find_outdated_mods(&mods, &table).is_empty());
    }

    #[test]
    fn test_hashmap_source() {
        let mut source = HashMap::new();
        source.insert("Foo".to_string(), "1.0.1".to_string());
        let outdated = find_outdated_mods(&[ModEntry::new("Foo", "1.0.0")], &source);
        assert_eq!(outdated[0].latest_version, "1.0.1");
    }
}
