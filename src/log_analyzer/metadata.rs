//! Извлечение версий окружения и списков модов/патчеров

use super::patterns::{
    BEPINEX_PACK_VERSION, BEPINEX_VERSION, MOD_LOADING, PATCHER_LOADED, UNITY_VERSION,
    VALHEIM_VERSION_MARKER,
};
use regex::Regex;
use valtools_core::ModEntry;

/// Метаданные, собранные за один проход по логу
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(super) struct LogMetadata {
    pub valheim_version: Option<String>,
    pub bepinex_version: Option<String>,
    pub bepinex_pack_version: Option<String>,
    pub unity_version: Option<String>,
    pub mods: Vec<ModEntry>,
    pub patchers: Vec<ModEntry>,
}

impl LogMetadata {
    /// Один прямой проход по строкам. Для каждой версии побеждает первая
    /// подходящая строка.
    pub fn extract(lines: &[&str]) -> Self {
        let mut meta = LogMetadata::default();

        for line in lines {
            if meta.valheim_version.is_none() {
                if let Some(pos) = line.find(VALHEIM_VERSION_MARKER) {
                    let value = &line[pos + VALHEIM_VERSION_MARKER.len()..];
                    meta.valheim_version = Some(value.trim().to_string());
                }
            }
            if meta.bepinex_version.is_none() {
                meta.bepinex_version = first_capture(&BEPINEX_VERSION, line);
            }
            if meta.bepinex_pack_version.is_none() {
                meta.bepinex_pack_version = first_capture(&BEPINEX_PACK_VERSION, line);
            }
            if meta.unity_version.is_none() {
                meta.unity_version = first_capture(&UNITY_VERSION, line);
            }

            if let Some(inside) = first_capture(&MOD_LOADING, line) {
                meta.mods.push(ModEntry::from_bracket_content(&inside));
            }
            if let Some(inside) = first_capture(&PATCHER_LOADED, line) {
                meta.patchers.push(ModEntry::from_bracket_content(&inside));
            }
        }

        sort_entries(&mut meta.mods);
        sort_entries(&mut meta.patchers);

        log::debug!(
            "Metadata: valheim={:?} bepinex={:?} pack={:?} unity={:?} ({} mods, {} patchers)",
            meta.valheim_version,
            meta.bepinex_version,
            meta.bepinex_pack_version,
            meta.unity_version,
            meta.mods.len(),
            meta.patchers.len()
        );

        meta
    }
}

fn first_capture(re: &Regex, line: &str) -> Option<String> {
    re.captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Стабильная сортировка по имени без учёта регистра
pub(super) fn sort_entries(entries: &mut [ModEntry]) {
    entries.sort_by_cached_key(|entry| entry.name.to_ascii_lowercase());
}
