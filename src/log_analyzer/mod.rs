//! Анализатор логов BepInEx (Valheim)
//!
//! Функции:
//! - Версии окружения (Valheim, BepInEx, BepInExPack, Unity)
//! - Списки загруженных модов и патчеров
//! - Ошибки и предупреждения с окном контекста
//! - Слияние повторяющихся инцидентов
//! - Проверка устаревших модов

use rayon::prelude::*;

mod context;
mod dedup;
mod incidents;
mod metadata;
mod outdated;
mod patterns;
pub mod report;

pub use context::{render_context, CONTEXT_AFTER, CONTEXT_BEFORE};
pub use dedup::{merge_duplicates, normalize_message};
pub use outdated::{
    find_outdated_mods, LatestVersionSource, StaticVersionTable, KNOWN_LATEST_VERSIONS,
};

// Re-export types from valtools_core
pub use valtools_core::{
    AnalysisSummary, ContextLine, Incident, IncidentKind, LineEmphasis, LogAnalysisResult,
    ModEntry, OutdatedEntry, OutdatedStatus,
};

use crate::utils::format_bytes;
use incidents::collect_incidents;
use metadata::LogMetadata;
use std::io::Read;
use std::path::{Path, PathBuf};
use valtools_core::{Result, ValtoolsError};

/// Разбить текст лога на строки. Принимает и LF, и CRLF; завершающий
/// перевод строки даёт последнюю пустую строку.
pub fn split_lines(text: &str) -> Vec<&str> {
    text.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect()
}

/// Анализатор логов
///
/// Паттерны кешируются глобально, сам анализатор хранит только источник
/// последних версий модов. Разделяемого изменяемого состояния нет, один
/// экземпляр можно использовать из нескольких потоков.
pub struct LogAnalyzer {
    versions: Box<dyn LatestVersionSource + Send + Sync>,
}

impl LogAnalyzer {
    /// Анализатор со встроенной таблицей версий
    pub fn new() -> Self {
        Self::with_version_source(Box::new(StaticVersionTable::builtin()))
    }

    pub fn with_version_source(versions: Box<dyn LatestVersionSource + Send + Sync>) -> Self {
        Self { versions }
    }

    /// Анализировать содержимое лога. Никогда не падает: на любом вводе
    /// возвращает результат, возможно пустой.
    pub fn analyze(&self, log_content: &str) -> LogAnalysisResult {
        let start_time = std::time::Instant::now();

        let lines = split_lines(log_content);
        let total_lines = lines.len() as u32;

        let meta = LogMetadata::extract(&lines);

        let incidents_start = std::time::Instant::now();
        let raw = collect_incidents(&lines);
        let error_occurrences = raw.errors.len() as u32;
        let warning_occurrences = raw.warnings.len() as u32;
        let errors = merge_duplicates(raw.errors);
        let warnings = merge_duplicates(raw.warnings);
        log::debug!(
            "Incident extraction completed in {}ms ({} errors, {} warnings after merge)",
            incidents_start.elapsed().as_millis(),
            errors.len(),
            warnings.len()
        );

        let outdated_mods = find_outdated_mods(&meta.mods, self.versions.as_ref());

        let parse_time_ms = start_time.elapsed().as_millis() as u64;
        let summary = AnalysisSummary {
            total_lines,
            mod_count: meta.mods.len() as u32,
            patcher_count: meta.patchers.len() as u32,
            error_count: errors.len() as u32,
            warning_count: warnings.len() as u32,
            error_occurrences,
            warning_occurrences,
            outdated_count: outdated_mods.len() as u32,
            parse_time_ms,
        };

        log::info!(
            "⚡ Log analysis completed in {}ms (lines: {}, mods: {}, patchers: {}, errors: {}, warnings: {})",
            parse_time_ms,
            total_lines,
            summary.mod_count,
            summary.patcher_count,
            summary.error_count,
            summary.warning_count
        );

        LogAnalysisResult {
            valheim_version: meta.valheim_version,
            bepinex_version: meta.bepinex_version,
            bepinex_pack_version: meta.bepinex_pack_version,
            unity_version: meta.unity_version,
            mods: meta.mods,
            patchers: meta.patchers,
            errors,
            warnings,
            outdated_mods,
            summary,
        }
    }

    /// Анализировать файл лога
    pub fn analyze_file(&self, path: &Path) -> Result<LogAnalysisResult> {
        let content = read_log(path)?;
        Ok(self.analyze(&content))
    }

    /// Анализировать несколько файлов параллельно (rayon).
    /// Результаты идут в порядке входных путей.
    pub fn analyze_files(&self, paths: &[PathBuf]) -> Vec<(PathBuf, Result<LogAnalysisResult>)> {
        paths
            .par_iter()
            .map(|path| (path.clone(), self.analyze_file(path)))
            .collect()
    }

    /// Анализировать лог из stdin
    pub fn analyze_reader<R: Read>(&self, reader: R) -> Result<LogAnalysisResult> {
        let content = read_log_from(reader, "<stdin>")?;
        Ok(self.analyze(&content))
    }
}

impl Default for LogAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

/// Прочитать файл лога. Невалидный UTF-8 декодируется с заменой символов.
pub fn read_log(path: &Path) -> Result<String> {
    if !path.is_file() {
        return Err(ValtoolsError::LogNotFound(path.display().to_string()));
    }
    let bytes = std::fs::read(path)?;
    log::debug!("Read {:?} ({})", path, format_bytes(bytes.len() as u64));
    Ok(decode_log(bytes, &path.display().to_string()))
}

/// Прочитать лог из произвольного источника (stdin, pipe)
pub fn read_log_from<R: Read>(mut reader: R, source: &str) -> std::io::Result<String> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    log::debug!("Read {} ({})", source, format_bytes(bytes.len() as u64));
    Ok(decode_log(bytes, source))
}

fn decode_log(bytes: Vec<u8>, source: &str) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => {
            log::warn!("⚠️  {} is not valid UTF-8, decoding lossily", source);
            String::from_utf8_lossy(e.as_bytes()).into_owned()
        }
    }
}

/// Анализировать файл лога анализатором по умолчанию
pub fn analyze_log_file(path: impl AsRef<Path>) -> Result<LogAnalysisResult> {
    LogAnalyzer::new().analyze_file(path.as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_LOG: &str = "\
[Message:   BepInEx] BepInEx 5.4.21.0 - valheim (1/7/2024 9:00:00 PM)
[Info   :   BepInEx] Running under Unity v2022.3.17
[Message:   BepInEx] User is running BepInExPack Valheim version 5.4.2202
[Info   :   BepInEx] Loaded 1 patcher method from [BepInEx.MonoMod.HookGenPatcher 0.0.5.56]
[Info   :   BepInEx] Loading [ServerSync 1.13.0]
[Info   :   BepInEx] Loading [Jotunn 2.19.0]
[Info   :   BepInEx] Loading [azu Craft From Containers 1.5.0]
[Info   : Unity Log] 01/07/2024 21:00:05: Valheim version: 0.217.38
[Warning:   Jotunn] Prefab Foo(12) registered twice
[Error  : Unity Log] 01/07/2024 21:00:10: NullReferenceException: Object reference not set
Stack trace:
  at Player.Update () [0x00010] in <abc>:0

[Info   : Unity Log] unrelated
[Error  : Unity Log] 01/07/2024 21:05:44: NullReferenceException: Object reference not set
Stack trace:
  at Player.Update () [0x00010] in <abc>:0
[Warning:   Jotunn] Prefab Foo(13) registered twice
";

    #[test]
    fn test_full_log_analysis() {
        let result = LogAnalyzer::new().analyze(SAMPLE_LOG);

        assert_eq!(result.bepinex_version.as_deref(), Some("5.4.21.0"));
        assert_eq!(result.unity_version.as_deref(), Some("2022.3.17"));
        assert_eq!(result.bepinex_pack_version.as_deref(), Some("5.4.2202"));
        assert_eq!(result.valheim_version.as_deref(), Some("0.217.38"));

        let names: Vec<&str> = result.mods.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["azu Craft From Containers", "Jotunn", "ServerSync"]);
        assert_eq!(result.patchers.len(), 1);
        assert_eq!(result.patchers[0].version, "0.0.5.56");

        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].count, 2);
        assert_eq!(result.errors[0].line_number, 10);
        assert_eq!(result.errors[0].line_span(), 3);

        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.warnings[0].count, 2);
        assert_eq!(result.warnings[0].line_number, 9);

        assert_eq!(result.outdated_mods.len(), 1);
        assert_eq!(result.outdated_mods[0].name, "Jotunn");

        assert_eq!(result.summary.error_occurrences, 2);
        assert_eq!(result.summary.warning_occurrences, 2);
        assert_eq!(result.summary.mod_count, 3);
    }

    #[test]
    fn test_synthetic_versions() {
        let log = "[Message: BepInEx] BepInEx 5.4.21\n[Info : BepInEx] Running under Unity v2020.3.5";
        let result = LogAnalyzer::new().analyze(log);
        assert_eq!(result.bepinex_version.as_deref(), Some("5.4.21"));
        assert_eq!(result.unity_version.as_deref(), Some("2020.3.5"));
    }

    #[test]
    fn test_empty_input() {
        let result = LogAnalyzer::new().analyze("");
        assert!(result.valheim_version.is_none());
        assert!(result.bepinex_version.is_none());
        assert!(result.mods.is_empty());
        assert!(result.patchers.is_empty());
        assert!(result.is_clean());
        assert!(result.outdated_mods.is_empty());
    }

    #[test]
    fn test_crlf_line_endings() {
        let log = "[Info   :   BepInEx] Loading [Jotunn 2.20.0]\r\n[Error  : X] boom\r\n";
        let result = LogAnalyzer::new().analyze(log);
        assert_eq!(result.mods[0].version, "2.20.0");
        assert_eq!(result.errors[0].message, "[Error  : X] boom");
    }

    #[test]
    fn test_timestamp_dedup_scenario() {
        let log = "[Error  : X] 01/02/2023 10:00:00 failed to load\n\
                   \n\
                   [Error  : X] 03/04/2024 11:11:11 failed to load";
        let result = LogAnalyzer::new().analyze(log);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].count, 2);
        assert_eq!(result.errors[0].line_number, 1);
    }

    #[test]
    fn test_mixed_severity_scenario() {
        let log = "[Warning: A] first\n[Error  : B] second";
        let result = LogAnalyzer::new().analyze(log);
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.warnings[0].message, "[Warning: A] first");
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].message, "[Error  : B] second");
    }

    #[test]
    fn test_order_preserved_under_dedup() {
        let log = "[Error  : A] one\n[Error  : B] two\n[Error  : A] one\n[Error  : C] three";
        let result = LogAnalyzer::new().analyze(log);
        let numbers: Vec<u32> = result.errors.iter().map(|e| e.line_number).collect();
        assert_eq!(numbers, vec![1, 2, 4]);
        assert!(numbers.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_custom_version_source() {
        let mut table = std::collections::HashMap::new();
        table.insert("ServerSync".to_string(), "2.0.0".to_string());
        let analyzer = LogAnalyzer::with_version_source(Box::new(table));
        let result = analyzer.analyze(SAMPLE_LOG);

        let names: Vec<&str> = result.outdated_mods.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, vec!["ServerSync"]);
    }

    #[test]
    fn test_analyze_file_and_missing_file() {
        let dir = std::env::temp_dir().join(format!("valtools_test_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("LogOutput.log");
        std::fs::write(&path, SAMPLE_LOG).unwrap();

        let result = analyze_log_file(&path).unwrap();
        assert_eq!(result.mods.len(), 3);

        let missing = dir.join("nope.log");
        let results = LogAnalyzer::new().analyze_files(&[path.clone(), missing.clone()]);
        assert_eq!(results[0].0, path);
        assert!(results[0].1.is_ok());
        assert!(matches!(results[1].1, Err(ValtoolsError::LogNotFound(_))));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_invalid_utf8_is_decoded_lossily() {
        let mut bytes = b"[Error  : X] bad byte ".to_vec();
        bytes.push(0xFF);
        let result = LogAnalyzer::new().analyze_reader(&bytes[..]).unwrap();
        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].message.contains('\u{FFFD}'));
    }
}
