//! Регулярные выражения для диалекта логов BepInEx
//!
//! Все паттерны компилируются один раз при первом использовании и
//! разделяются между потоками, сам анализатор состояния не хранит.

use lazy_static::lazy_static;
use regex::Regex;

/// Маркер строки с версией игры
pub(super) const VALHEIM_VERSION_MARKER: &str = ": Valheim version: ";

/// Маркер ошибки сетевого RPC, у которой нет тега уровня
pub(super) const ZRPC_EXCEPTION_MARKER: &str = "Exception in ZRpc::HandlePackage:";

pub(super) const STACK_TRACE_MARKER: &str = "Stack trace:";

lazy_static! {
    // === Метаданные ===
    pub(super) static ref BEPINEX_VERSION: Regex =
        Regex::new(r"\[Message:\s*BepInEx\] BepInEx (\S+)").unwrap();
    pub(super) static ref BEPINEX_PACK_VERSION: Regex = Regex::new(
        r"\[Message:\s*BepInEx\] User is running BepInExPack Valheim version (\S+)"
    )
    .unwrap();
    pub(super) static ref UNITY_VERSION: Regex =
        Regex::new(r"\[Info\s*:\s*BepInEx\]\s*Running under Unity v([0-9.]+)").unwrap();

    // === Моды и патчеры ===
    pub(super) static ref MOD_LOADING: Regex =
        Regex::new(r"\[Info\s*:\s*BepInEx\]\s*Loading\s*\[([^\]]+)\]").unwrap();
    pub(super) static ref PATCHER_LOADED: Regex = Regex::new(
        r"(?i)\[Info\s*:\s*BepInEx\]\s*Loaded\s*[0-9]+\s*patcher methods?.*?\[([^\]]+)\]"
    )
    .unwrap();

    // === Классификация строк ===
    static ref WARNING_START: Regex = Regex::new(r"(?i)^\[Warning").unwrap();
    static ref ERROR_START: Regex = Regex::new(r"(?i)^\[(Error|Fatal)").unwrap();
    static ref EXCEPTION_ANYWHERE: Regex = Regex::new(r"(?i)Exception:").unwrap();
    static ref STACK_FRAME_AT: Regex = Regex::new(r"^\s+at\s+").unwrap();
    static ref STACK_FRAME_MEMBER: Regex =
        Regex::new(r"^\s+[A-Za-z0-9_]+\.[A-Za-z0-9_]+").unwrap();
    static ref RESET_TAG: Regex = Regex::new(r"^\[(Info|Debug|Message)").unwrap();
}

/// Класс строки лога для автомата сборки инцидентов.
///
/// Порядок вариантов совпадает с приоритетом проверки.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum LineClass {
    WarningStart,
    ErrorStart,
    Continuation,
    Reset,
    Other,
}

pub(super) fn is_warning_start(line: &str) -> bool {
    WARNING_START.is_match(line)
}

pub(super) fn is_error_start(line: &str) -> bool {
    ERROR_START.is_match(line)
        || line.contains(ZRPC_EXCEPTION_MARKER)
        || EXCEPTION_ANYWHERE.is_match(line)
}

pub(super) fn is_stack_frame(line: &str) -> bool {
    STACK_FRAME_AT.is_match(line)
        || STACK_FRAME_MEMBER.is_match(line)
        || line.contains(STACK_TRACE_MARKER)
}

pub(super) fn is_reset(line: &str) -> bool {
    RESET_TAG.is_match(line) || line.trim().is_empty()
}

/// Классифицировать строку (первое совпадение по приоритету)
pub(super) fn classify_line(line: &str) -> LineClass {
    if is_warning_start(line) {
        LineClass::WarningStart
    } else if is_error_start(line) {
        LineClass::ErrorStart
    } else if is_stack_frame(line) {
        LineClass::Continuation
    } else if is_reset(line) {
        LineClass::Reset
    } else {
        LineClass::Other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_warning_case_insensitive() {
        assert_eq!(
            classify_line("[Warning: Jotunn] Something odd"),
            LineClass::WarningStart
        );
        assert_eq!(classify_line("[WARNING:Foo] x"), LineClass::WarningStart);
        // Тег должен стоять в начале строки
        assert_ne!(classify_line(" [Warning: Foo] x"), LineClass::WarningStart);
    }

    #[test]
    fn test_classify_error_variants() {
        assert_eq!(classify_line("[Error  : Unity Log] boom"), LineClass::ErrorStart);
        assert_eq!(classify_line("[Fatal  : BepInEx] dead"), LineClass::ErrorStart);
        assert_eq!(
            classify_line("Exception in ZRpc::HandlePackage: RPC_Foo"),
            LineClass::ErrorStart
        );
        assert_eq!(
            classify_line("NullReferenceException: Object reference not set"),
            LineClass::ErrorStart
        );
        assert_eq!(
            classify_line("something exception: lowercase"),
            LineClass::ErrorStart
        );
    }

    #[test]
    fn test_warning_beats_error() {
        assert_eq!(
            classify_line("[Warning: Foo] NullReferenceException: x"),
            LineClass::WarningStart
        );
    }

    #[test]
    fn test_classify_stack_frames() {
        assert_eq!(
            classify_line("  at Player.Update () [0x00010] in <abc>:0"),
            LineClass::Continuation
        );
        assert_eq!(
            classify_line("  UnityEngine.Debug:Log(Object)"),
            LineClass::Continuation
        );
        assert_eq!(classify_line("Stack trace:"), LineClass::Continuation);
    }

    #[test]
    fn test_exception_in_reset_tagged_line_is_error() {
        // Начало ошибки проверяется раньше сброса
        assert_eq!(
            classify_line("[Info   : Foo] NullReferenceException: x"),
            LineClass::ErrorStart
        );
        assert_eq!(
            classify_line("[Message: Unity Log] ArgumentException: bad value"),
            LineClass::ErrorStart
        );
        assert_eq!(classify_line("[Debug  : Foo] no problem here"), LineClass::Reset);
    }

    #[test]
    fn test_classify_reset_lines() {
        assert_eq!(classify_line("[Info   : BepInEx] hi"), LineClass::Reset);
        assert_eq!(classify_line("[Debug  : BepInEx] hi"), LineClass::Reset);
        assert_eq!(classify_line("[Message: BepInEx] hi"), LineClass::Reset);
        assert_eq!(classify_line(""), LineClass::Reset);
        assert_eq!(classify_line(" \t "), LineClass::Reset);
        // Сброс чувствителен к регистру
        assert_eq!(classify_line("[info   : BepInEx] hi"), LineClass::Other);
    }

    #[test]
    fn test_metadata_patterns() {
        let caps = BEPINEX_VERSION
            .captures("[Message:   BepInEx] BepInEx 5.4.21.0 - valheim (1/1/2024)")
            .unwrap();
        assert_eq!(&caps[1], "5.4.21.0");

        let caps = UNITY_VERSION
            .captures("[Info   :   BepInEx] Running under Unity v2022.3.17")
            .unwrap();
        assert_eq!(&caps[1], "2022.3.17");

        let caps = PATCHER_LOADED
            .captures("[Info   :   BepInEx] Loaded 1 patcher method from [BepInEx.MonoMod.HookGenPatcher 0.0.5.56]")
            .unwrap();
        assert_eq!(&caps[1], "BepInEx.MonoMod.HookGenPatcher 0.0.5.56");
    }
}
