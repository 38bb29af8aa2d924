use serde::{Deserialize, Serialize};

// ============================================================================
// Log Analyzer Types
// ============================================================================

/// Вид инцидента
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum IncidentKind {
    Warning,
    Error,
}

impl IncidentKind {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

/// Насколько строка выделяется в окне контекста
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LineEmphasis {
    /// Окружающая строка лога (приглушённая)
    Muted,
    /// Строка самого инцидента
    #[default]
    Normal,
}

/// Одна строка окна контекста вокруг инцидента
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContextLine {
    /// Номер строки в логе (с 1)
    pub line_number: u32,
    pub text: String,
    pub emphasis: LineEmphasis,
}

impl ContextLine {
    pub fn is_muted(&self) -> bool {
        self.emphasis == LineEmphasis::Muted
    }

    /// Строка в виде `"  0042 │ text"` или `"► 0042 │ text"`
    pub fn render(&self) -> String {
        let marker = match self.emphasis {
            LineEmphasis::Muted => ' ',
            LineEmphasis::Normal => '►',
        };
        format!("{} {:4} │ {}", marker, self.line_number, self.text)
    }
}

/// Предупреждение или ошибка из лога (возможно, многострочная)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Incident {
    /// Исходные строки инцидента, склеенные через `\n`
    pub message: String,
    /// Сообщение вместе с окном контекста, готовое к показу
    pub formatted_message: String,
    /// Номер первой строки инцидента (с 1)
    pub line_number: u32,
    /// Сколько раз такой же (после нормализации) инцидент встретился в логе
    pub count: u32,
    /// Окно контекста в структурированном виде
    #[serde(default)]
    pub context: Vec<ContextLine>,
}

impl Incident {
    /// Количество строк самого инцидента
    pub fn line_span(&self) -> usize {
        self.message.split('\n').count()
    }

    pub fn is_repeated(&self) -> bool {
        self.count > 1
    }
}

/// Мод или патчер, найденный в логе
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ModEntry {
    pub name: String,
    pub version: String,
}

impl ModEntry {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }

    /// Разобрать содержимое скобок `"Name With Spaces 1.2.3"`.
    ///
    /// Последний токен - версия, всё перед ним (через одиночные пробелы) - имя.
    /// Без пробелов внутри скобок всё содержимое считается именем,
    /// а версия остаётся пустой строкой.
    pub fn from_bracket_content(inside: &str) -> Self {
        let mut parts: Vec<&str> = inside.split_whitespace().collect();
        if parts.len() < 2 {
            return Self::new(parts.pop().unwrap_or_default(), "");
        }
        let version = parts.pop().unwrap_or_default();
        Self::new(parts.join(" "), version)
    }
}

/// Статус мода относительно известной последней версии
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutdatedStatus {
    #[default]
    Outdated,
}

/// Мод, версия которого отстаёт от известной последней
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OutdatedEntry {
    pub name: String,
    pub current_version: String,
    pub latest_version: String,
    pub status: OutdatedStatus,
}

/// Сводка анализа
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AnalysisSummary {
    pub total_lines: u32,
    pub mod_count: u32,
    pub patcher_count: u32,
    /// Уникальные ошибки после дедупликации
    pub error_count: u32,
    pub warning_count: u32,
    /// Все вхождения, включая повторы
    pub error_occurrences: u32,
    pub warning_occurrences: u32,
    pub outdated_count: u32,
    pub parse_time_ms: u64,
}

/// Результат анализа лога BepInEx
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogAnalysisResult {
    pub valheim_version: Option<String>,
    pub bepinex_version: Option<String>,
    pub bepinex_pack_version: Option<String>,
    pub unity_version: Option<String>,
    pub mods: Vec<ModEntry>,
    pub patchers: Vec<ModEntry>,
    pub errors: Vec<Incident>,
    pub warnings: Vec<Incident>,
    pub outdated_mods: Vec<OutdatedEntry>,
    #[serde(default)]
    pub summary: AnalysisSummary,
}

impl LogAnalysisResult {
    pub fn incidents(&self, kind: IncidentKind) -> &[Incident] {
        match kind {
            IncidentKind::Warning => &self.warnings,
            IncidentKind::Error => &self.errors,
        }
    }

    /// В логе не нашлось ни одной ошибки или предупреждения
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }
}
