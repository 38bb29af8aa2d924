//! Автомат сборки инцидентов (предупреждений и ошибок) из строк лога
//!
//! Каждая строка классифицируется (см. [`LineClass`]) и переводит автомат
//! `Idle | InError | InWarning` в следующее состояние. Открытым может быть
//! только один инцидент: начало предупреждения или ошибки закрывает любой
//! открытый инцидент любого вида.

use super::context::{build_context, render_context};
use super::patterns::{classify_line, LineClass};
use valtools_core::{Incident, IncidentKind};

/// Инцидент, ещё не прошедший дедупликацию
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct RawIncident<'a> {
    pub kind: IncidentKind,
    /// Индекс первой строки (с 0)
    pub start: usize,
    pub lines: Vec<&'a str>,
}

impl<'a> RawIncident<'a> {
    fn open(kind: IncidentKind, start: usize, line: &'a str) -> Self {
        Self {
            kind,
            start,
            lines: vec![line],
        }
    }

    pub fn message(&self) -> String {
        self.lines.join("\n")
    }

    /// Превратить в [`Incident`] с окном контекста из исходного лога
    pub fn into_incident(self, all_lines: &[&str]) -> Incident {
        let message = self.message();
        let context = build_context(&message, self.start, all_lines);
        Incident {
            formatted_message: render_context(&context),
            message,
            line_number: (self.start + 1) as u32,
            count: 1,
            context,
        }
    }
}

/// Состояние автомата
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(super) enum ScanState<'a> {
    #[default]
    Idle,
    InError(RawIncident<'a>),
    InWarning(RawIncident<'a>),
}

impl<'a> ScanState<'a> {
    /// Переход по одной строке. Возвращает новое состояние и инцидент,
    /// закрытый этой строкой (если был).
    pub fn step(self, index: usize, line: &'a str) -> (ScanState<'a>, Option<RawIncident<'a>>) {
        match classify_line(line) {
            LineClass::WarningStart => (
                ScanState::InWarning(RawIncident::open(IncidentKind::Warning, index, line)),
                self.finish(),
            ),
            LineClass::ErrorStart => (
                ScanState::InError(RawIncident::open(IncidentKind::Error, index, line)),
                self.finish(),
            ),
            LineClass::Reset => (ScanState::Idle, self.finish()),
            LineClass::Continuation | LineClass::Other => (self.append(line), None),
        }
    }

    /// Закрыть открытый инцидент (конец ввода или строка сброса)
    pub fn finish(self) -> Option<RawIncident<'a>> {
        match self {
            ScanState::Idle => None,
            ScanState::InError(incident) | ScanState::InWarning(incident) => Some(incident),
        }
    }

    fn append(self, line: &'a str) -> Self {
        match self {
            ScanState::Idle => ScanState::Idle,
            ScanState::InError(mut incident) => {
                incident.lines.push(line);
                ScanState::InError(incident)
            }
            ScanState::InWarning(mut incident) => {
                incident.lines.push(line);
                ScanState::InWarning(incident)
            }
        }
    }
}

/// Сырые (до дедупликации) ошибки и предупреждения в порядке закрытия
#[derive(Debug, Default)]
pub(super) struct RawIncidents {
    pub errors: Vec<Incident>,
    pub warnings: Vec<Incident>,
}

impl RawIncidents {
    fn push(&mut self, raw: RawIncident<'_>, all_lines: &[&str]) {
        let kind = raw.kind;
        let incident = raw.into_incident(all_lines);
        match kind {
            IncidentKind::Error => self.errors.push(incident),
            IncidentKind::Warning => self.warnings.push(incident),
        }
    }
}

/// Один линейный проход автомата по всем строкам
pub(super) fn collect_incidents(lines: &[&str]) -> RawIncidents {
    let mut collected = RawIncidents::default();
    let mut state = ScanState::Idle;

    for (index, &line) in lines.iter().enumerate() {
        let (next, flushed) = state.step(index, line);
        if let Some(raw) = flushed {
            collected.push(raw, lines);
        }
        state = next;
    }

    if let Some(raw) = state.finish() {
        collected.push(raw, lines);
    }

    log::debug!(
        "Collected {} raw errors and {} raw warnings",
        collected.errors.len(),
        collected.warnings.len()
    );

    collected
}
