//! Окно контекста вокруг инцидента

use valtools_core::{ContextLine, LineEmphasis};

/// Строк контекста до инцидента
pub const CONTEXT_BEFORE: usize = 3;
/// Строк контекста после инцидента
pub const CONTEXT_AFTER: usize = 3;

/// Собрать окно контекста: до `CONTEXT_BEFORE` приглушённых строк лога перед
/// инцидентом, сами строки инцидента и до `CONTEXT_AFTER` строк после.
///
/// `start` - индекс первой строки инцидента в `all_lines` (с 0).
pub(super) fn build_context(message: &str, start: usize, all_lines: &[&str]) -> Vec<ContextLine> {
    let message_lines: Vec<&str> = message.split('\n').collect();
    let end = start + message_lines.len() - 1;

    let mut context = Vec::with_capacity(message_lines.len() + CONTEXT_BEFORE + CONTEXT_AFTER);

    let before_start = start.saturating_sub(CONTEXT_BEFORE);
    for i in before_start..start.min(all_lines.len()) {
        context.push(muted(i, all_lines[i]));
    }

    for (offset, line) in message_lines.iter().enumerate() {
        context.push(ContextLine {
            line_number: (start + offset + 1) as u32,
            text: (*line).to_string(),
            emphasis: LineEmphasis::Normal,
        });
    }

    let after_end = all_lines.len().min(end + 1 + CONTEXT_AFTER);
    for i in (end + 1)..after_end {
        context.push(muted(i, all_lines[i]));
    }

    context
}

fn muted(index: usize, text: &str) -> ContextLine {
    ContextLine {
        line_number: (index + 1) as u32,
        text: text.to_string(),
        emphasis: LineEmphasis::Muted,
    }
}

/// Текстовое представление окна, строки через `\n`
pub fn render_context(context: &[ContextLine]) -> String {
    context
        .iter()
        .map(ContextLine::render)
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<&'static str> {
        vec!["one", "two", "three", "four", "five", "six", "seven", "eight", "nine"]
    }

    #[test]
    fn test_no_before_context_at_first_line() {
        let lines = sample();
        let context = build_context("one", 0, &lines);

        assert!(!context[0].is_muted());
        assert_eq!(context[0].line_number, 1);
        assert_eq!(context.len(), 1 + CONTEXT_AFTER);
        assert!(context[1..].iter().all(|c| c.is_muted()));
    }

    #[test]
    fn test_window_in_the_middle() {
        let lines = sample();
        let context = build_context("five\nsix", 4, &lines);

        let numbers: Vec<u32> = context.iter().map(|c| c.line_number).collect();
        assert_eq!(numbers, vec![2, 3, 4, 5, 6, 7, 8, 9]);

        let normal: Vec<&str> = context
            .iter()
            .filter(|c| !c.is_muted())
            .map(|c| c.text.as_str())
            .collect();
        assert_eq!(normal, vec!["five", "six"]);
    }

    #[test]
    fn test_after_context_clipped_at_end() {
        let lines = sample();
        let context = build_context("nine", 8, &lines);
        assert_eq!(context.len(), CONTEXT_BEFORE + 1);
        assert_eq!(context.last().unwrap().line_number, 9);
    }

    #[test]
    fn test_render_context() {
        let lines = vec!["[Info   : BepInEx] ok", "[Error  : X] boom", ""];
        let rendered = render_context(&build_context("[Error  : X] boom", 1, &lines));
        assert_eq!(
            rendered,
            "     1 │ [Info   : BepInEx] ok\n►    2 │ [Error  : X] boom\n     3 │ "
        );
    }
}
