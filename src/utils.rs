use std::cmp::Ordering;

/// Форматирование размера файла в человекочитаемый вид
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    let mut size = bytes as f64;
    let mut unit_idx = 0;

    while size >= 1024.0 && unit_idx < UNITS.len() - 1 {
        size /= 1024.0;
        unit_idx += 1;
    }

    if unit_idx == 0 {
        format!("{} {}", bytes, UNITS[0])
    } else {
        format!("{:.2} {}", size, UNITS[unit_idx])
    }
}

/// Парсинг версии в semver
pub fn parse_version(version: &str) -> Option<semver::Version> {
    // Пытаемся распарсить напрямую
    if let Ok(v) = semver::Version::parse(version) {
        return Some(v);
    }

    // Пытаемся очистить версию от префиксов (v1.0.0 -> 1.0.0)
    let cleaned = version.trim_start_matches('v');
    semver::Version::parse(cleaned).ok()
}

/// Сравнение версий.
///
/// Если обе версии - корректный semver, сравниваем по semver (с учётом
/// pre-release). Иначе посегментно по правилам PHP `version_compare`.
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    match (parse_version(a), parse_version(b)) {
        (Some(va), Some(vb)) => va.cmp(&vb),
        _ => compare_dotted(a, b),
    }
}

/// Особые текстовые сегменты и их порядок. Число стоит на месте `#`.
/// Сегмент узнаётся по префиксу, первое совпадение выигрывает.
const SPECIAL_FORMS: &[(&str, i8)] = &[
    ("dev", 0),
    ("alpha", 1),
    ("a", 1),
    ("beta", 2),
    ("b", 2),
    ("RC", 3),
    ("rc", 3),
    ("#", 4),
    ("pl", 5),
    ("p", 5),
];

const NUMBER_RANK: i8 = 4;
const UNKNOWN_RANK: i8 = -1;

/// Посегментное сравнение версий вида `0.0.5.56` или `1.2-beta`.
///
/// - `.`, `-`, `_`, `+` разделяют сегменты, переход цифра/буква тоже
///   (`1.0rc1` = `1.0.rc.1`)
/// - числа сравниваются как числа
/// - текст ранжируется: неизвестное < dev < alpha < beta < RC < число < pl
/// - два неизвестных текстовых сегмента сравниваются лексически
/// - недостающий сегмент меньше числа и стоит на месте числа против текста:
///   `1.0 < 1.0.0`, `1.0 > 1.0-beta`, `1.0 < 1.0-pl1`
pub fn compare_dotted(a: &str, b: &str) -> Ordering {
    let left = segments(a);
    let right = segments(b);

    for i in 0..left.len().max(right.len()) {
        let ordering = match (left.get(i), right.get(i)) {
            (Some(l), Some(r)) => compare_segment(l, r),
            (Some(l), None) => compare_missing(l),
            (None, Some(r)) => compare_missing(r).reverse(),
            (None, None) => Ordering::Equal,
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }

    Ordering::Equal
}

fn segments(version: &str) -> Vec<&str> {
    let version = version.trim().trim_start_matches('v');
    let mut result = Vec::new();

    for part in version.split(|c: char| !c.is_ascii_alphanumeric()) {
        let mut start = 0;
        let mut prev_digit = None;
        for (idx, c) in part.char_indices() {
            let digit = c.is_ascii_digit();
            if prev_digit.is_some_and(|p| p != digit) {
                result.push(&part[start..idx]);
                start = idx;
            }
            prev_digit = Some(digit);
        }
        if start < part.len() {
            result.push(&part[start..]);
        }
    }

    result
}

fn is_numeric(segment: &str) -> bool {
    segment.bytes().all(|b| b.is_ascii_digit())
}

fn rank(segment: &str) -> i8 {
    if is_numeric(segment) {
        return NUMBER_RANK;
    }
    SPECIAL_FORMS
        .iter()
        .find(|(form, _)| segment.starts_with(form))
        .map(|(_, rank)| *rank)
        .unwrap_or(UNKNOWN_RANK)
}

fn compare_segment(a: &str, b: &str) -> Ordering {
    if is_numeric(a) && is_numeric(b) {
        // Длинные числа не влезают в u64, сравниваем как строки без ведущих нулей
        let x = a.trim_start_matches('0');
        let y = b.trim_start_matches('0');
        return x.len().cmp(&y.len()).then_with(|| x.cmp(y));
    }

    let (ra, rb) = (rank(a), rank(b));
    if ra == UNKNOWN_RANK && rb == UNKNOWN_RANK {
        return a.cmp(b);
    }
    ra.cmp(&rb)
}

/// Сегмент против отсутствующего сегмента
fn compare_missing(segment: &str) -> Ordering {
    if is_numeric(segment) {
        Ordering::Greater
    } else {
        rank(segment).cmp(&NUMBER_RANK)
    }
}

/// Версия `current` строго меньше `latest`
pub fn is_older(current: &str, latest: &str) -> bool {
    compare_versions(current, latest) == Ordering::Less
}
