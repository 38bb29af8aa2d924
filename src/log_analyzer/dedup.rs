//! Нормализация сообщений и слияние повторяющихся инцидентов

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashMap;
use valtools_core::Incident;

lazy_static! {
    /// Изменчивые подстроки и их замены, применяются по порядку
    static ref VOLATILE_PATTERNS: Vec<(Regex, &'static str)> = vec![
        // 01/02/2023 10:00:00
        (
            Regex::new(r"[0-9]{2}/[0-9]{2}/[0-9]{4} [0-9]{2}:[0-9]{2}:[0-9]{2}").unwrap(),
            "XX/XX/XXXX XX:XX:XX",
        ),
        // [10:00:00.123]
        (
            Regex::new(r"\[[0-9]{2}:[0-9]{2}:[0-9]{2}\.[0-9]{3}\]").unwrap(),
            "[XX:XX:XX.XXX]",
        ),
        (Regex::new(r"line [0-9]+").unwrap(), "line XXX"),
        // Номера экземпляров объектов: Player(Clone)(12)
        (Regex::new(r"\([0-9]+\)").unwrap(), "(XXX)"),
        // Адреса памяти
        (Regex::new(r"0x[0-9a-fA-F]+").unwrap(), "0xXXXXXXXX"),
        // IP адреса
        (
            Regex::new(r"[0-9]+\.[0-9]+\.[0-9]+\.[0-9]+").unwrap(),
            "XXX.XXX.XXX.XXX",
        ),
    ];
}

/// Ключ нормализации: сообщение с заменёнными временными метками,
/// номерами строк, адресами и IP.
pub fn normalize_message(message: &str) -> String {
    let mut normalized = message.to_string();
    for (pattern, replacement) in VOLATILE_PATTERNS.iter() {
        normalized = pattern.replace_all(&normalized, *replacement).into_owned();
    }
    normalized
}

/// Слить инциденты с одинаковым ключом нормализации.
///
/// Порядок - порядок первого появления. Первое вхождение сохраняет своё
/// сообщение, номер строки и окно контекста, каждое следующее только
/// увеличивает `count`.
pub fn merge_duplicates(incidents: Vec<Incident>) -> Vec<Incident> {
    let mut merged: Vec<Incident> = Vec::with_capacity(incidents.len());
    let mut index_by_key: HashMap<String, usize> = HashMap::new();

    for incident in incidents {
        let key = normalize_message(&incident.message);
        match index_by_key.get(&key) {
            Some(&index) => merged[index].count += incident.count,
            None => {
                index_by_key.insert(key, merged.len());
                merged.push(incident);
            }
        }
    }

    merged
}
