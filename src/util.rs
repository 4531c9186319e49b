use chrono::Local;

/// Local wall-clock timestamp used for console lines and record comments,
/// formatted down to the minute.
pub fn timestamp() -> String {
    Local::now().format("%Y-%m-%d %H:%M").to_string()
}
