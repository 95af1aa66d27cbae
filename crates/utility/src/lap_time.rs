/// Parses a lap time as typed by a pilot or stored by the backend:
/// `m:ss.fff`, `m:ss`, or plain seconds `ss.fff`. Returns milliseconds.
pub fn parse_lap_time(value: &str) -> Option<u32> {
    let value = value.trim();
    let (minutes, seconds) = match value.split_once(':') {
        Some((minutes, seconds)) => (minutes.parse::<u32>().ok()?, seconds),
        None => (0, value),
    };
    let (whole, fraction) = match seconds.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (seconds, ""),
    };
    if whole.is_empty() || !whole.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    if fraction.len() > 3 || !fraction.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let whole: u32 = whole.parse().ok()?;
    if value.contains(':') && whole >= 60 {
        return None;
    }
    let millis = if fraction.is_empty() {
        0
    } else {
        format!("{fraction:0<3}").parse::<u32>().ok()?
    };
    let total = minutes
        .checked_mul(60_000)?
        .checked_add(whole.checked_mul(1000)?)?
        .checked_add(millis)?;
    (total > 0).then_some(total)
}

pub fn format_lap_time(millis: u32) -> String {
    let minutes = millis / 60_000;
    let seconds = (millis % 60_000) / 1000;
    let fraction = millis % 1000;
    format!("{minutes}:{seconds:02}.{fraction:03}")
}
