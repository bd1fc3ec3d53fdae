/// Parse a time value into whole minutes.
///
/// Accepts ISO-8601 durations ("PT1H30M", "P0DT2H") as published in
/// schema.org markup, plus bare numbers already expressed in minutes ("90").
pub fn parse_minutes(raw: &str) -> Option<u32> {
    let value = raw.trim();
    if let Ok(minutes) = value.parse::<u32>() {
        return Some(minutes);
    }
    parse_iso8601_minutes(value)
}

fn parse_iso8601_minutes(value: &str) -> Option<u32> {
    let body = value.strip_prefix(['P', 'p'])?;
    let (date_part, time_part) = match body.split_once(['T', 't']) {
        Some((date, time)) => (date, time),
        None => (body, ""),
    };

    let mut seconds = 0f64;
    for (part, is_time) in [(date_part, false), (time_part, true)] {
        let mut digits = String::new();
        for ch in part.chars() {
            if ch.is_ascii_digit() || ch == '.' || ch == ',' {
                digits.push(ch);
                continue;
            }
            let amount: f64 = digits.replace(',', ".").parse().ok()?;
            digits.clear();
            seconds += amount
                * match (ch.to_ascii_uppercase(), is_time) {
                    ('W', false) => 604_800.0,
                    ('D', false) => 86_400.0,
                    ('H', true) => 3_600.0,
                    ('M', true) => 60.0,
                    ('S', true) => 1.0,
                    _ => return None,
                };
        }
        // digits without a trailing unit designator
        if !digits.is_empty() {
            return None;
        }
    }

    Some((seconds / 60.0).ceil() as u32)
}
