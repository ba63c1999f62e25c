/// Human-readable condition for a WMO weather code, split by day/night where
/// the sky state reads differently (clear/cloudy codes). Unknown codes fall
/// back to a generic `code {n}` label.
pub fn describe(code: u16, is_day: bool) -> String {
    match lookup(code, is_day) {
        Some(text) => text.to_string(),
        None => format!("code {}", code),
    }
}

fn lookup(code: u16, is_day: bool) -> Option<&'static str> {
    let text = match (code, is_day) {
        (0, true) => "sunny",
        (0, false) => "clear",
        (1, true) => "mainly sunny",
        (1, false) => "mainly clear",
        (2, _) => "partly cloudy",
        (3, _) => "cloudy",
        (45, _) => "foggy",
        (48, _) => "rime fog",
        (51, _) => "light drizzle",
        (53, _) => "drizzle",
        (55, _) => "heavy drizzle",
        (56, _) => "light freezing drizzle",
        (57, _) => "freezing drizzle",
        (61, _) => "light rain",
        (63, _) => "rain",
        (65, _) => "heavy rain",
        (66, _) => "light freezing rain",
        (67, _) => "freezing rain",
        (71, _) => "light snow",
        (73, _) => "snow",
        (75, _) => "heavy snow",
        (77, _) => "snow grains",
        (80, _) => "light showers",
        (81, _) => "showers",
        (82, _) => "heavy showers",
        (85, _) => "light snow showers",
        (86, _) => "snow showers",
        (95, _) => "thunderstorm",
        (96, _) => "light thunderstorm with hail",
        (99, _) => "thunderstorm with hail",
        _ => return None,
    };
    Some(text)
}
