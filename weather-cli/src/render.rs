use weather_core::WeatherSummary;

/// Pick an emoji for a temperature in degrees Celsius.
///
/// Takes the rounded value so the emoji always agrees with the printed number.
pub fn temperature_emoji(celsius: i64) -> &'static str {
    match celsius {
        t if t < 0 => "🥶",
        t if t < 10 => "❄️",
        t if t < 20 => "🌤️",
        t if t < 30 => "☀️",
        _ => "🔥",
    }
}

pub fn render_summary(summary: &WeatherSummary) -> String {
    let emoji = temperature_emoji(summary.temperature);

    let mut out = String::new();
    out.push_str(&format!("\n{emoji} Weather in {}, {}\n", summary.city, summary.country));
    out.push_str(&"=".repeat(40));
    out.push('\n');
    out.push_str(&format!(
        "🌡️  Temperature:  {}°C (Feels like {}°C)\n",
        summary.temperature, summary.feels_like
    ));
    out.push_str(&format!("📝 Conditions:   {}\n", summary.description));
    out.push_str(&format!("💧 Humidity:     {}%\n", summary.humidity));
    out.push_str(&format!("💨 Wind Speed:   {} m/s\n", summary.wind_speed));
    out.push('\n');
    out
}
