use tokio::io::{self, AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use weather_core::{Credential, WeatherProvider, lookup};

use crate::render::render_summary;

const EXIT_WORDS: [&str; 3] = ["quit", "exit", "q"];

fn is_exit(input: &str) -> bool {
    EXIT_WORDS.iter().any(|word| input.eq_ignore_ascii_case(word))
}

/// Read city names line by line until an exit word or end of input.
///
/// Lookup failures are printed and the loop keeps going.
pub async fn run<P, R, W>(
    provider: &P,
    credential: &Credential,
    mut input: R,
    output: &mut W,
) -> io::Result<()>
where
    P: WeatherProvider + ?Sized,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    output
        .write_all(
            "🌤️  Simple Weather CLI App\n\
             ==============================\n\
             Enter city names to get weather info\n\
             Type 'quit' or 'exit' to leave\n\n"
                .as_bytes(),
        )
        .await?;

    let mut line = String::new();
    loop {
        output.write_all("🏙️  Enter city name: ".as_bytes()).await?;
        output.flush().await?;

        line.clear();
        if input.read_line(&mut line).await? == 0 {
            output.write_all(b"\n").await?;
            break;
        }

        let city = line.trim();

        if is_exit(city) {
            output.write_all("👋 Goodbye!\n".as_bytes()).await?;
            break;
        }

        if city.is_empty() {
            output.write_all("❌ Please enter a city name\n".as_bytes()).await?;
            continue;
        }

        output
            .write_all(format!("🔍 Fetching weather for {city}...\n").as_bytes())
            .await?;

        let text = match lookup(provider, city, Some(credential)).await {
            Ok(summary) => render_summary(&summary),
            Err(err) => {
                tracing::debug!(kind = ?err.kind(), "lookup failed");
                format!("❌ {err}\n")
            }
        };
        output.write_all(text.as_bytes()).await?;
    }

    output.flush().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use weather_core::{CityQuery, LookupError, WeatherSummary};

    #[derive(Debug, Default)]
    struct ScriptedProvider {
        seen: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl WeatherProvider for ScriptedProvider {
        async fn current_weather(
            &self,
            city: &CityQuery,
            _credential: &Credential,
        ) -> Result<WeatherSummary, LookupError> {
            self.seen.lock().unwrap().push(city.to_string());
            if city.as_str() == "Atlantis" {
                return Err(LookupError::CityNotFound { city: city.to_string() });
            }
            Ok(WeatherSummary {
                city: city.to_string(),
                country: "GB".into(),
                temperature: 8,
                feels_like: 6,
                humidity: 90,
                description: "Mist".into(),
                wind_speed: 2.0,
                icon: "50d".into(),
            })
        }
    }

    async fn drive(provider: &ScriptedProvider, script: &str) -> String {
        let key = Credential::new("KEY").unwrap();
        let mut out = Vec::new();
        run(provider, &key, script.as_bytes(), &mut out).await.unwrap();
        String::from_utf8(out).unwrap()
    }

    #[tokio::test]
    async fn exit_words_stop_the_loop() {
        for word in ["quit", "EXIT", "Q"] {
            let provider = ScriptedProvider::default();
            let out = drive(&provider, &format!("{word}\nLondon\n")).await;

            assert!(out.contains("👋 Goodbye!"));
            assert!(provider.seen.lock().unwrap().is_empty());
        }
    }

    #[tokio::test]
    async fn empty_line_reprompts() {
        let provider = ScriptedProvider::default();
        let out = drive(&provider, "   \nquit\n").await;

        assert!(out.contains("❌ Please enter a city name"));
        assert_eq!(out.matches("Enter city name").count(), 2);
    }

    #[tokio::test]
    async fn errors_do_not_end_the_loop() {
        let provider = ScriptedProvider::default();
        let out = drive(&provider, "Atlantis\n'London'\nq\n").await;

        assert!(out.contains("❌ City \"Atlantis\" not found. Please check the spelling."));
        assert!(out.contains("❄️ Weather in London, GB"));
        assert_eq!(*provider.seen.lock().unwrap(), vec!["Atlantis", "London"]);
    }

    #[tokio::test]
    async fn end_of_input_stops_quietly() {
        let provider = ScriptedProvider::default();
        let out = drive(&provider, "London\n").await;

        assert!(out.contains("Weather in London"));
        assert!(!out.contains("Goodbye"));
    }
}
