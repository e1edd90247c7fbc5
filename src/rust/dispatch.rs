//! Turns classifier replies into bot actions.
//!
//! The conversation/weather corpus answers weather questions with one of a
//! few trigger phrases instead of prose; the chat adapter is expected to
//! fetch the forecast when it sees one of them.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use log::{debug, info};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::classifier::{ClassifierError, ResponseOutcome};
use crate::corpus::Section;
use crate::model_manager::ModelManager;

/// Sections used to understand free-text chat messages.
pub const CHAT_SECTIONS: [Section; 2] = [Section::Conversation, Section::Weather];

/// Section used to turn a provider weather description into advice.
pub const RECOMMENDATION_SECTIONS: [Section; 1] = [Section::WeatherStatus];

/// Whether a model over `sections` answers chat messages, so its replies
/// may be forecast triggers.
pub fn is_chat_sections(sections: &BTreeSet<Section>) -> bool {
    sections.len() == CHAT_SECTIONS.len() && CHAT_SECTIONS.iter().all(|s| sections.contains(s))
}

/// Name the bot signs its forecast messages with.
pub const BOT_NAME: &str = "WeatherWiz";

/// Fields left out of an extended forecast, which summarizes whole days.
const EXTENDED_OMITTED: [&str; 5] = [
    "latest_weather_update",
    "sunset_time",
    "sunrise_time",
    "max_temp",
    "min_temp",
];

/// The kind of forecast a user asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WeatherQuery {
    /// Conditions right now
    Current,
    /// One summary per upcoming day
    Extended,
    /// Extremes (coldest, rainiest, ...) across the upcoming days
    DetailedExtended,
}

impl WeatherQuery {
    pub const ALL: [WeatherQuery; 3] = [Self::Current, Self::Extended, Self::DetailedExtended];

    /// The reply text in the corpus that requests this query.
    pub fn trigger(&self) -> &'static str {
        match self {
            Self::Current => "clima actual",
            Self::Extended => "clima extendido",
            Self::DetailedExtended => "detalle extendido",
        }
    }

    pub fn from_reply(reply: &str) -> Option<Self> {
        let reply = reply.trim();
        Self::ALL.into_iter().find(|query| query.trigger() == reply)
    }
}

impl fmt::Display for WeatherQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Current => "current_weather",
            Self::Extended => "extended_weather",
            Self::DetailedExtended => "detailed_extended_weather",
        };
        f.write_str(name)
    }
}

/// What the chat adapter should do with an incoming message.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatAction {
    /// Send this text back verbatim
    Reply(String),
    /// Fetch and render a forecast for the user's current location
    Weather(WeatherQuery),
}

impl From<ResponseOutcome> for ChatAction {
    fn from(outcome: ResponseOutcome) -> Self {
        match WeatherQuery::from_reply(outcome.text()) {
            Some(query) if outcome.is_matched() => ChatAction::Weather(query),
            _ => match outcome {
                ResponseOutcome::Matched { response, .. } => ChatAction::Reply(response),
                ResponseOutcome::Unrecognized { message } => ChatAction::Reply(message),
            },
        }
    }
}

/// A weekday and a local time, e.g. `("Martes", "06:00hs")`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayAndTime {
    pub day: String,
    pub time: String,
}

impl DayAndTime {
    pub fn new(day: impl Into<String>, time: impl Into<String>) -> Self {
        Self {
            day: day.into(),
            time: time.into(),
        }
    }
}

/// Forecast data as reported by the weather provider, already formatted
/// with units. Absent fields are left out of the message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeatherDetails {
    pub day: Option<String>,
    pub latest_update: Option<String>,
    /// Provider description such as "Lluvia ligera"; drives recommendations
    pub status: Option<String>,
    pub sunset_time: Option<String>,
    pub sunrise_time: Option<String>,
    pub feels_like: Option<String>,
    pub temp: Option<String>,
    pub max_temp: Option<String>,
    pub min_temp: Option<String>,
    pub pressure: Option<String>,
    pub visibility: Option<String>,
    pub wind_speed: Option<String>,
    pub clouds: Option<String>,
    pub rain: Option<String>,
    pub snow: Option<String>,
    pub humidity: Option<String>,
    pub icon_url: Option<String>,
    pub uvi: Option<f64>,
    pub precipitation_probability: Option<String>,
    pub most_cold: Option<DayAndTime>,
    pub most_hot: Option<DayAndTime>,
    pub most_humid: Option<DayAndTime>,
    pub most_rainy: Option<DayAndTime>,
    pub most_snowy: Option<DayAndTime>,
    pub most_windy: Option<DayAndTime>,
}

impl WeatherDetails {
    /// Message lines keyed by field name, in display order.
    fn lines(&self) -> Vec<(&'static str, Option<String>)> {
        fn text(value: &Option<String>, template: impl Fn(&str) -> String) -> Option<String> {
            value.as_deref().map(template)
        }
        fn moment(value: &Option<DayAndTime>, label: &str, icon: &str) -> Option<String> {
            value
                .as_ref()
                .map(|m| format!("...{}: {} - {} {}\n", label, m.day, m.time, icon))
        }

        vec![
            ("weather_of_the_day", text(&self.day, |v| format!("{}\n", v))),
            ("latest_weather_update", text(&self.latest_update, |v| format!("Última actualización: {}\n", v))),
            ("weather_status", text(&self.status, |v| format!("Estado del clima: {}\n", v))),
            ("sunset_time", text(&self.sunset_time, |v| format!("Atardecer: {}\n", v))),
            ("sunrise_time", text(&self.sunrise_time, |v| format!("Amanecer: {}\n", v))),
            ("feels_like", text(&self.feels_like, |v| format!("Sensación térmica: {}\n", v))),
            ("temp", text(&self.temp, |v| format!("Temperatura: {} 🌡\n", v))),
            ("max_temp", text(&self.max_temp, |v| format!("Rango máximo: {}\n", v))),
            ("min_temp", text(&self.min_temp, |v| format!("Rango mínimo: {}\n", v))),
            ("pressure", text(&self.pressure, |v| format!("Presión atmosférica: {}\n", v))),
            ("visibility", text(&self.visibility, |v| format!("Visibilidad: {}\n", v))),
            ("wind_speed", text(&self.wind_speed, |v| format!("Velocidad del viento: {}\n", v))),
            ("clouds", text(&self.clouds, |v| format!("Nubes: {}\n", v))),
            ("rain", text(&self.rain, |v| format!("Lluvia: {}\n", v))),
            ("snow", text(&self.snow, |v| format!("Nieve: {}\n", v))),
            ("humidity", text(&self.humidity, |v| format!("Humedad: {}\n", v))),
            ("uvi", self.uvi.map(|v| format!("UVI: {}\n", v))),
            (
                "precipitation_probability",
                text(&self.precipitation_probability, |v| format!("Probabilidad de precipitaciones: {}\n", v)),
            ),
            ("most_cold", moment(&self.most_cold, "frío", "❄")),
            ("most_hot", moment(&self.most_hot, "cálido", "☀")),
            ("most_humid", moment(&self.most_humid, "húmedo", "🌫")),
            ("most_rainy", moment(&self.most_rainy, "lluvioso", "🌧")),
            ("most_snowy", moment(&self.most_snowy, "nevado", "🌨")),
            ("most_windy", moment(&self.most_windy, "ventoso", "🌬")),
        ]
    }
}

/// A rendered forecast reply.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherMessage {
    pub text: String,
    /// Icon to send after the text, if the provider gave one
    pub icon_url: Option<String>,
    /// Weather description to feed to [`WeatherBot::recommend`]
    pub weather_status: Option<String>,
}

/// Renders forecast details for `location` as a chat message.
///
/// Extended forecasts drop the intra-day fields (last update, sunrise,
/// sunset, temperature range). Detailed forecasts list the extremes under a
/// "Día más..." header and carry no weather status, so no recommendation
/// follows them.
pub fn build_message(details: &WeatherDetails, query: WeatherQuery, location: &str) -> WeatherMessage {
    let mut text = format!("{} 💬\n\n📍 Ubicación: {}.\n\n", BOT_NAME, location);
    if query == WeatherQuery::DetailedExtended {
        text.push_str("Día más...\n");
    }

    for (field, line) in details.lines() {
        let Some(line) = line else { continue };
        let omitted = match query {
            WeatherQuery::Current => false,
            WeatherQuery::Extended => EXTENDED_OMITTED.contains(&field),
            WeatherQuery::DetailedExtended => field == "weather_status",
        };
        if !omitted {
            text.push_str(&line);
        }
    }

    let weather_status = match query {
        WeatherQuery::DetailedExtended => None,
        _ => details.status.clone(),
    };

    WeatherMessage {
        text,
        icon_url: details.icon_url.clone(),
        weather_status,
    }
}

/// Classifier-driven decision logic of the weather bot.
#[derive(Debug, Clone)]
pub struct WeatherBot {
    models: Arc<ModelManager>,
}

impl WeatherBot {
    pub fn new(models: Arc<ModelManager>) -> Self {
        Self { models }
    }

    pub fn models(&self) -> &ModelManager {
        &self.models
    }

    /// Classifies a chat message and decides how to answer it.
    pub fn handle_message<R>(&self, text: &str, rng: &mut R) -> Result<ChatAction, ClassifierError>
    where
        R: Rng + ?Sized,
    {
        let classifier = self.models.classifier(CHAT_SECTIONS.iter().map(Section::name))?;
        let action = ChatAction::from(classifier.classify(text, rng)?);
        debug!("Message {:?} -> {:?}", text, action);
        Ok(action)
    }

    /// Picks advice for a weather description such as "lluvia ligera".
    ///
    /// The model is fitted once and reused for every later recommendation.
    pub fn recommend<R>(&self, weather_status: &str, rng: &mut R) -> Result<ResponseOutcome, ClassifierError>
    where
        R: Rng + ?Sized,
    {
        let classifier = self
            .models
            .classifier(RECOMMENDATION_SECTIONS.iter().map(Section::name))?;
        let outcome = classifier.classify(weather_status, rng)?;
        info!("Recommendation for {:?}: {:?}", weather_status, outcome.label());
        Ok(outcome)
    }

    /// Advice to send after a rendered forecast, if it carries a weather status.
    pub fn recommend_for<R>(
        &self,
        message: &WeatherMessage,
        rng: &mut R,
    ) -> Result<Option<ResponseOutcome>, ClassifierError>
    where
        R: Rng + ?Sized,
    {
        match &message.weather_status {
            Some(status) => self.recommend(status, rng).map(Some),
            None => Ok(None),
        }
    }
}
