//! Per-user location history driven by the `/location` command.

use lazy_static::lazy_static;
use log::debug;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Number of locations remembered per user.
pub const MAX_LOCATIONS: usize = 5;

/// Reply that aborts the location dialog.
pub const CANCEL_KEYWORD: &str = "cancelar";

const COMMAND_PREFIX: &str = "/location";

lazy_static! {
    // City, Province/State, Country
    static ref LOCATION_RE: Regex =
        Regex::new(r"(?i)^\s*[\w\s]+,\s*[\w\s]+,\s*[\w\s]+\s*$").expect("valid location regex");
}

/// Checks the `City, Province/State, Country` format.
pub fn validate_location(text: &str) -> bool {
    LOCATION_RE.is_match(text)
}

/// Result of feeding one message to [`LocationBook::handle`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocationUpdate {
    /// The user aborted the dialog
    Cancelled,
    /// A remembered location was moved to the front
    Selected(String),
    /// A new location was stored as the current one
    Added(String),
    /// The input was not understood; ask again, showing the history
    Prompt {
        rejected: Option<String>,
        history: Vec<String>,
    },
}

/// Most-recent-first list of a user's locations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationBook {
    locations: Vec<String>,
}

impl LocationBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restores a stored history, keeping at most [`MAX_LOCATIONS`] entries.
    pub fn from_locations(mut locations: Vec<String>) -> Self {
        locations.truncate(MAX_LOCATIONS);
        Self { locations }
    }

    /// The location forecasts are requested for.
    pub fn current(&self) -> Option<&str> {
        self.locations.first().map(String::as_str)
    }

    pub fn locations(&self) -> &[String] {
        &self.locations
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    /// Moves the entry at the 1-based `position` to the front.
    pub fn select(&mut self, position: usize) -> Option<&str> {
        if position == 0 || position > self.locations.len() {
            return None;
        }
        let location = self.locations.remove(position - 1);
        self.locations.insert(0, location);
        self.current()
    }

    /// Stores a location as the current one, dropping the oldest entry when full.
    /// A location already in the book is moved to the front instead.
    pub fn add(&mut self, location: &str) -> &str {
        let location = location.trim().to_string();
        if let Some(pos) = self.locations.iter().position(|l| l.eq_ignore_ascii_case(&location)) {
            self.locations.remove(pos);
        }
        self.locations.insert(0, location);
        self.locations.truncate(MAX_LOCATIONS);
        &self.locations[0]
    }

    /// Applies one message of the location dialog.
    ///
    /// Accepts an optional leading `/location`, then in order: the cancel
    /// keyword, a 1-based history index, or a new location.
    pub fn handle(&mut self, input: &str) -> LocationUpdate {
        let input = input.trim();
        let input = input.strip_prefix(COMMAND_PREFIX).unwrap_or(input).trim();
        debug!("Location input: {:?}", input);

        if input.to_lowercase() == CANCEL_KEYWORD {
            return LocationUpdate::Cancelled;
        }

        if let Ok(position) = input.parse::<usize>() {
            if let Some(location) = self.select(position) {
                return LocationUpdate::Selected(location.to_string());
            }
        }

        if validate_location(input) {
            return LocationUpdate::Added(self.add(input).to_string());
        }

        LocationUpdate::Prompt {
            rejected: (!input.is_empty()).then(|| input.to_string()),
            history: self.locations.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_location() {
        assert!(validate_location("San Miguel, Buenos Aires, Argentina"));
        assert!(validate_location("  córdoba ,córdoba,  ARGENTINA "));
        assert!(!validate_location("San Miguel, Argentina"));
        assert!(!validate_location("San Miguel; Buenos Aires; Argentina"));
        assert!(!validate_location(""));
    }

    #[test]
    fn test_add_keeps_five_most_recent() {
        let mut book = LocationBook::new();
        for i in 1..=6 {
            book.add(&format!("Ciudad {}, Provincia, País", i));
        }
        assert_eq!(book.len(), MAX_LOCATIONS);
        assert_eq!(book.current(), Some("Ciudad 6, Provincia, País"));
        assert!(!book.locations().iter().any(|l| l.starts_with("Ciudad 1,")));
    }

    #[test]
    fn test_add_existing_moves_to_front() {
        let mut book = LocationBook::from_locations(vec!["A, B, C".into(), "D, E, F".into()]);
        book.add("D, E, F");
        assert_eq!(book.locations(), &["D, E, F", "A, B, C"]);
    }

    #[test]
    fn test_handle_dialog() {
        let mut book = LocationBook::new();

        assert_eq!(book.handle("/location Cancelar"), LocationUpdate::Cancelled);
        assert_eq!(
            book.handle("/location Rosario, Santa Fe, Argentina"),
            LocationUpdate::Added("Rosario, Santa Fe, Argentina".into())
        );
        book.handle("Mendoza, Mendoza, Argentina");

        assert_eq!(
            book.handle("2"),
            LocationUpdate::Selected("Rosario, Santa Fe, Argentina".into())
        );
        assert_eq!(book.current(), Some("Rosario, Santa Fe, Argentina"));

        match book.handle("7") {
            LocationUpdate::Prompt { rejected, history } => {
                assert_eq!(rejected.as_deref(), Some("7"));
                assert_eq!(history.len(), 2);
            }
            other => panic!("unexpected update: {:?}", other),
        }

        assert_eq!(
            book.handle("/location"),
            LocationUpdate::Prompt { rejected: None, history: book.locations().to_vec() }
        );
    }
}
