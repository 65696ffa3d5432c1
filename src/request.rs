//! Generation requests
//!
//! The trip parameters a user submits for itinerary generation. Requests are built
//! once, validated, and never mutated after submission.

use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

pub const MIN_DAYS: u32 = 1;
pub const MAX_DAYS: u32 = 5;
pub const DEFAULT_DAYS: u32 = 2;
pub const DEFAULT_TRAVELERS: u32 = 2;
pub const DEFAULT_DISPLAY_NAME: &str = "My Weekend Trip";

/// Preference tags understood by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preference {
    Food,
    Outdoor,
    Shopping,
    Culture,
    Relax,
    Adventure,
    Family,
}

impl Preference {
    pub const ALL: [Preference; 7] = [
        Preference::Food,
        Preference::Outdoor,
        Preference::Shopping,
        Preference::Culture,
        Preference::Relax,
        Preference::Adventure,
        Preference::Family,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Preference::Food => "food",
            Preference::Outdoor => "outdoor",
            Preference::Shopping => "shopping",
            Preference::Culture => "culture",
            Preference::Relax => "relax",
            Preference::Adventure => "adventure",
            Preference::Family => "family",
        }
    }
}

impl fmt::Display for Preference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Preference {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        Preference::ALL
            .into_iter()
            .find(|pref| pref.as_str() == needle)
            .ok_or_else(|| {
                let known: Vec<&str> = Preference::ALL.iter().map(|p| p.as_str()).collect();
                ValidationError::new(
                    "preferences",
                    format!("unknown preference '{}' (expected one of: {})", s, known.join(", ")),
                )
            })
    }
}

/// Trip parameters for one generation attempt.
///
/// Serializes to the backend's camelCase request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    agent_name: String,
    destination: String,
    days: u32,
    #[serde(default)]
    budget: String,
    travelers: u32,
    #[serde(default)]
    preferences: BTreeSet<Preference>,
    #[serde(default)]
    extra_requirements: String,
}

impl GenerationRequest {
    pub fn new(destination: impl Into<String>) -> Self {
        Self {
            agent_name: DEFAULT_DISPLAY_NAME.to_string(),
            destination: destination.into(),
            days: DEFAULT_DAYS,
            budget: String::new(),
            travelers: DEFAULT_TRAVELERS,
            preferences: BTreeSet::new(),
            extra_requirements: String::new(),
        }
    }

    pub fn days(mut self, days: u32) -> Self {
        self.days = days;
        self
    }

    pub fn travelers(mut self, travelers: u32) -> Self {
        self.travelers = travelers;
        self
    }

    pub fn budget(mut self, budget: impl Into<String>) -> Self {
        self.budget = budget.into();
        self
    }

    pub fn preference(mut self, preference: Preference) -> Self {
        self.preferences.insert(preference);
        self
    }

    pub fn preferences(mut self, preferences: impl IntoIterator<Item = Preference>) -> Self {
        self.preferences.extend(preferences);
        self
    }

    pub fn extra_requirements(mut self, extra: impl Into<String>) -> Self {
        self.extra_requirements = extra.into();
        self
    }

    /// Set the display name; blank names keep the default label.
    pub fn display_name(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if !name.trim().is_empty() {
            self.agent_name = name;
        }
        self
    }

    pub fn destination_name(&self) -> &str {
        &self.destination
    }

    pub fn day_count(&self) -> u32 {
        self.days
    }

    pub fn traveler_count(&self) -> u32 {
        self.travelers
    }

    pub fn budget_text(&self) -> Option<&str> {
        non_empty(&self.budget)
    }

    pub fn preference_tags(&self) -> &BTreeSet<Preference> {
        &self.preferences
    }

    pub fn extra_requirements_text(&self) -> Option<&str> {
        non_empty(&self.extra_requirements)
    }

    pub fn display_label(&self) -> &str {
        &self.agent_name
    }

    /// Check submission preconditions. The first violated field wins.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.destination.trim().is_empty() {
            return Err(ValidationError::new("destination", "must not be empty"));
        }
        if !(MIN_DAYS..=MAX_DAYS).contains(&self.days) {
            return Err(ValidationError::new(
                "days",
                format!(
                    "must be between {} and {} (got {})",
                    MIN_DAYS, MAX_DAYS, self.days
                ),
            ));
        }
        if self.travelers < 1 {
            return Err(ValidationError::new("travelers", "must be at least 1"));
        }
        Ok(())
    }
}

fn non_empty(value: &str) -> Option<&str> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}
