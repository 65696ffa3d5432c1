//! Itinerary documents
//!
//! The generation backend produces an itinerary as a JSON document. The workflow
//! treats it as opaque; presentation code can ask for a typed view.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Opaque itinerary payload as produced by the generation service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItineraryDocument(Value);

impl ItineraryDocument {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }

    /// Copy of the document with `destination` and `dayCount` attached.
    ///
    /// Non-object documents are returned unchanged; existing keys are kept.
    pub fn with_trip_metadata(&self, destination: &str, day_count: u32) -> Self {
        let mut value = self.0.clone();
        if let Value::Object(map) = &mut value {
            map.entry("destination")
                .or_insert_with(|| Value::String(destination.to_string()));
            map.entry("dayCount")
                .or_insert_with(|| Value::from(day_count));
        }
        Self(value)
    }

    /// Typed view of the document, if it follows the backend's itinerary schema.
    pub fn parse(&self) -> Result<TravelItinerary, serde_json::Error> {
        TravelItinerary::deserialize(&self.0)
    }
}

impl From<Value> for ItineraryDocument {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TravelItinerary {
    pub overview: BudgetOverview,
    #[serde(default)]
    pub daily_plans: Vec<DailyPlan>,
    #[serde(default)]
    pub hidden_gems: Vec<HiddenGem>,
    #[serde(default)]
    pub practical_tips: Option<PracticalTips>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetOverview {
    pub total_budget: f64,
    #[serde(default)]
    pub budget_breakdown: Vec<BudgetItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetItem {
    pub category: String,
    pub amount: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyPlan {
    pub day: u32,
    pub title: String,
    #[serde(default)]
    pub activities: Vec<Activity>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Activity {
    pub time: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub cost: f64,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub images: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HiddenGem {
    pub title: String,
    pub description: String,
    pub category: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PracticalTips {
    #[serde(default)]
    pub transportation: String,
    #[serde(default)]
    pub packing_list: Vec<String>,
    #[serde(default)]
    pub weather: String,
    #[serde(default)]
    pub seasonal_notes: String,
}

impl TravelItinerary {
    pub fn activity_count(&self) -> usize {
        self.daily_plans.iter().map(|d| d.activities.len()).sum()
    }
}
