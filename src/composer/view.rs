//! Render model for the results area: itinerary heading and recommendation cards.

use std::fmt;

use crate::models::Recommendation;

/// One rendered recommendation, fields copied verbatim from the response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecommendationCard {
    pub title: String,
    pub explanation: String,
    pub activity: String,
}

impl From<&Recommendation> for RecommendationCard {
    fn from(recommendation: &Recommendation) -> Self {
        Self {
            title: recommendation.title.clone(),
            explanation: recommendation.explanation.clone(),
            activity: recommendation.activity.clone(),
        }
    }
}

impl fmt::Display for RecommendationCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        writeln!(f, "{}", self.explanation)?;
        write!(f, "Suggested Activity: {}", self.activity)
    }
}

/// What the results area should show for the current submission state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComposerView {
    /// Nothing submitted yet, or the last submission returned no items
    Hidden,
    Loading,
    Error(String),
    Itinerary {
        heading: String,
        cards: Vec<RecommendationCard>,
    },
}

pub fn itinerary_heading(city: &str) -> String {
    format!("Your Personalized {} Itinerary", city)
}
