use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmotionLabel(String);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("emotion label must be a non-empty string")]
pub struct EmptyEmotionLabel;

impl EmotionLabel {
    pub fn new(raw: impl Into<String>) -> Result<Self, EmptyEmotionLabel> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(EmptyEmotionLabel);
        }
        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for EmotionLabel {
    type Error = EmptyEmotionLabel;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<EmotionLabel> for String {
    fn from(value: EmotionLabel) -> Self {
        value.0
    }
}

impl fmt::Display for EmotionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationCategory {
    Music,
    Movie,
    Book,
}

impl RecommendationCategory {
    /// Display order used by every front end.
    pub const ALL: [RecommendationCategory; 3] = [Self::Music, Self::Movie, Self::Book];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Music => "music",
            Self::Movie => "movie",
            Self::Book => "book",
        }
    }

    pub fn heading(self) -> &'static str {
        match self {
            Self::Music => "Music Recommendation",
            Self::Movie => "Movie Recommendation",
            Self::Book => "Book Recommendation",
        }
    }
}

impl fmt::Display for RecommendationCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub title: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
}

/// At most one recommendation per category. A `None` slot means the service
/// had nothing for that category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationSet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub music: Option<Recommendation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub movie: Option<Recommendation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub book: Option<Recommendation>,
}

impl RecommendationSet {
    pub fn get(&self, category: RecommendationCategory) -> Option<&Recommendation> {
        match category {
            RecommendationCategory::Music => self.music.as_ref(),
            RecommendationCategory::Movie => self.movie.as_ref(),
            RecommendationCategory::Book => self.book.as_ref(),
        }
    }

    pub fn insert(&mut self, category: RecommendationCategory, recommendation: Recommendation) {
        let slot = match category {
            RecommendationCategory::Music => &mut self.music,
            RecommendationCategory::Movie => &mut self.movie,
            RecommendationCategory::Book => &mut self.book,
        };
        *slot = Some(recommendation);
    }

    pub fn iter(&self) -> impl Iterator<Item = (RecommendationCategory, &Recommendation)> + '_ {
        RecommendationCategory::ALL
            .into_iter()
            .filter_map(|category| self.get(category).map(|rec| (category, rec)))
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }
}
