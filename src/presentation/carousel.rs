use serde::Serialize;
use thiserror::Error;

use crate::chat::types::TriageLevel;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("a carousel needs at least one slide")]
pub struct EmptyCarousel;

/// Indexed slides with wraparound in both directions. The index is always
/// in range: an empty carousel can't be built.
#[derive(Debug, Clone, Serialize)]
pub struct Carousel<T> {
    slides: Vec<T>,
    index: usize,
}

impl<T> Carousel<T> {
    pub fn new(slides: Vec<T>) -> Result<Self, EmptyCarousel> {
        if slides.is_empty() {
            return Err(EmptyCarousel);
        }
        Ok(Self { slides, index: 0 })
    }

    pub fn current(&self) -> &T {
        &self.slides[self.index]
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.slides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    pub fn slides(&self) -> &[T] {
        &self.slides
    }

    pub fn next(&mut self) -> &T {
        self.index = (self.index + 1) % self.slides.len();
        self.current()
    }

    pub fn previous(&mut self) -> &T {
        let len = self.slides.len();
        self.index = (self.index + len - 1) % len;
        self.current()
    }

    /// Any index is accepted and reduced modulo the slide count.
    pub fn go_to(&mut self, index: usize) -> &T {
        self.index = index % self.slides.len();
        self.current()
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TriageSlide {
    pub level: u8,
    pub name: &'static str,
    pub action: &'static str,
    pub description: &'static str,
    pub examples: &'static [&'static str],
    /// Accent color for the slide, CSS hex.
    pub color: &'static str,
}

impl From<TriageLevel> for TriageSlide {
    fn from(level: TriageLevel) -> Self {
        let (description, examples, color): (&str, &[&str], &str) = match level {
            TriageLevel::ImmediateEmergency => (
                "Life-threatening symptoms that need care right now.",
                &["chest pain", "difficulty breathing", "severe bleeding", "loss of consciousness", "stroke signs"],
                "#dc2626",
            ),
            TriageLevel::Urgent => (
                "Serious symptoms that should be seen by emergency care within the hour.",
                &["severe pain", "high fever", "confusion", "suspected fracture", "severe allergic reaction"],
                "#ea580c",
            ),
            TriageLevel::Priority => (
                "Symptoms that need a doctor's attention within a day.",
                &["persistent fever", "significant pain", "signs of infection", "persistent vomiting"],
                "#ca8a04",
            ),
            TriageLevel::Routine => (
                "Symptoms worth a scheduled appointment in the coming days.",
                &["moderate pain", "persistent symptoms", "minor infection"],
                "#2563eb",
            ),
            TriageLevel::NonUrgent => (
                "Mild or long-standing issues for a routine checkup.",
                &["mild symptoms", "chronic condition management", "mild pain"],
                "#16a34a",
            ),
        };

        Self {
            level: level.level(),
            name: level.name(),
            action: level.action(),
            description,
            examples,
            color,
        }
    }
}

/// The five-level explainer shown on the landing page.
pub fn triage_carousel() -> Carousel<TriageSlide> {
    Carousel {
        slides: TriageLevel::ALL.into_iter().map(TriageSlide::from).collect(),
        index: 0,
    }
}
