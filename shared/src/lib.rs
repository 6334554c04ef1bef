use serde::{Serialize, Deserialize};

pub mod cache;
pub mod config;
pub mod pagination;
pub mod reorder;
pub mod scroll;
pub mod search;

pub use cache::{CacheEntry, Clock, StorageBackend, StorageError, SystemClock, TtlCache};
pub use config::{ConfigError, UiConfig};
pub use pagination::{Page, PageRequest, Paginator};
pub use reorder::{DragState, Orderable, ReorderEngine};
pub use scroll::{ArmChange, ObserverOptions, ObserverRoot, ProximityTrigger, ScrollMetrics, VisibilityTrigger};

// ===== QUIZ TYPES =====

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Question {
    pub id: u64,
    pub text: String,
    #[serde(rename = "type")]
    pub kind: QuestionKind,
    pub difficulty: Option<Difficulty>,
    pub points: Option<u32>,
    pub order: u32,
}

impl Orderable for Question {
    fn set_order(&mut self, order: u32) {
        self.order = order;
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    MultipleChoice,
    TrueFalse,
    ShortAnswer,
    Essay,
}

impl QuestionKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::MultipleChoice => "Multiple choice",
            Self::TrueFalse => "True/False",
            Self::ShortAnswer => "Short answer",
            Self::Essay => "Essay",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Self::MultipleChoice => "☑️",
            Self::TrueFalse => "✓✗",
            Self::ShortAnswer => "📝",
            Self::Essay => "📄",
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Easy => "Easy",
            Self::Medium => "Medium",
            Self::Hard => "Hard",
        }
    }
}

/// Persist payload for a reordered quiz: `[{"id": 3, "order": 1}, ...]`
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuestionOrder {
    pub id: u64,
    pub order: u32,
}

pub fn question_orders(questions: &[Question]) -> Vec<QuestionOrder> {
    questions
        .iter()
        .map(|question| QuestionOrder {
            id: question.id,
            order: question.order,
        })
        .collect()
}

// ===== COURSE TYPES =====

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Course {
    pub id: u64,
    pub title: String,
    pub instructor: String,
}

// ===== MESSAGE TYPES =====

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Message {
    pub id: u64,
    pub author: String,
    pub body: String,
}
