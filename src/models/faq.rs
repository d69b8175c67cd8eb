use serde::{Deserialize, Serialize};

/// One question/answer pair as it appears in the FAQ file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaqRecord {
    pub question: String,
    pub answer: String,
}

/// A FAQ record together with the embedding of its question
#[derive(Debug, Clone, PartialEq)]
pub struct FaqEntry {
    pub question: String,
    pub answer: String,
    pub embedding: Vec<f32>,
}

impl FaqEntry {
    pub fn new(record: FaqRecord, embedding: Vec<f32>) -> Self {
        Self {
            question: record.question,
            answer: record.answer,
            embedding,
        }
    }
}
