//! Result encoding
//!
//! Packages decoded predictions into the stable output schemas the calling
//! collaborators consume. Pure, side-effect-free constructors.

use serde::{Deserialize, Serialize};

use super::ClassPrediction;

/// Batch path response body: `{"predictions": [int, ...]}`, index-aligned
/// with the input batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchPrediction {
    pub predictions: Vec<i64>,
}

pub fn encode_batch(predictions: Vec<i64>) -> BatchPrediction {
    BatchPrediction { predictions }
}

/// Single-image prediction record persisted by the event collaborator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRecord {
    pub source_key: String,
    pub class_id: usize,
    pub class_name: String,
    pub score: f32,
}

/// Event path response: the record plus a fixed status code
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub body: PredictionRecord,
}

pub fn encode_event(source_key: String, prediction: ClassPrediction) -> EventResponse {
    EventResponse {
        status_code: 200,
        body: PredictionRecord {
            source_key,
            class_id: prediction.class_id,
            class_name: prediction.class_name,
            score: prediction.score,
        },
    }
}
