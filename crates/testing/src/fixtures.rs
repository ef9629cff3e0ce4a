//! Test fixtures for model records, leaderboard scenarios and datasets.

use bytes::Bytes;
use chrono::Utc;
use fake::{
    faker::{
        internet::en::FreeEmail,
        lorem::en::{Sentence, Word},
    },
    Fake,
};
use modelabs_application::DatasetUpload;
use modelabs_domain::{DatasetVisibility, ModelRecord, ModelType};

use crate::builders::{DatasetRecordBuilder, ModelRecordBuilder};

/// Overall scores of [`language_model_records`], in store order
pub const SCENARIO_SCORES: [f64; 4] = [72.1, 88.5, 88.5, 60.0];

/// Ids of [`language_model_records`], in store order
pub const SCENARIO_IDS: [&str; 4] = ["llama-3-70b", "gpt-4o", "claude-3-opus", "mistral-7b"];

/// Four language models scored `[72.1, 88.5, 88.5, 60.0]`.
///
/// Ranked, the expected order is `gpt-4o`, `claude-3-opus`, `llama-3-70b`,
/// `mistral-7b`: the tie keeps store order.
pub fn language_model_records() -> Vec<ModelRecord> {
    SCENARIO_IDS
        .iter()
        .zip(SCENARIO_SCORES)
        .map(|(id, score)| {
            ModelRecordBuilder::new(*id)
                .with_type(ModelType::LanguageModel)
                .with_overall_score(score)
                .with_category_score("inference", score)
                .with_category_score("coding", score)
                .build()
        })
        .collect()
}

/// Two scored multimodal models and one that was never evaluated
pub fn multimodal_model_records() -> Vec<ModelRecord> {
    vec![
        ModelRecordBuilder::new("gemini-pro-vision")
            .with_type(ModelType::Multimodal)
            .with_overall_score(79.25)
            .with_category_score("visual_recognition", 81.0)
            .with_category_score("audio_processing", 77.5)
            .build(),
        ModelRecordBuilder::new("llava-1.6")
            .with_type(ModelType::Multimodal)
            .with_overall_score(68.4)
            .with_category_score("visual_recognition", 68.4)
            .build(),
        ModelRecordBuilder::new("unreleased-mm")
            .with_type(ModelType::Multimodal)
            .build(),
    ]
}

/// Create a public dataset record with random text fields
pub fn create_test_dataset() -> modelabs_domain::DatasetRecord {
    DatasetRecordBuilder::new()
        .with_name(Word().fake::<String>())
        .with_description(Sentence(3..8).fake::<String>())
        .uploaded_at(Utc::now())
        .build()
}

/// A small CSV upload owned by `user_id`
pub fn csv_upload(user_id: &str) -> DatasetUpload {
    DatasetUpload {
        file_name: "scores.csv".to_string(),
        content_type: Some("text/csv".to_string()),
        data: Bytes::from_static(b"model,score\nm1,72.1\nm2,88.5\n"),
        user_id: Some(user_id.to_string()),
        user_email: Some(FreeEmail().fake()),
        name: Some("Scores".to_string()),
        description: Some(Sentence(3..6).fake()),
        tags: vec!["eval".to_string()],
        visibility: DatasetVisibility::Public,
    }
}
