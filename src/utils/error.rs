use thiserror::Error;

#[derive(Error, Debug)]
pub enum SheetError {
    #[error("Sheet not initialized")]
    Uninitialized,

    #[error("Topic \"{name}\" not found")]
    TopicNotFound { name: String },

    #[error("Sub-topic \"{name}\" not found under \"{topic}\"")]
    SubTopicNotFound { topic: String, name: String },

    #[error("Question \"{id}\" not found")]
    QuestionNotFound { id: String },

    #[error("Topic \"{name}\" already exists")]
    DuplicateTopic { name: String },

    #[error("Sub-topic \"{name}\" already exists under \"{topic}\"")]
    DuplicateSubTopic { topic: String, name: String },

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("API rejected the request: {message}")]
    ApiRejected { message: String },

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Invalid value for {field}: \"{value}\" ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

pub type Result<T> = std::result::Result<T, SheetError>;
