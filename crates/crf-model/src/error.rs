use thiserror::Error;

/// Errors raised when decoding or resolving CRF item configuration.
#[derive(Debug, Error)]
pub enum ModelError {
    /// The two encoded option fields decode to different lengths.
    #[error("item {item}: {texts} response options but {values} stored values")]
    OptionCountMismatch {
        item: String,
        texts: usize,
        values: usize,
    },

    /// A conditional display rule references an item the section does not contain.
    #[error("conditional display on {item} references unknown item {trigger}")]
    UnknownTriggerItem { item: String, trigger: String },

    /// A conditional display rule did not pack exactly three parts.
    #[error("conditional display on {item} has {parts} parts, expected 3")]
    MalformedConditionalDisplay { item: String, parts: usize },
}

pub type Result<T> = std::result::Result<T, ModelError>;
