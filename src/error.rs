use thiserror::Error;

/// Errors raised while validating, mapping, or rendering a dataset.
///
/// Every failure surfaces synchronously to the `plot` caller; nothing is
/// retried or downgraded. Validation runs before any drawing begins, so a
/// failed call never leaves a partially rendered figure behind.
#[derive(Error, Debug)]
pub enum PlotError {
    #[error("headers must name at least one attribute")]
    EmptyHeaders,

    #[error("a parallel coordinate plot needs at least two attributes, got {0}")]
    TooFewAxes(usize),

    #[error("dataset contains no entities")]
    NoEntities,

    #[error("entity '{entity}' has {found} values but there are {expected} headers")]
    RowLength {
        entity: String,
        expected: usize,
        found: usize,
    },

    #[error("column '{header}' (index {index}) mixes value kinds: {kinds}")]
    MixedKinds {
        header: String,
        index: usize,
        kinds: String,
    },

    #[error("value '{value}' was not seen when the category mapping was fitted")]
    UnknownValue { value: String },

    #[error("rendering failed: {0}")]
    Render(String),
}
