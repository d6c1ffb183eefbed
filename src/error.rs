//! Error taxonomy for scene mutation and transform resolution.

/// Errors surfaced by the scene core.
///
/// None of these are retried. Mutation errors leave the scene untouched;
/// resolution errors are reported by the frame renderer and the offending
/// object is drawn without its group.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum SceneError {
    /// A drawable object references a type with no registered geometry.
    #[error("no model registered for type '{0}'")]
    UnknownModel(String),

    /// A color string is not 3, 4, 6 or 8 hexadecimal digits.
    #[error("malformed color '{0}'")]
    InvalidColor(String),

    /// Following `group` references from this object leads back to it.
    #[error("group cycle detected while resolving '{0}'")]
    GroupCycle(String),

    /// Texture pixels could not be decoded or do not match the declared size.
    #[error("invalid texture '{id}': {reason}")]
    InvalidTexture { id: String, reason: String },
}

pub type Result<T> = std::result::Result<T, SceneError>;
