use thiserror::Error;

use super::SharedFontKind;

#[derive(Debug, Error)]
pub enum FontError {
    #[error("shared font {kind} is unavailable")]
    Unavailable {
        kind: SharedFontKind,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("shared font {0} has no data")]
    Empty(SharedFontKind),
}
