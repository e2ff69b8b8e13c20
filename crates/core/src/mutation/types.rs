use crate::document::DocumentId;

/// How a list delete addresses its document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteTarget {
    ById(DocumentId),
    /// By the media host's reference for the document's image.
    ByPublicId(String),
}

/// Result of a create-or-update write.
#[derive(Debug, Clone, PartialEq)]
pub enum SaveOutcome<T> {
    Created(T),
    Updated(T),
}

impl<T> SaveOutcome<T> {
    pub fn is_created(&self) -> bool {
        matches!(self, SaveOutcome::Created(_))
    }

    pub fn into_inner(self) -> T {
        match self {
            SaveOutcome::Created(v) | SaveOutcome::Updated(v) => v,
        }
    }

    pub fn get(&self) -> &T {
        match self {
            SaveOutcome::Created(v) | SaveOutcome::Updated(v) => v,
        }
    }
}
