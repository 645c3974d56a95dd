//! Result of looking up a resource that may have vanished.

/// A resource that was present, or one that another agent removed first.
#[derive(Clone, Debug, PartialEq)]
pub enum ResourceLookup<T> {
    /// The resource exists.
    Present(T),
    /// The resource is gone.
    Vanished,
}

impl<T> ResourceLookup<T> {
    /// `true` for [`ResourceLookup::Present`].
    pub fn is_present(&self) -> bool {
        matches!(self, Self::Present(_))
    }

    /// Convert to an `Option`.
    pub fn present(self) -> Option<T> {
        match self {
            Self::Present(v) => Some(v),
            Self::Vanished => None,
        }
    }
}

impl<T> From<Option<T>> for ResourceLookup<T> {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Vanished, Self::Present)
    }
}
