//! Request-scoped services behind the web layer

pub mod addon;

pub use addon::AddonService;

/// Result of a soft-failing operation.
///
/// Callers always get a usable value. `Degraded` carries the reason the value
/// is empty or minimal so the caller can log it.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Ready(T),
    Degraded { value: T, reason: String },
}

impl<T> Outcome<T> {
    pub fn degraded(value: T, reason: impl Into<String>) -> Self {
        Self::Degraded {
            value,
            reason: reason.into(),
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::Degraded { .. })
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Ready(_) => None,
            Self::Degraded { reason, .. } => Some(reason),
        }
    }

    pub fn value(&self) -> &T {
        match self {
            Self::Ready(value) | Self::Degraded { value, .. } => value,
        }
    }

    pub fn into_value(self) -> T {
        match self {
            Self::Ready(value) | Self::Degraded { value, .. } => value,
        }
    }
}
