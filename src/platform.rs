//! Platform Classification Module
//!
//! The engine sizes itself from a coarse device/form-factor class supplied
//! by an external detector. The engine only consumes the classification;
//! it pulls the current value on demand and never subscribes to updates.

// == Platform Class ==
/// Coarse resource class of the host platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlatformClass {
    /// Constrained devices; smallest cache, aggressive cleanup
    Compact,
    Medium,
    Large,
    ExtraLarge,
}

// == Platform Context Provider ==
/// Pull-based source of the current platform classification.
///
/// Returning `None` means the classification is unavailable; callers fall
/// back to the most conservative (compact) profile.
pub trait PlatformContextProvider: Send + Sync + 'static {
    fn classification(&self) -> Option<PlatformClass>;
}

// == Fixed Platform ==
/// Provider that always reports the same classification.
///
/// Useful for composition roots that classify once at startup, and for
/// tests.
#[derive(Debug, Clone)]
pub struct FixedPlatform {
    class: Option<PlatformClass>,
}

impl FixedPlatform {
    /// Creates a provider pinned to the given class.
    pub fn new(class: PlatformClass) -> Self {
        Self { class: Some(class) }
    }

    /// Creates a provider with no classification available.
    pub fn unavailable() -> Self {
        Self { class: None }
    }
}

impl PlatformContextProvider for FixedPlatform {
    fn classification(&self) -> Option<PlatformClass> {
        self.class
    }
}
