//! Hub tuning knobs.

/// Default number of envelope slots reserved for a new group's buffer.
pub const DEFAULT_BUFFER_CAPACITY: usize = 16;

/// Settings for an [`EventHub`](crate::EventHub).
///
/// None of these change routing or ordering; they only affect allocation
/// and diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HubConfig {
    /// Envelope slots reserved when a group is created.
    pub initial_buffer_capacity: usize,
    /// Log envelopes that no subscription handled at `warn` instead of `debug`.
    pub warn_on_unhandled: bool,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            initial_buffer_capacity: DEFAULT_BUFFER_CAPACITY,
            warn_on_unhandled: false,
        }
    }
}

impl HubConfig {
    /// Default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the per-group initial buffer capacity.
    #[must_use]
    pub fn with_initial_buffer_capacity(mut self, capacity: usize) -> Self {
        self.initial_buffer_capacity = capacity;
        self
    }

    /// Log unhandled envelopes at `warn`.
    #[must_use]
    pub fn with_warn_on_unhandled(mut self) -> Self {
        self.warn_on_unhandled = true;
        self
    }
}

#[cfg(feature = "config")]
impl From<&tidings_config::HubSection> for HubConfig {
    fn from(section: &tidings_config::HubSection) -> Self {
        Self {
            initial_buffer_capacity: section.initial_buffer_capacity,
            warn_on_unhandled: section.warn_on_unhandled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hub_config_default() {
        let config = HubConfig::default();
        assert_eq!(config.initial_buffer_capacity, DEFAULT_BUFFER_CAPACITY);
        assert!(!config.warn_on_unhandled);
    }

    #[test]
    fn test_hub_config_builder() {
        let config = HubConfig::new()
            .with_initial_buffer_capacity(256)
            .with_warn_on_unhandled();
        assert_eq!(config.initial_buffer_capacity, 256);
        assert!(config.warn_on_unhandled);
    }

    #[cfg(feature = "config")]
    #[test]
    fn test_hub_config_from_section() {
        let section = tidings_config::HubSection {
            initial_buffer_capacity: 8,
            warn_on_unhandled: true,
        };
        let config = HubConfig::from(&section);
        assert_eq!(config.initial_buffer_capacity, 8);
        assert!(config.warn_on_unhandled);
    }
}
