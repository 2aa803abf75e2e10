//! Engine configuration for the host bootstrap.

/// V8 flags and heap limits applied by [`crate::platform::init`] and
/// [`crate::create_isolate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Flags passed to `v8::V8::set_flags_from_string` before the platform
    /// starts (e.g. `--expose-gc`). Ignored once the platform is running.
    pub v8_flags: Vec<String>,
    /// Initial V8 heap size in MB (default: 1MB)
    pub heap_initial_mb: usize,
    /// Maximum V8 heap size in MB (default: 128MB)
    pub heap_max_mb: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            v8_flags: Vec::new(),
            heap_initial_mb: 1,
            heap_max_mb: 128,
        }
    }
}

impl EngineConfig {
    pub fn with_flag(mut self, flag: impl Into<String>) -> Self {
        self.v8_flags.push(flag.into());
        self
    }

    pub fn with_heap_limits(mut self, initial_mb: usize, max_mb: usize) -> Self {
        self.heap_initial_mb = initial_mb;
        self.heap_max_mb = max_mb;
        self
    }

    /// All flags as the single space-separated string V8 expects.
    pub fn flags_string(&self) -> String {
        self.v8_flags.join(" ")
    }

    pub(crate) fn heap_initial_bytes(&self) -> usize {
        self.heap_initial_mb * 1024 * 1024
    }

    pub(crate) fn heap_max_bytes(&self) -> usize {
        self.heap_max_mb * 1024 * 1024
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert!(config.v8_flags.is_empty());
        assert_eq!(config.heap_initial_bytes(), 1024 * 1024);
        assert_eq!(config.heap_max_bytes(), 128 * 1024 * 1024);
    }

    #[test]
    fn test_flags_string() {
        let config = EngineConfig::default()
            .with_flag("--expose-gc")
            .with_flag("--stack-size=2048");

        assert_eq!(config.flags_string(), "--expose-gc --stack-size=2048");
    }

    #[test]
    fn test_heap_limits() {
        let config = EngineConfig::default().with_heap_limits(4, 16);
        assert_eq!(config.heap_initial_bytes(), 4 * 1024 * 1024);
        assert_eq!(config.heap_max_bytes(), 16 * 1024 * 1024);
    }
}
