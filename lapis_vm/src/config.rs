//! Virtual machine configuration.

/// Tunables fixed at VM construction.
#[derive(Debug, Clone)]
pub struct VmConfig {
    /// Operand-stack capacity per thread. Exceeding it is fatal.
    pub stack_capacity: usize,
    /// Maximum call-frame depth per thread.
    pub max_frames: usize,
    /// Install the raw-pointer escape hatches (`Float#ptr`). Off by
    /// default; the addresses handed out are only as safe as the embedder
    /// that asked for them.
    pub unsafe_ffi: bool,
    /// Log every dispatched instruction and an operand-stack snapshot at
    /// trace level.
    pub trace_instructions: bool,
}

impl Default for VmConfig {
    fn default() -> Self {
        Self {
            stack_capacity: 512,
            max_frames: 1024,
            unsafe_ffi: false,
            trace_instructions: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_conservative() {
        let config = VmConfig::default();
        assert!(!config.unsafe_ffi);
        assert!(!config.trace_instructions);
        assert!(config.stack_capacity >= 256);
    }
}
