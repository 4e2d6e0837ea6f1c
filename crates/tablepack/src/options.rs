//! Encoder and decoder configuration.

/// Default limit on container nesting, in both directions.
pub const DEFAULT_MAX_DEPTH: usize = 512;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncoderOptions {
    /// Maximum number of nested tables on any path from the root.
    pub max_depth: usize,
    /// Emit integral numbers within ±(2^53 - 1) as MessagePack integers instead
    /// of float64. Off by default: every number goes out as a float64.
    pub compact_integers: bool,
}

impl Default for EncoderOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            compact_integers: false,
        }
    }
}

impl EncoderOptions {
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_compact_integers(mut self, compact_integers: bool) -> Self {
        self.compact_integers = compact_integers;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecoderOptions {
    /// Maximum number of nested arrays/maps on any path from the root.
    pub max_depth: usize,
}

impl Default for DecoderOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl DecoderOptions {
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}
