//! Parse configuration.

/// Image width used when a surface declares none.
pub const DEFAULT_WIDTH: u32 = 1500;

/// Image height used when a surface declares none.
pub const DEFAULT_HEIGHT: u32 = 2800;

/// What to do with segments whose positional reference resolves to no line zone.
///
/// This covers segments with no reference at all, segments pointing at a
/// block zone, and segments pointing at an id that does not exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum UnresolvedPolicy {
    /// Leave them out of the book entirely.
    #[default]
    Drop,
    /// Keep them, in reading order, in [`Book::unattached`](crate::Book::unattached).
    Collect,
    /// Attach them to the page named by the closest preceding page break.
    ///
    /// A broken `facs` reference still yields its diagnostic.
    FollowPageBreak,
}

/// Options controlling how a document becomes a [`Book`](crate::Book).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    pub unresolved: UnresolvedPolicy,
    pub default_width: u32,
    pub default_height: u32,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            unresolved: UnresolvedPolicy::Drop,
            default_width: DEFAULT_WIDTH,
            default_height: DEFAULT_HEIGHT,
        }
    }
}

impl ParseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_unresolved(mut self, policy: UnresolvedPolicy) -> Self {
        self.unresolved = policy;
        self
    }

    pub fn with_default_size(mut self, width: u32, height: u32) -> Self {
        self.default_width = width;
        self.default_height = height;
        self
    }
}
