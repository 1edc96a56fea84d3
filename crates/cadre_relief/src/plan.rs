//! Injection plans.
//!
//! A plan is an ordered list of insertions in the coordinate space of the
//! original document. Offsets never account for other insertions, so plans
//! can be applied together in any order as long as each keeps its own
//! offsets.

/// Which side of an offset an insertion sticks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Anchor {
    /// Attach to the text preceding the offset (rendered first at a shared
    /// offset).
    Before,
    /// Attach to the text following the offset.
    After,
}

/// A single planned insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Insertion {
    /// Byte offset in the original document
    pub offset: usize,

    /// Inserted text
    pub text: String,

    /// Side of `offset` the text attaches to
    pub anchor: Anchor,
}

/// Ordered list of insertions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InjectionPlan {
    insertions: Vec<Insertion>,
}

impl InjectionPlan {
    /// Create an empty plan.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an insertion. Offsets must be non-decreasing.
    pub fn push(&mut self, insertion: Insertion) -> &mut Self {
        debug_assert!(
            self.insertions
                .last()
                .is_none_or(|last| last.offset <= insertion.offset),
            "insertion offsets must be non-decreasing"
        );
        self.insertions.push(insertion);
        self
    }

    /// Insert `text` attached to whatever precedes `offset`.
    pub fn insert_before(&mut self, offset: usize, text: impl Into<String>) -> &mut Self {
        self.push(Insertion {
            offset,
            text: text.into(),
            anchor: Anchor::Before,
        })
    }

    /// Insert `text` attached to whatever follows `offset`.
    pub fn insert_after(&mut self, offset: usize, text: impl Into<String>) -> &mut Self {
        self.push(Insertion {
            offset,
            text: text.into(),
            anchor: Anchor::After,
        })
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.insertions.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.insertions.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Insertion> {
        self.insertions.iter()
    }
}

impl<'p> IntoIterator for &'p InjectionPlan {
    type Item = &'p Insertion;
    type IntoIter = std::slice::Iter<'p, Insertion>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
