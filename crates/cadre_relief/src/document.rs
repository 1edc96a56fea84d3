//! Source document being rewritten.

/// Raw text of one file together with the id the host build gave it.
///
/// The id is path-like and may carry a query suffix
/// (`/src/App.vue?vue&type=template`).
#[derive(Debug, Clone, Copy)]
pub struct SourceDocument<'a> {
    /// File id, possibly with a `?query` suffix
    pub id: &'a str,

    /// Full file content
    pub source: &'a str,
}

impl<'a> SourceDocument<'a> {
    /// Create a new document.
    pub fn new(id: &'a str, source: &'a str) -> Self {
        Self { id, source }
    }

    /// The id without its query suffix.
    pub fn path(&self) -> &'a str {
        match self.id.find('?') {
            Some(pos) => &self.id[..pos],
            None => self.id,
        }
    }

    /// The query suffix (without the `?`), if any.
    pub fn query(&self) -> Option<&'a str> {
        self.id.find('?').map(|pos| &self.id[pos + 1..])
    }

    /// Last path segment of [`Self::path`].
    pub fn filename(&self) -> &'a str {
        let path = self.path();
        path.rsplit(['/', '\\']).next().unwrap_or(path)
    }
}
