use std::ops::Deref;
use std::sync::Arc;

/// Immutable slice of a shared source buffer.
///
/// Tokens matched by the cursor are handed out as `TextSlice`s so that they
/// can outlive the borrow of the cursor without copying. Comparison is by
/// text content, not by buffer identity.
#[derive(Clone, Debug)]
pub struct TextSlice {
    buffer: Arc<str>,
    start: usize,
    end: usize,
}

impl TextSlice {
    /// Creates a new slice from the given shared buffer and byte range.
    pub fn new(buffer: Arc<str>, start: usize, end: usize) -> Self {
        debug_assert!(start <= end);
        debug_assert!(end <= buffer.len());
        Self { buffer, start, end }
    }

    /// Returns the sliced text.
    pub fn as_str(&self) -> &str {
        &self.buffer[self.start..self.end]
    }

    /// Returns the start offset.
    pub fn start(&self) -> usize {
        self.start
    }

    /// Returns the end offset.
    pub fn end(&self) -> usize {
        self.end
    }
}

impl std::fmt::Display for TextSlice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Deref for TextSlice {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.as_str()
    }
}

impl AsRef<str> for TextSlice {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl From<TextSlice> for String {
    fn from(slice: TextSlice) -> Self {
        slice.as_str().to_owned()
    }
}

impl PartialEq<&str> for TextSlice {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

impl PartialEq<TextSlice> for &str {
    fn eq(&self, other: &TextSlice) -> bool {
        *self == other.as_str()
    }
}

impl PartialEq for TextSlice {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for TextSlice {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slice_views_range() {
        let buffer: Arc<str> = Arc::from("gamepad1.left_x");
        let slice = TextSlice::new(buffer, 0, 8);
        assert_eq!(slice, "gamepad1");
        assert_eq!(slice.len(), 8);
        assert_eq!(String::from(slice), "gamepad1");
    }

    #[test]
    fn test_slices_compare_by_content() {
        let a = TextSlice::new(Arc::from("navx"), 0, 4);
        let b = TextSlice::new(Arc::from("navx.heading"), 0, 4);
        assert_eq!(a, b);
    }
}
