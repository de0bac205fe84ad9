//! Stack of open elements.

use std::borrow::Cow;

/// Names of the elements opened and not yet closed, innermost last.
///
/// Entries borrow from the markup unless case normalization had to allocate.
#[derive(Clone, Debug, Default)]
pub(crate) struct OpenElementStack<'a> {
    items: Vec<Cow<'a, str>>,
    max_depth: usize,
}

impl<'a> OpenElementStack<'a> {
    pub(crate) fn push(&mut self, name: Cow<'a, str>) {
        self.items.push(name);
        self.max_depth = self.max_depth.max(self.items.len());
    }

    pub(crate) fn current(&self) -> Option<&str> {
        self.items.last().map(|name| name.as_ref())
    }

    pub(crate) fn len(&self) -> usize {
        self.items.len()
    }

    pub(crate) fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Index of the innermost open element named `name`.
    pub(crate) fn position(&self, name: &str) -> Option<usize> {
        self.items.iter().rposition(|open| open == name)
    }

    /// Removes every entry at `index` and above, yielding them innermost first.
    pub(crate) fn pop_down_to(&mut self, index: usize) -> impl Iterator<Item = Cow<'a, str>> + '_ {
        debug_assert!(index <= self.items.len());
        self.items.drain(index..).rev()
    }

    /// Removes everything, innermost first.
    pub(crate) fn pop_all(&mut self) -> impl Iterator<Item = Cow<'a, str>> + '_ {
        self.pop_down_to(0)
    }

    #[cfg(test)]
    pub(crate) fn names(&self) -> Vec<&str> {
        self.items.iter().map(|name| name.as_ref()).collect()
    }
}
