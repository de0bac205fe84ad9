//! Cached forward searches.

/// Remembers the answer to the last "first match at or after `from`" search so that
/// non-decreasing queries over one input scan each byte at most once.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct NextMatch {
    /// Last query position and what it found.
    cached: Option<(usize, Option<usize>)>,
}

impl NextMatch {
    /// First match at or after `from`. `search` must return exactly that for any
    /// `from`; it only runs when the cached answer cannot be reused.
    pub(crate) fn find(
        &mut self,
        from: usize,
        search: impl FnOnce(usize) -> Option<usize>,
    ) -> Option<usize> {
        if let Some((query, found)) = self.cached
            && query <= from
            && found.is_none_or(|at| at >= from)
        {
            return found;
        }
        let found = search(from);
        self.cached = Some((from, found));
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reuses_answers_between_query_and_match() {
        let bytes = b"a..>..>";
        let mut searches = 0;
        let mut next = NextMatch::default();
        let mut find = |from: usize| {
            next.find(from, |from| {
                searches += 1;
                memchr::memchr(b'>', &bytes[from..]).map(|rel| from + rel)
            })
        };
        assert_eq!(find(0), Some(3));
        assert_eq!(find(2), Some(3));
        assert_eq!(find(3), Some(3));
        assert_eq!(find(4), Some(6));
        assert_eq!(find(7), None);
        assert_eq!(find(9), None);
        assert_eq!(searches, 3);
    }
}
