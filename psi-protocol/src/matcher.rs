//! Exact-match membership test over opaque digests.

use crate::crypto::Digest;

/// Digests sorted for binary search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigestIndex {
    sorted: Vec<Digest>,
}

impl DigestIndex {
    /// Take ownership of the received digests and sort them bytewise.
    pub fn new(mut digests: Vec<Digest>) -> Self {
        digests.sort_unstable();
        Self { sorted: digests }
    }

    /// Binary search for an exact byte match.
    pub fn contains(&self, query: &Digest) -> bool {
        self.sorted.binary_search(query).is_ok()
    }

    /// Indices of the queries that hit the index, in query order.
    pub fn matching_positions<'a, I>(&self, queries: I) -> Vec<usize>
    where
        I: IntoIterator<Item = &'a Digest>,
    {
        queries
            .into_iter()
            .enumerate()
            .filter(|(_, q)| self.contains(q))
            .map(|(i, _)| i)
            .collect()
    }

    /// Number of queries that hit the index.
    pub fn count_matches<'a, I>(&self, queries: I) -> usize
    where
        I: IntoIterator<Item = &'a Digest>,
    {
        queries.into_iter().filter(|q| self.contains(q)).count()
    }

    pub fn as_slice(&self) -> &[Digest] {
        &self.sorted
    }

    pub fn len(&self) -> usize {
        self.sorted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sorted.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::DIGEST_LEN;
    use proptest::prelude::*;

    fn digest(b: u8) -> Digest {
        Digest([b; DIGEST_LEN])
    }

    #[test]
    fn test_empty_index() {
        let index = DigestIndex::new(vec![]);
        assert!(index.is_empty());
        assert!(!index.contains(&digest(1)));
        assert_eq!(index.count_matches(&[digest(1), digest(2)]), 0);
    }

    #[test]
    fn test_matches_in_query_order() {
        let index = DigestIndex::new(vec![digest(9), digest(3), digest(5)]);
        assert_eq!(index.len(), 3);
        let queries = [digest(5), digest(4), digest(9), digest(0)];
        assert_eq!(index.matching_positions(&queries), vec![0, 2]);
        assert_eq!(index.count_matches(&queries), 2);
    }

    #[test]
    fn test_sorted_lexicographically() {
        let mut a = [0u8; DIGEST_LEN];
        a[0] = 2;
        let mut b = [0xffu8; DIGEST_LEN];
        b[0] = 1;
        let index = DigestIndex::new(vec![Digest(a), Digest(b)]);
        assert_eq!(index.as_slice(), &[Digest(b), Digest(a)]);
    }

    fn arb_digest() -> impl Strategy<Value = Digest> {
        prop::array::uniform32(any::<u8>()).prop_map(Digest)
    }

    proptest! {
        #[test]
        fn prop_sorted_is_permutation(digests in prop::collection::vec(arb_digest(), 0..64)) {
            let index = DigestIndex::new(digests.clone());
            let mut expected = digests;
            expected.sort();
            prop_assert_eq!(index.as_slice(), expected.as_slice());
            prop_assert!(index.as_slice().windows(2).all(|w| w[0] <= w[1]));
        }

        #[test]
        fn prop_binary_search_agrees_with_linear_scan(
            digests in prop::collection::vec(arb_digest(), 0..64),
            queries in prop::collection::vec(arb_digest(), 0..16),
            reuse in prop::collection::vec(any::<prop::sample::Index>(), 0..16),
        ) {
            let mut all_queries = queries;
            if !digests.is_empty() {
                all_queries.extend(reuse.iter().map(|i| *i.get(&digests)));
            }
            let index = DigestIndex::new(digests.clone());
            for q in &all_queries {
                prop_assert_eq!(index.contains(q), digests.iter().any(|d| d == q));
            }
        }
    }
}
