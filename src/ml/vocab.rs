// ============================================================
// Layer 5 — Embedding Vocabulary
// ============================================================
// Word → row index for the embedding matrix, built from the
// union of both columns' tokens.
//
// Ordering is deterministic: descending frequency, ties broken
// by first appearance in the corpus. Row 0 is the most common
// word. With min_count = 1 every observed token gets a row.

use std::collections::HashMap;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CorpusVocabulary {
    words:  Vec<String>,
    counts: Vec<usize>,
    index:  HashMap<String, u32>,
}

impl CorpusVocabulary {
    pub fn build(sentences: &[Vec<String>], min_count: usize) -> Self {
        // Count, remembering first-seen order so ties are stable
        let mut order: Vec<&str>               = Vec::new();
        let mut freq:  HashMap<&str, usize>    = HashMap::new();

        for sentence in sentences {
            for word in sentence {
                let count = freq.entry(word.as_str()).or_insert(0);
                if *count == 0 {
                    order.push(word.as_str());
                }
                *count += 1;
            }
        }

        let mut ranked: Vec<(&str, usize)> = order
            .into_iter()
            .map(|w| (w, freq[w]))
            .filter(|(_, c)| *c >= min_count)
            .collect();
        // stable sort keeps first-seen order among equal counts
        ranked.sort_by(|a, b| b.1.cmp(&a.1));

        let mut vocab = Self::default();
        for (i, (word, count)) in ranked.into_iter().enumerate() {
            vocab.index.insert(word.to_string(), i as u32);
            vocab.words.push(word.to_string());
            vocab.counts.push(count);
        }

        tracing::debug!("Embedding vocabulary: {} words (min_count={})", vocab.len(), min_count);
        vocab
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn id(&self, word: &str) -> Option<u32> {
        self.index.get(word).copied()
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn count(&self, word: &str) -> Option<usize> {
        self.id(word).map(|i| self.counts[i as usize])
    }

    pub fn into_words(self) -> Vec<String> {
        self.words
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn sentences(raw: &[&str]) -> Vec<Vec<String>> {
        raw.iter()
            .map(|s| s.split_whitespace().map(str::to_string).collect())
            .collect()
    }

    #[test]
    fn test_frequency_then_first_seen() {
        let v = CorpusVocabulary::build(&sentences(&["b a c", "a c", "a"]), 1);
        assert_eq!(v.words(), &["a", "c", "b"]);
        assert_eq!(v.id("a"), Some(0));
        assert_eq!(v.count("c"), Some(2));
    }

    #[test]
    fn test_min_count_filters() {
        let v = CorpusVocabulary::build(&sentences(&["x y y", "z y x"]), 2);
        assert_eq!(v.words(), &["y", "x"]);
        assert_eq!(v.id("z"), None);
    }

    #[test]
    fn test_empty_corpus() {
        let v = CorpusVocabulary::build(&sentences(&["", "  "]), 1);
        assert!(v.is_empty());
    }
}
