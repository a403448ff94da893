// ============================================================
// Layer 3 — Article Record
// ============================================================
// One row of the summarization dataset: the news article, its
// human-written highlights, and (after the last stage) the
// padded embedding sequences for both texts.
//
// The vector fields start as None and are only filled by the
// vectorizer, so a row can tell whether the pipeline finished.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single embedding vector.
pub type Vector = Vec<f32>;

/// One dataset row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArticleRecord {
    /// Passthrough identifier, kept when the input file has an `id` column
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Full article text
    pub article: String,

    /// Reference summary text
    pub highlights: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub article_vectors: Option<Vec<Vector>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highlights_vectors: Option<Vec<Vector>>,
}

impl ArticleRecord {
    /// Build a raw row with no vectors yet.
    ///
    /// Example:
    ///   let row = ArticleRecord::new("It isn't right.", "isn't right");
    pub fn new(article: impl Into<String>, highlights: impl Into<String>) -> Self {
        Self {
            id:         None,
            article:    article.into(),
            highlights: highlights.into(),
            ..Self::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Borrow the text of one column
    pub fn text(&self, column: Column) -> &str {
        match column {
            Column::Article    => &self.article,
            Column::Highlights => &self.highlights,
        }
    }

    /// Mutable access to the text of one column
    pub fn text_mut(&mut self, column: Column) -> &mut String {
        match column {
            Column::Article    => &mut self.article,
            Column::Highlights => &mut self.highlights,
        }
    }

    pub fn vectors(&self, column: Column) -> Option<&[Vector]> {
        match column {
            Column::Article    => self.article_vectors.as_deref(),
            Column::Highlights => self.highlights_vectors.as_deref(),
        }
    }

    pub fn set_vectors(&mut self, column: Column, vectors: Vec<Vector>) {
        match column {
            Column::Article    => self.article_vectors    = Some(vectors),
            Column::Highlights => self.highlights_vectors = Some(vectors),
        }
    }
}

/// The two text columns every stage runs over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Column {
    Article,
    Highlights,
}

impl Column {
    /// Processing order: article first, then highlights
    pub const ALL: [Column; 2] = [Column::Article, Column::Highlights];

    /// Header name of the column in the input file
    pub fn name(self) -> &'static str {
        match self {
            Column::Article    => "article",
            Column::Highlights => "highlights",
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_accessors_follow_column() {
        let mut row = ArticleRecord::new("body", "summary");
        assert_eq!(row.text(Column::Article), "body");
        assert_eq!(row.text(Column::Highlights), "summary");

        row.text_mut(Column::Highlights).push_str(" text");
        assert_eq!(row.highlights, "summary text");
    }

    #[test]
    fn test_vectors_start_empty() {
        let mut row = ArticleRecord::new("a", "b");
        assert!(row.vectors(Column::Article).is_none());

        row.set_vectors(Column::Article, vec![vec![0.0; 3]]);
        assert_eq!(row.vectors(Column::Article).map(|v| v.len()), Some(1));
        assert!(row.vectors(Column::Highlights).is_none());
    }

    #[test]
    fn test_column_names() {
        assert_eq!(Column::Article.to_string(), "article");
        assert_eq!(Column::Highlights.to_string(), "highlights");
        assert_eq!(Column::ALL[0], Column::Article);
    }
}
