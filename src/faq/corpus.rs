use crate::api::provider::EmbeddingProvider;
use crate::core::error::{FaqLoadError, ProviderError};
use crate::models::faq::{FaqEntry, FaqRecord};
use std::path::Path;
use tracing::info;

/// Read the FAQ file: a JSON array of `{question, answer}` objects
pub fn load_records(path: &Path) -> Result<Vec<FaqRecord>, FaqLoadError> {
    let content = std::fs::read_to_string(path)?;
    let records: Vec<FaqRecord> = serde_json::from_str(&content)?;
    Ok(records)
}

/// The embedded FAQ set, built once at startup and shared read-only
#[derive(Debug, Default)]
pub struct FaqCorpus {
    entries: Vec<FaqEntry>,
    dimension: usize,
}

impl FaqCorpus {
    /// Embed every question in one batch call.
    ///
    /// Fails if the provider returns a different number of vectors than
    /// questions, or vectors of differing dimensionality.
    pub async fn build(
        records: Vec<FaqRecord>,
        embedder: &dyn EmbeddingProvider,
    ) -> Result<Self, FaqLoadError> {
        let questions: Vec<String> = records.iter().map(|r| r.question.clone()).collect();
        let embeddings = embedder.embed_documents(&questions).await?;

        let corpus = Self::from_parts(records, embeddings)?;

        info!(
            entries = corpus.len(),
            dimension = corpus.dimension(),
            "FAQ corpus embedded"
        );

        Ok(corpus)
    }

    pub fn from_parts(
        records: Vec<FaqRecord>,
        embeddings: Vec<Vec<f32>>,
    ) -> Result<Self, FaqLoadError> {
        if records.len() != embeddings.len() {
            return Err(FaqLoadError::Embedding(ProviderError::EmbeddingCount {
                expected: records.len(),
                actual: embeddings.len(),
            }));
        }

        let dimension = embeddings.first().map(Vec::len).unwrap_or(0);

        if let Some((index, bad)) = embeddings
            .iter()
            .enumerate()
            .find(|(_, e)| e.len() != dimension)
        {
            return Err(FaqLoadError::DimensionMismatch {
                index,
                expected: dimension,
                actual: bad.len(),
            });
        }

        let entries = records
            .into_iter()
            .zip(embeddings)
            .map(|(record, embedding)| FaqEntry::new(record, embedding))
            .collect();

        Ok(Self { entries, dimension })
    }

    pub fn entries(&self) -> &[FaqEntry] {
        &self.entries
    }

    /// Embedding dimensionality, 0 for an empty corpus
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::test_support::HashEmbedder;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn record(question: &str, answer: &str) -> FaqRecord {
        FaqRecord {
            question: question.to_string(),
            answer: answer.to_string(),
        }
    }

    #[test]
    fn test_load_records() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{
                "question": "How do I reset my password?",
                "answer": "Visit settings > security."
            }}]"#
        )
        .unwrap();

        let records = load_records(file.path()).unwrap();
        assert_eq!(
            records,
            vec![record("How do I reset my password?", "Visit settings > security.")]
        );
    }

    #[test]
    fn test_load_records_missing_file() {
        let result = load_records(Path::new("/definitely/not/here.json"));
        assert!(matches!(result, Err(FaqLoadError::Io(_))));
    }

    #[test]
    fn test_load_records_malformed() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"[{{"question": "no answer field"}}]"#).unwrap();

        let result = load_records(file.path());
        assert!(matches!(result, Err(FaqLoadError::Malformed(_))));
    }

    #[tokio::test]
    async fn test_build_preserves_order() {
        let records = vec![record("first question", "one"), record("second question", "two")];

        let corpus = FaqCorpus::build(records, &HashEmbedder::new(64)).await.unwrap();

        assert_eq!(corpus.len(), 2);
        assert_eq!(corpus.dimension(), 64);
        assert_eq!(corpus.entries()[0].answer, "one");
        assert_eq!(corpus.entries()[1].question, "second question");
    }

    #[tokio::test]
    async fn test_build_empty() {
        let corpus = FaqCorpus::build(Vec::new(), &HashEmbedder::new(64)).await.unwrap();
        assert!(corpus.is_empty());
        assert_eq!(corpus.dimension(), 0);
    }

    #[test]
    fn test_from_parts_dimension_mismatch() {
        let result = FaqCorpus::from_parts(
            vec![record("a", "1"), record("b", "2")],
            vec![vec![1.0, 0.0], vec![1.0, 0.0, 0.0]],
        );

        assert!(matches!(
            result,
            Err(FaqLoadError::DimensionMismatch { index: 1, expected: 2, actual: 3 })
        ));
    }

    #[test]
    fn test_from_parts_count_mismatch() {
        let result = FaqCorpus::from_parts(vec![record("a", "1")], Vec::new());
        assert!(matches!(result, Err(FaqLoadError::Embedding(_))));
    }
}
