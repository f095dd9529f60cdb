use anyhow::Context;
use chrono::{DateTime, Duration, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::models::{DocumentSummary, EngagementOverview};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("document not found: {0}")]
    NotFound(String),
}

/// Insertion-ordered set of document summaries. Read-only once the CLI
/// has finished seeding and importing.
#[derive(Debug, Clone, Default)]
pub struct DocumentRegistry {
    documents: Vec<DocumentSummary>,
}

impl DocumentRegistry {
    /// Registry pre-loaded with the demo document set.
    pub fn with_demo_documents() -> Self {
        let now = Utc::now();
        let documents = vec![
            DocumentSummary {
                id: "pitch-deck-2024".to_string(),
                name: "Series A Pitch Deck.pdf".to_string(),
                views: 47,
                unique_viewers: 12,
                avg_time_spent_secs: 234,
                last_viewed: now - Duration::hours(2),
                created_at: now - Duration::days(7),
                page_count: 18,
            },
            DocumentSummary {
                id: "q4-financial-report".to_string(),
                name: "Q4 2024 Financial Report.pdf".to_string(),
                views: 23,
                unique_viewers: 8,
                avg_time_spent_secs: 312,
                last_viewed: now - Duration::hours(5),
                created_at: now - Duration::days(14),
                page_count: 24,
            },
            DocumentSummary {
                id: "product-roadmap".to_string(),
                name: "Product Roadmap 2025.pdf".to_string(),
                views: 89,
                unique_viewers: 31,
                avg_time_spent_secs: 156,
                last_viewed: now - Duration::minutes(45),
                created_at: now - Duration::days(3),
                page_count: 12,
            },
            DocumentSummary {
                id: "partnership-proposal".to_string(),
                name: "Partnership Proposal - Acme Corp.pdf".to_string(),
                views: 15,
                unique_viewers: 4,
                avg_time_spent_secs: 423,
                last_viewed: now - Duration::hours(26),
                created_at: now - Duration::days(5),
                page_count: 16,
            },
            DocumentSummary {
                id: "case-study-enterprise".to_string(),
                name: "Enterprise Case Study - TechCo.pdf".to_string(),
                views: 156,
                unique_viewers: 67,
                avg_time_spent_secs: 98,
                last_viewed: now - Duration::minutes(15),
                created_at: now - Duration::days(21),
                page_count: 8,
            },
        ];

        Self { documents }
    }

    pub fn lookup(&self, id: &str) -> Result<&DocumentSummary, RegistryError> {
        self.documents
            .iter()
            .find(|doc| doc.id == id)
            .ok_or_else(|| RegistryError::NotFound(id.to_string()))
    }

    pub fn documents(&self) -> &[DocumentSummary] {
        &self.documents
    }

    /// Dashboard totals across every registered document.
    pub fn overview(&self) -> EngagementOverview {
        let document_count = self.documents.len();
        let total_views = self.documents.iter().map(|doc| doc.views).sum();
        let total_unique_viewers = self.documents.iter().map(|doc| doc.unique_viewers).sum();
        let avg_time_spent_secs = if document_count == 0 {
            0
        } else {
            let total_secs: u64 = self
                .documents
                .iter()
                .map(|doc| u64::from(doc.avg_time_spent_secs))
                .sum();
            (total_secs as f64 / document_count as f64).round() as u32
        };

        EngagementOverview {
            document_count,
            total_views,
            total_unique_viewers,
            avg_time_spent_secs,
        }
    }

    /// Merge document summaries from a CSV file into the registry.
    /// Rows without an id get a generated one; rows whose id is already
    /// registered are skipped. Returns the number of rows inserted.
    pub fn import_csv(&mut self, csv_path: &std::path::Path) -> anyhow::Result<usize> {
        #[derive(serde::Deserialize)]
        struct CsvRow {
            id: Option<String>,
            name: String,
            views: u64,
            unique_viewers: u64,
            avg_time_spent_secs: u32,
            page_count: u32,
            last_viewed: DateTime<Utc>,
            created_at: DateTime<Utc>,
        }

        let mut reader = csv::Reader::from_path(csv_path)
            .with_context(|| format!("failed to open {}", csv_path.display()))?;
        let mut inserted = 0usize;

        for (index, result) in reader.deserialize::<CsvRow>().enumerate() {
            let row_number = index + 1;
            let row = result.with_context(|| format!("invalid record on row {row_number}"))?;

            if row.page_count == 0 {
                anyhow::bail!("row {row_number}: page_count must be at least 1");
            }
            if row.unique_viewers > row.views {
                anyhow::bail!("row {row_number}: unique_viewers exceeds views");
            }
            if row.created_at > row.last_viewed {
                anyhow::bail!("row {row_number}: created_at is after last_viewed");
            }

            let id = row
                .id
                .unwrap_or_else(|| format!("import-{}", Uuid::new_v4()));

            if self.documents.iter().any(|doc| doc.id == id) {
                continue;
            }

            self.documents.push(DocumentSummary {
                id,
                name: row.name,
                views: row.views,
                unique_viewers: row.unique_viewers,
                avg_time_spent_secs: row.avg_time_spent_secs,
                last_viewed: row.last_viewed,
                created_at: row.created_at,
                page_count: row.page_count,
            });
            inserted += 1;
        }

        Ok(inserted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_doc(id: &str, views: u64, avg_secs: u32) -> DocumentSummary {
        let now = Utc::now();
        DocumentSummary {
            id: id.to_string(),
            name: format!("{id}.pdf"),
            views,
            unique_viewers: views / 2,
            avg_time_spent_secs: avg_secs,
            last_viewed: now - Duration::hours(1),
            created_at: now - Duration::days(2),
            page_count: 10,
        }
    }

    #[test]
    fn lookup_finds_seeded_documents() {
        let registry = DocumentRegistry::with_demo_documents();
        let doc = registry.lookup("pitch-deck-2024").unwrap();
        assert_eq!(doc.name, "Series A Pitch Deck.pdf");
        assert_eq!(doc.views, 47);
        assert_eq!(doc.page_count, 18);
    }

    #[test]
    fn lookup_unknown_id_is_not_found() {
        let registry = DocumentRegistry::with_demo_documents();
        let err = registry.lookup("nonexistent-id").unwrap_err();
        assert_eq!(err, RegistryError::NotFound("nonexistent-id".to_string()));
    }

    #[test]
    fn seeded_documents_keep_insertion_order() {
        let registry = DocumentRegistry::with_demo_documents();
        let ids: Vec<&str> = registry.documents().iter().map(|doc| doc.id.as_str()).collect();
        assert_eq!(
            ids,
            vec![
                "pitch-deck-2024",
                "q4-financial-report",
                "product-roadmap",
                "partnership-proposal",
                "case-study-enterprise",
            ]
        );
    }

    #[test]
    fn seeded_timestamps_are_ordered() {
        let registry = DocumentRegistry::with_demo_documents();
        let now = Utc::now();
        for doc in registry.documents() {
            assert!(doc.created_at <= doc.last_viewed, "{}", doc.id);
            assert!(doc.last_viewed <= now, "{}", doc.id);
            assert!(doc.unique_viewers <= doc.views, "{}", doc.id);
        }
    }

    #[test]
    fn overview_sums_counters_and_rounds_mean_time() {
        let registry = DocumentRegistry {
            documents: vec![sample_doc("a", 10, 100), sample_doc("b", 30, 101)],
        };
        let overview = registry.overview();
        assert_eq!(overview.document_count, 2);
        assert_eq!(overview.total_views, 40);
        assert_eq!(overview.total_unique_viewers, 20);
        assert_eq!(overview.avg_time_spent_secs, 101);
    }

    #[test]
    fn overview_of_empty_registry_is_zeroed() {
        let overview = DocumentRegistry::default().overview();
        assert_eq!(overview.document_count, 0);
        assert_eq!(overview.total_views, 0);
        assert_eq!(overview.avg_time_spent_secs, 0);
    }

    #[test]
    fn import_inserts_new_rows_and_skips_duplicates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("docs.csv");
        std::fs::write(
            &path,
            "id,name,views,unique_viewers,avg_time_spent_secs,page_count,last_viewed,created_at\n\
             pitch-deck-2024,Duplicate.pdf,1,1,1,1,2026-02-01T12:00:00Z,2026-01-01T12:00:00Z\n\
             board-update,Board Update.pdf,40,9,120,6,2026-02-01T12:00:00Z,2026-01-01T12:00:00Z\n\
             ,Unnamed Import.pdf,5,2,60,3,2026-02-01T12:00:00Z,2026-01-01T12:00:00Z\n",
        )
        .unwrap();

        let mut registry = DocumentRegistry::with_demo_documents();
        let inserted = registry.import_csv(&path).unwrap();
        assert_eq!(inserted, 2);

        // The duplicate row must not overwrite the seeded record.
        assert_eq!(registry.lookup("pitch-deck-2024").unwrap().views, 47);
        assert_eq!(registry.lookup("board-update").unwrap().page_count, 6);

        let generated = registry
            .documents()
            .iter()
            .find(|doc| doc.name == "Unnamed Import.pdf")
            .unwrap();
        assert!(generated.id.starts_with("import-"));
    }

    #[test]
    fn import_rejects_invalid_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.csv");
        std::fs::write(
            &path,
            "id,name,views,unique_viewers,avg_time_spent_secs,page_count,last_viewed,created_at\n\
             bad-doc,Bad.pdf,3,9,60,4,2026-02-01T12:00:00Z,2026-01-01T12:00:00Z\n",
        )
        .unwrap();

        let mut registry = DocumentRegistry::default();
        let err = registry.import_csv(&path).unwrap_err();
        assert!(err.to_string().contains("unique_viewers exceeds views"));
        assert!(registry.documents().is_empty());
    }

    #[test]
    fn import_rejects_zero_page_count() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("zero.csv");
        std::fs::write(
            &path,
            "id,name,views,unique_viewers,avg_time_spent_secs,page_count,last_viewed,created_at\n\
             zero-pages,Zero.pdf,3,1,60,0,2026-02-01T12:00:00Z,2026-01-01T12:00:00Z\n",
        )
        .unwrap();

        let mut registry = DocumentRegistry::default();
        let err = registry.import_csv(&path).unwrap_err();
        assert!(err.to_string().contains("page_count"));
    }
}
