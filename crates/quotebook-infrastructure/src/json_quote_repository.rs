//! File-backed QuoteRepository: one JSON document per community.

use crate::dto::{from_collection, into_collection, QuoteContextDto};
use crate::paths::QuotebookPaths;
use crate::storage::AtomicJsonFile;
use async_trait::async_trait;
use quotebook_core::error::Result;
use quotebook_core::ids::CommunityId;
use quotebook_core::quote::{QuoteContext, QuoteRepository};
use std::path::Path;
use tokio::fs;

/// Directory structure:
/// ```text
/// quotes_dir/
/// ├── 1234.json
/// └── 5678.json
/// ```
pub struct JsonDirQuoteRepository {
    paths: QuotebookPaths,
}

impl JsonDirQuoteRepository {
    /// Creates the repository, making sure the quotes directory exists.
    pub async fn new(paths: QuotebookPaths) -> Result<Self> {
        fs::create_dir_all(paths.quotes_dir()).await?;
        Ok(Self { paths })
    }

    pub fn quotes_dir(&self) -> &Path {
        self.paths.quotes_dir()
    }

    fn file_for(&self, community: &CommunityId) -> Result<AtomicJsonFile<Vec<QuoteContextDto>>> {
        Ok(AtomicJsonFile::new(self.paths.community_file(community)?))
    }
}

#[async_trait]
impl QuoteRepository for JsonDirQuoteRepository {
    async fn load(&self, community: &CommunityId) -> Result<Vec<QuoteContext>> {
        let file = self.file_for(community)?;
        match file.load().await {
            Ok(Some(dtos)) => into_collection(dtos),
            Ok(None) => {
                tracing::debug!(%community, "No quote file yet, starting empty");
                Ok(Vec::new())
            }
            Err(e) => {
                tracing::warn!(%community, path = %file.path().display(), "Failed to read quotes: {}", e);
                Err(e)
            }
        }
    }

    async fn save(&self, community: &CommunityId, collection: &[QuoteContext]) -> Result<()> {
        let file = self.file_for(community)?;
        file.save(&from_collection(collection)).await?;
        tracing::debug!(%community, contexts = collection.len(), "Saved quotes");
        Ok(())
    }
}
