//! Quote repository trait.
//!
//! Defines the persistence seam between the Quote Store and the storage codec.

use super::model::QuoteContext;
use crate::error::Result;
use crate::ids::CommunityId;
use async_trait::async_trait;

/// An abstract repository holding one quote collection per community.
///
/// # Implementation Notes
///
/// - A community with no stored collection loads as an empty list.
/// - Insertion order must survive a save/load round trip.
/// - Implementations do no caching; the Quote Store owns that concern.
#[async_trait]
pub trait QuoteRepository: Send + Sync {
    /// Loads the full collection for a community.
    ///
    /// # Returns
    ///
    /// - `Ok(Vec<QuoteContext>)`: The stored collection (possibly empty)
    /// - `Err(_)`: The collection could not be read or decoded
    async fn load(&self, community: &CommunityId) -> Result<Vec<QuoteContext>>;

    /// Replaces the stored collection for a community.
    ///
    /// # Returns
    ///
    /// - `Ok(())`: Collection persisted
    /// - `Err(_)`: Encoding or writing failed
    async fn save(&self, community: &CommunityId, collection: &[QuoteContext]) -> Result<()>;
}
