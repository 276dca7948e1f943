use std::cmp::Ordering;
use std::sync::Arc;

use tracing::{debug, info};

use super::domain::DriveId;
use super::locks::PlacementLocks;
use super::repository::{ApplicationRecord, ApplicationRepository, RepositoryError};
use super::scoring::round2;

/// Full recompute of rank and percentile over a drive's eligible applications.
pub struct RankingService<A> {
    applications: Arc<A>,
    locks: Arc<PlacementLocks>,
}

impl<A> RankingService<A>
where
    A: ApplicationRepository + 'static,
{
    pub fn new(applications: Arc<A>, locks: Arc<PlacementLocks>) -> Self {
        Self {
            applications,
            locks,
        }
    }

    /// Rank the drive under its lock and persist the refreshed positions.
    pub fn rank_drive(&self, drive_id: &DriveId) -> Result<Vec<ApplicationRecord>, RepositoryError> {
        self.locks
            .with_drive_lock(drive_id, || self.recompute(drive_id))
    }

    /// Caller must already hold the drive lock.
    pub(crate) fn recompute(
        &self,
        drive_id: &DriveId,
    ) -> Result<Vec<ApplicationRecord>, RepositoryError> {
        let mut applications = self.applications.eligible_for_drive(drive_id)?;
        assign_ranks(&mut applications);

        for application in &applications {
            debug!(
                application_id = %application.id,
                rank = application.rank,
                percentile = application.percentile,
                "rank assigned"
            );
            self.applications.update(application.clone())?;
        }

        info!(drive_id = %drive_id, ranked = applications.len(), "drive ranking refreshed");
        Ok(applications)
    }
}

/// Stable sort by descending final score, then assign 1-based rank and percentile.
///
/// Ties keep their incoming order.
pub fn assign_ranks(applications: &mut [ApplicationRecord]) {
    applications.sort_by(|left, right| {
        let left = left.final_score().unwrap_or(f64::NEG_INFINITY);
        let right = right.final_score().unwrap_or(f64::NEG_INFINITY);
        right.partial_cmp(&left).unwrap_or(Ordering::Equal)
    });

    let total = applications.len();
    for (index, application) in applications.iter_mut().enumerate() {
        let rank = index + 1;
        application.rank = rank as u32;
        application.percentile = round2((total - rank) as f64 / total as f64 * 100.0);
    }
}
