//! Sprint fan-out across a season schedule.

use futures_util::stream::{self, StreamExt};
use tracing::{debug, warn};

use crate::data_source::RoundIndex;
use crate::fetcher::ResultFetcher;
use crate::{Race, Season};

/// Fetch the sprint classification of every scheduled round and index the
/// rounds that actually held one.
///
/// At most `concurrency` requests are in flight at once (zero is treated as
/// one). Every round is awaited before the index is returned. A round whose
/// fetch fails is treated as having no sprint; the failure is logged and
/// never surfaces to the caller. Repeat calls on the same fetcher are served
/// from its cache.
pub async fn aggregate_sprints(
    fetcher: &ResultFetcher,
    season: Season,
    schedule: &[Race],
    concurrency: usize,
) -> RoundIndex {
    let outcomes: Vec<_> = stream::iter(schedule.iter().map(|race| race.round))
        .map(|round| async move { (round, fetcher.sprint_results(season, round).await) })
        .buffer_unordered(concurrency.max(1))
        .collect()
        .await;

    let mut index = RoundIndex::new();
    for (round, outcome) in outcomes {
        match outcome {
            Ok(set) if set.is_empty() => {}
            Ok(set) => {
                index.insert(round, set);
            }
            Err(failure) => {
                warn!(
                    season = %season,
                    round = %round,
                    code = failure.code(),
                    error = %failure,
                    "sprint fetch failed; treating round as sprint-free"
                );
            }
        }
    }

    debug!(
        season = %season,
        scheduled = schedule.len(),
        sprints = index.len(),
        "sprint fan-out complete"
    );
    index
}
