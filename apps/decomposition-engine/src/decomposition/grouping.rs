//! Partitioning of the input snapshot into independent units.
//!
//! Matching never crosses a (client, ticker) boundary, so the snapshot
//! is split into per-unit batches up front. Within a unit the driver
//! scopes single-maturity matchers to (client, ticker, maturity)
//! groups; only the calendar matcher looks across maturities.

use std::collections::BTreeMap;

use tracing::warn;

use crate::decomposition::leg::{LegRecord, RejectedLeg};

/// Unit key: the coarse grouping that bounds all matching.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct UnitKey {
    pub(crate) client: String,
    pub(crate) ticker: String,
}

impl UnitKey {
    pub(crate) fn of(record: &LegRecord) -> Self {
        Self {
            client: record.client.clone(),
            ticker: record.ticker.clone(),
        }
    }
}

/// Validate and partition raw records into units.
///
/// Records that fail validation are diverted to the rejected list and
/// logged; they never reach a leg store. The returned map iterates in
/// deterministic key order.
pub(crate) fn partition(
    records: Vec<LegRecord>,
) -> (BTreeMap<UnitKey, Vec<LegRecord>>, Vec<RejectedLeg>) {
    let mut units: BTreeMap<UnitKey, Vec<LegRecord>> = BTreeMap::new();
    let mut rejected = Vec::new();

    for record in records {
        match record.validate() {
            Ok(()) => units.entry(UnitKey::of(&record)).or_default().push(record),
            Err(reason) => {
                warn!(
                    client = %record.client,
                    ticker = %record.ticker,
                    %reason,
                    "rejecting input leg"
                );
                rejected.push(RejectedLeg { record, reason });
            }
        }
    }

    (units, rejected)
}
