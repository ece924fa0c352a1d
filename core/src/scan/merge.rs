use crate::math::stats::StatsHelper;
use crate::scan::record::ScanRecord;

/// Whether `incoming` continues the volume started by `previous`.
///
/// Both conditions must hold: the incoming elevation is strictly higher at
/// 0.1 degree resolution, and the incoming scan starts strictly later.
pub fn should_merge(incoming: &ScanRecord, previous: &ScanRecord) -> bool {
    let rising = StatsHelper::tenths(incoming.elevation_deg())
        > StatsHelper::tenths(previous.elevation_deg());
    rising && incoming.timestamp > previous.timestamp
}

/// Joins a cached lower sweep with the incoming sweep into one record.
///
/// The result keeps the incoming name and timestamp so the product is named
/// after the newest data.
pub fn join(incoming: &ScanRecord, previous: &ScanRecord) -> ScanRecord {
    let prt_samples = match (&previous.prt_samples, &incoming.prt_samples) {
        (Some(prev), Some(next)) => Some(prev.iter().chain(next).copied().collect()),
        (_, next) => next.clone(),
    };

    ScanRecord {
        name: incoming.name.clone(),
        sources: previous
            .sources
            .iter()
            .chain(&incoming.sources)
            .cloned()
            .collect(),
        timestamp: incoming.timestamp,
        sweeps: previous
            .sweeps
            .iter()
            .chain(&incoming.sweeps)
            .copied()
            .collect(),
        prt_samples,
    }
}

/// Returns the record to dispatch for a single-sweep scan.
///
/// Scans with more than one sweep are returned unchanged.
pub fn maybe_merge(incoming: &ScanRecord, cached: Option<&ScanRecord>) -> ScanRecord {
    match cached {
        Some(previous) if incoming.is_single_sweep() && should_merge(incoming, previous) => {
            join(incoming, previous)
        }
        _ => incoming.clone(),
    }
}
