//! Views over a generated series

use super::types::{SentimentRecord, SentimentSources};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Timestamp plus the per-source split of one sample
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceBreakdown {
    pub timestamp: DateTime<Utc>,
    pub sources: SentimentSources,
}

/// Most recent sample in a series, regardless of its ordering
pub fn latest_record(series: &[SentimentRecord]) -> Option<&SentimentRecord> {
    series.iter().max_by_key(|record| record.timestamp)
}

/// Two most recent samples as (previous, current)
pub fn latest_pair(series: &[SentimentRecord]) -> Option<(&SentimentRecord, &SentimentRecord)> {
    let mut sorted: Vec<&SentimentRecord> = series.iter().collect();
    sorted.sort_by_key(|record| record.timestamp);

    match sorted.as_slice() {
        [.., previous, current] => Some((*previous, *current)),
        _ => None,
    }
}

pub fn source_breakdown(series: &[SentimentRecord]) -> Vec<SourceBreakdown> {
    series
        .iter()
        .map(|record| SourceBreakdown {
            timestamp: record.timestamp,
            sources: record.sources.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sentiment::{SentimentGenerator, SeriesOrder, SeriesRequest, TimeRange};
    use chrono::TimeZone;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn series(order: SeriesOrder) -> Vec<SentimentRecord> {
        let now = Utc.with_ymd_and_hms(2024, 5, 10, 8, 30, 0).unwrap();
        let mut rng = StdRng::seed_from_u64(99);
        SentimentGenerator::new(order).generate(&SeriesRequest::new("bitcoin", TimeRange::Hour1), now, &mut rng)
    }

    #[test]
    fn test_latest_record_ignores_order() {
        let oldest_first = series(SeriesOrder::OldestFirst);
        let newest_first = series(SeriesOrder::NewestFirst);

        assert_eq!(latest_record(&oldest_first).unwrap().timestamp, oldest_first[59].timestamp);
        assert_eq!(latest_record(&newest_first).unwrap().timestamp, newest_first[0].timestamp);
    }

    #[test]
    fn test_latest_pair() {
        let s = series(SeriesOrder::OldestFirst);
        let (previous, current) = latest_pair(&s).unwrap();
        assert_eq!(previous.timestamp, s[58].timestamp);
        assert_eq!(current.timestamp, s[59].timestamp);

        assert!(latest_pair(&s[..1]).is_none());
        assert!(latest_record(&[]).is_none());
    }

    #[test]
    fn test_source_breakdown_keeps_every_sample() {
        let s = series(SeriesOrder::OldestFirst);
        let breakdown = source_breakdown(&s);

        assert_eq!(breakdown.len(), 60);
        assert_eq!(breakdown[10].sources, s[10].sources);
        assert_eq!(breakdown[10].timestamp, s[10].timestamp);
    }
}
