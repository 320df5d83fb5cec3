use std::fmt;

use super::aggregate::AggregateEntry;
use super::layout::{LAST_PATHS_SHEET, LAST_REFERRERS_SHEET, PATHS_SHEET, REFERRERS_SHEET};
use crate::services::traffic::TrafficSnapshot;

/// Keyed traffic stream reconciled against its last snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stream {
    Paths,
    Referrers,
}

impl Stream {
    pub const ALL: [Stream; 2] = [Stream::Paths, Stream::Referrers];

    pub fn name(&self) -> &'static str {
        match self {
            Stream::Paths => "paths",
            Stream::Referrers => "referrers",
        }
    }

    /// 累计总表
    pub fn total_sheet(&self) -> &'static str {
        match self {
            Stream::Paths => PATHS_SHEET,
            Stream::Referrers => REFERRERS_SHEET,
        }
    }

    /// 上一次快照表
    pub fn last_sheet(&self) -> &'static str {
        match self {
            Stream::Paths => LAST_PATHS_SHEET,
            Stream::Referrers => LAST_REFERRERS_SHEET,
        }
    }

    /// This stream's entries in `snapshot`, or `None` if it was not fetched
    pub fn entries(&self, snapshot: &TrafficSnapshot) -> Option<Vec<AggregateEntry>> {
        match self {
            Stream::Paths => snapshot.paths.as_ref().map(|paths| {
                paths
                    .iter()
                    .map(|p| AggregateEntry::new(p.path.as_str(), p.count, p.uniques))
                    .collect()
            }),
            Stream::Referrers => snapshot.referrers.as_ref().map(|referrers| {
                referrers
                    .iter()
                    .map(|r| AggregateEntry::new(r.referrer.as_str(), r.count, r.uniques))
                    .collect()
            }),
        }
    }
}

impl fmt::Display for Stream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
