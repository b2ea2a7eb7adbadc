//! Zone-listing scrape.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

/// A-record line as DirectAdmin prints it: `name\t600\tIN\tA\tip`.
///
/// The tabs and the literal `600\tIN\tA` are an undocumented contract
/// with the control panel's output format. Do not tidy this pattern up
/// without confirming against a live panel.
static A_RECORD_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([a-z]*)\t600\tIN\tA\t(\d+.\d+.\d+.\d+)$").expect("A-record pattern is valid")
});

/// Name-to-IP snapshot of a zone's A records.
///
/// Built by scraping a raw zone listing line by line. Lines that do not
/// match the record pattern (headers, other record types, blanks) are
/// silently ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ZoneSnapshot {
    records: HashMap<String, String>,
}

impl ZoneSnapshot {
    /// Parses a raw zone listing into a snapshot.
    #[must_use]
    pub fn parse(listing: &str) -> Self {
        let mut records = HashMap::new();
        for line in listing.lines() {
            if let Some(caps) = A_RECORD_LINE.captures(line) {
                records.insert(caps[1].to_string(), caps[2].to_string());
            }
        }
        Self { records }
    }

    /// Returns the A-record IP for `name`, if the zone has one.
    #[must_use]
    pub fn ip_of(&self, name: &str) -> Option<&str> {
        self.records.get(name).map(String::as_str)
    }

    /// Number of A records in the snapshot.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if no A records were found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
