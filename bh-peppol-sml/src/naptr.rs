// Copyright (C) 2020-2026  The Blockhouse Technology Limited (TBTL).
//
// This program is free software: you can redistribute it and/or modify it
// under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or (at your
// option) any later version.
//
// This program is distributed in the hope that it will be useful, but
// WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public
// License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

use std::future::Future;

/// The `NAPTR` service of records pointing to an SMP.
pub const SMP_NAPTR_SERVICE: &str = "Meta:SMP";

/// The only regular expression pattern SMLs publish: the whole input is replaced.
const MATCH_ALL_PATTERNS: [&str; 2] = ["^.*$", ".*"];

/// A DNS `NAPTR` record, see [RFC 3403](https://www.rfc-editor.org/rfc/rfc3403#section-4.1).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NaptrRecord {
    /// Records with a lower order are processed first.
    pub order: u16,
    /// Tie breaker between records of the same order, lower first.
    pub preference: u16,
    /// The flags, `U` for a terminal URI rule.
    pub flags: String,
    /// The service, [`SMP_NAPTR_SERVICE`] for SMP records.
    pub service: String,
    /// The substitution expression, e.g. `!^.*$!http://smp.example.com!`.
    pub regexp: String,
    /// The replacement domain, unused by U-NAPTR records.
    pub replacement: String,
}

impl NaptrRecord {
    /// Whether this is a terminal `U` record of the SMP service.
    pub fn is_smp_record(&self) -> bool {
        self.flags.eq_ignore_ascii_case("U") && self.service.eq_ignore_ascii_case(SMP_NAPTR_SERVICE)
    }

    /// Applies the substitution expression, returning the resulting URI.
    ///
    /// Only the match-all patterns are supported; anything else yields [`None`].
    pub fn target_uri(&self) -> Option<&str> {
        let mut chars = self.regexp.chars();
        let delimiter = chars.next()?;
        let rest = chars.as_str();

        let mut parts = rest.split(delimiter);
        let pattern = parts.next()?;
        let replacement = parts.next()?;
        let flags = parts.next()?;

        if parts.next().is_some() || !(flags.is_empty() || flags == "i") {
            return None;
        }

        if !MATCH_ALL_PATTERNS.contains(&pattern) || replacement.is_empty() {
            return None;
        }

        Some(replacement)
    }
}

/// Interface of the DNS primitive resolving `NAPTR` records.
///
/// The crate doesn't ship a resolver; applications inject the one matching their DNS setup.
pub trait NaptrLookup: Sync {
    /// Error type returned by the lookup.
    type Err: std::error::Error + Send + Sync + 'static;

    /// Returns all `NAPTR` records of `domain`.
    fn lookup(
        &self,
        domain: &str,
    ) -> impl Future<Output = std::result::Result<Vec<NaptrRecord>, Self::Err>> + Send;
}

/// Picks the SMP URI out of `records`, honoring order and preference.
pub(crate) fn select_smp_uri(records: &[NaptrRecord]) -> Option<&str> {
    let mut candidates: Vec<&NaptrRecord> =
        records.iter().filter(|r| r.is_smp_record()).collect();
    candidates.sort_by_key(|r| (r.order, r.preference));

    candidates.into_iter().find_map(NaptrRecord::target_uri)
}
