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

use std::{borrow::Cow, collections::BTreeSet};

use serde::{Deserialize, Serialize};

/// The default Peppol participant identifier scheme.
pub const DEFAULT_PARTICIPANT_SCHEME: &str = "iso6523-actorid-upis";

/// The default Peppol document type identifier scheme.
pub const DEFAULT_DOCUMENT_TYPE_SCHEME: &str = "busdox-docid-qns";

/// The Peppol document type identifier scheme allowing wildcard matching.
pub const WILDCARD_DOCUMENT_TYPE_SCHEME: &str = "peppol-doctype-wildcard";

/// The default Peppol process identifier scheme.
pub const DEFAULT_PROCESS_SCHEME: &str = "cenbii-procid-ubl";

/// How the values of a single identifier scheme are compared.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseSensitivity {
    /// Values are compared and hashed exactly as given.
    CaseSensitive,
    /// Values are lower-cased before being compared or hashed.
    CaseInsensitiveLowercased,
}

/// The table mapping identifier schemes to their [`CaseSensitivity`].
///
/// Schemes that are not registered are case-sensitive.  Lookups are exact, i.e. the scheme itself
/// is matched case-sensitively.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseSensitivityRules {
    case_insensitive_schemes: BTreeSet<String>,
}

impl CaseSensitivityRules {
    /// Creates a table in which every scheme is case-sensitive.
    pub fn all_case_sensitive() -> Self {
        Self {
            case_insensitive_schemes: BTreeSet::new(),
        }
    }

    /// Creates the Peppol table: the default participant, document type and process schemes are
    /// case-insensitive.
    pub fn peppol() -> Self {
        Self::all_case_sensitive()
            .with_case_insensitive(DEFAULT_PARTICIPANT_SCHEME)
            .with_case_insensitive(DEFAULT_DOCUMENT_TYPE_SCHEME)
            .with_case_insensitive(WILDCARD_DOCUMENT_TYPE_SCHEME)
            .with_case_insensitive(DEFAULT_PROCESS_SCHEME)
    }

    /// Registers `scheme` as case-insensitive.
    pub fn with_case_insensitive(mut self, scheme: impl Into<String>) -> Self {
        self.case_insensitive_schemes.insert(scheme.into());
        self
    }

    /// Returns the rule registered for `scheme`.
    pub fn rule(&self, scheme: &str) -> CaseSensitivity {
        if self.case_insensitive_schemes.contains(scheme) {
            CaseSensitivity::CaseInsensitiveLowercased
        } else {
            CaseSensitivity::CaseSensitive
        }
    }

    /// Returns `value` in the form used for comparison and hashing.
    ///
    /// The value is lower-cased iff `scheme` is case-insensitive.  Lower-casing is done with the
    /// Unicode rules and is independent of the locale.
    pub fn normalize<'a>(&self, scheme: &str, value: &'a str) -> Cow<'a, str> {
        match self.rule(scheme) {
            CaseSensitivity::CaseSensitive => Cow::Borrowed(value),
            CaseSensitivity::CaseInsensitiveLowercased => Cow::Owned(value.to_lowercase()),
        }
    }
}

impl Default for CaseSensitivityRules {
    fn default() -> Self {
        Self::peppol()
    }
}

/// Configuration of an [`IdentifierFactory`][crate::IdentifierFactory].
///
/// One policy is normally used for the whole process, but nothing prevents an application from
/// holding several factories configured differently.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentifierPolicy {
    /// Case handling per scheme.
    pub case_rules: CaseSensitivityRules,
    /// Whether the value charset of each identifier kind is enforced.
    pub check_charset: bool,
    /// Whether the maximum scheme length is enforced.
    pub check_scheme_length: bool,
}

impl Default for IdentifierPolicy {
    fn default() -> Self {
        Self {
            case_rules: CaseSensitivityRules::peppol(),
            check_charset: true,
            check_scheme_length: true,
        }
    }
}
