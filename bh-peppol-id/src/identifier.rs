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

use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::percent::percent_encode;

/// The separator between the scheme and the value in the URI form of an identifier.
pub const URI_SCHEME_VALUE_SEPARATOR: &str = "::";

/// Maximum number of characters of an identifier scheme.
pub const SCHEME_MAX_LENGTH: usize = 25;

/// The kind of a Peppol identifier.
#[derive(
    strum_macros::Display,
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum IdentifierKind {
    /// Identifies a network participant, e.g. a business.
    #[strum(to_string = "participant")]
    Participant,
    /// Identifies the type of an exchanged business document.
    #[strum(to_string = "document type")]
    DocumentType,
    /// Identifies the business process a document is exchanged in.
    #[strum(to_string = "process")]
    Process,
}

impl IdentifierKind {
    /// Maximum number of characters of a value of this kind.
    pub const fn max_value_length(self) -> usize {
        match self {
            Self::Participant => 50,
            Self::DocumentType => 500,
            Self::Process => 200,
        }
    }

    /// The charset every value of this kind must be representable in.
    pub const fn charset(self) -> Charset {
        match self {
            Self::Participant => Charset::UsAscii,
            Self::DocumentType | Self::Process => Charset::Iso8859_1,
        }
    }
}

/// Character sets used to restrict identifier values.
#[derive(strum_macros::Display, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Charset {
    /// US-ASCII
    #[strum(to_string = "US-ASCII")]
    UsAscii,
    /// ISO-8859-1 (Latin-1)
    #[strum(to_string = "ISO-8859-1")]
    Iso8859_1,
}

impl Charset {
    /// Whether `c` is representable in this charset.
    pub fn contains(self, c: char) -> bool {
        match self {
            Self::UsAscii => c.is_ascii(),
            Self::Iso8859_1 => u32::from(c) <= 0xFF,
        }
    }
}

/// An immutable Peppol identifier.
///
/// Instances are created only through the [`IdentifierFactory`][crate::IdentifierFactory], so an
/// [`Identifier`] is always syntactically valid.
///
/// Equality and hashing use the kind, the scheme and the *normalized* value, which makes them
/// consistent with [`Identifier::has_same_content`].  The literal value is retained for
/// serialization.
#[derive(Clone, Debug)]
pub struct Identifier {
    kind: IdentifierKind,
    scheme: String,
    value: String,
    normalized_value: String,
}

impl Identifier {
    /// Only called by the factory after all checks have passed.
    pub(crate) fn new_unchecked(
        kind: IdentifierKind,
        scheme: String,
        value: String,
        normalized_value: String,
    ) -> Self {
        Self {
            kind,
            scheme,
            value,
            normalized_value,
        }
    }

    /// The kind of this identifier.
    pub fn kind(&self) -> IdentifierKind {
        self.kind
    }

    /// The scheme, as supplied on construction.
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// The value, as supplied on construction.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// The value in the form used for comparison and hashing.
    pub fn normalized_value(&self) -> &str {
        &self.normalized_value
    }

    /// Returns `scheme::value`.
    ///
    /// Nothing is escaped; use [`Identifier::to_uri_percent_encoded`] to build URLs.
    pub fn to_uri_encoded(&self) -> String {
        format!(
            "{}{}{}",
            self.scheme, URI_SCHEME_VALUE_SEPARATOR, self.value
        )
    }

    /// Returns `scheme::value` with every byte of its UTF-8 encoding that is not an unreserved URI
    /// character percent-escaped, e.g. `iso6523-actorid-upis%3A%3A0088%3A123`.
    pub fn to_uri_percent_encoded(&self) -> String {
        percent_encode(&self.to_uri_encoded())
    }

    /// Whether `other` names the same thing.
    ///
    /// The kind and the scheme are compared exactly, the values are compared according to the
    /// case rule of the scheme.
    pub fn has_same_content(&self, other: &Identifier) -> bool {
        self.kind == other.kind
            && self.scheme == other.scheme
            && self.normalized_value == other.normalized_value
    }
}

impl PartialEq for Identifier {
    fn eq(&self, other: &Self) -> bool {
        self.has_same_content(other)
    }
}

impl Eq for Identifier {}

impl Hash for Identifier {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind.hash(state);
        self.scheme.hash(state);
        self.normalized_value.hash(state);
    }
}

impl std::fmt::Display for Identifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}{}{}",
            self.scheme, URI_SCHEME_VALUE_SEPARATOR, self.value
        )
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::IdentifierFactory;

    #[test]
    fn test_charset() {
        assert!(Charset::UsAscii.contains('a'));
        assert!(!Charset::UsAscii.contains('é'));
        assert!(Charset::Iso8859_1.contains('é'));
        assert!(Charset::Iso8859_1.contains('\u{ff}'));
        assert!(!Charset::Iso8859_1.contains('€'));
    }

    #[test]
    fn test_uri_encoded_preserves_casing() {
        let factory = IdentifierFactory::default();
        let id = factory
            .create(IdentifierKind::Participant, "iso6523-actorid-upis", "0088:ABC")
            .unwrap();

        assert_eq!(id.to_uri_encoded(), "iso6523-actorid-upis::0088:ABC");
        assert_eq!(id.to_string(), "iso6523-actorid-upis::0088:ABC");
        assert_eq!(id.value(), "0088:ABC");
        assert_eq!(id.normalized_value(), "0088:abc");
    }

    #[test]
    fn test_uri_percent_encoded() {
        let factory = IdentifierFactory::default();
        let participant = factory
            .create(IdentifierKind::Participant, "iso6523-actorid-upis", "0088:123")
            .unwrap();

        assert_eq!(
            participant.to_uri_percent_encoded(),
            "iso6523-actorid-upis%3A%3A0088%3A123"
        );

        let doc_type = factory
            .create(
                IdentifierKind::DocumentType,
                "busdox-docid-qns",
                "urn:oasis:names:specification:ubl:schema:xsd:Invoice-2::Invoice##urn:cen.eu:en16931:2017#compliant#urn:fdc:peppol.eu:2017:poacc:billing:3.0::2.1",
            )
            .unwrap();

        assert_eq!(
            doc_type.to_uri_percent_encoded(),
            "busdox-docid-qns%3A%3Aurn%3Aoasis%3Anames%3Aspecification%3Aubl%3Aschema%3Axsd%3AInvoice-2%3A%3AInvoice%23%23urn%3Acen.eu%3Aen16931%3A2017%23compliant%23urn%3Afdc%3Apeppol.eu%3A2017%3Apoacc%3Abilling%3A3.0%3A%3A2.1"
        );
    }

    #[test]
    fn test_uri_percent_encoded_non_ascii() {
        let factory = IdentifierFactory::default();
        let process = factory
            .create(IdentifierKind::Process, "custom-procid", "café flow")
            .unwrap();

        assert_eq!(
            process.to_uri_percent_encoded(),
            "custom-procid%3A%3Acaf%C3%A9%20flow"
        );
    }

    #[test]
    fn test_same_content_case_insensitive_scheme() {
        let factory = IdentifierFactory::default();
        let upper = factory
            .create(IdentifierKind::Participant, "iso6523-actorid-upis", "ABC")
            .unwrap();
        let lower = factory
            .create(IdentifierKind::Participant, "iso6523-actorid-upis", "abc")
            .unwrap();

        assert!(upper.has_same_content(&lower));
        assert_eq!(upper, lower);
    }

    #[test]
    fn test_same_content_case_sensitive_scheme() {
        let factory = IdentifierFactory::default();
        let upper = factory
            .create(IdentifierKind::Participant, "cs-actorid-upis", "ABC")
            .unwrap();
        let lower = factory
            .create(IdentifierKind::Participant, "cs-actorid-upis", "abc")
            .unwrap();

        assert!(!upper.has_same_content(&lower));
        assert_ne!(upper, lower);
    }

    #[test]
    fn test_same_content_differs_by_kind_and_scheme() {
        let factory = IdentifierFactory::default();
        let participant = factory
            .create(IdentifierKind::Participant, "some-scheme", "abc")
            .unwrap();
        let process = factory
            .create(IdentifierKind::Process, "some-scheme", "abc")
            .unwrap();
        let other_scheme = factory
            .create(IdentifierKind::Participant, "Some-scheme", "abc")
            .unwrap();

        assert!(!participant.has_same_content(&process));
        assert!(!participant.has_same_content(&other_scheme));
    }

    #[test]
    fn test_hash_consistent_with_eq() {
        let factory = IdentifierFactory::default();
        let mut set = HashSet::new();

        set.insert(
            factory
                .create(IdentifierKind::Participant, "iso6523-actorid-upis", "0088:ABC")
                .unwrap(),
        );
        set.insert(
            factory
                .create(IdentifierKind::Participant, "iso6523-actorid-upis", "0088:abc")
                .unwrap(),
        );

        assert_eq!(set.len(), 1);
    }
}
