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

use bherror::traits::ErrorContext as _;

use crate::{
    percent::percent_decode, Identifier, IdentifierError, IdentifierKind, IdentifierPolicy,
    Result, DEFAULT_DOCUMENT_TYPE_SCHEME, DEFAULT_PARTICIPANT_SCHEME, DEFAULT_PROCESS_SCHEME,
    SCHEME_MAX_LENGTH, URI_SCHEME_VALUE_SEPARATOR,
};

/// The only way to construct an [`Identifier`].
///
/// Every method either returns a fully validated [`Identifier`] or an
/// [`IdentifierError::InvalidFormat`] error.  The checks are, in order:
///
/// 1. the scheme must not contain the `::` separator,
/// 2. the scheme must not be empty,
/// 3. the scheme must have at most [`SCHEME_MAX_LENGTH`] characters (can be disabled),
/// 4. the value must not be empty,
/// 5. the value must have at most [`IdentifierKind::max_value_length`] characters,
/// 6. the value must be representable in [`IdentifierKind::charset`] (can be disabled).
#[derive(Clone, Debug, Default)]
pub struct IdentifierFactory {
    policy: IdentifierPolicy,
}

impl IdentifierFactory {
    /// Creates a factory configured with `policy`.
    pub fn new(policy: IdentifierPolicy) -> Self {
        Self { policy }
    }

    /// The policy of this factory.
    pub fn policy(&self) -> &IdentifierPolicy {
        &self.policy
    }

    /// Validates the `scheme` and the `value` and constructs an [`Identifier`] out of them.
    pub fn create(&self, kind: IdentifierKind, scheme: &str, value: &str) -> Result<Identifier> {
        self.validate_scheme(kind, scheme)?;
        self.validate_value(kind, value)?;

        let normalized_value = self
            .policy
            .case_rules
            .normalize(scheme, value)
            .into_owned();

        Ok(Identifier::new_unchecked(
            kind,
            scheme.to_owned(),
            value.to_owned(),
            normalized_value,
        ))
    }

    /// Parses the `scheme::value` form of an identifier.
    ///
    /// The input is split on the first `::`.
    pub fn parse(&self, kind: IdentifierKind, uri_encoded: &str) -> Result<Identifier> {
        let Some((scheme, value)) = uri_encoded.split_once(URI_SCHEME_VALUE_SEPARATOR) else {
            return Err(bherror::Error::root(IdentifierError::invalid(
                kind,
                format!("missing `{URI_SCHEME_VALUE_SEPARATOR}` separator"),
            )));
        };

        self.create(kind, scheme, value)
    }

    /// Parses the percent-encoded `scheme::value` form of an identifier, e.g.
    /// `iso6523-actorid-upis%3A%3A0088%3A123`.
    pub fn parse_percent_encoded(
        &self,
        kind: IdentifierKind,
        percent_encoded: &str,
    ) -> Result<Identifier> {
        let decoded = percent_decode(kind, percent_encoded)?;
        self.parse(kind, &decoded)
            .ctx(|| format!("percent-encoded input: {percent_encoded}"))
    }

    /// Shortcut for [`IdentifierFactory::create`] with [`IdentifierKind::Participant`].
    pub fn participant(&self, scheme: &str, value: &str) -> Result<Identifier> {
        self.create(IdentifierKind::Participant, scheme, value)
    }

    /// Shortcut for [`IdentifierFactory::create`] with [`IdentifierKind::DocumentType`].
    pub fn document_type(&self, scheme: &str, value: &str) -> Result<Identifier> {
        self.create(IdentifierKind::DocumentType, scheme, value)
    }

    /// Shortcut for [`IdentifierFactory::create`] with [`IdentifierKind::Process`].
    pub fn process(&self, scheme: &str, value: &str) -> Result<Identifier> {
        self.create(IdentifierKind::Process, scheme, value)
    }

    /// Creates a participant identifier with the default Peppol scheme.
    pub fn peppol_participant(&self, value: &str) -> Result<Identifier> {
        self.participant(DEFAULT_PARTICIPANT_SCHEME, value)
    }

    /// Creates a document type identifier with the default Peppol scheme.
    pub fn peppol_document_type(&self, value: &str) -> Result<Identifier> {
        self.document_type(DEFAULT_DOCUMENT_TYPE_SCHEME, value)
    }

    /// Creates a process identifier with the default Peppol scheme.
    pub fn peppol_process(&self, value: &str) -> Result<Identifier> {
        self.process(DEFAULT_PROCESS_SCHEME, value)
    }

    /// Whether `scheme` is a valid scheme for this factory.
    pub fn is_valid_scheme(&self, scheme: &str) -> bool {
        self.check_scheme(scheme).is_ok()
    }

    /// Whether `value` is a valid value of the given kind for this factory.
    pub fn is_valid_value(&self, kind: IdentifierKind, value: &str) -> bool {
        self.check_value(kind, value).is_ok()
    }

    fn validate_scheme(&self, kind: IdentifierKind, scheme: &str) -> Result<()> {
        self.check_scheme(scheme)
            .map_err(|reason| bherror::Error::root(IdentifierError::invalid(kind, reason)))
            .ctx(|| format!("scheme: {scheme}"))
    }

    fn validate_value(&self, kind: IdentifierKind, value: &str) -> Result<()> {
        self.check_value(kind, value)
            .map_err(|reason| bherror::Error::root(IdentifierError::invalid(kind, reason)))
            .ctx(|| format!("value: {value}"))
    }

    // Plain string reasons, the `is_valid_*` predicates must not log.
    fn check_scheme(&self, scheme: &str) -> std::result::Result<(), String> {
        if scheme.contains(URI_SCHEME_VALUE_SEPARATOR) {
            return Err(format!(
                "scheme must not contain `{URI_SCHEME_VALUE_SEPARATOR}`"
            ));
        }

        if scheme.is_empty() {
            return Err("scheme is empty".to_owned());
        }

        let length = scheme.chars().count();
        if self.policy.check_scheme_length && length > SCHEME_MAX_LENGTH {
            return Err(format!(
                "scheme has {length} characters, at most {SCHEME_MAX_LENGTH} are allowed"
            ));
        }

        Ok(())
    }

    fn check_value(&self, kind: IdentifierKind, value: &str) -> std::result::Result<(), String> {
        if value.is_empty() {
            return Err("value is empty".to_owned());
        }

        let length = value.chars().count();
        let max_length = kind.max_value_length();
        if length > max_length {
            return Err(format!(
                "value has {length} characters, at most {max_length} are allowed"
            ));
        }

        let charset = kind.charset();
        if self.policy.check_charset {
            if let Some(c) = value.chars().find(|c| !charset.contains(*c)) {
                return Err(format!("character {c:?} is not representable in {charset}"));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::CaseSensitivityRules;

    fn factory_without_checks() -> IdentifierFactory {
        IdentifierFactory::new(IdentifierPolicy {
            case_rules: CaseSensitivityRules::peppol(),
            check_charset: false,
            check_scheme_length: false,
        })
    }

    #[test]
    fn test_parse_round_trip() {
        let factory = IdentifierFactory::default();
        let cases = [
            (IdentifierKind::Participant, "iso6523-actorid-upis", "0088:ABCdef"),
            (IdentifierKind::Participant, "cs-actorid-upis", "9915:Test"),
            (IdentifierKind::DocumentType, "busdox-docid-qns", "urn:x::Invoice##urn:y::2.1"),
            (IdentifierKind::Process, "cenbii-procid-ubl", "urn:fdc:peppol.eu:2017:poacc:billing:01:1.0"),
        ];

        for (kind, scheme, value) in cases {
            let created = factory.create(kind, scheme, value).unwrap();
            let parsed = factory.parse(kind, &created.to_uri_encoded()).unwrap();

            assert_eq!(parsed.scheme(), scheme);
            assert_eq!(parsed.value(), value);
            assert_eq!(parsed.kind(), kind);
        }
    }

    #[test]
    fn test_parse_splits_on_first_separator() {
        let factory = IdentifierFactory::default();
        let id = factory
            .parse(IdentifierKind::DocumentType, "busdox-docid-qns::a::b::c")
            .unwrap();

        assert_eq!(id.scheme(), "busdox-docid-qns");
        assert_eq!(id.value(), "a::b::c");
    }

    #[test]
    fn test_parse_missing_separator() {
        let factory = IdentifierFactory::default();

        for input in ["iso6523-actorid-upis:0088:123", "", "no-separator"] {
            let err = factory
                .parse(IdentifierKind::Participant, input)
                .unwrap_err();
            assert_matches!(
                err.error,
                IdentifierError::InvalidFormat(IdentifierKind::Participant, _)
            );
        }
    }

    #[test]
    fn test_parse_empty_parts() {
        let factory = IdentifierFactory::default();

        factory
            .parse(IdentifierKind::Participant, "::0088:123")
            .unwrap_err();
        factory
            .parse(IdentifierKind::Participant, "iso6523-actorid-upis::")
            .unwrap_err();
        // an empty value is rejected even when all optional checks are disabled
        factory_without_checks()
            .create(IdentifierKind::Participant, "custom", "")
            .unwrap_err();
    }

    #[test]
    fn test_parse_percent_encoded() {
        let factory = IdentifierFactory::default();
        let id = factory
            .parse_percent_encoded(
                IdentifierKind::Participant,
                "iso6523-actorid-upis%3A%3A0088%3A123",
            )
            .unwrap();

        assert_eq!(id.scheme(), "iso6523-actorid-upis");
        assert_eq!(id.value(), "0088:123");
        assert_eq!(id.to_uri_percent_encoded(), "iso6523-actorid-upis%3A%3A0088%3A123");

        let err = factory
            .parse_percent_encoded(IdentifierKind::Participant, "iso6523-actorid-upis%3A%3A0088%3")
            .unwrap_err();
        assert_matches!(err.error, IdentifierError::InvalidFormat(..));
    }

    #[test]
    fn test_scheme_with_separator_rejected_before_other_checks() {
        let factory = IdentifierFactory::default();
        let long_scheme_with_separator = format!("{}::x", "a".repeat(40));

        let err = factory
            .create(IdentifierKind::Participant, &long_scheme_with_separator, "v")
            .unwrap_err();
        assert_matches!(
            err.error,
            IdentifierError::InvalidFormat(_, ref reason) if reason.contains("must not contain")
        );

        // disabling the checks does not make the separator acceptable
        factory_without_checks()
            .create(IdentifierKind::Participant, "a::b", "v")
            .unwrap_err();
    }

    #[test]
    fn test_scheme_length_boundary() {
        let factory = IdentifierFactory::default();
        let scheme_25 = "s".repeat(25);
        let scheme_26 = "s".repeat(26);

        factory
            .create(IdentifierKind::Participant, &scheme_25, "v")
            .unwrap();
        factory
            .create(IdentifierKind::Participant, &scheme_26, "v")
            .unwrap_err();

        factory_without_checks()
            .create(IdentifierKind::Participant, &scheme_26, "v")
            .unwrap();
        assert!(!factory.is_valid_scheme(&scheme_26));
        assert!(factory.is_valid_scheme(&scheme_25));
    }

    #[test]
    fn test_value_length_boundaries() {
        let factory = IdentifierFactory::default();

        for kind in [
            IdentifierKind::Participant,
            IdentifierKind::DocumentType,
            IdentifierKind::Process,
        ] {
            let max = kind.max_value_length();

            factory
                .create(kind, "some-scheme", &"v".repeat(max))
                .unwrap();
            let err = factory
                .create(kind, "some-scheme", &"v".repeat(max + 1))
                .unwrap_err();
            assert_matches!(err.error, IdentifierError::InvalidFormat(k, _) if k == kind);
        }

        assert_eq!(IdentifierKind::Participant.max_value_length(), 50);
        assert_eq!(IdentifierKind::DocumentType.max_value_length(), 500);
        assert_eq!(IdentifierKind::Process.max_value_length(), 200);
    }

    #[test]
    fn test_value_charset() {
        let factory = IdentifierFactory::default();

        // participants are US-ASCII only
        factory
            .create(IdentifierKind::Participant, "custom-actorid", "caf\u{e9}")
            .unwrap_err();
        // document types and processes accept ISO-8859-1
        factory
            .create(IdentifierKind::DocumentType, "custom-docid", "caf\u{e9}")
            .unwrap();
        factory
            .create(IdentifierKind::Process, "custom-procid", "caf\u{e9}")
            .unwrap();
        factory
            .create(IdentifierKind::Process, "custom-procid", "price in \u{20ac}")
            .unwrap_err();

        // unless the charset check is disabled
        factory_without_checks()
            .create(IdentifierKind::Participant, "custom-actorid", "caf\u{e9}")
            .unwrap();
        factory_without_checks()
            .create(IdentifierKind::Process, "custom-procid", "price in \u{20ac}")
            .unwrap();
    }

    #[test]
    fn test_peppol_shortcuts() {
        let factory = IdentifierFactory::default();

        let participant = factory.peppol_participant("0088:123").unwrap();
        assert_eq!(participant.scheme(), DEFAULT_PARTICIPANT_SCHEME);
        assert_eq!(participant.kind(), IdentifierKind::Participant);

        let doc_type = factory.peppol_document_type("urn:x::Invoice").unwrap();
        assert_eq!(doc_type.scheme(), DEFAULT_DOCUMENT_TYPE_SCHEME);
        assert_eq!(doc_type.kind(), IdentifierKind::DocumentType);

        let process = factory.peppol_process("urn:proc").unwrap();
        assert_eq!(process.scheme(), DEFAULT_PROCESS_SCHEME);
        assert_eq!(process.kind(), IdentifierKind::Process);
    }

    #[test]
    fn test_custom_case_rules() {
        let factory = IdentifierFactory::new(IdentifierPolicy {
            case_rules: CaseSensitivityRules::all_case_sensitive(),
            ..IdentifierPolicy::default()
        });

        let upper = factory.peppol_participant("0088:ABC").unwrap();
        let lower = factory.peppol_participant("0088:abc").unwrap();

        assert!(!upper.has_same_content(&lower));
    }
}
