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

use bherror::traits::{ErrorContext as _, ForeignError as _};
use openssl::{
    base64,
    hash::MessageDigest,
    nid::Nid,
    x509::{X509Ref, X509},
};

use crate::{error::malformed, DiscoveryError, Result};

/// Parses a certificate published by an SMP, either base64 DER or PEM.
pub(crate) fn parse_certificate(text: &str) -> Result<X509> {
    let text = text.trim();

    if text.starts_with("-----BEGIN") {
        return X509::from_pem(text.as_bytes())
            .foreign_err(|| DiscoveryError::MalformedResponse("invalid PEM certificate".to_owned()));
    }

    let base64: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    let der = base64::decode_block(&base64)
        .foreign_err(|| DiscoveryError::MalformedResponse("invalid certificate".to_owned()))
        .ctx(|| "invalid base64")?;

    X509::from_der(&der)
        .foreign_err(|| DiscoveryError::MalformedResponse("invalid certificate".to_owned()))
        .ctx(|| "invalid DER")
}

/// Fails unless the certificate UID of a redirect is usable for matching.
pub(crate) fn check_certificate_uid(uid: &str) -> Result<()> {
    if uid.trim().is_empty() {
        return Err(malformed("redirect without certificate UID"));
    }
    if uid.chars().any(char::is_control) {
        return Err(malformed("redirect certificate UID contains control characters"));
    }
    Ok(())
}

/// Whether `uid` identifies `certificate`.
///
/// The UID may be the subject DN, the subject common name, the subject serial number, or the
/// SHA-256 or SHA-1 fingerprint in hex.  The DN is accepted in RFC 2253 order as well as in the
/// encoded order, with optional spaces after the separators.  Comparison ignores case, and `:`
/// separators for everything but the DN.
pub(crate) fn matches_certificate_uid(certificate: &X509Ref, uid: &str) -> Result<bool> {
    let dn = normalize_dn(uid);
    if subject_dns(certificate)
        .iter()
        .any(|subject| normalize_dn(subject) == dn)
    {
        return Ok(true);
    }

    let uid = normalize_uid(uid);

    let subject = certificate.subject_name();
    let names = subject
        .entries_by_nid(Nid::COMMONNAME)
        .chain(subject.entries_by_nid(Nid::SERIALNUMBER));
    for entry in names {
        let Ok(name) = entry.data().as_utf8() else {
            continue;
        };
        if normalize_uid(&name) == uid {
            return Ok(true);
        }
    }

    for digest in [MessageDigest::sha256(), MessageDigest::sha1()] {
        let fingerprint = certificate
            .digest(digest)
            .foreign_err(|| DiscoveryError::MalformedResponse("certificate digest".to_owned()))?;
        if hex::encode(&*fingerprint) == uid {
            return Ok(true);
        }
    }

    Ok(false)
}

/// The subject DN in RFC 2253 order (most specific attribute first) and in encoded order.
///
/// Empty when an attribute has no short name or a value that isn't valid UTF-8.
fn subject_dns(certificate: &X509Ref) -> Vec<String> {
    let attributes: Option<Vec<String>> = certificate
        .subject_name()
        .entries()
        .map(|entry| {
            let key = entry.object().nid().short_name().ok()?;
            let value = entry.data().as_utf8().ok()?;
            Some(format!("{key}={}", escape_dn_value(&value)))
        })
        .collect();

    let Some(mut attributes) = attributes else {
        return Vec::new();
    };

    let encoded_order = attributes.join(",");
    attributes.reverse();

    vec![attributes.join(","), encoded_order]
}

fn escape_dn_value(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    let last = value.chars().count().saturating_sub(1);

    for (i, c) in value.chars().enumerate() {
        let needs_escape = matches!(c, ',' | '+' | '"' | '\\' | '<' | '>' | ';')
            || (i == 0 && matches!(c, ' ' | '#'))
            || (i == last && c == ' ');
        if needs_escape {
            escaped.push('\\');
        }
        escaped.push(c);
    }

    escaped
}

/// Lower-cases `dn` and drops the whitespace around its `,` and `=` separators.
fn normalize_dn(dn: &str) -> String {
    dn.split(',')
        .map(|attribute| {
            attribute
                .split('=')
                .map(str::trim)
                .collect::<Vec<_>>()
                .join("=")
        })
        .collect::<Vec<_>>()
        .join(",")
        .to_lowercase()
}

fn normalize_uid(uid: &str) -> String {
    uid.trim()
        .chars()
        .filter(|&c| c != ':')
        .flat_map(char::to_lowercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use bh_peppol_trust::test_utils::{get_certs, CERTS};

    use super::*;

    const LEAF_SHA256: &str =
        "2D:F1:9B:16:3F:65:26:46:F6:04:9B:87:4E:C6:63:CA:17:3F:15:A6:11:81:F7:A5:47:8A:B6:D7:13:B9:4C:38";

    #[test]
    fn test_parse_certificate() {
        let [leaf, _, _] = get_certs();

        let base64 = base64::encode_block(&leaf.to_der().unwrap());
        // SMPs commonly wrap the base64 text
        let wrapped = format!("\n  {}\n  {}\n", &base64[..64], &base64[64..]);
        assert_eq!(parse_certificate(&wrapped).unwrap(), leaf);

        let pem = String::from_utf8(leaf.to_pem().unwrap()).unwrap();
        assert_eq!(parse_certificate(&pem).unwrap(), leaf);

        let err = parse_certificate("bm90IGEgY2VydGlmaWNhdGU=").unwrap_err();
        assert_matches!(err.error, DiscoveryError::MalformedResponse(_));

        let err = parse_certificate(&CERTS[..200]).unwrap_err();
        assert_matches!(err.error, DiscoveryError::MalformedResponse(_));
    }

    #[test]
    fn test_check_certificate_uid() {
        check_certificate_uid("CN=SMP_1000000181,O=DIGIT,C=BE").unwrap();

        for uid in ["", "   ", "leaf\n", "le\u{0}af"] {
            let err = check_certificate_uid(uid).unwrap_err();
            assert_matches!(err.error, DiscoveryError::MalformedResponse(_));
        }
    }

    #[test]
    fn test_matches_certificate_uid() {
        let [leaf, intermediary, _] = get_certs();

        assert!(matches_certificate_uid(&leaf, "leaf").unwrap());
        assert!(matches_certificate_uid(&leaf, "LEAF").unwrap());
        assert!(matches_certificate_uid(&leaf, LEAF_SHA256).unwrap());
        assert!(matches_certificate_uid(&leaf, &LEAF_SHA256.replace(':', "").to_lowercase()).unwrap());

        assert!(!matches_certificate_uid(&intermediary, "leaf").unwrap());
        assert!(!matches_certificate_uid(&intermediary, LEAF_SHA256).unwrap());
        assert!(!matches_certificate_uid(&leaf, "other").unwrap());
    }

    #[test]
    fn test_matches_certificate_uid_subject_dn() {
        let [leaf, intermediary, _] = get_certs();

        for uid in [
            "CN=leaf,OU=Team Bee,O=TBTL,L=Zagreb,ST=Grad Zagreb,C=HR",
            "C=HR,ST=Grad Zagreb,L=Zagreb,O=TBTL,OU=Team Bee,CN=leaf",
            "CN=leaf, OU=Team Bee, O=TBTL, L=Zagreb, ST=Grad Zagreb, C=HR",
            "cn=LEAF,ou=team bee,o=tbtl,l=zagreb,st=grad zagreb,c=hr",
        ] {
            assert!(matches_certificate_uid(&leaf, uid).unwrap(), "{uid}");
        }

        assert!(!matches_certificate_uid(
            &intermediary,
            "CN=leaf,OU=Team Bee,O=TBTL,L=Zagreb,ST=Grad Zagreb,C=HR"
        )
        .unwrap());
        assert!(!matches_certificate_uid(&leaf, "CN=leaf,O=TBTL,C=HR").unwrap());
    }

    #[test]
    fn test_escape_dn_value() {
        assert_eq!(escape_dn_value("Team Bee"), "Team Bee");
        assert_eq!(escape_dn_value("Acme, Inc."), "Acme\\, Inc.");
        assert_eq!(escape_dn_value("#1 "), "\\#1\\ ");
    }
}
