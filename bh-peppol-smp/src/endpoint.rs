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

use bh_peppol_sml::Url;
use bherror::traits::ForeignError as _;
use chrono::{DateTime, Utc};
use openssl::x509::X509;

use crate::{DiscoveryError, EndpointRecord, Result};

/// An endpoint found by [`SmpClient::resolve_endpoint`][crate::SmpClient::resolve_endpoint],
/// whose certificate has been accepted by the trusted CA checker.
///
/// The activation and expiration dates are reported as published; use
/// [`is_active_at`](Self::is_active_at) to check them.
#[derive(Clone, Debug)]
pub struct ResolvedEndpoint {
    /// The address messages are delivered to.
    pub address: Url,
    /// The transport profile of the endpoint.
    pub transport_profile: String,
    /// The endpoint certificate.
    pub certificate: X509,
    /// The endpoint certificate in PEM format.
    pub certificate_pem: String,
    /// The endpoint is not to be used before this instant.
    pub activation_date: Option<DateTime<Utc>>,
    /// The endpoint is not to be used after this instant.
    pub expiration_date: Option<DateTime<Utc>>,
    /// Whether the receiver requires a business level signature.
    pub requires_business_level_signature: bool,
    /// The minimum authentication level required by the receiver.
    pub minimum_authentication_level: Option<String>,
    /// Human readable description of the service.
    pub service_description: Option<String>,
    /// Contact of the technical support.
    pub technical_contact_url: Option<String>,
    /// Further technical information.
    pub technical_information_url: Option<String>,
}

impl ResolvedEndpoint {
    pub(crate) fn new(record: &EndpointRecord, address: Url, certificate: X509) -> Result<Self> {
        let certificate_pem = certificate
            .to_pem()
            .ok()
            .and_then(|pem| String::from_utf8(pem).ok());
        let Some(certificate_pem) = certificate_pem else {
            return Err(bherror::Error::root(DiscoveryError::MalformedResponse(
                "certificate not representable as PEM".to_owned(),
            )));
        };

        Ok(Self {
            address,
            transport_profile: record.transport_profile.clone(),
            certificate,
            certificate_pem,
            activation_date: record.activation_date,
            expiration_date: record.expiration_date,
            requires_business_level_signature: record.requires_business_level_signature,
            minimum_authentication_level: record.minimum_authentication_level.clone(),
            service_description: record.service_description.clone(),
            technical_contact_url: record.technical_contact_url.clone(),
            technical_information_url: record.technical_information_url.clone(),
        })
    }

    /// Whether `at` lies within the activation and expiration dates, where missing dates do not
    /// restrict.
    pub fn is_active_at(&self, at: DateTime<Utc>) -> bool {
        self.activation_date.map_or(true, |activation| activation <= at)
            && self.expiration_date.map_or(true, |expiration| at <= expiration)
    }
}

pub(crate) fn parse_address(address: &str) -> Result<Url> {
    Url::parse(address).foreign_err(|| {
        DiscoveryError::MalformedResponse(format!("invalid endpoint address `{address}`"))
    })
}

#[cfg(test)]
mod tests {
    use bh_peppol_trust::test_utils::get_certs;
    use chrono::TimeZone as _;

    use super::*;

    fn record() -> EndpointRecord {
        EndpointRecord {
            transport_profile: "peppol-transport-as4-v2_0".to_owned(),
            address: "https://ap.example.com/as4".to_owned(),
            certificate: String::new(),
            requires_business_level_signature: true,
            minimum_authentication_level: None,
            activation_date: Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()),
            expiration_date: Some(Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()),
            service_description: Some("AP".to_owned()),
            technical_contact_url: None,
            technical_information_url: None,
        }
    }

    #[test]
    fn test_resolved_endpoint() {
        let [leaf, _, _] = get_certs();
        let record = record();
        let address = parse_address(&record.address).unwrap();

        let endpoint = ResolvedEndpoint::new(&record, address, leaf.clone()).unwrap();

        assert_eq!(endpoint.address.as_str(), "https://ap.example.com/as4");
        assert!(endpoint.requires_business_level_signature);
        assert!(endpoint.certificate_pem.starts_with("-----BEGIN CERTIFICATE-----"));
        assert_eq!(
            X509::from_pem(endpoint.certificate_pem.as_bytes()).unwrap(),
            leaf
        );
    }

    #[test]
    fn test_is_active_at() {
        let [leaf, _, _] = get_certs();
        let record = record();
        let address = parse_address(&record.address).unwrap();
        let mut endpoint = ResolvedEndpoint::new(&record, address, leaf).unwrap();

        assert!(endpoint.is_active_at(Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()));
        assert!(!endpoint.is_active_at(Utc.with_ymd_and_hms(2023, 6, 1, 0, 0, 0).unwrap()));
        assert!(!endpoint.is_active_at(Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap()));

        endpoint.activation_date = None;
        endpoint.expiration_date = None;
        assert!(endpoint.is_active_at(Utc.with_ymd_and_hms(1990, 1, 1, 0, 0, 0).unwrap()));
    }

    #[test]
    fn test_parse_address() {
        assert!(parse_address("https://ap.example.com/as4").is_ok());
        assert!(parse_address("ap.example.com").is_err());
    }
}
