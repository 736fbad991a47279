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

use serde::{Deserialize, Serialize};

use crate::{Result, SmlError};

/// A single SML network stage.
///
/// The DNS zone always ends with a `.`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "SmlZoneUnverified")]
pub struct SmlZone {
    name: String,
    dns_zone: String,
    management_service_url: String,
    requires_client_certificate: bool,
}

impl SmlZone {
    /// Creates a new [`SmlZone`].
    ///
    /// Fails if `dns_zone` is empty, does not end with a `.`, or starts with one.
    pub fn new(
        name: impl Into<String>,
        dns_zone: impl Into<String>,
        management_service_url: impl Into<String>,
        requires_client_certificate: bool,
    ) -> Result<Self> {
        let dns_zone = dns_zone.into();

        if let Err(reason) = validate_dns_zone(&dns_zone) {
            return Err(bherror::Error::root(SmlError::InvalidZone(dns_zone)).ctx(reason));
        }

        Ok(Self {
            name: name.into(),
            dns_zone,
            management_service_url: management_service_url.into(),
            requires_client_certificate,
        })
    }

    /// Human readable name of the stage.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The DNS zone suffix, ending with a `.`.
    pub fn dns_zone(&self) -> &str {
        &self.dns_zone
    }

    /// The URL of the SML management service.
    pub fn management_service_url(&self) -> &str {
        &self.management_service_url
    }

    /// Whether the management service requires TLS client authentication.
    pub fn requires_client_certificate(&self) -> bool {
        self.requires_client_certificate
    }
}

fn validate_dns_zone(dns_zone: &str) -> std::result::Result<(), &'static str> {
    if dns_zone.is_empty() {
        return Err("DNS zone is empty");
    }
    if !dns_zone.ends_with('.') {
        return Err("DNS zone must end with a `.`");
    }
    if dns_zone.starts_with('.') {
        return Err("DNS zone must not start with a `.`");
    }
    Ok(())
}

/// "Shadow" type used to validate a deserialized [`SmlZone`] through its constructor.
#[derive(Deserialize)]
struct SmlZoneUnverified {
    name: String,
    dns_zone: String,
    management_service_url: String,
    requires_client_certificate: bool,
}

impl TryFrom<SmlZoneUnverified> for SmlZone {
    type Error = &'static str;

    fn try_from(value: SmlZoneUnverified) -> std::result::Result<Self, Self::Error> {
        validate_dns_zone(&value.dns_zone)?;

        Ok(Self {
            name: value.name,
            dns_zone: value.dns_zone,
            management_service_url: value.management_service_url,
            requires_client_certificate: value.requires_client_certificate,
        })
    }
}

/// The well-known Peppol SML stages.
#[derive(strum_macros::Display, Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeppolNetwork {
    /// The production SML operated by the European Commission.
    #[strum(to_string = "Peppol production SML")]
    Production,
    /// The test SML (SMK) operated by the European Commission.
    #[strum(to_string = "Peppol test SML")]
    Test,
    /// The retired production SML under `peppolcentral.org`.
    #[strum(to_string = "Peppol legacy production SML")]
    LegacyProduction,
    /// The retired test SML under `peppolcentral.org`.
    #[strum(to_string = "Peppol legacy test SML")]
    LegacyTest,
    /// A locally running SML for development.
    #[strum(to_string = "Local development SML")]
    LocalDevelopment,
}

impl PeppolNetwork {
    /// All enumerated stages.
    pub const ALL: [PeppolNetwork; 5] = [
        Self::Production,
        Self::Test,
        Self::LegacyProduction,
        Self::LegacyTest,
        Self::LocalDevelopment,
    ];

    /// The [`SmlZone`] of this stage.
    pub fn zone(self) -> SmlZone {
        let (dns_zone, management_service_url, requires_client_certificate) = match self {
            Self::Production => (
                "edelivery.tech.ec.europa.eu.",
                "https://edelivery.tech.ec.europa.eu/edelivery-sml",
                true,
            ),
            Self::Test => (
                "acc.edelivery.tech.ec.europa.eu.",
                "https://acc.edelivery.tech.ec.europa.eu/edelivery-sml",
                true,
            ),
            Self::LegacyProduction => (
                "sml.peppolcentral.org.",
                "https://sml.peppolcentral.org",
                true,
            ),
            Self::LegacyTest => (
                "smk.peppolcentral.org.",
                "https://smk.peppolcentral.org",
                true,
            ),
            Self::LocalDevelopment => ("smj.peppolcentral.org.", "http://localhost:8080", false),
        };

        SmlZone {
            name: self.to_string(),
            dns_zone: dns_zone.to_owned(),
            management_service_url: management_service_url.to_owned(),
            requires_client_certificate,
        }
    }
}
