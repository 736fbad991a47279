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

use bh_peppol_id::Identifier;
use bherror::traits::ForeignError as _;
use reqwest::Url;

use crate::{
    bdxl_hostname, classic_hostname, naptr::select_smp_uri, NaptrLookup, Result, SmlError,
    SmlZone,
};

/// Interface for turning a participant into the base URL of its SMP.
pub trait SmpUrlProvider: Sync {
    /// Returns the base URL of the SMP serving `participant` in the given `zone`.
    fn smp_url(
        &self,
        participant: &Identifier,
        zone: &SmlZone,
    ) -> impl Future<Output = Result<Url>> + Send;
}

/// [`SmpUrlProvider`] using the classic SML scheme.
///
/// The URL is `http://<classic hostname>/`; the hostname itself is resolved by the HTTP client
/// when connecting.
#[derive(Clone, Copy, Debug, Default)]
pub struct ClassicDnsProvider;

impl ClassicDnsProvider {
    /// Computes the SMP base URL without any I/O.
    pub fn smp_url_sync(&self, participant: &Identifier, zone: &SmlZone) -> Result<Url> {
        let hostname = classic_hostname(participant, zone)?;
        let url = format!("http://{hostname}/");

        Url::parse(&url).foreign_err(|| SmlError::InvalidSmpUrl(url))
    }
}

impl SmpUrlProvider for ClassicDnsProvider {
    async fn smp_url(&self, participant: &Identifier, zone: &SmlZone) -> Result<Url> {
        let url = self.smp_url_sync(participant, zone)?;
        tracing::debug!(%participant, %url, "SMP located via classic SML");
        Ok(url)
    }
}

/// [`SmpUrlProvider`] using the BDXL scheme, i.e. a `NAPTR` lookup of the
/// [`bdxl_hostname`][crate::bdxl_hostname].
#[derive(Clone, Debug)]
pub struct NaptrProvider<L> {
    lookup: L,
}

impl<L: NaptrLookup> NaptrProvider<L> {
    /// Creates a provider resolving records with `lookup`.
    pub fn new(lookup: L) -> Self {
        Self { lookup }
    }
}

impl<L: NaptrLookup> SmpUrlProvider for NaptrProvider<L> {
    async fn smp_url(&self, participant: &Identifier, zone: &SmlZone) -> Result<Url> {
        let domain = bdxl_hostname(participant, zone)?;

        let records = self
            .lookup
            .lookup(&domain)
            .await
            .foreign_err(|| SmlError::NaptrLookup(domain.clone()))?;

        let Some(uri) = select_smp_uri(&records) else {
            return Err(bherror::Error::root(SmlError::NoSmpRecord(domain))
                .ctx(format!("{} NAPTR records received", records.len())));
        };

        let url = Url::parse(uri).foreign_err(|| SmlError::InvalidSmpUrl(uri.to_owned()))?;
        tracing::debug!(%participant, %domain, %url, "SMP located via NAPTR");

        Ok(url)
    }
}

/// [`SmpUrlProvider`] always returning the same SMP, bypassing the SML.
#[derive(Clone, Debug)]
pub struct ExplicitSmpProvider {
    url: Url,
}

impl ExplicitSmpProvider {
    /// Creates a provider for the SMP at `url`.
    pub fn new(url: Url) -> Self {
        Self { url }
    }
}

impl SmpUrlProvider for ExplicitSmpProvider {
    async fn smp_url(&self, _participant: &Identifier, _zone: &SmlZone) -> Result<Url> {
        Ok(self.url.clone())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use assert_matches::assert_matches;
    use bh_peppol_id::IdentifierFactory;

    use super::*;
    use crate::{naptr::tests::smp_record, NaptrRecord, PeppolNetwork};

    #[derive(Debug)]
    struct DnsFailure;

    impl std::fmt::Display for DnsFailure {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "SERVFAIL")
        }
    }

    impl std::error::Error for DnsFailure {}

    struct StaticLookup {
        records: std::result::Result<Vec<NaptrRecord>, ()>,
        queried: Mutex<Vec<String>>,
    }

    impl StaticLookup {
        fn new(records: std::result::Result<Vec<NaptrRecord>, ()>) -> Self {
            Self {
                records,
                queried: Mutex::new(Vec::new()),
            }
        }
    }

    impl NaptrLookup for StaticLookup {
        type Err = DnsFailure;

        async fn lookup(&self, domain: &str) -> std::result::Result<Vec<NaptrRecord>, DnsFailure> {
            self.queried.lock().unwrap().push(domain.to_owned());
            self.records.clone().map_err(|()| DnsFailure)
        }
    }

    fn participant() -> Identifier {
        IdentifierFactory::default()
            .peppol_participant("0088:976098897")
            .unwrap()
    }

    #[tokio::test]
    async fn test_classic_provider() {
        let zone = SmlZone::new("legacy", "sml.peppolcentral.org.", "", true).unwrap();

        let url = ClassicDnsProvider
            .smp_url(&participant(), &zone)
            .await
            .unwrap();

        assert_eq!(
            url.as_str(),
            "http://b-a4f72dd40b6353684ada99e1cde11925.iso6523-actorid-upis.sml.peppolcentral.org/"
        );
    }

    #[tokio::test]
    async fn test_naptr_provider() {
        let zone = SmlZone::new("legacy", "sml.peppolcentral.org.", "", true).unwrap();
        let lookup = StaticLookup::new(Ok(vec![
            smp_record(20, 1, "http://backup-smp.example.com"),
            smp_record(10, 1, "http://smp.example.com/smp"),
        ]));
        let provider = NaptrProvider::new(lookup);

        let url = provider.smp_url(&participant(), &zone).await.unwrap();

        assert_eq!(url.as_str(), "http://smp.example.com/smp");
        assert_eq!(
            provider.lookup.queried.lock().unwrap().as_slice(),
            ["LKS5SGTQYFR6KZXSRT5TGGAPLKWIOEPBATJ27BWNMWC3LOHLFI3A.iso6523-actorid-upis.sml.peppolcentral.org"]
        );
    }

    #[tokio::test]
    async fn test_naptr_provider_no_record() {
        let zone = PeppolNetwork::Test.zone();
        let mut other = smp_record(10, 1, "http://smp.example.com");
        other.service = "Meta:CPP".to_owned();
        let provider = NaptrProvider::new(StaticLookup::new(Ok(vec![other])));

        let err = provider.smp_url(&participant(), &zone).await.unwrap_err();

        assert_matches!(err.error, SmlError::NoSmpRecord(_));
    }

    #[tokio::test]
    async fn test_naptr_provider_lookup_failure() {
        let zone = PeppolNetwork::Test.zone();
        let provider = NaptrProvider::new(StaticLookup::new(Err(())));

        let err = provider.smp_url(&participant(), &zone).await.unwrap_err();

        assert_matches!(err.error, SmlError::NaptrLookup(_));
    }

    #[tokio::test]
    async fn test_naptr_provider_invalid_url() {
        let zone = PeppolNetwork::Test.zone();
        let provider = NaptrProvider::new(StaticLookup::new(Ok(vec![smp_record(
            1,
            1,
            "not a url",
        )])));

        let err = provider.smp_url(&participant(), &zone).await.unwrap_err();

        assert_matches!(err.error, SmlError::InvalidSmpUrl(_));
    }

    #[tokio::test]
    async fn test_explicit_provider() {
        let url = Url::parse("https://smp.example.com/").unwrap();
        let provider = ExplicitSmpProvider::new(url.clone());

        let received = provider
            .smp_url(&participant(), &PeppolNetwork::Production.zone())
            .await
            .unwrap();

        assert_eq!(received, url);
    }
}
