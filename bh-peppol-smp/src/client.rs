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

use std::time::Duration;

use bh_peppol_id::Identifier;
use bh_peppol_sml::{PeppolNetwork, SmlZone, SmpUrlProvider, Url};
use bh_peppol_trust::{RevocationChecker, TrustError, TrustedCaChecker};
use bh_uri_utils::UriPathExtensions as _;
use bherror::traits::{ErrorContext as _, ForeignError as _, PropagateError as _};
use chrono::Utc;
use openssl::x509::X509;
use reqwest::StatusCode;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{
    certificate::{check_certificate_uid, matches_certificate_uid, parse_certificate},
    endpoint::parse_address,
    DiscoveryError, EndpointRecord, HttpGetClient, ReqwestGetClient, ResolvedEndpoint, Result,
    ServiceGroup, ServiceInformation, ServiceMetadataContent, ServiceMetadataReader,
    SignedServiceMetadata, XmlServiceMetadataReader,
};

/// Configuration of the [`SmpClient`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmpClientConfig {
    /// The SML zone participants are located in.
    pub zone: SmlZone,
    /// Upper bound of every single SMP request, including reading the response body.
    ///
    /// Serialized as the integer field `timeout_ms`, in milliseconds.
    #[serde(
        rename = "timeout_ms",
        serialize_with = "serialize_millis",
        deserialize_with = "deserialize_millis"
    )]
    pub timeout: Duration,
}

fn serialize_millis<S: Serializer>(
    timeout: &Duration,
    s: S,
) -> std::result::Result<S::Ok, S::Error> {
    let millis = u64::try_from(timeout.as_millis())
        .map_err(|_| serde::ser::Error::custom("timeout does not fit into u64 milliseconds"))?;

    s.serialize_u64(millis)
}

fn deserialize_millis<'de, D>(d: D) -> std::result::Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let millis = u64::deserialize(d)?;

    Ok(Duration::from_millis(millis))
}

impl Default for SmpClientConfig {
    fn default() -> Self {
        Self {
            zone: PeppolNetwork::Production.zone(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Client querying the SMP of a participant.
///
/// The SMP is located with the [`SmpUrlProvider`], queried through the [`HttpGetClient`] and its
/// responses decoded by the [`ServiceMetadataReader`].  There are no internal retries, and
/// dropping a returned future aborts the request in flight.
#[derive(Debug)]
pub struct SmpClient<P, C = ReqwestGetClient, X = XmlServiceMetadataReader> {
    config: SmpClientConfig,
    provider: P,
    http: C,
    reader: X,
}

impl<P: SmpUrlProvider> SmpClient<P> {
    /// Creates a client using [`reqwest`] and the [`XmlServiceMetadataReader`].
    pub fn new(config: SmpClientConfig, provider: P) -> Self {
        Self::with_parts(
            config,
            provider,
            ReqwestGetClient::default(),
            XmlServiceMetadataReader::default(),
        )
    }
}

impl<P, C, X> SmpClient<P, C, X>
where
    P: SmpUrlProvider,
    C: HttpGetClient,
    X: ServiceMetadataReader,
{
    /// Creates a client from its parts.
    pub fn with_parts(config: SmpClientConfig, provider: P, http: C, reader: X) -> Self {
        Self {
            config,
            provider,
            http,
            reader,
        }
    }

    /// The configuration of the client.
    pub fn config(&self) -> &SmpClientConfig {
        &self.config
    }

    /// Fetches the ServiceGroup of `participant`, listing the document types it supports.
    pub async fn get_service_group(&self, participant: &Identifier) -> Result<ServiceGroup> {
        let url = self.query_url(participant, None).await?;
        let body = self.fetch(&url).await?;

        self.reader.read_service_group(&body)
    }

    /// Fetches the ServiceMetadata of `participant` for `document_type`.
    ///
    /// A redirect is followed once, provided the target's signer certificate matches the
    /// certificate UID of the redirect.  A redirect of the redirect target fails with
    /// [`DiscoveryError::TooManyRedirects`].
    pub async fn get_service_metadata(
        &self,
        participant: &Identifier,
        document_type: &Identifier,
    ) -> Result<ServiceInformation> {
        let url = self.query_url(participant, Some(document_type)).await?;

        let redirect = match self.read_metadata(&url).await?.content {
            ServiceMetadataContent::ServiceInformation(info) => return Ok(info),
            ServiceMetadataContent::Redirect(redirect) => redirect,
        };

        check_certificate_uid(&redirect.certificate_uid)?;
        let target = Url::parse(&redirect.href).foreign_err(|| {
            DiscoveryError::MalformedResponse(format!("invalid redirect href `{}`", redirect.href))
        })?;

        tracing::info!(from = %url, to = %target, "following SMP redirect");
        let followed = self.read_metadata(&target).await?;

        let info = match followed.content {
            ServiceMetadataContent::ServiceInformation(info) => info,
            ServiceMetadataContent::Redirect(second) => {
                return Err(bherror::Error::root(DiscoveryError::TooManyRedirects)
                    .ctx(format!("{target} redirects to {}", second.href)));
            }
        };

        let signer_matches = match &followed.signer_certificate {
            Some(signer) => matches_certificate_uid(signer, &redirect.certificate_uid)?,
            None => false,
        };
        if !signer_matches {
            return Err(bherror::Error::root(
                DiscoveryError::RedirectCertificateMismatch(redirect.certificate_uid),
            )
            .ctx(format!("redirect target {target}")));
        }

        Ok(info)
    }

    /// Resolves the endpoint of `participant` receiving `document_type` in `process` over
    /// `transport_profile`.
    ///
    /// The endpoint certificate must be accepted by `checker`, otherwise the call fails with
    /// [`DiscoveryError::UntrustedEndpoint`], or [`DiscoveryError::RevocationCheckUnavailable`]
    /// when the revocation status cannot be determined.  The activation and expiration dates of
    /// the endpoint are not checked.
    pub async fn resolve_endpoint<R: RevocationChecker>(
        &self,
        participant: &Identifier,
        document_type: &Identifier,
        process: &Identifier,
        transport_profile: &str,
        checker: &TrustedCaChecker<R>,
    ) -> Result<ResolvedEndpoint> {
        let record = self
            .find_endpoint(participant, document_type, process, transport_profile)
            .await?;

        let address = parse_address(&record.address)?;
        let certificate = parse_certificate(&record.certificate)?;

        let result = checker
            .check_certificate(&certificate, Utc::now())
            .await
            .match_err(|error| match error {
                TrustError::RevocationCheckUnavailable(_) => {
                    DiscoveryError::RevocationCheckUnavailable
                }
                _ => DiscoveryError::UntrustedEndpoint,
            })?;

        if !result.is_valid() {
            return Err(
                bherror::Error::root(DiscoveryError::UntrustedEndpoint).ctx(format!(
                    "certificate is {result} according to {}",
                    checker.ca_set().name()
                )),
            );
        }

        let endpoint = ResolvedEndpoint::new(&record, address, certificate)?;
        tracing::info!(%participant, address = %endpoint.address, "endpoint resolved");

        Ok(endpoint)
    }

    /// Returns the address of the endpoint, without checking its certificate.
    pub async fn get_endpoint_address(
        &self,
        participant: &Identifier,
        document_type: &Identifier,
        process: &Identifier,
        transport_profile: &str,
    ) -> Result<Url> {
        let record = self
            .find_endpoint(participant, document_type, process, transport_profile)
            .await?;

        parse_address(&record.address)
    }

    /// Returns the certificate of the endpoint, without checking it.
    pub async fn get_endpoint_certificate(
        &self,
        participant: &Identifier,
        document_type: &Identifier,
        process: &Identifier,
        transport_profile: &str,
    ) -> Result<X509> {
        let record = self
            .find_endpoint(participant, document_type, process, transport_profile)
            .await?;

        parse_certificate(&record.certificate)
    }

    async fn find_endpoint(
        &self,
        participant: &Identifier,
        document_type: &Identifier,
        process: &Identifier,
        transport_profile: &str,
    ) -> Result<EndpointRecord> {
        let info = self
            .get_service_metadata(participant, document_type)
            .await?;

        info.find_endpoint(process, transport_profile)
            .cloned()
            .ok_or_else(|| {
                bherror::Error::root(DiscoveryError::EndpointNotFound).ctx(format!(
                    "no `{transport_profile}` endpoint for process {process}"
                ))
            })
    }

    /// `<base>/<participant>` or `<base>/<participant>/services/<document type>`, with the
    /// identifiers percent-encoded.
    async fn query_url(
        &self,
        participant: &Identifier,
        document_type: Option<&Identifier>,
    ) -> Result<Url> {
        let base = self
            .provider
            .smp_url(participant, &self.config.zone)
            .await
            .with_err(|| DiscoveryError::SmpLocation)?;

        let mut path = format!("/{}", participant.to_uri_percent_encoded());
        if let Some(document_type) = document_type {
            path.push_str("/services/");
            path.push_str(&document_type.to_uri_percent_encoded());
        }

        base.add_path_suffix(&path)
            .with_err(|| DiscoveryError::SmpLocation)
    }

    async fn read_metadata(&self, url: &Url) -> Result<SignedServiceMetadata> {
        let body = self.fetch(url).await?;
        self.reader.read_service_metadata(&body)
    }

    async fn fetch(&self, url: &Url) -> Result<String> {
        tracing::debug!(%url, "querying SMP");

        let body = tokio::time::timeout(self.config.timeout, self.fetch_body(url))
            .await
            .foreign_err(|| DiscoveryError::Transport(url.to_string()))
            .ctx(|| format!("no response within {:?}", self.config.timeout))??;

        Ok(body)
    }

    async fn fetch_body(&self, url: &Url) -> Result<String> {
        let response = self
            .http
            .get(url.as_str())
            .await
            .foreign_err(|| DiscoveryError::Transport(url.to_string()))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(bherror::Error::root(DiscoveryError::EndpointNotFound)
                .ctx(format!("{url} returned {status}")));
        }
        if !status.is_success() {
            return Err(
                bherror::Error::root(DiscoveryError::Transport(url.to_string()))
                    .ctx(format!("unexpected status {status}")),
            );
        }

        response.text().await.foreign_err(|| {
            DiscoveryError::MalformedResponse("unreadable response body".to_owned())
        })
    }
}
