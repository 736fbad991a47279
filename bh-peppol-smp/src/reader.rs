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

use bh_peppol_id::{Identifier, IdentifierFactory, IdentifierKind};
use bherror::traits::{ForeignError as _, PropagateError as _};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use roxmltree::{Document, Node};

use crate::{
    certificate::parse_certificate, error::malformed, DiscoveryError, EndpointRecord,
    ProcessRecord, Redirect, Result, ServiceGroup, ServiceInformation, ServiceMetadataContent,
    ServiceMetadataReference, SignedServiceMetadata,
};

/// Namespace of the Peppol SMP 1.0 documents.
pub const PEPPOL_SMP_NAMESPACE: &str = "http://busdox.org/serviceMetadata/publishing/1.0/";

/// Namespace of the OASIS BDXR SMP 1.0 documents.
pub const BDXR_SMP_NAMESPACE: &str = "http://docs.oasis-open.org/bdxr/ns/SMP/2016/05";

/// Interface for decoding the XML documents served by an SMP.
pub trait ServiceMetadataReader: Sync {
    /// Decodes a ServiceGroup document.
    fn read_service_group(&self, xml: &str) -> Result<ServiceGroup>;

    /// Decodes a (Signed)ServiceMetadata document.
    fn read_service_metadata(&self, xml: &str) -> Result<SignedServiceMetadata>;
}

/// [`ServiceMetadataReader`] for Peppol SMP 1.0 and OASIS BDXR SMP 1.0 documents.
///
/// The certificate of the XML signature is extracted, but the signature itself is **NOT
/// VERIFIED**.  Identifiers are created with the configured [`IdentifierFactory`], so their
/// comparison follows its case rules.
#[derive(Clone, Debug, Default)]
pub struct XmlServiceMetadataReader {
    factory: IdentifierFactory,
}

impl XmlServiceMetadataReader {
    /// Creates a reader creating identifiers with `factory`.
    pub fn new(factory: IdentifierFactory) -> Self {
        Self { factory }
    }

    fn identifier(&self, node: Node, kind: IdentifierKind) -> Result<Identifier> {
        let scheme = node
            .attribute("scheme")
            .ok_or_else(|| malformed(format!("{kind} identifier without scheme")))?;
        let value = node.text().map(str::trim).unwrap_or_default();

        self.factory
            .create(kind, scheme, value)
            .with_err(|| DiscoveryError::MalformedResponse(format!("invalid {kind} identifier")))
    }

    fn service_information(&self, node: Node) -> Result<ServiceInformation> {
        let participant = self.identifier(
            required_child(node, "ParticipantIdentifier")?,
            IdentifierKind::Participant,
        )?;
        let document_type = self.identifier(
            required_child(node, "DocumentIdentifier")?,
            IdentifierKind::DocumentType,
        )?;

        let processes = children(required_child(node, "ProcessList")?, "Process")
            .map(|process| self.process(process))
            .collect::<Result<_>>()?;

        Ok(ServiceInformation {
            participant,
            document_type,
            processes,
        })
    }

    fn process(&self, node: Node) -> Result<ProcessRecord> {
        let process = self.identifier(
            required_child(node, "ProcessIdentifier")?,
            IdentifierKind::Process,
        )?;

        let endpoints = children(required_child(node, "ServiceEndpointList")?, "Endpoint")
            .map(endpoint)
            .collect::<Result<_>>()?;

        Ok(ProcessRecord { process, endpoints })
    }

    fn reference(&self, node: Node) -> Result<ServiceMetadataReference> {
        let href = node
            .attribute("href")
            .ok_or_else(|| malformed("ServiceMetadataReference without href"))?;

        let document_type = href
            .rsplit_once("/services/")
            .and_then(|(_, encoded)| {
                self.factory
                    .parse_percent_encoded(IdentifierKind::DocumentType, encoded)
                    .ok()
            });

        if document_type.is_none() {
            tracing::debug!(%href, "no document type in ServiceMetadataReference");
        }

        Ok(ServiceMetadataReference {
            href: href.to_owned(),
            document_type,
        })
    }
}

impl ServiceMetadataReader for XmlServiceMetadataReader {
    fn read_service_group(&self, xml: &str) -> Result<ServiceGroup> {
        let document = parse_document(xml)?;
        let root = document.root_element();
        ensure_root(root, &["ServiceGroup"])?;

        let participant = self.identifier(
            required_child(root, "ParticipantIdentifier")?,
            IdentifierKind::Participant,
        )?;

        let references = children(
            required_child(root, "ServiceMetadataReferenceCollection")?,
            "ServiceMetadataReference",
        )
        .map(|reference| self.reference(reference))
        .collect::<Result<_>>()?;

        Ok(ServiceGroup {
            participant,
            references,
        })
    }

    fn read_service_metadata(&self, xml: &str) -> Result<SignedServiceMetadata> {
        let document = parse_document(xml)?;
        let root = document.root_element();
        ensure_root(root, &["SignedServiceMetadata", "ServiceMetadata"])?;

        let metadata = if root.tag_name().name() == "ServiceMetadata" {
            root
        } else {
            required_child(root, "ServiceMetadata")?
        };

        let content = match child(metadata, "Redirect") {
            Some(node) => ServiceMetadataContent::Redirect(redirect(node)?),
            None => ServiceMetadataContent::ServiceInformation(
                self.service_information(required_child(metadata, "ServiceInformation")?)?,
            ),
        };

        Ok(SignedServiceMetadata {
            content,
            signer_certificate: signer_certificate(root)?,
        })
    }
}

fn parse_document(xml: &str) -> Result<Document> {
    Document::parse(xml)
        .foreign_err(|| DiscoveryError::MalformedResponse("invalid XML".to_owned()))
}

fn ensure_root(root: Node, names: &[&str]) -> Result<()> {
    let namespace = root.tag_name().namespace().unwrap_or_default();
    if namespace != PEPPOL_SMP_NAMESPACE && namespace != BDXR_SMP_NAMESPACE {
        return Err(malformed(format!("unknown namespace `{namespace}`")));
    }

    let name = root.tag_name().name();
    if !names.contains(&name) {
        return Err(malformed(format!("unexpected root element `{name}`")));
    }

    Ok(())
}

fn redirect(node: Node) -> Result<Redirect> {
    let href = node
        .attribute("href")
        .ok_or_else(|| malformed("Redirect without href"))?;
    let certificate_uid = child(node, "CertificateUID")
        .and_then(|uid| uid.text())
        .unwrap_or_default();

    Ok(Redirect {
        href: href.trim().to_owned(),
        certificate_uid: certificate_uid.to_owned(),
    })
}

fn endpoint(node: Node) -> Result<EndpointRecord> {
    let transport_profile = node
        .attribute("transportProfile")
        .ok_or_else(|| malformed("Endpoint without transportProfile"))?;

    // Peppol SMP 1.0 uses WS-Addressing, BDXR a plain element.
    let address = child(node, "EndpointReference")
        .and_then(|reference| child(reference, "Address"))
        .or_else(|| child(node, "EndpointURI"))
        .and_then(text)
        .ok_or_else(|| malformed("Endpoint without address"))?;

    let certificate = child(node, "Certificate")
        .and_then(text)
        .ok_or_else(|| malformed("Endpoint without certificate"))?;

    let requires_business_level_signature = match optional_text(node, "RequireBusinessLevelSignature")
    {
        None | Some("false" | "0") => false,
        Some("true" | "1") => true,
        Some(other) => return Err(malformed(format!("invalid boolean `{other}`"))),
    };

    Ok(EndpointRecord {
        transport_profile: transport_profile.to_owned(),
        address: address.to_owned(),
        certificate: certificate.to_owned(),
        requires_business_level_signature,
        minimum_authentication_level: optional_text(node, "MinimumAuthenticationLevel")
            .map(str::to_owned),
        activation_date: optional_text(node, "ServiceActivationDate")
            .map(parse_date)
            .transpose()?,
        expiration_date: optional_text(node, "ServiceExpirationDate")
            .map(parse_date)
            .transpose()?,
        service_description: optional_text(node, "ServiceDescription").map(str::to_owned),
        technical_contact_url: optional_text(node, "TechnicalContactUrl").map(str::to_owned),
        technical_information_url: optional_text(node, "TechnicalInformationUrl")
            .map(str::to_owned),
    })
}

fn signer_certificate(root: Node) -> Result<Option<openssl::x509::X509>> {
    let certificate = children(root, "Signature")
        .flat_map(|signature| signature.descendants())
        .find(|node| node.is_element() && node.tag_name().name() == "X509Certificate")
        .and_then(text);

    certificate.map(parse_certificate).transpose()
}

/// Parses an `xs:dateTime` or `xs:date`, assuming UTC when the time zone is missing.
fn parse_date(text: &str) -> Result<DateTime<Utc>> {
    if let Ok(date_time) = DateTime::parse_from_rfc3339(text) {
        return Ok(date_time.with_timezone(&Utc));
    }
    if let Ok(date_time) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(date_time.and_utc());
    }

    let date = text.strip_suffix('Z').unwrap_or(text);
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|date_time| date_time.and_utc())
        .ok_or_else(|| malformed(format!("invalid date `{text}`")))
}

fn child<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    node.children()
        .find(|child| child.is_element() && child.tag_name().name() == name)
}

fn children<'a, 'input>(
    node: Node<'a, 'input>,
    name: &'static str,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children()
        .filter(move |child| child.is_element() && child.tag_name().name() == name)
}

fn required_child<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Result<Node<'a, 'input>> {
    child(node, name).ok_or_else(|| {
        malformed(format!(
            "missing `{name}` in `{}`",
            node.tag_name().name()
        ))
    })
}

fn text<'a>(node: Node<'a, '_>) -> Option<&'a str> {
    node.text().map(str::trim).filter(|text| !text.is_empty())
}

fn optional_text<'a>(node: Node<'a, '_>, name: &str) -> Option<&'a str> {
    child(node, name).and_then(text)
}
