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

//! SMP documents used by the tests.

use openssl::{base64, x509::X509Ref};

pub(crate) const PARTICIPANT: &str = "0088:5798000000001";
pub(crate) const DOCUMENT_TYPE: &str = "urn:oasis:names:specification:ubl:schema:xsd:Invoice-2::Invoice##urn:cen.eu:en16931:2017#compliant#urn:fdc:peppol.eu:2017:poacc:billing:3.0::2.1";
pub(crate) const PROCESS: &str = "urn:fdc:peppol.eu:2017:poacc:billing:01:1.0";
pub(crate) const AS4: &str = "peppol-transport-as4-v2_0";
pub(crate) const ADDRESS: &str = "https://ap.example.com/as4";

pub(crate) fn base64_der(certificate: &X509Ref) -> String {
    base64::encode_block(&certificate.to_der().unwrap())
}

fn signature(signer: Option<&X509Ref>) -> String {
    let Some(signer) = signer else {
        return String::new();
    };

    format!(
        r#"<Signature xmlns="http://www.w3.org/2000/09/xmldsig#">
    <SignedInfo/>
    <SignatureValue>AAAA</SignatureValue>
    <KeyInfo>
      <X509Data>
        <X509SubjectName>CN=leaf</X509SubjectName>
        <X509Certificate>{}</X509Certificate>
      </X509Data>
    </KeyInfo>
  </Signature>"#,
        base64_der(signer)
    )
}

/// A Peppol SMP 1.0 ServiceMetadata document with one process and one endpoint.
pub(crate) fn service_information(
    process: &str,
    transport_profile: &str,
    certificate: &X509Ref,
    signer: Option<&X509Ref>,
) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<SignedServiceMetadata xmlns="http://busdox.org/serviceMetadata/publishing/1.0/"
    xmlns:ids="http://busdox.org/transport/identifiers/1.0/"
    xmlns:wsa="http://www.w3.org/2005/08/addressing">
  <ServiceMetadata>
    <ServiceInformation>
      <ids:ParticipantIdentifier scheme="iso6523-actorid-upis">{PARTICIPANT}</ids:ParticipantIdentifier>
      <ids:DocumentIdentifier scheme="busdox-docid-qns">{DOCUMENT_TYPE}</ids:DocumentIdentifier>
      <ProcessList>
        <Process>
          <ids:ProcessIdentifier scheme="cenbii-procid-ubl">{process}</ids:ProcessIdentifier>
          <ServiceEndpointList>
            <Endpoint transportProfile="{transport_profile}">
              <wsa:EndpointReference>
                <wsa:Address>{ADDRESS}</wsa:Address>
              </wsa:EndpointReference>
              <RequireBusinessLevelSignature>false</RequireBusinessLevelSignature>
              <ServiceActivationDate>2024-01-01T00:00:00Z</ServiceActivationDate>
              <ServiceExpirationDate>2099-12-31T23:59:59Z</ServiceExpirationDate>
              <Certificate>{}</Certificate>
              <ServiceDescription>Test access point</ServiceDescription>
              <TechnicalContactUrl>mailto:support@example.com</TechnicalContactUrl>
            </Endpoint>
          </ServiceEndpointList>
        </Process>
      </ProcessList>
    </ServiceInformation>
  </ServiceMetadata>
  {}
</SignedServiceMetadata>"#,
        base64_der(certificate),
        signature(signer),
    )
}

/// A Peppol SMP 1.0 ServiceMetadata document redirecting to `href`.
pub(crate) fn redirect(href: &str, certificate_uid: &str, signer: Option<&X509Ref>) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<SignedServiceMetadata xmlns="http://busdox.org/serviceMetadata/publishing/1.0/">
  <ServiceMetadata>
    <Redirect href="{href}">
      <CertificateUID>{certificate_uid}</CertificateUID>
    </Redirect>
  </ServiceMetadata>
  {}
</SignedServiceMetadata>"#,
        signature(signer),
    )
}

/// A Peppol SMP 1.0 ServiceGroup document referencing the given percent-encoded document types.
pub(crate) fn service_group(base_url: &str, encoded_document_types: &[&str]) -> String {
    let references: String = encoded_document_types
        .iter()
        .map(|document_type| {
            format!(
                r#"<ServiceMetadataReference href="{base_url}/iso6523-actorid-upis%3A%3A{PARTICIPANT}/services/{document_type}"/>"#
            )
        })
        .collect();

    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<ServiceGroup xmlns="http://busdox.org/serviceMetadata/publishing/1.0/"
    xmlns:ids="http://busdox.org/transport/identifiers/1.0/">
  <ids:ParticipantIdentifier scheme="iso6523-actorid-upis">{PARTICIPANT}</ids:ParticipantIdentifier>
  <ServiceMetadataReferenceCollection>{references}</ServiceMetadataReferenceCollection>
</ServiceGroup>"#
    )
}
