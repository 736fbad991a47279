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

use bh_peppol_id::Identifier;
use chrono::{DateTime, Utc};
use openssl::x509::X509;

/// The ServiceGroup document of a participant.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServiceGroup {
    /// The participant the group belongs to.
    pub participant: Identifier,
    /// The references to the ServiceMetadata documents, one per supported document type.
    pub references: Vec<ServiceMetadataReference>,
}

impl ServiceGroup {
    /// The document types of all references whose URL carried a readable identifier.
    pub fn document_types(&self) -> impl Iterator<Item = &Identifier> {
        self.references
            .iter()
            .filter_map(|reference| reference.document_type.as_ref())
    }
}

/// A reference from a [`ServiceGroup`] to a ServiceMetadata document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServiceMetadataReference {
    /// The URL of the ServiceMetadata document.
    pub href: String,
    /// The document type extracted from the last path segment of `href`.
    pub document_type: Option<Identifier>,
}

/// A ServiceMetadata document together with the certificate that signed it.
#[derive(Clone, Debug)]
pub struct SignedServiceMetadata {
    /// The content of the document.
    pub content: ServiceMetadataContent,
    /// The certificate embedded in the XML signature, if any.
    ///
    /// The certificate is extracted but the signature is not verified by the default reader.
    pub signer_certificate: Option<X509>,
}

/// The two shapes of a ServiceMetadata document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ServiceMetadataContent {
    /// The actual endpoint information.
    ServiceInformation(ServiceInformation),
    /// A pointer to another SMP.
    Redirect(Redirect),
}

/// An SMP redirect.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Redirect {
    /// The URL of the ServiceMetadata document at the other SMP.
    pub href: String,
    /// Identifies the certificate the other SMP signs its responses with.
    pub certificate_uid: String,
}

/// The endpoints of a participant for one document type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServiceInformation {
    /// The participant.
    pub participant: Identifier,
    /// The document type.
    pub document_type: Identifier,
    /// The processes the document type is supported in.
    pub processes: Vec<ProcessRecord>,
}

impl ServiceInformation {
    /// Finds the endpoint of `process` with exactly the `transport_profile`.
    ///
    /// Processes are compared with [`Identifier::has_same_content`], transport profiles
    /// case-sensitively.
    pub fn find_endpoint(
        &self,
        process: &Identifier,
        transport_profile: &str,
    ) -> Option<&EndpointRecord> {
        self.processes
            .iter()
            .filter(|record| record.process.has_same_content(process))
            .flat_map(|record| &record.endpoints)
            .find(|endpoint| endpoint.transport_profile == transport_profile)
    }
}

/// A process and its endpoints.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProcessRecord {
    /// The process.
    pub process: Identifier,
    /// The endpoints, one per transport profile.
    pub endpoints: Vec<EndpointRecord>,
}

/// A single endpoint as published by the SMP.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EndpointRecord {
    /// The transport profile, e.g. `peppol-transport-as4-v2_0`.
    pub transport_profile: String,
    /// The address messages are delivered to.
    pub address: String,
    /// The endpoint certificate, base64 DER or PEM.
    pub certificate: String,
    /// Whether the receiver requires a business level signature.
    pub requires_business_level_signature: bool,
    /// The minimum authentication level required by the receiver.
    pub minimum_authentication_level: Option<String>,
    /// The endpoint is not to be used before this instant.
    pub activation_date: Option<DateTime<Utc>>,
    /// The endpoint is not to be used after this instant.
    pub expiration_date: Option<DateTime<Utc>>,
    /// Human readable description of the service.
    pub service_description: Option<String>,
    /// Contact of the technical support.
    pub technical_contact_url: Option<String>,
    /// Further technical information.
    pub technical_information_url: Option<String>,
}
