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

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! This crate discovers the endpoint of a Peppol participant by querying its Service Metadata
//! Publisher (SMP).
//!
//! # Details
//!
//! The [`SmpClient`] locates the SMP of a participant with a
//! [`SmpUrlProvider`][bh_peppol_sml::SmpUrlProvider], fetches the ServiceGroup or ServiceMetadata
//! document and decodes it with a [`ServiceMetadataReader`].  Both the Peppol SMP 1.0 and the
//! OASIS BDXR SMP 1.0 document formats are understood by the [`XmlServiceMetadataReader`].
//!
//! [`SmpClient::resolve_endpoint`] selects the endpoint matching a process and a transport profile
//! and only returns it when its certificate is accepted by a
//! [`TrustedCaChecker`][bh_peppol_trust::TrustedCaChecker].  A ServiceMetadata redirect is
//! followed once, after checking that the target document is signed by the announced
//! certificate.
//!
//! The XML signatures of the SMP documents are not verified; the signer certificate is only
//! extracted for the redirect check.
//!
//! # Examples
//!
//! ```no_run
//! # async fn run() {
//! use bh_peppol_id::IdentifierFactory;
//! use bh_peppol_sml::ClassicDnsProvider;
//! use bh_peppol_smp::{SmpClient, SmpClientConfig};
//! use bh_peppol_trust::{TrustedCaChecker, TrustedCaSet};
//!
//! let factory = IdentifierFactory::default();
//! let participant = factory.peppol_participant("0088:5798000000001").unwrap();
//! let document_type = factory
//!     .peppol_document_type("urn:oasis:names:specification:ubl:schema:xsd:Invoice-2::Invoice##urn:cen.eu:en16931:2017#compliant#urn:fdc:peppol.eu:2017:poacc:billing:3.0::2.1")
//!     .unwrap();
//! let process = factory
//!     .peppol_process("urn:fdc:peppol.eu:2017:poacc:billing:01:1.0")
//!     .unwrap();
//!
//! let bundle = std::fs::read("peppol-ap-cas.pem").unwrap();
//! let checker =
//!     TrustedCaChecker::without_revocation(TrustedCaSet::from_pem_bundle("AP", &bundle).unwrap());
//!
//! let client = SmpClient::new(SmpClientConfig::default(), ClassicDnsProvider);
//! let endpoint = client
//!     .resolve_endpoint(
//!         &participant,
//!         &document_type,
//!         &process,
//!         "peppol-transport-as4-v2_0",
//!         &checker,
//!     )
//!     .await
//!     .unwrap();
//!
//! println!("deliver to {}", endpoint.address);
//! # }
//! ```

mod certificate;
mod client;
mod endpoint;
mod error;
mod http;
mod model;
mod reader;

#[cfg(test)]
mod fixtures;

pub use client::{SmpClient, SmpClientConfig};
pub use endpoint::ResolvedEndpoint;
pub use error::{DiscoveryError, Result};
pub use http::{HttpGetClient, ReqwestGetClient};
pub use model::{
    EndpointRecord, ProcessRecord, Redirect, ServiceGroup, ServiceInformation,
    ServiceMetadataContent, ServiceMetadataReference, SignedServiceMetadata,
};
pub use reader::{
    ServiceMetadataReader, XmlServiceMetadataReader, BDXR_SMP_NAMESPACE, PEPPOL_SMP_NAMESPACE,
};
