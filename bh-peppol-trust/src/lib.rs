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

//! This crate checks X.509 certificates of Peppol access points and SMPs against a set of trusted
//! CA certificates.
//!
//! # Details
//!
//! A [`TrustedCaSet`] is a named, non-empty list of CA certificates, loaded either directly, from
//! a PEM bundle or from a PKCS#12 key store.  The [`TrustedCaChecker`] uses one such set to decide
//! whether a certificate is trusted, see [`TrustedCaChecker::check_certificate`].
//!
//! Revocation is checked through the [`RevocationChecker`] trait, to be implemented with OCSP or
//! CRL support by the application.  [`NoRevocationCheck`] disables the revocation check.  Results
//! are cached per serial number by the checker until the cache is cleared explicitly.
//!
//! # Examples
//!
//! ```no_run
//! # async fn run() {
//! use bh_peppol_trust::{TrustedCaChecker, TrustedCaSet};
//!
//! let bundle = std::fs::read("peppol-ap-cas.pem").expect("read CA bundle");
//! let ca_set = TrustedCaSet::from_pem_bundle("Peppol AP production", &bundle)
//!     .expect("valid CA bundle");
//!
//! let checker = TrustedCaChecker::without_revocation(ca_set);
//!
//! let certificate = std::fs::read("endpoint.pem").expect("read endpoint certificate");
//! let certificate =
//!     openssl::x509::X509::from_pem(&certificate).expect("valid endpoint certificate");
//!
//! assert!(checker.is_trusted(&certificate).await.expect("trust decision"));
//! # }
//! ```

mod ca_set;
mod checker;
mod error;
mod revocation;

#[cfg(any(feature = "test-utils", test))]
pub mod test_utils;

pub use ca_set::TrustedCaSet;
pub use checker::{CertificateCheckResult, TrustedCaChecker};
pub use error::{Result, TrustError};
pub use revocation::{NoRevocationCheck, RevocationChecker, RevocationStatus};
