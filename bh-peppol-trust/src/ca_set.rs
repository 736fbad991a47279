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
use openssl::{pkcs12::Pkcs12, x509::X509};

use crate::{Result, TrustError};

/// A named, non-empty collection of trusted CA certificates.
///
/// Typical sets are the Peppol access point CAs or SMP CAs of one network stage.
#[derive(Clone, Debug)]
pub struct TrustedCaSet {
    name: String,
    certificates: Vec<X509>,
}

impl TrustedCaSet {
    /// Creates a new [`TrustedCaSet`].
    ///
    /// Fails if `certificates` is empty.
    pub fn new(name: impl Into<String>, certificates: Vec<X509>) -> Result<Self> {
        let name = name.into();

        if certificates.is_empty() {
            return Err(bherror::Error::root(TrustError::CaSetLoading(name))
                .ctx("no CA certificates supplied"));
        }

        tracing::debug!(ca_set = %name, count = certificates.len(), "trusted CA set loaded");

        Ok(Self { name, certificates })
    }

    /// Loads the CA certificates from a concatenation of PEM encoded certificates.
    pub fn from_pem_bundle(name: impl Into<String>, pem: &[u8]) -> Result<Self> {
        let name = name.into();

        let certificates = X509::stack_from_pem(pem)
            .foreign_err(|| TrustError::CaSetLoading(name.clone()))
            .ctx(|| "invalid PEM bundle")?;

        Self::new(name, certificates)
    }

    /// Loads the CA certificates from a DER encoded PKCS#12 key store.
    ///
    /// Both the main certificate and the additional CA certificates of the store are trusted; a
    /// private key, if present, is ignored.
    pub fn from_pkcs12(name: impl Into<String>, der: &[u8], password: &str) -> Result<Self> {
        let name = name.into();

        let parsed = Pkcs12::from_der(der)
            .and_then(|pkcs12| pkcs12.parse2(password))
            .foreign_err(|| TrustError::CaSetLoading(name.clone()))
            .ctx(|| "invalid PKCS#12 key store or password")?;

        let mut certificates: Vec<X509> = parsed.cert.into_iter().collect();
        certificates.extend(parsed.ca.into_iter().flatten());

        Self::new(name, certificates)
    }

    /// The name of the set.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The trusted CA certificates.
    pub fn certificates(&self) -> &[X509] {
        &self.certificates
    }
}
