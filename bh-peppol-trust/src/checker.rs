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

use std::cmp::Ordering;

use bherror::traits::{ErrorContext as _, ForeignError as _};
use chrono::{DateTime, Utc};
use openssl::{
    asn1::Asn1Time,
    error::ErrorStack,
    x509::{X509Ref, X509VerifyResult},
};

use crate::{
    revocation::RevocationCache, NoRevocationCheck, Result, RevocationChecker, RevocationStatus,
    TrustError, TrustedCaSet,
};

/// Outcome of [`TrustedCaChecker::check_certificate`].
#[derive(strum_macros::Display, Clone, Copy, Debug, PartialEq, Eq)]
pub enum CertificateCheckResult {
    /// The certificate is trusted.
    #[strum(to_string = "valid")]
    Valid,
    /// The validity period of the certificate has not started yet.
    #[strum(to_string = "not yet valid")]
    NotYetValid,
    /// The validity period of the certificate is over.
    #[strum(to_string = "expired")]
    Expired,
    /// The certificate was not issued by any CA of the trusted set.
    #[strum(to_string = "untrusted issuer")]
    UntrustedIssuer,
    /// The certificate has been revoked.
    #[strum(to_string = "revoked")]
    Revoked,
}

impl CertificateCheckResult {
    /// Whether the certificate is trusted.
    pub fn is_valid(self) -> bool {
        self == Self::Valid
    }
}

/// Checks certificates against a [`TrustedCaSet`], caching the revocation results.
///
/// A certificate is trusted when
///
/// * its issuer name equals the subject name of one of the trusted CAs, whose public key verifies
///   the certificate signature,
/// * its validity period covers the instant of the check, and
/// * it is not revoked according to the [`RevocationChecker`].
///
/// The revocation cache is owned by the checker instance and lives until
/// [`clear_revocation_cache`](Self::clear_revocation_cache) is called.
#[derive(Debug)]
pub struct TrustedCaChecker<R = NoRevocationCheck> {
    ca_set: TrustedCaSet,
    revocation_checker: R,
    revocation_cache: RevocationCache,
}

impl TrustedCaChecker {
    /// Creates a checker that does not check revocation.
    pub fn without_revocation(ca_set: TrustedCaSet) -> Self {
        Self::new(ca_set, NoRevocationCheck)
    }
}

impl<R: RevocationChecker> TrustedCaChecker<R> {
    /// Creates a new [`TrustedCaChecker`] with an empty revocation cache.
    pub fn new(ca_set: TrustedCaSet, revocation_checker: R) -> Self {
        Self {
            ca_set,
            revocation_checker,
            revocation_cache: RevocationCache::default(),
        }
    }

    /// The trusted CA set.
    pub fn ca_set(&self) -> &TrustedCaSet {
        &self.ca_set
    }

    /// Returns whether `certificate` is trusted right now.
    ///
    /// An unavailable revocation check is returned as an error, never as `false`.
    pub async fn is_trusted(&self, certificate: &X509Ref) -> Result<bool> {
        let result = self.check_certificate(certificate, Utc::now()).await?;
        Ok(result.is_valid())
    }

    /// Checks `certificate` at the instant `at`.
    ///
    /// The revocation status is only queried for certificates that pass the issuer and validity
    /// checks.
    pub async fn check_certificate(
        &self,
        certificate: &X509Ref,
        at: DateTime<Utc>,
    ) -> Result<CertificateCheckResult> {
        if !self.has_trusted_issuer(certificate)? {
            tracing::debug!(ca_set = %self.ca_set.name(), "certificate issuer is not trusted");
            return Ok(CertificateCheckResult::UntrustedIssuer);
        }

        let validity = check_validity(certificate, at)?;
        if !validity.is_valid() {
            return Ok(validity);
        }

        if self.check_revocation(certificate).await?.is_revoked() {
            return Ok(CertificateCheckResult::Revoked);
        }

        Ok(CertificateCheckResult::Valid)
    }

    /// Returns the revocation status of `certificate`, querying the [`RevocationChecker`] on a
    /// cache miss.
    ///
    /// Concurrent checks of the same serial number query the revocation checker at most once.  A
    /// failed query is returned as [`TrustError::RevocationCheckUnavailable`] and nothing is
    /// cached.
    pub async fn check_revocation(&self, certificate: &X509Ref) -> Result<RevocationStatus> {
        self.revocation_cache
            .check(&self.revocation_checker, certificate)
            .await
    }

    /// Drops all cached revocation results.
    pub fn clear_revocation_cache(&self) {
        self.revocation_cache.clear();
    }

    /// The number of cached revocation results.
    pub fn cached_revocation_count(&self) -> usize {
        self.revocation_cache.len()
    }

    fn has_trusted_issuer(&self, certificate: &X509Ref) -> Result<bool> {
        for ca in self.ca_set.certificates() {
            if ca.issued(certificate) != X509VerifyResult::OK {
                continue;
            }

            let verified = clean_up_after_openssl(|| certificate.verify(ca.public_key()?.as_ref()))
                .foreign_err(|| TrustError::Openssl)
                .ctx(|| "signature verification failed unexpectedly")?;

            if verified {
                return Ok(true);
            }
        }

        Ok(false)
    }
}

fn check_validity(certificate: &X509Ref, at: DateTime<Utc>) -> Result<CertificateCheckResult> {
    let at = Asn1Time::from_unix(at.timestamp())
        .foreign_err(|| TrustError::Openssl)
        .ctx(|| "instant out of range")?;

    let starts = certificate
        .not_before()
        .compare(&at)
        .foreign_err(|| TrustError::InvalidCertificate)?;
    if starts == Ordering::Greater {
        return Ok(CertificateCheckResult::NotYetValid);
    }

    let ends = certificate
        .not_after()
        .compare(&at)
        .foreign_err(|| TrustError::InvalidCertificate)?;
    if ends == Ordering::Less {
        return Ok(CertificateCheckResult::Expired);
    }

    Ok(CertificateCheckResult::Valid)
}

/// Wrap a closure calling OpenSSL with low-level cleanup to make it safer in an async context.
///
/// Usage: wrap an `openssl` call in a closure and call this function with it.
fn clean_up_after_openssl<T>(
    f: impl FnOnce() -> std::result::Result<T, ErrorStack>,
) -> std::result::Result<T, ErrorStack> {
    let return_value = f()?;

    // A successful call may still leave entries on the thread-local error stack.
    drop(ErrorStack::get());

    Ok(return_value)
}
