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

use std::{
    collections::HashMap,
    convert::Infallible,
    future::Future,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};

use bherror::traits::{ErrorContext as _, ForeignError as _};
use chrono::{DateTime, Utc};
use openssl::x509::X509Ref;
use parking_lot::Mutex;
use tokio::sync::OnceCell;

use crate::{Result, TrustError};

/// Interface of the primitive querying the revocation status of a certificate, e.g. through OCSP
/// or a CRL.
pub trait RevocationChecker: Sync {
    /// Error type returned when the status cannot be determined.
    type Err: std::error::Error + Send + Sync + 'static;

    /// Returns whether `certificate` has been revoked.
    fn is_revoked(
        &self,
        certificate: &X509Ref,
    ) -> impl Future<Output = std::result::Result<bool, Self::Err>> + Send;
}

/// [`RevocationChecker`] reporting every certificate as not revoked, without any I/O.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoRevocationCheck;

impl RevocationChecker for NoRevocationCheck {
    type Err = Infallible;

    async fn is_revoked(&self, _certificate: &X509Ref) -> std::result::Result<bool, Infallible> {
        Ok(false)
    }
}

/// Outcome of a revocation check.
#[derive(strum_macros::Display, Clone, Copy, Debug, PartialEq, Eq)]
pub enum RevocationStatus {
    /// The status has just been queried.
    #[strum(to_string = "fresh (revoked: {revoked})")]
    Fresh {
        /// Whether the certificate is revoked.
        revoked: bool,
    },
    /// A cached status says the certificate is revoked.
    #[strum(to_string = "cached revoked")]
    CachedRevoked,
    /// A cached status says the certificate is not revoked.
    #[strum(to_string = "cached valid")]
    CachedValid,
}

impl RevocationStatus {
    /// Whether the certificate is revoked.
    pub fn is_revoked(self) -> bool {
        matches!(self, Self::Fresh { revoked: true } | Self::CachedRevoked)
    }
}

#[derive(Clone, Copy, Debug)]
struct CachedRevocation {
    checked_at: DateTime<Utc>,
    revoked: bool,
}

/// Revocation results keyed by the lower-case hex serial number of the certificate.
///
/// Every serial gets its own cell, so concurrent checks of the same certificate share one query.
#[derive(Debug, Default)]
pub(crate) struct RevocationCache {
    entries: Mutex<HashMap<String, Arc<OnceCell<CachedRevocation>>>>,
}

impl RevocationCache {
    pub(crate) async fn check<R: RevocationChecker>(
        &self,
        checker: &R,
        certificate: &X509Ref,
    ) -> Result<RevocationStatus> {
        let serial = serial_hex(certificate)?;

        let cell = {
            let mut entries = self.entries.lock();
            entries.entry(serial.clone()).or_default().clone()
        };

        let queried = AtomicBool::new(false);
        let result = cell
            .get_or_try_init(|| {
                let queried = &queried;
                let serial = &serial;
                async move {
                    queried.store(true, Ordering::Relaxed);

                    let revoked = checker
                        .is_revoked(certificate)
                        .await
                        .foreign_err(|| TrustError::RevocationCheckUnavailable(serial.clone()))?;

                    Ok::<_, bherror::Error<TrustError>>(CachedRevocation {
                        checked_at: Utc::now(),
                        revoked,
                    })
                }
            })
            .await;

        let entry = match result {
            Ok(entry) => entry,
            Err(error) => {
                self.discard_failed(&serial, &cell);
                return Err(error);
            }
        };

        let status = if queried.load(Ordering::Relaxed) {
            RevocationStatus::Fresh {
                revoked: entry.revoked,
            }
        } else if entry.revoked {
            RevocationStatus::CachedRevoked
        } else {
            RevocationStatus::CachedValid
        };

        tracing::debug!(%serial, %status, checked_at = %entry.checked_at, "revocation checked");

        Ok(status)
    }

    /// Drops the cell of `serial` unless it got initialized or another check still waits on it.
    fn discard_failed(&self, serial: &str, cell: &Arc<OnceCell<CachedRevocation>>) {
        let mut entries = self.entries.lock();

        let is_unused = entries.get(serial).is_some_and(|stored| {
            Arc::ptr_eq(stored, cell) && !stored.initialized() && Arc::strong_count(stored) == 2
        });
        if is_unused {
            entries.remove(serial);
        }
    }

    pub(crate) fn clear(&self) {
        self.entries.lock().clear();
    }

    pub(crate) fn len(&self) -> usize {
        self.entries
            .lock()
            .values()
            .filter(|cell| cell.initialized())
            .count()
    }
}

fn serial_hex(certificate: &X509Ref) -> Result<String> {
    let serial = certificate
        .serial_number()
        .to_bn()
        .and_then(|bn| bn.to_hex_str().map(|hex| hex.to_ascii_lowercase()))
        .foreign_err(|| TrustError::InvalidCertificate)
        .ctx(|| "unreadable serial number")?;

    Ok(serial)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::get_certs;

    #[test]
    fn test_serial_hex() {
        let [leaf, _, _] = get_certs();
        assert_eq!(
            serial_hex(&leaf).unwrap(),
            "699940b4979b710e9993d657895678f1d49a79e9"
        );
    }

    #[test]
    fn test_revocation_status_is_revoked() {
        assert!(RevocationStatus::Fresh { revoked: true }.is_revoked());
        assert!(RevocationStatus::CachedRevoked.is_revoked());
        assert!(!RevocationStatus::Fresh { revoked: false }.is_revoked());
        assert!(!RevocationStatus::CachedValid.is_revoked());
    }

    #[tokio::test]
    async fn test_no_revocation_check() {
        let [leaf, _, _] = get_certs();
        let cache = RevocationCache::default();

        let status = cache.check(&NoRevocationCheck, &leaf).await.unwrap();
        assert_eq!(status, RevocationStatus::Fresh { revoked: false });

        let status = cache.check(&NoRevocationCheck, &leaf).await.unwrap();
        assert_eq!(status, RevocationStatus::CachedValid);
        assert_eq!(cache.len(), 1);
    }

    #[derive(Debug)]
    struct ResponderDown;

    impl std::fmt::Display for ResponderDown {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "responder down")
        }
    }

    impl std::error::Error for ResponderDown {}

    struct FailingChecker;

    impl RevocationChecker for FailingChecker {
        type Err = ResponderDown;

        async fn is_revoked(
            &self,
            _certificate: &X509Ref,
        ) -> std::result::Result<bool, ResponderDown> {
            Err(ResponderDown)
        }
    }

    #[tokio::test]
    async fn test_failed_check_leaves_no_entry() {
        let [leaf, intermediary, root] = get_certs();
        let cache = RevocationCache::default();

        for certificate in [&leaf, &intermediary, &root] {
            let err = cache.check(&FailingChecker, certificate).await.unwrap_err();
            assert_eq!(
                err.error,
                TrustError::RevocationCheckUnavailable(serial_hex(certificate).unwrap())
            );
        }

        assert!(cache.entries.lock().is_empty());

        let status = cache.check(&NoRevocationCheck, &leaf).await.unwrap();
        assert_eq!(status, RevocationStatus::Fresh { revoked: false });
        assert_eq!(cache.entries.lock().len(), 1);
    }
}
