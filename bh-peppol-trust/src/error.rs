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

/// Error type returned by the crate API.
#[derive(strum_macros::Display, Debug, PartialEq, Clone)]
pub enum TrustError {
    /// The certificate could not be parsed or inspected.
    #[strum(to_string = "Invalid certificate")]
    InvalidCertificate,

    /// The trusted CA set with the given name could not be loaded.
    #[strum(to_string = "Unable to load the trusted CA set {0}")]
    CaSetLoading(String),

    /// The revocation status of the certificate with the given serial number could not be
    /// determined.
    #[strum(to_string = "Revocation check of certificate {0} is unavailable")]
    RevocationCheckUnavailable(String),

    /// An unexpected OpenSSL failure.
    #[strum(to_string = "OpenSSL failure")]
    Openssl,
}

impl bherror::BhError for TrustError {}

/// The [`bherror::Result`] type with the error type of [`TrustError`], used throughout this crate.
pub type Result<T> = bherror::Result<T, TrustError>;
