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
pub enum DiscoveryError {
    /// The SMP of the participant could not be located, or its URL could not be built.
    #[strum(to_string = "Unable to locate the SMP")]
    SmpLocation,

    /// The SMP could not be reached at the given URL: DNS or connection failure, timeout, or an
    /// unexpected HTTP status.
    #[strum(to_string = "SMP transport failure for {0}")]
    Transport(String),

    /// The SMP response does not conform to the SMP schema.
    #[strum(to_string = "Malformed SMP response: {0}")]
    MalformedResponse(String),

    /// The SMP redirected more than once.
    #[strum(to_string = "Too many SMP redirects")]
    TooManyRedirects,

    /// The signer certificate of the redirect target does not match the advertised certificate
    /// UID.
    #[strum(to_string = "Redirect target certificate does not match {0}")]
    RedirectCertificateMismatch(String),

    /// No endpoint matches the queried participant, document type, process and transport
    /// profile.
    #[strum(to_string = "Endpoint not found")]
    EndpointNotFound,

    /// The endpoint certificate is not accepted by the trusted CA checker.
    #[strum(to_string = "Untrusted endpoint certificate")]
    UntrustedEndpoint,

    /// The revocation status of the endpoint certificate could not be determined.
    #[strum(to_string = "Revocation check of the endpoint certificate is unavailable")]
    RevocationCheckUnavailable,
}

impl bherror::BhError for DiscoveryError {}

/// The [`bherror::Result`] type with the error type of [`DiscoveryError`], used throughout this
/// crate.
pub type Result<T> = bherror::Result<T, DiscoveryError>;

pub(crate) fn malformed(what: impl Into<String>) -> bherror::Error<DiscoveryError> {
    bherror::Error::root(DiscoveryError::MalformedResponse(what.into()))
}
