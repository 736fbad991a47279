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

use bh_peppol_id::IdentifierKind;

/// Error type returned by the crate API.
#[derive(strum_macros::Display, Debug, PartialEq, Clone)]
pub enum SmlError {
    /// The SML zone configuration is invalid.
    #[strum(to_string = "Invalid SML zone: {0}")]
    InvalidZone(String),

    /// Only participant identifiers can be located, but a different kind was supplied.
    #[strum(to_string = "Expected a participant identifier, got a {0} identifier")]
    NotAParticipant(IdentifierKind),

    /// Hashing the participant identifier failed.
    #[strum(to_string = "Unable to hash the participant identifier")]
    Hashing,

    /// The `NAPTR` lookup of the given domain failed.
    #[strum(to_string = "NAPTR lookup of {0} failed")]
    NaptrLookup(String),

    /// The given domain has no usable SMP `NAPTR` record.
    #[strum(to_string = "No SMP NAPTR record found for {0}")]
    NoSmpRecord(String),

    /// The SMP URL derived for a participant is not a valid URL.
    #[strum(to_string = "Invalid SMP URL: {0}")]
    InvalidSmpUrl(String),
}

impl bherror::BhError for SmlError {}

/// The [`bherror::Result`] type with the error type of [`SmlError`], used throughout this crate.
pub type Result<T> = bherror::Result<T, SmlError>;
