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

use crate::IdentifierKind;

/// Error type returned when constructing an [`Identifier`][crate::Identifier].
#[derive(strum_macros::Display, Debug, PartialEq, Clone)]
pub enum IdentifierError {
    /// The scheme, the value or the combined URI form violates the syntax rules of the identifier
    /// kind.
    #[strum(to_string = "Invalid {0} identifier format: {1}")]
    InvalidFormat(IdentifierKind, String),
}

impl bherror::BhError for IdentifierError {}

impl IdentifierError {
    pub(crate) fn invalid(kind: IdentifierKind, reason: impl Into<String>) -> Self {
        Self::InvalidFormat(kind, reason.into())
    }
}

/// The [`bherror::Result`] type with the error type of [`IdentifierError`], used throughout this
/// crate.
pub type Result<T> = bherror::Result<T, IdentifierError>;
