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
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::{IdentifierError, IdentifierKind, Result};

/// Everything except the RFC 3986 unreserved characters.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

pub(crate) fn percent_encode(input: &str) -> String {
    utf8_percent_encode(input, URI_COMPONENT).to_string()
}

/// Decodes `input`, rejecting escapes that are not followed by two hex digits as well as escapes
/// that decode to invalid UTF-8.
pub(crate) fn percent_decode(kind: IdentifierKind, input: &str) -> Result<String> {
    let bytes = input.as_bytes();

    for (i, byte) in bytes.iter().enumerate() {
        if *byte != b'%' {
            continue;
        }

        let is_well_formed = bytes
            .get(i + 1..i + 3)
            .is_some_and(|hex| hex.iter().all(u8::is_ascii_hexdigit));

        if !is_well_formed {
            return Err(bherror::Error::root(IdentifierError::invalid(
                kind,
                format!("malformed percent escape at position {i}"),
            )));
        }
    }

    let decoded = percent_decode_str(input)
        .decode_utf8()
        .foreign_err(|| IdentifierError::invalid(kind, "percent-decoded value is not UTF-8"))
        .ctx(|| input.to_owned())?;

    Ok(decoded.into_owned())
}
