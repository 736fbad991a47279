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

use bh_peppol_id::{Identifier, IdentifierKind};
use bherror::traits::{ErrorContext as _, ForeignError as _};
use data_encoding::BASE32_NOPAD;
use openssl::hash::{hash, MessageDigest};

use crate::{Result, SmlError, SmlZone};

/// Prefix of the hashed participant value in the classic SML scheme.
pub const CLASSIC_HASH_PREFIX: &str = "B-";

/// Participant value used for wildcard registrations; it is never hashed.
pub const WILDCARD_VALUE: &str = "*";

/// Derives the DNS name of a participant in the classic SML scheme.
///
/// The name is `B-<hex(md5(value))>.<scheme>.<zone>` without the trailing dot, where the value is
/// normalized according to the case rule of its scheme and the scheme is lower-cased.  The wildcard
/// value `*` is used verbatim instead of the hash.
///
/// MD5 here is only a lookup key mandated by the deployed SML infrastructure.
pub fn classic_hostname(participant: &Identifier, zone: &SmlZone) -> Result<String> {
    ensure_participant(participant)?;

    let value = participant.normalized_value();
    let label = if value == WILDCARD_VALUE {
        WILDCARD_VALUE.to_owned()
    } else {
        let digest = hash(MessageDigest::md5(), value.as_bytes())
            .foreign_err(|| SmlError::Hashing)
            .ctx(|| "MD5")?;
        format!("{CLASSIC_HASH_PREFIX}{}", hex::encode(digest))
    };

    Ok(assemble(&label, participant.scheme(), zone))
}

/// Derives the DNS name of a participant in the BDXL scheme, used for `NAPTR` lookups.
///
/// The name is `<base32(sha256(value))>.<scheme>.<zone>` without the trailing dot, where the
/// base32 padding is stripped, the value is normalized according to the case rule of its scheme
/// and the scheme is lower-cased.
pub fn bdxl_hostname(participant: &Identifier, zone: &SmlZone) -> Result<String> {
    ensure_participant(participant)?;

    let digest = hash(
        MessageDigest::sha256(),
        participant.normalized_value().as_bytes(),
    )
    .foreign_err(|| SmlError::Hashing)
    .ctx(|| "SHA-256")?;

    Ok(assemble(
        &BASE32_NOPAD.encode(&digest),
        participant.scheme(),
        zone,
    ))
}

fn ensure_participant(identifier: &Identifier) -> Result<()> {
    if identifier.kind() != IdentifierKind::Participant {
        return Err(bherror::Error::root(SmlError::NotAParticipant(
            identifier.kind(),
        )));
    }
    Ok(())
}

fn assemble(label: &str, scheme: &str, zone: &SmlZone) -> String {
    let mut hostname = format!("{label}.{}.{}", scheme.to_lowercase(), zone.dns_zone());

    // exactly one
    if hostname.ends_with('.') {
        hostname.pop();
    }

    hostname
}
