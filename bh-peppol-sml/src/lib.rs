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

//! This crate locates the Service Metadata Publisher (SMP) of a Peppol participant.
//!
//! Every Peppol network stage runs a Service Metadata Locator (SML), a DNS zone in which each
//! registered participant has an entry pointing to its SMP.  The stages are modelled with
//! [`SmlZone`], and the well-known ones are enumerated by [`PeppolNetwork`].
//!
//! # Details
//!
//! Two naming schemes are in use:
//!
//! * the classic scheme, [`classic_hostname`], where the participant's DNS name is
//!   `B-<md5-hex>.<scheme>.<zone>` and a CNAME/A record leads to the SMP host, and
//! * the BDXL scheme, [`bdxl_hostname`], where the name is `<base32-sha256>.<scheme>.<zone>` and
//!   a `NAPTR` record carries the SMP URL.
//!
//! Both name derivations are pure functions.  Turning a participant into an SMP base URL is
//! abstracted with the [`SmpUrlProvider`] trait, implemented by
//!
//! * [`ClassicDnsProvider`], using the classic scheme,
//! * [`NaptrProvider`], using the BDXL scheme and an injected [`NaptrLookup`] DNS primitive, and
//! * [`ExplicitSmpProvider`], skipping the SML altogether.
//!
//! # Examples
//!
//! ```
//! use bh_peppol_id::IdentifierFactory;
//! use bh_peppol_sml::{classic_hostname, SmlZone};
//!
//! let participant = IdentifierFactory::default()
//!     .peppol_participant("0088:976098897")
//!     .unwrap();
//! let zone = SmlZone::new(
//!     "legacy",
//!     "sml.peppolcentral.org.",
//!     "https://sml.peppolcentral.org",
//!     true,
//! )
//! .unwrap();
//!
//! assert_eq!(
//!     classic_hostname(&participant, &zone).unwrap(),
//!     "B-a4f72dd40b6353684ada99e1cde11925.iso6523-actorid-upis.sml.peppolcentral.org"
//! );
//! ```

mod error;
mod hostname;
mod naptr;
mod provider;
mod zone;

pub use error::{Result, SmlError};
pub use hostname::{bdxl_hostname, classic_hostname, CLASSIC_HASH_PREFIX, WILDCARD_VALUE};
pub use naptr::{NaptrLookup, NaptrRecord, SMP_NAPTR_SERVICE};
pub use provider::{ClassicDnsProvider, ExplicitSmpProvider, NaptrProvider, SmpUrlProvider};
pub use reqwest::Url;
pub use zone::{PeppolNetwork, SmlZone};
