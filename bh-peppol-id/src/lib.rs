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

//! This crate provides the identifier model of the Peppol e-delivery network.
//!
//! Peppol names three things with `scheme::value` pairs: participants (e.g.
//! `iso6523-actorid-upis::0088:123456`), document types and processes.  All three are modelled
//! with the single immutable [`Identifier`] type, tagged with an [`IdentifierKind`].
//!
//! # Details
//!
//! Identifiers can only be constructed through an [`IdentifierFactory`], which validates the
//! syntax rules of the identifier kind and rejects invalid input immediately.  The factory is
//! configured with an [`IdentifierPolicy`], which holds
//!
//! * the [`CaseSensitivityRules`] table, deciding which schemes have case-insensitive values, and
//! * the switches for the charset and scheme length checks.
//!
//! Values of case-insensitive schemes are lower-cased for comparison and hashing only.  The value
//! supplied by the caller is kept verbatim and used whenever the identifier is serialized.
//!
//! # Examples
//!
//! ```
//! use bh_peppol_id::{IdentifierFactory, IdentifierKind};
//!
//! let factory = IdentifierFactory::default();
//!
//! let upper = factory
//!     .parse(IdentifierKind::Participant, "iso6523-actorid-upis::0088:ABC")
//!     .unwrap();
//! let lower = factory
//!     .create(IdentifierKind::Participant, "iso6523-actorid-upis", "0088:abc")
//!     .unwrap();
//!
//! // The default participant scheme is case-insensitive...
//! assert!(upper.has_same_content(&lower));
//! // ...but the original casing is preserved.
//! assert_eq!(upper.to_uri_encoded(), "iso6523-actorid-upis::0088:ABC");
//! assert_eq!(
//!     upper.to_uri_percent_encoded(),
//!     "iso6523-actorid-upis%3A%3A0088%3AABC"
//! );
//! ```

mod error;
mod factory;
mod identifier;
mod percent;
mod policy;

pub use error::{IdentifierError, Result};
pub use factory::IdentifierFactory;
pub use identifier::{
    Charset, Identifier, IdentifierKind, SCHEME_MAX_LENGTH, URI_SCHEME_VALUE_SEPARATOR,
};
pub use policy::{
    CaseSensitivity, CaseSensitivityRules, IdentifierPolicy, DEFAULT_DOCUMENT_TYPE_SCHEME,
    DEFAULT_PARTICIPANT_SCHEME, DEFAULT_PROCESS_SCHEME, WILDCARD_DOCUMENT_TYPE_SCHEME,
};
