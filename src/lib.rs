//! Map plain Rust records to and from LDAP directory entries.
//!
//! A record type describes its fields once, either with the [`record!`]
//! macro or by implementing [`Record`] by hand, and can then be encoded into
//! an [`Entry`] and decoded back without any field-by-field conversion code.
//! Entries convert to and from the [`ldap3`] types used to talk to a
//! directory server.
//!
//! Each field maps to the attribute named after it, with the first letter
//! lower-cased (or the whole name when it is two letters long). An
//! annotation changes that: its first comma separated token is the attribute
//! name, or `-` to leave the field out entirely. The following tokens may be
//! `omitempty`, which leaves the field out of encoded entries while it holds
//! its zero value, and `ro`, which marks a field the server maintains so it
//! is decoded but never encoded. Exactly one field must map to `dn`, the
//! distinguished name of the entry.
//!
//! # Getting started
//! ```
//! use ldap_record::record;
//!
//! #[derive(Debug, Default, PartialEq)]
//! struct User {
//!     dn: String,
//!     uid: String,
//!     display_name: Option<String>,
//!     groups: Vec<String>,
//!     logon_count: u32,
//! }
//!
//! record!(User {
//!     pub dn,
//!     pub uid,
//!     pub display_name = "displayName",
//!     pub groups = "memberOf,ro",
//!     pub logon_count = "logonCount,omitempty",
//! });
//!
//! let user = User {
//!     dn: "uid=jdoe,ou=people,dc=example,dc=org".to_owned(),
//!     uid: "jdoe".to_owned(),
//!     display_name: Some("Jane Doe".to_owned()),
//!     groups: vec!["admins".to_owned()],
//!     logon_count: 0,
//! };
//!
//! let entry = ldap_record::encode(&user)?;
//! assert_eq!(entry.dn, "uid=jdoe,ou=people,dc=example,dc=org");
//! assert_eq!(entry.attr_first("displayName"), Some("Jane Doe"));
//! assert_eq!(entry.attribute("memberOf"), None);
//! assert_eq!(entry.attribute("logonCount"), None);
//!
//! // The entry can be handed to `ldap3::Ldap::add`
//! let _attributes = entry.to_add_attributes();
//!
//! let mut decoded = User::default();
//! ldap_record::decode(&entry, &mut decoded)?;
//! assert_eq!(decoded, User { groups: Vec::new(), ..user });
//! # Ok::<(), ldap_record::Error>(())
//! ```
//!
//! # Limitations
//! * Floating point values are written with six fixed decimals and do not
//!   round-trip exactly.
//! * Timestamps are written with whole-second precision.
//! * Scalar fields decode the first value of an attribute and silently drop
//!   the others.
//! * Malformed timestamps decode to [`coerce::ZERO_TIME`] instead of failing.
//! * There is no schema validation; attribute names are not checked against
//!   the directory schema.

pub mod coerce;
pub mod config;
mod decoder;
mod encoder;
pub mod entry;
pub mod error;
mod macros;
pub mod shape;
pub mod tag;
pub mod value;

pub use ldap3::{self, SearchEntry};

pub use crate::{
	config::Config,
	decoder::{Decoder, DEFAULT_DECODER},
	encoder::{Encoder, DEFAULT_ENCODER},
	entry::{Attribute, Entry},
	error::Error,
	shape::{attribute_names, describe, MarshalEntry, Record, Shape, UnmarshalEntry},
	tag::FieldInfo,
	value::{AttributeValue, Binary, BinaryCodec, Value},
};

/// Encode a record with the [default encoder](DEFAULT_ENCODER).
pub fn encode<R: Record>(record: &R) -> Result<Entry, Error> {
	DEFAULT_ENCODER.encode(record)
}

/// Populate a record with the [default decoder](DEFAULT_DECODER).
pub fn decode<R: Record>(entry: &Entry, record: &mut R) -> Result<(), Error> {
	DEFAULT_DECODER.decode(entry, record)
}

/// Encode records in order with the [default encoder](DEFAULT_ENCODER),
/// stopping at the first failure.
pub fn encode_all<'a, R: Record>(
	records: impl IntoIterator<Item = &'a R>,
) -> Result<Vec<Entry>, Error> {
	DEFAULT_ENCODER.encode_all(records)
}

/// Decode entries in order with the [default decoder](DEFAULT_DECODER),
/// stopping at the first failure.
pub fn decode_all<R: Record + Default>(entries: &[Entry]) -> Result<Vec<R>, Error> {
	DEFAULT_DECODER.decode_all(entries)
}

/// Like [`decode_all`], boxing every record.
pub fn decode_all_boxed<R: Record + Default>(entries: &[Entry]) -> Result<Vec<Box<R>>, Error> {
	DEFAULT_DECODER.decode_all_boxed(entries)
}
