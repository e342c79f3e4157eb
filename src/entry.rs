//! Directory entries and helper methods for extracting data from them.
use std::collections::{HashMap, HashSet};

use ldap3::{Mod, SearchEntry};
use serde::{Deserialize, Serialize};

use crate::coerce;

/// A directory entry: a distinguished name plus an ordered list of
/// attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
	/// The distinguished name of the entry.
	pub dn: String,
	/// Attributes in the order they were produced.
	pub attributes: Vec<Attribute>,
}

/// A named, multi-valued attribute of an [`Entry`].
///
/// Every value is kept in two parallel representations: as text and as raw
/// bytes. Values that are not valid UTF-8 are stored lossily in
/// [`Attribute::values`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
	/// The attribute description, compared case-insensitively.
	pub name: String,
	/// Values in textual form.
	pub values: Vec<String>,
	/// Values in binary form.
	pub byte_values: Vec<Vec<u8>>,
}

impl Attribute {
	/// Create an attribute from textual values.
	#[must_use]
	pub fn new(name: impl Into<String>, values: Vec<String>) -> Self {
		let byte_values = values.iter().map(|value| value.as_bytes().to_vec()).collect();
		Self { name: name.into(), values, byte_values }
	}

	/// Create an attribute from binary values.
	#[must_use]
	pub fn binary(name: impl Into<String>, byte_values: Vec<Vec<u8>>) -> Self {
		let values =
			byte_values.iter().map(|value| String::from_utf8_lossy(value).into_owned()).collect();
		Self { name: name.into(), values, byte_values }
	}

	/// Create an attribute that is present but holds no values.
	#[must_use]
	pub fn empty(name: impl Into<String>) -> Self {
		Self { name: name.into(), values: Vec::new(), byte_values: Vec::new() }
	}

	/// Whether this attribute is called `name`, ignoring ASCII case.
	#[must_use]
	pub fn is_named(&self, name: &str) -> bool {
		self.name.eq_ignore_ascii_case(name)
	}

	/// Whether the attribute holds no values.
	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.values.is_empty() && self.byte_values.is_empty()
	}

	/// The values in their most faithful form. The text values are
	/// canonical; a binary value is used instead only where the text is the
	/// lossy rendering of bytes that are not valid UTF-8.
	#[must_use]
	pub fn raw_values(&self) -> Vec<&[u8]> {
		let count = self.values.len().max(self.byte_values.len());
		(0..count)
			.filter_map(|index| match (self.values.get(index), self.byte_values.get(index)) {
				(Some(text), Some(bytes)) if is_lossy_rendering(text, bytes) => {
					Some(bytes.as_slice())
				}
				(Some(text), _) => Some(text.as_bytes()),
				(None, bytes) => bytes.map(Vec::as_slice),
			})
			.collect()
	}

	/// Append a textual value.
	pub(crate) fn push_text(&mut self, value: String) {
		self.byte_values.push(value.as_bytes().to_vec());
		self.values.push(value);
	}

	/// Append a binary value.
	pub(crate) fn push_bytes(&mut self, value: Vec<u8>) {
		self.values.push(String::from_utf8_lossy(&value).into_owned());
		self.byte_values.push(value);
	}
}

/// Whether `text` is what the non UTF-8 `bytes` turn into when read as text.
fn is_lossy_rendering(text: &str, bytes: &[u8]) -> bool {
	std::str::from_utf8(bytes).is_err() && String::from_utf8_lossy(bytes) == text
}

impl Entry {
	/// Create an entry from its parts.
	#[must_use]
	pub fn new(dn: impl Into<String>, attributes: Vec<Attribute>) -> Self {
		Self { dn: dn.into(), attributes }
	}

	/// Look up an attribute by name, ignoring ASCII case. Returns the first
	/// match.
	#[must_use]
	pub fn attribute(&self, name: &str) -> Option<&Attribute> {
		self.attributes.iter().find(|attribute| attribute.is_named(name))
	}

	/// All textual values of an attribute. Empty when the attribute is
	/// missing.
	#[must_use]
	pub fn attribute_values(&self, name: &str) -> &[String] {
		self.attribute(name).map(|attribute| attribute.values.as_slice()).unwrap_or_default()
	}

	/// Get the first value of an attribute.
	#[must_use]
	pub fn attr_first(&self, name: &str) -> Option<&str> {
		self.attribute_values(name).first().map(String::as_str)
	}

	/// Get the first value of an attribute in the form
	/// [`Attribute::raw_values`] picks.
	#[must_use]
	pub fn bin_attr_first(&self, name: &str) -> Option<&[u8]> {
		self.attribute(name)?.raw_values().first().copied()
	}

	/// Get the first value of an attribute, interpreted as a boolean the way
	/// `bool` fields decode: `TRUE` in any case is true, anything else false.
	#[must_use]
	pub fn bool_first(&self, name: &str) -> Option<bool> {
		self.bin_attr_first(name).map(coerce::parse_bool)
	}

	/// The attribute list in the form expected by [`ldap3::Ldap::add`].
	/// Attributes without values are left out, a directory server refuses
	/// them on creation.
	#[must_use]
	pub fn to_add_attributes(&self) -> Vec<(Vec<u8>, HashSet<Vec<u8>>)> {
		self.attributes
			.iter()
			.filter(|attribute| !attribute.is_empty())
			.map(|attribute| {
				let values = attribute.raw_values().into_iter().map(<[u8]>::to_vec).collect();
				(attribute.name.as_bytes().to_vec(), values)
			})
			.collect()
	}

	/// One replace modification per attribute, for [`ldap3::Ldap::modify`].
	/// Replacing with an empty value set removes the attribute.
	#[must_use]
	pub fn to_modifications(&self) -> Vec<Mod<Vec<u8>>> {
		self.attributes
			.iter()
			.map(|attribute| {
				let values = attribute.raw_values().into_iter().map(<[u8]>::to_vec).collect();
				Mod::Replace(attribute.name.as_bytes().to_vec(), values)
			})
			.collect()
	}
}

impl From<SearchEntry> for Entry {
	fn from(entry: SearchEntry) -> Self {
		let mut attributes: Vec<Attribute> = entry
			.attrs
			.into_iter()
			.map(|(name, values)| Attribute::new(name, values))
			.chain(entry.bin_attrs.into_iter().map(|(name, values)| Attribute::binary(name, values)))
			.collect();
		attributes.sort_by(|a, b| a.name.cmp(&b.name));
		Entry { dn: entry.dn, attributes }
	}
}

impl From<Entry> for SearchEntry {
	fn from(entry: Entry) -> Self {
		let mut attrs = HashMap::new();
		let mut bin_attrs = HashMap::new();
		for attribute in entry.attributes {
			let raw = attribute.raw_values();
			match raw.iter().map(|value| std::str::from_utf8(value)).collect::<Result<Vec<_>, _>>()
			{
				Ok(values) => {
					let values = values.into_iter().map(str::to_owned).collect();
					attrs.insert(attribute.name.clone(), values);
				}
				Err(_) => {
					let values = raw.into_iter().map(<[u8]>::to_vec).collect();
					bin_attrs.insert(attribute.name.clone(), values);
				}
			}
		}
		SearchEntry { dn: entry.dn, attrs, bin_attrs }
	}
}

#[cfg(test)]
mod tests {
	#![allow(clippy::unwrap_used)]

	use ldap3::{Mod, SearchEntry};

	use super::{Attribute, Entry};

	fn example() -> Entry {
		Entry::new(
			"uid=foo,ou=people,dc=example,dc=com",
			vec![
				Attribute::new("name", vec![String::from("Foo Bar"), String::from("Bar McBaz")]),
				Attribute::binary("objectGUID", vec![vec![0xde, 0xad, 0xbe, 0xef]]),
				Attribute::new("enabled", vec![String::from("TRUE")]),
				Attribute::empty("mail"),
			],
		)
	}

	#[test]
	fn attr_first() {
		let entry = example();
		assert_eq!(
			entry.attr_first("attribute_does_not_exist"),
			None,
			"Undefined attributes should return None"
		);
		assert_eq!(entry.attr_first("name"), Some("Foo Bar"), "Should return the first value");
		assert_eq!(entry.attr_first("NAME"), Some("Foo Bar"), "Lookup ignores case");
		assert_ne!(entry.attr_first("name"), Some("Bar McBaz"), "Should return the correct value");
	}

	#[test]
	fn bin_attr_first() {
		let entry = example();
		assert_eq!(entry.bin_attr_first("objectguid"), Some(&[0xde, 0xad, 0xbe, 0xef][..]));
		assert_eq!(entry.bin_attr_first("name"), Some("Foo Bar".as_bytes()));
		assert_eq!(entry.bin_attr_first("mail"), None);
	}

	#[test]
	fn bool_first() {
		let mut entry = example();
		assert_eq!(entry.bool_first("enabled"), Some(true));
		assert_eq!(entry.bool_first("name"), Some(false), "Anything but TRUE is false");
		assert_eq!(entry.bool_first("admin"), None);
		entry.attributes.push(Attribute::new("admin", vec![String::from("true")]));
		assert_eq!(entry.bool_first("admin"), Some(true));
	}

	#[test]
	fn raw_values_keep_binary() {
		let mut attribute = Attribute::binary("objectGUID", vec![vec![0xff, 0x00]]);
		assert_eq!(attribute.values, [String::from("\u{fffd}\0")]);
		assert_eq!(attribute.raw_values(), [&[0xff, 0x00][..]]);

		attribute.values.push(String::from("extra"));
		assert_eq!(attribute.raw_values(), [&[0xff, 0x00][..], &b"extra"[..]]);

		let attribute = Attribute { byte_values: vec![vec![1, 2]], ..Attribute::empty("raw") };
		assert_eq!(attribute.raw_values(), [&[1, 2][..]], "Bytes without text are kept");
	}

	#[test]
	fn raw_values_follow_edited_text() {
		let mut attribute = Attribute::new("age", vec![String::from("1")]);
		attribute.values[0] = String::from("2");
		assert_eq!(attribute.raw_values(), [b"2"]);

		let mut attribute = Attribute::binary("objectGUID", vec![vec![0xff]]);
		attribute.values[0] = String::from("replaced");
		assert_eq!(attribute.raw_values(), [b"replaced"]);
	}

	#[test]
	fn from_search_entry() {
		let entry = SearchEntry {
			dn: String::from("cn=foo,dc=example,dc=com"),
			attrs: [
				(String::from("sn"), vec![String::from("Foo")]),
				(String::from("cn"), vec![String::from("foo")]),
			]
			.into_iter()
			.collect(),
			bin_attrs: [(String::from("objectGUID"), vec![vec![1, 2, 3]])].into_iter().collect(),
		};
		let entry = Entry::from(entry);
		assert_eq!(entry.dn, "cn=foo,dc=example,dc=com");
		let names: Vec<_> = entry.attributes.iter().map(|attribute| attribute.name.as_str()).collect();
		assert_eq!(names, ["cn", "objectGUID", "sn"], "Attributes are sorted by name");
		assert_eq!(entry.bin_attr_first("objectGUID"), Some(&[1, 2, 3][..]));
	}

	#[test]
	fn into_search_entry() {
		let entry = SearchEntry::from(example());
		assert_eq!(entry.attrs["name"], ["Foo Bar", "Bar McBaz"]);
		assert_eq!(entry.attrs["mail"], Vec::<String>::new());
		assert_eq!(entry.bin_attrs["objectGUID"], [vec![0xde, 0xad, 0xbe, 0xef]]);
		assert!(!entry.attrs.contains_key("objectGUID"));
		assert_eq!(entry.bin_attrs.len(), 1);
	}

	#[test]
	fn add_attributes_skip_empty() {
		let attributes = example().to_add_attributes();
		let names: Vec<_> = attributes.iter().map(|(name, _)| name.as_slice()).collect();
		assert_eq!(names, [&b"name"[..], b"objectGUID", b"enabled"]);
		assert_eq!(attributes[0].1.len(), 2);
	}

	#[test]
	fn modifications_replace_everything() {
		let modifications = example().to_modifications();
		assert_eq!(modifications.len(), 4);
		match &modifications[3] {
			Mod::Replace(name, values) => {
				assert_eq!(name, b"mail");
				assert!(values.is_empty(), "An empty attribute clears the server side value");
			}
			_ => panic!("expected a replace modification"),
		}
	}

	#[test]
	fn entries_survive_serialization() {
		let entry = example();
		let text = serde_json::to_string(&entry).unwrap();
		assert!(text.contains(r#""dn":"uid=foo,ou=people,dc=example,dc=com""#));

		let restored: Entry = serde_json::from_str(&text).unwrap();
		assert_eq!(restored, entry);
		assert_eq!(restored.bin_attr_first("objectGUID"), Some(&[0xde, 0xad, 0xbe, 0xef][..]));
	}
}
