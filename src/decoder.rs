//! Population of records from directory entries.
use tracing::debug;

use crate::{
	config::Config,
	entry::Entry,
	error::Error,
	shape::{has_dn, Access, Record, Walker},
};

/// The decoder behind [`decode`](crate::decode) and
/// [`decode_all`](crate::decode_all).
pub static DEFAULT_DECODER: Decoder = Decoder::new(Config::DEFAULT);

/// Populates records from directory entries.
#[derive(Debug, Clone)]
pub struct Decoder {
	/// Behaviour switches.
	config: Config,
}

impl Decoder {
	/// Create a decoder.
	#[must_use]
	pub const fn new(config: Config) -> Self {
		Self { config }
	}

	/// The configuration of this decoder.
	#[must_use]
	pub const fn config(&self) -> &Config {
		&self.config
	}

	/// Populate a record from an entry.
	///
	/// The record must map a field to `dn`, whether or not the entry has a
	/// distinguished name. Every other field is looked up by attribute name,
	/// ignoring case; fields whose attribute is missing keep their value. On
	/// failure the record is left partially populated.
	pub fn decode<R: Record>(&self, entry: &Entry, record: &mut R) -> Result<(), Error> {
		if self.config.use_record_codecs {
			if let Some(unmarshaler) = record.as_unmarshaler() {
				debug!(record = std::any::type_name::<R>(), "Record decodes itself");
				return unmarshaler.unmarshal_entry(entry);
			}
		}
		if !has_dn::<R>() {
			return Err(Error::NoDn);
		}

		for field in Walker::<R>::new(false) {
			let info = field.info;
			let values = if info.is_dn() {
				vec![entry.dn.as_bytes()]
			} else {
				match entry.attribute(&info.name) {
					Some(attribute) => attribute.raw_values(),
					None => continue,
				}
			};
			let result = match field.access {
				Access::Value(access) => access.get_mut(record).decode_all(&values),
				Access::Nested(nested) => {
					debug!(attribute = %info.name, record = nested.type_name(), "Nested record");
					Err(Error::UnsupportedType(info.name.clone()))
				}
			};
			if let Err(err) = result {
				debug!(attribute = %info.name, "Failed to decode field: {err}");
				return Err(err);
			}
		}
		Ok(())
	}

	/// Decode every entry in order into a new record, stopping at the first
	/// failure.
	pub fn decode_all<R: Record + Default>(&self, entries: &[Entry]) -> Result<Vec<R>, Error> {
		entries
			.iter()
			.map(|entry| {
				let mut record = R::default();
				self.decode(entry, &mut record)?;
				Ok(record)
			})
			.collect()
	}

	/// Like [`Decoder::decode_all`], boxing every record.
	pub fn decode_all_boxed<R: Record + Default>(
		&self,
		entries: &[Entry],
	) -> Result<Vec<Box<R>>, Error> {
		entries
			.iter()
			.map(|entry| {
				let mut record = Box::<R>::default();
				self.decode(entry, &mut *record)?;
				Ok(record)
			})
			.collect()
	}
}

impl Default for Decoder {
	fn default() -> Self {
		Self::new(Config::DEFAULT)
	}
}
