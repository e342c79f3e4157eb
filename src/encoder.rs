//! Conversion of records into directory entries.
use tracing::{debug, trace};

use crate::{
	coerce,
	config::Config,
	entry::{Attribute, Entry},
	error::Error,
	shape::{Access, Record, Walker},
	value::Value,
};

/// The encoder behind [`encode`](crate::encode) and
/// [`encode_all`](crate::encode_all).
pub static DEFAULT_ENCODER: Encoder = Encoder::new(Config::DEFAULT);

/// Builds directory entries from records.
#[derive(Debug, Clone)]
pub struct Encoder {
	/// Behaviour switches.
	config: Config,
}

impl Encoder {
	/// Create an encoder.
	#[must_use]
	pub const fn new(config: Config) -> Self {
		Self { config }
	}

	/// The configuration of this encoder.
	#[must_use]
	pub const fn config(&self) -> &Config {
		&self.config
	}

	/// Encode a record into an entry.
	///
	/// Fields are converted in walk order, each into one attribute. The field
	/// mapped to `dn` becomes the distinguished name of the entry and must be
	/// text or a byte buffer. Encoding stops at the first failing field.
	pub fn encode<R: Record>(&self, record: &R) -> Result<Entry, Error> {
		if self.config.use_record_codecs {
			if let Some(marshaler) = record.as_marshaler() {
				debug!(record = std::any::type_name::<R>(), "Record encodes itself");
				return marshaler.marshal_entry();
			}
		}

		let mut dn = None;
		let mut attributes = Vec::new();
		for field in Walker::<R>::new(self.config.skip_read_only) {
			let info = field.info;
			let access = match field.access {
				Access::Value(access) => access,
				Access::Nested(nested) => {
					if info.omit_empty && nested.is_zero(record) {
						trace!(attribute = %info.name, "Omitting empty field");
						continue;
					}
					debug!(attribute = %info.name, record = nested.type_name(), "Nested record");
					return Err(Error::UnsupportedType(info.name));
				}
			};

			let value = access.get(record);
			if info.omit_empty && !info.is_dn() && value.is_zero() {
				trace!(attribute = %info.name, "Omitting empty field");
				continue;
			}
			let lowered = value.to_value()?;
			if matches!(lowered, Value::Absent) {
				attributes.push(Attribute::empty(info.name));
				continue;
			}
			if info.is_dn() {
				dn = Some(coerce::identity(lowered, value.type_name())?);
				continue;
			}

			let mut attribute = Attribute::empty(info.name);
			coerce::encode_value(&mut attribute, lowered).map_err(|err| {
				debug!(attribute = %attribute.name, "Failed to encode field: {err}");
				err
			})?;
			attributes.push(attribute);
		}

		match dn {
			Some(dn) if !dn.is_empty() => Ok(Entry { dn, attributes }),
			_ => Err(Error::NoDn),
		}
	}

	/// Encode every record in order, stopping at the first failure.
	pub fn encode_all<'a, R: Record>(
		&self,
		records: impl IntoIterator<Item = &'a R>,
	) -> Result<Vec<Entry>, Error> {
		records.into_iter().map(|record| self.encode(record)).collect()
	}
}

impl Default for Encoder {
	fn default() -> Self {
		Self::new(Config::DEFAULT)
	}
}
