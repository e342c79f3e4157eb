//! Conversion rules between single field values and attribute values.
use time::{macros::datetime, OffsetDateTime, PrimitiveDateTime};
use tracing::warn;

use crate::{entry::Attribute, error::Error, value::Value};

/// Layout used to serialize timestamps: `( 1.3.6.1.4.1.1466.115.121.1.24
/// DESC 'Generalized Time' )` from RFC4517 section 3.1.13, in UTC, with a
/// single fractional digit the way Active Directory writes it.
pub const GENERALIZED_TIME: &[time::format_description::FormatItem] =
	time::macros::format_description!("[year][month][day][hour][minute][second].0Z");

/// Parsing counterpart of [`GENERALIZED_TIME`].
const GENERALIZED_TIME_FRACTION: &[time::format_description::FormatItem] =
	time::macros::format_description!("[year][month][day][hour][minute][second].[subsecond digits:1]Z");

/// Generalized Time without a fractional part, as OpenLDAP writes it.
pub const TIME_FORMAT: &[time::format_description::FormatItem] =
	time::macros::format_description!("[year][month][day][hour][minute][second]Z");

/// The timestamp treated as unset. Malformed timestamps decode to it.
pub const ZERO_TIME: OffsetDateTime = datetime!(0001-01-01 0:00 UTC);

/// Windows file time ticks between 1601-01-01 and the Unix epoch.
const FILE_TIME_UNIX_OFFSET: i64 = 116_444_736_000_000_000;
/// Windows file time ticks per second, a tick being 100ns.
const FILE_TIME_TICKS_PER_SECOND: i64 = 10_000_000;

/// Textual form of `true`.
const TRUE: &str = "TRUE";
/// Textual form of `false`.
const FALSE: &str = "FALSE";

/// Append the attribute values produced by `value`.
///
/// Lists are flattened in element order; zero-valued elements are skipped.
pub(crate) fn encode_value(attribute: &mut Attribute, value: Value<'_>) -> Result<(), Error> {
	match value {
		Value::Absent => {}
		Value::Int(number) => attribute.push_text(number.to_string()),
		Value::Uint(number) => attribute.push_text(number.to_string()),
		Value::Float(number) => attribute.push_text(format!("{number:.6}")),
		Value::Text(text) => attribute.push_text(text.to_owned()),
		Value::Bytes(bytes) => attribute.push_bytes(bytes.into_owned()),
		Value::Binary(bytes) => attribute.push_bytes(bytes),
		Value::Bool(flag) => attribute.push_text(if flag { TRUE } else { FALSE }.to_owned()),
		Value::Timestamp(time) => attribute.push_text(format_timestamp(time)?),
		Value::List(items) => {
			for item in items {
				if item.is_zero() {
					continue;
				}
				encode_value(attribute, item.to_value()?)?;
			}
		}
	}
	Ok(())
}

/// Convert the value of the field holding the distinguished name into text.
pub(crate) fn identity(value: Value<'_>, type_name: &'static str) -> Result<String, Error> {
	match value {
		Value::Text(text) => Ok(text.to_owned()),
		Value::Bytes(bytes) => Ok(String::from_utf8_lossy(&bytes).into_owned()),
		_ => Err(Error::UnsupportedDnType(type_name)),
	}
}

/// Render a timestamp as Generalized Time in UTC, dropping sub-second
/// precision. Fails when the UTC date falls outside the supported years.
pub(crate) fn format_timestamp(time: OffsetDateTime) -> Result<String, Error> {
	let utc = OffsetDateTime::from_unix_timestamp(time.unix_timestamp())?;
	Ok(utc.format(&GENERALIZED_TIME)?)
}

/// Interpret a raw value as text.
pub(crate) fn text(raw: &[u8]) -> Result<&str, Error> {
	Ok(std::str::from_utf8(raw)?)
}

/// Interpret a raw value as a boolean. Anything but `TRUE`, in any case, is
/// `false`.
pub(crate) fn parse_bool(raw: &[u8]) -> bool {
	raw.eq_ignore_ascii_case(TRUE.as_bytes())
}

/// Interpret a raw value as a timestamp.
///
/// Integers are Windows file times (`pwdLastSet`, `lastLogon`), anything
/// else is Generalized Time. Values that fit neither decode to
/// [`ZERO_TIME`].
pub(crate) fn parse_timestamp(raw: &[u8]) -> OffsetDateTime {
	let text = String::from_utf8_lossy(raw);
	let parsed = match text.parse::<i64>() {
		Ok(ticks) => from_file_time(ticks),
		Err(_) => parse_generalized_time(&text),
	};
	parsed.unwrap_or_else(|| {
		warn!("Malformed timestamp {text:?}, using the zero timestamp");
		ZERO_TIME
	})
}

/// Convert Windows file time ticks, truncating to whole seconds.
fn from_file_time(ticks: i64) -> Option<OffsetDateTime> {
	let since_epoch = ticks.checked_sub(FILE_TIME_UNIX_OFFSET)?;
	OffsetDateTime::from_unix_timestamp(since_epoch.div_euclid(FILE_TIME_TICKS_PER_SECOND)).ok()
}

/// Parse Generalized Time with or without a single fractional digit.
fn parse_generalized_time(text: &str) -> Option<OffsetDateTime> {
	PrimitiveDateTime::parse(text, &GENERALIZED_TIME_FRACTION)
		.or_else(|_| PrimitiveDateTime::parse(text, &TIME_FORMAT))
		.ok()
		.map(PrimitiveDateTime::assume_utc)
}
