//! Error codes

use std::{
	num::{ParseFloatError, ParseIntError},
	str::Utf8Error,
};

/// Errors that can occur when converting between records and entries
#[derive(thiserror::Error, Debug)]
pub enum Error {
	/// No field of the record maps to the distinguished name, or the one that
	/// does holds an empty value.
	#[error("no DN found")]
	NoDn,
	/// The field mapped to the distinguished name is neither text nor a byte
	/// buffer.
	#[error("unsupported DN type: {0}")]
	UnsupportedDnType(&'static str),
	/// The field mapped to the named attribute has no conversion rule.
	#[error("unsupported type for {0}")]
	UnsupportedType(String),
	/// An integer attribute value did not parse.
	#[error(transparent)]
	ParseInt(#[from] ParseIntError),
	/// A floating point attribute value did not parse.
	#[error(transparent)]
	ParseFloat(#[from] ParseFloatError),
	/// A textual attribute value was not valid UTF-8.
	#[error(transparent)]
	Utf8(#[from] Utf8Error),
	/// A timestamp could not be rendered as Generalized Time.
	#[error(transparent)]
	TimeFormat(#[from] time::error::Format),
	/// A timestamp has no representation in UTC within the supported years.
	#[error(transparent)]
	TimeRange(#[from] time::error::ComponentRange),
	/// The contents of an attribute did not conform to the expected syntax.
	/// Raised by custom codecs and whole-record conversions.
	#[error("Malformed data: {0}")]
	Invalid(String),
}
