//! The value kinds a record field can hold.
//!
//! Every field type implements [`AttributeValue`], which lowers a value into
//! the closed [`Value`] union for encoding and raises raw attribute values
//! back into the field when decoding. The conversion rules themselves live in
//! the coercion module; implementations only pick the matching rule.
use std::{
	borrow::Cow,
	fmt,
	ops::{Deref, DerefMut},
};

use time::OffsetDateTime;

use crate::{coerce, error::Error};

/// A single field value lowered for encoding.
#[derive(Debug)]
pub enum Value<'a> {
	/// An optional value that is not set. Encodes as an attribute without
	/// values.
	Absent,
	/// A signed integer, written in decimal.
	Int(i64),
	/// An unsigned integer, written in decimal.
	Uint(u64),
	/// A floating point number, written with six fixed decimals. This does
	/// not round-trip every value exactly.
	Float(f64),
	/// Text, written as is.
	Text(&'a str),
	/// A byte buffer, written as is.
	Bytes(Cow<'a, [u8]>),
	/// A boolean, written as `TRUE` or `FALSE`.
	Bool(bool),
	/// A timestamp, written as Generalized Time.
	Timestamp(OffsetDateTime),
	/// The output of a [`BinaryCodec`].
	Binary(Vec<u8>),
	/// A collection whose elements are written one after the other into the
	/// same attribute. Zero-valued elements are skipped.
	List(Vec<&'a dyn AttributeValue>),
}

/// A type that can be stored in a record field mapped to an attribute.
pub trait AttributeValue: fmt::Debug {
	/// Lower the value for encoding.
	fn to_value(&self) -> Result<Value<'_>, Error>;

	/// Whether the value is the zero value of its type.
	fn is_zero(&self) -> bool;

	/// Overwrite the value from a single raw attribute value.
	fn decode_one(&mut self, raw: &[u8]) -> Result<(), Error>;

	/// Overwrite the value from all values of an attribute. Scalars take the
	/// first value and silently drop the rest, and stay untouched when there
	/// is none.
	fn decode_all(&mut self, values: &[&[u8]]) -> Result<(), Error> {
		match values.first() {
			Some(raw) => self.decode_one(raw),
			None => Ok(()),
		}
	}

	/// The zero value of the type.
	fn zero() -> Self
	where
		Self: Sized;

	/// Name of the type, for error messages.
	fn type_name(&self) -> &'static str {
		std::any::type_name::<Self>()
	}

	/// The value as a byte, for types that make up byte buffers.
	#[doc(hidden)]
	fn as_byte(&self) -> Option<u8> {
		None
	}

	/// Build a value from a byte, for types that make up byte buffers.
	#[doc(hidden)]
	fn from_byte(_byte: u8) -> Option<Self>
	where
		Self: Sized,
	{
		None
	}
}

/// Implements [`AttributeValue`] for signed integers.
macro_rules! signed {
	($($ty:ty)*) => {$(
		impl AttributeValue for $ty {
			#[allow(trivial_numeric_casts, clippy::cast_lossless)]
			fn to_value(&self) -> Result<Value<'_>, Error> {
				Ok(Value::Int(*self as i64))
			}

			fn is_zero(&self) -> bool {
				*self == 0
			}

			fn decode_one(&mut self, raw: &[u8]) -> Result<(), Error> {
				*self = coerce::text(raw)?.parse()?;
				Ok(())
			}

			fn zero() -> Self {
				0
			}
		}
	)*};
}

/// Implements [`AttributeValue`] for unsigned integers.
macro_rules! unsigned {
	($($ty:ty)*) => {$(
		impl AttributeValue for $ty {
			#[allow(trivial_numeric_casts, clippy::cast_lossless)]
			fn to_value(&self) -> Result<Value<'_>, Error> {
				Ok(Value::Uint(*self as u64))
			}

			fn is_zero(&self) -> bool {
				*self == 0
			}

			fn decode_one(&mut self, raw: &[u8]) -> Result<(), Error> {
				*self = coerce::text(raw)?.parse()?;
				Ok(())
			}

			fn zero() -> Self {
				0
			}
		}
	)*};
}

/// Implements [`AttributeValue`] for floating point numbers.
macro_rules! float {
	($($ty:ty)*) => {$(
		impl AttributeValue for $ty {
			fn to_value(&self) -> Result<Value<'_>, Error> {
				Ok(Value::Float((*self).into()))
			}

			fn is_zero(&self) -> bool {
				self.to_bits() == 0
			}

			fn decode_one(&mut self, raw: &[u8]) -> Result<(), Error> {
				*self = coerce::text(raw)?.parse()?;
				Ok(())
			}

			fn zero() -> Self {
				0.0
			}
		}
	)*};
}

signed!(i8 i16 i32 i64 isize);
unsigned!(u16 u32 u64 usize);
float!(f32 f64);

impl AttributeValue for u8 {
	fn to_value(&self) -> Result<Value<'_>, Error> {
		Ok(Value::Uint(u64::from(*self)))
	}

	fn is_zero(&self) -> bool {
		*self == 0
	}

	fn decode_one(&mut self, raw: &[u8]) -> Result<(), Error> {
		*self = coerce::text(raw)?.parse()?;
		Ok(())
	}

	fn zero() -> Self {
		0
	}

	fn as_byte(&self) -> Option<u8> {
		Some(*self)
	}

	fn from_byte(byte: u8) -> Option<Self> {
		Some(byte)
	}
}

impl AttributeValue for String {
	fn to_value(&self) -> Result<Value<'_>, Error> {
		Ok(Value::Text(self))
	}

	fn is_zero(&self) -> bool {
		self.is_empty()
	}

	fn decode_one(&mut self, raw: &[u8]) -> Result<(), Error> {
		coerce::text(raw)?.clone_into(self);
		Ok(())
	}

	fn zero() -> Self {
		String::new()
	}
}

impl AttributeValue for bool {
	fn to_value(&self) -> Result<Value<'_>, Error> {
		Ok(Value::Bool(*self))
	}

	fn is_zero(&self) -> bool {
		!*self
	}

	fn decode_one(&mut self, raw: &[u8]) -> Result<(), Error> {
		*self = coerce::parse_bool(raw);
		Ok(())
	}

	fn zero() -> Self {
		false
	}
}

impl AttributeValue for OffsetDateTime {
	fn to_value(&self) -> Result<Value<'_>, Error> {
		Ok(Value::Timestamp(*self))
	}

	fn is_zero(&self) -> bool {
		*self == coerce::ZERO_TIME
	}

	fn decode_one(&mut self, raw: &[u8]) -> Result<(), Error> {
		*self = coerce::parse_timestamp(raw);
		Ok(())
	}

	fn zero() -> Self {
		coerce::ZERO_TIME
	}
}

/// `Vec<u8>` is a byte buffer holding a single attribute value; any other
/// `Vec` holds one attribute value per element.
impl<T: AttributeValue> AttributeValue for Vec<T> {
	fn to_value(&self) -> Result<Value<'_>, Error> {
		if T::from_byte(0).is_some() {
			let bytes = self.iter().filter_map(AttributeValue::as_byte).collect::<Vec<_>>();
			return Ok(Value::Bytes(Cow::Owned(bytes)));
		}
		Ok(Value::List(self.iter().map(|item| -> &dyn AttributeValue { item }).collect()))
	}

	fn is_zero(&self) -> bool {
		self.is_empty()
	}

	fn decode_one(&mut self, raw: &[u8]) -> Result<(), Error> {
		self.decode_all(&[raw])
	}

	fn decode_all(&mut self, values: &[&[u8]]) -> Result<(), Error> {
		if T::from_byte(0).is_some() {
			if let Some(raw) = values.first() {
				*self = raw.iter().filter_map(|byte| T::from_byte(*byte)).collect();
			}
			return Ok(());
		}

		let mut items = Vec::with_capacity(values.len());
		for raw in values {
			let mut item = T::zero();
			item.decode_one(raw)?;
			items.push(item);
		}
		*self = items;
		Ok(())
	}

	fn zero() -> Self {
		Vec::new()
	}
}

/// An optional value. `None` is encoded as an attribute without values and
/// is replaced with the zero value of `T` before decoding into it.
impl<T: AttributeValue> AttributeValue for Option<T> {
	fn to_value(&self) -> Result<Value<'_>, Error> {
		match self {
			Some(value) => value.to_value(),
			None => Ok(Value::Absent),
		}
	}

	fn is_zero(&self) -> bool {
		self.is_none()
	}

	fn decode_one(&mut self, raw: &[u8]) -> Result<(), Error> {
		self.get_or_insert_with(T::zero).decode_one(raw)
	}

	fn decode_all(&mut self, values: &[&[u8]]) -> Result<(), Error> {
		if values.is_empty() {
			return Ok(());
		}
		self.get_or_insert_with(T::zero).decode_all(values)
	}

	fn zero() -> Self {
		None
	}
}

impl<T: AttributeValue> AttributeValue for Box<T> {
	fn to_value(&self) -> Result<Value<'_>, Error> {
		(**self).to_value()
	}

	fn is_zero(&self) -> bool {
		(**self).is_zero()
	}

	fn decode_one(&mut self, raw: &[u8]) -> Result<(), Error> {
		(**self).decode_one(raw)
	}

	fn decode_all(&mut self, values: &[&[u8]]) -> Result<(), Error> {
		(**self).decode_all(values)
	}

	fn zero() -> Self {
		Box::new(T::zero())
	}
}

/// A type with its own binary attribute representation.
pub trait BinaryCodec {
	/// Serialize into the raw attribute value.
	fn encode_binary(&self) -> Result<Vec<u8>, Error>;

	/// Replace the contents from a raw attribute value.
	fn decode_binary(&mut self, raw: &[u8]) -> Result<(), Error>;
}

/// Field wrapper that stores `T` through its [`BinaryCodec`]. The default
/// value of `T` is its zero value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Binary<T>(pub T);

impl<T: BinaryCodec + Default + PartialEq + fmt::Debug> AttributeValue for Binary<T> {
	fn to_value(&self) -> Result<Value<'_>, Error> {
		Ok(Value::Binary(self.0.encode_binary()?))
	}

	fn is_zero(&self) -> bool {
		self.0 == T::default()
	}

	fn decode_one(&mut self, raw: &[u8]) -> Result<(), Error> {
		self.0.decode_binary(raw)
	}

	fn zero() -> Self {
		Binary(T::default())
	}
}

impl<T> Deref for Binary<T> {
	type Target = T;

	fn deref(&self) -> &T {
		&self.0
	}
}

impl<T> DerefMut for Binary<T> {
	fn deref_mut(&mut self) -> &mut T {
		&mut self.0
	}
}

impl<T> From<T> for Binary<T> {
	fn from(value: T) -> Self {
		Binary(value)
	}
}

#[cfg(test)]
mod tests {
	#![allow(clippy::unwrap_used)]

	use super::{AttributeValue, Binary, BinaryCodec, Value};
	use crate::error::Error;

	#[derive(Debug, Default, PartialEq)]
	struct Upper(String);

	impl BinaryCodec for Upper {
		fn encode_binary(&self) -> Result<Vec<u8>, Error> {
			Ok(self.0.to_uppercase().into_bytes())
		}

		fn decode_binary(&mut self, raw: &[u8]) -> Result<(), Error> {
			self.0 = String::from_utf8_lossy(raw).to_lowercase();
			Ok(())
		}
	}

	#[test]
	fn zero_values() {
		assert!(0_i16.is_zero());
		assert!(!(-1_i64).is_zero());
		assert!(0.0_f64.is_zero());
		assert!(!(-0.0_f64).is_zero(), "Only the all-zero bit pattern is zero");
		assert!(String::new().is_zero());
		assert!(Vec::<String>::new().is_zero());
		assert!(None::<u8>.is_zero());
		assert!(!Some(0_u8).is_zero());
		assert!(false.is_zero());
		assert!(Binary(Upper::default()).is_zero());
	}

	#[test]
	fn integers_reject_overflow() {
		let mut small = 0_i8;
		assert!(matches!(small.decode_one(b"300"), Err(Error::ParseInt(_))));
		assert!(matches!(small.decode_one(b"abc"), Err(Error::ParseInt(_))));
		small.decode_one(b"-128").unwrap();
		assert_eq!(small, i8::MIN);

		let mut unsigned = 0_u32;
		assert!(unsigned.decode_one(b"-1").is_err());
	}

	#[test]
	fn byte_buffers_are_scalar() {
		let mut buffer = vec![9_u8];
		buffer.decode_all(&[b"one", b"two"]).unwrap();
		assert_eq!(buffer, b"one");
		assert!(matches!(buffer.to_value().unwrap(), Value::Bytes(bytes) if &*bytes == b"one"));
	}

	#[test]
	fn lists_take_every_value() {
		let mut list = vec![String::from("stale")];
		list.decode_all(&[b"one", b"two", b"three"]).unwrap();
		assert_eq!(list, ["one", "two", "three"]);

		let mut raw: Vec<Vec<u8>> = Vec::new();
		raw.decode_all(&[b"one", b"two"]).unwrap();
		assert_eq!(raw, [b"one".to_vec(), b"two".to_vec()]);
	}

	#[test]
	fn optional_values_are_allocated() {
		let mut value: Option<bool> = None;
		value.decode_all(&[]).unwrap();
		assert_eq!(value, None, "No values leave the field untouched");
		value.decode_all(&[b"true"]).unwrap();
		assert_eq!(value, Some(true));
		assert!(matches!(None::<String>.to_value().unwrap(), Value::Absent));
	}

	#[test]
	fn binary_codec() {
		let value = Binary(Upper(String::from("abc")));
		assert!(matches!(value.to_value().unwrap(), Value::Binary(bytes) if bytes == b"ABC"));

		let mut value = Binary::<Upper>::zero();
		value.decode_one(b"XYZ").unwrap();
		assert_eq!(value.0.0, "xyz");
	}
}
