//! Record descriptions and the walk over their fields.
//!
//! A [`Record`] describes itself with a [`Shape`]: the ordered list of its
//! fields, each with a declared name, an optional annotation and accessors
//! to reach the value inside a record. Embedded records are kept as a single
//! entry in the list and flattened while walking, so the walk yields the
//! fields of an embedded record at the position it was declared.
use std::{fmt, vec};

use crate::{
	entry::Entry,
	error::Error,
	tag::FieldInfo,
	value::AttributeValue,
};

/// A type that maps onto a directory [`Entry`].
///
/// Usually implemented through the [`record!`](crate::record) macro.
pub trait Record: Sized + 'static {
	/// Describe the fields of the record. Called on every conversion.
	fn shape() -> Shape<Self>;

	/// The whole-record encoding of this record, if it has one.
	fn as_marshaler(&self) -> Option<&dyn MarshalEntry> {
		None
	}

	/// The whole-record decoding of this record, if it has one.
	fn as_unmarshaler(&mut self) -> Option<&mut dyn UnmarshalEntry> {
		None
	}
}

/// A record that produces its entry itself instead of field by field.
///
/// Only used when [`Record::as_marshaler`] returns it, which `record!` does
/// when `marshal` is listed after the fields.
pub trait MarshalEntry {
	/// Build the entry for this record.
	fn marshal_entry(&self) -> Result<Entry, Error>;
}

/// A record that populates itself from an entry instead of field by field.
///
/// Only used when [`Record::as_unmarshaler`] returns it, which `record!` does
/// when `unmarshal` is listed after the fields.
pub trait UnmarshalEntry {
	/// Populate this record from the entry.
	fn unmarshal_entry(&mut self, entry: &Entry) -> Result<(), Error>;
}

/// The ordered field list of a record type.
pub struct Shape<R> {
	/// Fields in declaration order.
	fields: Vec<Field<R>>,
}

/// A declared field of a record.
pub(crate) struct Field<R> {
	/// The declared name, the base of the default attribute name.
	name: &'static str,
	/// Annotation overriding the attribute name and flags.
	annotation: Option<&'static str>,
	/// Fields that are not exported are never encoded or decoded.
	exported: bool,
	/// How the field is reached.
	kind: FieldKind<R>,
}

/// How a field is reached from its record.
enum FieldKind<R> {
	/// A value mapped to one attribute.
	Value(Box<dyn FieldAccess<R>>),
	/// An embedded record whose fields are flattened into the parent.
	Embedded(Box<dyn Embedding<R>>),
	/// A record held as a plain field. Has no attribute representation.
	Nested(Box<dyn NestedAccess<R>>),
}

/// Reaches a value field inside a record.
pub(crate) trait FieldAccess<R> {
	/// Borrow the value.
	fn get<'a>(&self, record: &'a R) -> &'a dyn AttributeValue;
	/// Borrow the value mutably.
	fn get_mut<'a>(&self, record: &'a mut R) -> &'a mut dyn AttributeValue;
}

/// Lists the fields of an embedded record as fields of the parent.
trait Embedding<R> {
	/// The embedded fields, reachable from the parent.
	fn fields(&self) -> Vec<Field<R>>;
}

/// Inspects a record held as a plain field.
pub(crate) trait NestedAccess<R> {
	/// Whether every field of the nested record is zero.
	fn is_zero(&self, record: &R) -> bool;
	/// Name of the nested record type.
	fn type_name(&self) -> &'static str;
}

/// Accessors of a value field declared directly on the record.
struct Direct<R, T> {
	/// Shared accessor.
	get: fn(&R) -> &T,
	/// Mutable accessor.
	get_mut: fn(&mut R) -> &mut T,
}

impl<R, T: AttributeValue + 'static> FieldAccess<R> for Direct<R, T> {
	fn get<'a>(&self, record: &'a R) -> &'a dyn AttributeValue {
		(self.get)(record)
	}

	fn get_mut<'a>(&self, record: &'a mut R) -> &'a mut dyn AttributeValue {
		(self.get_mut)(record)
	}
}

/// An embedded record declared directly on the record.
struct Embed<R, E> {
	/// Shared accessor.
	get: fn(&R) -> &E,
	/// Mutable accessor.
	get_mut: fn(&mut R) -> &mut E,
}

impl<R: 'static, E: Record> Embedding<R> for Embed<R, E> {
	fn fields(&self) -> Vec<Field<R>> {
		E::shape().fields.into_iter().map(|field| field.project(self.get, self.get_mut)).collect()
	}
}

/// A record held as a plain field on the record.
struct Nested<R, E> {
	/// Shared accessor.
	get: fn(&R) -> &E,
}

impl<R, E: Record> NestedAccess<R> for Nested<R, E> {
	fn is_zero(&self, record: &R) -> bool {
		let nested = (self.get)(record);
		E::shape().fields.into_iter().all(|field| field.is_zero(nested))
	}

	fn type_name(&self) -> &'static str {
		std::any::type_name::<E>()
	}
}

/// A field of an embedded record `E`, reached through the parent `R`.
struct Projected<R, E, I: ?Sized> {
	/// Shared accessor of the embedded record.
	get: fn(&R) -> &E,
	/// Mutable accessor of the embedded record.
	get_mut: fn(&mut R) -> &mut E,
	/// The field as seen from the embedded record.
	inner: Box<I>,
}

impl<R, E: 'static> FieldAccess<R> for Projected<R, E, dyn FieldAccess<E>> {
	fn get<'a>(&self, record: &'a R) -> &'a dyn AttributeValue {
		self.inner.get((self.get)(record))
	}

	fn get_mut<'a>(&self, record: &'a mut R) -> &'a mut dyn AttributeValue {
		self.inner.get_mut((self.get_mut)(record))
	}
}

impl<R: 'static, E: 'static> Embedding<R> for Projected<R, E, dyn Embedding<E>> {
	fn fields(&self) -> Vec<Field<R>> {
		self.inner.fields().into_iter().map(|field| field.project(self.get, self.get_mut)).collect()
	}
}

impl<R, E: 'static> NestedAccess<R> for Projected<R, E, dyn NestedAccess<E>> {
	fn is_zero(&self, record: &R) -> bool {
		self.inner.is_zero((self.get)(record))
	}

	fn type_name(&self) -> &'static str {
		self.inner.type_name()
	}
}

impl<E: 'static> Field<E> {
	/// Reach this field of an embedded record through its parent.
	fn project<R: 'static>(self, get: fn(&R) -> &E, get_mut: fn(&mut R) -> &mut E) -> Field<R> {
		let kind = match self.kind {
			FieldKind::Value(inner) => FieldKind::Value(Box::new(Projected { get, get_mut, inner })),
			FieldKind::Embedded(inner) => {
				FieldKind::Embedded(Box::new(Projected { get, get_mut, inner }))
			}
			FieldKind::Nested(inner) => {
				FieldKind::Nested(Box::new(Projected { get, get_mut, inner }))
			}
		};
		Field { name: self.name, annotation: self.annotation, exported: self.exported, kind }
	}

	/// Whether the field holds a zero value, embedded fields included.
	fn is_zero(self, record: &E) -> bool {
		match self.kind {
			FieldKind::Value(access) => access.get(record).is_zero(),
			FieldKind::Embedded(embedding) => {
				embedding.fields().into_iter().all(|field| field.is_zero(record))
			}
			FieldKind::Nested(nested) => nested.is_zero(record),
		}
	}
}

impl<R: Record> Shape<R> {
	/// Start an empty description.
	#[must_use]
	pub fn new() -> Self {
		Self { fields: Vec::new() }
	}

	/// Add a field mapped to a single attribute.
	#[must_use]
	pub fn value<T: AttributeValue + 'static>(
		self,
		name: &'static str,
		get: fn(&R) -> &T,
		get_mut: fn(&mut R) -> &mut T,
	) -> Self {
		self.push(name, FieldKind::Value(Box::new(Direct { get, get_mut })))
	}

	/// Add an embedded record. Its fields are encoded and decoded as if they
	/// were declared at this position.
	#[must_use]
	pub fn embed<E: Record>(
		self,
		name: &'static str,
		get: fn(&R) -> &E,
		get_mut: fn(&mut R) -> &mut E,
	) -> Self {
		self.push(name, FieldKind::Embedded(Box::new(Embed { get, get_mut })))
	}

	/// Add a record held as a plain field. Such a field has no attribute
	/// representation: unless skipped, converting it fails with
	/// [`Error::UnsupportedType`].
	#[must_use]
	pub fn nested<E: Record>(self, name: &'static str, get: fn(&R) -> &E) -> Self {
		self.push(name, FieldKind::Nested(Box::new(Nested { get })))
	}

	/// Annotate the field added last, e.g. `"mail,omitempty"`.
	#[must_use]
	pub fn tag(mut self, annotation: &'static str) -> Self {
		if let Some(field) = self.fields.last_mut() {
			field.annotation = Some(annotation);
		}
		self
	}

	/// Mark the field added last as not exported.
	#[must_use]
	pub fn private(mut self) -> Self {
		if let Some(field) = self.fields.last_mut() {
			field.exported = false;
		}
		self
	}

	/// Append an exported, unannotated field.
	fn push(mut self, name: &'static str, kind: FieldKind<R>) -> Self {
		self.fields.push(Field { name, annotation: None, exported: true, kind });
		self
	}
}

impl<R: Record> Default for Shape<R> {
	fn default() -> Self {
		Self::new()
	}
}

impl<R> fmt::Debug for Shape<R> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_list().entries(&self.fields).finish()
	}
}

impl<R> fmt::Debug for Field<R> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let kind = match self.kind {
			FieldKind::Value(_) => "value",
			FieldKind::Embedded(_) => "embedded",
			FieldKind::Nested(_) => "nested",
		};
		f.debug_struct("Field")
			.field("name", &self.name)
			.field("annotation", &self.annotation)
			.field("exported", &self.exported)
			.field("kind", &kind)
			.finish()
	}
}

/// A field produced by [`Walker`].
pub(crate) struct Walked<R> {
	/// The resolved descriptor.
	pub(crate) info: FieldInfo,
	/// How to reach the field.
	pub(crate) access: Access<R>,
}

/// How to reach a walked field.
pub(crate) enum Access<R> {
	/// A value mapped to one attribute.
	Value(Box<dyn FieldAccess<R>>),
	/// A record held as a plain field.
	Nested(Box<dyn NestedAccess<R>>),
}

/// Walks the fields of a record in declaration order.
///
/// Embedded records are expanded in place. Fields that are not exported or
/// annotated with `-` are skipped, and so are read-only fields when walking
/// for encoding.
pub(crate) struct Walker<R> {
	/// Remaining fields, one level per embedded record being walked.
	stack: Vec<vec::IntoIter<Field<R>>>,
	/// Skip fields annotated `ro`.
	skip_read_only: bool,
}

impl<R: Record> Walker<R> {
	/// Walk a freshly built shape of `R`.
	pub(crate) fn new(skip_read_only: bool) -> Self {
		Self { stack: vec![R::shape().fields.into_iter()], skip_read_only }
	}
}

impl<R> Iterator for Walker<R> {
	type Item = Walked<R>;

	fn next(&mut self) -> Option<Self::Item> {
		loop {
			let Some(field) = self.stack.last_mut()?.next() else {
				self.stack.pop();
				continue;
			};
			if !field.exported {
				continue;
			}
			let info = FieldInfo::parse(field.name, field.annotation);
			if info.ignored || (self.skip_read_only && info.read_only) {
				tracing::trace!(field = field.name, "Skipping field");
				continue;
			}
			let access = match field.kind {
				FieldKind::Embedded(embedding) => {
					self.stack.push(embedding.fields().into_iter());
					continue;
				}
				FieldKind::Value(access) => Access::Value(access),
				FieldKind::Nested(nested) => Access::Nested(nested),
			};
			return Some(Walked { info, access });
		}
	}
}

/// The resolved descriptors of every field a record maps, in walk order.
#[must_use]
pub fn describe<R: Record>() -> Vec<FieldInfo> {
	Walker::<R>::new(false).map(|field| field.info).collect()
}

/// The names of the attributes a record maps, leaving out the distinguished
/// name. Suitable as the attribute list of a search.
#[must_use]
pub fn attribute_names<R: Record>() -> Vec<String> {
	describe::<R>().into_iter().filter(|info| !info.is_dn()).map(|info| info.name).collect()
}

/// Whether some field of `R` maps to the distinguished name.
pub(crate) fn has_dn<R: Record>() -> bool {
	Walker::<R>::new(false).any(|field| field.info.is_dn())
}
