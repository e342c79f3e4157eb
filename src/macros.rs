//! The [`record!`](crate::record) macro.

/// Implement [`Record`](crate::Record) for a struct by listing its fields.
///
/// Fields are listed in the order they should be walked. Each field may be
/// prefixed with `pub` to export it, with `embed` to flatten a field holding
/// another record into this one, or with `nested` for a record held as a
/// plain field. An annotation may follow after `=`.
///
/// Implementing [`MarshalEntry`](crate::MarshalEntry) or
/// [`UnmarshalEntry`](crate::UnmarshalEntry) is not enough for the record to
/// convert itself: list `marshal` and `unmarshal` after the fields to hook
/// them up.
///
/// ```
/// use ldap_record::record;
///
/// #[derive(Debug, Default)]
/// struct Account {
/// 	dn: String,
/// 	uid: String,
/// 	groups: Vec<String>,
/// }
///
/// #[derive(Debug, Default)]
/// struct Person {
/// 	account: Account,
/// 	display_name: String,
/// 	password: String,
/// 	cache: u32,
/// }
///
/// record!(Account { pub dn, pub uid, pub groups = "memberOf,ro" });
/// record!(Person {
/// 	pub embed account,
/// 	pub display_name = "displayName,omitempty",
/// 	pub password = "-",
/// 	cache,
/// });
///
/// let names = ldap_record::attribute_names::<Person>();
/// assert_eq!(names, ["uid", "memberOf", "displayName"]);
/// ```
#[macro_export]
macro_rules! record {
	(@capability marshal) => {
		fn as_marshaler(&self) -> ::core::option::Option<&dyn $crate::MarshalEntry> {
			::core::option::Option::Some(self)
		}
	};
	(@capability unmarshal) => {
		fn as_unmarshaler(&mut self) -> ::core::option::Option<&mut dyn $crate::UnmarshalEntry> {
			::core::option::Option::Some(self)
		}
	};
	(@fields $shape:expr;) => {
		$shape
	};
	(@fields $shape:expr; pub embed $field:ident $(= $tag:literal)? $(, $($rest:tt)*)?) => {
		$crate::record!(
			@fields $shape
				.embed(::core::stringify!($field), |r| &r.$field, |r| &mut r.$field)
				$(.tag($tag))?;
			$($($rest)*)?
		)
	};
	(@fields $shape:expr; embed $field:ident $(= $tag:literal)? $(, $($rest:tt)*)?) => {
		$crate::record!(
			@fields $shape
				.embed(::core::stringify!($field), |r| &r.$field, |r| &mut r.$field)
				$(.tag($tag))?
				.private();
			$($($rest)*)?
		)
	};
	(@fields $shape:expr; pub nested $field:ident $(= $tag:literal)? $(, $($rest:tt)*)?) => {
		$crate::record!(
			@fields $shape
				.nested(::core::stringify!($field), |r| &r.$field)
				$(.tag($tag))?;
			$($($rest)*)?
		)
	};
	(@fields $shape:expr; nested $field:ident $(= $tag:literal)? $(, $($rest:tt)*)?) => {
		$crate::record!(
			@fields $shape
				.nested(::core::stringify!($field), |r| &r.$field)
				$(.tag($tag))?
				.private();
			$($($rest)*)?
		)
	};
	(@fields $shape:expr; pub $field:ident $(= $tag:literal)? $(, $($rest:tt)*)?) => {
		$crate::record!(
			@fields $shape
				.value(::core::stringify!($field), |r| &r.$field, |r| &mut r.$field)
				$(.tag($tag))?;
			$($($rest)*)?
		)
	};
	(@fields $shape:expr; $field:ident $(= $tag:literal)? $(, $($rest:tt)*)?) => {
		$crate::record!(
			@fields $shape
				.value(::core::stringify!($field), |r| &r.$field, |r| &mut r.$field)
				$(.tag($tag))?
				.private();
			$($($rest)*)?
		)
	};
	($record:ty { $($fields:tt)* } $($capability:ident),* $(,)?) => {
		impl $crate::Record for $record {
			fn shape() -> $crate::Shape<Self> {
				$crate::record!(@fields $crate::Shape::<Self>::new(); $($fields)*)
			}

			$($crate::record!(@capability $capability);)*
		}
	};
}
