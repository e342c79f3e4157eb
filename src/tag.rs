//! Resolution of field annotations into attribute descriptors.

/// Annotation token excluding a field entirely.
const IGNORE: &str = "-";
/// Annotation token skipping zero-valued fields when encoding.
const OMIT_EMPTY: &str = "omitempty";
/// Annotation token marking a field read-only.
const READ_ONLY: &str = "ro";

/// How a single record field maps onto an entry attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldInfo {
	/// Name of the attribute the field maps to.
	pub name: String,
	/// The field is never encoded nor decoded.
	pub ignored: bool,
	/// The field is left out of encoded entries while it holds its zero
	/// value.
	pub omit_empty: bool,
	/// The field is populated when decoding but never encoded.
	pub read_only: bool,
}

impl FieldInfo {
	/// Resolve the descriptor of a field from its declared name and optional
	/// annotation.
	///
	/// Without an annotation the attribute name is the declared name with the
	/// first letter lower-cased, or fully lower-cased when it is two
	/// characters long (`DN` becomes `dn`). The first comma separated token
	/// of an annotation overrides the name, unless it is `-` which ignores
	/// the field. The remaining tokens may be `omitempty` or `ro`; anything
	/// else is ignored.
	#[must_use]
	pub fn parse(field: &str, annotation: Option<&str>) -> Self {
		let mut info = FieldInfo {
			name: default_name(field),
			ignored: false,
			omit_empty: false,
			read_only: false,
		};
		let Some(annotation) = annotation else {
			return info;
		};

		let mut tokens = annotation.split(',');
		let name = tokens.next().unwrap_or_default().trim();
		if name == IGNORE {
			info.ignored = true;
			return info;
		}
		if !name.is_empty() {
			info.name = name.to_owned();
		}
		for token in tokens {
			match token.trim() {
				OMIT_EMPTY => info.omit_empty = true,
				READ_ONLY => info.read_only = true,
				_ => {}
			}
		}
		info
	}

	/// Whether the field holds the distinguished name of the entry.
	#[must_use]
	pub fn is_dn(&self) -> bool {
		self.name.eq_ignore_ascii_case("dn")
	}
}

/// Derive the attribute name of a field that carries no name override.
fn default_name(field: &str) -> String {
	let mut chars = field.chars();
	let Some(first) = chars.next() else {
		return String::new();
	};
	let name: String = first.to_lowercase().chain(chars).collect();
	if name.chars().count() == 2 {
		name.to_lowercase()
	} else {
		name
	}
}

#[cfg(test)]
mod tests {
	use super::FieldInfo;

	#[test]
	fn default_names() {
		assert_eq!(FieldInfo::parse("DN", None).name, "dn");
		assert_eq!(FieldInfo::parse("Alpha", None).name, "alpha");
		assert_eq!(FieldInfo::parse("StringSlice", None).name, "stringSlice");
		assert_eq!(FieldInfo::parse("ID", None).name, "id");
		assert_eq!(FieldInfo::parse("UID", None).name, "uID", "Only two letter names collapse");
		assert_eq!(FieldInfo::parse("display_name", None).name, "display_name");
	}

	#[test]
	fn annotation_overrides_name() {
		let info = FieldInfo::parse("Alpha", Some("beta"));
		assert_eq!(info.name, "beta");
		assert!(!info.ignored && !info.omit_empty && !info.read_only);

		let info = FieldInfo::parse("IntZero", Some("intZero, omitempty"));
		assert_eq!(info.name, "intZero");
		assert!(info.omit_empty);
	}

	#[test]
	fn ignored_short_circuits() {
		let info = FieldInfo::parse("Other", Some("-,omitempty,ro"));
		assert!(info.ignored);
		assert!(!info.omit_empty, "Tokens after `-` are not inspected");
		assert!(!info.read_only);
	}

	#[test]
	fn flags() {
		let info = FieldInfo::parse("CreateTimestamp", Some("createTimestamp,ro"));
		assert!(info.read_only);
		assert!(!info.omit_empty);

		let info = FieldInfo::parse("Mail", Some(",omitempty, ro ,unknown"));
		assert_eq!(info.name, "mail", "An empty name token keeps the default name");
		assert!(info.omit_empty && info.read_only);

		let info = FieldInfo::parse("Mail", Some("omitempty"));
		assert_eq!(info.name, "omitempty", "The first token is always the name");
		assert!(!info.omit_empty);
	}

	#[test]
	fn dn_is_case_insensitive() {
		assert!(FieldInfo::parse("Name", Some("DN")).is_dn());
		assert!(FieldInfo::parse("Dn", None).is_dn());
		assert!(!FieldInfo::parse("DistinguishedName", None).is_dn());
	}
}
