//! Flag identities and the four encodings affix files use for them

use nom::{
	bytes::complete::tag,
	character::complete::{satisfy, u16 as u16_p},
	multi::{many1, separated_list1},
	IResult, Parser,
};
use nom_supreme::ParserExt;
use std::{fmt, str::FromStr};

/// An opaque flag identity
///
/// Whatever the on-disk encoding, a flag always fits in 16 bits, so every
/// comparison in the engine is a plain integer one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct Flag(pub(crate) u16);

impl Flag {
	/// Marks the hidden capitalized twin of an all-caps or mixed-case stem,
	/// so `UNICEF'S` can validate through `Unicef` without making `Unicef's`
	/// a real word. Never appears in an affix file.
	pub(crate) const ONLY_UPCASE: Self = Self(u16::MAX);
}

impl fmt::Display for Flag {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match (self.0 >> 8, char::from_u32(u32::from(self.0))) {
			(0, Some(c)) if !c.is_control() => write!(f, "{c}"),
			_ => write!(f, "{}", self.0),
		}
	}
}

/// `FLAG` — how flag lists are written down in the `.aff`/`.dic` pair
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) enum FlagType {
	/// One ASCII character per flag (the default)
	#[default]
	Short,
	/// Two ASCII characters packed big-endian
	Long,
	/// One character, kept as its first UTF-16 code unit
	Utf8,
	/// Decimal numbers, comma separated in lists
	Numeric,
}

impl FromStr for FlagType {
	type Err = ();

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"short" => Ok(Self::Short),
			"long" => Ok(Self::Long),
			"num" | "numeric" => Ok(Self::Numeric),
			"UTF-8" => Ok(Self::Utf8),
			_ => Err(()),
		}
	}
}

impl FlagType {
	pub(crate) fn parse_flag(self) -> impl Fn(&str) -> IResult<&str, Flag> {
		move |i: &str| match self {
			Self::Short => satisfy(|c| c.is_ascii() && !c.is_ascii_whitespace())
				.map(|c| Flag(c as u16))
				.parse(i),
			Self::Long => satisfy(|c| c.is_ascii() && !c.is_ascii_whitespace())
				.array()
				.map(|[c1, c2]: [char; 2]| Flag(((c1 as u16) << 8) | c2 as u16))
				.parse(i),
			Self::Utf8 => satisfy(|c| !c.is_whitespace())
				.map(|c| {
					let mut units = [0_u16; 2];
					Flag(c.encode_utf16(&mut units)[0])
				})
				.parse(i),
			Self::Numeric => u16_p.map(Flag).parse(i),
		}
	}

	pub(crate) fn parse_flags(self) -> impl Fn(&str) -> IResult<&str, FlagSet> {
		move |i: &str| {
			let (i, flags) = match self {
				Self::Short | Self::Long | Self::Utf8 => many1(self.parse_flag())(i)?,
				Self::Numeric => separated_list1(tag(","), self.parse_flag())(i)?,
			};
			Ok((i, FlagSet::new(flags)))
		}
	}

	/// Render a flag back in this encoding, the inverse of [`Self::parse_flag`]
	pub(crate) fn format_flag(self, flag: Flag) -> String {
		match self {
			Self::Short => char::from(u8::try_from(flag.0).unwrap_or(b'?')).to_string(),
			Self::Long => {
				let hi = char::from(u8::try_from(flag.0 >> 8).unwrap_or(b'?'));
				let lo = char::from(u8::try_from(flag.0 & 0xFF).unwrap_or(b'?'));
				format!("{hi}{lo}")
			}
			Self::Utf8 => char::from_u32(u32::from(flag.0)).map_or_else(
				|| {
					// a lone surrogate unit cannot be printed back
					flag.0.to_string()
				},
				|c| c.to_string(),
			),
			Self::Numeric => flag.0.to_string(),
		}
	}
}

/// A sorted, deduplicated set of flags
///
/// Kept sorted so membership tests are a binary search, which matters in the
/// affix and compound loops where flag tests dominate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct FlagSet(Vec<Flag>);

impl FlagSet {
	pub(crate) fn new(mut flags: Vec<Flag>) -> Self {
		flags.sort_unstable();
		flags.dedup();
		Self(flags)
	}

	pub(crate) fn contains(&self, flag: Flag) -> bool {
		self.0.binary_search(&flag).is_ok()
	}

	/// Membership against an optional special flag, absent meaning "never"
	pub(crate) fn contains_opt(&self, flag: Option<Flag>) -> bool {
		flag.is_some_and(|f| self.contains(f))
	}

	pub(crate) fn insert(&mut self, flag: Flag) {
		if let Err(at) = self.0.binary_search(&flag) {
			self.0.insert(at, flag);
		}
	}

	pub(crate) fn remove(&mut self, flag: Flag) {
		if let Ok(at) = self.0.binary_search(&flag) {
			self.0.remove(at);
		}
	}

	pub(crate) fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	pub(crate) fn iter(&self) -> impl Iterator<Item = Flag> + '_ {
		self.0.iter().copied()
	}
}

impl FromIterator<Flag> for FlagSet {
	fn from_iter<I: IntoIterator<Item = Flag>>(iter: I) -> Self {
		Self::new(iter.into_iter().collect())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn roundtrip(fty: FlagType, source: &str) {
		let (rest, flag) = fty.parse_flag()(source).expect("flag should parse");
		assert_eq!(rest, "");
		assert_eq!(fty.format_flag(flag), source);
	}

	#[test]
	fn every_encoding_roundtrips() {
		roundtrip(FlagType::Short, "A");
		roundtrip(FlagType::Short, "~");
		roundtrip(FlagType::Long, "Zx");
		roundtrip(FlagType::Long, "g?");
		roundtrip(FlagType::Utf8, "ő");
		roundtrip(FlagType::Numeric, "7");
		roundtrip(FlagType::Numeric, "65000");
	}

	#[test]
	fn long_flags_pack_big_endian() {
		let (_, flag) = FlagType::Long.parse_flag()("AB").unwrap();
		assert_eq!(flag, Flag((u16::from(b'A') << 8) | u16::from(b'B')));
	}

	#[test]
	fn numeric_lists_are_comma_separated() {
		let (rest, flags) = FlagType::Numeric.parse_flags()("5,3,999").unwrap();
		assert_eq!(rest, "");
		assert!(flags.contains(Flag(3)));
		assert!(flags.contains(Flag(5)));
		assert!(flags.contains(Flag(999)));
		assert!(!flags.contains(Flag(4)));
	}

	#[test]
	fn sets_stay_sorted_through_edits() {
		let mut set = FlagSet::new(vec![Flag(9), Flag(2), Flag(9), Flag(5)]);
		set.insert(Flag(7));
		set.insert(Flag(2));
		set.remove(Flag(5));
		assert_eq!(set.iter().collect::<Vec<_>>(), vec![Flag(2), Flag(7), Flag(9)]);
	}
}
