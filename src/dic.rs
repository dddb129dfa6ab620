use crate::{
	aff,
	dictionary::InitializeError,
	flags::{Flag, FlagSet},
};
use std::{collections::HashMap, fmt, fs::File, io::Read, path::Path};

#[derive(Debug)]
pub(crate) struct DicFile {
	stems: Vec<Stem>,
	index: HashMap<String, Vec<usize>>,
}

impl DicFile {
	pub(crate) fn new(content: &str, aff: &aff::AffFile) -> Result<Self, InitializeError> {
		DicParser { aff }.parse(content)
	}

	pub(crate) fn file(path: &Path, aff: &aff::AffFile) -> Result<Self, InitializeError> {
		let mut file = File::open(path)?;
		let mut buffer = String::new();
		file.read_to_string(&mut buffer)?;
		Self::new(&buffer, aff)
	}

	pub(crate) fn homonyms<'a>(&'a self, stem: &str) -> impl Iterator<Item = &'a Stem> + 'a {
		self.index
			.get(stem)
			.into_iter()
			.flatten()
			.map(|&at| &self.stems[at])
	}

	pub(crate) fn stems(&self) -> impl Iterator<Item = &Stem> + '_ {
		self.stems.iter()
	}

	fn push(&mut self, stem: Stem) {
		let at = self.stems.len();
		self.index.entry(stem.root.clone()).or_default().push(at);
		self.stems.push(stem);
	}

	/// Insert a stem plus, for capitalized stems, its hidden initial-cap
	/// twin so all-caps forms of its affixed words can validate later
	fn insert(&mut self, stem: Stem, special: &aff::SpecialFlags) {
		let wants_shadow = matches!(stem.case, Casing::Huh | Casing::HuhInit)
			|| (stem.case == Casing::All && !stem.flags.is_empty());

		if wants_shadow && !stem.flags.contains_opt(special.forbidden_word) {
			let shadow_root = initcap(&lowercase(&stem.root));
			if shadow_root != stem.root {
				let mut flags = stem.flags.clone();
				flags.insert(Flag::ONLY_UPCASE);
				self.push(Stem {
					case: Casing::guess(&shadow_root),
					root: shadow_root,
					flags,
					data_fields: Vec::new(),
				});
			}
		}

		self.push(stem);
	}

	// ——— runtime edits

	/// Add a flagless stem, reviving it if it was previously removed
	pub(crate) fn add(&mut self, word: &str, special: &aff::SpecialFlags) {
		self.add_with_flags(word, FlagSet::default(), special);
	}

	pub(crate) fn add_with_flags(
		&mut self,
		word: &str,
		flags: FlagSet,
		special: &aff::SpecialFlags,
	) {
		if let Some(forbidden) = special.forbidden_word {
			if let Some(spots) = self.index.get(word) {
				for &at in spots {
					self.stems[at].flags.remove(forbidden);
				}
			}
		}

		self.insert(
			Stem {
				case: Casing::guess(word),
				root: word.to_owned(),
				flags,
				data_fields: Vec::new(),
			},
			special,
		);
	}

	/// Add a stem carrying the affix flags of an existing example stem
	pub(crate) fn add_with_affix(
		&mut self,
		word: &str,
		example: &str,
		special: &aff::SpecialFlags,
	) -> bool {
		let Some(flags) = self.homonyms(example).next().map(|s| s.flags.clone()) else {
			return false;
		};
		self.add_with_flags(word, flags, special);
		true
	}

	/// Mark every homonym forbidden instead of physically unlinking it
	pub(crate) fn remove(&mut self, word: &str, special: &aff::SpecialFlags) -> bool {
		let Some(forbidden) = special.forbidden_word else {
			return false;
		};
		let Some(spots) = self.index.get(word) else {
			return false;
		};
		for &at in spots {
			self.stems[at].flags.insert(forbidden);
		}
		true
	}
}

impl fmt::Display for DicFile {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		writeln!(f, "{}", self.stems.len())?;
		for stem in &self.stems {
			writeln!(f, "{stem}")?;
		}
		Ok(())
	}
}

struct DicParser<'aff> {
	aff: &'aff aff::AffFile,
}

#[derive(Debug, thiserror::Error)]
enum EntryError {
	#[error("unreadable flag list `{0}`")]
	Flags(String),
	#[error("flag alias {0} is out of range")]
	FlagAlias(usize),
	#[error("morph alias {0} is out of range")]
	MorphAlias(usize),
}

impl DicParser<'_> {
	fn parse(self, content: &str) -> Result<DicFile, InitializeError> {
		let mut lines = content.lines();
		let declared = lines
			.next()
			.and_then(|l| l.trim().parse::<usize>().ok())
			.ok_or(InitializeError::WordCount)?;

		let mut dic = DicFile {
			stems: Vec::with_capacity(declared),
			index: HashMap::with_capacity(declared),
		};

		for line in lines {
			if line.trim().is_empty() || line.starts_with('\t') {
				continue;
			}
			match self.parse_entry(line) {
				Ok(stem) => dic.insert(stem, &self.aff.special),
				Err(err) => log::warn!("skipping dictionary entry `{line}`: {err}"),
			}
		}

		Ok(dic)
	}

	fn parse_entry(&self, line: &str) -> Result<Stem, EntryError> {
		let (head, morph) = split_morph(line);
		let (root, flag_field) = split_flags(head);

		let mut root = root.replace("\\/", "/");
		let options = &self.aff.options;
		if !options.ignore.is_empty() {
			root.retain(|c| !options.ignore.contains(&c));
		}

		let flags = match flag_field {
			Some(field) => self.parse_flag_field(field)?,
			None => FlagSet::default(),
		};

		let data_fields = match morph {
			Some(morph) => self.parse_morph(morph)?,
			None => Vec::new(),
		};

		Ok(Stem {
			case: Casing::guess(&root),
			root,
			flags,
			data_fields,
		})
	}

	/// A numeric field is an `AF` alias when the table exists
	fn parse_flag_field(&self, field: &str) -> Result<FlagSet, EntryError> {
		let options = &self.aff.options;

		if !options.flag_aliases.is_empty() && field.bytes().all(|b| b.is_ascii_digit()) {
			let ordinal: usize = field
				.parse()
				.map_err(|_| EntryError::Flags(field.to_owned()))?;
			return options
				.flag_aliases
				.get(ordinal.wrapping_sub(1))
				.cloned()
				.ok_or(EntryError::FlagAlias(ordinal));
		}

		let (rest, flags) = options
			.flag_ty
			.parse_flags()(field)
			.map_err(|_| EntryError::Flags(field.to_owned()))?;
		if !rest.is_empty() {
			return Err(EntryError::Flags(field.to_owned()));
		}
		Ok(flags)
	}

	/// A lone numeric morph field is an `AM` alias when the table exists
	fn parse_morph(&self, morph: &str) -> Result<Vec<DataField>, EntryError> {
		let options = &self.aff.options;
		let morph = morph.trim();

		if !options.morph_aliases.is_empty() && morph.bytes().all(|b| b.is_ascii_digit()) {
			if let Ok(ordinal) = morph.parse::<usize>() {
				return options
					.morph_aliases
					.get(ordinal.wrapping_sub(1))
					.cloned()
					.ok_or(EntryError::MorphAlias(ordinal));
			}
		}

		let mut fields = Vec::new();
		for token in morph.split_whitespace() {
			match DataField::parse(token) {
				Some(field) => fields.push(field),
				None => log::warn!("ignoring data field `{token}`"),
			}
		}
		Ok(fields)
	}
}

/// Split an entry at its morphological boundary: a tab, or a space before
/// a two-letter `xx:` field introducer
fn split_morph(line: &str) -> (&str, Option<&str>) {
	if let Some(at) = line.find('\t') {
		return (&line[..at], Some(&line[at + 1..]));
	}

	let bytes = line.as_bytes();
	for (i, w) in bytes.windows(4).enumerate() {
		if w[0] == b' '
			&& w[1].is_ascii_alphanumeric()
			&& w[2].is_ascii_alphanumeric()
			&& w[3] == b':'
		{
			return (&line[..i], Some(&line[i + 1..]));
		}
	}
	(line, None)
}

/// Split `root/flags` at the first slash not escaped as `\/`
fn split_flags(head: &str) -> (&str, Option<&str>) {
	let mut escaped = false;
	for (at, c) in head.char_indices() {
		match c {
			'\\' => escaped = !escaped,
			'/' if !escaped => return (&head[..at], Some(&head[at + 1..])),
			_ => escaped = false,
		}
	}
	(head, None)
}

pub(crate) fn lowercase(s: &str) -> String {
	s.chars().flat_map(char::to_lowercase).collect()
}

pub(crate) fn initcap(s: &str) -> String {
	let mut chars = s.chars();
	chars.next().map_or_else(String::new, |first| {
		first.to_uppercase().chain(chars).collect()
	})
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Stem {
	pub(crate) root: String,
	pub(crate) flags: FlagSet,
	pub(crate) data_fields: Vec<DataField>,
	pub(crate) case: Casing,
}

impl Stem {
	/// `ph:` alternative spellings attached to this stem
	pub(crate) fn alt_spellings(&self) -> impl Iterator<Item = &str> {
		self.data_fields.iter().filter_map(|f| match f {
			DataField::Alternative(alt) => Some(alt.as_str()),
			_ => None,
		})
	}
}

impl fmt::Display for Stem {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.root)?;
		let mut flags = self.flags.iter().peekable();
		if flags.peek().is_some() {
			write!(f, "/")?;
			for flag in flags {
				write!(f, "{flag}")?;
			}
		}
		for data in &self.data_fields {
			write!(f, " {data}")?;
		}
		Ok(())
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Casing {
	/// All lowercase (“foo”)
	No,
	/// Titlecase, only initial letter is capitalized (“Foo”)
	Init,
	/// All uppercase (“FOO”)
	All,
	/// Mixed capitalization (“fooBar”)
	Huh,
	/// Mixed capitalization, first letter is capitalized (“FooBar”)
	HuhInit,
}

impl Casing {
	/// Only letters weigh in, so “OpenOffice.org” still counts as mixed
	/// and “NASA.” as all-caps
	pub(crate) fn guess(s: &str) -> Self {
		let mut letters = s.chars().filter(|c| c.is_alphabetic());
		let first_is_upper = letters.next().is_some_and(char::is_uppercase);
		let any_upper = letters.clone().any(char::is_uppercase);
		let any_lower = letters.any(char::is_lowercase);

		match (first_is_upper, any_upper, any_lower) {
			(false, false, _) => Self::No,
			(true, false, _) => Self::Init,
			(true, true, false) => Self::All,
			(true, true, true) => Self::HuhInit,
			(false, true, _) => Self::Huh,
		}
	}
}

// TODO: use &str
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum DataField {
	Alternative(String),
	Stem(String),
	Allomorph(String),
	PartOfSpeech(String),

	DerivationalSuffix(String),
	InflectionalSuffix(String),
	TerminalSuffix(String),

	// These are reserved but not used
	DerivationalPrefix(String),
	InflectionalPrefix(String),
	TerminalPrefix(String),

	SurfacePrefix(String),
	PartsOfCompound(String),
}

impl DataField {
	pub(crate) fn parse(token: &str) -> Option<Self> {
		let (code, value) = token.split_once(':')?;
		let value = value.to_owned();

		match code {
			"ph" => Some(Self::Alternative(value)),
			"st" => Some(Self::Stem(value)),
			"al" => Some(Self::Allomorph(value)),
			"po" => Some(Self::PartOfSpeech(value)),

			"ds" => Some(Self::DerivationalSuffix(value)),
			"is" => Some(Self::InflectionalSuffix(value)),
			"ts" => Some(Self::TerminalSuffix(value)),

			"dp" => Some(Self::DerivationalPrefix(value)),
			"ip" => Some(Self::InflectionalPrefix(value)),
			"tp" => Some(Self::TerminalPrefix(value)),

			"sp" => Some(Self::SurfacePrefix(value)),
			"pa" => Some(Self::PartsOfCompound(value)),

			_ => None,
		}
	}
}

impl fmt::Display for DataField {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Alternative(alter) => write!(f, "ph:{alter}"),
			Self::Stem(stem) => write!(f, "st:{stem}"),
			Self::Allomorph(al) => write!(f, "al:{al}"),
			Self::PartOfSpeech(po) => write!(f, "po:{po}"),

			Self::DerivationalSuffix(ds) => write!(f, "ds:{ds}"),
			Self::InflectionalSuffix(is) => write!(f, "is:{is}"),
			Self::TerminalSuffix(ts) => write!(f, "ts:{ts}"),

			Self::DerivationalPrefix(dp) => write!(f, "dp:{dp}"),
			Self::InflectionalPrefix(ip) => write!(f, "ip:{ip}"),
			Self::TerminalPrefix(tp) => write!(f, "tp:{tp}"),

			Self::SurfacePrefix(sp) => write!(f, "sp:{sp}"),
			Self::PartsOfCompound(pa) => write!(f, "pa:{pa}"),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::aff::AffFile;

	const TEST_WORD: &str = "hello";

	#[test]
	fn can_parse_every_data_field_form() {
		macro_rules! test {
			($source:literal => $res:expr) => {{
				use DataField::*;
				assert_eq!(DataField::parse($source), Some($res));
			}};
		}

		test!("ph:hello" => Alternative(TEST_WORD.into()));
		test!("st:hello" => Stem(TEST_WORD.into()));
		test!("al:hello" => Allomorph(TEST_WORD.into()));
		test!("po:hello" => PartOfSpeech(TEST_WORD.into()));

		test!("ds:hello" => DerivationalSuffix(TEST_WORD.into()));
		test!("is:hello" => InflectionalSuffix(TEST_WORD.into()));
		test!("ts:hello" => TerminalSuffix(TEST_WORD.into()));

		test!("dp:hello" => DerivationalPrefix(TEST_WORD.into()));
		test!("ip:hello" => InflectionalPrefix(TEST_WORD.into()));
		test!("tp:hello" => TerminalPrefix(TEST_WORD.into()));

		test!("sp:hello" => SurfacePrefix(TEST_WORD.into()));
		test!("pa:hello" => PartsOfCompound(TEST_WORD.into()));

		assert_eq!(DataField::parse("zz:hello"), None);
		assert_eq!(DataField::parse("hello"), None);
	}

	#[test]
	fn morph_boundary_is_tab_or_field_introducer() {
		assert_eq!(split_morph("word\tpo:noun"), ("word", Some("po:noun")));
		assert_eq!(split_morph("word/AB ph:hello"), ("word/AB", Some("ph:hello")));
		assert_eq!(split_morph("can't"), ("can't", None));
	}

	#[test]
	fn escaped_slashes_stay_in_the_root() {
		assert_eq!(split_flags("a\\/b/XY"), ("a\\/b", Some("XY")));
		assert_eq!(split_flags("plain"), ("plain", None));
	}

	#[test]
	fn casing_ignores_punctuation() {
		assert_eq!(Casing::guess("foo"), Casing::No);
		assert_eq!(Casing::guess("Foo"), Casing::Init);
		assert_eq!(Casing::guess("FOO"), Casing::All);
		assert_eq!(Casing::guess("fooBar"), Casing::Huh);
		assert_eq!(Casing::guess("FooBar"), Casing::HuhInit);
		assert_eq!(Casing::guess("NASA."), Casing::All);
		assert_eq!(Casing::guess("OpenOffice.org"), Casing::HuhInit);
	}

	#[test]
	fn bad_word_count_is_a_distinct_error() {
		let aff = AffFile::new("").unwrap();
		let err = DicFile::new("not-a-number\nfoo\n", &aff).unwrap_err();
		assert!(matches!(err, InitializeError::WordCount));
	}

	#[test]
	fn malformed_entries_are_skipped_not_fatal() {
		let aff = AffFile::new("AF 1\nAF AB\n").unwrap();
		// alias 9 does not exist; the other entries still load
		let dic = DicFile::new("3\nfoo/1\nbad/9\nbar\n", &aff).unwrap();
		assert_eq!(dic.homonyms("foo").count(), 1);
		assert_eq!(dic.homonyms("bad").count(), 0);
		assert_eq!(dic.homonyms("bar").count(), 1);
	}

	#[test]
	fn capitalized_stems_grow_a_hidden_shadow() {
		let aff = AffFile::new("SFX S N 1\nSFX S 0 's .\n").unwrap();
		let dic = DicFile::new("1\nUNICEF/S\n", &aff).unwrap();

		let shadow = dic.homonyms("Unicef").next().expect("shadow should exist");
		assert!(shadow.flags.contains(Flag::ONLY_UPCASE));
		// the shadow keeps the affix flags of its source
		assert!(shadow.flags.iter().count() > 1);
	}

	#[test]
	fn remove_marks_homonyms_forbidden() {
		let aff = AffFile::new("FORBIDDENWORD *\n").unwrap();
		let mut dic = DicFile::new("1\nfoo\n", &aff).unwrap();

		assert!(dic.remove("foo", &aff.special));
		let forbidden = aff.special.forbidden_word.unwrap();
		assert!(dic.homonyms("foo").all(|s| s.flags.contains(forbidden)));

		// adding it back clears the mark
		dic.add("foo", &aff.special);
		assert!(dic.homonyms("foo").any(|s| !s.flags.contains(forbidden)));
	}
}
