use crate::{
	compound::{CompoundPattern, CompoundRule},
	condition::Condition,
	dic::DataField,
	dictionary::InitializeError,
	flags::{Flag, FlagSet, FlagType},
	phonet::PhonetTable,
	replist::{RepList, ReplacementTable},
	trie::Trie,
};
use std::{
	collections::HashMap,
	fmt,
	fs::File,
	io::Read,
	iter::Peekable,
	marker::PhantomData,
	path::Path,
	str::{FromStr, Lines},
};

pub(crate) struct AffFile {
	pub(crate) options: Options,
	pub(crate) special: SpecialFlags,

	pub(crate) prefixes: Vec<Affix<Prefix>>,
	pub(crate) suffixes: Vec<Affix<Suffix>>,
	/// Prefix rules keyed by their added text
	pub(crate) prefix_index: Trie<usize>,
	/// Suffix rules keyed by their added text, reversed
	pub(crate) suffix_index: Trie<usize>,
	/// Rule positions per flag, for affixed-form expansion
	pub(crate) prefix_flags: HashMap<Flag, Vec<usize>>,
	pub(crate) suffix_flags: HashMap<Flag, Vec<usize>>,
	/// Whether any rule carries continuation classes; gates the two-level
	/// suffix search
	pub(crate) has_cont_classes: bool,

	pub(crate) phonet: Option<PhonetTable>,
}

impl AffFile {
	pub(crate) fn new(content: &str) -> Result<Self, InitializeError> {
		let AffParser {
			options,
			special,
			prefixes,
			suffixes,
			phone_pairs,
		} = AffParser::default().parse(content)?;

		// Computing the lookup indices

		let mut prefix_index = Trie::default();
		let mut prefix_flags: HashMap<Flag, Vec<usize>> = HashMap::new();
		for (at, prefix) in prefixes.iter().enumerate() {
			prefix_index.insert(&prefix.add, at);
			prefix_flags.entry(prefix.flag).or_default().push(at);
		}

		let mut suffix_index = Trie::default();
		let mut suffix_flags: HashMap<Flag, Vec<usize>> = HashMap::new();
		for (at, suffix) in suffixes.iter().enumerate() {
			// You need to reverse suffixes
			let reversed = suffix.add.chars().rev().collect::<String>();
			suffix_index.insert(&reversed, at);
			suffix_flags.entry(suffix.flag).or_default().push(at);
		}

		let has_cont_classes = prefixes
			.iter()
			.map(|p| &p.cont_flags)
			.chain(suffixes.iter().map(|s| &s.cont_flags))
			.any(|set| !set.is_empty());

		let phonet = if phone_pairs.is_empty() {
			None
		} else {
			Some(PhonetTable::new(&phone_pairs))
		};

		Ok(Self {
			options,
			special,
			prefixes,
			suffixes,
			prefix_index,
			suffix_index,
			prefix_flags,
			suffix_flags,
			has_cont_classes,
			phonet,
		})
	}

	pub(crate) fn file(path: &Path) -> Result<Self, InitializeError> {
		let mut file = File::open(path)?;
		let mut buffer = String::new();
		file.read_to_string(&mut buffer)?;
		Self::new(&buffer)
	}
}

#[allow(clippy::struct_excessive_bools)]
#[derive(Debug)]
pub(crate) struct Options {
	/// `SET`
	pub(crate) encoding: Encoding,
	/// `FLAG`
	pub(crate) flag_ty: FlagType,
	/// `COMPLEXPREFIXES`
	pub(crate) complex_prefixes: bool,
	/// `LANG`
	pub(crate) lang: Option<String>,
	/// `IGNORE`
	pub(crate) ignore: Vec<char>,
	/// `AF`
	/// Flag lists can be compressed into an ordinal number
	pub(crate) flag_aliases: Vec<FlagSet>,
	/// `AM`
	pub(crate) morph_aliases: Vec<Vec<DataField>>,

	// ——— for suggestions
	/// `KEY`
	pub(crate) key: String,
	/// `TRY`
	pub(crate) try_chars: Vec<char>,
	/// `MAXCPDSUGS`
	pub(crate) max_compound_suggestions: usize,
	/// `MAXNGRAMSUGS`
	pub(crate) max_ngram_suggestions: usize,
	/// `MAXDIFF`
	/// Value is 1-10
	pub(crate) max_diff: usize,
	/// `ONLYMAXDIFF`
	pub(crate) only_max_diff: bool,
	/// `NOSPLITSUGS`
	pub(crate) no_split_suggestions: bool,
	/// `SUGSWITHDOTS`
	pub(crate) suggest_with_dots: bool,
	/// `REP`
	pub(crate) replacements: ReplacementTable,
	/// `MAP`
	pub(crate) map_related: Vec<Vec<String>>,
	/// `FORBIDWARN`
	pub(crate) forbid_warn: bool,

	// ——— for compounding
	/// `BREAK`
	pub(crate) break_table: Vec<String>,
	/// `COMPOUNDRULE`
	pub(crate) compound_rules: Vec<CompoundRule>,
	/// `COMPOUNDMIN`
	pub(crate) compound_min: usize,
	/// `COMPOUNDMORESUFFIXES`
	pub(crate) compound_more_suffixes: bool,
	/// `COMPOUNDWORDMAX`
	pub(crate) compound_word_max: Option<usize>,
	/// `CHECKCOMPOUNDDUP`
	pub(crate) check_compound_dup: bool,
	/// `CHECKCOMPOUNDREP`
	pub(crate) check_compound_rep: bool,
	/// `CHECKCOMPOUNDCASE`
	pub(crate) check_compound_case: bool,
	/// `CHECKCOMPOUNDTRIPLE`
	pub(crate) check_compound_triple: bool,
	/// `SIMPLIFIEDTRIPLE`
	pub(crate) simplified_triple: bool,
	/// `CHECKCOMPOUNDPATTERN`
	pub(crate) compound_patterns: Vec<CompoundPattern>,

	// ——— other
	/// `FULLSTRIP`
	pub(crate) full_strip: bool,
	/// `ICONV`
	pub(crate) input_conversion: RepList,
	/// `OCONV`
	pub(crate) output_conversion: RepList,
	/// `WORDCHARS`
	pub(crate) word_chars: Vec<char>,
	/// `CHECKSHARPS`
	pub(crate) check_sharps: bool,
}

impl Default for Options {
	fn default() -> Self {
		Self {
			encoding: Encoding::default(),
			flag_ty: FlagType::default(),
			complex_prefixes: false,
			lang: None,
			ignore: Vec::new(),
			flag_aliases: Vec::new(),
			morph_aliases: Vec::new(),

			key: "qwertyuiop|asdfghjkl|zxcvbnm".to_owned(),
			try_chars: Vec::new(),
			max_compound_suggestions: 3,
			max_ngram_suggestions: 4,
			max_diff: 5,
			only_max_diff: false,
			no_split_suggestions: false,
			suggest_with_dots: false,
			replacements: ReplacementTable::default(),
			map_related: Vec::new(),
			forbid_warn: false,

			break_table: vec!["-".to_owned(), "^-".to_owned(), "-$".to_owned()],
			compound_rules: Vec::new(),
			compound_min: 3,
			compound_more_suffixes: false,
			compound_word_max: None,
			check_compound_dup: false,
			check_compound_rep: false,
			check_compound_case: false,
			check_compound_triple: false,
			simplified_triple: false,
			compound_patterns: Vec::new(),

			full_strip: false,
			input_conversion: RepList::default(),
			output_conversion: RepList::default(),
			word_chars: Vec::new(),
			check_sharps: false,
		}
	}
}

/// Directives whose argument is a single flag
#[derive(Debug, Default)]
pub(crate) struct SpecialFlags {
	// ——— for suggestions
	/// `NOSUGGEST`
	pub(crate) no_suggest: Option<Flag>,
	/// `NONGRAMSUGGEST`
	pub(crate) no_ngram_suggest: Option<Flag>,
	/// `WARN`
	pub(crate) warn: Option<Flag>,

	// ——— for compounding
	/// `COMPOUNDFLAG`
	pub(crate) compound: Option<Flag>,
	/// `COMPOUNDBEGIN`
	pub(crate) compound_begin: Option<Flag>,
	/// `COMPOUNDMIDDLE`
	pub(crate) compound_middle: Option<Flag>,
	/// `COMPOUNDEND`, historically also `COMPOUNDLAST`
	pub(crate) compound_end: Option<Flag>,
	/// `ONLYINCOMPOUND`
	pub(crate) only_in_compound: Option<Flag>,
	/// `COMPOUNDPERMITFLAG`
	pub(crate) compound_permit: Option<Flag>,
	/// `COMPOUNDFORBIDFLAG`
	pub(crate) compound_forbid: Option<Flag>,
	/// `COMPOUNDROOT`
	pub(crate) compound_root: Option<Flag>,
	/// `FORCEUCASE`
	pub(crate) force_ucase: Option<Flag>,

	// ——— other
	/// `CIRCUMFIX`
	pub(crate) circumfix: Option<Flag>,
	/// `FORBIDDENWORD`
	pub(crate) forbidden_word: Option<Flag>,
	/// `KEEPCASE`
	pub(crate) keep_case: Option<Flag>,
	/// `NEEDAFFIX`, `PSEUDOROOT`
	/// Can't exist on its own
	pub(crate) need_affix: Option<Flag>,
	/// `SUBSTANDARD`
	pub(crate) substandard: Option<Flag>,
}

#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) enum Encoding {
	#[default]
	Utf8,
	// Can be 1-10, 13-15
	Iso8859(u16),
	Koi8R,
	Koi8U,
	Cp1251,
	IsciiDevanagari,
}

impl FromStr for Encoding {
	type Err = ();

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"UTF-8" => Ok(Self::Utf8),
			"ISO8859-1" => Ok(Self::Iso8859(1)),
			"ISO8859-2" => Ok(Self::Iso8859(2)),
			"ISO8859-3" => Ok(Self::Iso8859(3)),
			"ISO8859-4" => Ok(Self::Iso8859(4)),
			"ISO8859-5" => Ok(Self::Iso8859(5)),
			"ISO8859-6" => Ok(Self::Iso8859(6)),
			"ISO8859-7" => Ok(Self::Iso8859(7)),
			"ISO8859-8" => Ok(Self::Iso8859(8)),
			"ISO8859-9" => Ok(Self::Iso8859(9)),
			"ISO8859-10" => Ok(Self::Iso8859(10)),
			"ISO8859-13" => Ok(Self::Iso8859(13)),
			"ISO8859-14" => Ok(Self::Iso8859(14)),
			"ISO8859-15" => Ok(Self::Iso8859(15)),
			"KOI8-R" => Ok(Self::Koi8R),
			"KOI8-U" => Ok(Self::Koi8U),
			"cp1251" => Ok(Self::Cp1251),
			"ISCII-DEVANAGARI" => Ok(Self::IsciiDevanagari),

			_ => Err(()),
		}
	}
}

#[derive(Debug, Clone)]
pub(crate) struct Prefix;
#[derive(Debug, Clone)]
pub(crate) struct Suffix;

/// One affix rule line, either a prefix (`PFX`) or a suffix (`SFX`).
/// Both read the same way, so `AFX` stands for either here:
///
/// ```aff
/// AFX A Y 1
/// AFX A   0     re      .
/// #   ^fg ^strp ^add    ^cond
/// ````
#[derive(Debug, Clone)]
pub(crate) struct Affix<T> {
	pub(crate) flag: Flag,
	pub(crate) cross_product: bool,

	pub(crate) strip: String,
	/// Is either the prefix or the suffix text
	pub(crate) add: String,
	pub(crate) condition: Option<Condition>,
	/// Continuation classes carried behind `add/`
	pub(crate) cont_flags: FlagSet,
	pub(crate) data_fields: Vec<DataField>,

	_affix_type: PhantomData<T>,
}

impl Affix<Prefix> {
	/// Undo this prefix on `word`; the restored root is returned only when
	/// the condition holds on it
	pub(crate) fn to_stem(&self, word: &str, full_strip: bool) -> Option<String> {
		let rest = word.strip_prefix(&self.add)?;
		if rest.is_empty() && !full_strip {
			return None;
		}
		let stem = format!("{}{rest}", self.strip);
		match &self.condition {
			Some(cond) if !cond.matches_prefix(&stem) => None,
			_ => Some(stem),
		}
	}

	/// Apply this prefix to a root, the inverse of [`Self::to_stem`]
	pub(crate) fn apply(&self, root: &str, full_strip: bool) -> Option<String> {
		let rest = root.strip_prefix(&self.strip)?;
		if rest.is_empty() && !full_strip {
			return None;
		}
		if let Some(cond) = &self.condition {
			if !cond.matches_prefix(root) {
				return None;
			}
		}
		Some(format!("{}{rest}", self.add))
	}
}

impl Affix<Suffix> {
	/// Undo this suffix on `word`; the restored root is returned only when
	/// the condition holds on it
	pub(crate) fn to_stem(&self, word: &str, full_strip: bool) -> Option<String> {
		let rest = word.strip_suffix(&self.add)?;
		if rest.is_empty() && !full_strip {
			return None;
		}
		let stem = format!("{rest}{}", self.strip);
		match &self.condition {
			Some(cond) if !cond.matches_suffix(&stem) => None,
			_ => Some(stem),
		}
	}

	/// Apply this suffix to a root, the inverse of [`Self::to_stem`]
	pub(crate) fn apply(&self, root: &str, full_strip: bool) -> Option<String> {
		let rest = root.strip_suffix(&self.strip)?;
		if rest.is_empty() && !full_strip {
			return None;
		}
		if let Some(cond) = &self.condition {
			if !cond.matches_suffix(root) {
				return None;
			}
		}
		Some(format!("{rest}{}", self.add))
	}
}

impl fmt::Display for Affix<Prefix> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "Prefix({}-, ", self.add,)?;
		if let Some(condition) = &self.condition {
			write!(f, "on {condition}, ")?;
		}
		write!(
			f,
			"{}{}",
			self.flag,
			if self.cross_product { "×" } else { "" }
		)?;
		if !self.strip.is_empty() {
			write!(f, ", -{}", self.strip)?;
		}
		write!(f, ")")
	}
}

impl fmt::Display for Affix<Suffix> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "Suffix(-{}, ", self.add,)?;
		if let Some(condition) = &self.condition {
			write!(f, "on {condition}, ")?;
		}
		write!(
			f,
			"{}{}",
			self.flag,
			if self.cross_product { "×" } else { "" }
		)?;
		if !self.strip.is_empty() {
			write!(f, ", -{}", self.strip)?;
		}
		write!(f, ")")
	}
}

#[derive(Debug, thiserror::Error)]
enum DirectiveError {
	#[error("unknown directive")]
	Unknown,
	#[error("missing argument")]
	MissingArgument,
	#[error("unreadable argument `{0}`")]
	Argument(String),
	#[error("unreadable flag `{0}`")]
	BadFlag(String),
}

#[derive(Default)]
struct AffParser {
	options: Options,
	special: SpecialFlags,
	prefixes: Vec<Affix<Prefix>>,
	suffixes: Vec<Affix<Suffix>>,
	phone_pairs: Vec<(String, String)>,
}

impl AffParser {
	fn parse(mut self, content: &str) -> Result<Self, InitializeError> {
		let mut lines = content.lines().peekable();

		while let Some(line) = lines.next() {
			let line = line.trim_end();
			if line.trim().is_empty() || line.starts_with('#') {
				continue;
			}
			if let Err(err) = self.parse_directive(line, &mut lines) {
				log::warn!("skipping affix line `{line}`: {err}");
			}
		}

		Ok(self)
	}

	#[allow(clippy::too_many_lines)]
	/// Takes care of one directive line, pulling continuation lines off
	/// `lines` for table directives
	fn parse_directive<'a>(
		&mut self,
		line: &str,
		lines: &mut Peekable<Lines<'a>>,
	) -> Result<(), DirectiveError> {
		let mut tokens = line.split_whitespace();
		let name = tokens.next().ok_or(DirectiveError::MissingArgument)?;
		let arg = tokens.next();

		let arg_or = || arg.ok_or(DirectiveError::MissingArgument);
		let chars_arg = || arg_or().map(|s| s.chars().collect::<Vec<char>>());

		match name {
			"SET" => {
				let encoding = arg_or()?;
				self.options.encoding = Encoding::from_str(encoding)
					.map_err(|()| DirectiveError::Argument(encoding.to_owned()))?;
			}
			"FLAG" => {
				let flag_ty = arg_or()?;
				self.options.flag_ty = FlagType::from_str(flag_ty)
					.map_err(|()| DirectiveError::Argument(flag_ty.to_owned()))?;
			}
			"COMPLEXPREFIXES" => self.options.complex_prefixes = true,
			"LANG" => self.options.lang = Some(arg_or()?.to_owned()),
			"IGNORE" => self.options.ignore = chars_arg()?,

			"AF" => {
				let count = parse_count(arg_or()?)?;
				let flag_ty = self.options.flag_ty;
				let aliases = &mut self.options.flag_aliases;
				consume_table("AF", count, lines, |payload| {
					match all_consuming_flags(flag_ty, payload) {
						Ok(flags) => aliases.push(flags),
						Err(err) => log::warn!("skipping AF alias `{payload}`: {err}"),
					}
				});
			}
			"AM" => {
				let count = parse_count(arg_or()?)?;
				let aliases = &mut self.options.morph_aliases;
				consume_table("AM", count, lines, |payload| {
					let fields = payload
						.split_whitespace()
						.filter_map(DataField::parse)
						.collect();
					aliases.push(fields);
				});
			}

			// ——— for suggestions
			"KEY" => self.options.key = arg_or()?.to_owned(),
			"TRY" => self.options.try_chars = chars_arg()?,
			"NOSUGGEST" => self.special.no_suggest = Some(self.parse_flag(arg_or()?)?),
			"NONGRAMSUGGEST" => self.special.no_ngram_suggest = Some(self.parse_flag(arg_or()?)?),
			"WARN" => self.special.warn = Some(self.parse_flag(arg_or()?)?),
			"FORBIDWARN" => self.options.forbid_warn = true,
			"MAXCPDSUGS" => self.options.max_compound_suggestions = parse_count(arg_or()?)?,
			"MAXNGRAMSUGS" => self.options.max_ngram_suggestions = parse_count(arg_or()?)?,
			"MAXDIFF" => {
				let num = parse_count(arg_or()?)?;
				if (1..=10).contains(&num) {
					self.options.max_diff = num;
				} else {
					return Err(DirectiveError::Argument(num.to_string()));
				}
			}
			"ONLYMAXDIFF" => self.options.only_max_diff = true,
			"NOSPLITSUGS" => self.options.no_split_suggestions = true,
			"SUGSWITHDOTS" => self.options.suggest_with_dots = true,
			"REP" => {
				let count = parse_count(arg_or()?)?;
				let replacements = &mut self.options.replacements;
				consume_table("REP", count, lines, |payload| {
					match payload.split_once(char::is_whitespace) {
						Some((pattern, out)) => replacements.add(pattern, out.trim()),
						None => log::warn!("skipping REP entry `{payload}`"),
					}
				});
			}
			"MAP" => {
				let count = parse_count(arg_or()?)?;
				let map_related = &mut self.options.map_related;
				consume_table("MAP", count, lines, |payload| {
					map_related.push(parse_map_set(payload));
				});
			}
			"PHONE" => {
				let count = parse_count(arg_or()?)?;
				let pairs = &mut self.phone_pairs;
				consume_table("PHONE", count, lines, |payload| {
					let (pattern, out) = payload
						.split_once(char::is_whitespace)
						.map_or((payload, ""), |(p, o)| (p, o.trim()));
					pairs.push((pattern.to_owned(), out.to_owned()));
				});
			}

			// ——— for compounding
			"BREAK" => {
				let count = parse_count(arg_or()?)?;
				self.options.break_table = Vec::with_capacity(count);
				let table = &mut self.options.break_table;
				consume_table("BREAK", count, lines, |payload| {
					table.push(payload.to_owned());
				});
			}
			"COMPOUNDRULE" => {
				let count = parse_count(arg_or()?)?;
				let flag_ty = self.options.flag_ty;
				let rules = &mut self.options.compound_rules;
				consume_table("COMPOUNDRULE", count, lines, |payload| {
					match CompoundRule::parse(payload, flag_ty) {
						Ok(rule) => rules.push(rule),
						Err(err) => log::warn!("skipping compound rule `{payload}`: {err}"),
					}
				});
			}
			"CHECKCOMPOUNDPATTERN" => {
				let count = parse_count(arg_or()?)?;
				let flag_ty = self.options.flag_ty;
				let patterns = &mut self.options.compound_patterns;
				consume_table("CHECKCOMPOUNDPATTERN", count, lines, |payload| {
					match CompoundPattern::parse(payload, flag_ty) {
						Ok(pattern) => patterns.push(pattern),
						Err(err) => log::warn!("skipping compound pattern `{payload}`: {err}"),
					}
				});
			}
			"COMPOUNDMIN" => self.options.compound_min = parse_count(arg_or()?)?.max(1),
			"COMPOUNDWORDMAX" => self.options.compound_word_max = Some(parse_count(arg_or()?)?),
			"COMPOUNDMORESUFFIXES" => self.options.compound_more_suffixes = true,
			"COMPOUNDFLAG" => self.special.compound = Some(self.parse_flag(arg_or()?)?),
			"COMPOUNDBEGIN" => self.special.compound_begin = Some(self.parse_flag(arg_or()?)?),
			"COMPOUNDMIDDLE" => self.special.compound_middle = Some(self.parse_flag(arg_or()?)?),
			"COMPOUNDEND" | "COMPOUNDLAST" => {
				self.special.compound_end = Some(self.parse_flag(arg_or()?)?);
			}
			"ONLYINCOMPOUND" => self.special.only_in_compound = Some(self.parse_flag(arg_or()?)?),
			"COMPOUNDPERMITFLAG" => {
				self.special.compound_permit = Some(self.parse_flag(arg_or()?)?);
			}
			"COMPOUNDFORBIDFLAG" => {
				self.special.compound_forbid = Some(self.parse_flag(arg_or()?)?);
			}
			"COMPOUNDROOT" => self.special.compound_root = Some(self.parse_flag(arg_or()?)?),
			"FORCEUCASE" => self.special.force_ucase = Some(self.parse_flag(arg_or()?)?),
			"CHECKCOMPOUNDDUP" => self.options.check_compound_dup = true,
			"CHECKCOMPOUNDREP" => self.options.check_compound_rep = true,
			"CHECKCOMPOUNDCASE" => self.options.check_compound_case = true,
			"CHECKCOMPOUNDTRIPLE" => self.options.check_compound_triple = true,
			"SIMPLIFIEDTRIPLE" => self.options.simplified_triple = true,

			// ——— for affix creation
			"PFX" => {
				let (flag, cross_product, count) = self.parse_affix_header(arg_or()?, &mut tokens)?;
				let flag_ty = self.options.flag_ty;
				let aliases = &self.options.flag_aliases;
				let rules = &mut self.prefixes;
				consume_table("PFX", count, lines, |payload| {
					match parse_affix_line(payload, flag, cross_product, flag_ty, aliases) {
						Ok(affix) => rules.push(affix),
						Err(err) => log::warn!("skipping prefix rule `{payload}`: {err}"),
					}
				});
			}
			"SFX" => {
				let (flag, cross_product, count) = self.parse_affix_header(arg_or()?, &mut tokens)?;
				let flag_ty = self.options.flag_ty;
				let aliases = &self.options.flag_aliases;
				let rules = &mut self.suffixes;
				consume_table("SFX", count, lines, |payload| {
					match parse_affix_line(payload, flag, cross_product, flag_ty, aliases) {
						Ok(affix) => rules.push(affix),
						Err(err) => log::warn!("skipping suffix rule `{payload}`: {err}"),
					}
				});
			}

			// ——— other
			"CIRCUMFIX" => self.special.circumfix = Some(self.parse_flag(arg_or()?)?),
			"FORBIDDENWORD" => self.special.forbidden_word = Some(self.parse_flag(arg_or()?)?),
			"FULLSTRIP" => self.options.full_strip = true,
			"KEEPCASE" => self.special.keep_case = Some(self.parse_flag(arg_or()?)?),
			"NEEDAFFIX" | "PSEUDOROOT" => {
				self.special.need_affix = Some(self.parse_flag(arg_or()?)?);
			}
			"SUBSTANDARD" => self.special.substandard = Some(self.parse_flag(arg_or()?)?),
			"ICONV" => {
				let count = parse_count(arg_or()?)?;
				let table = &mut self.options.input_conversion;
				consume_table("ICONV", count, lines, |payload| {
					match payload.split_once(char::is_whitespace) {
						Some((pattern, out)) => table.add(pattern, out.trim()),
						None => log::warn!("skipping ICONV entry `{payload}`"),
					}
				});
			}
			"OCONV" => {
				let count = parse_count(arg_or()?)?;
				let table = &mut self.options.output_conversion;
				consume_table("OCONV", count, lines, |payload| {
					match payload.split_once(char::is_whitespace) {
						Some((pattern, out)) => table.add(pattern, out.trim()),
						None => log::warn!("skipping OCONV entry `{payload}`"),
					}
				});
			}
			"WORDCHARS" => self.options.word_chars = chars_arg()?,
			"CHECKSHARPS" => self.options.check_sharps = true,

			_ => return Err(DirectiveError::Unknown),
		}

		Ok(())
	}

	/// `PFX`/`SFX` header: flag, cross product marker, rule count
	fn parse_affix_header<'a>(
		&self,
		flag_token: &str,
		tokens: &mut impl Iterator<Item = &'a str>,
	) -> Result<(Flag, bool, usize), DirectiveError> {
		let flag = self.parse_flag(flag_token)?;
		let cross_product = match tokens.next() {
			Some("Y") => true,
			Some("N") => false,
			other => {
				return Err(DirectiveError::Argument(
					other.unwrap_or_default().to_owned(),
				))
			}
		};
		let count = parse_count(tokens.next().ok_or(DirectiveError::MissingArgument)?)?;
		Ok((flag, cross_product, count))
	}

	fn parse_flag(&self, token: &str) -> Result<Flag, DirectiveError> {
		let (rest, flag) = self
			.options
			.flag_ty
			.parse_flag()(token)
			.map_err(|_| DirectiveError::BadFlag(token.to_owned()))?;
		if rest.is_empty() {
			Ok(flag)
		} else {
			Err(DirectiveError::BadFlag(token.to_owned()))
		}
	}
}

fn parse_count(token: &str) -> Result<usize, DirectiveError> {
	token
		.parse()
		.map_err(|_| DirectiveError::Argument(token.to_owned()))
}

fn all_consuming_flags(flag_ty: FlagType, token: &str) -> Result<FlagSet, DirectiveError> {
	let (rest, flags) =
		flag_ty.parse_flags()(token).map_err(|_| DirectiveError::BadFlag(token.to_owned()))?;
	if rest.is_empty() {
		Ok(flags)
	} else {
		Err(DirectiveError::BadFlag(token.to_owned()))
	}
}

/// Decode a flag list that may be an `AF` alias ordinal
fn decode_flags(
	flag_ty: FlagType,
	aliases: &[FlagSet],
	token: &str,
) -> Result<FlagSet, DirectiveError> {
	if !aliases.is_empty() && token.bytes().all(|b| b.is_ascii_digit()) {
		let ordinal: usize = token
			.parse()
			.map_err(|_| DirectiveError::BadFlag(token.to_owned()))?;
		return aliases
			.get(ordinal.wrapping_sub(1))
			.cloned()
			.ok_or_else(|| DirectiveError::BadFlag(token.to_owned()));
	}
	all_consuming_flags(flag_ty, token)
}

/// Pull `count` continuation lines tagged with `name` off the iterator,
/// stopping early when the table runs short
fn consume_table<'a>(
	name: &str,
	count: usize,
	lines: &mut Peekable<Lines<'a>>,
	mut each: impl FnMut(&'a str),
) {
	for taken in 0..count {
		let payload = lines.peek().and_then(|line| {
			let rest = line.trim_end().strip_prefix(name)?;
			rest.starts_with(char::is_whitespace)
				.then(|| rest.trim_start())
		});
		let Some(payload) = payload else {
			log::warn!("{name} table declared {count} entries, found {taken}");
			return;
		};
		lines.next();
		each(payload);
	}
}

/// One `MAP` line: plain chars, or multigraphs wrapped in parentheses
fn parse_map_set(payload: &str) -> Vec<String> {
	let mut set = Vec::new();
	let mut chars = payload.chars();
	while let Some(c) = chars.next() {
		if c == '(' {
			let group: String = chars.by_ref().take_while(|&g| g != ')').collect();
			if !group.is_empty() {
				set.push(group);
			}
		} else {
			set.push(c.to_string());
		}
	}
	set
}

/// One `PFX`/`SFX` rule line after the tag: flag again, strip, add with
/// optional `/continuation` flags, condition, morph fields
fn parse_affix_line<T>(
	payload: &str,
	header_flag: Flag,
	cross_product: bool,
	flag_ty: FlagType,
	aliases: &[FlagSet],
) -> Result<Affix<T>, DirectiveError> {
	let mut tokens = payload.split_whitespace();

	let flag_token = tokens.next().ok_or(DirectiveError::MissingArgument)?;
	let (rest, flag) = flag_ty
		.parse_flag()(flag_token)
		.map_err(|_| DirectiveError::BadFlag(flag_token.to_owned()))?;
	if !rest.is_empty() || flag != header_flag {
		return Err(DirectiveError::BadFlag(flag_token.to_owned()));
	}

	let strip = match tokens.next().ok_or(DirectiveError::MissingArgument)? {
		"0" => String::new(),
		s => s.to_owned(),
	};

	let add_token = tokens.next().ok_or(DirectiveError::MissingArgument)?;
	let (add, cont_flags) = match add_token.split_once('/') {
		Some((add, cont)) => (add, decode_flags(flag_ty, aliases, cont)?),
		None => (add_token, FlagSet::default()),
	};
	let add = if add == "0" { String::new() } else { add.to_owned() };

	let condition = match tokens.next() {
		None | Some(".") => None,
		Some(source) => Some(
			Condition::parse(source).map_err(|_| DirectiveError::Argument(source.to_owned()))?,
		),
	};

	let data_fields = tokens.filter_map(DataField::parse).collect();

	Ok(Affix {
		flag,
		cross_product,
		strip,
		add,
		condition,
		cont_flags,
		data_fields,
		_affix_type: PhantomData,
	})
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn iconv_directive() -> Result<(), Box<dyn std::error::Error>> {
		let aff = AffFile::new("ICONV 1\nICONV ' `\n")?;
		assert!(!aff.options.input_conversion.is_empty());
		Ok(())
	}

	#[test]
	fn can_find_suffixes() -> Result<(), Box<dyn std::error::Error>> {
		let directive = "
SFX D Y 4
SFX D   y     ied        [^aeiou]y
SFX D   0     ed         [^ey]
SFX D   0     ed         [aeiou]y
SFX D   0     d          e
";
		let aff = AffFile::new(directive)?;

		let searched_word = "respelled".chars().rev().collect::<String>();
		let results = aff.suffix_index.get_all(&searched_word);
		assert_eq!(results.len(), 3);

		Ok(())
	}

	#[test]
	fn defaults_hold_when_directives_are_absent() -> Result<(), Box<dyn std::error::Error>> {
		let aff = AffFile::new("")?;
		assert_eq!(aff.options.encoding, Encoding::Utf8);
		assert_eq!(aff.options.compound_min, 3);
		assert_eq!(aff.options.max_diff, 5);
		assert_eq!(aff.options.break_table, ["-", "^-", "-$"]);
		Ok(())
	}

	#[test]
	fn unknown_directives_are_skipped() -> Result<(), Box<dyn std::error::Error>> {
		let aff = AffFile::new("SOMETHINGELSE 1\nTRY abc\n")?;
		assert_eq!(aff.options.try_chars, ['a', 'b', 'c']);
		Ok(())
	}

	#[test]
	fn continuation_flags_ride_behind_the_add_text() -> Result<(), Box<dyn std::error::Error>> {
		let aff = AffFile::new("SFX B Y 1\nSFX B 0 y/2 .\n")?;
		assert_eq!(aff.suffixes.len(), 1);
		assert!(!aff.suffixes[0].cont_flags.is_empty());
		assert!(aff.has_cont_classes);
		Ok(())
	}

	#[test]
	fn map_sets_support_multigraphs() {
		assert_eq!(parse_map_set("aáä"), ["a", "á", "ä"]);
		assert_eq!(parse_map_set("s(ss)(ß)"), ["s", "ss", "ß"]);
	}

	#[test]
	fn short_tables_stop_at_the_next_directive() -> Result<(), Box<dyn std::error::Error>> {
		// REP claims two entries but only one follows
		let aff = AffFile::new("REP 2\nREP teh the\nTRY abc\n")?;
		assert!(!aff.options.replacements.is_empty());
		assert_eq!(aff.options.try_chars, ['a', 'b', 'c']);
		Ok(())
	}
}
