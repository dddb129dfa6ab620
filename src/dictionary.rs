//! High level interface to query dictionary pairs
//!
//! Entrypoint methods are
//! - [`Dictionary::lookup`]: looks though the dictionary to check is word is valid
//! - [`Dictionary::suggest`]: tries to find words close to provide quick/auto-correction

use crate::{aff::AffFile, dic::DicFile};
use std::{io, path::Path};

pub struct Dictionary {
	/// Underlying `.aff` file
	pub(crate) aff: AffFile,
	/// Underlying `.dic` file
	pub(crate) dic: DicFile,
	/// Extra word lists layered on top of the main one
	pub(crate) extra: Vec<DicFile>,
}

/// Ways initializing a [`Dictionary`] could go wrong
#[derive(Debug, thiserror::Error)]
pub enum InitializeError {
	/// Could not parse either `.aff` or `.dic` file
	#[error("Could not parse file: {0}")]
	Parser(String),

	/// The `.dic` file does not open with its word count
	#[error("Dictionary file must start with an entry count")]
	WordCount,

	/// Could not correctly open given files
	#[error(transparent)]
	Io(#[from] io::Error),
}

/// Constructors
impl Dictionary {
	/// # Errors
	///
	/// Will error if either the provided affix or dictionary file are not able
	/// to be parsed.
	pub fn from_slice(aff: &str, dic: &str) -> Result<Self, InitializeError> {
		let aff = AffFile::new(aff)?;
		let dic = DicFile::new(dic, &aff)?;
		Ok(Self {
			aff,
			dic,
			extra: Vec::new(),
		})
	}

	/// Given a path `/path/to/hunspell/en_US`, this function will append `.aff`
	/// and `.dic` and then read those files.
	///
	/// # Errors
	///
	/// Will error if either the provided affix or dictionary file are not able
	/// to be parsed. It will fail too if the function failed to read the given
	/// path.
	pub fn from_pair(base: &Path) -> Result<Self, InitializeError> {
		let aff = AffFile::file(&base.with_extension("aff"))?;
		let dic = DicFile::file(&base.with_extension("dic"), &aff)?;
		Ok(Self {
			aff,
			dic,
			extra: Vec::new(),
		})
	}
}

/// Runtime edits
impl Dictionary {
	/// Layer a personal or domain word list over the main dictionary,
	/// parsed against the same affix file
	///
	/// # Errors
	///
	/// Will error if the extra dictionary content cannot be parsed.
	pub fn add_dic(&mut self, dic: &str) -> Result<(), InitializeError> {
		self.extra.push(DicFile::new(dic, &self.aff)?);
		Ok(())
	}

	/// Register `word` as correct for this session
	pub fn add(&mut self, word: &str) {
		self.dic.add(word, &self.aff.special);
	}

	/// Register `word` with an explicit flag list, written the way a `.dic`
	/// flag field would be. Returns false when the flags don't parse.
	pub fn add_with_flags(&mut self, word: &str, flags: &str) -> bool {
		let parsed = match self.aff.options.flag_ty.parse_flags()(flags) {
			Ok(("", flags)) => flags,
			_ => return false,
		};
		self.dic.add_with_flags(word, parsed, &self.aff.special);
		true
	}

	/// Register `word` inflecting like `example` does. Returns false when
	/// `example` is not in the dictionary.
	pub fn add_with_affix(&mut self, word: &str, example: &str) -> bool {
		self.dic.add_with_affix(word, example, &self.aff.special)
	}

	/// Mark every homonym of `word` as forbidden. Returns false when the
	/// word was not present or no forbidden flag is configured.
	pub fn remove(&mut self, word: &str) -> bool {
		self.dic.remove(word, &self.aff.special)
	}
}

/// Tokenization hints
impl Dictionary {
	/// Extra characters the language treats as part of a word, from the
	/// `WORDCHARS` directive. Tokenizers should not split on these.
	#[must_use]
	pub fn word_chars(&self) -> &[char] {
		&self.aff.options.word_chars
	}
}
