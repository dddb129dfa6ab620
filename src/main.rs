//! Orthos CLI
//!
//! Checks words against a Hunspell dictionary pair and offers
//! corrections for the ones it rejects.

use clap::Parser;
use orthos::Dictionary;
use std::{
	io::{stdin, stdout, Write},
	path::PathBuf,
};

#[derive(clap::Parser)]
struct Args {
	/// Path to a dictionary pair without extension, `/path/to/en_US`
	dictionary: PathBuf,

	word: Option<String>,

	#[arg(long, short)]
	interactive: bool,

	/// Offer corrections for misspelled words
	#[arg(long, short)]
	suggest: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
	pretty_env_logger::init();

	let args = Args::parse();

	let dict = Dictionary::from_pair(&args.dictionary)?;

	if let Some(word) = args.word {
		lookup_and_print(&dict, &word, args.suggest);
		return Ok(());
	}

	if args.interactive {
		loop {
			print!("lookup word(s) ❯ ");
			stdout().flush()?;

			let mut input = String::new();
			if let 0 = stdin().read_line(&mut input)? {
				return Ok(());
			};
			let input = input.trim();

			input.split_whitespace().for_each(|token| {
				// strip punctuation, except what WORDCHARS claims for words
				let word = token.trim_matches(|c: char| {
					!c.is_alphanumeric() && !dict.word_chars().contains(&c)
				});
				if !word.is_empty() {
					lookup_and_print(&dict, word, args.suggest);
				}
			});
		}
	}

	Err("no action provided".into())
}

fn lookup_and_print(dict: &Dictionary, word: &str, suggest: bool) {
	match dict.lookup(word) {
		Ok(true) => log::info!("Word `{word}` was found in the dictionary"),
		Ok(false) => {
			log::warn!("Word `{word}` wasn't found in the dictionary");
			if suggest {
				let sugs = dict.suggest(word);
				if sugs.is_empty() {
					log::info!("No suggestions for `{word}`");
				} else {
					log::info!("Did you mean: {}", sugs.join(", "));
				}
			}
		}
		Err(err) => log::error!("Could not lookup `{word}`: {err}"),
	}
}
