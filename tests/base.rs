mod utils;

use orthos::Dictionary;

const BASE_AFFIX: &str = "\
SET UTF-8
TRY esianrtolcdugmphbyfvkwzqxjESIANRTOLCDUGMPHBYFVKWZQXJ'

PFX U Y 1
PFX U 0 un .

SFX S Y 4
SFX S y ies [^aeiou]y
SFX S 0 s [aeiou]y
SFX S 0 es [sxzh]
SFX S 0 s [^sxzhy]

SFX D Y 4
SFX D 0 d e
SFX D y ied [^aeiou]y
SFX D 0 ed [^ey]
SFX D 0 ed [aeiou]y

SFX G Y 2
SFX G e ing e
SFX G 0 ing [^e]

SFX Y Y 1
SFX Y 0 ly .
";

const BASE_DIC: &str = "\
16
create/DSG
imply/DSG
natural/UY
like/DSG
look/DSG
text
hello
rotten
day
sea
side
key/S
happy/S
NASA
etc
Hunspell
";

const BASE_GOOD: [&str; 26] = [
	"created",
	"creates",
	"creating",
	"implied",
	"implies",
	"implying",
	"unnatural",
	"naturally",
	"liked",
	"likes",
	"liking",
	"looked",
	"looks",
	"keys",
	"happies",
	"hello",
	"Hello",
	"HELLO",
	"NASA",
	"NASA.",
	"etc.",
	"text.",
	"rotten day",
	"sea side",
	"Hunspell",
	"HUNSPELL",
];

const BASE_WRONG: [&str; 9] = [
	"texxt",
	"hlelo",
	"tomorow",
	"Nasa",
	"happys",
	"keies",
	"naturaly",
	"seaside",
	"rottenday",
];

#[test]
fn base() -> Result<(), Box<dyn std::error::Error>> {
	utils::test_dictionary_pair(BASE_AFFIX, BASE_DIC, &BASE_GOOD, &BASE_WRONG, None)
}

#[test]
fn empty_store_answers_without_panicking() -> Result<(), Box<dyn std::error::Error>> {
	let dict = Dictionary::from_slice(BASE_AFFIX, "0\n")?;
	assert!(!dict.lookup("anything")?);
	assert!(dict.suggest("anything").is_empty());
	Ok(())
}

#[test]
fn forbidwarn_turns_rare_words_into_errors() -> Result<(), Box<dyn std::error::Error>> {
	let dict = Dictionary::from_slice("WARN W\n", "1\nfoo/W\n")?;
	assert!(dict.lookup("foo")?);

	let strict = Dictionary::from_slice("WARN W\nFORBIDWARN\n", "1\nfoo/W\n")?;
	assert!(!strict.lookup("foo")?);
	Ok(())
}

#[test]
fn wordchars_are_exposed_for_tokenizers() -> Result<(), Box<dyn std::error::Error>> {
	let dict = Dictionary::from_slice("WORDCHARS '.\n", "1\nfoo\n")?;
	assert_eq!(dict.word_chars(), ['\'', '.']);
	Ok(())
}

#[test]
fn overlong_words_are_refused() -> Result<(), Box<dyn std::error::Error>> {
	let dict = Dictionary::from_slice(BASE_AFFIX, BASE_DIC)?;
	let long = "a".repeat(200);
	assert!(dict.lookup(&long).is_err());
	Ok(())
}
