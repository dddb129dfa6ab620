use orthos::Dictionary;

const AFF: &str = "\
TRY esianrtolcdugmphbyfvkwzESIANRTOLCDUGMPHBYFVKWZ

REP 2
REP teh the
REP f ph
";

const DIC: &str = "\
7
the
hello
rotten
day
photo
horrifying
speech
";

fn dict() -> Dictionary {
	let _ = pretty_env_logger::try_init();
	Dictionary::from_slice(AFF, DIC).expect("fixture pair parses")
}

#[test]
fn replacement_rewrites_come_first() {
	let dict = dict();
	let sugs = dict.suggest("teh");
	assert_eq!(sugs.first().map(String::as_str), Some("the"));
}

#[test]
fn replacement_table_is_not_anchored() {
	let dict = dict();
	assert!(dict.suggest("foto").iter().any(|s| s == "photo"));
}

#[test]
fn swapped_letters_are_recovered() {
	let dict = dict();
	assert!(dict.suggest("hlelo").iter().any(|s| s == "hello"));
}

#[test]
fn a_forgotten_space_is_offered() {
	let dict = dict();
	assert!(dict.suggest("rottenday").iter().any(|s| s == "rotten day"));
}

#[test]
fn similarity_rescues_words_beyond_one_edit() {
	let dict = dict();
	assert!(dict.suggest("horrorfying").iter().any(|s| s == "horrifying"));
	assert!(dict.suggest("peech").iter().any(|s| s == "speech"));
}

#[test]
fn suggestions_are_capped_and_all_spell() {
	let dict = dict();
	for word in ["teh", "hlelo", "rottenday", "horrorfying", "dya"] {
		let sugs = dict.suggest(word);
		assert!(sugs.len() <= 15, "{word} got {} suggestions", sugs.len());
		for sug in &sugs {
			assert!(
				dict.lookup(sug).unwrap_or_default(),
				"suggestion `{sug}` for `{word}` does not spell"
			);
		}
	}
}

#[test]
fn forbidden_words_never_surface_from_similarity() {
	let _ = pretty_env_logger::try_init();
	let aff = "\
FORBIDDENWORD !

SFX S Y 1
SFX S 0 s .
";
	let dict = Dictionary::from_slice(aff, "2\nfine/S\nfines/!\n").unwrap();

	// `fines` is the closest expansion, but the entry forbids it
	let sugs = dict.suggest("fimes");
	assert!(!sugs.iter().any(|s| s == "fines"), "got {sugs:?}");
	assert!(sugs.iter().any(|s| s == "fine"), "got {sugs:?}");
}

#[test]
fn a_listed_word_pair_beats_every_other_guess() {
	let _ = pretty_env_logger::try_init();
	let dict = Dictionary::from_slice("", "2\na lot\nlot\n").unwrap();

	// the pair entry wins outright, `lot` is not offered alongside
	assert_eq!(dict.suggest("alot"), vec!["a lot".to_owned()]);
}

#[test]
fn longer_compounds_are_a_last_resort() {
	let _ = pretty_env_logger::try_init();
	let aff = "COMPOUNDFLAG X\nMAXCPDSUGS 3\n";
	let dict = Dictionary::from_slice(aff, "3\nfoo/X\nbar/X\nbaz/X\n").unwrap();

	// a two-member target falls out of the first compound pass
	assert!(dict.suggest("foobra").iter().any(|s| s == "foobar"));
	// a three-member target needs the unrestricted pass
	assert!(dict.suggest("foobarbza").iter().any(|s| s == "foobarbaz"));
}

#[test]
fn correct_words_can_still_be_suggested_for() {
	// suggest makes no validity judgement, it only offers neighbours
	let dict = dict();
	let sugs = dict.suggest("day");
	for sug in &sugs {
		assert!(dict.lookup(sug).unwrap_or_default());
	}
}
