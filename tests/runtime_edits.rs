use orthos::Dictionary;

const AFF: &str = "\
FORBIDDENWORD !

SFX S Y 1
SFX S 0 s .
";

const DIC: &str = "\
1
word/S
";

fn dict() -> Dictionary {
	let _ = pretty_env_logger::try_init();
	Dictionary::from_slice(AFF, DIC).expect("fixture pair parses")
}

#[test]
fn added_words_become_valid() {
	let mut dict = dict();
	assert!(!dict.lookup("custom").unwrap());

	dict.add("custom");
	assert!(dict.lookup("custom").unwrap());
	// plain additions carry no flags
	assert!(!dict.lookup("customs").unwrap());
}

#[test]
fn removed_words_lose_their_affixed_forms_too() {
	let mut dict = dict();
	assert!(dict.lookup("word").unwrap());
	assert!(dict.lookup("words").unwrap());

	assert!(dict.remove("word"));
	assert!(!dict.lookup("word").unwrap());
	assert!(!dict.lookup("words").unwrap());

	// adding again clears the forbidden mark
	dict.add("word");
	assert!(dict.lookup("word").unwrap());
}

#[test]
fn removing_an_absent_word_reports_failure() {
	let mut dict = dict();
	assert!(!dict.remove("ghost"));
}

#[test]
fn words_can_inflect_like_an_example() {
	let mut dict = dict();
	assert!(dict.add_with_affix("glorp", "word"));
	assert!(dict.lookup("glorp").unwrap());
	assert!(dict.lookup("glorps").unwrap());

	assert!(!dict.add_with_affix("blick", "missing"));
}

#[test]
fn explicit_flags_enable_affix_rules() {
	let mut dict = dict();
	assert!(dict.add_with_flags("blick", "S"));
	assert!(dict.lookup("blicks").unwrap());

	assert!(!dict.add_with_flags("junk", "é"));
}

#[test]
fn extra_word_lists_layer_over_the_main_one() {
	let mut dict = dict();
	dict.add_dic("1\nextra/S\n").unwrap();
	assert!(dict.lookup("extra").unwrap());
	assert!(dict.lookup("extras").unwrap());

	assert!(dict.add_dic("no count header").is_err());
}
