mod utils;

/// Check uppercase forms of allcaps word + affix and words with mixed casing
#[test]
fn allcaps_words_validate_through_hidden_twins() -> Result<(), Box<dyn std::error::Error>> {
	utils::test_dictionary_pair(
		"\
WORDCHARS '.

SFX S N 1
SFX S   0     's      .
",
		"\
2
OpenOffice.org
UNICEF/S
",
		&["OpenOffice.org", "OPENOFFICE.ORG", "UNICEF's", "UNICEF'S"],
		&["Unicef's", "Openoffice.org"],
		None,
	)
}

/// Forbidden all caps words stay case sensitive
#[test]
fn forbidden_allcaps_are_case_sensitive() -> Result<(), Box<dyn std::error::Error>> {
	utils::test_dictionary_pair(
		"\
# iPod -> ipodos ('iPodic' in Hungarian)
FORBIDDENWORD *
SFX s N 1
SFX s 0 os .
",
		"\
3
iPod/s
iPodos/*
ipodos
",
		&["iPod", "IPOD", "ipodos", "IPODOS"],
		&["iPodos"],
		None,
	)
}
