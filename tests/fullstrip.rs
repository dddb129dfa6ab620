mod utils;

const FULLSTRIP_AFF: &str = "\
# FULLSTRIP option: affix rules may strip a root entirely
# test data from Davide Prina

FULLSTRIP

SET ISO8859-15
TRY aioertnsclmdpgubzfvhàq'ACMSkBGPLxEyRTVòIODNwFéùèìjUZKHWJYQX

SFX A Y 3
SFX A andare vado andare
SFX A andare va andare
SFX A are iamo andare
";

const FULLSTRIP_DIC: &str = "\
2
andare/A
riandare/A
";

const FULLSTRIP_GOOD: [&str; 8] = [
	"andare",
	"vado",
	"va",
	"andiamo",
	"riandare",
	"rivado",
	"riva",
	"riandiamo",
];

#[test]
fn full_roots_can_be_stripped() -> Result<(), Box<dyn std::error::Error>> {
	utils::test_dictionary_pair(FULLSTRIP_AFF, FULLSTRIP_DIC, &FULLSTRIP_GOOD, &["vadoare"], None)
}
