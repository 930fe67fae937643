//! Built-in label/code pairs for each typology.

/// Cross reference types, encoded as `<xr type="...">`.
pub const CROSS_REFERENCE: &[(&str, &str)] = &[
    ("Undetermined", ""),
    ("Antonym", "ant"),
    ("Hypernym", "hyper"),
    ("Hyponym", "hypo"),
    ("Synonym", "syn"),
    ("Derived from", "der"),
];

pub const PART_OF_SPEECH: &[(&str, &str)] = &[
    ("None", ""),
    ("_Noun", "n"),
    ("Verb", "v"),
    ("Transitive Verb", "vt"),
    ("Intransitive Verb", "vi"),
    ("Transitive and intransitive Verb", "vti"),
    ("Adverb", "adv"),
    ("_Adjective", "adj"),
    ("Conjunction", "conj"),
    ("_Preposition", "prep"),
    ("_Interjection", "interj"),
    ("Pronoun", "pron"),
    ("Article", "art"),
    ("Numeral", "num"),
    ("Imitative", "imit"),
    ("Abbreviation", "abbr"),
    ("Phrase", "phra"),
];

pub const GENDER: &[(&str, &str)] = &[
    ("None", ""),
    ("Masculine", "m"),
    ("_Feminine", "f"),
    ("Neuter", "n"),
    ("Common", "i"),
    ("Masc. & Fem.", "mf"),
    ("Masc., Fem. & Neut.", "mfn"),
];

pub const NUMBER: &[(&str, &str)] = &[
    ("None", ""),
    ("_Singular", "sg"),
    ("Dual", "du"),
    ("Plural", "pl"),
];

/// Subject field labels, encoded as `<usg type="dom">agr</usg>`.
pub const DOMAIN: &[(&str, &str)] = &[
    ("_None", ""),
    ("_Agriculture", "agr"),
    ("Astronomy", "astr"),
    ("Automobile", "aut"),
    ("_Biology", "bio"),
    ("B_otany", "bot"),
    ("_Chemistry", "chem"),
    ("_Electrotechnics", "el"),
    ("_Finance", "fin"),
    ("_Geography", "geo"),
    ("Geolog_y", "geol"),
    ("Grammar", "gram"),
    ("_History", "hist"),
    ("_Information Technology", "it"),
    ("_Law", "law"),
    ("_Mathematics", "math"),
    ("Me_dicine", "med"),
    ("Military", "mil"),
    ("M_usic", "mus"),
    ("Myth_ology", "myt"),
    ("_Physics", "phy"),
    ("Politics", "pol"),
    ("_Religion", "rel"),
    ("_Sexual", "sex"),
    ("Sport", "sport"),
    ("_Technology", "tech"),
];

/// Register labels, encoded as `<usg type="reg">official</usg>`.
pub const REGISTER: &[(&str, &str)] = &[
    ("_None", ""),
    ("_Official", "official"),
    ("_Formal", "formal"),
    ("Ch_ildren Speech", "chil"),
    ("_Colloquial", "col"),
    ("_Slang", "slang"),
    ("_Vulgar", "vulg"),
    ("_Taboo", "taboo"),
    ("_Ironic", "ironic"),
    ("_Facetious", "facetious"),
];
