//! Built-in Polish lemma table.
//!
//! Covers the vocabulary that shows up most in key-phrase lists for
//! technology and business copy. Adjectives are expanded from their stem
//! with the regular hard-stem endings; nouns and verbs are listed form by
//! form because their paradigms are too irregular to generate.

use std::collections::HashMap;
use std::sync::LazyLock;

/// Regular endings for hard-stem adjectives (sztuczn-y, sztuczn-ego, ...).
const ADJECTIVE_ENDINGS: &[&str] = &[
    "y", "a", "e", "ego", "emu", "ym", "ej", "ą", "i", "ych", "ymi",
];

/// Hard-stem adjectives as (stem, lemma).
const ADJECTIVE_STEMS: &[(&str, &str)] = &[
    ("sztuczn", "sztuczny"),
    ("maszynow", "maszynowy"),
    ("neuronow", "neuronowy"),
    ("naturaln", "naturalny"),
    ("nowoczesn", "nowoczesny"),
    ("cyfrow", "cyfrowy"),
    ("językow", "językowy"),
    ("komputerow", "komputerowy"),
    ("internetow", "internetowy"),
    ("biznesow", "biznesowy"),
    ("ekonomiczn", "ekonomiczny"),
    ("techniczn", "techniczny"),
    ("automatyczn", "automatyczny"),
    ("generatywn", "generatywny"),
    ("pełn", "pełny"),
    ("now", "nowy"),
];

/// Irregular or non-generated words as (lemma, forms).
const WORD_FORMS: &[(&str, &[&str])] = &[
    (
        "inteligencja",
        &[
            "inteligencja",
            "inteligencji",
            "inteligencję",
            "inteligencją",
            "inteligencjo",
            "inteligencje",
            "inteligencjom",
            "inteligencjami",
            "inteligencjach",
        ],
    ),
    (
        "informacja",
        &[
            "informacja",
            "informacji",
            "informację",
            "informacją",
            "informacje",
            "informacjom",
            "informacjami",
            "informacjach",
        ],
    ),
    (
        "technologia",
        &[
            "technologia",
            "technologii",
            "technologię",
            "technologią",
            "technologie",
            "technologiom",
            "technologiami",
            "technologiach",
        ],
    ),
    (
        "analiza",
        &[
            "analiza",
            "analizy",
            "analizie",
            "analizę",
            "analizą",
            "analizo",
            "analiz",
            "analizom",
            "analizami",
            "analizach",
        ],
    ),
    (
        "fraza",
        &[
            "fraza", "frazy", "frazie", "frazę", "frazą", "fraz", "frazom", "frazami", "frazach",
        ],
    ),
    (
        "sieć",
        &["sieć", "sieci", "siecią", "sieciom", "sieciami", "sieciach"],
    ),
    (
        "dane",
        &["dane", "danych", "danym", "danymi"],
    ),
    (
        "model",
        &[
            "model", "modelu", "modelowi", "modelem", "modele", "modeli", "modelom", "modelami",
            "modelach",
        ],
    ),
    (
        "system",
        &[
            "system",
            "systemu",
            "systemowi",
            "systemem",
            "systemie",
            "systemy",
            "systemów",
            "systemom",
            "systemami",
            "systemach",
        ],
    ),
    (
        "tekst",
        &[
            "tekst", "tekstu", "tekstowi", "tekstem", "tekście", "teksty", "tekstów", "tekstom",
            "tekstami", "tekstach",
        ],
    ),
    (
        "wynik",
        &[
            "wynik", "wyniku", "wynikowi", "wynikiem", "wyniki", "wyników", "wynikom", "wynikami",
            "wynikach",
        ],
    ),
    (
        "język",
        &[
            "język",
            "języka",
            "językowi",
            "językiem",
            "języku",
            "języki",
            "języków",
            "językom",
            "językami",
            "językach",
        ],
    ),
    (
        "świat",
        &[
            "świat", "świata", "światu", "światem", "świecie", "światy", "światów", "światom",
            "światami", "światach",
        ],
    ),
    (
        "uczenie",
        &["uczenie", "uczenia", "uczeniu", "uczeniem", "uczeniom", "uczeniami", "uczeniach"],
    ),
    (
        "przetwarzanie",
        &[
            "przetwarzanie",
            "przetwarzania",
            "przetwarzaniu",
            "przetwarzaniem",
            "przetwarzań",
            "przetwarzaniom",
            "przetwarzaniami",
            "przetwarzaniach",
        ],
    ),
    (
        "zmieniać",
        &[
            "zmieniać",
            "zmieniam",
            "zmieniasz",
            "zmienia",
            "zmieniamy",
            "zmieniacie",
            "zmieniają",
            "zmieniał",
            "zmieniała",
            "zmieniało",
            "zmieniali",
            "zmieniały",
        ],
    ),
    (
        "analizować",
        &[
            "analizować",
            "analizuję",
            "analizujesz",
            "analizuje",
            "analizujemy",
            "analizujecie",
            "analizują",
            "analizował",
            "analizowała",
            "analizowało",
            "analizowali",
            "analizowały",
        ],
    ),
    (
        "być",
        &[
            "być", "jestem", "jesteś", "jest", "jesteśmy", "jesteście", "są", "był", "była",
            "było", "byli", "były", "będzie", "będą",
        ],
    ),
];

/// Form → lemma lookup built from the tables above.
pub static POLISH_LEMMAS: LazyLock<HashMap<String, &'static str>> = LazyLock::new(|| {
    let mut map = HashMap::new();

    for (stem, lemma) in ADJECTIVE_STEMS {
        for ending in ADJECTIVE_ENDINGS {
            map.insert(format!("{stem}{ending}"), *lemma);
        }
    }

    for (lemma, forms) in WORD_FORMS {
        for form in *forms {
            map.insert((*form).to_string(), *lemma);
        }
    }

    map
});

/// Look up the lemma of a lower-cased word form.
pub fn polish_lemma(form: &str) -> Option<&'static str> {
    POLISH_LEMMAS.get(form).copied()
}
