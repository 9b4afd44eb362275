//! Task instruction sent to the generative collaborator.
//!
//! The reply format requested here is what [`super::parse`] understands: a
//! fragments section of `"<quote>" (typ: <tag>)` lines followed by a
//! statistics section of `<label>: <count>` lines.

use crate::occurrence::VariantType;

/// Header that opens the fragments section of a reply.
pub const FRAGMENTS_HEADER: &str = "ZNALEZIONE FRAGMENTY:";

/// Header that opens the statistics section of a reply.
pub const STATS_HEADER: &str = "STATYSTYKI ZNALEZIONYCH WYSTĄPIEŃ:";

/// Label of the total in the statistics section (compared lower-cased).
pub const TOTAL_LABEL: &str = "łącznie znaleziono";

/// Type tags the collaborator may assign, with their descriptions.
const TYPE_GUIDE: [(VariantType, &str); 5] = [
    (VariantType::Exact, "identyczne jak wzór"),
    (VariantType::Inflected, "inna forma gramatyczna"),
    (VariantType::Split, "przerwane znakami lub słowami"),
    (VariantType::Reordered, "zmieniona kolejność"),
    (VariantType::Extended, "z dodatkowymi słowami"),
];

/// Build the instruction for finding `phrase` in `text`.
///
/// The phrase and text are embedded literally.
pub fn build_prompt(text: &str, phrase: &str) -> String {
    let types: String = TYPE_GUIDE
        .iter()
        .map(|(t, desc)| format!("   - {} ({desc})\n", t.polish_tag()))
        .collect();
    let stats: String = TYPE_GUIDE
        .iter()
        .map(|(t, _)| format!("- {}: [liczba]\n", t.polish_tag()))
        .collect();

    format!(
        r#"ZADANIE: Znajdź w tekście WSZYSTKIE rzeczywiste wystąpienia frazy "{phrase}".
WAŻNE: Zwracaj TYLKO te fragmenty, które NAPRAWDĘ występują w tekście. NIE WYMYŚLAJ żadnych przykładów!

TEKST DO PRZEANALIZOWANIA:
{text}

INSTRUKCJE:
1. Przeanalizuj tekst i znajdź WSZYSTKIE wystąpienia frazy lub jej wariantów
2. Każdy znaleziony fragment MUSI być dokładnym cytatem z tekstu
3. Dla każdego znalezionego fragmentu określ typ:
{types}
WYMAGANY FORMAT ODPOWIEDZI:

{FRAGMENTS_HEADER}
1. "dokładny_cytat_z_tekstu" (typ: {exact})
[kolejne znalezione fragmenty...]

{STATS_HEADER}
Łącznie znaleziono: [liczba wszystkich znalezionych]
W tym:
{stats}
KRYTYCZNIE WAŻNE:
- Podawaj TYLKO fragmenty, które FAKTYCZNIE znalazłeś w tekście
- Każdy fragment musi być możliwy do znalezienia w tekście przez wyszukiwanie (ctrl+f)
- Statystyki muszą odpowiadać RZECZYWISTEJ liczbie znalezionych wystąpień
- NIE WYMYŚLAJ żadnych wariantów, raportuj tylko to, co znalazłeś"#,
        exact = VariantType::Exact.polish_tag(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_embeds_phrase_and_text_literally() {
        let prompt = build_prompt("Tekst z \"cudzysłowem\".", "sztuczna inteligencja");
        assert!(prompt.contains("frazy \"sztuczna inteligencja\""));
        assert!(prompt.contains("Tekst z \"cudzysłowem\"."));
    }

    #[test]
    fn prompt_requests_both_sections() {
        let prompt = build_prompt("x", "y");
        let fragments = prompt.find(FRAGMENTS_HEADER).unwrap();
        let stats = prompt.find(STATS_HEADER).unwrap();
        assert!(fragments < stats);
    }

    #[test]
    fn prompt_lists_all_five_collaborator_tags() {
        let prompt = build_prompt("x", "y");
        for tag in ["dokładne", "odmiana", "rozdzielone", "przestawione", "rozszerzone"] {
            assert!(prompt.contains(&format!("- {tag}: [liczba]")), "missing {tag}");
        }
        assert!(!prompt.contains("lematyzacja"));
    }
}
