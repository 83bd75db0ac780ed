//! Header and cell normalization.
//!
//! Lab-instrument exports are inconsistent about accents, non-breaking
//! spaces, the `≥` sign, micro-sign code points, and the `**` marker some
//! instruments prepend to calculated (vs. measured) fields. Every fuzzy
//! header-equality decision in the crate goes through [`normalize_header`]
//! so the rules live in exactly one place: two headers are equivalent iff
//! their normalized forms are byte-equal.

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Marker used by some instrument exports to flag calculated fields.
const CALCULATED_MARKER: &str = "**";

/// Normalizes a header for diacritic- and symbol-insensitive comparison.
pub fn normalize_header(raw: &str) -> String {
    let mut text = raw.trim().replace('\u{a0}', " ");
    text = text.replace('≥', ">=");
    // Micro sign U+00B5 and Greek mu U+03BC appear interchangeably.
    text = text.replace('\u{b5}', "\u{3bc}");
    text = text.replace(CALCULATED_MARKER, "");
    let folded: String = text
        .nfd()
        .filter(|ch| !is_combining_mark(*ch))
        .flat_map(char::to_lowercase)
        .collect();
    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Whether two headers are the same under normalization.
pub fn headers_equivalent(left: &str, right: &str) -> bool {
    normalize_header(left) == normalize_header(right)
}

fn is_placeholder_literal(lowered: &str) -> bool {
    matches!(lowered, "na" | "n/a" | "n.a." | "null" | "none" | "nan")
        || (!lowered.is_empty() && lowered.chars().all(|c| c == '-'))
}

/// Whether a cell in a non-canonical column counts as real data.
///
/// Empty cells, placeholder literals, and cells that merely echo the
/// column's own header (a recurring sentinel in the source exports) do not
/// count.
pub fn is_meaningful_cell(value: &str, header: &str) -> bool {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return false;
    }
    if is_placeholder_literal(&trimmed.to_lowercase()) {
        return false;
    }
    !headers_equivalent(trimmed, header)
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn normalize_strips_accents_and_case() {
        assert_eq!(normalize_header("FÓSFORO (P) - 34"), "fosforo (p) - 34");
        assert_eq!(normalize_header("NÍQUEL (NI) - 32"), "niquel (ni) - 32");
        assert!(headers_equivalent("ÍNDICE PQ (PQI) - 3", "Indice PQ (PQI) - 3"));
    }

    #[test]
    fn normalize_unifies_spaces_and_symbols() {
        assert!(headers_equivalent(
            "CONTEO PARTÍCULAS ≥ 4 µM - 49",
            "CONTEO PARTICULAS >= 4 ΜM - 49"
        ));
        assert!(headers_equivalent("EDAD\u{a0}COMPONENTE", "EDAD COMPONENTE"));
        assert_eq!(normalize_header("  PRODUCTO   BASE "), "producto base");
    }

    #[test]
    fn normalize_drops_calculated_marker() {
        assert!(headers_equivalent("**OXIDACIÓN - 80", "OXIDACION - 80"));
        assert!(headers_equivalent("VISCOSIDAD**", "VISCOSIDAD"));
    }

    #[test]
    fn distinct_headers_stay_distinct() {
        assert!(!headers_equivalent("ESTADO", "ESTADO_REPORTE"));
        assert!(!headers_equivalent(
            "NÚMERO BÁSICO (BN) - 12",
            "NÚMERO BÁSICO (BN) - 17"
        ));
    }

    #[test]
    fn meaningful_cell_rejects_placeholders_and_header_echo() {
        assert!(is_meaningful_cell("12.5", "LABORATORIO"));
        assert!(!is_meaningful_cell("", "LABORATORIO"));
        assert!(!is_meaningful_cell("  ", "LABORATORIO"));
        assert!(!is_meaningful_cell("N/A", "LABORATORIO"));
        assert!(!is_meaningful_cell("---", "LABORATORIO"));
        assert!(!is_meaningful_cell("laboratorio", "LABORATORIO"));
        assert!(!is_meaningful_cell("LABORATORIO ", "Laboratório"));
    }

    proptest! {
        #[test]
        fn normalize_is_idempotent(raw in "\\PC{0,40}") {
            let once = normalize_header(&raw);
            prop_assert_eq!(normalize_header(&once), once);
        }
    }
}
