//! Identifier normalization.
//!
//! Every identifier in the produced dataset comes from this one function:
//! entity identifiers, dimension column identifiers, and concept
//! identifiers. Datapoint cells, entity tables, and catalogs reference each
//! other by these tokens, so the normalization must be deterministic and
//! idempotent.

/// Normalize a display label into a stable, machine-safe identifier.
///
/// Lowercases the label, collapses every run of non-alphanumeric characters
/// into a single underscore, and trims leading/trailing underscores.
/// Normalizing an already-normalized identifier returns it unchanged.
pub fn to_concept_id(label: &str) -> String {
    let mut out = String::with_capacity(label.len());
    let mut pending_sep = false;
    for ch in label.chars() {
        if !ch.is_alphanumeric() {
            pending_sep = true;
            continue;
        }
        for low in ch.to_lowercase() {
            // Case folding can expand into combining marks; only the
            // alphanumeric parts survive.
            if !low.is_alphanumeric() {
                continue;
            }
            if pending_sep && !out.is_empty() {
                out.push('_');
            }
            pending_sep = false;
            out.push(low);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::to_concept_id;

    #[test]
    fn lowercases_and_joins_words() {
        assert_eq!(to_concept_id("Age Group"), "age_group");
        assert_eq!(to_concept_id("age group"), "age_group");
    }

    #[test]
    fn strips_bracket_markers() {
        assert_eq!(to_concept_id("[Sex]"), "sex");
        assert_eq!(to_concept_id("[Age group]"), "age_group");
    }

    #[test]
    fn collapses_punctuation_runs() {
        assert_eq!(to_concept_id("15 - 24 years"), "15_24_years");
        assert_eq!(to_concept_id("SI_POV_DAY1"), "si_pov_day1");
        assert_eq!(to_concept_id("Urban/Rural -- total"), "urban_rural_total");
    }

    #[test]
    fn is_idempotent() {
        for label in ["Age Group", "[Sex]", "15 - 24 years", "already_normal"] {
            let once = to_concept_id(label);
            assert_eq!(to_concept_id(&once), once);
        }
    }

    #[test]
    fn handles_unicode_labels() {
        assert_eq!(to_concept_id("Côte d'Ivoire"), "côte_d_ivoire");
        let once = to_concept_id("Côte d'Ivoire");
        assert_eq!(to_concept_id(&once), once);
    }

    #[test]
    fn empty_and_symbol_only_labels_normalize_to_empty() {
        assert_eq!(to_concept_id(""), "");
        assert_eq!(to_concept_id("--"), "");
    }
}
