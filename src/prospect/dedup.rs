use std::collections::HashMap;

use super::types::{present, Prospect};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum DedupKey {
    External(String),
    NameCity(String, String),
}

fn keys(prospect: &Prospect) -> Vec<DedupKey> {
    let mut keys = Vec::with_capacity(2);
    if let Some(id) = present(&prospect.external_id) {
        keys.push(DedupKey::External(id.trim().to_string()));
    }
    if let Some(name) = present(&prospect.company_name) {
        let city = present(&prospect.city).unwrap_or_default();
        keys.push(DedupKey::NameCity(
            name.trim().to_lowercase(),
            city.trim().to_lowercase(),
        ));
    }
    keys
}

/// Upsert prospects in arrival order.
///
/// A record matches an earlier one by external ID, or by company name + city
/// (case-insensitive). A match replaces the earlier record in place, so the
/// latest data wins while the first position is kept. Records without either
/// key pass through untouched.
///
/// When one record matches two different earlier records (one by external ID,
/// another by name + city), it replaces the external-ID match and the other
/// record is dropped, so no two survivors share a key.
pub fn dedupe_prospects(prospects: Vec<Prospect>) -> Vec<Prospect> {
    let mut slots: Vec<Option<Prospect>> = Vec::with_capacity(prospects.len());
    let mut slot_keys: Vec<Vec<DedupKey>> = Vec::with_capacity(prospects.len());
    let mut index: HashMap<DedupKey, usize> = HashMap::new();

    for prospect in prospects {
        let keys = keys(&prospect);
        let mut matched: Vec<usize> = Vec::new();
        for key in &keys {
            if let Some(&slot) = index.get(key) {
                if !matched.contains(&slot) {
                    matched.push(slot);
                }
            }
        }

        let slot = match matched.split_first() {
            Some((&winner, losers)) => {
                for &loser in losers {
                    slots[loser] = None;
                    for key in std::mem::take(&mut slot_keys[loser]) {
                        index.insert(key.clone(), winner);
                        slot_keys[winner].push(key);
                    }
                }
                slots[winner] = Some(prospect);
                winner
            }
            None => {
                slots.push(Some(prospect));
                slot_keys.push(Vec::new());
                slots.len() - 1
            }
        };

        for key in keys {
            index.insert(key.clone(), slot);
            if !slot_keys[slot].contains(&key) {
                slot_keys[slot].push(key);
            }
        }
    }

    slots.into_iter().flatten().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prospect(external_id: Option<&str>, name: Option<&str>, city: Option<&str>) -> Prospect {
        Prospect {
            external_id: external_id.map(String::from),
            company_name: name.map(String::from),
            city: city.map(String::from),
            ..Default::default()
        }
    }

    #[test]
    fn test_dedupe_by_external_id() {
        let mut newer = prospect(Some("place-1"), Some("Acme Roofing LLC"), Some("Blaine"));
        newer.review_count = Some(40);

        let result = dedupe_prospects(vec![
            prospect(Some("place-1"), Some("Acme Roofing"), Some("Blaine")),
            prospect(Some("place-2"), Some("Other"), Some("Blaine")),
            newer,
        ]);

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].company_name.as_deref(), Some("Acme Roofing LLC"));
        assert_eq!(result[0].review_count, Some(40));
        assert_eq!(result[1].company_name.as_deref(), Some("Other"));
    }

    #[test]
    fn test_dedupe_by_name_and_city_case_insensitive() {
        let result = dedupe_prospects(vec![
            prospect(None, Some("Acme Roofing"), Some("Blaine")),
            prospect(None, Some(" acme roofing "), Some("BLAINE")),
        ]);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].company_name.as_deref(), Some(" acme roofing "));
    }

    #[test]
    fn test_same_name_different_city_kept() {
        let result = dedupe_prospects(vec![
            prospect(None, Some("Acme Roofing"), Some("Blaine")),
            prospect(None, Some("Acme Roofing"), Some("Woodbury")),
        ]);
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn test_name_city_matches_record_with_external_id() {
        let result = dedupe_prospects(vec![
            prospect(Some("place-9"), Some("Acme"), Some("Edina")),
            prospect(None, Some("Acme"), Some("Edina")),
            prospect(Some("place-9"), Some("Acme Inc"), Some("Edina")),
        ]);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].company_name.as_deref(), Some("Acme Inc"));
    }

    #[test]
    fn test_conflicting_matches_collapse_into_external_id_slot() {
        let result = dedupe_prospects(vec![
            prospect(Some("place-1"), Some("Acme"), Some("Blaine")),
            prospect(None, Some("Northside"), Some("Edina")),
            prospect(Some("place-1"), Some("Northside"), Some("Edina")),
        ]);

        // The second record shared name + city with the third and is gone
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].external_id.as_deref(), Some("place-1"));
        assert_eq!(result[0].company_name.as_deref(), Some("Northside"));

        // A later name + city match still lands in the merged slot
        let result = dedupe_prospects(vec![
            prospect(Some("place-1"), Some("Acme"), Some("Blaine")),
            prospect(None, Some("Northside"), Some("Edina")),
            prospect(Some("place-1"), Some("Northside"), Some("Edina")),
            prospect(None, Some("northside"), Some("EDINA")),
        ]);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].company_name.as_deref(), Some("northside"));
    }

    #[test]
    fn test_conflict_keeps_unrelated_records_in_order() {
        let result = dedupe_prospects(vec![
            prospect(None, Some("First"), Some("Blaine")),
            prospect(Some("place-1"), Some("Acme"), Some("Blaine")),
            prospect(None, Some("Northside"), Some("Edina")),
            prospect(None, Some("Last"), Some("Blaine")),
            prospect(Some("place-1"), Some("Northside"), Some("Edina")),
        ]);

        let names: Vec<_> = result.iter().map(|p| p.display_name()).collect();
        assert_eq!(names, vec!["First", "Northside", "Last"]);
        assert_eq!(result[1].external_id.as_deref(), Some("place-1"));
    }

    #[test]
    fn test_unkeyed_records_pass_through() {
        let result = dedupe_prospects(vec![
            Prospect::default(),
            Prospect::default(),
            prospect(None, None, Some("Blaine")),
        ]);
        assert_eq!(result.len(), 3);
    }
}
