//! Cache key derivation.

use sha2::{Digest, Sha256};

use crate::types::{Operation, QueryParams};

/// Key for `operation` queried with `params`: `"<tag>:<sha256 hex>"`.
///
/// The digest covers the canonical (sorted, escaped, empty-stripped)
/// parameter encoding, so keys do not depend on how the parameters were
/// assembled and separators inside values cannot forge another query.
pub fn cache_key(operation: Operation, params: &QueryParams) -> String {
    let digest = Sha256::digest(params.canonical().as_bytes());
    format!("{}:{:x}", operation.tag(), digest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TeamsQuery;

    #[test]
    fn key_has_tag_prefix_and_fixed_length() {
        let params: QueryParams = [("id", "33")].into_iter().collect();
        let key = cache_key(Operation::Teams, &params);
        let (tag, hash) = key.split_once(':').unwrap();
        assert_eq!(tag, "teams");
        assert_eq!(hash.len(), 64);
    }

    #[test]
    fn order_independent() {
        let a: QueryParams = [("a", "1"), ("b", "2")].into_iter().collect();
        let b: QueryParams = [("b", "2"), ("a", "1")].into_iter().collect();
        assert_eq!(cache_key(Operation::Fixtures, &a), cache_key(Operation::Fixtures, &b));
    }

    #[test]
    fn empty_values_do_not_change_key() {
        let a: QueryParams = [("league", "39")].into_iter().collect();
        let b = QueryParams::new()
            .with("league", Some(39))
            .with("round", Some(""));
        assert_eq!(cache_key(Operation::Standings, &a), cache_key(Operation::Standings, &b));
    }

    #[test]
    fn separators_inside_values_do_not_collide() {
        let packed = TeamsQuery::default().name("Arsenal&season=2020");
        let split = TeamsQuery::default().name("Arsenal").season(2020u32);
        assert_ne!(
            cache_key(Operation::Teams, &packed.to_params()),
            cache_key(Operation::Teams, &split.to_params())
        );

        let packed: QueryParams = [("a", "1=b"), ("c", "2")].into_iter().collect();
        let split: QueryParams = [("a", "1"), ("b", "c=2")].into_iter().collect();
        assert_ne!(
            cache_key(Operation::Fixtures, &packed),
            cache_key(Operation::Fixtures, &split)
        );
    }

    #[test]
    fn operations_do_not_collide() {
        let params: QueryParams = [("fixture", "7")].into_iter().collect();
        assert_ne!(
            cache_key(Operation::FixtureEvents, &params),
            cache_key(Operation::FixtureStatistics, &params)
        );
    }
}
