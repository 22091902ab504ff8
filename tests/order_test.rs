//! Natural ordering of dotted criterion ids

use std::cmp::Ordering;

use proptest::prelude::*;
use rstest::rstest;

use maturity_sunburst::domain::compare_ids;
use maturity_sunburst::domain::order::{depth, parent_id};

#[rstest]
#[case("1.2", "1.10", Ordering::Less)]
#[case("1.10", "2", Ordering::Less)]
#[case("1", "1.1", Ordering::Less)]
#[case("2", "1.9", Ordering::Greater)]
#[case("1.1", "1.1", Ordering::Equal)]
#[case("1.a", "1.B", Ordering::Less)]
#[case("1.9", "1.a", Ordering::Less)]
#[case("10", "9", Ordering::Greater)]
fn given_two_ids_when_comparing_then_uses_natural_order(
    #[case] a: &str,
    #[case] b: &str,
    #[case] expected: Ordering,
) {
    assert_eq!(compare_ids(a, b), expected);
}

#[test]
fn given_unsorted_ids_when_sorting_then_parents_precede_children() {
    // Arrange
    let mut ids = vec!["2", "1.10", "1.2", "1", "1.2.1", "10", "3.1"];

    // Act
    ids.sort_by(|a, b| compare_ids(a, b));

    // Assert
    assert_eq!(ids, vec!["1", "1.2", "1.2.1", "1.10", "2", "3.1", "10"]);
}

#[rstest]
#[case("1.2.3", Some("1.2"), 3)]
#[case("1", None, 1)]
#[case("a.b", Some("a"), 2)]
fn given_id_when_splitting_then_finds_parent_and_depth(
    #[case] id: &str,
    #[case] parent: Option<&str>,
    #[case] segments: usize,
) {
    assert_eq!(parent_id(id), parent);
    assert_eq!(depth(id), segments);
}

fn id_strategy() -> impl Strategy<Value = String> {
    let segment = prop_oneof![
        (0u32..20).prop_map(|n| n.to_string()),
        Just("01".to_string()),
        "[a-cA-C]{1,2}",
    ];
    prop::collection::vec(segment, 1..4).prop_map(|segments| segments.join("."))
}

proptest! {
    #[test]
    fn given_any_ids_when_comparing_then_order_is_antisymmetric(a in id_strategy(), b in id_strategy()) {
        prop_assert_eq!(compare_ids(&a, &b), compare_ids(&b, &a).reverse());
        prop_assert_eq!(compare_ids(&a, &b) == Ordering::Equal, a == b);
    }

    #[test]
    fn given_any_ids_when_comparing_then_order_is_transitive(
        a in id_strategy(),
        b in id_strategy(),
        c in id_strategy(),
    ) {
        let mut ids = [a, b, c];
        ids.sort_by(|x, y| compare_ids(x, y));
        prop_assert_ne!(compare_ids(&ids[0], &ids[1]), Ordering::Greater);
        prop_assert_ne!(compare_ids(&ids[1], &ids[2]), Ordering::Greater);
        prop_assert_ne!(compare_ids(&ids[0], &ids[2]), Ordering::Greater);
    }
}
