use cagpile_geostore::{Feature, FeatureCollection, FeatureId, Properties, numeric_id};
use proptest::prelude::*;
use serde_json::{Value, json};

fn collection(ids: &[Value]) -> FeatureCollection {
    let features = ids
        .iter()
        .map(|id| {
            let mut properties = Properties::new();
            properties.insert("id".into(), id.clone());
            Feature::new(properties, None)
        })
        .collect();
    FeatureCollection::from_features(features)
}

fn id_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        (0u64..10_000).prop_map(|n| json!(n)),
        (0u64..10_000).prop_map(|n| json!(n.to_string())),
        "[a-z]{1,6}".prop_map(Value::String),
        Just(Value::Null),
    ]
}

proptest! {
    #[test]
    fn next_id_exceeds_every_numeric_id(ids in prop::collection::vec(id_value(), 0..32)) {
        let collection = collection(&ids);
        let next = collection.next_id();

        prop_assert!(next >= 1);
        for id in ids.iter().filter_map(numeric_id) {
            prop_assert!(next > id);
        }
        prop_assert!(collection.find(&FeatureId::from(next)).is_none());
    }

    #[test]
    fn numeric_ids_match_their_string_form(n in 0u64..1_000_000) {
        let collection = collection(&[json!(n)]);
        prop_assert!(collection.find(&FeatureId::from(n.to_string())).is_some());
    }
}
