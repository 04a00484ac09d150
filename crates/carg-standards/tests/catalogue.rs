//! Consistency checks over the static layer catalogue and profiles.

use std::collections::BTreeSet;

use carg_standards::{LAYER_SPECS, MERGE_GROUPS, OUTPUT_PROFILES, PROFILES, layer_spec, profile};

#[test]
fn every_profile_is_well_formed() {
    for profile in PROFILES {
        profile
            .check()
            .unwrap_or_else(|err| panic!("profile {} invalid: {err}", profile.name));
    }
}

#[test]
fn seven_distinct_outputs() {
    let outputs: BTreeSet<&str> = OUTPUT_PROFILES.iter().copied().collect();
    assert_eq!(outputs.len(), 7);
    for name in OUTPUT_PROFILES {
        assert!(profile(name).is_ok(), "missing profile {name}");
    }
}

#[test]
fn no_profile_emits_computed_measures() {
    for profile in PROFILES {
        for field in profile.field_order {
            let upper = field.to_ascii_uppercase();
            assert!(!upper.starts_with("SHAPE_"), "{} emits {field}", profile.name);
            assert_ne!(upper, "OBJECTID");
        }
    }
}

#[test]
fn layers_reference_known_profiles() {
    for spec in LAYER_SPECS {
        let pre = profile(spec.profile).expect("pre-merge profile");
        let out = profile(spec.output).expect("output profile");
        assert_eq!(pre.geometry_type, spec.geometry_type, "{}", spec.id);
        assert_eq!(out.field_order, pre.field_order, "{}", spec.id);
        assert!(OUTPUT_PROFILES.contains(&spec.output));
    }
}

#[test]
fn merge_members_share_their_output() {
    for group in MERGE_GROUPS {
        for member in group.members {
            let spec = layer_spec(member).expect("merge member declared");
            assert_eq!(spec.output, group.output);
        }
    }
    let pieghe = layer_spec("st021polyline").expect("case-insensitive id");
    assert_eq!(pieghe.profile, "geologia_linee_pieghe");
}

#[test]
fn polygon_layer_tables() {
    let spec = layer_spec("ST018Polygon").expect("polygon layer");
    assert_eq!(
        spec.auxiliary_tables(),
        ["T0180801000", "T0180802000", "T0180803000"]
    );
    insta::assert_snapshot!(spec.tables().join(","), @"d_1000_tipo,d_2000_SiglaTipo,d_stato,d_t2000_eta,d_t3000");
}
