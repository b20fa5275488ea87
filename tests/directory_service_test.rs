//! Tests for DirectoryService over the in-memory store

use std::sync::Arc;

use rstest::{fixture, rstest};

use locdir::application::services::DirectoryService;
use locdir::application::ApplicationError;
use locdir::domain::{DomainError, LocationType, LocationUpdate, NewLocation};
use locdir::infrastructure::store::InMemoryStore;
use locdir::util::testing;

#[fixture]
fn service() -> DirectoryService {
    testing::init_test_setup();
    DirectoryService::new(Arc::new(InMemoryStore::new()))
}

/// RW > KGL > NYR > KMT > UBM
#[fixture]
fn chain(service: DirectoryService) -> DirectoryService {
    service
        .insert(NewLocation::province("Rwanda Kigali", "RW"))
        .unwrap();
    service
        .insert(NewLocation::child("Kigali", "KGL", LocationType::District, "RW"))
        .unwrap();
    service
        .insert(NewLocation::child("Nyarugenge", "NYR", LocationType::Sector, "KGL"))
        .unwrap();
    service
        .insert(NewLocation::child("Kimihurura", "KMT", LocationType::Cell, "NYR"))
        .unwrap();
    service
        .insert(NewLocation::child("Ubumwe", "UBM", LocationType::Village, "KMT"))
        .unwrap();
    service
}

// ============================================================
// insert
// ============================================================

#[rstest]
fn given_province_when_inserting_then_it_is_a_root(service: DirectoryService) {
    let node = service
        .insert(NewLocation::province("Kigali City", "KGC"))
        .unwrap();

    assert!(node.is_root());
    assert_eq!(node.location_type, LocationType::Province);
    assert_eq!(service.get_by_code("KGC").unwrap(), node);
    assert_eq!(service.get_by_id(&node.id).unwrap(), node);
}

#[rstest]
fn given_province_with_parent_when_inserting_then_invalid_hierarchy(service: DirectoryService) {
    service.insert(NewLocation::province("North", "N")).unwrap();

    let mut request = NewLocation::province("South", "S");
    request.parent_code = Some("N".to_string());
    let err = service.insert(request).unwrap_err();

    assert!(err.is_invalid_hierarchy());
    assert_eq!(err.to_string(), "invalid hierarchy: Province cannot have a parent location");
    assert!(!service.exists_by_code("S").unwrap());
}

#[rstest]
fn given_district_without_parent_when_inserting_then_invalid_hierarchy(
    service: DirectoryService,
) {
    let mut request = NewLocation::child("Gasabo", "GSB", LocationType::District, "");
    request.parent_code = None;
    let err = service.insert(request).unwrap_err();

    assert!(err.is_invalid_hierarchy());
    assert_eq!(err.to_string(), "invalid hierarchy: District must have a parent location");
}

#[rstest]
fn given_unknown_parent_when_inserting_then_not_found(service: DirectoryService) {
    let err = service
        .insert(NewLocation::child("Gasabo", "GSB", LocationType::District, "NOPE"))
        .unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(service.all().unwrap().len(), 0);
}

#[rstest]
fn given_district_under_sector_when_inserting_then_invalid_hierarchy(chain: DirectoryService) {
    let err = chain
        .insert(NewLocation::child("Gasabo", "GSB", LocationType::District, "NYR"))
        .unwrap_err();

    assert!(err.is_invalid_hierarchy());
    assert_eq!(err.to_string(), "invalid hierarchy: Sector cannot have child of type District");
    assert!(!chain.exists_by_code("GSB").unwrap());
}

#[rstest]
fn given_sector_under_province_when_inserting_then_invalid_hierarchy(chain: DirectoryService) {
    let err = chain
        .insert(NewLocation::child("Remera", "RMR", LocationType::Sector, "RW"))
        .unwrap_err();

    assert!(err.is_invalid_hierarchy());
}

#[rstest]
#[case(LocationType::Province)]
#[case(LocationType::Cell)]
fn given_existing_code_when_inserting_any_type_then_already_exists(
    chain: DirectoryService,
    #[case] location_type: LocationType,
) {
    let mut request = NewLocation::province("Duplicate", "KGL");
    request.location_type = location_type;
    if location_type != LocationType::Province {
        request.parent_code = Some("NYR".to_string());
    }

    let err = chain.insert(request).unwrap_err();

    assert!(err.is_already_exists());
    assert_eq!(chain.get_by_code("KGL").unwrap().name, "Kigali");
}

#[rstest]
#[case("", "X")]
#[case("Name", "  ")]
#[case("Name", "A B")]
fn given_blank_or_malformed_fields_when_inserting_then_invalid_request(
    service: DirectoryService,
    #[case] name: &str,
    #[case] code: &str,
) {
    let err = service
        .insert(NewLocation::province(name, code))
        .unwrap_err();

    assert!(matches!(
        err.domain(),
        Some(DomainError::InvalidRequest(_))
    ));
}

#[rstest]
fn given_padded_fields_when_inserting_then_values_are_trimmed(service: DirectoryService) {
    service
        .insert(NewLocation::province(" North ", " N "))
        .unwrap();
    let district = service
        .insert(NewLocation::child(
            "Musanze",
            "MSZ",
            LocationType::District,
            " N ",
        ))
        .unwrap();

    assert_eq!(service.get_by_code("N").unwrap().name, "North");
    assert_eq!(district.parent_id, Some(service.get_by_code("N").unwrap().id));
}

// ============================================================
// lookups and listings
// ============================================================

#[rstest]
fn given_unknown_code_when_looking_up_then_not_found(service: DirectoryService) {
    let err = service.get_by_code("ZZZ").unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.to_string(), "location not found with code: ZZZ");
}

#[rstest]
fn given_reference_when_resolving_then_returns_node(chain: DirectoryService) {
    assert_eq!(chain.resolve("NYR").unwrap().name, "Nyarugenge");
    assert!(chain.resolve("missing").unwrap_err().is_not_found());
}

#[rstest]
fn given_chain_when_listing_by_type_then_one_per_level(chain: DirectoryService) {
    for t in LocationType::ALL {
        let nodes = chain.by_type(t).unwrap();
        assert_eq!(nodes.len(), 1, "{t}");
        assert_eq!(nodes[0].location_type, t);
    }
    assert_eq!(chain.provinces().unwrap()[0].code, "RW");
    assert_eq!(chain.all().unwrap().len(), 5);
}

#[rstest]
fn given_children_inserted_when_listing_then_insertion_order(service: DirectoryService) {
    service.insert(NewLocation::province("East", "E")).unwrap();
    for (name, code) in [("Rwamagana", "RWM"), ("Bugesera", "BGS"), ("Kayonza", "KYZ")] {
        service
            .insert(NewLocation::child(name, code, LocationType::District, "E"))
            .unwrap();
    }

    let codes: Vec<_> = service
        .children_of("E")
        .unwrap()
        .into_iter()
        .map(|n| n.code)
        .collect();
    assert_eq!(codes, vec!["RWM", "BGS", "KYZ"]);
    assert!(service.children_of("KYZ").unwrap().is_empty());
}

// ============================================================
// ancestor walks
// ============================================================

#[rstest]
#[case("RW", 0)]
#[case("KGL", 1)]
#[case("NYR", 2)]
#[case("KMT", 3)]
#[case("UBM", 4)]
fn given_chain_when_measuring_depth_then_equals_level_ordinal(
    chain: DirectoryService,
    #[case] code: &str,
    #[case] expected: usize,
) {
    let depth = chain.depth_of(code).unwrap();
    let node = chain.get_by_code(code).unwrap();
    assert_eq!(depth, expected);
    assert_eq!(depth, node.location_type.ordinal());

    let path = chain.ancestor_path(code).unwrap();
    assert_eq!(path.len(), depth + 1);
    assert_eq!(path.last(), Some(&node.name));
    assert_eq!(path[0], "Rwanda Kigali");
}

#[rstest]
fn given_sector_when_rendering_path_then_joined_from_province(chain: DirectoryService) {
    assert_eq!(
        chain.ancestor_path("NYR").unwrap(),
        vec!["Rwanda Kigali", "Kigali", "Nyarugenge"]
    );
    assert_eq!(
        chain.location_path("NYR").unwrap(),
        "Rwanda Kigali > Kigali > Nyarugenge"
    );
    assert_eq!(chain.depth_of("NYR").unwrap(), 2);
    assert_eq!(chain.province_of("NYR").unwrap(), "Rwanda Kigali");
    assert_eq!(chain.root_of("UBM").unwrap().code, "RW");
}

#[rstest]
fn given_province_when_walking_then_path_is_itself(chain: DirectoryService) {
    assert_eq!(chain.location_path("RW").unwrap(), "Rwanda Kigali");
    assert_eq!(chain.province_of("RW").unwrap(), "Rwanda Kigali");
}

#[rstest]
fn given_unknown_code_when_walking_then_not_found(service: DirectoryService) {
    assert!(service.depth_of("X").unwrap_err().is_not_found());
    assert!(service.location_path("X").unwrap_err().is_not_found());
    assert!(service.province_of("X").unwrap_err().is_not_found());
}

// ============================================================
// descendants and views
// ============================================================

fn two_districts_three_sectors(service: &DirectoryService) {
    service.insert(NewLocation::province("South", "S")).unwrap();
    for d in 0..2 {
        let district = format!("D{d}");
        service
            .insert(NewLocation::child(
                format!("District {d}"),
                district.as_str(),
                LocationType::District,
                "S",
            ))
            .unwrap();
        for s in 0..3 {
            service
                .insert(NewLocation::child(
                    format!("Sector {d}.{s}"),
                    format!("S{d}{s}"),
                    LocationType::Sector,
                    district.as_str(),
                ))
                .unwrap();
        }
    }
}

#[rstest]
fn given_two_districts_with_three_sectors_when_collecting_then_eight_descendants(
    service: DirectoryService,
) {
    two_districts_three_sectors(&service);

    let descendants = service.descendants_of("S").unwrap();

    assert_eq!(descendants.len(), 8);
    // breadth first: districts before sectors
    assert!(descendants[..2]
        .iter()
        .all(|n| n.location_type == LocationType::District));
    assert!(descendants[2..]
        .iter()
        .all(|n| n.location_type == LocationType::Sector));
    assert_eq!(service.descendants_of("D1").unwrap().len(), 3);
    assert!(service.descendants_of("S12").unwrap().is_empty());
}

#[rstest]
fn given_subtree_when_viewing_then_nested_with_sizes(service: DirectoryService) {
    two_districts_three_sectors(&service);

    let view = service.subtree_view("S").unwrap();

    assert_eq!(view.size(), 9);
    assert_eq!(view.child_count(), 2);
    assert_eq!(view.children_label(), Some("districts"));
    assert_eq!(view.children[0].child_count(), 3);
    assert_eq!(view.children[0].children_label(), Some("sectors"));

    let rendered = view.to_tree_string().to_string();
    assert!(rendered.starts_with("South [S] (Province)"));
    assert!(rendered.contains("Sector 1.2 [S12] (Sector)"));
}

#[rstest]
fn given_two_provinces_when_building_forest_then_one_view_each(chain: DirectoryService) {
    chain.insert(NewLocation::province("West", "W")).unwrap();

    let forest = chain.full_forest().unwrap();

    assert_eq!(forest.len(), 2);
    assert_eq!(forest[0].code, "RW");
    assert_eq!(forest[0].size(), 5);
    assert_eq!(forest[1].code, "W");
    assert_eq!(forest[1].size(), 1);
}

#[rstest]
fn given_empty_directory_when_building_forest_then_empty(service: DirectoryService) {
    assert!(service.full_forest().unwrap().is_empty());
}

// ============================================================
// statistics, search, validation
// ============================================================

#[rstest]
fn given_three_levels_when_counting_then_statistics_match(service: DirectoryService) {
    service.insert(NewLocation::province("Kigali City", "RW")).unwrap();
    service
        .insert(NewLocation::child("Kigali", "KGL", LocationType::District, "RW"))
        .unwrap();
    service
        .insert(NewLocation::child("Nyarugenge", "NYR", LocationType::Sector, "KGL"))
        .unwrap();

    let stats = service.statistics().unwrap();

    assert_eq!(stats.count(LocationType::Province), 1);
    assert_eq!(stats.count(LocationType::District), 1);
    assert_eq!(stats.count(LocationType::Sector), 1);
    assert_eq!(stats.count(LocationType::Cell), 0);
    assert_eq!(stats.count(LocationType::Village), 0);
    assert_eq!(stats.total, 3);
    assert_eq!(service.count_by_type(LocationType::Sector).unwrap(), 1);
}

#[rstest]
#[case("kig", 2)]
#[case("UBUMWE", 1)]
#[case("zzz", 0)]
#[case(" Kig", 1)]
#[case("   ", 0)]
fn given_names_when_searching_then_case_insensitive_substring(
    chain: DirectoryService,
    #[case] term: &str,
    #[case] expected: usize,
) {
    assert_eq!(chain.search_by_name(term).unwrap().len(), expected);
}

#[rstest]
#[case("RW", LocationType::District, true)]
#[case("RW", LocationType::Sector, false)]
#[case("NYR", LocationType::Cell, true)]
#[case("UBM", LocationType::Village, false)]
fn given_parent_when_validating_then_only_next_level_allowed(
    chain: DirectoryService,
    #[case] parent: &str,
    #[case] child_type: LocationType,
    #[case] expected: bool,
) {
    assert_eq!(chain.validate_hierarchy(parent, child_type).unwrap(), expected);
}

#[rstest]
fn given_unknown_parent_when_validating_then_not_found(service: DirectoryService) {
    assert!(service
        .validate_hierarchy("X", LocationType::District)
        .unwrap_err()
        .is_not_found());
}

// ============================================================
// update
// ============================================================

#[rstest]
fn given_new_name_when_updating_then_only_name_changes(chain: DirectoryService) {
    let before = chain.get_by_code("NYR").unwrap();

    let after = chain
        .update(&before.id, LocationUpdate::rename("Nyarugenge Town"))
        .unwrap();

    assert_eq!(after.name, "Nyarugenge Town");
    assert_eq!(after.id, before.id);
    assert_eq!(after.code, before.code);
    assert_eq!(after.parent_id, before.parent_id);
    assert_eq!(
        chain.location_path("NYR").unwrap(),
        "Rwanda Kigali > Kigali > Nyarugenge Town"
    );
    // position among all records is kept
    assert_eq!(chain.all().unwrap()[2].code, "NYR");
}

#[rstest]
fn given_restated_matching_fields_when_updating_then_accepted(chain: DirectoryService) {
    let node = chain.get_by_code("KGL").unwrap();
    let update = LocationUpdate {
        name: "Kigali District".to_string(),
        code: Some("KGL".to_string()),
        location_type: Some(LocationType::District),
        parent_code: Some("RW".to_string()),
    };

    assert_eq!(chain.update(&node.id, update).unwrap().name, "Kigali District");
}

#[rstest]
#[case(LocationUpdate { code: Some("OTHER".into()), ..LocationUpdate::rename("x") })]
#[case(LocationUpdate { location_type: Some(LocationType::Cell), ..LocationUpdate::rename("x") })]
#[case(LocationUpdate { parent_code: Some("NYR".into()), ..LocationUpdate::rename("x") })]
#[case(LocationUpdate::rename("  "))]
fn given_conflicting_update_when_updating_then_invalid_request_and_unchanged(
    chain: DirectoryService,
    #[case] update: LocationUpdate,
) {
    let node = chain.get_by_code("KGL").unwrap();

    let err = chain.update(&node.id, update).unwrap_err();

    assert!(matches!(err.domain(), Some(DomainError::InvalidRequest(_))));
    assert_eq!(chain.get_by_code("KGL").unwrap(), node);
}

#[rstest]
fn given_unknown_id_when_updating_then_not_found(service: DirectoryService) {
    let err = service
        .update(&Default::default(), LocationUpdate::rename("x"))
        .unwrap_err();
    assert!(err.is_not_found());
}

// ============================================================
// delete
// ============================================================

#[rstest]
fn given_node_with_children_when_deleting_then_rejected(chain: DirectoryService) {
    let node = chain.get_by_code("NYR").unwrap();

    let err = chain.delete(&node.id).unwrap_err();

    assert!(err.is_invalid_hierarchy());
    assert_eq!(
        err.to_string(),
        "invalid hierarchy: Cannot delete location with 1 child location(s). Delete children first."
    );
    assert_eq!(chain.all().unwrap().len(), 5);
}

#[rstest]
fn given_leaf_when_deleting_then_removed(chain: DirectoryService) {
    let leaf = chain.get_by_code("UBM").unwrap();

    chain.delete(&leaf.id).unwrap();

    assert!(chain.get_by_id(&leaf.id).unwrap_err().is_not_found());
    assert!(!chain.exists_by_code("UBM").unwrap());
    assert!(chain.children_of("KMT").unwrap().is_empty());
    // the parent became a leaf and can go too
    let cell = chain.get_by_code("KMT").unwrap();
    chain.delete(&cell.id).unwrap();
    assert_eq!(chain.all().unwrap().len(), 3);
}

#[rstest]
fn given_deleted_code_when_reinserting_then_accepted(chain: DirectoryService) {
    let leaf = chain.get_by_code("UBM").unwrap();
    chain.delete(&leaf.id).unwrap();

    let again = chain
        .insert(NewLocation::child("Ubumwe", "UBM", LocationType::Village, "KMT"))
        .unwrap();
    assert_ne!(again.id, leaf.id);
}

#[rstest]
fn given_unknown_id_when_deleting_then_not_found(service: DirectoryService) {
    let err = service.delete(&Default::default()).unwrap_err();
    assert!(matches!(
        err,
        ApplicationError::Domain(DomainError::NotFound { .. })
    ));
}
