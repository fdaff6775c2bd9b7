//! Tests for descriptor classification and metadata extraction.

use projection::spatial_reference::*;
use projection::{BursaWolfParameters, ReferenceKind};
use test_utils::{assert_approx_eq, authority, wkt};

// ============================================================================
// Classification
// ============================================================================

#[test]
fn test_classification_is_exclusive() {
    let cases = [
        (wkt::WGS84, ReferenceKind::Geographic),
        (wkt::WGS84_PARENS_NO_AUTHORITY, ReferenceKind::Geographic),
        (wkt::ED50_SHIFTED, ReferenceKind::Geographic),
        (wkt::UTM_33N, ReferenceKind::Projected),
        (wkt::ETRS89_LAEA, ReferenceKind::Projected),
        (wkt::PIXEL_LINE, ReferenceKind::PixelLine),
        (wkt::PIXEL_LINE_OTHER, ReferenceKind::PixelLine),
        ("", ReferenceKind::PixelLine),
        (wkt::MALFORMED, ReferenceKind::Invalid),
    ];

    for (reference, expected) in cases {
        assert_eq!(reference_kind(reference), expected, "{}", reference);
        let flags = [
            is_geographic(reference),
            is_projected(reference),
            is_pixel_line(reference),
        ];
        assert!(flags.iter().filter(|f| **f).count() <= 1, "{}", reference);
    }
}

#[test]
fn test_pixel_line_scenario() {
    assert!(is_pixel_line(""));
    assert!(is_pixel_line("   "));
    assert!(is_pixel_line(wkt::PIXEL_LINE));
    assert!(!is_pixel_line(wkt::WGS84));
}

#[test]
fn test_malformed_fails_closed() {
    assert!(!is_geographic(wkt::MALFORMED));
    assert!(!is_projected(wkt::MALFORMED));
    assert!(!is_pixel_line(wkt::MALFORMED));
    assert!(!is_valid_spatial_reference(wkt::MALFORMED));
    assert_eq!(authority_id(wkt::MALFORMED), "");
    assert_eq!(geographic_reference(wkt::MALFORMED), "");
    assert_eq!(datum_spheroid_wkt(wkt::MALFORMED), "");
    assert_eq!(bursa_wolf_parameters(wkt::MALFORMED), None);
    assert_eq!(spheroid_semi_major_axis(wkt::MALFORMED), 0.0);
    assert_eq!(spheroid_inverse_flattening(wkt::MALFORMED), 0.0);
    assert_eq!(proj_definition(wkt::MALFORMED), None);
}

#[test]
fn test_validity() {
    assert!(is_valid_spatial_reference(wkt::WGS84));
    assert!(is_valid_spatial_reference(wkt::PIXEL_LINE));
    assert!(!is_valid_spatial_reference(""));
    assert!(!is_valid_spatial_reference("not a reference"));
}

// ============================================================================
// Authority ids
// ============================================================================

#[test]
fn test_authority_id() {
    assert_eq!(authority_id(wkt::WGS84), "EPSG:4326");
    assert_eq!(authority_id(wkt::UTM_33N), "EPSG:32633");
    assert_eq!(authority_id(wkt::UTM_33N_NO_AUTHORITY), "");
    assert_eq!(authority_id(wkt::PIXEL_LINE), "");
}

#[test]
fn test_authority_ids_are_expanded() {
    assert!(is_geographic(authority::WGS84));
    assert!(is_projected(authority::UTM_33N));
    assert!(is_projected(authority::WEB_MERCATOR));
    assert!(is_geographic("urn:ogc:def:crs:EPSG::4326"));
}

#[test]
fn test_unknown_authority_ids_are_invalid() {
    assert_eq!(reference_kind(authority::UNKNOWN_CODE), ReferenceKind::Invalid);
    assert_eq!(
        reference_kind(authority::UNKNOWN_AUTHORITY),
        ReferenceKind::Invalid
    );
}

#[test]
fn test_reverse_lookup() {
    let wgs84 = wkt_with_authority_id("EPSG:4326");
    assert!(!wgs84.is_empty());
    assert!(is_geographic(&wgs84));
    assert_eq!(wkt_with_authority("epsg", "4326"), wgs84);

    assert_eq!(wkt_with_authority_id(authority::UNKNOWN_CODE), "");
    assert_eq!(wkt_with_authority_id(authority::UNKNOWN_AUTHORITY), "");
    assert_eq!(wkt_with_authority_id("garbage"), "");
    assert_eq!(wkt_with_authority("EPSG", "99999999"), "");
}

// ============================================================================
// Datum and spheroid extraction
// ============================================================================

#[test]
fn test_geographic_reference_of_projected() {
    let geographic = geographic_reference(wkt::UTM_33N);
    assert!(is_geographic(&geographic));
    assert_eq!(authority_id(&geographic), "EPSG:4326");
}

#[test]
fn test_geographic_reference_of_geographic_is_itself() {
    let geographic = geographic_reference(wkt::WGS84);
    assert!(is_same_reference(&geographic, wkt::WGS84));
}

#[test]
fn test_geographic_reference_of_pixel_line_is_empty() {
    assert_eq!(geographic_reference(wkt::PIXEL_LINE), "");
}

#[test]
fn test_datum_spheroid_wkt() {
    let datum = datum_spheroid_wkt(wkt::ETRS89_LAEA);
    assert!(datum.starts_with("DATUM["));
    assert!(datum.contains("SPHEROID[\"GRS 1980\",6378137,298.257222101]"));
}

#[test]
fn test_spheroid_values() {
    assert_eq!(spheroid_semi_major_axis(wkt::UTM_33N), 6378137.0);
    assert_approx_eq!(spheroid_inverse_flattening(wkt::UTM_33N), 298.257223563, 1e-9);
    assert_eq!(spheroid_semi_major_axis(wkt::ED50_SHIFTED), 6378388.0);
    assert_eq!(spheroid_semi_major_axis(wkt::PIXEL_LINE), 0.0);
}

#[test]
fn test_seven_parameter_shift() {
    let params = bursa_wolf_parameters(wkt::ED50_SHIFTED).unwrap();
    assert_eq!(
        params,
        BursaWolfParameters {
            dx: -87.0,
            dy: -98.0,
            dz: -121.0,
            rx: 0.1,
            ry: -0.2,
            rz: 0.3,
            ppm: 1.5,
        }
    );
}

#[test]
fn test_missing_shift() {
    assert_eq!(bursa_wolf_parameters(wkt::WGS84), None);
    assert_eq!(
        bursa_wolf_parameters(wkt::ETRS89_LAEA),
        Some(BursaWolfParameters::default())
    );
}

// ============================================================================
// Identity
// ============================================================================

#[test]
fn test_same_reference_by_text() {
    assert!(is_same_reference(wkt::MALFORMED, wkt::MALFORMED));
    assert!(is_same_reference(wkt::UTM_33N, wkt::UTM_33N));
}

#[test]
fn test_same_reference_by_authority() {
    assert!(is_same_reference(wkt::WGS84, authority::WGS84));
    assert!(is_same_reference(authority::UTM_33N, wkt::UTM_33N));
    assert!(!is_same_reference(wkt::WGS84, wkt::UTM_33N));
}

#[test]
fn test_same_reference_by_definition() {
    // Same spheroid, different names and delimiters
    let renamed = concat!(
        r#"GEOGCS["Renamed",DATUM["Some datum",SPHEROID["Some spheroid",6378137,298.257223563]],"#,
        r#"PRIMEM["Greenwich",0],UNIT["degree",0.0174532925199433]]"#
    );
    assert!(is_same_reference(wkt::WGS84_PARENS_NO_AUTHORITY, renamed));
    assert!(!is_same_reference(wkt::WGS84_PARENS_NO_AUTHORITY, wkt::ED50_SHIFTED));
}

#[test]
fn test_same_reference_with_and_without_authority() {
    assert!(is_same_reference(wkt::WGS84, wkt::WGS84_PARENS_NO_AUTHORITY));
    assert!(is_same_reference(authority::WGS84, wkt::WGS84_PARENS_NO_AUTHORITY));
    assert!(is_same_reference(authority::UTM_33N, wkt::UTM_33N_NO_AUTHORITY));
    assert!(is_same_reference(wkt::UTM_33N, wkt::UTM_33N_NO_AUTHORITY));

    assert!(!is_same_reference(wkt::UTM_33N_NO_AUTHORITY, wkt::ETRS89_LAEA));
    assert!(!is_same_reference(wkt::WGS84_PARENS_NO_AUTHORITY, wkt::UTM_33N_NO_AUTHORITY));
}

#[test]
fn test_same_reference_sees_other_zone_and_scale() {
    assert!(!is_same_reference("EPSG:32632", wkt::UTM_33N_NO_AUTHORITY));

    let unscaled = wkt::UTM_33N_NO_AUTHORITY.replace(
        r#"PARAMETER["scale_factor",0.9996]"#,
        r#"PARAMETER["scale_factor",1]"#,
    );
    assert!(!is_same_reference(authority::UTM_33N, &unscaled));
}

#[test]
fn test_malformed_is_never_semantically_equal() {
    assert!(!is_same_reference(wkt::MALFORMED, wkt::WGS84));
    assert!(!is_same_reference("", wkt::PIXEL_LINE));
}

#[test]
fn test_proj_definition() {
    let def = proj_definition(wkt::UTM_33N_NO_AUTHORITY).unwrap();
    assert!(def.contains("+proj=tmerc"));
    assert!(def.contains("+lon_0=15"));
    assert!(def.contains("+k=0.9996"));
    assert!(!def.contains("+k_0="));

    let laea = proj_definition(wkt::ETRS89_LAEA).unwrap();
    for term in [
        "+proj=laea",
        "+lat_0=52",
        "+lon_0=10",
        "+x_0=4321000",
        "+y_0=3210000",
        "+towgs84=0,0,0,0,0,0,0",
    ] {
        assert!(laea.contains(term), "{} missing from {}", term, laea);
    }

    assert_eq!(proj_definition(wkt::UNSUPPORTED_PROJECTION), None);
    assert_eq!(proj_definition(wkt::PIXEL_LINE), None);
}
