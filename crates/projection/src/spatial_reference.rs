//! Queries over spatial reference descriptors.
//!
//! Every function takes the descriptor as text and never fails loudly: a
//! descriptor that cannot be parsed answers `false`, an empty string, zero
//! or `None`. Raster layers routinely carry no geodetic reference at all and
//! callers are expected to keep working with them.
//!
//! Descriptors are WKT (version 1, with WKT2 keywords accepted) or authority
//! ids such as `EPSG:4326`, which are expanded through the EPSG table before
//! any query.

use std::borrow::Cow;

use crate::proj_def;
use crate::wkt::WktNode;

/// Classification of a descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKind {
    Geographic,
    Projected,
    /// Raster row/column space: empty, or parsed without a GEOGCS/PROJCS root.
    PixelLine,
    /// Non-empty text that does not parse.
    Invalid,
}

/// Seven-parameter (Bursa-Wolf) datum shift towards WGS 84.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BursaWolfParameters {
    /// Translations in metres.
    pub dx: f64,
    pub dy: f64,
    pub dz: f64,
    /// Rotations in arc-seconds.
    pub rx: f64,
    pub ry: f64,
    pub rz: f64,
    /// Scale difference in parts per million.
    pub ppm: f64,
}

/// Expand authority ids to WKT; anything else is returned untouched.
pub fn expand_descriptor(reference: &str) -> Cow<'_, str> {
    let trimmed = reference.trim();
    if trimmed.contains(['[', '(']) {
        return Cow::Borrowed(reference);
    }

    let expanded = match split_authority_id(trimmed) {
        Some((name, code)) => wkt_with_authority(name, code),
        None => String::new(),
    };

    if expanded.is_empty() {
        Cow::Borrowed(reference)
    } else {
        Cow::Owned(expanded)
    }
}

/// Split `AUTH:CODE` or `urn:ogc:def:crs:AUTH:[version]:CODE`.
fn split_authority_id(id: &str) -> Option<(&str, &str)> {
    let parts: Vec<&str> = id.split(':').collect();
    let (name, code) = match parts.as_slice() {
        [name, code] => (*name, *code),
        [urn, "ogc", "def", "crs", name, _version, code] if urn.eq_ignore_ascii_case("urn") => {
            (*name, *code)
        }
        _ => return None,
    };
    if name.is_empty() || code.is_empty() || !code.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    Some((name, code))
}

/// Parse a descriptor (after authority expansion) into its tree.
pub fn parse_descriptor(reference: &str) -> Option<WktNode> {
    WktNode::parse(&expand_descriptor(reference)).ok()
}

pub fn reference_kind(reference: &str) -> ReferenceKind {
    if reference.trim().is_empty() {
        return ReferenceKind::PixelLine;
    }
    match parse_descriptor(reference) {
        Some(root) if root.is("GEOGCS") => ReferenceKind::Geographic,
        Some(root) if root.is("PROJCS") => ReferenceKind::Projected,
        Some(_) => ReferenceKind::PixelLine,
        None => ReferenceKind::Invalid,
    }
}

pub fn is_geographic(reference: &str) -> bool {
    reference_kind(reference) == ReferenceKind::Geographic
}

pub fn is_projected(reference: &str) -> bool {
    reference_kind(reference) == ReferenceKind::Projected
}

/// True for empty descriptors and for parsed descriptors whose root is
/// neither GEOGCS nor PROJCS.
pub fn is_pixel_line(reference: &str) -> bool {
    reference_kind(reference) == ReferenceKind::PixelLine
}

/// Descriptor parses under the WKT grammar.
pub fn is_valid_spatial_reference(reference: &str) -> bool {
    parse_descriptor(reference).is_some()
}

/// `"NAME:CODE"` from the root AUTHORITY node, or an empty string.
pub fn authority_id(reference: &str) -> String {
    parse_descriptor(reference)
        .and_then(|root| root_authority(&root))
        .unwrap_or_default()
}

fn root_authority(root: &WktNode) -> Option<String> {
    let scalars = root.child("AUTHORITY")?.scalars();
    match scalars.as_slice() {
        [name, code, ..] if !name.is_empty() && !code.is_empty() => {
            Some(format!("{}:{}", name, code))
        }
        _ => None,
    }
}

/// Reverse lookup of `"NAME:CODE"`; empty when the authority is unknown.
pub fn wkt_with_authority_id(authority_id: &str) -> String {
    match split_authority_id(authority_id.trim()) {
        Some((name, code)) => wkt_with_authority(name, code),
        None => String::new(),
    }
}

/// Reverse lookup of an authority name and code; only EPSG is known.
pub fn wkt_with_authority(name: &str, code: &str) -> String {
    if !name.trim().eq_ignore_ascii_case("EPSG") {
        return String::new();
    }
    code.trim()
        .parse::<u16>()
        .ok()
        .and_then(crs_definitions::from_code)
        .map(|def| def.wkt.to_string())
        .unwrap_or_default()
}

/// GEOGCS node of a geographic or projected descriptor.
fn geographic_node(root: &WktNode) -> Option<&WktNode> {
    if root.is("GEOGCS") {
        Some(root)
    } else if root.is("PROJCS") {
        root.get_node("PROJCS|GEOGCS")
    } else {
        None
    }
}

/// The geographic reference a descriptor is based on, as WKT.
pub fn geographic_reference(reference: &str) -> String {
    parse_descriptor(reference)
        .and_then(|root| geographic_node(&root).map(WktNode::to_wkt))
        .unwrap_or_default()
}

/// The DATUM node (which carries the SPHEROID) as WKT.
pub fn datum_spheroid_wkt(reference: &str) -> String {
    parse_descriptor(reference)
        .and_then(|root| {
            geographic_node(&root)
                .and_then(|geogcs| geogcs.child("DATUM"))
                .map(WktNode::to_wkt)
        })
        .unwrap_or_default()
}

pub fn bursa_wolf_parameters(reference: &str) -> Option<BursaWolfParameters> {
    let root = parse_descriptor(reference)?;
    let towgs84 = geographic_node(&root)?.child("DATUM")?.child("TOWGS84")?;
    match towgs84.numbers().as_slice() {
        [dx, dy, dz] => Some(BursaWolfParameters {
            dx: *dx,
            dy: *dy,
            dz: *dz,
            ..Default::default()
        }),
        [dx, dy, dz, rx, ry, rz, ppm] => Some(BursaWolfParameters {
            dx: *dx,
            dy: *dy,
            dz: *dz,
            rx: *rx,
            ry: *ry,
            rz: *rz,
            ppm: *ppm,
        }),
        _ => None,
    }
}

fn spheroid_number(reference: &str, index: usize) -> f64 {
    parse_descriptor(reference)
        .and_then(|root| {
            geographic_node(&root)
                .and_then(|geogcs| geogcs.find("SPHEROID"))
                .and_then(|spheroid| spheroid.number(index))
        })
        .unwrap_or(0.0)
}

pub fn spheroid_semi_major_axis(reference: &str) -> f64 {
    spheroid_number(reference, 0)
}

pub fn spheroid_inverse_flattening(reference: &str) -> f64 {
    spheroid_number(reference, 1)
}

/// Backend definition string for a descriptor.
pub fn proj_definition(reference: &str) -> Option<String> {
    proj_def::definition_for(&parse_descriptor(reference)?)
}

/// Whether two descriptors name the same reference.
///
/// Identical text always matches. Otherwise both must parse, and either carry
/// the same root authority id or produce equivalent backend definitions.
pub fn is_same_reference(a: &str, b: &str) -> bool {
    if a == b {
        return true;
    }

    let (Some(root_a), Some(root_b)) = (parse_descriptor(a), parse_descriptor(b)) else {
        return false;
    };

    if let (Some(id_a), Some(id_b)) = (root_authority(&root_a), root_authority(&root_b)) {
        if id_a.eq_ignore_ascii_case(&id_b) {
            return true;
        }
    }

    match (
        proj_def::definition_for(&root_a),
        proj_def::definition_for(&root_b),
    ) {
        (Some(def_a), Some(def_b)) => proj_def::same_definition(&def_a, &def_b),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GEO: &str = r#"GEOGCS["g",DATUM["d",SPHEROID["s",6378388,297],TOWGS84[-87,-98,-121]]]"#;

    #[test]
    fn test_split_authority_id() {
        assert_eq!(split_authority_id("EPSG:4326"), Some(("EPSG", "4326")));
        assert_eq!(
            split_authority_id("urn:ogc:def:crs:EPSG::4326"),
            Some(("EPSG", "4326"))
        );
        assert_eq!(split_authority_id("EPSG:abc"), None);
        assert_eq!(split_authority_id("EPSG"), None);
        assert_eq!(split_authority_id(":4326"), None);
    }

    #[test]
    fn test_three_parameter_shift() {
        let params = bursa_wolf_parameters(GEO).unwrap();
        assert_eq!(params.dx, -87.0);
        assert_eq!(params.dz, -121.0);
        assert_eq!(params.rx, 0.0);
        assert_eq!(params.ppm, 0.0);
    }

    #[test]
    fn test_spheroid_accessors() {
        assert_eq!(spheroid_semi_major_axis(GEO), 6378388.0);
        assert_eq!(spheroid_inverse_flattening(GEO), 297.0);
    }

    #[test]
    fn test_wkt_left_alone() {
        assert!(matches!(expand_descriptor(GEO), Cow::Borrowed(_)));
    }
}
