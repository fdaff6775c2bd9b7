//! Backend (PROJ.4-style) definitions for parsed descriptors.
//!
//! A descriptor with an EPSG authority on its root is looked up in the
//! compiled-in EPSG table. Anything else is converted by `proj4wkt`, and the
//! result is adjusted for the keys `proj4rs` reads differently.

use std::collections::BTreeMap;
use std::fmt;

use tracing::debug;

use crate::wkt::WktNode;

/// Tokens that never change the meaning of a definition.
const NEUTRAL_KEYS: &[&str] = &["no_defs", "type", "wktext"];

/// Projection parameters that may be omitted.
const PROJECTION_DEFAULTS: &[(&str, f64)] = &[
    ("lat_0", 0.0),
    ("lon_0", 0.0),
    ("x_0", 0.0),
    ("y_0", 0.0),
    ("k", 1.0),
];

/// Relative tolerance when comparing numeric parameters.
const PARAM_TOLERANCE: f64 = 1e-9;

/// Backend definition for a parsed descriptor, if one can be produced.
pub fn definition_for(root: &WktNode) -> Option<String> {
    if let Some(def) = authority_definition(root) {
        return Some(def);
    }
    if !root.is("GEOGCS") && !root.is("PROJCS") {
        return None;
    }

    match proj4wkt::wkt_to_projstring(&root.to_wkt()) {
        Ok(def) => Some(adapt_for_backend(ProjString::parse(&def), root).to_string()),
        Err(e) => {
            debug!(error = %e, "No backend definition for descriptor");
            None
        }
    }
}

/// Whether two definitions describe the same reference.
///
/// Named datums, ellipsoids, prime meridians and units are resolved, `utm`
/// is expanded to its transverse Mercator parameters and omitted parameters
/// take their defaults before comparison. Definitions naming something that
/// cannot be resolved fall back to an exact token comparison.
pub fn same_definition(a: &str, b: &str) -> bool {
    match (Resolved::from_definition(a), Resolved::from_definition(b)) {
        (Some(ra), Some(rb)) => ra.matches(&rb),
        _ => canonical_tokens(a) == canonical_tokens(b),
    }
}

fn canonical_tokens(definition: &str) -> Vec<&str> {
    let mut tokens: Vec<&str> = definition
        .split_whitespace()
        .filter(|t| {
            let key = t.trim_start_matches('+').split('=').next().unwrap_or_default();
            !NEUTRAL_KEYS.contains(&key)
        })
        .collect();
    tokens.sort_unstable();
    tokens.dedup();
    tokens
}

fn authority_definition(root: &WktNode) -> Option<String> {
    let authority = root.child("AUTHORITY")?.scalars();
    let (name, code) = (authority.first()?, authority.get(1)?);
    if !name.eq_ignore_ascii_case("EPSG") {
        return None;
    }
    let code: u16 = code.trim().parse().ok()?;
    crs_definitions::from_code(code)
        .map(|def| def.proj4.trim().to_string())
        .filter(|proj4| !proj4.is_empty())
}

/// Patch a converted definition for `proj4rs`.
///
/// `proj4rs` reads the scale factor from `k`, rejects `rf=0` for spheres and
/// the converter does not carry the prime meridian over.
fn adapt_for_backend(mut def: ProjString, root: &WktNode) -> ProjString {
    def.rename("k_0", "k");

    if def.number("rf") == Some(0.0) {
        if let Some(a) = def.get("a").map(str::to_string) {
            def.remove("rf");
            def.set("b", a);
        }
    }

    if !def.contains("pm") {
        let geogcs = if root.is("GEOGCS") {
            Some(root)
        } else {
            root.child("GEOGCS")
        };
        let pm = geogcs
            .and_then(|g| g.child("PRIMEM"))
            .and_then(|p| p.number(0))
            .filter(|pm| *pm != 0.0);
        if let Some(pm) = pm {
            def.set("pm", pm.to_string());
        }
    }
    def
}

/// A definition as an ordered list of `+key[=value]` tokens.
#[derive(Debug, Clone, Default, PartialEq)]
struct ProjString(Vec<(String, Option<String>)>);

impl ProjString {
    fn parse(definition: &str) -> Self {
        ProjString(
            definition
                .split_whitespace()
                .filter_map(|token| token.strip_prefix('+'))
                .map(|token| match token.split_once('=') {
                    Some((key, value)) => (key.to_string(), Some(value.to_string())),
                    None => (token.to_string(), None),
                })
                .collect(),
        )
    }

    fn contains(&self, key: &str) -> bool {
        self.0.iter().any(|(k, _)| k == key)
    }

    fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .and_then(|(_, v)| v.as_deref())
    }

    fn number(&self, key: &str) -> Option<f64> {
        self.get(key)?.parse().ok()
    }

    fn set(&mut self, key: &str, value: String) {
        match self.0.iter_mut().find(|(k, _)| k == key) {
            Some((_, v)) => *v = Some(value),
            None => self.0.push((key.to_string(), Some(value))),
        }
    }

    fn rename(&mut self, from: &str, to: &str) {
        for (key, _) in self.0.iter_mut().filter(|(k, _)| k == from) {
            *key = to.to_string();
        }
    }

    fn remove(&mut self, key: &str) -> Option<Option<String>> {
        let index = self.0.iter().position(|(k, _)| k == key)?;
        Some(self.0.remove(index).1)
    }

    fn take(&mut self, key: &str) -> Option<String> {
        self.remove(key).flatten()
    }

    fn take_number(&mut self, key: &str) -> Option<f64> {
        self.take(key)?.parse().ok()
    }
}

impl fmt::Display for ProjString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (key, value)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            match value {
                Some(value) => write!(f, "+{}={}", key, value)?,
                None => write!(f, "+{}", key)?,
            }
        }
        Ok(())
    }
}

/// Ellipsoid as semi-major axis and inverse flattening (0 for a sphere).
type Ellipsoid = (f64, f64);

const WGS84_ELLIPSOID: Ellipsoid = (6_378_137.0, 298.257_223_563);

fn named_ellipsoid(name: &str) -> Option<Ellipsoid> {
    let ellipsoid = match name {
        "WGS84" => WGS84_ELLIPSOID,
        "GRS80" => (6_378_137.0, 298.257_222_101),
        "WGS72" => (6_378_135.0, 298.26),
        "intl" => (6_378_388.0, 297.0),
        "krass" => (6_378_245.0, 298.3),
        "helmert" => (6_378_200.0, 298.3),
        "bessel" => (6_377_397.155, 299.152_812_8),
        "clrk66" => flattening_from_minor(6_378_206.4, 6_356_583.8),
        "clrk80" => (6_378_249.145, 293.4663),
        "airy" => (6_377_563.396, 299.324_964_6),
        "aust_SA" => (6_378_160.0, 298.25),
        "sphere" => (6_370_997.0, 0.0),
        _ => return None,
    };
    Some(ellipsoid)
}

fn flattening_from_minor(a: f64, b: f64) -> Ellipsoid {
    if a == b {
        (a, 0.0)
    } else {
        (a, a / (a - b))
    }
}

/// Datums with an ellipsoid and a zero shift to WGS 84.
fn named_datum(name: &str) -> Option<Ellipsoid> {
    match name {
        "WGS84" => Some(WGS84_ELLIPSOID),
        "NAD83" => named_ellipsoid("GRS80"),
        _ => None,
    }
}

fn named_prime_meridian(name: &str) -> Option<f64> {
    let degrees = match name.to_ascii_lowercase().as_str() {
        "greenwich" => 0.0,
        "lisbon" => -9.131_906_111_111,
        "paris" => 2.337_229_166_667,
        "bogota" => -74.080_916_666_667,
        "madrid" => -3.687_938_888_889,
        "rome" => 12.452_333_333_333,
        "bern" => 7.439_583_333_333,
        "jakarta" => 106.807_719_444_444,
        "ferro" => -17.666_666_666_667,
        "brussels" => 4.367_975,
        "stockholm" => 18.058_277_777_778,
        "athens" => 23.7163375,
        "oslo" => 10.722_916_666_667,
        _ => return None,
    };
    Some(degrees)
}

fn linear_unit(name: &str) -> Option<f64> {
    match name {
        "m" => Some(1.0),
        "km" => Some(1000.0),
        "ft" => Some(0.3048),
        "us-ft" => Some(1200.0 / 3937.0),
        _ => None,
    }
}

/// A definition with every named or implied value made explicit.
#[derive(Debug, Clone, PartialEq)]
struct Resolved {
    proj: String,
    ellipsoid: Ellipsoid,
    towgs84: [f64; 7],
    pm: f64,
    to_meter: f64,
    params: BTreeMap<String, f64>,
    flags: BTreeMap<String, Option<String>>,
}

impl Resolved {
    fn from_definition(definition: &str) -> Option<Self> {
        let mut def = ProjString::parse(definition);
        for key in NEUTRAL_KEYS {
            def.remove(key);
        }

        let mut proj = def.take("proj")?;
        if matches!(proj.as_str(), "latlong" | "lonlat" | "latlon") {
            proj = "longlat".to_string();
        }
        if proj == "utm" {
            let zone = def.take_number("zone")?;
            let south = def.remove("south").is_some();
            proj = "tmerc".to_string();
            def.set("lon_0", (zone * 6.0 - 183.0).to_string());
            def.set("k", "0.9996".to_string());
            def.set("x_0", "500000".to_string());
            def.set("y_0", if south { "10000000" } else { "0" }.to_string());
        }
        def.rename("k_0", "k");
        def.rename("k0", "k");

        let mut ellipsoid = WGS84_ELLIPSOID;
        let mut towgs84 = [0.0; 7];
        if let Some(name) = def.take("datum") {
            ellipsoid = named_datum(&name)?;
        }
        if let Some(name) = def.take("ellps") {
            ellipsoid = named_ellipsoid(&name)?;
        }
        if let Some(radius) = def.take_number("R") {
            ellipsoid = (radius, 0.0);
        } else if let Some(a) = def.take_number("a") {
            let rf = def.take_number("rf");
            let f = def.take_number("f");
            let b = def.take_number("b");
            ellipsoid = match (rf, f, b) {
                (Some(rf), _, _) => (a, rf),
                (None, Some(f), _) if f > 0.0 => (a, 1.0 / f),
                (None, None, Some(b)) => flattening_from_minor(a, b),
                _ => (a, 0.0),
            };
        }
        if let Some(shift) = def.take("towgs84") {
            let values: Vec<f64> = shift
                .split(',')
                .map(|v| v.trim().parse().ok())
                .collect::<Option<_>>()?;
            if values.len() != 3 && values.len() != 7 {
                return None;
            }
            towgs84[..values.len()].copy_from_slice(&values);
        }

        let pm = match def.take("pm") {
            Some(pm) => pm
                .parse::<f64>()
                .ok()
                .or_else(|| named_prime_meridian(&pm))?,
            None => 0.0,
        };

        let mut to_meter = 1.0;
        if let Some(factor) = def.take_number("to_meter") {
            to_meter = factor;
        } else if let Some(units) = def.take("units") {
            to_meter = linear_unit(&units)?;
        }
        if proj == "longlat" {
            to_meter = 1.0;
        }

        let mut params = BTreeMap::new();
        let mut flags = BTreeMap::new();
        for (key, value) in def.0 {
            let number = value.as_deref().and_then(|v| v.parse::<f64>().ok());
            match number {
                Some(number) => {
                    params.insert(key, number);
                }
                None => {
                    flags.insert(key, value);
                }
            }
        }
        if proj != "longlat" {
            for (key, default) in PROJECTION_DEFAULTS {
                params.entry(key.to_string()).or_insert(*default);
            }
        }

        Some(Self {
            proj,
            ellipsoid,
            towgs84,
            pm,
            to_meter,
            params,
            flags,
        })
    }

    fn matches(&self, other: &Self) -> bool {
        self.proj == other.proj
            && close(self.ellipsoid.0, other.ellipsoid.0)
            && close(self.ellipsoid.1, other.ellipsoid.1)
            && self.towgs84.iter().zip(&other.towgs84).all(|(a, b)| close(*a, *b))
            && close(self.pm, other.pm)
            && close(self.to_meter, other.to_meter)
            && self.flags == other.flags
            && self.params.len() == other.params.len()
            && self.params.iter().all(|(key, value)| {
                other.params.get(key).is_some_and(|other| close(*value, *other))
            })
    }
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= PARAM_TOLERANCE * a.abs().max(b.abs()).max(1.0)
}
