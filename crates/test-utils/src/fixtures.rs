//! Common test fixtures for spatial reference tests.
//!
//! This module provides pre-defined reference descriptors and extents that
//! represent common scenarios: geographic and projected references with and
//! without authority codes, raster pixel/line references, and broken input.

/// WKT reference descriptors.
pub mod wkt {
    /// WGS 84 geographic, with EPSG authorities on every node.
    pub const WGS84: &str = concat!(
        r#"GEOGCS["WGS 84",DATUM["WGS_1984",SPHEROID["WGS 84",6378137,298.257223563,"#,
        r#"AUTHORITY["EPSG","7030"]],AUTHORITY["EPSG","6326"]],"#,
        r#"PRIMEM["Greenwich",0,AUTHORITY["EPSG","8901"]],"#,
        r#"UNIT["degree",0.0174532925199433,AUTHORITY["EPSG","9122"]],"#,
        r#"AUTHORITY["EPSG","4326"]]"#
    );

    /// WGS 84 geographic written with parentheses and no authority.
    pub const WGS84_PARENS_NO_AUTHORITY: &str = concat!(
        r#"GEOGCS("WGS 84",DATUM("WGS_1984",SPHEROID("WGS 84",6378137,298.257223563)),"#,
        r#"PRIMEM("Greenwich",0),UNIT("degree",0.0174532925199433))"#
    );

    /// WGS 84 / UTM zone 33N.
    pub const UTM_33N: &str = concat!(
        r#"PROJCS["WGS 84 / UTM zone 33N","#,
        r#"GEOGCS["WGS 84",DATUM["WGS_1984",SPHEROID["WGS 84",6378137,298.257223563,"#,
        r#"AUTHORITY["EPSG","7030"]],AUTHORITY["EPSG","6326"]],"#,
        r#"PRIMEM["Greenwich",0,AUTHORITY["EPSG","8901"]],"#,
        r#"UNIT["degree",0.0174532925199433,AUTHORITY["EPSG","9122"]],"#,
        r#"AUTHORITY["EPSG","4326"]],"#,
        r#"PROJECTION["Transverse_Mercator"],"#,
        r#"PARAMETER["latitude_of_origin",0],PARAMETER["central_meridian",15],"#,
        r#"PARAMETER["scale_factor",0.9996],PARAMETER["false_easting",500000],"#,
        r#"PARAMETER["false_northing",0],"#,
        r#"UNIT["metre",1,AUTHORITY["EPSG","9001"]],"#,
        r#"AXIS["Easting",EAST],AXIS["Northing",NORTH],"#,
        r#"AUTHORITY["EPSG","32633"]]"#
    );

    /// UTM zone 33N without a root authority, so the backend definition has
    /// to be derived from the projection parameters.
    pub const UTM_33N_NO_AUTHORITY: &str = concat!(
        r#"PROJCS["UTM 33N (custom)","#,
        r#"GEOGCS["WGS 84",DATUM["WGS_1984",SPHEROID["WGS 84",6378137,298.257223563]],"#,
        r#"PRIMEM["Greenwich",0],UNIT["degree",0.0174532925199433]],"#,
        r#"PROJECTION["Transverse_Mercator"],"#,
        r#"PARAMETER["latitude_of_origin",0],PARAMETER["central_meridian",15],"#,
        r#"PARAMETER["scale_factor",0.9996],PARAMETER["false_easting",500000],"#,
        r#"PARAMETER["false_northing",0],UNIT["metre",1]]"#
    );

    /// ETRS89 / LAEA Europe with an explicit Bursa-Wolf datum shift.
    pub const ETRS89_LAEA: &str = concat!(
        r#"PROJCS["ETRS89 / LAEA Europe","#,
        r#"GEOGCS["ETRS89",DATUM["European_Terrestrial_Reference_System_1989","#,
        r#"SPHEROID["GRS 1980",6378137,298.257222101],TOWGS84[0,0,0,0,0,0,0]],"#,
        r#"PRIMEM["Greenwich",0],UNIT["degree",0.0174532925199433]],"#,
        r#"PROJECTION["Lambert_Azimuthal_Equal_Area"],"#,
        r#"PARAMETER["latitude_of_center",52],PARAMETER["longitude_of_center",10],"#,
        r#"PARAMETER["false_easting",4321000],PARAMETER["false_northing",3210000],"#,
        r#"UNIT["metre",1]]"#
    );

    /// A geographic reference on an old European datum with a 7-parameter shift.
    pub const ED50_SHIFTED: &str = concat!(
        r#"GEOGCS["ED50",DATUM["European_Datum_1950","#,
        r#"SPHEROID["International 1924",6378388,297],"#,
        r#"TOWGS84[-87,-98,-121,0.1,-0.2,0.3,1.5]],"#,
        r#"PRIMEM["Greenwich",0],UNIT["degree",0.0174532925199433]]"#
    );

    /// A raster pixel/line pseudo reference.
    pub const PIXEL_LINE: &str = r#"LOCAL_CS["Pixel-Line",UNIT["pixel",1]]"#;

    /// A second, textually different, pixel/line reference.
    pub const PIXEL_LINE_OTHER: &str = r#"LOCAL_CS["Raster rows and columns"]"#;

    /// Truncated WKT that no parser accepts.
    pub const MALFORMED: &str = r#"GEOGCS["WGS 84",DATUM["WGS_1984",SPHEROID["#;

    /// Projected reference using a projection method the backend has no
    /// mapping for.
    pub const UNSUPPORTED_PROJECTION: &str = concat!(
        r#"PROJCS["Exotic",GEOGCS["WGS 84",DATUM["WGS_1984","#,
        r#"SPHEROID["WGS 84",6378137,298.257223563]],PRIMEM["Greenwich",0],"#,
        r#"UNIT["degree",0.0174532925199433]],PROJECTION["Van_der_Grinten_IV"],"#,
        r#"UNIT["metre",1]]"#
    );
}

/// Authority id descriptors.
pub mod authority {
    pub const WGS84: &str = "EPSG:4326";
    pub const UTM_33N: &str = "EPSG:32633";
    pub const WEB_MERCATOR: &str = "EPSG:3857";
    pub const UNKNOWN_CODE: &str = "EPSG:1";
    pub const UNKNOWN_AUTHORITY: &str = "ACME:4326";
}

/// Common extent definitions for testing, as `(ulx, uly, lrx, lry)`.
pub mod extent {
    /// Whole world, north-up (upper-left y is the larger value).
    pub const GLOBAL: (f64, f64, f64, f64) = (-180.0, 90.0, 180.0, -90.0);

    /// Central Europe around UTM zone 33, north-up.
    pub const CENTRAL_EUROPE: (f64, f64, f64, f64) = (12.0, 54.0, 18.0, 46.0);

    /// Spain and Portugal, north-up.
    pub const IBERIA: (f64, f64, f64, f64) = (-10.0, 44.0, 4.0, 36.0);

    /// A 512x256 raster in pixel/line space (y grows downwards).
    pub const RASTER_512X256: (f64, f64, f64, f64) = (0.0, 0.0, 512.0, 256.0);

    /// A 100x100 raster offset from the origin.
    pub const RASTER_OFFSET: (f64, f64, f64, f64) = (1000.0, 2000.0, 1100.0, 2100.0);

    /// The "no extent" sentinel.
    pub const DEGENERATE: (f64, f64, f64, f64) = (0.0, 0.0, 0.0, 0.0);
}
