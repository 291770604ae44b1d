/// Object store prefix for before/after pickup evidence
pub const PICKUP_PHOTOS_DIR: &str = "pickup_photos";
/// Object store prefix for the final disposal evidence
pub const DUMP_PHOTOS_DIR: &str = "dump_photos";

pub const PHOTO_CONTENT_TYPE: &str = "image/jpeg";

/// Keyword sent to the places provider when ranking disposal sites
pub const DEFAULT_SITE_KEYWORD: &str = "public dumpster waste disposal";
pub const DEFAULT_SITE_SEARCH_RADIUS_METERS: u32 = 5000;

pub const DEFAULT_FIX_TIMEOUT_MS: u64 = 15_000;
/// Budget for reverse geocoding a fix before it is returned without an address
pub const DEFAULT_GEOCODE_TIMEOUT_MS: u64 = 3_000;
pub const DEFAULT_WATCH_INTERVAL_MS: u64 = 10_000;
pub const DEFAULT_WATCH_MIN_DISTANCE_METERS: f64 = 10.0;

/// Downtown Atlanta, substituted when no real fix is available
pub const DEFAULT_FALLBACK_LATITUDE: f64 = 33.7490;
pub const DEFAULT_FALLBACK_LONGITUDE: f64 = -84.3880;

pub fn pickup_photo_path(job_id: &str, slot: &str, timestamp_ms: i64) -> String {
    format!("{}/{}/{}_{}.jpg", PICKUP_PHOTOS_DIR, job_id, slot, timestamp_ms)
}

pub fn dump_photo_path(job_id: &str, timestamp_ms: i64) -> String {
    format!("{}/{}/{}.jpg", DUMP_PHOTOS_DIR, job_id, timestamp_ms)
}
