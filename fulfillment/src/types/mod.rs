pub mod constant;
pub mod jobs;
pub mod location;
pub mod params;
pub mod site;
