// Collaborator abstractions. The host application provides the implementations.

pub mod job_store;
pub mod location;
pub mod navigation;
pub mod storage;

pub use job_store::JobRecordStore;
pub use location::DeviceLocationProvider;
pub use navigation::NavigationLauncher;
pub use storage::ObjectStore;
