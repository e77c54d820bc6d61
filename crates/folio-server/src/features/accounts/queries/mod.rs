pub mod permissions;
pub mod profile;

pub use permissions::{GetPermissionsError, GetPermissionsQuery};
pub use profile::{GetProfileError, GetProfileQuery};
