pub mod change_password;
pub mod login;
pub mod logout;
pub mod register;
pub mod set_groups;
pub mod set_role;
pub mod update_profile;

pub use change_password::{ChangePasswordCommand, ChangePasswordError, PasswordChanged};
pub use login::{LoginCommand, LoginError};
pub use logout::{LogoutCommand, LogoutError};
pub use register::{RegisterCommand, RegisterError};
pub use set_groups::{SetUserGroupsCommand, SetUserGroupsError};
pub use set_role::{SetUserRoleCommand, SetUserRoleError};
pub use update_profile::{UpdateProfileCommand, UpdateProfileError};
