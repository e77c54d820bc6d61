pub mod by_tag;
pub mod get;
pub mod list;
pub mod search;

pub use by_tag::{PostsByTagError, PostsByTagQuery};
pub use get::{GetPostError, GetPostQuery};
pub use list::{ListPostsError, ListPostsQuery};
pub use search::{SearchPostsError, SearchPostsQuery};
