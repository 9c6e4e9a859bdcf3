mod filter;
mod issue;
mod named_entity;
mod user;
mod worklog;

pub use filter::SavedFilter;
pub use issue::{Issue, IssueFields};
pub use named_entity::NamedEntity;
pub use user::User;
pub use worklog::{Worklog, WorklogPage};
