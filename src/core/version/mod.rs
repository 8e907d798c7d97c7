pub mod alias;
pub mod custom_files;
pub mod library_index;
pub mod manifest;
pub mod version_file;

pub use alias::{
    resolve_version, AliasResolver, OfflineAliasResolver, OnlineAliasResolver, LATEST_ALIAS,
};
pub use custom_files::CustomFileIndex;
pub use library_index::{HashEntry, LibraryIndex};
pub use manifest::VersionPointer;
pub use version_file::{rules_allow, LibraryEntry, LibraryRule, OsRule, RuleAction, VersionJson};
