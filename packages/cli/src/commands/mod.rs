pub mod blocks;
pub mod edit;
pub mod init;
pub mod validate;

pub use blocks::{blocks, BlocksArgs};
pub use edit::{add, delete, duplicate, reorder, AddArgs, DeleteArgs, DuplicateArgs, ReorderArgs};
pub use init::{init, InitArgs};
pub use validate::{validate, ValidateArgs};
