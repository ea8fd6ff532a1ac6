pub mod archive;
pub mod build_dir;
pub mod copy;
pub mod delete;
pub mod list;
pub mod load;
pub mod new;
pub mod recent;

pub use archive::*;
pub use build_dir::*;
pub use copy::*;
pub use delete::*;
pub use list::*;
pub use load::*;
pub use new::*;
pub use recent::*;
