//! Command implementations.

pub mod close;
pub mod info;
pub mod inspect;
pub mod profile;

pub use self::close::execute_close;
pub use self::info::execute_info;
pub use self::inspect::execute_inspect;
pub use self::profile::execute_profile;
