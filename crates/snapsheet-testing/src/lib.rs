//! Testing utilities for snapsheet.

pub mod robot;
pub mod robot_assertions;

pub use robot::*;
pub use robot_assertions::{assert_approx_eq, assert_extent};

pub mod prelude {
    pub use crate::robot::*;
    pub use crate::robot_assertions;
    pub use crate::robot_assertions::{assert_approx_eq, assert_extent};
}
