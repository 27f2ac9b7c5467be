pub mod mode;
pub mod orthonormal;
pub mod reverse;

#[cfg(test)]
mod __test__;

pub use self::mode::Mode;
pub use self::orthonormal::{
    apply_matrix, orthonormal_transform_backward, orthonormal_transform_forward,
    OrthonormalTransform,
};
pub use self::reverse::{Gradients, ReverseRule, SavedTensors};
