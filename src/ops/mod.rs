pub mod generator;
pub mod givens;
pub mod sign;
pub mod utils;

pub use self::generator::{
    orthonormal_matrix, partial_difference_matrices, partial_difference_matrix,
    OrthonormalMatrixGenerator,
};
pub use self::givens::{dimension_from_angles, num_angles, planes, GivensRotation, Plane};
pub use self::sign::{MusSpec, SignVector};
pub use self::utils::{all_close, frobenius_norm, is_orthonormal, sum_product, Precision, Real};
