//! # 기븐스 회전 (Givens rotation) 캐스케이드
//!
//! n×n 직교 행렬을 n(n-1)/2개의 평면 회전으로 분해합니다.
//! 평면 k는 (p, q), p < q 쌍을 행 우선 순서로 나열한 것입니다:
//! (0,1), (0,2), …, (0,n-1), (1,2), …, (n-2,n-1).

use crate::error::{Error, Result};
use crate::ops::utils::Real;
use ndarray::{s, Array2, ArrayView1, Zip};

/// Coordinate pair a single rotation acts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Plane {
    pub p: usize,
    pub q: usize,
}

/// Number of rotation angles for an n×n matrix.
#[inline]
pub fn num_angles(n: usize) -> usize {
    n * n.saturating_sub(1) / 2
}

/// Inverse of [`num_angles`]. Zero angles means n = 1.
pub fn dimension_from_angles(count: usize) -> Result<usize> {
    let mut n = 1;
    while num_angles(n) < count {
        n += 1;
    }
    if num_angles(n) == count {
        Ok(n)
    } else {
        Err(Error::AngleCount {
            expected: num_angles(n),
            actual: count,
        })
    }
}

/// Planes in canonical order.
pub fn planes(n: usize) -> Vec<Plane> {
    let mut out = Vec::with_capacity(num_angles(n));
    for p in 0..n.saturating_sub(1) {
        for q in (p + 1)..n {
            out.push(Plane { p, q });
        }
    }
    out
}

/// One elementary rotation of the cascade.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GivensRotation<T> {
    pub plane: Plane,
    pub angle: T,
}

impl<T: Real> GivensRotation<T> {
    /// `[cos, -sin; sin, cos]`
    pub fn block(&self) -> [[T; 2]; 2] {
        let (s, c) = self.angle.sin_cos();
        [[c, -s], [s, c]]
    }

    /// d/dθ of [`block`](Self::block): `[-sin, -cos; cos, -sin]`.
    pub fn derivative_block(&self) -> [[T; 2]; 2] {
        let (s, c) = self.angle.sin_cos();
        [[-s, -c], [c, -s]]
    }

    /// `m <- G m`. Only rows p and q change.
    pub fn apply_left(&self, m: &mut Array2<T>) {
        mix_rows(m, self.plane, self.block());
    }

    /// `m <- G' m`, where G' is the derivative of this factor.
    ///
    /// G' is zero outside its 2×2 block, so every row other than p and q is cleared.
    pub fn apply_derivative_left(&self, m: &mut Array2<T>) {
        mix_rows(m, self.plane, self.derivative_block());
        let Plane { p, q } = self.plane;
        for (i, mut row) in m.rows_mut().into_iter().enumerate() {
            if i != p && i != q {
                row.fill(T::zero());
            }
        }
    }

    /// Dense n×n embedding of this factor.
    pub fn embed(&self, n: usize) -> Array2<T> {
        let mut m = Array2::eye(n);
        self.apply_left(&mut m);
        m
    }

    /// Dense n×n embedding of the derivative factor.
    pub fn embed_derivative(&self, n: usize) -> Array2<T> {
        let mut m = Array2::eye(n);
        self.apply_derivative_left(&mut m);
        m
    }
}

fn mix_rows<T: Real>(m: &mut Array2<T>, plane: Plane, b: [[T; 2]; 2]) {
    let (mut rp, mut rq) = m.multi_slice_mut((s![plane.p, ..], s![plane.q, ..]));
    Zip::from(&mut rp).and(&mut rq).for_each(|x, y| {
        let (a, c) = (*x, *y);
        *x = b[0][0] * a + b[0][1] * c;
        *y = b[1][0] * a + b[1][1] * c;
    });
}

/// Builds the rotation arena for an angle vector, inferring n from its length.
pub fn cascade<T: Real>(angles: &ArrayView1<T>) -> Result<(usize, Vec<GivensRotation<T>>)> {
    let n = dimension_from_angles(angles.len())?;
    let rotations = planes(n)
        .into_iter()
        .zip(angles.iter())
        .map(|(plane, &angle)| GivensRotation { plane, angle })
        .collect();
    Ok((n, rotations))
}
