//! 变换工具
//!
//! `DMat4` 按数学语义使用：`element(m, row, col)` 即 m[row][col]。
//! 变换组合一律右乘（`new = old * elementary`），顺序不可交换。

use glam::{DMat4, DVec3};

use super::Axis;

/// 行主序语义取元素 m[row][col]
#[inline]
pub fn element(m: &DMat4, row: usize, col: usize) -> f64 {
    m.col(col)[row]
}

/// 绕基本轴旋转（角度制）
pub fn rotation(axis: Axis, degrees: f64) -> DMat4 {
    let radians = degrees.to_radians();
    match axis {
        Axis::X => DMat4::from_rotation_x(radians),
        Axis::Y => DMat4::from_rotation_y(radians),
        Axis::Z => DMat4::from_rotation_z(radians),
    }
}

/// 缩放矩阵
#[inline]
pub fn scaling(amount: DVec3) -> DMat4 {
    DMat4::from_scale(amount)
}

/// 平移矩阵
#[inline]
pub fn translation(amount: DVec3) -> DMat4 {
    DMat4::from_translation(amount)
}

/// 沿单轴平移
#[inline]
pub fn axis_translation(axis: Axis, distance: f64) -> DMat4 {
    let v = match axis {
        Axis::X => DVec3::new(distance, 0.0, 0.0),
        Axis::Y => DVec3::new(0.0, distance, 0.0),
        Axis::Z => DVec3::new(0.0, 0.0, distance),
    };
    translation(v)
}

/// 转为后端要求的列主序数组（即行主序矩阵的转置布局）
#[inline]
pub fn to_backend(m: &DMat4) -> [f64; 16] {
    m.to_cols_array()
}

/// 两矩阵逐元素近似相等
pub fn approx_eq(a: &DMat4, b: &DMat4, epsilon: f64) -> bool {
    a.to_cols_array()
        .iter()
        .zip(b.to_cols_array().iter())
        .all(|(x, y)| (x - y).abs() <= epsilon)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotation_x_row_layout() {
        let r = rotation(Axis::X, 90.0);
        assert!((element(&r, 1, 1)).abs() < 1e-12);
        assert!((element(&r, 1, 2) + 1.0).abs() < 1e-12);
        assert!((element(&r, 2, 1) - 1.0).abs() < 1e-12);
        // 与 glam 的右手旋转一致
        assert!(approx_eq(&r, &DMat4::from_rotation_x(90f64.to_radians()), 1e-12));
    }

    #[test]
    fn test_rotation_y_and_z_match_glam() {
        let ry = rotation(Axis::Y, 33.0);
        let rz = rotation(Axis::Z, -71.0);
        assert!(approx_eq(&ry, &DMat4::from_rotation_y(33f64.to_radians()), 1e-12));
        assert!(approx_eq(&rz, &DMat4::from_rotation_z((-71f64).to_radians()), 1e-12));
        assert!((element(&ry, 0, 2) - 33f64.to_radians().sin()).abs() < 1e-12);
    }

    #[test]
    fn test_translation_in_last_column() {
        let t = translation(DVec3::new(1.0, 2.0, 3.0));
        assert_eq!(element(&t, 0, 3), 1.0);
        assert_eq!(element(&t, 1, 3), 2.0);
        assert_eq!(element(&t, 2, 3), 3.0);
        // 后端布局中平移位于 12..15
        let gl = to_backend(&t);
        assert_eq!(&gl[12..15], &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_composition_order_matters() {
        let t = translation(DVec3::X);
        let r = rotation(Axis::Z, 90.0);
        let p = DVec3::ZERO;
        // t * r: 先旋转再平移
        assert!(((t * r).transform_point3(p) - DVec3::X).length() < 1e-12);
        // r * t: 平移后的点被旋转到 +Y
        assert!(((r * t).transform_point3(p) - DVec3::Y).length() < 1e-12);
    }
}
