use std::ops;

/// Point, direction or RGB triple
#[repr(C)]
#[derive(Clone, Copy, Default, Debug, PartialEq, PartialOrd)]
pub struct Vec3(pub f32, pub f32, pub f32);

impl Vec3 {
    pub fn x(&self) -> f32 {
        self.0
    }

    pub fn y(&self) -> f32 {
        self.1
    }

    pub fn z(&self) -> f32 {
        self.2
    }

    pub fn zero() -> Vec3 {
        Vec3(0.0, 0.0, 0.0)
    }

    pub fn splat(value: f32) -> Vec3 {
        Vec3(value, value, value)
    }

    pub fn square_magnitude(&self) -> f32 {
        Vec3::dot(*self, *self)
    }

    pub fn length(&self) -> f32 {
        self.square_magnitude().sqrt()
    }

    pub fn dot(a: Vec3, b: Vec3) -> f32 {
        a.0 * b.0 + a.1 * b.1 + a.2 * b.2
    }

    pub fn cross(u: Vec3, v: Vec3) -> Vec3 {
        Vec3(
            u.1 * v.2 - u.2 * v.1,
            u.2 * v.0 - u.0 * v.2,
            u.0 * v.1 - u.1 * v.0,
        )
    }

    /// True when all three components hold the same value, i.e. the vector
    /// can be written back to a document as a single scalar
    pub fn is_uniform(&self) -> bool {
        self.0 == self.1 && self.1 == self.2
    }
}

impl ops::AddAssign for Vec3 {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl ops::Add for Vec3 {
    type Output = Vec3;
    fn add(self, rhs: Self) -> Self::Output {
        Vec3(self.0 + rhs.0, self.1 + rhs.1, self.2 + rhs.2)
    }
}

impl ops::Sub for Vec3 {
    type Output = Vec3;
    fn sub(self, rhs: Self) -> Self::Output {
        Vec3(self.0 - rhs.0, self.1 - rhs.1, self.2 - rhs.2)
    }
}

impl ops::Mul<f32> for Vec3 {
    type Output = Vec3;
    fn mul(self, rhs: f32) -> Self::Output {
        Vec3(self.0 * rhs, self.1 * rhs, self.2 * rhs)
    }
}

impl ops::Div<f32> for Vec3 {
    type Output = Vec3;
    fn div(self, rhs: f32) -> Self::Output {
        self * (1.0 / rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cross_is_orthogonal() {
        let u = Vec3(1.0, 2.0, 3.0);
        let v = Vec3(-2.0, 0.5, 4.0);
        let w = Vec3::cross(u, v);
        assert!(Vec3::dot(u, w).abs() < 1e-5);
        assert!(Vec3::dot(v, w).abs() < 1e-5);
        assert_eq!(Vec3::cross(Vec3(1.0, 0.0, 0.0), Vec3(0.0, 1.0, 0.0)), Vec3(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_is_uniform() {
        assert!(Vec3::splat(0.3).is_uniform());
        assert!(!Vec3(0.3, 0.3, 0.2).is_uniform());
    }
}
