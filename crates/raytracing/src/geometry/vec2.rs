/// Point on the unit square, or any other 2d quantity. Warps take their
/// sample as a `Vec2` with both components in `[0, 1)`
#[repr(C)]
#[derive(Clone, Copy, Default, Debug, PartialEq, PartialOrd)]
pub struct Vec2(pub f32, pub f32);

impl Vec2 {
    pub fn x(&self) -> f32 {
        self.0
    }

    pub fn y(&self) -> f32 {
        self.1
    }
}
