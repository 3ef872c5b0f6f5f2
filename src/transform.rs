use egui::{vec2, Pos2, Rect, Vec2};

/// 2D affine transform applied to a texture surface.
///
/// Maps `p` to `(a * p.x + b * p.y, c * p.x + d * p.y) + translation`, in view coordinates
/// (y pointing down, so positive angles turn clockwise on screen).
#[derive(PartialEq, Clone, Copy, Debug)]
pub struct TextureTransform {
    /// Row 1, column 1
    pub a: f32,
    /// Row 1, column 2
    pub b: f32,
    /// Row 2, column 1
    pub c: f32,
    /// Row 2, column 2
    pub d: f32,
    /// Applied after the linear part
    pub translation: Vec2,
}

impl Default for TextureTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl TextureTransform {
    /// Leaves every point in place.
    pub const IDENTITY: TextureTransform = TextureTransform {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        translation: Vec2::ZERO,
    };

    /// Clockwise rotation by `degrees` around `pivot`.
    pub fn rotation_about(degrees: i32, pivot: Pos2) -> Self {
        // quarter turns are kept exact
        let (sin, cos) = match degrees.rem_euclid(360) {
            0 => (0.0, 1.0),
            90 => (1.0, 0.0),
            180 => (0.0, -1.0),
            270 => (-1.0, 0.0),
            d => (d as f32).to_radians().sin_cos(),
        };
        Self::linear_about(cos, -sin, sin, cos, pivot)
    }

    /// Scale by `scale` keeping `pivot` in place.
    pub fn scale_about(scale: Vec2, pivot: Pos2) -> Self {
        Self::linear_about(scale.x, 0.0, 0.0, scale.y, pivot)
    }

    fn linear_about(a: f32, b: f32, c: f32, d: f32, pivot: Pos2) -> Self {
        let linear = Self {
            a,
            b,
            c,
            d,
            translation: Vec2::ZERO,
        };
        let moved = linear.map_vec(pivot.to_vec2());
        Self {
            translation: pivot.to_vec2() - moved,
            ..linear
        }
    }

    fn map_vec(&self, v: Vec2) -> Vec2 {
        vec2(self.a * v.x + self.b * v.y, self.c * v.x + self.d * v.y)
    }

    /// Apply to a point.
    pub fn map_point(&self, p: Pos2) -> Pos2 {
        (self.map_vec(p.to_vec2()) + self.translation).to_pos2()
    }

    /// Axis aligned bounds of `rect` after the transform.
    pub fn map_rect(&self, rect: Rect) -> Rect {
        Rect::from_points(&[
            self.map_point(rect.left_top()),
            self.map_point(rect.right_top()),
            self.map_point(rect.left_bottom()),
            self.map_point(rect.right_bottom()),
        ])
    }

    /// `self` followed by `next`.
    pub fn then(&self, next: &TextureTransform) -> Self {
        Self {
            a: next.a * self.a + next.b * self.c,
            b: next.a * self.b + next.b * self.d,
            c: next.c * self.a + next.d * self.c,
            d: next.c * self.b + next.d * self.d,
            translation: next.map_vec(self.translation) + next.translation,
        }
    }

    /// Same as [`TextureTransform::IDENTITY`].
    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }
}

/// Transform which rotates a texture of `view_size` by `rotation_degrees` and scales the result
/// back so it exactly covers the view again.
pub fn compute_texture_transform(view_size: Vec2, rotation_degrees: u16) -> TextureTransform {
    if view_size.x == 0. || view_size.y == 0. || rotation_degrees == 0 {
        return TextureTransform::IDENTITY;
    }
    let view_rect = Rect::from_min_size(Pos2::ZERO, view_size);
    let pivot = view_rect.center();
    let rotation = TextureTransform::rotation_about(rotation_degrees as i32, pivot);
    let rotated = rotation.map_rect(view_rect);
    let scale = TextureTransform::scale_about(
        vec2(view_size.x / rotated.width(), view_size.y / rotated.height()),
        pivot,
    );
    rotation.then(&scale)
}
