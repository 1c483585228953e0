//! Maps from a uniform sample on the unit square to points and directions on
//! canonical domains, each paired with the density of its output.
//!
//! Densities are with respect to solid angle for directions and area for
//! points. Every square root and power clamps its argument to zero first,
//! so rounding never produces a NaN near the domain boundary.

use std::f32::consts::PI;

use crate::geometry::{Vec2, Vec3};

const TWO_PI: f32 = 2.0 * PI;
const INV_PI: f32 = 1.0 / PI;
const INV_TWO_PI: f32 = 0.5 / PI;
const INV_FOUR_PI: f32 = 0.25 / PI;

fn safe_sqrt(x: f32) -> f32 {
    f32::sqrt(f32::max(x, 0.0))
}

fn safe_pow(x: f32, e: f32) -> f32 {
    f32::powf(f32::max(x, 0.0), e)
}

pub fn uniform_hemisphere(uv: Vec2) -> Vec3 {
    let phi = TWO_PI * uv.0;
    let r = safe_sqrt(1.0 - uv.1 * uv.1);
    Vec3(f32::cos(phi) * r, f32::sin(phi) * r, uv.1)
}

pub fn uniform_hemisphere_pdf(_p: Vec3) -> f32 {
    INV_TWO_PI
}

pub fn cosine_hemisphere(uv: Vec2) -> Vec3 {
    let phi = TWO_PI * uv.0;
    let r = safe_sqrt(uv.1);
    Vec3(f32::cos(phi) * r, f32::sin(phi) * r, safe_sqrt(1.0 - uv.1))
}

pub fn cosine_hemisphere_pdf(p: Vec3) -> f32 {
    p.z() * INV_PI
}

/// Point on the unit disk in the xy plane
pub fn uniform_disk(uv: Vec2) -> Vec3 {
    let phi = TWO_PI * uv.0;
    let r = safe_sqrt(uv.1);
    Vec3(f32::cos(phi) * r, f32::sin(phi) * r, 0.0)
}

pub fn uniform_disk_pdf() -> f32 {
    INV_PI
}

/// Point on the side of the unit cylinder around the z axis, z in [-1, 1]
pub fn uniform_cylinder(uv: Vec2) -> Vec3 {
    let phi = TWO_PI * uv.0;
    Vec3(f32::sin(phi), f32::cos(phi), uv.1 * 2.0 - 1.0)
}

// Note: not normalized, the side of this cylinder has area 4π
pub fn uniform_cylinder_pdf() -> f32 {
    INV_PI
}

pub fn uniform_sphere(uv: Vec2) -> Vec3 {
    let phi = TWO_PI * uv.0;
    let z = uv.1 * 2.0 - 1.0;
    let r = safe_sqrt(1.0 - z * z);
    Vec3(f32::cos(phi) * r, f32::sin(phi) * r, z)
}

pub fn uniform_sphere_pdf() -> f32 {
    INV_FOUR_PI
}

/// Direction within `acos(cos_theta_max)` of the z axis
pub fn uniform_spherical_cap(uv: Vec2, cos_theta_max: f32) -> Vec3 {
    let phi = TWO_PI * uv.0;
    let z = uv.1 * (1.0 - cos_theta_max) + cos_theta_max;
    let r = safe_sqrt(1.0 - z * z);
    Vec3(f32::sin(phi) * r, f32::cos(phi) * r, z)
}

pub fn uniform_spherical_cap_pdf(cos_theta_max: f32) -> f32 {
    INV_TWO_PI / (1.0 - cos_theta_max)
}

/// Direction distributed proportionally to `cos(theta)^n` around the z axis
pub fn phong_hemisphere(uv: Vec2, n: f32) -> Vec3 {
    let phi = TWO_PI * uv.0;
    let cos_theta = safe_pow(uv.1, 1.0 / (n + 1.0));
    let r = safe_sqrt(1.0 - cos_theta * cos_theta);
    Vec3(f32::sin(phi) * r, f32::cos(phi) * r, cos_theta)
}

pub fn phong_hemisphere_pdf(v: Vec3, n: f32) -> f32 {
    INV_TWO_PI * (n + 1.0) * safe_pow(v.z(), n)
}

pub fn uniform_triangle(uv: Vec2, a: Vec3, b: Vec3, c: Vec3) -> Vec3 {
    let u_sqrt = safe_sqrt(uv.0);
    let alpha = 1.0 - u_sqrt;
    let beta = (1.0 - uv.1) * u_sqrt;
    a * alpha + b * beta + c * (1.0 - alpha - beta)
}

pub fn uniform_triangle_pdf(a: Vec3, b: Vec3, c: Vec3) -> f32 {
    2.0 / Vec3::cross(b - a, c - a).length()
}

/// Multiple importance sampling weight of a sample drawn with density `pdf0`
/// when another strategy would have produced it with density `pdf1`
pub fn power_heuristic(pdf0: f32, pdf1: f32) -> f32 {
    let p0 = pdf0 * pdf0;
    let p1 = pdf1 * pdf1;
    p0 / (p0 + p1)
}

#[cfg(test)]
mod tests {
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    use super::*;

    const SAMPLES: usize = 400_000;

    fn assert_approx_eq(a: f32, b: f32, tolerance: f32) {
        assert!((a - b).abs() < tolerance, "{a} != {b}");
    }

    fn assert_vec_approx_eq(a: Vec3, b: Vec3) {
        assert!((a - b).length() < 1e-5, "{a:?} != {b:?}");
    }

    fn sample2(rng: &mut ChaCha8Rng) -> Vec2 {
        Vec2(rng.random::<f32>(), rng.random::<f32>())
    }

    // uniform over the unit sphere by rejection, independent of the warps
    fn random_direction(rng: &mut ChaCha8Rng) -> Vec3 {
        loop {
            let v = Vec3(
                rng.random_range(-1.0..1.0),
                rng.random_range(-1.0..1.0),
                rng.random_range(-1.0..1.0),
            );
            let length = v.length();
            if length > 1e-3 && length <= 1.0 {
                return v / length;
            }
        }
    }

    /// Integral of `pdf` over the sphere of directions
    fn integrate_over_sphere(seed: u64, pdf: impl Fn(Vec3) -> f32) -> f32 {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let sum: f64 = (0..SAMPLES)
            .map(|_| pdf(random_direction(&mut rng)) as f64)
            .sum();
        (4.0 * std::f64::consts::PI * sum / SAMPLES as f64) as f32
    }

    /// Mean of `f` over the outputs of `warp`
    fn mean_over_warp(seed: u64, warp: impl Fn(Vec2) -> Vec3, f: impl Fn(Vec3) -> f32) -> f32 {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let sum: f64 = (0..SAMPLES)
            .map(|_| f(warp(sample2(&mut rng))) as f64)
            .sum();
        (sum / SAMPLES as f64) as f32
    }

    // (E[z], E[z²]) under `pdf`, from directions that do not go through the warp
    fn moments_of_pdf(seed: u64, pdf: impl Fn(Vec3) -> f32) -> (f32, f32) {
        let first = integrate_over_sphere(seed, |w| w.z() * pdf(w));
        let second = integrate_over_sphere(seed, |w| w.z() * w.z() * pdf(w));
        (first, second)
    }

    fn moments_of_warp(seed: u64, warp: impl Fn(Vec2) -> Vec3) -> (f32, f32) {
        let first = mean_over_warp(seed, &warp, |w| w.z());
        let second = mean_over_warp(seed, &warp, |w| w.z() * w.z());
        (first, second)
    }

    fn assert_same_moments(warped: (f32, f32), expected: (f32, f32)) {
        assert_approx_eq(warped.0, expected.0, 1.5e-2);
        assert_approx_eq(warped.1, expected.1, 1.5e-2);
    }

    #[test]
    fn test_uniform_hemisphere_corner() {
        assert_vec_approx_eq(uniform_hemisphere(Vec2(0.0, 0.0)), Vec3(1.0, 0.0, 0.0));
        assert_approx_eq(uniform_hemisphere_pdf(Vec3(1.0, 0.0, 0.0)), 1.0 / (2.0 * PI), 1e-7);
    }

    #[test]
    fn test_cosine_hemisphere_grazing() {
        let p = cosine_hemisphere(Vec2(0.0, 1.0));
        assert_vec_approx_eq(p, Vec3(1.0, 0.0, 0.0));
        assert_eq!(cosine_hemisphere_pdf(p), 0.0);
    }

    #[test]
    fn test_constant_pdfs() {
        assert_approx_eq(uniform_disk_pdf(), 1.0 / PI, 1e-7);
        assert_approx_eq(uniform_sphere_pdf(), 1.0 / (4.0 * PI), 1e-7);
        assert_approx_eq(uniform_cylinder_pdf(), 1.0 / PI, 1e-7);
        assert_approx_eq(uniform_spherical_cap_pdf(0.0), uniform_hemisphere_pdf(Vec3::zero()), 1e-7);
    }

    #[test]
    fn test_warps_stay_in_domain() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..10_000 {
            let uv = sample2(&mut rng);

            let h = uniform_hemisphere(uv);
            assert_approx_eq(h.length(), 1.0, 1e-4);
            assert!(h.z() >= 0.0);

            let c = cosine_hemisphere(uv);
            assert_approx_eq(c.length(), 1.0, 1e-4);
            assert!(c.z() >= 0.0);

            let s = uniform_sphere(uv);
            assert_approx_eq(s.length(), 1.0, 1e-4);

            let cap = uniform_spherical_cap(uv, 0.8);
            assert!(cap.z() >= 0.8 - 1e-6);

            let d = uniform_disk(uv);
            assert!(d.length() <= 1.0 + 1e-5);
            assert_eq!(d.z(), 0.0);

            let cyl = uniform_cylinder(uv);
            assert_approx_eq(cyl.x() * cyl.x() + cyl.y() * cyl.y(), 1.0, 1e-4);
            assert!((-1.0..=1.0).contains(&cyl.z()));

            let p = phong_hemisphere(uv, 30.0);
            assert_approx_eq(p.length(), 1.0, 1e-4);
            assert!(p.z() >= 0.0);
            assert!(!p.x().is_nan());
        }
    }

    #[test]
    fn test_direction_pdfs_integrate_to_one() {
        let hemisphere = integrate_over_sphere(1, |w| {
            if w.z() >= 0.0 { uniform_hemisphere_pdf(w) } else { 0.0 }
        });
        assert_approx_eq(hemisphere, 1.0, 2e-2);

        let cosine = integrate_over_sphere(2, |w| {
            if w.z() >= 0.0 { cosine_hemisphere_pdf(w) } else { 0.0 }
        });
        assert_approx_eq(cosine, 1.0, 2e-2);

        let sphere = integrate_over_sphere(3, |_| uniform_sphere_pdf());
        assert_approx_eq(sphere, 1.0, 2e-2);

        let cap = integrate_over_sphere(4, |w| {
            if w.z() >= 0.5 { uniform_spherical_cap_pdf(0.5) } else { 0.0 }
        });
        assert_approx_eq(cap, 1.0, 2e-2);

        let phong = integrate_over_sphere(5, |w| {
            if w.z() >= 0.0 { phong_hemisphere_pdf(w, 4.0) } else { 0.0 }
        });
        assert_approx_eq(phong, 1.0, 2e-2);
    }

    #[test]
    fn test_disk_pdf_integrates_to_one() {
        // area of [-1, 1]^2 times the mean of the pdf over it
        let mut rng = ChaCha8Rng::seed_from_u64(6);
        let mut inside = 0usize;
        for _ in 0..SAMPLES {
            let x: f32 = rng.random_range(-1.0..1.0);
            let y: f32 = rng.random_range(-1.0..1.0);
            if x * x + y * y <= 1.0 {
                inside += 1;
            }
        }
        let integral = 4.0 * uniform_disk_pdf() * inside as f32 / SAMPLES as f32;
        assert_approx_eq(integral, 1.0, 2e-2);
    }

    #[test]
    fn test_triangle_pdf_is_inverse_area() {
        let (a, b, c) = (Vec3(0.0, 0.0, 0.0), Vec3(2.0, 0.0, 0.0), Vec3(0.0, 3.0, 1.0));
        let area = 0.5 * Vec3::cross(b - a, c - a).length();
        assert_approx_eq(uniform_triangle_pdf(a, b, c) * area, 1.0, 1e-6);
    }

    #[test]
    fn test_triangle_samples_are_uniform() {
        let (a, b, c) = (Vec3(0.0, 0.0, 0.0), Vec3(1.0, 0.0, 0.0), Vec3(0.0, 1.0, 0.0));
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let (mut sum_x, mut sum_y) = (0.0f64, 0.0f64);
        for _ in 0..SAMPLES {
            let p = uniform_triangle(sample2(&mut rng), a, b, c);
            assert!(p.x() >= -1e-6 && p.y() >= -1e-6 && p.x() + p.y() <= 1.0 + 1e-6);
            sum_x += p.x() as f64;
            sum_y += p.y() as f64;
        }
        // centroid
        assert_approx_eq((sum_x / SAMPLES as f64) as f32, 1.0 / 3.0, 1e-2);
        assert_approx_eq((sum_y / SAMPLES as f64) as f32, 1.0 / 3.0, 1e-2);
    }

    #[test]
    fn test_cosine_hemisphere_mean_height() {
        // E[cos] under a cosine-weighted distribution is 2/3
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let mean: f64 = (0..SAMPLES)
            .map(|_| cosine_hemisphere(sample2(&mut rng)).z() as f64)
            .sum::<f64>()
            / SAMPLES as f64;
        assert_approx_eq(mean as f32, 2.0 / 3.0, 1e-2);
    }

    #[test]
    fn test_warped_directions_follow_their_pdf() {
        let upper = |pdf: fn(Vec3) -> f32| move |w: Vec3| if w.z() >= 0.0 { pdf(w) } else { 0.0 };

        assert_same_moments(
            moments_of_warp(11, uniform_hemisphere),
            moments_of_pdf(12, upper(uniform_hemisphere_pdf)),
        );
        assert_same_moments(
            moments_of_warp(13, cosine_hemisphere),
            moments_of_pdf(14, upper(cosine_hemisphere_pdf)),
        );
        assert_same_moments(
            moments_of_warp(15, uniform_sphere),
            moments_of_pdf(16, |_| uniform_sphere_pdf()),
        );
        assert_same_moments(
            moments_of_warp(17, |uv| uniform_spherical_cap(uv, 0.5)),
            moments_of_pdf(18, |w| if w.z() >= 0.5 { uniform_spherical_cap_pdf(0.5) } else { 0.0 }),
        );
        assert_same_moments(
            moments_of_warp(19, |uv| phong_hemisphere(uv, 4.0)),
            moments_of_pdf(20, |w| if w.z() >= 0.0 { phong_hemisphere_pdf(w, 4.0) } else { 0.0 }),
        );
    }

    #[test]
    fn test_warp_moments() {
        let mean_z = |seed, warp: &dyn Fn(Vec2) -> Vec3| mean_over_warp(seed, warp, |w| w.z());

        assert_approx_eq(mean_z(21, &uniform_hemisphere), 0.5, 5e-3);
        assert_approx_eq(mean_z(22, &uniform_sphere), 0.0, 5e-3);
        assert_approx_eq(mean_over_warp(23, uniform_sphere, |w| w.z() * w.z()), 1.0 / 3.0, 5e-3);
        // z is uniform on [cos_theta_max, 1]
        assert_approx_eq(mean_z(24, &|uv| uniform_spherical_cap(uv, 0.5)), 0.75, 5e-3);
        // E[cos] under a normalized cos^n lobe is (n + 1) / (n + 2)
        assert_approx_eq(mean_z(25, &|uv| phong_hemisphere(uv, 4.0)), 5.0 / 6.0, 5e-3);
        assert_approx_eq(mean_z(26, &|uv| phong_hemisphere(uv, 30.0)), 31.0 / 32.0, 5e-3);
        // squared radius is uniform on the disk
        assert_approx_eq(mean_over_warp(27, uniform_disk, |p| p.square_magnitude()), 0.5, 5e-3);
    }

    #[test]
    fn test_importance_estimates_of_known_integrals() {
        // integral of z² over each domain, estimated as E[z² / pdf] over warped samples
        let z2 = |w: Vec3| w.z() * w.z();
        let estimate = |seed, warp: &dyn Fn(Vec2) -> Vec3, pdf: &dyn Fn(Vec3) -> f32| {
            mean_over_warp(seed, warp, |w| z2(w) / pdf(w))
        };

        let hemisphere = estimate(31, &uniform_hemisphere, &uniform_hemisphere_pdf);
        assert_approx_eq(hemisphere / (TWO_PI / 3.0), 1.0, 1e-2);

        let cosine = estimate(32, &cosine_hemisphere, &|w| {
            // z = 0 has zero density and a zero integrand
            if w.z() > 0.0 { cosine_hemisphere_pdf(w) } else { f32::INFINITY }
        });
        assert_approx_eq(cosine / (TWO_PI / 3.0), 1.0, 1e-2);

        let sphere = estimate(33, &uniform_sphere, &|_| uniform_sphere_pdf());
        assert_approx_eq(sphere / (4.0 * PI / 3.0), 1.0, 1e-2);

        let cap = estimate(34, &|uv| uniform_spherical_cap(uv, 0.5), &|_| uniform_spherical_cap_pdf(0.5));
        assert_approx_eq(cap / (TWO_PI * (1.0 - 0.125) / 3.0), 1.0, 1e-2);

        let phong = estimate(35, &|uv| phong_hemisphere(uv, 1.0), &|w| {
            if w.z() > 0.0 { phong_hemisphere_pdf(w, 1.0) } else { f32::INFINITY }
        });
        assert_approx_eq(phong / (TWO_PI / 3.0), 1.0, 1e-2);

        // integral of r² over the unit disk is π/2
        let disk = mean_over_warp(36, uniform_disk, |p| p.square_magnitude() / uniform_disk_pdf());
        assert_approx_eq(disk / (PI / 2.0), 1.0, 1e-2);
    }

    #[test]
    fn test_power_heuristic_symmetry() {
        let mut rng = ChaCha8Rng::seed_from_u64(10);
        for _ in 0..1000 {
            let p0 = rng.random_range(1e-3..10.0f32);
            let p1 = rng.random_range(1e-3..10.0f32);
            assert_approx_eq(power_heuristic(p0, p1) + power_heuristic(p1, p0), 1.0, 1e-5);
        }
        assert_eq!(power_heuristic(0.0, 2.0), 0.0);
        assert_eq!(power_heuristic(2.0, 0.0), 1.0);
    }
}
