// crates/td_pool/src/clip.rs

//! 水面平面裁剪
//!
//! 把三角形按半空间 `z <= level` 裁剪（Sutherland–Hodgman 对单一
//! 裁剪面的特化），并对裁剪多边形积分水柱体积。地形三角形是平面，
//! 裁剪后的多边形仍落在原平面上，扇形剖分逐片积分是精确的。

use glam::DVec3;

/// 三角形按 `z <= level` 裁剪
///
/// 返回保留在水面以下（含水面）的多边形顶点，0、3 或 4 个；
/// 完全在水面以上时返回空。穿越水面的边在交点处截断。
pub fn clip_triangle_below(tri: &[DVec3; 3], level: f64) -> Vec<DVec3> {
    let mut out = Vec::with_capacity(4);

    for i in 0..3 {
        let cur = tri[i];
        let next = tri[(i + 1) % 3];
        let cur_in = cur.z <= level;
        let next_in = next.z <= level;

        if cur_in {
            out.push(cur);
        }
        if cur_in != next_in {
            // 边与水面的交点
            let t = (level - cur.z) / (next.z - cur.z);
            out.push(cur + (next - cur) * t);
        }
    }
    out
}

/// 多边形上方到水面的水柱体积
///
/// `poly` 的顶点须全部满足 `z <= level`（裁剪输出）。按扇形剖分，
/// 每片体积 = XY 投影面积 × 平均水深。
pub fn column_volume(poly: &[DVec3], level: f64) -> f64 {
    if poly.len() < 3 {
        return 0.0;
    }

    let mut volume = 0.0;
    let a = poly[0];
    for i in 1..poly.len() - 1 {
        let b = poly[i];
        let c = poly[i + 1];
        let area_xy = 0.5 * ((b.x - a.x) * (c.y - a.y) - (c.x - a.x) * (b.y - a.y)).abs();
        let mean_depth = level - (a.z + b.z + c.z) / 3.0;
        volume += area_xy * mean_depth;
    }
    volume
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tri(a: (f64, f64, f64), b: (f64, f64, f64), c: (f64, f64, f64)) -> [DVec3; 3] {
        [
            DVec3::new(a.0, a.1, a.2),
            DVec3::new(b.0, b.1, b.2),
            DVec3::new(c.0, c.1, c.2),
        ]
    }

    #[test]
    fn test_fully_below_unchanged() {
        let t = tri((0.0, 0.0, 0.0), (1.0, 0.0, 0.0), (0.0, 1.0, 0.0));
        let poly = clip_triangle_below(&t, 1.0);
        assert_eq!(poly.len(), 3);
    }

    #[test]
    fn test_fully_above_empty() {
        let t = tri((0.0, 0.0, 2.0), (1.0, 0.0, 2.0), (0.0, 1.0, 2.0));
        let poly = clip_triangle_below(&t, 1.0);
        assert!(poly.is_empty());
    }

    #[test]
    fn test_partial_clip_produces_quad() {
        // 一个顶点在水面上方
        let t = tri((0.0, 0.0, 0.0), (2.0, 0.0, 0.0), (0.0, 2.0, 2.0));
        let poly = clip_triangle_below(&t, 1.0);
        assert_eq!(poly.len(), 4);
        for p in &poly {
            assert!(p.z <= 1.0 + 1e-12);
        }
    }

    #[test]
    fn test_flat_triangle_column_volume() {
        // 水平三角形，面积 0.5，水深 2
        let t = tri((0.0, 0.0, 0.0), (1.0, 0.0, 0.0), (0.0, 1.0, 0.0));
        let poly = clip_triangle_below(&t, 2.0);
        let v = column_volume(&poly, 2.0);
        assert!((v - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_inclined_triangle_exact_volume() {
        // 斜面三角形 z = x，裁剪于 level=1：
        // 区域 {x<=1} 内体积 = ∫∫ (1 - x) dA
        // 三角形 (0,0)-(2,0)-(0,2)，z=x；裁剪后为 x<=1 部分
        let t = tri((0.0, 0.0, 0.0), (2.0, 0.0, 2.0), (0.0, 2.0, 0.0));
        let poly = clip_triangle_below(&t, 1.0);
        let v = column_volume(&poly, 1.0);

        // 解析解: 区域为 {0<=x<=1, 0<=y<=2-x}，∫ (1-x)(2-x) dx, x∈[0,1]
        // = ∫ (2 - 3x + x²) dx = 2 - 1.5 + 1/3 = 5/6
        assert!((v - 5.0 / 6.0).abs() < 1e-12, "v = {}", v);
    }

    #[test]
    fn test_column_volume_degenerate_polygon() {
        assert_eq!(column_volume(&[], 1.0), 0.0);
        let two = [DVec3::ZERO, DVec3::new(1.0, 0.0, 0.0)];
        assert_eq!(column_volume(&two, 1.0), 0.0);
    }
}
