/// 工作缓冲区坐标系中的点
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// 解码器返回的几何信息
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    /// 四个角点，顺时针或逆时针相邻
    Corners([Point; 4]),
    BoundingBox {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
}

impl Geometry {
    /// 二维码最长边（像素）
    ///
    /// 角点：相邻角点间距离（含首尾闭合）的最大值；包围盒：max(宽, 高)。
    /// 不可用（NaN / 非有限值）时返回 None。
    pub fn box_size(&self) -> Option<f64> {
        let size = match self {
            Geometry::Corners(p) => {
                let edges = (0..4).map(|i| p[i].distance(&p[(i + 1) % 4]));
                // f64::max 会吞掉 NaN，先单独检查
                if edges.clone().any(|e| !e.is_finite()) {
                    return None;
                }
                edges.fold(0.0_f64, f64::max)
            }
            Geometry::BoundingBox { width, height, .. } => width.max(*height),
        };
        if size.is_finite() && size >= 0.0 {
            Some(size)
        } else {
            None
        }
    }

    /// 从任意数量的角点构造；少于 4 个视为不可用
    pub fn from_corner_slice(points: &[Point]) -> Option<Geometry> {
        match points {
            [a, b, c, d, ..] => Some(Geometry::Corners([*a, *b, *c, *d])),
            _ => None,
        }
    }
}
