use geo::prelude::Area;
use geo::{polygon, Polygon};
use geo_clipper::Clipper;
use nalgebra as na;
use strum_macros::{Display, EnumString};

use crate::data::input::{Detection, GroundTruth};
use crate::data::BBox2D;

/// geo-clipper 的定点化放大系数
const CLIP_FACTOR: f64 = 1e6;

/// 重叠率的分母口径
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Criterion {
    /// 交并比，分母为两者之并
    Union,
    /// 分母为第一个操作数（检测）的面积/体积
    RefA,
    /// 分母为第二个操作数（ground truth）的面积/体积
    RefB,
}

/// 三种评测度量，决定重叠率的几何口径
/// 枚举序号同时是最小重叠率矩阵的行下标
#[derive(Clone, Copy, PartialEq, Eq, Debug, num_enum::TryFromPrimitive, Display, EnumString)]
#[repr(u8)]
pub enum Metric {
    /// 图像平面轴对齐矩形
    #[strum(ascii_case_insensitive)]
    Image = 0,
    /// 俯视带旋转脚印多边形
    #[strum(ascii_case_insensitive)]
    Ground = 1,
    /// 脚印多边形乘以竖直区间
    #[strum(ascii_case_insensitive)]
    Box3d = 2,
}

impl Metric {
    /// 按当前度量计算检测与 ground truth 的重叠率
    pub fn overlap(self, det: &Detection, gt: &GroundTruth, criterion: Criterion) -> f64 {
        match self {
            Metric::Image => image_overlap(&det.bbox, &gt.bbox, criterion),
            Metric::Ground => ground_overlap(det, gt, criterion),
            Metric::Box3d => box3d_overlap(det, gt, criterion),
        }
    }
}

/// 分母不为正时重叠率按 0 计，退化输入不产生 NaN
fn ratio(inter: f64, denom: f64) -> f64 {
    if denom > 0.0 {
        inter / denom
    } else {
        0.0
    }
}

/// 图像平面上两个轴对齐矩形的重叠率，不相交为 0
pub fn image_overlap(a: &BBox2D, b: &BBox2D, criterion: Criterion) -> f64 {
    let x1 = a.x1.max(b.x1);
    let y1 = a.y1.max(b.y1);
    let x2 = a.x2.min(b.x2);
    let y2 = a.y2.min(b.y2);

    let (w, h) = (x2 - x1, y2 - y1);
    if w <= 0.0 || h <= 0.0 {
        return 0.0;
    }

    let inter = w * h;
    let denom = match criterion {
        Criterion::Union => a.area() + b.area() - inter,
        Criterion::RefA => a.area(),
        Criterion::RefB => b.area(),
    };
    ratio(inter, denom)
}

/// 以 (t1, t3) 为中心、长宽 (l, w)、绕竖直轴旋转 ry 的俯视脚印
///
/// ry = 0 时 l 沿 t1 方向，旋转矩阵与标注约定一致：
/// [ cos  sin]
/// [-sin  cos]
fn footprint(t1: f64, t3: f64, l: f64, w: f64, ry: f64) -> Polygon<f64> {
    let rot = na::Matrix2::new(ry.cos(), ry.sin(), -ry.sin(), ry.cos());
    let corners = [
        rot * na::Vector2::new(l / 2.0, w / 2.0),
        rot * na::Vector2::new(l / 2.0, -w / 2.0),
        rot * na::Vector2::new(-l / 2.0, -w / 2.0),
        rot * na::Vector2::new(-l / 2.0, w / 2.0),
    ];
    polygon![
        (x: t1 + corners[0].x, y: t3 + corners[0].y),
        (x: t1 + corners[1].x, y: t3 + corners[1].y),
        (x: t1 + corners[2].x, y: t3 + corners[2].y),
        (x: t1 + corners[3].x, y: t3 + corners[3].y),
    ]
}

/// 俯视脚印多边形的重叠率，退化脚印（零面积）按 0 计
pub fn ground_overlap(det: &Detection, gt: &GroundTruth, criterion: Criterion) -> f64 {
    let dp = footprint(det.t1, det.t3, det.l, det.w, det.ry);
    let gp = footprint(gt.t1, gt.t3, gt.l, gt.w, gt.ry);

    let inter = dp.intersection(&gp, CLIP_FACTOR).unsigned_area();
    let denom = match criterion {
        Criterion::Union => dp.union(&gp, CLIP_FACTOR).unsigned_area(),
        Criterion::RefA => dp.unsigned_area(),
        Criterion::RefB => gp.unsigned_area(),
    };
    ratio(inter, denom)
}

/// 3d 重叠率：脚印交叠面积乘以竖直区间 [t2 - h, t2] 的交叠长度
pub fn box3d_overlap(det: &Detection, gt: &GroundTruth, criterion: Criterion) -> f64 {
    let dp = footprint(det.t1, det.t3, det.l, det.w, det.ry);
    let gp = footprint(gt.t1, gt.t3, gt.l, gt.w, gt.ry);

    let ymax = det.t2.min(gt.t2);
    let ymin = (det.t2 - det.h).max(gt.t2 - gt.h);

    let inter_area = dp.intersection(&gp, CLIP_FACTOR).unsigned_area();
    let inter_vol = inter_area * (ymax - ymin).max(0.0);

    let det_vol = det.h * det.l * det.w;
    let gt_vol = gt.h * gt.l * gt.w;

    let denom = match criterion {
        Criterion::Union => det_vol + gt_vol - inter_vol,
        Criterion::RefA => det_vol,
        Criterion::RefB => gt_vol,
    };
    ratio(inter_vol, denom)
}
