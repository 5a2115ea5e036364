#![allow(dead_code)]

use det3deval::data::input::{Detection, Frame, GroundTruth};
use det3deval::data::{BBox2D, ObjectClass};
use det3deval::filter::{FrameMask, Gate};
use det3deval::overlap::Metric;
use det3deval::{Difficulty, EvalSpec};

/// 平面模式下缺省能通过过滤的 ground truth
pub fn gt(label: &str, x1: f64, y1: f64, x2: f64, y2: f64) -> GroundTruth {
    GroundTruth {
        label: label.to_string(),
        bbox: BBox2D { x1, y1, x2, y2 },
        alpha: 0.0,
        truncation: 0,
        occlusion: 0,
        num_points_3d: 50,
        ry: 0.0,
        t1: 0.0,
        t2: 0.0,
        t3: 0.0,
        h: 1.5,
        w: 1.6,
        l: 4.0,
    }
}

pub fn det(label: &str, x1: f64, y1: f64, x2: f64, y2: f64, score: f64) -> Detection {
    Detection {
        label: label.to_string(),
        bbox: BBox2D { x1, y1, x2, y2 },
        alpha: 0.0,
        ry: 0.0,
        t1: 0.0,
        t2: 0.0,
        t3: 0.0,
        h: 1.5,
        w: 1.6,
        l: 4.0,
        score,
    }
}

/// 带俯视姿态的 ground truth，2d 框取一个总能通过平面过滤的占位
pub fn gt_3d(label: &str, t1: f64, t2: f64, t3: f64, l: f64, w: f64, h: f64, ry: f64) -> GroundTruth {
    GroundTruth {
        label: label.to_string(),
        bbox: BBox2D {
            x1: 0.0,
            y1: 0.0,
            x2: 100.0,
            y2: 100.0,
        },
        alpha: 0.0,
        truncation: 0,
        occlusion: 0,
        num_points_3d: 50,
        ry,
        t1,
        t2,
        t3,
        h,
        w,
        l,
    }
}

pub fn det_3d(
    label: &str,
    t1: f64,
    t2: f64,
    t3: f64,
    l: f64,
    w: f64,
    h: f64,
    ry: f64,
    score: f64,
) -> Detection {
    Detection {
        label: label.to_string(),
        bbox: BBox2D {
            x1: 0.0,
            y1: 0.0,
            x2: 100.0,
            y2: 100.0,
        },
        alpha: 0.0,
        ry,
        t1,
        t2,
        t3,
        h,
        w,
        l,
        score,
    }
}

pub fn frame(groundtruth: Vec<GroundTruth>, detections: Vec<Detection>) -> Frame {
    Frame {
        groundtruth,
        detections,
    }
}

/// 手工指定身份的划分结果，不经过 clean_frame
pub fn mask(gt: Vec<Gate>, det: Vec<Gate>) -> FrameMask {
    FrameMask {
        gt,
        det,
        dontcare: Vec::new(),
    }
}

/// 平面 hard 档、固定 0.5 最小重叠率的车类评测配置
pub fn car_spec() -> EvalSpec {
    let mut rst = EvalSpec::new(ObjectClass::Car, Difficulty::Hard, Metric::Image, false);
    rst.min_overlap = Some(0.5);
    rst
}
