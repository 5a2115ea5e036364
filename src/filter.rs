use crate::data::input::{Frame, GroundTruth};
use crate::data::{is_dont_care, LabelMatch, ObjectClass};
use crate::Difficulty;

/// depth 模式下计入评测所需的最小 3d 点数
pub const MIN_POINTS_3D: i32 = 10;
/// 平面模式下计入评测允许的最大遮挡等级
pub const MAX_OCCLUSION: i32 = 2;

/// 实体在一轮评测中的身份
#[derive(Clone, Copy, PartialEq, Eq, Debug, num_enum::TryFromPrimitive)]
#[repr(i8)]
pub enum Gate {
    /// 参与评分，ground truth 侧计入 recall 分母
    Evaluate = 0,
    /// 不评分也不计错，但可以占用一次指派
    Ignore = 1,
    /// 几何无效或非目标类检测，完全不参与
    Excluded = -1,
}

/// 一帧的划分结果，对每个 (class, difficulty, depth) 组合重新生成
#[derive(Clone, Debug)]
pub struct FrameMask {
    pub gt: Vec<Gate>,
    pub det: Vec<Gate>,
    /// 本帧里标为 DontCare 的 ground truth 区域
    pub dontcare: Vec<GroundTruth>,
}

/// 按目标类别与难度划分一帧内的实体
/// 返回划分结果与本帧 evaluate 级 ground truth 的数量
pub fn clean_frame(
    class: ObjectClass,
    frame: &Frame,
    difficulty: Difficulty,
    depth: bool,
) -> (FrameMask, usize) {
    let mut n_gt = 0usize;

    let mut gt_gates = Vec::with_capacity(frame.groundtruth.len());
    for each_gt in &frame.groundtruth {
        let (mut ignore, mut invalid) = (false, false);
        if depth {
            if each_gt.num_points_3d < 0 {
                invalid = true;
            }
            if each_gt.num_points_3d < MIN_POINTS_3D {
                ignore = true;
            }
            let range = difficulty.max_depth_range();
            if each_gt.t1 * each_gt.t1 + each_gt.t3 * each_gt.t3 > range * range {
                ignore = true;
            }
        } else {
            if each_gt.bbox.x1 < 0.0 {
                invalid = true;
            }
            if each_gt.bbox.area() < difficulty.min_area_2d() {
                ignore = true;
            }
            if each_gt.occlusion > MAX_OCCLUSION {
                ignore = true;
            }
        }

        let gate = if invalid {
            Gate::Excluded
        } else if class.classify_label(&each_gt.label) == LabelMatch::Exact && !ignore {
            n_gt += 1;
            Gate::Evaluate
        } else {
            // 邻近类别、其它类别、以及没过难度门限的目标类别
            Gate::Ignore
        };
        gt_gates.push(gate);
    }

    // DontCare 区域与目标类别无关，单独收集
    let dontcare = frame
        .groundtruth
        .iter()
        .filter(|x| is_dont_care(&x.label))
        .cloned()
        .collect();

    let mut det_gates = Vec::with_capacity(frame.detections.len());
    for each_det in &frame.detections {
        let ignore = if depth {
            let range = difficulty.max_depth_range();
            each_det.t1 * each_det.t1 + each_det.t3 * each_det.t3 > range * range
        } else {
            each_det.bbox.area() < difficulty.min_area_2d()
        };

        let gate = if ignore {
            Gate::Ignore
        } else if class.classify_label(&each_det.label) == LabelMatch::Exact {
            Gate::Evaluate
        } else {
            // 检测侧的非目标类别直接排除，不参与 FP 抵消
            Gate::Excluded
        };
        det_gates.push(gate);
    }

    (
        FrameMask {
            gt: gt_gates,
            det: det_gates,
            dontcare,
        },
        n_gt,
    )
}
