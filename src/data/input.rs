//! # 数据输入接口

use super::BBox2D;
use crate::EvalError;

/*
    相机坐标系（与标注记录一致）：

        x ——> 右
        y ——> 下（竖直方向）
        z ——> 前

           O.________\ z
           /|        /
          / |
     x |/_  |
           \|/
            y

    (t1, t2, t3) 为 3d 框底面中心在此坐标系下的坐标，
    俯视平面由 (t1, t3) 张成，h 沿 y 轴向上，
    ry 为绕 y 轴、从 z 轴转向 x 轴为正的偏航角
*/

/// 一条 ground truth 标注，由外部加载器构造，评测过程中只读
#[derive(Clone, Debug)]
pub struct GroundTruth {
    /// 自由标签，可以是目标类别之外的任何类别（如 "Van"、"DontCare"）
    pub label: String,
    pub bbox: BBox2D,
    /// 图像平面观察角
    pub alpha: f64,
    pub truncation: i32,
    /// 遮挡等级 0~3
    pub occlusion: i32,
    /// 框内的 3d 点数，负数表示几何无效
    pub num_points_3d: i32,
    /// 绕竖直轴的偏航角
    pub ry: f64,
    pub t1: f64,
    pub t2: f64,
    pub t3: f64,
    pub h: f64,
    pub w: f64,
    pub l: f64,
}

impl GroundTruth {
    /// 解析一行以单个空格分隔的标注记录：
    /// label truncation occlusion num_points_3d alpha x1 y1 x2 y2 l h w t1 t2 t3 ry trash
    pub fn parse_line(line: &str) -> Result<Self, EvalError> {
        let (label, truncation, occlusion, num_points_3d): (String, i32, i32, i32);
        let (alpha, x1, y1, x2, y2): (f64, f64, f64, f64, f64);
        let (l, h, w, t1, t2, t3, ry): (f64, f64, f64, f64, f64, f64, f64);
        let _trash: i32;
        text_io::try_scan!(line.bytes() => "{} {} {} {} {} {} {} {} {} {} {} {} {} {} {} {} {}",
            label, truncation, occlusion, num_points_3d, alpha, x1, y1, x2, y2, l, h, w, t1, t2, t3, ry, _trash);
        Ok(Self {
            label,
            bbox: BBox2D { x1, y1, x2, y2 },
            alpha,
            truncation,
            occlusion,
            num_points_3d,
            ry,
            t1,
            t2,
            t3,
            h,
            w,
            l,
        })
    }
}

/// 一条检测输出，姿态字段与 ground truth 对应，另带置信度分数
#[derive(Clone, Debug)]
pub struct Detection {
    pub label: String,
    pub bbox: BBox2D,
    pub alpha: f64,
    pub ry: f64,
    pub t1: f64,
    pub t2: f64,
    pub t3: f64,
    pub h: f64,
    pub w: f64,
    pub l: f64,
    /// 置信度分数
    pub score: f64,
}

impl Detection {
    /// 解析一行以单个空格分隔的检测记录：
    /// label trash trash trash alpha x1 y1 x2 y2 l h w t1 t2 t3 ry score
    pub fn parse_line(line: &str) -> Result<Self, EvalError> {
        let label: String;
        let (_trash1, _trash2, _trash3): (i32, i32, i32);
        let (alpha, x1, y1, x2, y2): (f64, f64, f64, f64, f64);
        let (l, h, w, t1, t2, t3, ry, score): (f64, f64, f64, f64, f64, f64, f64, f64);
        text_io::try_scan!(line.bytes() => "{} {} {} {} {} {} {} {} {} {} {} {} {} {} {} {} {}",
            label, _trash1, _trash2, _trash3, alpha, x1, y1, x2, y2, l, h, w, t1, t2, t3, ry, score);
        Ok(Self {
            label,
            bbox: BBox2D { x1, y1, x2, y2 },
            alpha,
            ry,
            t1,
            t2,
            t3,
            h,
            w,
            l,
            score,
        })
    }
}

/// 成对的单帧输入
/// 同一帧的 ground truth 与检测总是一起处理
#[derive(Clone, Debug, Default)]
pub struct Frame {
    pub groundtruth: Vec<GroundTruth>,
    pub detections: Vec<Detection>,
}

impl Frame {
    /// 将平行的逐帧 ground truth 列表与检测列表配对成帧序列
    /// 两侧帧数不一致是前置条件违反，不做任何恢复
    pub fn zip(
        groundtruth: Vec<Vec<GroundTruth>>,
        detections: Vec<Vec<Detection>>,
    ) -> Result<Vec<Frame>, EvalError> {
        if groundtruth.len() != detections.len() {
            return Err(EvalError::FrameCountMismatch {
                gt: groundtruth.len(),
                det: detections.len(),
            });
        }
        Ok(groundtruth
            .into_iter()
            .zip(detections)
            .map(|(each_gt, each_det)| Frame {
                groundtruth: each_gt,
                detections: each_det,
            })
            .collect())
    }
}

/// 一段连续采集的帧子序列
#[derive(Clone, Debug)]
pub struct FrameSeq {
    pub name: String,
    pub frames: Vec<Frame>,
}

/// 带有多段帧子序列的完整数据集
#[derive(Clone, Debug, Default)]
pub struct Dataset {
    pub seqs: Vec<FrameSeq>,
}

impl Dataset {
    /// 所有子序列按加入顺序拼接出的整体帧列表
    pub fn overall(&self) -> Vec<&Frame> {
        self.seqs.iter().flat_map(|x| x.frames.iter()).collect()
    }

    pub fn num_frames(&self) -> usize {
        self.seqs.iter().map(|x| x.frames.len()).sum()
    }
}
