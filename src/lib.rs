pub mod data;

pub mod filter;

pub mod matcher;

pub mod overlap;

pub mod report;

pub mod thresholds;

use rayon::prelude::*;
use strum_macros::{Display, EnumString};
use thiserror::Error;

use crate::data::input::Frame;
use crate::data::ObjectClass;
use crate::filter::clean_frame;
use crate::matcher::{match_frame, FrameRecord, FrameStats, MatchMode};
use crate::overlap::Metric;
use crate::thresholds::score_thresholds;

/// 每个 (metric, class) 组合要求的最小重叠率，行是度量、列是类别
pub const MIN_OVERLAP: [[f64; 3]; 3] = [
    [0.3, 0.5, 0.7],
    [0.3, 0.5, 0.7],
    [0.3, 0.5, 0.7],
];

/// recall 离散采样点数的缺省值
pub const N_SAMPLE_PTS: usize = 41;

/// 评测难度档位，决定实体过滤的门限
#[derive(Clone, Copy, PartialEq, Eq, Debug, num_enum::TryFromPrimitive, Display, EnumString)]
#[repr(u8)]
pub enum Difficulty {
    #[strum(ascii_case_insensitive)]
    Easy = 0,
    #[strum(ascii_case_insensitive)]
    Hard = 1,
}

impl Difficulty {
    /// depth 模式下计入评测的最大平面距离（米）
    pub fn max_depth_range(self) -> f64 {
        match self {
            Difficulty::Easy => 15.0,
            Difficulty::Hard => 25.0,
        }
    }

    /// 平面模式下计入评测的最小 2d 投影面积（像素²）
    pub fn min_area_2d(self) -> f64 {
        match self {
            Difficulty::Easy => 1600.0,
            Difficulty::Hard => 500.0,
        }
    }
}

/// 评测的可恢复错误；内部账目不变量被破坏属于逻辑错误，直接 panic
#[derive(Error, Debug)]
pub enum EvalError {
    #[error("groundtruth has {gt} frames but detections have {det}")]
    FrameCountMismatch { gt: usize, det: usize },
    #[error("n_sample_pts must be at least 2, got {0}")]
    BadSamplePoints(usize),
    #[error("cannot parse record: {0}")]
    Parse(String),
}

impl From<text_io::Error> for EvalError {
    fn from(x: text_io::Error) -> Self {
        EvalError::Parse(x.to_string())
    }
}

/// 一次类别评测的全部配置
#[derive(Clone, Debug)]
pub struct EvalSpec {
    pub class: ObjectClass,
    pub difficulty: Difficulty,
    pub metric: Metric,
    /// true 按 3d 点数/距离过滤，false 按 2d 面积/遮挡过滤
    pub depth: bool,
    pub n_sample_pts: usize,
    /// 对 precision 曲线做 max_{i..} 包络平滑；会抬高均值，缺省关闭
    pub envelope: bool,
    pub compute_aos: bool,
    /// 收集每帧每阈值的 TP/FP/FN 下标
    pub collect_diag: bool,
    /// 不设置时用 MIN_OVERLAP[metric][class]
    pub min_overlap: Option<f64>,
}

impl EvalSpec {
    /// 其余开关取缺省：raw 曲线、不算方向相似度、不收集诊断
    pub fn new(class: ObjectClass, difficulty: Difficulty, metric: Metric, depth: bool) -> Self {
        Self {
            class,
            difficulty,
            metric,
            depth,
            n_sample_pts: N_SAMPLE_PTS,
            envelope: false,
            compute_aos: false,
            collect_diag: false,
            min_overlap: None,
        }
    }

    /// 生效的最小重叠率：显式覆盖值或缺省矩阵
    pub fn min_overlap(&self) -> f64 {
        self.min_overlap
            .unwrap_or(MIN_OVERLAP[self.metric as usize][self.class as usize])
    }
}

/// 单个 (class, difficulty, metric) 组合在一组帧上的评测曲线
/// 所有向量的长度一律等于实际选出的阈值数
#[derive(Clone, Debug)]
pub struct ClassEval {
    /// 按置信度降序的分数阈值
    pub thresholds: Vec<f64>,
    pub precision: Vec<f64>,
    pub recall: Vec<f64>,
    /// compute_aos 时逐阈值的方向相似度
    pub orientation: Option<Vec<f64>>,
    /// collect_diag 时的下标记录，外层帧、内层阈值
    pub records: Option<Vec<Vec<FrameRecord>>>,
}

/// 对一组帧评测一个 (class, difficulty, metric) 组合
///
/// 两遍扫描：先用 Discovery 匹配收集分数池并离散出阈值，
/// 再对每个 (frame, threshold) 做 Score 匹配并按阈值聚合
pub fn eval_class(frames: &[&Frame], spec: &EvalSpec) -> Result<ClassEval, EvalError> {
    if spec.n_sample_pts < 2 {
        return Err(EvalError::BadSamplePoints(spec.n_sample_pts));
    }
    let min_overlap = spec.min_overlap();

    // 第一遍：过滤 + 收集分数池与 recall 分母
    let mut n_gt = 0usize;
    let mut masks = Vec::with_capacity(frames.len());
    let mut pool = Vec::<f64>::new();
    for &each_frame in frames {
        let (mask, frame_n_gt) = clean_frame(spec.class, each_frame, spec.difficulty, spec.depth);
        n_gt += frame_n_gt;
        let stat = match_frame(
            each_frame,
            &mask,
            spec.metric,
            min_overlap,
            MatchMode::Discovery,
            false,
            None,
        );
        pool.extend(stat.scores);
        masks.push(mask);
    }
    log::debug!("{} evaluable groundtruth, {} pooled scores", n_gt, pool.len());

    let thresholds = score_thresholds(pool, n_gt, spec.n_sample_pts);
    log::debug!("{} recall thresholds selected", thresholds.len());

    // 第二遍：(frame, threshold) 两两独立，逐帧并行
    let per_frame: Vec<(Vec<FrameStats>, Vec<FrameRecord>)> = frames
        .par_iter()
        .zip(masks.par_iter())
        .map(|(&each_frame, each_mask)| {
            let mut stats = Vec::with_capacity(thresholds.len());
            let mut records = Vec::new();
            for &each_thresh in &thresholds {
                let mut record = FrameRecord::default();
                let stat = match_frame(
                    each_frame,
                    each_mask,
                    spec.metric,
                    min_overlap,
                    MatchMode::Score { thresh: each_thresh },
                    spec.compute_aos,
                    if spec.collect_diag {
                        Some(&mut record)
                    } else {
                        None
                    },
                );
                stats.push(stat);
                if spec.collect_diag {
                    records.push(record);
                }
            }
            (stats, records)
        })
        .collect();

    // 顺序归并，保证 f64 累加顺序确定
    let mut acc = vec![FrameStats::default(); thresholds.len()];
    let mut all_records = if spec.collect_diag {
        Some(Vec::with_capacity(frames.len()))
    } else {
        None
    };
    for (stats, records) in per_frame {
        for (each_acc, each_stat) in acc.iter_mut().zip(stats) {
            each_acc.true_pos += each_stat.true_pos;
            each_acc.false_pos += each_stat.false_pos;
            each_acc.false_neg += each_stat.false_neg;
            // -1 表示该帧没有方向相似度样本
            if each_stat.similarity != -1.0 {
                each_acc.similarity += each_stat.similarity;
            }
        }
        if let Some(rst) = all_records.as_mut() {
            rst.push(records);
        }
    }

    // 分母为零的阈值点 precision/recall 一律按 0 计
    let mut precision = Vec::with_capacity(thresholds.len());
    let mut recall = Vec::with_capacity(thresholds.len());
    let mut orientation = if spec.compute_aos {
        Some(Vec::with_capacity(thresholds.len()))
    } else {
        None
    };
    for each_acc in &acc {
        let (tp, fp) = (each_acc.true_pos as f64, each_acc.false_pos as f64);
        let fneg = each_acc.false_neg as f64;
        precision.push(if tp + fp > 0.0 { tp / (tp + fp) } else { 0.0 });
        recall.push(if tp + fneg > 0.0 { tp / (tp + fneg) } else { 0.0 });
        if let Some(rst) = orientation.as_mut() {
            rst.push(if tp + fp > 0.0 {
                each_acc.similarity / (tp + fp)
            } else {
                0.0
            });
        }
    }

    if spec.envelope {
        envelope_filter(&mut precision);
        if let Some(rst) = orientation.as_mut() {
            envelope_filter(rst);
        }
    }

    Ok(ClassEval {
        thresholds,
        precision,
        recall,
        orientation,
        records: all_records,
    })
}

/// precision[i] = max(precision[i..])，强制 PR 曲线的单调包络
fn envelope_filter(curve: &mut [f64]) {
    for i in (0..curve.len().saturating_sub(1)).rev() {
        curve[i] = curve[i].max(curve[i + 1]);
    }
}
