use itertools::iproduct;

use crate::data::input::Frame;
use crate::filter::{FrameMask, Gate};
use crate::overlap::{Criterion, Metric};

/// 匹配器的运行模式
#[derive(Clone, Copy, Debug)]
pub enum MatchMode {
    /// 第一遍：只为阈值离散化收集可被接受的检测分数
    Discovery,
    /// 第二遍：在给定分数阈值下统计 TP/FP/FN
    Score { thresh: f64 },
}

/// 一次匹配调用的统计结果，跨帧按加法聚合
#[derive(Clone, Debug, Default)]
pub struct FrameStats {
    pub true_pos: i32,
    pub false_pos: i32,
    pub false_neg: i32,
    /// TP 的方向相似度之和；-1 表示本帧既无 TP 也无 FP，聚合时跳过
    pub similarity: f64,
    /// Discovery 模式下被接受的检测分数池
    pub scores: Vec<f64>,
}

/// 单帧单阈值的诊断下标，供下游落盘
#[derive(Clone, Debug, Default)]
pub struct FrameRecord {
    /// 判为 TP 的 ground truth 下标
    pub tp_gt: Vec<usize>,
    /// 判为 FP 的检测下标
    pub fp_det: Vec<usize>,
    /// 判为 FN 的 ground truth 下标
    pub fn_gt: Vec<usize>,
}

/*
    逐 ground truth 的贪心指派规则：

    1. Discovery 模式在重叠率达标的候选里取分数最高者；
    2. Score 模式在重叠率达标的候选里取重叠率最大的 evaluate 级候选，
       但若先只遇到 ignore 级检测，则暂定指派给它（让它之后能抵掉
       一个 FP），一旦出现 evaluate 级候选立即顶替；
    3. 一个检测在一次调用里至多被指派一次，重叠率持平时先遇到者胜。
*/
pub fn match_frame(
    frame: &Frame,
    mask: &FrameMask,
    metric: Metric,
    min_overlap: f64,
    mode: MatchMode,
    compute_aos: bool,
    mut record: Option<&mut FrameRecord>,
) -> FrameStats {
    let (gt, det) = (&frame.groundtruth, &frame.detections);
    let mut stat = FrameStats::default();
    let mut delta = Vec::<f64>::new();
    let mut assigned = vec![false; det.len()];

    // Score 模式下低于阈值的检测整轮不参与
    let mut below_thresh = vec![false; det.len()];
    if let MatchMode::Score { thresh } = mode {
        for (j, each_det) in det.iter().enumerate() {
            below_thresh[j] = each_det.score < thresh;
        }
    }

    for (i, each_gt) in gt.iter().enumerate() {
        if mask.gt[i] == Gate::Excluded {
            continue;
        }

        let mut det_idx = None;
        let mut best_score = f64::NEG_INFINITY;
        let mut max_overlap = 0f64;
        let mut assigned_ignored = false;

        for (j, each_det) in det.iter().enumerate() {
            if mask.det[j] == Gate::Excluded || assigned[j] || below_thresh[j] {
                continue;
            }
            let overlap = metric.overlap(each_det, each_gt, Criterion::Union);
            if overlap <= min_overlap {
                continue;
            }
            match mode {
                MatchMode::Discovery => {
                    if each_det.score > best_score {
                        det_idx = Some(j);
                        best_score = each_det.score;
                    }
                }
                MatchMode::Score { .. } => {
                    if mask.det[j] == Gate::Evaluate && (overlap > max_overlap || assigned_ignored)
                    {
                        max_overlap = overlap;
                        det_idx = Some(j);
                        assigned_ignored = false;
                    } else if mask.det[j] == Gate::Ignore && det_idx.is_none() {
                        det_idx = Some(j);
                        assigned_ignored = true;
                    }
                }
            }
        }

        match det_idx {
            // 没有任何指派，evaluate 级 ground truth 记一个 FN
            None => {
                if mask.gt[i] == Gate::Evaluate {
                    stat.false_neg += 1;
                    if let Some(rst) = record.as_deref_mut() {
                        rst.fn_gt.push(i);
                    }
                }
            }
            // 任一侧是 ignore 级：只占用检测，不计 TP/FP/FN
            Some(j) if mask.gt[i] == Gate::Ignore || mask.det[j] == Gate::Ignore => {
                assigned[j] = true;
            }
            Some(j) => {
                stat.true_pos += 1;
                stat.scores.push(det[j].score);
                if compute_aos {
                    delta.push(each_gt.alpha - det[j].alpha);
                }
                if let Some(rst) = record.as_deref_mut() {
                    rst.tp_gt.push(i);
                }
                assigned[j] = true;
            }
        }
    }

    if let MatchMode::Score { .. } = mode {
        // 未被指派、未忽略、不低于阈值的检测都是 FP
        for j in 0..det.len() {
            if !(assigned[j] || mask.det[j] != Gate::Evaluate || below_thresh[j]) {
                stat.false_pos += 1;
                if let Some(rst) = record.as_deref_mut() {
                    rst.fp_det.push(j);
                }
            }
        }

        // 与某个 DontCare 区域充分重叠的剩余检测不计 FP
        // 先到先得，一个检测至多抵消一次
        let mut nstuff = 0;
        for (each_dc, j) in iproduct!(mask.dontcare.iter(), 0..det.len()) {
            if assigned[j] || mask.det[j] != Gate::Evaluate || below_thresh[j] {
                continue;
            }
            let overlap = metric.overlap(&det[j], each_dc, Criterion::RefA);
            if overlap > min_overlap {
                assigned[j] = true;
                nstuff += 1;
                if let Some(rst) = record.as_deref_mut() {
                    rst.fp_det.retain(|&x| x != j);
                }
            }
        }
        stat.false_pos -= nstuff;
        assert!(
            stat.false_pos >= 0,
            "dontcare suppression must only cancel counted false positives"
        );

        if compute_aos {
            assert_eq!(
                delta.len(),
                stat.true_pos as usize,
                "one orientation delta per true positive"
            );
            if stat.true_pos > 0 || stat.false_pos > 0 {
                // FP 的相似度为 0，只有 TP 贡献 (1 + cosΔ)/2
                stat.similarity = delta.iter().map(|x| (1.0 + x.cos()) / 2.0).sum();
            } else {
                stat.similarity = -1.0;
            }
        }
    }

    stat
}
