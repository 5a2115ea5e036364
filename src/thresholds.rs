use std::cmp::Reverse;

use itertools::Itertools;
use ordered_float::OrderedFloat;

/// 把 Discovery 池里的检测分数离散成近似等距的 recall 阈值序列
///
/// 分数降序排列后逐个走查：接受下标 i 得到的 recall 是 (i+1)/n_gt（左值），
/// 接受下一个下标得到的是右值；若右值比左值更接近当前目标 recall，
/// 则跳过当前分数（最后一个分数除外）。每接受一个阈值，
/// 目标 recall 前进 1/(n_sample_pts - 1)。
///
/// 输出长度不超过 n_sample_pts，保持输入的降序，分数重复时可能有重复阈值。
pub fn score_thresholds(pool: Vec<f64>, n_gt: usize, n_sample_pts: usize) -> Vec<f64> {
    let mut rst = Vec::new();
    // 没有可评测的 ground truth 时 recall 无定义，给出空阈值集
    if n_gt == 0 {
        return rst;
    }

    let scores: Vec<f64> = pool
        .into_iter()
        .sorted_by_key(|&x| Reverse(OrderedFloat(x)))
        .collect();
    let step = 1.0 / (n_sample_pts as f64 - 1.0);
    let n_gt = n_gt as f64;

    let mut current_recall = 0.0;
    for (i, &each_score) in scores.iter().enumerate() {
        let l_recall = (i + 1) as f64 / n_gt;
        let r_recall = if i < scores.len() - 1 {
            (i + 2) as f64 / n_gt
        } else {
            l_recall
        };

        if (r_recall - current_recall) < (current_recall - l_recall) && i < scores.len() - 1 {
            continue;
        }

        rst.push(each_score);
        current_recall += step;
    }
    rst
}
