//! 数据集级别的汇总：整体一行，每个子序列一行

use crate::data::input::{Dataset, Frame};
use crate::data::output::{diag, row};
use crate::{eval_class, EvalError, EvalSpec};

/// 对整个数据集跑一遍评测
/// 第一行是全部帧拼接的 "overall"，其后每个子序列一行
pub fn evaluate(dataset: &Dataset, spec: &EvalSpec) -> Result<Vec<row::Verbose>, EvalError> {
    log::info!(
        "evaluating {} / {} / {} over {} sequences",
        spec.class,
        spec.difficulty,
        spec.metric,
        dataset.seqs.len()
    );

    let mut rst = Vec::with_capacity(dataset.seqs.len() + 1);

    let overall = dataset.overall();
    let overall_names = dataset
        .seqs
        .iter()
        .flat_map(|each_seq| frame_names(&each_seq.name, each_seq.frames.len()))
        .collect();
    rst.push(unit_row("overall", &overall, overall_names, spec)?);

    for each_seq in &dataset.seqs {
        let frames: Vec<&Frame> = each_seq.frames.iter().collect();
        let names = frame_names(&each_seq.name, frames.len()).collect();
        rst.push(unit_row(&each_seq.name, &frames, names, spec)?);
    }

    Ok(rst)
}

/// 帧的人类可读名字表，由汇总层生成并随诊断输出传递
fn frame_names<'a>(seq: &'a str, n: usize) -> impl Iterator<Item = String> + 'a {
    (0..n).map(move |i| format!("{}/{:06}", seq, i))
}

fn unit_row(
    name: &str,
    frames: &[&Frame],
    frame_names: Vec<String>,
    spec: &EvalSpec,
) -> Result<row::Verbose, EvalError> {
    let eval = eval_class(frames, spec)?;

    let ap = mean(&eval.precision);
    let ar = mean(&eval.recall);
    let f1 = if ap + ar > 0.0 {
        2.0 * ap * ar / (ap + ar)
    } else {
        0.0
    };
    log::info!(
        "{}: ap {:.4} ar {:.4} f1 {:.4} ({} thresholds)",
        name,
        ap,
        ar,
        f1,
        eval.thresholds.len()
    );

    Ok(row::Verbose {
        name: name.to_string(),
        ap,
        ar,
        f1,
        precision: eval.precision,
        recall: eval.recall,
        diag: eval.records.map(|records| diag::Bundle {
            frame_names,
            records,
        }),
    })
}

/// 曲线的算术平均，空曲线为 0
fn mean(curve: &[f64]) -> f64 {
    if curve.is_empty() {
        0.0
    } else {
        curve.iter().sum::<f64>() / curve.len() as f64
    }
}
