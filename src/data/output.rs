//! # 评测结果输出接口

/// 输出行接口模块
pub mod row {
    /// 单个评测单元的精简结果行
    pub type Concise = super::inner::_Row;
    /// 单个评测单元的完整结果行
    pub type Verbose = super::inner::_RowVerbose;
}

/// 诊断输出接口模块
pub mod diag {
    /// 一个评测单元的逐帧逐阈值下标记录
    pub type Bundle = super::inner::_DiagBundle;
}

mod inner {
    use std::fmt;

    use crate::matcher::FrameRecord;

    pub struct _Row {
        pub name: String,
        pub ap: f64,
        pub precision: Vec<f64>,
    }

    pub struct _RowVerbose {
        pub name: String,
        pub ap: f64,
        pub ar: f64,
        pub f1: f64,
        pub precision: Vec<f64>,
        pub recall: Vec<f64>,
        pub diag: Option<_DiagBundle>,
    }

    /// records 外层为帧、内层为阈值
    /// frame_names[i] 是第 i 帧的 "序列名/帧号"，由汇总层生成
    pub struct _DiagBundle {
        pub frame_names: Vec<String>,
        pub records: Vec<Vec<FrameRecord>>,
    }

    impl From<_RowVerbose> for _Row {
        fn from(x: _RowVerbose) -> Self {
            Self {
                name: x.name,
                ap: x.ap,
                precision: x.precision,
            }
        }
    }

    impl fmt::Display for _Row {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "{},{}", self.name, self.ap)?;
            for each in &self.precision {
                write!(f, ",{}", each)?;
            }
            Ok(())
        }
    }

    impl fmt::Display for _RowVerbose {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "{},{},{},{}", self.name, self.ap, self.ar, self.f1)?;
            for each in &self.precision {
                write!(f, ",{}", each)?;
            }
            for each in &self.recall {
                write!(f, ",{}", each)?;
            }
            Ok(())
        }
    }
}
