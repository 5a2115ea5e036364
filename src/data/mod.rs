use strum_macros::{Display, EnumString};

/// 参与评分的目标类别
/// 枚举序号同时是最小重叠率矩阵的列下标
#[derive(Clone, Copy, PartialEq, Eq, Debug, num_enum::TryFromPrimitive, Display, EnumString)]
#[repr(u8)]
pub enum ObjectClass {
    #[strum(ascii_case_insensitive)]
    Car = 0,
    #[strum(ascii_case_insensitive)]
    Pedestrian = 1,
    #[strum(ascii_case_insensitive)]
    Cyclist = 2,
}

/// 实体标签相对目标类别的匹配等级
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum LabelMatch {
    /// 与目标类别同名，参与评分
    Exact,
    /// 目标类别的邻近类别，不评分也不计错
    Neighbor,
    /// 其余类别
    Other,
}

impl ObjectClass {
    /// 判断一个实体标签与目标类别的关系，大小写不敏感：
    /// 1. 与目标类别同名 -> Exact
    /// 2. 邻近类别（"Car" 邻近 "Van"，"Pedestrian" 邻近 "Person_sitting"）-> Neighbor
    /// 3. 其余 -> Other
    pub fn classify_label(self, label: &str) -> LabelMatch {
        if let Ok(parsed) = label.parse::<ObjectClass>() {
            if parsed == self {
                return LabelMatch::Exact;
            }
        }
        match self {
            ObjectClass::Car if label.eq_ignore_ascii_case("Van") => LabelMatch::Neighbor,
            ObjectClass::Pedestrian if label.eq_ignore_ascii_case("Person_sitting") => {
                LabelMatch::Neighbor
            }
            _ => LabelMatch::Other,
        }
    }
}

/// 不参与评分的 ground truth 兜底类别标签
pub const DONT_CARE_LABEL: &str = "DontCare";

pub fn is_dont_care(label: &str) -> bool {
    label.eq_ignore_ascii_case(DONT_CARE_LABEL)
}

/// 图像平面上的 2d 检测框，(x1, y1) 为左上角，(x2, y2) 为右下角
#[derive(Clone, Copy, Debug, derive_more::Display)]
#[display(fmt = "x1: {}, y1: {}, x2: {}, y2: {}", "x1", "y1", "x2", "y2")]
pub struct BBox2D {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl BBox2D {
    pub fn width(&self) -> f64 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> f64 {
        self.y2 - self.y1
    }

    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }
}

pub mod input;

pub mod output;
