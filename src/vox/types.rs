//! VOX 类型定义
//!
//! 标记字面量、词重（Weight）与节拍运行状态（RunState）

/// 韵律边界标记
pub const BREAK: &str = "\\!br";
/// 厂商韵律模式开启标签
pub const VOX_ENABLE: &str = "\\!wH1";
/// 厂商韵律模式关闭标签
pub const VOX_DISABLE: &str = "\\!wH0";
/// 句末停顿时长（厂商单位）
pub const SENTENCE_PAUSE: u32 = 500;

/// 生成定时停顿指令，如 `\!sf500`
pub fn pause_directive(units: u32) -> String {
    format!("\\!sf{}", units)
}

/// 是否为保留标记 token（仅识别这三种写法，其余反斜杠序列视为普通文本）
pub fn is_marker(token: &str) -> bool {
    token == BREAK || token == VOX_ENABLE || token == VOX_DISABLE
}

/// 词重分类
///
/// 顺序有意义：`Light < Medium < Heavy`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Weight {
    /// 功能词、轻动词：不承担重音
    #[default]
    Light,
    /// 普通实词
    Medium,
    /// 数字、连字符复合词、专有名词、单位
    Heavy,
}

impl Weight {
    /// 是否为实词（Medium / Heavy）
    pub fn is_content(self) -> bool {
        self >= Weight::Medium
    }
}

/// 单句内从左到右累积的节拍状态
///
/// 每次输出边界后重置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunState {
    /// 自上个边界以来是否全部为 Light
    pub all_light: bool,
    /// 自上个边界以来的实词数
    pub content_run: u32,
    /// 前一个 token 的词重
    pub prev_weight: Weight,
}

impl RunState {
    pub fn new() -> Self {
        Self {
            all_light: true,
            content_run: 0,
            prev_weight: Weight::Light,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// 记录一个已输出 token 的词重
    pub fn record(&mut self, weight: Weight) {
        if weight.is_content() {
            self.content_run += 1;
            self.all_light = false;
        }
        self.prev_weight = weight;
    }
}

impl Default for RunState {
    fn default() -> Self {
        Self::new()
    }
}
