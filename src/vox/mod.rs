//! VOX 韵律标注模块
//!
//! 将播报类英文文本改写为带韵律边界标记的厂商标注文本：
//! - `\!br`：韵律边界
//! - `\!sfN`：定时停顿（N 为厂商时间单位）
//! - `\!wH1` / `\!wH0`：厂商韵律模式开启/关闭
//!
//! 各阶段均为纯函数，由 [`VoxEngine::process`] 串联

pub mod beats;
pub mod engine;
pub mod format;
pub mod letters;
pub mod lexical;
pub mod numeric;
pub mod rules;
pub mod tokenizer;
pub mod types;

pub use engine::{vox_process, VoxEngine};
pub use format::{tidy, visualize_markup};
pub use tokenizer::{split_sentences, Sentences};
pub use types::{Weight, BREAK, VOX_DISABLE, VOX_ENABLE};
