//! # Graph Testlib
//!
//! `graph_testlib`用于在单元测试中快速搭建数据流图片段：
//! 每种节点（常量、变量、数学运算、跨设备收发、控制流等）都有一个对应的构造函数，
//! 节点在注册时依据算子定义完成类型推断与检查，构造失败以`GraphError`返回。
//! 构建好的图可导出为`GraphDef`，以 JSON 或二进制形式保存，再重建为等价的图。
//!

pub mod errors;
pub mod graph;
pub mod tensor;
pub mod testlib;
pub mod utils;

pub use graph::{Graph, GraphDef, GraphError, NodeBuilder, NodeId, NodeOut};
pub use tensor::{DataType, Tensor, TensorShape};
